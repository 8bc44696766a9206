//! Closed parameter intervals along a line.
//!
//! A [`Spans`] value records where a line `origin + t * dir` lies inside a
//! solid. Ends may be infinite for unbounded solids.

use super::{clamp_large, LARGE_POS};

/// A sorted set of disjoint closed intervals `[lo, hi]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spans {
    spans: Vec<(f64, f64)>,
}

impl Spans {
    /// The empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self { spans: Vec::new() }
    }

    /// The whole line.
    #[must_use]
    pub fn full() -> Self {
        Self::single(f64::NEG_INFINITY, f64::INFINITY)
    }

    /// One interval; empty when `lo > hi`.
    #[must_use]
    pub fn single(lo: f64, hi: f64) -> Self {
        if lo <= hi {
            Self {
                spans: vec![(lo, hi)],
            }
        } else {
            Self::empty()
        }
    }

    /// Builds a set from arbitrary intervals, sorting and merging overlaps.
    #[must_use]
    pub fn from_intervals(mut intervals: Vec<(f64, f64)>) -> Self {
        intervals.retain(|(lo, hi)| lo <= hi);
        intervals.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut spans: Vec<(f64, f64)> = Vec::with_capacity(intervals.len());
        for (lo, hi) in intervals {
            match spans.last_mut() {
                Some(last) if lo <= last.1 => last.1 = last.1.max(hi),
                _ => spans.push((lo, hi)),
            }
        }
        Self { spans }
    }

    /// The intervals in ascending order.
    #[must_use]
    pub fn intervals(&self) -> &[(f64, f64)] {
        &self.spans
    }

    /// Returns true when no interval is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Intersection with another set.
    #[must_use]
    pub fn intersect(&self, other: &Spans) -> Spans {
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.spans.len() && j < other.spans.len() {
            let (a0, a1) = self.spans[i];
            let (b0, b1) = other.spans[j];
            let lo = a0.max(b0);
            let hi = a1.min(b1);
            if lo <= hi {
                out.push((lo, hi));
            }
            if a1 < b1 {
                i += 1;
            } else {
                j += 1;
            }
        }
        Spans { spans: out }
    }

    /// The interval containing `t`, if any.
    #[must_use]
    pub fn containing(&self, t: f64) -> Option<(f64, f64)> {
        self.spans.iter().copied().find(|(lo, hi)| *lo <= t && t <= *hi)
    }

    /// Signed distances from parameter `t` to the nearest boundary toward
    /// decreasing and increasing `t`, as `(backward, forward)`.
    ///
    /// Inside a span the distances are negative (distance to the exit);
    /// outside they are positive (distance to the next entry). Directions
    /// with no boundary carry the `±LARGE_POS` sentinel.
    #[must_use]
    pub fn boundary_distances(&self, t: f64) -> (f64, f64) {
        if let Some((lo, hi)) = self.containing(t) {
            return (clamp_large(-(t - lo)), clamp_large(-(hi - t)));
        }

        let backward = self
            .spans
            .iter()
            .rev()
            .find(|(_, hi)| *hi < t)
            .map_or(LARGE_POS, |(_, hi)| clamp_large(t - hi));
        let forward = self
            .spans
            .iter()
            .find(|(lo, _)| *lo > t)
            .map_or(LARGE_POS, |(lo, _)| clamp_large(lo - t));
        (backward, forward)
    }

    /// Boundary a trajectory through `t = 0` (moving toward increasing `t`)
    /// crossed most recently, else the next one it will cross. `None` when
    /// no finite boundary exists.
    #[must_use]
    pub fn crossing_near_origin(&self) -> Option<f64> {
        let boundaries = || {
            self.spans
                .iter()
                .flat_map(|(lo, hi)| [*lo, *hi])
                .filter(|b| b.is_finite())
        };
        boundaries()
            .filter(|b| *b <= 0.0)
            .reduce(f64::max)
            .or_else(|| boundaries().filter(|b| *b > 0.0).reduce(f64::min))
    }
}
