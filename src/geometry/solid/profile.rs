use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use crate::error::{GeometryError, Result};
use crate::math::arc_2d::{arc_center, arc_r_at, arc_radius, arc_z_at};
use crate::math::distance_2d::{point_to_arc_dist, point_to_segment_dist};
use crate::math::roots::bisect;
use crate::math::{is_unbounded, Point2, LARGE_POS};

/// Number of samples used to scan functional radius bounds.
const FUNCTION_SAMPLES: usize = 256;

/// How consecutive profile points are joined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentSpec {
    /// Straight segment.
    Straight,
    /// Circular arc with the given signed radius; the center is derived.
    Radius(f64),
    /// Circular arc around the given `(z, r)` center; the radius is derived.
    Center(Point2),
    /// Circular arc with both radius and center given.
    RadiusAndCenter(f64, Point2),
}

/// One piece of a meridional profile, `z` ascending from `start` to `end`.
///
/// Points are `(z, r)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfileSegment {
    Line {
        start: Point2,
        end: Point2,
    },
    Arc {
        start: Point2,
        end: Point2,
        center: Point2,
        radius: f64,
    },
}

impl ProfileSegment {
    fn start(&self) -> Point2 {
        match self {
            Self::Line { start, .. } | Self::Arc { start, .. } => *start,
        }
    }

    fn end(&self) -> Point2 {
        match self {
            Self::Line { end, .. } | Self::Arc { end, .. } => *end,
        }
    }

    /// Radius at height `z`, assuming `z` lies in the segment's range.
    #[must_use]
    pub fn r_at(&self, z: f64) -> f64 {
        match self {
            Self::Line { start, end } => {
                let dz = end.x - start.x;
                if dz <= 0.0 {
                    end.y
                } else {
                    start.y + (end.y - start.y) * (z - start.x) / dz
                }
            }
            Self::Arc { center, radius, .. } => arc_r_at(center, *radius, z),
        }
    }

    /// Largest radius reached on the segment.
    #[must_use]
    pub fn r_max(&self) -> f64 {
        let ends = self.start().y.max(self.end().y);
        match self {
            Self::Arc { start, end, center, radius } if *radius > 0.0 => {
                if start.x <= center.x && center.x <= end.x {
                    center.y + radius
                } else {
                    ends
                }
            }
            _ => ends,
        }
    }

    fn z_crossings(&self, r: f64, out: &mut Vec<f64>) {
        let (start, end) = (self.start(), self.end());
        match self {
            Self::Line { .. } => {
                if start.y == end.y {
                    return;
                }
                if (start.y - r) * (end.y - r) <= 0.0 {
                    let f = (r - start.y) / (end.y - start.y);
                    out.push(start.x + f * (end.x - start.x));
                }
            }
            Self::Arc { center, radius, .. } => {
                if let Some((za, zb)) = arc_z_at(center, *radius, r) {
                    for z in [za, zb] {
                        if start.x - 1e-12 <= z && z <= end.x + 1e-12 {
                            out.push(z.clamp(start.x, end.x));
                        }
                    }
                }
            }
        }
    }

    /// The part of the segment within `[zlo, zhi]`.
    fn clipped(&self, zlo: f64, zhi: f64) -> Option<ProfileSegment> {
        let (start, end) = (self.start(), self.end());
        let lo = start.x.max(zlo);
        let hi = end.x.min(zhi);
        if lo > hi {
            return None;
        }
        if lo == start.x && hi == end.x {
            return Some(*self);
        }
        let new_start = Point2::new(lo, self.r_at(lo));
        let new_end = Point2::new(hi, self.r_at(hi));
        Some(match self {
            Self::Line { .. } => Self::Line {
                start: new_start,
                end: new_end,
            },
            Self::Arc { center, radius, .. } => Self::Arc {
                start: new_start,
                end: new_end,
                center: *center,
                radius: *radius,
            },
        })
    }

    fn distance(&self, p: &Point2) -> f64 {
        match self {
            Self::Line { start, end } => point_to_segment_dist(p, start, end),
            Self::Arc {
                start,
                end,
                center,
                radius,
            } => {
                let a0 = (start.y - center.y).atan2(start.x - center.x);
                let a1 = (end.y - center.y).atan2(end.x - center.x);
                let mut sweep = a1 - a0;
                // Upper halves run clockwise with increasing z, lower halves counter-clockwise.
                if *radius > 0.0 && sweep > 0.0 {
                    sweep -= 2.0 * PI;
                } else if *radius < 0.0 && sweep < 0.0 {
                    sweep += 2.0 * PI;
                }
                point_to_arc_dist(p, center, radius.abs(), a0, sweep)
            }
        }
    }
}

/// A tabulated radius as a function of `z`: straight segments and arcs.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    segments: Vec<ProfileSegment>,
}

impl Profile {
    /// Piecewise-linear profile through the `(z, r)` points.
    ///
    /// # Errors
    ///
    /// See [`Profile::new`].
    pub fn polyline(z: &[f64], r: &[f64]) -> Result<Self> {
        let specs = vec![SegmentSpec::Straight; z.len().saturating_sub(1)];
        Self::new(z, r, &specs)
    }

    /// Profile through the `(z, r)` points joined according to `specs`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tables disagree in length, hold fewer than two
    /// points, `z` decreases, an arc radius is smaller than half its chord, or
    /// an arc center is not equidistant from the segment endpoints.
    pub fn new(z: &[f64], r: &[f64], specs: &[SegmentSpec]) -> Result<Self> {
        if r.len() != z.len() {
            return Err(GeometryError::TableLength {
                table: "r",
                found: r.len(),
                expected: z.len(),
            }
            .into());
        }
        if z.len() < 2 {
            return Err(GeometryError::Degenerate("profile needs at least two points".into()).into());
        }
        if specs.len() != z.len() - 1 {
            return Err(GeometryError::TableLength {
                table: "segments",
                found: specs.len(),
                expected: z.len() - 1,
            }
            .into());
        }

        let mut segments = Vec::with_capacity(specs.len());
        for (i, spec) in specs.iter().enumerate() {
            let start = Point2::new(z[i], r[i]);
            let end = Point2::new(z[i + 1], r[i + 1]);
            if end.x < start.x {
                return Err(GeometryError::NonMonotonicProfile { segment: i }.into());
            }
            segments.push(build_segment(i, start, end, *spec)?);
        }
        Ok(Self { segments })
    }

    /// The segments in ascending `z`.
    #[must_use]
    pub fn segments(&self) -> &[ProfileSegment] {
        &self.segments
    }

    /// `z` range covered by the table.
    #[must_use]
    pub fn z_range(&self) -> (f64, f64) {
        let first = self.segments.first().map_or(0.0, |s| s.start().x);
        let last = self.segments.last().map_or(0.0, |s| s.end().x);
        (first, last)
    }

    /// Radius at height `z`; held constant beyond the table ends.
    #[must_use]
    pub fn r_at(&self, z: f64) -> f64 {
        let (Some(first), Some(last)) = (self.segments.first(), self.segments.last()) else {
            return 0.0;
        };
        if z <= first.start().x {
            return first.start().y;
        }
        if z >= last.end().x {
            return last.end().y;
        }
        self.segments
            .iter()
            .find(|s| s.start().x <= z && z <= s.end().x && s.end().x > s.start().x)
            .map_or(last.end().y, |s| s.r_at(z))
    }
}

fn build_segment(i: usize, start: Point2, end: Point2, spec: SegmentSpec) -> Result<ProfileSegment> {
    match spec {
        SegmentSpec::Straight => Ok(ProfileSegment::Line { start, end }),
        SegmentSpec::Radius(radius) => {
            let center = arc_center(&start, &end, radius).ok_or(GeometryError::ArcRadiusTooSmall {
                segment: i,
                radius,
                chord: (end - start).norm(),
            })?;
            Ok(ProfileSegment::Arc {
                start,
                end,
                center,
                radius,
            })
        }
        SegmentSpec::Center(center) => {
            let radius = arc_radius(&start, &end, &center).map_err(|(first, second)| {
                GeometryError::ArcEndpointsMismatch {
                    segment: i,
                    first,
                    second,
                }
            })?;
            Ok(ProfileSegment::Arc {
                start,
                end,
                center,
                radius,
            })
        }
        SegmentSpec::RadiusAndCenter(radius, center) => {
            let derived = arc_radius(&start, &end, &center).map_err(|(first, second)| {
                GeometryError::ArcEndpointsMismatch {
                    segment: i,
                    first,
                    second,
                }
            })?;
            if (derived.abs() - radius.abs()).abs() > 1e-2 * radius.abs() {
                return Err(GeometryError::ArcEndpointsMismatch {
                    segment: i,
                    first: derived.abs(),
                    second: radius.abs(),
                }
                .into());
            }
            Ok(ProfileSegment::Arc {
                start,
                end,
                center,
                radius,
            })
        }
    }
}

/// Radius as a function of `z`.
pub type RadiusFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// One radial boundary of a solid of revolution.
#[derive(Clone)]
pub enum RadialBound {
    /// Fixed radius; zero is the axis, `LARGE_POS` is open.
    Constant(f64),
    /// Tabulated profile.
    Profile(Profile),
    /// Radius function, scanned numerically.
    Function(RadiusFn),
}

impl fmt::Debug for RadialBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(r) => f.debug_tuple("Constant").field(r).finish(),
            Self::Profile(p) => f.debug_tuple("Profile").field(p).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl RadialBound {
    /// The symmetry axis (no inner boundary).
    #[must_use]
    pub fn axis() -> Self {
        Self::Constant(0.0)
    }

    /// No outer boundary.
    #[must_use]
    pub fn open() -> Self {
        Self::Constant(LARGE_POS)
    }

    /// Wraps a radius function of `z`.
    pub fn function(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self::Function(Arc::new(f))
    }

    /// Radius at height `z`.
    #[must_use]
    pub fn at(&self, z: f64) -> f64 {
        match self {
            Self::Constant(r) => *r,
            Self::Profile(p) => p.r_at(z),
            Self::Function(f) => f(z),
        }
    }

    pub(crate) fn is_axis(&self) -> bool {
        matches!(self, Self::Constant(r) if *r <= 0.0)
    }

    pub(crate) fn is_open(&self) -> bool {
        matches!(self, Self::Constant(r) if is_unbounded(*r))
    }

    /// Largest radius over `[zmin, zmax]`.
    pub(crate) fn r_max(&self, zmin: f64, zmax: f64) -> f64 {
        match self {
            Self::Constant(r) => *r,
            Self::Profile(p) => p
                .segments
                .iter()
                .filter_map(|s| s.clipped(zmin, zmax))
                .map(|s| s.r_max())
                .fold(p.r_at(zmin).max(p.r_at(zmax)), f64::max),
            Self::Function(f) => {
                let max = samples(zmin, zmax).map(|z| f(z)).fold(0.0, f64::max);
                // Allow for peaks between samples.
                max * (1.0 + 1e-3)
            }
        }
    }

    /// Heights in `[zmin, zmax]` where the boundary reaches radius `r`, plus
    /// the profile breakpoints, appended to `out`.
    pub(crate) fn events(&self, r: f64, zmin: f64, zmax: f64, out: &mut Vec<f64>) {
        match self {
            Self::Constant(_) => {}
            Self::Profile(p) => {
                for s in &p.segments {
                    out.push(s.start().x);
                    out.push(s.end().x);
                    s.z_crossings(r, out);
                }
            }
            Self::Function(f) => {
                let g = |z: f64| f(z) - r;
                let mut prev: Option<(f64, f64)> = None;
                for z in samples(zmin, zmax) {
                    let v = g(z);
                    if let Some((z0, v0)) = prev {
                        if (v0 <= 0.0) != (v <= 0.0) {
                            out.push(bisect(z0, z, g));
                        }
                    }
                    prev = Some((z, v));
                }
            }
        }
    }

    /// Unsigned distance from the meridional point `p = (z, r)` to the
    /// boundary curve over `[zmin, zmax]`.
    pub(crate) fn distance(&self, p: &Point2, zmin: f64, zmax: f64) -> f64 {
        match self {
            Self::Constant(r) => {
                let dz = (zmin - p.x).max(p.x - zmax).max(0.0);
                dz.hypot(p.y - r)
            }
            Self::Profile(profile) => {
                let (pz0, pz1) = profile.z_range();
                let mut d = profile
                    .segments
                    .iter()
                    .filter_map(|s| s.clipped(zmin, zmax))
                    .map(|s| s.distance(p))
                    .fold(f64::INFINITY, f64::min);
                if zmin < pz0 {
                    let r = profile.r_at(pz0);
                    let a = Point2::new(zmin, r);
                    let b = Point2::new(pz0.min(zmax), r);
                    d = d.min(point_to_segment_dist(p, &a, &b));
                }
                if zmax > pz1 {
                    let r = profile.r_at(pz1);
                    let a = Point2::new(pz1.max(zmin), r);
                    let b = Point2::new(zmax, r);
                    d = d.min(point_to_segment_dist(p, &a, &b));
                }
                d
            }
            Self::Function(f) => {
                let mut d = f64::INFINITY;
                let mut prev: Option<Point2> = None;
                for z in samples(zmin, zmax) {
                    let q = Point2::new(z, f(z));
                    if let Some(a) = prev {
                        d = d.min(point_to_segment_dist(p, &a, &q));
                    }
                    prev = Some(q);
                }
                d
            }
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn samples(zmin: f64, zmax: f64) -> impl Iterator<Item = f64> {
    (0..=FUNCTION_SAMPLES).map(move |i| zmin + (zmax - zmin) * (i as f64) / (FUNCTION_SAMPLES as f64))
}
