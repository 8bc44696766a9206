use tracing::warn;

use crate::error::{GeometryError, Result};
use crate::geometry::Extent;
use crate::math::distance_2d::point_to_segment_dist;
use crate::math::roots::{bisect, quadratic_nonpositive};
use crate::math::span::Spans;
use crate::math::{is_unbounded, Point2, Point3, Vector3, LARGE_POS};

use super::{RadialBound, Solid};

/// Iteration cap when marching oblique lines.
const MAX_MARCH_STEPS: usize = 20_000;

/// Uniform steps used to finish a march that hit the cap.
const FINISH_STEPS: usize = 1024;

/// Solid of revolution about the local z axis.
///
/// The meridional region is `zmin <= z <= zmax`, `inner(z) <= r <= outer(z)`.
/// Cylinders, cones, annuli, tori and tabulated surfaces of revolution are
/// all instances with different bounds.
#[derive(Debug, Clone)]
pub struct Revolved {
    zmin: f64,
    zmax: f64,
    inner: RadialBound,
    outer: RadialBound,
}

impl Revolved {
    /// Creates a solid of revolution.
    ///
    /// # Errors
    ///
    /// Returns an error if `zmin` is not below `zmax`.
    pub fn new(zmin: f64, zmax: f64, inner: RadialBound, outer: RadialBound) -> Result<Self> {
        if !(zmin < zmax) {
            return Err(GeometryError::Degenerate(format!(
                "solid of revolution needs zmin < zmax (got {zmin} and {zmax})"
            ))
            .into());
        }
        Ok(Self {
            zmin,
            zmax,
            inner,
            outer,
        })
    }

    /// Lower end along the axis.
    #[must_use]
    pub fn zmin(&self) -> f64 {
        self.zmin
    }

    /// Upper end along the axis.
    #[must_use]
    pub fn zmax(&self) -> f64 {
        self.zmax
    }

    /// Inner radial boundary.
    #[must_use]
    pub fn inner(&self) -> &RadialBound {
        &self.inner
    }

    /// Outer radial boundary.
    #[must_use]
    pub fn outer(&self) -> &RadialBound {
        &self.outer
    }

    fn contains_meridional(&self, r: f64, z: f64) -> bool {
        self.zmin <= z
            && z <= self.zmax
            && self.inner.at(z) <= r
            && (self.outer.is_open() || r <= self.outer.at(z))
    }

    /// Spans along a line parallel to the axis at radius `r`, in `z`.
    fn axial_spans(&self, r: f64) -> Spans {
        let mut events = vec![self.zmin, self.zmax];
        self.inner.events(r, self.zmin, self.zmax, &mut events);
        self.outer.events(r, self.zmin, self.zmax, &mut events);
        events.retain(|z| self.zmin <= *z && *z <= self.zmax);
        events.sort_by(f64::total_cmp);
        events.dedup();

        let intervals = events
            .windows(2)
            .filter(|w| self.contains_meridional(r, 0.5 * (w[0] + w[1])))
            .map(|w| (w[0], w[1]))
            .collect();
        Spans::from_intervals(intervals)
    }

    /// Spans along a line perpendicular to the axis at height `z`.
    fn radial_spans(&self, origin: &Point3, dir: &Vector3) -> Spans {
        let z = origin.z;
        if z < self.zmin || z > self.zmax {
            return Spans::empty();
        }
        let rlo = self.inner.at(z).max(0.0);
        let a = dir.x * dir.x + dir.y * dir.y;
        let b = 2.0 * (origin.x * dir.x + origin.y * dir.y);
        let c = origin.x * origin.x + origin.y * origin.y;

        let within_outer = if self.outer.is_open() {
            Spans::full()
        } else {
            let rhi = self.outer.at(z);
            if rhi < rlo {
                return Spans::empty();
            }
            quadratic_nonpositive(a, b, c - rhi * rhi)
                .map_or_else(Spans::empty, |(t1, t2)| Spans::single(t1, t2))
        };
        if rlo <= 0.0 {
            return within_outer;
        }
        let beyond_inner = match quadratic_nonpositive(a, b, c - rlo * rlo) {
            Some((u1, u2)) if u1 < u2 => {
                Spans::from_intervals(vec![(f64::NEG_INFINITY, u1), (u2, f64::INFINITY)])
            }
            _ => Spans::full(),
        };
        within_outer.intersect(&beyond_inner)
    }

    /// Spans along an oblique line, found by marching the signed distance.
    fn marched_spans(&self, origin: &Point3, dir: &Vector3) -> Spans {
        self.march(origin, dir, MAX_MARCH_STEPS)
    }

    /// Marches with distance-sized steps, at most `max_steps` of them. Past
    /// the cap the rest of the line is swept in `FINISH_STEPS` uniform steps.
    #[allow(clippy::cast_precision_loss)]
    fn march(&self, origin: &Point3, dir: &Vector3, max_steps: usize) -> Spans {
        let speed = dir.norm();
        let scale = self.finite_scale() + origin.coords.norm();
        let reach = 2.0 * scale / speed;
        let min_step = 1e-6 * scale / speed;
        let f = |t: f64| self.signed_distance(&(origin + dir * t));

        let mut t = -reach;
        let mut s = f(t);
        let starts_inside = s <= 0.0;
        let mut crossings = Vec::new();
        let mut step_to = |next: f64, t: &mut f64, s: &mut f64| {
            let sn = f(next);
            if (*s <= 0.0) != (sn <= 0.0) {
                crossings.push(bisect(*t, next, f));
            }
            *t = next;
            *s = sn;
        };

        let mut steps = 0;
        while t < reach && steps < max_steps {
            let next = (t + (s.abs() / speed).max(min_step)).min(reach);
            step_to(next, &mut t, &mut s);
            steps += 1;
        }
        if t < reach {
            warn!(?origin, ?dir, steps, "march step cap reached, sweeping the rest uniformly");
            let start = t;
            let h = (reach - start) / FINISH_STEPS as f64;
            for i in 1..=FINISH_STEPS {
                let next = if i == FINISH_STEPS { reach } else { start + h * i as f64 };
                step_to(next, &mut t, &mut s);
            }
        }

        let mut intervals = Vec::new();
        let mut open = starts_inside.then_some(f64::NEG_INFINITY);
        for c in crossings {
            match open.take() {
                Some(lo) => intervals.push((lo, c)),
                None => open = Some(c),
            }
        }
        if let Some(lo) = open {
            intervals.push((lo, f64::INFINITY));
        }
        Spans::from_intervals(intervals)
    }

    /// Size of the finite part of the solid.
    fn finite_scale(&self) -> f64 {
        let mut scale: f64 = 1.0;
        for v in [
            self.zmin,
            self.zmax,
            self.inner.r_max(self.zmin, self.zmax),
            self.outer.r_max(self.zmin, self.zmax),
        ] {
            if !is_unbounded(v) {
                scale = scale.max(v.abs());
            }
        }
        scale
    }

    /// Distance from `(z, r)` to the caps at `zmin` and `zmax`.
    fn cap_distance(&self, p: &Point2) -> f64 {
        [self.zmin, self.zmax]
            .into_iter()
            .filter(|z| !is_unbounded(*z))
            .map(|z| {
                let lo = self.inner.at(z).max(0.0);
                let hi = if self.outer.is_open() {
                    LARGE_POS
                } else {
                    self.outer.at(z)
                };
                if hi <= lo {
                    f64::INFINITY
                } else {
                    point_to_segment_dist(p, &Point2::new(z, lo), &Point2::new(z, hi))
                }
            })
            .fold(f64::INFINITY, f64::min)
    }
}

impl Solid for Revolved {
    fn contains(&self, p: &Point3) -> bool {
        self.contains_meridional(p.x.hypot(p.y), p.z)
    }

    fn signed_distance(&self, p: &Point3) -> f64 {
        let m = Point2::new(p.z, p.x.hypot(p.y));
        let mut d = self.cap_distance(&m);
        if !self.inner.is_axis() {
            d = d.min(self.inner.distance(&m, self.zmin, self.zmax));
        }
        if !self.outer.is_open() {
            d = d.min(self.outer.distance(&m, self.zmin, self.zmax));
        }
        if self.contains(p) {
            -d
        } else {
            d
        }
    }

    fn line_spans(&self, origin: &Point3, dir: &Vector3) -> Spans {
        let norm = dir.norm();
        if norm == 0.0 {
            return if self.contains(origin) {
                Spans::full()
            } else {
                Spans::empty()
            };
        }
        let transverse = dir.x.hypot(dir.y);

        if transverse <= 1e-14 * norm {
            let z_spans = self.axial_spans(origin.x.hypot(origin.y));
            let intervals = z_spans
                .intervals()
                .iter()
                .map(|(z0, z1)| {
                    let t0 = (z0 - origin.z) / dir.z;
                    let t1 = (z1 - origin.z) / dir.z;
                    (t0.min(t1), t0.max(t1))
                })
                .collect();
            Spans::from_intervals(intervals)
        } else if dir.z.abs() <= 1e-14 * norm {
            self.radial_spans(origin, dir)
        } else {
            self.marched_spans(origin, dir)
        }
    }

    fn extent(&self) -> Extent {
        let r = if self.outer.is_open() {
            LARGE_POS
        } else {
            self.outer.r_max(self.zmin, self.zmax)
        };
        Extent::new(
            Point3::new(-r, -r, self.zmin.max(-LARGE_POS)),
            Point3::new(r, r, self.zmax.min(LARGE_POS)),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::solid::{Profile, SegmentSpec};

    const TOL: f64 = 1e-12;

    fn cylinder() -> Revolved {
        Revolved::new(-1.0, 1.0, RadialBound::axis(), RadialBound::Constant(1.0)).unwrap()
    }

    fn annulus() -> Revolved {
        Revolved::new(
            -1.0,
            1.0,
            RadialBound::Constant(1.0),
            RadialBound::Constant(2.0),
        )
        .unwrap()
    }

    #[test]
    fn cylinder_distance() {
        let c = cylinder();
        assert!((c.signed_distance(&Point3::new(2.0, 0.0, 0.0)) - 1.0).abs() < TOL);
        assert!((c.signed_distance(&Point3::new(0.0, 0.0, 0.5)) + 0.5).abs() < TOL);
        assert!((c.signed_distance(&Point3::new(0.0, 0.0, 3.0)) - 2.0).abs() < TOL);
    }

    #[test]
    fn axial_line_through_annulus() {
        let s = annulus().line_spans(&Point3::new(1.5, 0.0, 0.0), &Vector3::z());
        assert_eq!(s.intervals(), &[(-1.0, 1.0)]);
        let s = annulus().line_spans(&Point3::new(0.5, 0.0, 0.0), &Vector3::z());
        assert!(s.is_empty());
    }

    #[test]
    fn radial_line_through_annulus() {
        let s = annulus().line_spans(&Point3::new(0.0, 0.0, 0.0), &Vector3::x());
        assert_eq!(s.intervals(), &[(-2.0, -1.0), (1.0, 2.0)]);
        // Offset line grazing the hole.
        let s = annulus().line_spans(&Point3::new(0.0, 1.5, 0.0), &Vector3::x());
        assert_eq!(s.intervals().len(), 1);
    }

    #[test]
    fn oblique_line_matches_analytic_chord() {
        let c = cylinder();
        let dir = Vector3::new(1.0, 0.0, 1.0);
        let s = c.line_spans(&Point3::new(0.0, 0.0, -0.5), &dir);
        // Enters through the bottom cap at t = -0.5, leaves the side at t = 1.
        let (lo, hi) = s.intervals()[0];
        assert!((lo + 0.5).abs() < 1e-9, "lo={lo}");
        assert!((hi - 1.0).abs() < 1e-9, "hi={hi}");
    }

    #[test]
    fn capped_march_still_finds_both_crossings() {
        let c = cylinder();
        let origin = Point3::new(0.0, 0.0, -0.5);
        let dir = Vector3::new(1.0, 0.0, 1.0);
        let full = c.march(&origin, &dir, MAX_MARCH_STEPS);
        let capped = c.march(&origin, &dir, 1);
        assert_eq!(capped.intervals().len(), 1);
        let (lo, hi) = capped.intervals()[0];
        assert!((lo + 0.5).abs() < 1e-9, "lo={lo}");
        assert!((hi - 1.0).abs() < 1e-9, "hi={hi}");
        let (flo, fhi) = full.intervals()[0];
        assert!((lo - flo).abs() < 1e-9 && (hi - fhi).abs() < 1e-9);
    }

    #[test]
    fn open_outer_bound() {
        let out = Revolved::new(-1.0, 1.0, RadialBound::Constant(1.0), RadialBound::open()).unwrap();
        assert!(out.contains(&Point3::new(100.0, 0.0, 0.0)));
        assert!(!out.contains(&Point3::origin()));
        let s = out.line_spans(&Point3::origin(), &Vector3::x());
        assert_eq!(s.intervals(), &[(f64::NEG_INFINITY, -1.0), (1.0, f64::INFINITY)]);
        assert!((out.signed_distance(&Point3::new(0.25, 0.0, 0.0)) - 0.75).abs() < TOL);
    }

    #[test]
    fn cone_profile_axial_crossing() {
        // Cone from r = 0 at z = 0 to r = 2 at z = 2.
        let outer = RadialBound::Profile(Profile::polyline(&[0.0, 2.0], &[0.0, 2.0]).unwrap());
        let cone = Revolved::new(0.0, 2.0, RadialBound::axis(), outer).unwrap();
        let s = cone.line_spans(&Point3::new(1.0, 0.0, 0.0), &Vector3::z());
        assert_eq!(s.intervals().len(), 1);
        let (lo, hi) = s.intervals()[0];
        assert!((lo - 1.0).abs() < TOL && (hi - 2.0).abs() < TOL);
    }

    #[test]
    fn torus_from_arcs() {
        // Major radius 2, minor radius 0.5.
        let lower = Profile::new(&[-0.5, 0.5], &[2.0, 2.0], &[SegmentSpec::Radius(-0.5)]).unwrap();
        let upper = Profile::new(&[-0.5, 0.5], &[2.0, 2.0], &[SegmentSpec::Radius(0.5)]).unwrap();
        let torus = Revolved::new(
            -0.5,
            0.5,
            RadialBound::Profile(lower),
            RadialBound::Profile(upper),
        )
        .unwrap();
        assert!(torus.contains(&Point3::new(2.0, 0.0, 0.0)));
        assert!(!torus.contains(&Point3::origin()));
        let d = torus.signed_distance(&Point3::new(0.0, 3.0, 0.0));
        assert!((d - 0.5).abs() < 1e-9, "d={d}");
        let s = torus.line_spans(&Point3::new(0.0, 0.0, 0.0), &Vector3::y());
        assert_eq!(s.intervals().len(), 2);
        let (lo, hi) = s.intervals()[1];
        assert!((lo - 1.5).abs() < 1e-9 && (hi - 2.5).abs() < 1e-9);
    }
}
