use std::f64::consts::PI;

use crate::geometry::delta::Delta;
use crate::geometry::solid::Solid;
use crate::math::{direction_angles, Point3, Vector3, LARGE_POS, SURFACE_FUZZ};

use super::{Node, Shape};

/// Where a trajectory crosses a shape surface, with the outward normal's
/// polar angle `theta` (from `+z`) and azimuth `phi`.
///
/// A miss is reported with all coordinates at `LARGE_POS`; check
/// [`Intercept::is_found`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intercept {
    pub point: Point3,
    pub theta: f64,
    pub phi: f64,
}

impl Intercept {
    /// The miss sentinel.
    #[must_use]
    pub fn none() -> Self {
        Self {
            point: Point3::new(LARGE_POS, LARGE_POS, LARGE_POS),
            theta: 0.0,
            phi: 0.0,
        }
    }

    /// Returns true unless this is the miss sentinel.
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.point.x < LARGE_POS
    }

    fn flipped(mut self) -> Self {
        self.theta += PI;
        self
    }
}

impl Shape {
    /// Six-direction distance record at a mesh node, in physical units.
    ///
    /// Voltages are evaluated at `time`.
    #[must_use]
    pub fn grid_distance(&self, index: [usize; 3], p: &Point3, time: f64) -> Delta {
        match &self.node {
            Node::Leaf { solid, frame } => {
                let local = frame.to_local_point(p);
                let mut dels = [0.0; 6];
                for k in 0..3 {
                    let mut axis = Vector3::zeros();
                    axis[k] = 1.0;
                    let dir = frame.to_local_vector(&axis);
                    let (backward, forward) = solid.line_spans(&local, &dir).boundary_distances(0.0);
                    dels[2 * k] = backward;
                    dels[2 * k + 1] = forward;
                }
                Delta::new(
                    index,
                    *p,
                    dels,
                    self.attrs.voltage.at(time),
                    self.attrs.condid,
                    self.attrs.neumann,
                )
            }
            Node::Not(s) => s.grid_distance(index, p, time).not(),
            Node::And(l, r) => l
                .grid_distance(index, p, time)
                .and(&r.grid_distance(index, p, time)),
            Node::Or(l, r) => l
                .grid_distance(index, p, time)
                .or(&r.grid_distance(index, p, time)),
            Node::Minus(l, r) => l
                .grid_distance(index, p, time)
                .minus(&r.grid_distance(index, p, time)),
        }
    }

    /// Signed distance from `p` to the nearest surface, negative inside.
    ///
    /// For differences the value is exact only when the subtracted shape is
    /// simple and convex.
    #[must_use]
    pub fn distance(&self, p: &Point3) -> f64 {
        match &self.node {
            Node::Leaf { solid, frame } => {
                let local = frame.to_local_point(p);
                let d = solid.signed_distance(&local);
                let e = frame.ellipticity();
                if (e - 1.0).abs() < f64::EPSILON {
                    return d;
                }
                // Stretch the circular distance along the ellipse's y axis.
                let tt = (local.y * e).atan2(local.x);
                let dx = d * tt.cos();
                let dy = d * tt.sin() * e;
                dx.hypot(dy).copysign(d)
            }
            Node::Not(s) => -s.distance(p),
            Node::And(l, r) => l.distance(p).max(r.distance(p)),
            Node::Or(l, r) => l.distance(p).min(r.distance(p)),
            Node::Minus(l, r) => {
                let left = l.distance(p);
                let right = -r.distance(p);
                let mut d = left;
                if right >= 0.0 && left >= 0.0 {
                    d = right.hypot(left);
                }
                if right >= 0.0 && left <= 0.0 {
                    d = right;
                }
                if right < 0.0 && left <= 0.0 {
                    d = right.max(left);
                }
                d
            }
        }
    }

    fn inside(&self, p: &Point3, aura: f64) -> bool {
        match &self.node {
            Node::Leaf { .. } => self.distance(p) <= aura,
            Node::Not(s) => !s.inside(p, aura),
            Node::And(l, r) => l.inside(p, aura) && r.inside(p, aura),
            Node::Or(l, r) => l.inside(p, aura) || r.inside(p, aura),
            Node::Minus(l, r) => l.inside(p, aura) && !r.inside(p, aura),
        }
    }

    /// Conductor id if `p` lies within `aura` of the inside of the shape.
    #[must_use]
    pub fn is_inside(&self, p: &Point3, aura: f64) -> Option<i32> {
        self.inside(p, aura).then_some(self.attrs.condid)
    }

    /// Where a particle at `p` moving with velocity `v` crossed (or will
    /// cross) into the shape, using the default surface fuzz.
    #[must_use]
    pub fn intercept(&self, p: &Point3, v: &Vector3) -> Intercept {
        self.intercept_with_fuzz(p, v, SURFACE_FUZZ)
    }

    /// As [`Shape::intercept`] with an explicit surface fuzz.
    ///
    /// Primitives report the surface crossing most recently left behind on
    /// the trajectory, or the next one ahead when there is none behind.
    #[must_use]
    pub fn intercept_with_fuzz(&self, p: &Point3, v: &Vector3, fuzz: f64) -> Intercept {
        match &self.node {
            Node::Leaf { solid, frame } => {
                let local = frame.to_local_point(p);
                let lv = frame.to_local_vector(v);
                if lv.norm_squared() == 0.0 {
                    return Intercept::none();
                }
                let Some(t) = solid.line_spans(&local, &lv).crossing_near_origin() else {
                    return Intercept::none();
                };
                let hit = local + lv * t;
                let normal = frame.normal_to_world(&solid.normal(&hit));
                let (theta, phi) = direction_angles(&normal);
                Intercept {
                    point: frame.to_world_point(&hit),
                    theta,
                    phi,
                }
            }
            Node::Not(s) => {
                let hit = s.intercept_with_fuzz(p, v, fuzz);
                if hit.is_found() {
                    hit.flipped()
                } else {
                    hit
                }
            }
            Node::And(l, r) | Node::Or(l, r) => self.pick_intercept(
                l.intercept_with_fuzz(p, v, fuzz),
                r.intercept_with_fuzz(p, v, fuzz),
                p,
                false,
                fuzz,
            ),
            Node::Minus(l, r) => self.pick_intercept(
                l.intercept_with_fuzz(p, v, fuzz),
                r.intercept_with_fuzz(p, v, fuzz),
                p,
                true,
                fuzz,
            ),
        }
    }

    /// Chooses between the operands' candidates: the one lying on this
    /// shape's surface, or the nearer to `p` when both do.
    fn pick_intercept(
        &self,
        left: Intercept,
        right: Intercept,
        p: &Point3,
        flip_right: bool,
        fuzz: f64,
    ) -> Intercept {
        let off_surface = |hit: &Intercept| {
            if hit.is_found() {
                self.distance(&hit.point).abs()
            } else {
                f64::INFINITY
            }
        };
        let si = off_surface(&left);
        let ri = off_surface(&right);
        if si.min(ri) >= fuzz {
            return Intercept::none();
        }

        let take_left = if si < fuzz && ri < fuzz {
            (left.point - p).norm_squared() < (right.point - p).norm_squared()
        } else {
            si < ri
        };
        if take_left {
            left
        } else if flip_right {
            right.flipped()
        } else {
            right
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::solid::{Cuboid, Primitive, RadialBound, Revolved, Sphere};
    use crate::geometry::{ConductorAttrs, Frame, Orientation};

    fn at(center: Vector3, solid: Primitive, condid: i32) -> Shape {
        let attrs = ConductorAttrs {
            condid,
            ..ConductorAttrs::default()
        };
        Shape::primitive(solid, Frame::new(center, Orientation::Z, 1.0).unwrap(), attrs)
    }

    fn sphere(radius: f64, center: Vector3) -> Shape {
        at(center, Primitive::Sphere(Sphere::new(radius).unwrap()), 1)
    }

    fn z_cylinder(radius: f64, length: f64) -> Shape {
        let solid = Revolved::new(
            -0.5 * length,
            0.5 * length,
            RadialBound::axis(),
            RadialBound::Constant(radius),
        )
        .unwrap();
        at(Vector3::zeros(), Primitive::Revolved(solid), 3)
    }

    fn sample_points() -> Vec<Point3> {
        let mut pts = Vec::new();
        for i in -4..=4 {
            for j in -4..=4 {
                for k in -2..=2 {
                    pts.push(Point3::new(
                        f64::from(i) * 0.37,
                        f64::from(j) * 0.41,
                        f64::from(k) * 0.53,
                    ));
                }
            }
        }
        pts
    }

    #[test]
    fn sphere_sign_convention() {
        let s = sphere(1.0, Vector3::zeros());
        assert!((s.distance(&Point3::new(2.0, 0.0, 0.0)) - 1.0).abs() < 1e-12);
        assert!((s.distance(&Point3::new(0.5, 0.0, 0.0)) + 0.5).abs() < 1e-12);
    }

    #[test]
    fn csg_duality_of_inside() {
        let a = sphere(1.0, Vector3::zeros());
        let b = sphere(1.0, Vector3::new(0.8, 0.0, 0.0));
        let and = a.clone() & b.clone();
        let or = a.clone() | b.clone();
        let not = !a.clone();
        let minus = a.clone() - b.clone();
        for p in sample_points() {
            let ia = a.is_inside(&p, 0.0).is_some();
            let ib = b.is_inside(&p, 0.0).is_some();
            assert_eq!(and.is_inside(&p, 0.0).is_some(), ia && ib, "p={p}");
            assert_eq!(or.is_inside(&p, 0.0).is_some(), ia || ib, "p={p}");
            assert_eq!(not.is_inside(&p, 0.0).is_some(), !ia, "p={p}");
            assert_eq!(minus.is_inside(&p, 0.0).is_some(), ia && !ib, "p={p}");
        }
    }

    #[test]
    fn inside_implies_within_extent() {
        let a = sphere(1.0, Vector3::new(0.3, 0.0, 0.0));
        let c = z_cylinder(0.6, 3.0);
        let box_shape = at(
            Vector3::new(0.0, 0.5, 0.0),
            Primitive::Cuboid(Cuboid::new(1.0, 2.0, 0.8).unwrap()),
            2,
        );
        let shapes = [
            a.clone() & c.clone(),
            a.clone() | box_shape.clone(),
            box_shape.clone() - c.clone(),
            c.clone() | (a.clone() & box_shape.clone()),
        ];
        for shape in &shapes {
            for p in sample_points() {
                if shape.is_inside(&p, 0.0).is_some() {
                    assert!(shape.extent().contains(&p), "p={p}");
                }
            }
        }
    }

    #[test]
    fn composite_reports_left_condid() {
        let a = at(Vector3::zeros(), Primitive::Sphere(Sphere::new(1.0).unwrap()), 7);
        let b = at(Vector3::zeros(), Primitive::Sphere(Sphere::new(0.5).unwrap()), 9);
        let u = a | b;
        assert_eq!(u.is_inside(&Point3::origin(), 0.0), Some(7));
        assert_eq!(u.is_inside(&Point3::new(3.0, 0.0, 0.0), 0.0), None);
        assert_eq!(u.is_inside(&Point3::new(1.5, 0.0, 0.0), 0.6), Some(7));
    }

    #[test]
    fn intercept_unit_sphere_from_below() {
        let s = sphere(1.0, Vector3::zeros());
        let hit = s.intercept(&Point3::new(0.0, 0.0, -2.0), &Vector3::new(0.0, 0.0, 1.0));
        assert!(hit.is_found());
        assert!((hit.point - Point3::new(0.0, 0.0, -1.0)).norm() < 1e-12);
        assert!((hit.theta - PI).abs() < 1e-12);
        assert!(hit.phi.abs() < 1e-12);
    }

    #[test]
    fn intercept_from_inside_looks_back() {
        let s = sphere(1.0, Vector3::zeros());
        let hit = s.intercept(&Point3::new(0.0, 0.0, 0.5), &Vector3::new(0.0, 0.0, 1.0));
        assert!((hit.point - Point3::new(0.0, 0.0, -1.0)).norm() < 1e-12);
    }

    #[test]
    fn intercept_miss_is_sentinel() {
        let s = sphere(1.0, Vector3::zeros());
        let hit = s.intercept(&Point3::new(0.0, 3.0, 0.0), &Vector3::new(1.0, 0.0, 0.0));
        assert!(!hit.is_found());
        assert_eq!(hit.point.x, LARGE_POS);
    }

    #[test]
    fn intercept_through_difference_uses_hole_surface() {
        // Particle in the wall of a pipe, moving outward from the bore.
        let outer = z_cylinder(2.0, 4.0);
        let inner = z_cylinder(1.0, 6.0);
        let pipe = outer - inner;
        let hit = pipe.intercept(&Point3::new(1.4, 0.0, 0.0), &Vector3::new(1.0, 0.0, 0.0));
        assert!(hit.is_found());
        assert!((hit.point - Point3::new(1.0, 0.0, 0.0)).norm() < 1e-9);
        // The bore's outward normal (+x) is flipped to face into the bore.
        let n = Vector3::new(
            hit.theta.sin() * hit.phi.cos(),
            hit.theta.sin() * hit.phi.sin(),
            hit.theta.cos(),
        );
        assert!((n - Vector3::new(-1.0, 0.0, 0.0)).norm() < 1e-6, "n={n}");
    }

    #[test]
    fn grid_distance_of_difference_of_identical_cylinders_is_far() {
        let c = z_cylinder(1.0, 2.0);
        let m = c.clone() - c;
        for p in sample_points() {
            let d = m.grid_distance([0, 0, 0], &p, 0.0);
            assert!(d.dels.iter().all(|v| *v >= LARGE_POS * 0.5), "p={p} d={:?}", d.dels);
        }
    }

    #[test]
    fn grid_distance_matches_box_faces() {
        let b = at(
            Vector3::zeros(),
            Primitive::Cuboid(Cuboid::new(2.0, 2.0, 2.0).unwrap()),
            1,
        );
        let d = b.grid_distance([0, 0, 0], &Point3::new(1.5, 0.0, 0.0), 0.0);
        assert!((d.dels[0] - 0.5).abs() < 1e-15);
        assert!(d.dels[1] >= LARGE_POS * 0.5);
        let d = b.grid_distance([0, 0, 0], &Point3::new(0.25, 0.0, 0.0), 0.0);
        assert!((d.dels[0] + 1.25).abs() < 1e-15 && (d.dels[1] + 0.75).abs() < 1e-15);
    }

    #[test]
    fn elliptic_frame_scales_y_distances() {
        let attrs = ConductorAttrs::default();
        let solid = Revolved::new(-1.0, 1.0, RadialBound::axis(), RadialBound::Constant(1.0)).unwrap();
        let frame = Frame::new(Vector3::zeros(), Orientation::Z, 2.0).unwrap();
        let s = Shape::primitive(Primitive::Revolved(solid), frame, attrs);
        let d = s.grid_distance([0, 0, 0], &Point3::origin(), 0.0);
        assert!((d.dels[1] + 1.0).abs() < 1e-12);
        assert!((d.dels[3] + 2.0).abs() < 1e-12);
        assert!(s.extent().max.y > 1.99);
    }
}
