use crate::vec::{ Vec3, Point3 };
use crate::matrix::Matrix4;

/// A ray with an origin and a (not necessarily unit) direction.
///
/// The direction's magnitude is meaningful: shadow rays toward positional
/// lights keep the unnormalized displacement so that t = 1 lands on the
/// light. `transform` therefore never renormalizes.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Point3, direction: Vec3) -> Ray {
        Ray { origin, direction }
    }

    /// The point at parameter `t` along the ray.
    pub fn position(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }

    /// Returns this ray carried through `m` — into a shape's object space
    /// when `m` is the shape's inverse matrix.
    pub fn transform(&self, m: &Matrix4) -> Ray {
        Ray {
            origin: m.transform_point(&self.origin),
            direction: m.transform_vector(&self.direction),
        }
    }
}

/* Tests */

#[test]
fn ray_position() {
    let r = Ray::new(Point3::new(2.0, 3.0, 4.0), Vec3::new(1.0, 0.0, 0.0));

    assert_eq!(r.position(0.0), Point3::new(2.0, 3.0, 4.0));
    assert_eq!(r.position(1.0), Point3::new(3.0, 3.0, 4.0));
    assert_eq!(r.position(-1.0), Point3::new(1.0, 3.0, 4.0));
    assert_eq!(r.position(2.5), Point3::new(4.5, 3.0, 4.0));
}

#[test]
fn ray_translation() {
    let r = Ray::new(Point3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 1.0, 0.0));
    let t = r.transform(&Matrix4::translation(3.0, 4.0, 5.0));

    assert_eq!(t.origin, Point3::new(4.0, 6.0, 8.0));
    assert_eq!(t.direction, Vec3::new(0.0, 1.0, 0.0));
}

#[test]
fn ray_scaling_stretches_direction() {
    let r = Ray::new(Point3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 1.0, 0.0));
    let t = r.transform(&Matrix4::scaling(2.0, 3.0, 4.0));

    assert_eq!(t.origin, Point3::new(2.0, 6.0, 12.0));
    assert_eq!(t.direction, Vec3::new(0.0, 3.0, 0.0));
}
