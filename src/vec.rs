use std::ops::{ Add, Sub, Neg, Mul };

use crate::feq;

/// A 3-component direction or displacement.
///
/// Vectors and points are kept as separate types: subtracting two points
/// yields a vector, and a matrix applies translation to points but not to
/// vectors. Light colors and attenuation triples also travel as `Vec3`.
#[derive(Debug, Default, Copy, Clone, PartialOrd)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A 3-component position in space.
#[derive(Debug, Default, Copy, Clone, PartialOrd)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PartialEq for Vec3 {
    fn eq(&self, other: &Vec3) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl PartialEq for Point3 {
    fn eq(&self, other: &Point3) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Vec3 {
        Vec3 { x, y, z }
    }

    pub fn magnitude(&self) -> f64 {
        f64::sqrt(self.x * self.x + self.y * self.y + self.z * self.z)
    }

    pub fn normalize(&self) -> Vec3 {
        let mag = self.magnitude();

        Vec3 {
            x: self.x / mag,
            y: self.y / mag,
            z: self.z / mag,
        }
    }

    pub fn dot(&self, other: &Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Mirrors this vector about a normal: r = 2(n·l)n − l.
    ///
    /// This is the Phong reflection direction for a light vector `self`
    /// pointing away from the surface. Note the sign convention differs from
    /// reflecting an *incoming* ray across a normal.
    pub fn mirror(&self, normal: &Vec3) -> Vec3 {
        (*normal * (2.0 * normal.dot(self))) - *self
    }
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Point3 {
        Point3 { x, y, z }
    }

    pub fn origin() -> Point3 {
        Point3 { x: 0.0, y: 0.0, z: 0.0 }
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3 { x: -self.x, y: -self.y, z: -self.z }
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;

    fn mul(self, scalar: f64) -> Vec3 {
        Vec3 {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl Mul<Vec3> for f64 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Vec3 {
        v * self
    }
}

/// Offsetting a point by a vector yields a point.
impl Add<Vec3> for Point3 {
    type Output = Point3;

    fn add(self, v: Vec3) -> Point3 {
        Point3 {
            x: self.x + v.x,
            y: self.y + v.y,
            z: self.z + v.z,
        }
    }
}

impl Sub<Vec3> for Point3 {
    type Output = Point3;

    fn sub(self, v: Vec3) -> Point3 {
        Point3 {
            x: self.x - v.x,
            y: self.y - v.y,
            z: self.z - v.z,
        }
    }
}

/// The displacement between two points is a vector.
impl Sub for Point3 {
    type Output = Vec3;

    fn sub(self, other: Point3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(a: [f64; 3]) -> Vec3 {
        Vec3 { x: a[0], y: a[1], z: a[2] }
    }
}

impl From<[f64; 3]> for Point3 {
    fn from(a: [f64; 3]) -> Point3 {
        Point3 { x: a[0], y: a[1], z: a[2] }
    }
}

/* Tests */

#[test]
fn sub_points_gives_vector() {
    let p1 = Point3::new(3.0, 2.0, 1.0);
    let p2 = Point3::new(5.0, 6.0, 7.0);

    assert_eq!(p1 - p2, Vec3::new(-2.0, -4.0, -6.0));
}

#[test]
fn offset_point_by_vector() {
    let p = Point3::new(3.0, 2.0, 1.0);
    let v = Vec3::new(5.0, 6.0, 7.0);

    assert_eq!(p + v, Point3::new(8.0, 8.0, 8.0));
    assert_eq!(p - v, Point3::new(-2.0, -4.0, -6.0));
}

#[test]
fn magnitude_is_direction_independent() {
    assert_eq!(Vec3::new(1.0, 2.0, 3.0).magnitude(), f64::sqrt(14.0));
    assert_eq!(Vec3::new(-1.0, -2.0, -3.0).magnitude(), f64::sqrt(14.0));
}

#[test]
fn normalize_produces_unit_vector() {
    let v = Vec3::new(4.0, 0.0, 0.0);
    assert_eq!(v.normalize(), Vec3::new(1.0, 0.0, 0.0));

    let v = Vec3::new(1.0, 2.0, 3.0);
    assert!(feq(v.normalize().magnitude(), 1.0));
}

#[test]
fn dot_vectors() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(2.0, 3.0, 4.0);

    assert_eq!(a.dot(&b), 20.0);
}

#[test]
fn cross_vectors() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(2.0, 3.0, 4.0);

    assert_eq!(a.cross(&b), Vec3::new(-1.0, 2.0, -1.0));
    assert_eq!(b.cross(&a), Vec3::new(1.0, -2.0, 1.0));
}

#[test]
fn mirror_head_on() {
    // A light vector straight along the normal reflects onto itself.
    let l = Vec3::new(0.0, 0.0, 1.0);
    let n = Vec3::new(0.0, 0.0, 1.0);

    assert_eq!(l.mirror(&n), Vec3::new(0.0, 0.0, 1.0));
}

#[test]
fn mirror_45_degrees() {
    let l = Vec3::new(1.0, 1.0, 0.0).normalize();
    let n = Vec3::new(0.0, 1.0, 0.0);
    let r = l.mirror(&n);

    assert_eq!(r, Vec3::new(-1.0, 1.0, 0.0).normalize());
}
