use crate::vec::{ Vec3, Point3 };
use crate::shape::Shape;

/// The record a successful nearest-hit search produces.
///
/// The hit point has been carried into world space through the shape's
/// forward matrix; the normal is the normalized object-space normal pushed
/// through the shape's inverse-transpose. Each ray query owns its own
/// `ISect` — nothing here is shared between pixels.
#[derive(Copy, Clone, Debug)]
pub struct ISect<'a> {
    /// Hit parameter along the probing ray, in that ray's object-space
    /// parameterization.
    pub t: f64,

    /// World-space hit point.
    pub point: Point3,

    pub normal: Vec3,

    /// Surface texture coordinates.
    pub u: f64,
    pub v: f64,

    /// The shape that was hit.
    pub shape: &'a Shape,
}

/* Tests */

#[test]
fn isect_borrows_its_shape() {
    let s = Shape::sphere();
    let i = ISect {
        t: 4.0,
        point: Point3::new(0.0, 0.0, -1.0),
        normal: Vec3::new(0.0, 0.0, -1.0),
        u: 0.0,
        v: 0.5,
        shape: &s,
    };

    assert!(std::ptr::eq(i.shape, &s));
    assert_eq!(i.t, 4.0);
}
