use anyhow::{ anyhow, Result };

use crate::vec::{ Vec3, Point3 };
use crate::matrix::Matrix4;
use crate::ray::Ray;

/// Geometry for a triangle, with the edge vectors and face normal
/// precomputed at construction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TriangleInfo {
    pub p1: Point3,
    pub p2: Point3,
    pub p3: Point3,

    pub e1: Vec3,
    pub e2: Vec3,
    pub normal: Vec3,
}

impl TriangleInfo {
    pub fn new(p1: Point3, p2: Point3, p3: Point3) -> TriangleInfo {
        let e1 = p2 - p1;
        let e2 = p3 - p1;
        let normal = e1.cross(&e2).normalize();

        TriangleInfo { p1, p2, p3, e1, e2, normal }
    }
}

/// The kinds of primitive a `Shape` can be. All are defined in object
/// space; the instance matrix places them in the world.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeKind {
    /// A unit sphere centered at the object-space origin.
    Sphere,

    /// The plane y = 0, stretching indefinitely along X and Z.
    Plane,

    /// A triangle defined by three object-space points.
    Triangle(TriangleInfo),
}

/// A hit reported by a shape, entirely in the shape's object space.
///
/// The nearest-hit search is responsible for carrying the point and normal
/// back into world space through the shape's forward and inverse-transpose
/// matrices.
#[derive(Copy, Clone, Debug)]
pub struct LocalHit {
    pub t: f64,
    pub point: Point3,
    pub normal: Vec3,
    pub u: f64,
    pub v: f64,
}

/// A shape instance in the scene.
///
/// The three matrices are always set together through `set_matrix`, so the
/// inverse and inverse-transpose can never drift out of sync with the
/// forward transform. `material` is the index of the resolved material in
/// the scene registry; it is bound when the shape is added to the scene.
#[derive(Clone, Debug)]
pub struct Shape {
    pub kind: ShapeKind,

    /// The material name as written in the scene description. Empty means
    /// the registry default.
    pub material_name: String,

    /// Index of the resolved material in the scene's registry.
    pub material: usize,

    matrix: Matrix4,
    inverse: Matrix4,
    inverse_transpose: Matrix4,
}

impl Shape {
    fn with_kind(kind: ShapeKind) -> Shape {
        Shape {
            kind,
            material_name: String::new(),
            material: 0,
            matrix: Matrix4::identity(),
            inverse: Matrix4::identity(),
            inverse_transpose: Matrix4::identity(),
        }
    }

    /// Creates a unit sphere with an identity transform.
    pub fn sphere() -> Shape {
        Shape::with_kind(ShapeKind::Sphere)
    }

    /// Creates the y = 0 plane with an identity transform.
    pub fn plane() -> Shape {
        Shape::with_kind(ShapeKind::Plane)
    }

    /// Creates a triangle from three object-space points.
    pub fn triangle(p1: Point3, p2: Point3, p3: Point3) -> Shape {
        Shape::with_kind(ShapeKind::Triangle(TriangleInfo::new(p1, p2, p3)))
    }

    /// Installs the instance transform, deriving the inverse and
    /// inverse-transpose. Fails on singular transforms, which would leave
    /// the shape unreachable by any ray.
    pub fn set_matrix(&mut self, m: Matrix4) -> Result<()> {
        let inverse = m.inverse()
            .ok_or_else(|| anyhow!("shape transform is not invertible"))?;

        self.matrix = m;
        self.inverse_transpose = inverse.transpose();
        self.inverse = inverse;
        Ok(())
    }

    pub fn matrix(&self) -> &Matrix4 {
        &self.matrix
    }

    pub fn inverse(&self) -> &Matrix4 {
        &self.inverse
    }

    pub fn inverse_transpose(&self) -> &Matrix4 {
        &self.inverse_transpose
    }

    /// Probes for a hit with parameter in `[epsilon, max_t]`, reporting
    /// only the parameter. `ray` must already be in this shape's object
    /// space.
    pub fn probe(&self, ray: &Ray, epsilon: f64, max_t: f64) -> Option<f64> {
        self.hit(ray, epsilon, max_t).map(|h| h.t)
    }

    /// Tests for the nearest hit with parameter in `[epsilon, max_t]` and
    /// fills the full object-space hit record. `ray` must already be in
    /// this shape's object space.
    pub fn hit(&self, ray: &Ray, epsilon: f64, max_t: f64) -> Option<LocalHit> {
        match self.kind {
            ShapeKind::Sphere => sphere_hit(ray, epsilon, max_t),
            ShapeKind::Plane => plane_hit(ray, epsilon, max_t),
            ShapeKind::Triangle(ref info) => triangle_hit(info, ray, epsilon, max_t),
        }
    }
}

fn sphere_hit(ray: &Ray, epsilon: f64, max_t: f64) -> Option<LocalHit> {
    let to_sphere = ray.origin - Point3::origin();

    let a = ray.direction.dot(&ray.direction);
    let half_b = to_sphere.dot(&ray.direction);
    let c = to_sphere.dot(&to_sphere) - 1.0;

    let discriminant = half_b * half_b - a * c;
    if discriminant < 0.0 {
        return None;
    }

    // Prefer the closer root; fall back to the far one when the origin is
    // inside the sphere or the near root sits below epsilon.
    let sqrt_d = discriminant.sqrt();
    let t_near = (-half_b - sqrt_d) / a;
    let t_far = (-half_b + sqrt_d) / a;

    let t = if t_near >= epsilon && t_near <= max_t {
        t_near
    } else if t_far >= epsilon && t_far <= max_t {
        t_far
    } else {
        return None;
    };

    let point = ray.position(t);
    let normal = point - Point3::origin();
    let (u, v) = sphere_uv(&normal);

    Some(LocalHit { t, point, normal, u, v })
}

/// Latitude/longitude texture coordinates for a point on the unit sphere.
fn sphere_uv(normal: &Vec3) -> (f64, f64) {
    let u = 0.5 + normal.z.atan2(normal.x) / (2.0 * std::f64::consts::PI);
    let v = 0.5 + normal.y.clamp(-1.0, 1.0).asin() / std::f64::consts::PI;

    (u, v)
}

fn plane_hit(ray: &Ray, epsilon: f64, max_t: f64) -> Option<LocalHit> {
    // A ray parallel to the plane never crosses it.
    if ray.direction.y.abs() < 1e-12 {
        return None;
    }

    let t = -ray.origin.y / ray.direction.y;
    if t < epsilon || t > max_t {
        return None;
    }

    let point = ray.position(t);

    Some(LocalHit {
        t,
        point,
        normal: Vec3::new(0.0, 1.0, 0.0),
        u: point.x,
        v: point.z,
    })
}

fn triangle_hit(info: &TriangleInfo, ray: &Ray, epsilon: f64, max_t: f64)
    -> Option<LocalHit> {
    // Moller-Trumbore.
    let dir_cross_e2 = ray.direction.cross(&info.e2);
    let det = info.e1.dot(&dir_cross_e2);
    if det.abs() < 1e-12 {
        return None;
    }

    let f = 1.0 / det;
    let p1_to_origin = ray.origin - info.p1;
    let u = f * p1_to_origin.dot(&dir_cross_e2);
    if u < 0.0 || u > 1.0 {
        return None;
    }

    let origin_cross_e1 = p1_to_origin.cross(&info.e1);
    let v = f * ray.direction.dot(&origin_cross_e1);
    if v < 0.0 || (u + v) > 1.0 {
        return None;
    }

    let t = f * info.e2.dot(&origin_cross_e1);
    if t < epsilon || t > max_t {
        return None;
    }

    Some(LocalHit {
        t,
        point: ray.position(t),
        normal: info.normal,
        u,
        v,
    })
}

/* Tests */

#[cfg(test)]
use crate::feq;

#[test]
fn ray_pierces_sphere() {
    let s = Shape::sphere();
    let r = Ray::new(Point3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));

    let hit = s.hit(&r, 1e-5, f64::INFINITY).unwrap();
    assert_eq!(hit.t, 4.0);
    assert_eq!(hit.point, Point3::new(0.0, 0.0, -1.0));
    assert_eq!(hit.normal, Vec3::new(0.0, 0.0, -1.0));
}

#[test]
fn ray_inside_sphere_hits_far_wall() {
    let s = Shape::sphere();
    let r = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, 1.0));

    let hit = s.hit(&r, 1e-5, f64::INFINITY).unwrap();
    assert_eq!(hit.t, 1.0);
}

#[test]
fn sphere_behind_ray_misses() {
    let s = Shape::sphere();
    let r = Ray::new(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));

    assert!(s.hit(&r, 1e-5, f64::INFINITY).is_none());
}

#[test]
fn sphere_beyond_max_t_misses() {
    let s = Shape::sphere();
    let r = Ray::new(Point3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));

    assert!(s.hit(&r, 1e-5, 3.0).is_none());
    assert!(s.hit(&r, 1e-5, 4.5).is_some());
}

#[test]
fn probe_matches_hit_parameter() {
    let s = Shape::sphere();
    let r = Ray::new(Point3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));

    assert_eq!(s.probe(&r, 1e-5, f64::INFINITY), Some(4.0));
}

#[test]
fn sphere_uv_covers_poles_and_equator() {
    let (u, v) = sphere_uv(&Vec3::new(1.0, 0.0, 0.0));
    assert!(feq(u, 0.5) && feq(v, 0.5));

    let (_, v) = sphere_uv(&Vec3::new(0.0, 1.0, 0.0));
    assert!(feq(v, 1.0));

    let (_, v) = sphere_uv(&Vec3::new(0.0, -1.0, 0.0));
    assert!(feq(v, 0.0));
}

#[test]
fn ray_crosses_plane() {
    let s = Shape::plane();
    let r = Ray::new(Point3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));

    let hit = s.hit(&r, 1e-5, f64::INFINITY).unwrap();
    assert_eq!(hit.t, 1.0);
    assert_eq!(hit.normal, Vec3::new(0.0, 1.0, 0.0));
}

#[test]
fn parallel_ray_misses_plane() {
    let s = Shape::plane();
    let r = Ray::new(Point3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0));

    assert!(s.hit(&r, 1e-5, f64::INFINITY).is_none());
}

#[test]
fn plane_uv_is_local_xz() {
    let s = Shape::plane();
    let r = Ray::new(Point3::new(1.5, 1.0, -2.5), Vec3::new(0.0, -1.0, 0.0));

    let hit = s.hit(&r, 1e-5, f64::INFINITY).unwrap();
    assert!(feq(hit.u, 1.5));
    assert!(feq(hit.v, -2.5));
}

#[test]
fn ray_strikes_triangle() {
    let s = Shape::triangle(
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(-1.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
    );
    let r = Ray::new(Point3::new(0.0, 0.5, -2.0), Vec3::new(0.0, 0.0, 1.0));

    let hit = s.hit(&r, 1e-5, f64::INFINITY).unwrap();
    assert_eq!(hit.t, 2.0);
}

#[test]
fn ray_misses_triangle_edges() {
    let s = Shape::triangle(
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(-1.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
    );

    // Past the p1-p3 edge.
    let r = Ray::new(Point3::new(1.0, 1.0, -2.0), Vec3::new(0.0, 0.0, 1.0));
    assert!(s.hit(&r, 1e-5, f64::INFINITY).is_none());

    // Past the p1-p2 edge.
    let r = Ray::new(Point3::new(-1.0, 1.0, -2.0), Vec3::new(0.0, 0.0, 1.0));
    assert!(s.hit(&r, 1e-5, f64::INFINITY).is_none());

    // Below the base.
    let r = Ray::new(Point3::new(0.0, -1.0, -2.0), Vec3::new(0.0, 0.0, 1.0));
    assert!(s.hit(&r, 1e-5, f64::INFINITY).is_none());
}

#[test]
fn triangle_reports_barycentric_uv() {
    let s = Shape::triangle(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    );
    let r = Ray::new(Point3::new(0.25, 0.25, -1.0), Vec3::new(0.0, 0.0, 1.0));

    let hit = s.hit(&r, 1e-5, f64::INFINITY).unwrap();
    assert!(feq(hit.u, 0.25));
    assert!(feq(hit.v, 0.25));
}

#[test]
fn epsilon_rejects_grazing_self_hit() {
    let s = Shape::plane();

    // Origin on the plane itself; the only crossing is at t = 0.
    let r = Ray::new(Point3::origin(), Vec3::new(0.0, -1.0, 0.0));
    assert!(s.hit(&r, 1e-5, f64::INFINITY).is_none());
}

#[test]
fn set_matrix_rejects_singular_transform() {
    let mut s = Shape::sphere();

    assert!(s.set_matrix(Matrix4::scaling(1.0, 0.0, 1.0)).is_err());
    assert!(s.set_matrix(Matrix4::scaling(2.0, 2.0, 2.0)).is_ok());
}

#[test]
fn matrices_stay_in_sync() {
    let mut s = Shape::sphere();
    s.set_matrix(Matrix4::scaling(2.0, 2.0, 2.0)).unwrap();

    assert_eq!(*s.inverse(), Matrix4::scaling(0.5, 0.5, 0.5));
    assert_eq!(*s.inverse_transpose(), Matrix4::scaling(0.5, 0.5, 0.5));
}
