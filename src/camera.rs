use crate::consts::{ DEFAULT_FOVY, DEFAULT_NEAR };
use crate::ray::Ray;
use crate::vec::{ Vec3, Point3 };

/// A camera described by a minimal view specification.
///
/// The eye/look/up triple plus a vertical field of view and near-plane
/// distance fully determine the view; `look` and `up` need not be unit
/// length, and `up` need not be orthogonal to `look`. The aspect ratio is
/// only valid after `setup` has been called for the output resolution.
///
/// The (u, v, n) basis is derived state: it is recomputed from the current
/// parameters for every ray, so mutating any field takes effect on the next
/// ray without further ceremony, and ray generation stays `&self` for
/// worker threads.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Point3,
    pub look: Vec3,
    pub up: Vec3,

    /// Vertical field of view angle, in degrees.
    pub fovy: f64,

    /// Near plane distance.
    pub near: f64,

    /// Aspect ratio (width/height), set by `setup`.
    pub aspect: f64,
}

impl Default for Camera {
    fn default() -> Camera {
        Camera {
            eye: Point3::origin(),
            look: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::new(0.0, 1.0, 0.0),
            fovy: DEFAULT_FOVY,
            near: DEFAULT_NEAR,
            aspect: 1.0,
        }
    }
}

impl Camera {
    pub fn new(eye: Point3, look: Vec3, up: Vec3, fovy: f64, near: f64)
        -> Camera {
        Camera { eye, look, up, fovy, near, aspect: 1.0 }
    }

    /// Fixes the aspect ratio for an output resolution. Must be called
    /// before generating rays for that resolution.
    pub fn setup(&mut self, width: usize, height: usize) {
        self.aspect = width as f64 / height as f64;
    }

    /// Computes the camera basis (u, v, n) from the current parameters.
    ///
    /// n is the normalized negated look direction. v is the component of
    /// `up` orthogonal to n, scaled to half the near-plane image height
    /// H = near·tan(fovy/2); u is v × n scaled to half the image width
    /// W = H·aspect. Pure function of camera state: calling it twice
    /// without mutating the camera yields bit-identical results.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let n = (-self.look).normalize();

        // Length of u and v
        let h = self.near * (self.fovy / 2.0).to_radians().tan();
        let w = h * self.aspect;

        // v = up - n (up . n)
        let v = (n * (-self.up.dot(&n)) + self.up).normalize();
        let u = v.cross(&n).normalize();

        (u * w, v * h, n)
    }

    /// Constructs the ray through pixel (x, y), with x and y in [-1, 1].
    ///
    /// Out-of-range coordinates are allowed and extrapolate past the
    /// frustum edges. The ray origin sits `near` below the eye along the
    /// *global* z axis, not along the view axis.
    pub fn pixel_ray(&self, x: f64, y: f64) -> Ray {
        let (u, v, n) = self.basis();

        let origin = Point3::new(self.eye.x, self.eye.y, self.eye.z - self.near);
        let direction = (u * x + v * y - n * self.near).normalize();

        Ray::new(origin, direction)
    }
}

/* Tests */

#[cfg(test)]
use crate::feq;

#[test]
fn central_ray_points_down_view_axis() {
    let mut c = Camera::default();
    c.setup(100, 100);

    let r = c.pixel_ray(0.0, 0.0);
    let (_, _, n) = c.basis();

    // With up already orthogonal to look, the central ray is -n exactly.
    assert_eq!(r.direction, -n.normalize());
    assert_eq!(r.direction, Vec3::new(0.0, 0.0, -1.0));
}

#[test]
fn ray_origin_is_offset_along_global_z() {
    let mut c = Camera::default();
    c.eye = Point3::new(1.0, 2.0, 3.0);
    c.look = Vec3::new(1.0, 0.0, 0.0);
    c.near = 2.0;
    c.setup(100, 100);

    // The offset tracks global z even though the view axis points along x.
    let r = c.pixel_ray(0.0, 0.0);
    assert_eq!(r.origin, Point3::new(1.0, 2.0, 1.0));
}

#[test]
fn ray_directions_are_unit_length() {
    let mut c = Camera::default();
    c.eye = Point3::new(0.0, 1.0, 5.0);
    c.look = Vec3::new(0.3, -0.2, -1.0);
    c.up = Vec3::new(0.1, 1.0, 0.0);
    c.fovy = 65.0;
    c.setup(640, 480);

    for &(x, y) in &[(0.0, 0.0), (-1.0, -1.0), (1.0, 1.0), (0.5, -0.25),
                     (-2.0, 3.0)] {
        let r = c.pixel_ray(x, y);
        assert!(feq(r.direction.magnitude(), 1.0));
    }
}

#[test]
fn basis_is_idempotent() {
    let mut c = Camera::default();
    c.look = Vec3::new(0.2, -0.4, -1.0);
    c.up = Vec3::new(0.0, 1.0, 0.1);
    c.setup(320, 240);

    let (u1, v1, n1) = c.basis();
    let (u2, v2, n2) = c.basis();

    // Bit-identical, not merely approximately equal.
    assert_eq!((u1.x, u1.y, u1.z), (u2.x, u2.y, u2.z));
    assert_eq!((v1.x, v1.y, v1.z), (v2.x, v2.y, v2.z));
    assert_eq!((n1.x, n1.y, n1.z), (n2.x, n2.y, n2.z));
}

#[test]
fn basis_orthogonalizes_up_against_n() {
    let mut c = Camera::default();

    // A deliberately skewed up vector.
    c.up = Vec3::new(0.0, 1.0, -0.5);
    c.setup(100, 100);

    let (u, v, n) = c.basis();
    assert!(feq(v.dot(&n), 0.0));
    assert!(feq(u.dot(&v), 0.0));
    assert!(feq(u.dot(&n), 0.0));
}

#[test]
fn basis_scales_with_fovy_and_aspect() {
    let mut c = Camera::default();
    c.fovy = 90.0;
    c.setup(200, 100);

    let (u, v, _) = c.basis();

    // H = near * tan(45 deg) = 1, W = H * aspect = 2.
    assert!(feq(v.magnitude(), 1.0));
    assert!(feq(u.magnitude(), 2.0));
}

#[test]
fn aspect_changes_take_effect_on_next_ray() {
    let mut c = Camera::default();
    c.setup(100, 100);
    let (u_square, _, _) = c.basis();

    c.setup(200, 100);
    let (u_wide, _, _) = c.basis();

    assert!(feq(u_wide.magnitude(), 2.0 * u_square.magnitude()));
}
