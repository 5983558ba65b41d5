use crate::color::Color;
use crate::vec::{ Vec3, Point3 };
use crate::matrix::Matrix4;
use crate::material::Material;
use crate::intersect::ISect;
use crate::ray::Ray;

/// Where a light sits: infinitely far away along a direction, or at a
/// position in the scene.
///
/// The two are mutually exclusive by construction; calling `set_position`
/// or `set_direction` replaces whichever variant was active before.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LightKind {
    /// Unit vector pointing from surfaces toward the light.
    Directional(Vec3),

    /// Light position; intensity falls off with the attenuation triple.
    Positional(Point3),
}

/// A light source.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Light {
    kind: LightKind,

    /// Light color (R, G, B).
    pub color: Color,

    /// Attenuation coefficients (Kc, Kl, Kq); the default attenuates
    /// nothing. Only meaningful for positional lights, but the evaluation
    /// runs it for directional lights too, where Kc keeps the divisor
    /// non-zero.
    pub attenuation: Vec3,
}

impl Default for Light {
    fn default() -> Light {
        Light::positional(Point3::origin())
    }
}

impl Light {
    pub fn directional(direction: Vec3) -> Light {
        Light {
            kind: LightKind::Directional(direction.normalize()),
            color: Color::white(),
            attenuation: Vec3::new(1.0, 0.0, 0.0),
        }
    }

    pub fn positional(position: Point3) -> Light {
        Light {
            kind: LightKind::Positional(position),
            color: Color::white(),
            attenuation: Vec3::new(1.0, 0.0, 0.0),
        }
    }

    pub fn kind(&self) -> &LightKind {
        &self.kind
    }

    pub fn is_directional(&self) -> bool {
        matches!(self.kind, LightKind::Directional(_))
    }

    /// Makes this a positional light, clearing any direction.
    pub fn set_position(&mut self, position: Point3) {
        self.kind = LightKind::Positional(position);
    }

    /// Makes this a directional light, clearing any position. The
    /// direction is always stored normalized.
    pub fn set_direction(&mut self, direction: Vec3) {
        self.kind = LightKind::Directional(direction.normalize());
    }

    /// Carries the light's location through a transform, as the scene's
    /// transform stack is applied at insertion time.
    pub fn transform(&mut self, m: &Matrix4) {
        self.kind = match self.kind {
            LightKind::Directional(d) => {
                LightKind::Directional(m.transform_vector(&d))
            },
            LightKind::Positional(p) => {
                LightKind::Positional(m.transform_point(&p))
            },
        };
    }

    /// Evaluates this light's Phong contribution at an intersection.
    ///
    /// `tint` is the fraction of the light let through by intervening
    /// objects, per channel, as computed by the shadow ray; it scales the
    /// diffuse and specular terms but never the ambient. `ray` is the ray
    /// that produced the intersection, traced back to recover the view
    /// vector.
    ///
    /// Attenuation is evaluated per channel from the raw (unnormalized)
    /// light displacement components, not from the scalar distance.
    pub fn compute(&self, isect: &ISect, mat: &Material, tint: Color, ray: &Ray)
        -> Color {
        let hit = isect.point;

        // Unnormalized vector toward the light.
        let l_raw = match self.kind {
            LightKind::Directional(d) => d,
            LightKind::Positional(p) => p - hit,
        };

        let at = &self.attenuation;
        let atten = Color::rgb(
            1.0 / (at.x + at.y * l_raw.x + at.z * (l_raw.x * l_raw.x)),
            1.0 / (at.x + at.y * l_raw.y + at.z * (l_raw.y * l_raw.y)),
            1.0 / (at.x + at.y * l_raw.z + at.z * (l_raw.z * l_raw.z)),
        );

        // Surface normal mapped through the inverse-transpose so normals
        // stay perpendicular under non-uniform scaling.
        let n = isect.shape.inverse_transpose()
            .transform_vector(&isect.normal)
            .normalize();
        let l = l_raw.normalize();
        let v = (ray.origin - hit).normalize();
        let r = l.mirror(&n).normalize();

        let n_dot_l = n.dot(&l);
        let r_dot_v = r.dot(&v);

        // Back-facing contributions clamp to zero, never negative.
        let mut ambient = mat.ambient;
        let mut diffuse = mat.diffuse * atten * tint * n_dot_l.max(0.0);
        let specular = mat.specular * atten * tint
            * r_dot_v.max(0.0).powf(mat.shininess);

        if mat.has_texture() {
            let sample = mat.sample_texture(isect.u, isect.v);
            ambient = ambient * sample;
            diffuse = diffuse * sample;
        }

        ambient + diffuse + specular
    }
}

/* Tests */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;
    use crate::texture::Texture;

    fn isect_at_origin(shape: &Shape, normal: Vec3) -> ISect<'_> {
        ISect {
            t: 1.0,
            point: Point3::origin(),
            normal,
            u: 0.5,
            v: 0.5,
            shape,
        }
    }

    fn matte(diffuse: Color) -> Material {
        let mut m = Material::named("matte");
        m.ambient = Color::black();
        m.diffuse = diffuse;
        m.specular = Color::black();
        m
    }

    #[test]
    fn setters_are_mutually_exclusive() {
        let mut light = Light::positional(Point3::new(1.0, 2.0, 3.0));
        assert!(!light.is_directional());

        light.set_direction(Vec3::new(0.0, 0.0, -1.0));
        assert!(light.is_directional());

        light.set_position(Point3::origin());
        assert!(!light.is_directional());
    }

    #[test]
    fn direction_is_stored_normalized() {
        let light = Light::directional(Vec3::new(0.0, 0.0, -5.0));

        assert_eq!(*light.kind(), LightKind::Directional(Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn transform_moves_position() {
        let mut light = Light::positional(Point3::origin());
        light.transform(&Matrix4::translation(0.0, 5.0, 0.0));

        assert_eq!(*light.kind(), LightKind::Positional(Point3::new(0.0, 5.0, 0.0)));
    }

    #[test]
    fn transform_rotates_direction_ignoring_translation() {
        let mut light = Light::directional(Vec3::new(0.0, 0.0, -1.0));
        light.transform(&Matrix4::translation(10.0, 10.0, 10.0));

        assert_eq!(*light.kind(), LightKind::Directional(Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn head_on_directional_diffuse() {
        let shape = Shape::sphere();
        let isect = isect_at_origin(&shape, Vec3::new(0.0, 0.0, -1.0));
        let light = Light::directional(Vec3::new(0.0, 0.0, -1.0));
        let mat = matte(Color::rgb(1.0, 0.0, 0.0));
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        let c = light.compute(&isect, &mat, Color::white(), &ray);
        assert_eq!(c, Color::rgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn back_facing_light_contributes_only_ambient() {
        let shape = Shape::sphere();
        let isect = isect_at_origin(&shape, Vec3::new(0.0, 0.0, 1.0));
        let light = Light::directional(Vec3::new(0.0, 0.0, -1.0));

        let mut mat = matte(Color::white());
        mat.ambient = Color::rgb(0.2, 0.2, 0.2);

        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let c = light.compute(&isect, &mat, Color::white(), &ray);

        assert_eq!(c, Color::rgb(0.2, 0.2, 0.2));
    }

    #[test]
    fn attenuation_uses_raw_displacement_per_channel() {
        let shape = Shape::sphere();
        let isect = isect_at_origin(&shape, Vec3::new(1.0, 0.0, 0.0));

        // Light two units along x; linear falloff only. The x channel sees
        // a displacement of 2, y and z see 0, so the attenuation triple is
        // (1/3, 1, 1) even though the distance is the same for all three.
        let mut light = Light::positional(Point3::new(2.0, 0.0, 0.0));
        light.attenuation = Vec3::new(1.0, 1.0, 0.0);

        let mat = matte(Color::white());
        let ray = Ray::new(Point3::new(5.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));

        let c = light.compute(&isect, &mat, Color::white(), &ray);
        assert_eq!(c, Color::rgb(1.0 / 3.0, 1.0, 1.0));
    }

    #[test]
    fn tint_scales_diffuse_but_not_ambient() {
        let shape = Shape::sphere();
        let isect = isect_at_origin(&shape, Vec3::new(0.0, 0.0, -1.0));
        let light = Light::directional(Vec3::new(0.0, 0.0, -1.0));

        let mut mat = matte(Color::white());
        mat.ambient = Color::rgb(0.1, 0.1, 0.1);

        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let c = light.compute(&isect, &mat, Color::black(), &ray);

        assert_eq!(c, Color::rgb(0.1, 0.1, 0.1));
    }

    #[test]
    fn half_tint_halves_diffuse() {
        let shape = Shape::sphere();
        let isect = isect_at_origin(&shape, Vec3::new(0.0, 0.0, -1.0));
        let light = Light::directional(Vec3::new(0.0, 0.0, -1.0));
        let mat = matte(Color::white());
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        let c = light.compute(&isect, &mat, Color::rgb(0.5, 0.5, 0.5), &ray);
        assert_eq!(c, Color::rgb(0.5, 0.5, 0.5));
    }

    #[test]
    fn texture_modulates_ambient_and_diffuse_not_specular() {
        let shape = Shape::sphere();
        let isect = ISect {
            t: 1.0,
            point: Point3::origin(),
            normal: Vec3::new(0.0, 0.0, -1.0),
            // Sits in a black checker cell.
            u: 1.5,
            v: 0.5,
            shape: &shape,
        };

        let light = Light::directional(Vec3::new(0.0, 0.0, -1.0));

        let mut mat = Material::named("tiles");
        mat.ambient = Color::rgb(0.3, 0.3, 0.3);
        mat.diffuse = Color::white();
        mat.specular = Color::rgb(0.4, 0.4, 0.4);
        mat.shininess = 1.0;
        mat.texture = Some(Texture::checker(Color::white(), Color::black(), 1.0));

        // Eye along the reflection direction: r = l = (0,0,-1), v = (0,0,-1).
        let ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        let c = light.compute(&isect, &mat, Color::white(), &ray);

        // Ambient and diffuse are wiped out by the black sample; the
        // specular term survives untouched.
        assert_eq!(c, Color::rgb(0.4, 0.4, 0.4));
    }

    #[test]
    fn zero_attenuation_divisor_propagates_non_finite() {
        let shape = Shape::sphere();
        let isect = isect_at_origin(&shape, Vec3::new(0.0, 0.0, -1.0));

        let mut light = Light::positional(Point3::new(0.0, 0.0, -3.0));
        light.attenuation = Vec3::new(0.0, 0.0, 0.0);

        let mat = matte(Color::white());
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        // A misconfigured divisor of zero must surface as inf/NaN rather
        // than masquerading as a plausible color.
        let c = light.compute(&isect, &mat, Color::white(), &ray);
        assert!(!c.is_finite());
    }
}
