use crate::color::Color;
use crate::texture::Texture;

/// A named Phong material.
///
/// Coefficients are per-channel colors rather than scalars, so a material
/// can reflect red diffusely while leaving green and blue dark. The
/// transmission coefficient `kt` is what shadow rays accumulate when this
/// material occludes a light: black is fully opaque, white lets everything
/// through.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,

    /// Ambient coefficient (Ka). Never attenuated or tinted.
    pub ambient: Color,

    /// Diffuse coefficient (Kd).
    pub diffuse: Color,

    /// Specular coefficient (Ks).
    pub specular: Color,

    /// Specular exponent.
    pub shininess: f64,

    /// Transmission coefficient (Kt).
    pub transmission: Color,

    pub texture: Option<Texture>,
}

impl Default for Material {
    fn default() -> Material {
        Material::named("default")
    }
}

impl Material {
    /// Creates a material with the given registry name and stock Phong
    /// coefficients.
    pub fn named(name: &str) -> Material {
        Material {
            name: name.to_string(),

            ambient: Color::rgb(0.1, 0.1, 0.1),
            diffuse: Color::rgb(0.9, 0.9, 0.9),
            specular: Color::rgb(0.9, 0.9, 0.9),
            shininess: 200.0,

            transmission: Color::black(),
            texture: None,
        }
    }

    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }

    /// Samples the texture at surface coordinates (u, v).
    ///
    /// Materials without a texture sample as white, which leaves any
    /// modulated term unchanged.
    pub fn sample_texture(&self, u: f64, v: f64) -> Color {
        match self.texture {
            Some(ref t) => t.sample(u, v),
            None => Color::white(),
        }
    }
}

/* Tests */

#[test]
fn default_material_is_registry_default() {
    let m: Material = Default::default();

    assert_eq!(m.name, "default");
    assert_eq!(m.transmission, Color::black());
    assert!(!m.has_texture());
}

#[test]
fn untextured_material_samples_white() {
    let m = Material::named("flat");

    assert_eq!(m.sample_texture(0.3, 0.7), Color::white());
}

#[test]
fn textured_material_samples_texture() {
    use crate::texture::Texture;

    let mut m = Material::named("tiles");
    m.texture = Some(Texture::checker(Color::white(), Color::black(), 1.0));

    assert!(m.has_texture());
    assert_eq!(m.sample_texture(0.5, 0.5), Color::white());
    assert_eq!(m.sample_texture(1.5, 0.5), Color::black());
}
