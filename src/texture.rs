use crate::color::Color;

/// A procedural texture sampled in surface (u, v) space.
///
/// Shapes report a (u, v) pair with every hit; a material carrying one of
/// these samplers modulates its ambient and diffuse terms by the sampled
/// color (specular highlights keep the light's color and are left alone).
#[derive(Clone, Debug, PartialEq)]
pub enum Texture {
    /// An alternating checkerboard. `scale` is the number of cells per unit
    /// of (u, v); cells where floor(u·scale) + floor(v·scale) is even get
    /// the primary color.
    Checker {
        primary: Color,
        secondary: Color,
        scale: f64,
    },

    /// A linear blend from `start` at u = 0 to `end` at u = 1.
    Gradient {
        start: Color,
        end: Color,
    },
}

impl Texture {
    pub fn checker(primary: Color, secondary: Color, scale: f64) -> Texture {
        Texture::Checker { primary, secondary, scale }
    }

    pub fn gradient(start: Color, end: Color) -> Texture {
        Texture::Gradient { start, end }
    }

    pub fn sample(&self, u: f64, v: f64) -> Color {
        match *self {
            Texture::Checker { primary, secondary, scale } => {
                let cell = (u * scale).floor() + (v * scale).floor();
                if cell.rem_euclid(2.0) < 1.0 {
                    primary
                } else {
                    secondary
                }
            },

            Texture::Gradient { start, end } => {
                let frac = u.clamp(0.0, 1.0);
                start * (1.0 - frac) + end * frac
            },
        }
    }
}

/* Tests */

#[test]
fn checker_alternates_along_u() {
    let t = Texture::checker(Color::white(), Color::black(), 1.0);

    assert_eq!(t.sample(0.5, 0.5), Color::white());
    assert_eq!(t.sample(1.5, 0.5), Color::black());
    assert_eq!(t.sample(2.5, 0.5), Color::white());
}

#[test]
fn checker_alternates_along_v() {
    let t = Texture::checker(Color::white(), Color::black(), 1.0);

    assert_eq!(t.sample(0.5, 1.5), Color::black());
    assert_eq!(t.sample(0.5, 2.5), Color::white());
}

#[test]
fn checker_scale_shrinks_cells() {
    let t = Texture::checker(Color::white(), Color::black(), 4.0);

    assert_eq!(t.sample(0.1, 0.0), Color::white());
    assert_eq!(t.sample(0.3, 0.0), Color::black());
}

#[test]
fn checker_handles_negative_coordinates() {
    let t = Texture::checker(Color::white(), Color::black(), 1.0);

    assert_eq!(t.sample(-0.5, 0.5), Color::black());
    assert_eq!(t.sample(-1.5, 0.5), Color::white());
}

#[test]
fn gradient_interpolates_endpoints() {
    let t = Texture::gradient(Color::black(), Color::white());

    assert_eq!(t.sample(0.0, 0.0), Color::black());
    assert_eq!(t.sample(1.0, 0.0), Color::white());
    assert_eq!(t.sample(0.5, 0.0), Color::rgb(0.5, 0.5, 0.5));
}
