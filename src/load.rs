use std::fs::File;
use std::io::BufReader;

use anyhow::{ anyhow, Context, Result };
use serde::Deserialize;

use crate::camera::Camera;
use crate::color::Color;
use crate::consts::{ DEFAULT_FOVY, DEFAULT_NEAR };
use crate::light::Light;
use crate::material::Material;
use crate::matrix::Matrix4;
use crate::scene::{ Scene, SceneItem };
use crate::shape::Shape;
use crate::texture::Texture;
use crate::vec::{ Vec3, Point3 };

/// Loads a scene from a JSON description file.
///
/// The description is deserialized into plain config structs and fed
/// through `Scene::add_object`, so a hand-built scene and a loaded one go
/// through exactly the same population path. The returned scene has been
/// `setup()` and is ready to render.
pub fn load_scene(path: &str) -> Result<Scene> {
    let file = File::open(path)
        .with_context(|| format!("could not open scene file {}", path))?;
    let reader = BufReader::new(file);

    let config: SceneJson = serde_json::from_reader(reader)
        .context("could not parse scene description")?;

    build_scene(config)
}

fn build_scene(config: SceneJson) -> Result<Scene> {
    let mut scene = Scene::new();

    if let Some(ref camera) = config.camera {
        scene.add_object(SceneItem::Camera(camera.to_camera()))?;
    }

    for material in &config.materials {
        scene.add_object(SceneItem::Material(material.to_material()))?;
    }

    for light in &config.lights {
        scene.add_object(SceneItem::Light(light.to_light()?))?;
    }

    for shape_json in &config.shapes {
        let shape = shape_json.to_shape()?;

        // The shape's transform list composes onto a fresh stack level,
        // which becomes its instance matrix at add time.
        scene.mstack().push();
        for transform in &shape_json.transform {
            let m = transform.to_matrix();
            scene.mstack().apply(m);
        }
        let added = scene.add_object(SceneItem::Shape(shape));
        scene.mstack().pop();
        added?;
    }

    scene.setup()?;
    Ok(scene)
}

/// A small built-in scene for running the tracer without a description
/// file: a checkered floor, two spheres and a triangle under one
/// directional and one positional light.
pub fn example_scene() -> Scene {
    let mut scene = Scene::new();

    let mut floor_mat = Material::named("floor");
    floor_mat.specular = Color::black();
    floor_mat.texture = Some(Texture::checker(
        Color::white(), Color::rgb(0.2, 0.2, 0.2), 0.5));
    scene.add_object(SceneItem::Material(floor_mat)).expect("example scene");

    let mut red = Material::named("red");
    red.diffuse = Color::rgb(0.9, 0.2, 0.2);
    red.specular = Color::rgb(0.4, 0.4, 0.4);
    scene.add_object(SceneItem::Material(red)).expect("example scene");

    let mut glass = Material::named("glass");
    glass.diffuse = Color::rgb(0.2, 0.3, 0.8);
    glass.transmission = Color::rgb(0.7, 0.7, 0.7);
    scene.add_object(SceneItem::Material(glass)).expect("example scene");

    let mut floor = Shape::plane();
    floor.material_name = "floor".to_string();
    scene.mstack().push();
    scene.mstack().apply(Matrix4::translation(0.0, -1.5, 0.0));
    scene.add_object(SceneItem::Shape(floor)).expect("example scene");
    scene.mstack().pop();

    let mut middle = Shape::sphere();
    middle.material_name = "red".to_string();
    scene.mstack().push();
    scene.mstack().apply(Matrix4::translation(-0.6, 0.0, -6.0));
    scene.add_object(SceneItem::Shape(middle)).expect("example scene");
    scene.mstack().pop();

    let mut right = Shape::sphere();
    right.material_name = "glass".to_string();
    scene.mstack().push();
    scene.mstack().apply(Matrix4::translation(1.4, -0.4, -4.5));
    scene.mstack().apply(Matrix4::scaling(0.6, 0.6, 0.6));
    scene.add_object(SceneItem::Shape(right)).expect("example scene");
    scene.mstack().pop();

    let mut fin = Shape::triangle(
        Point3::new(-2.8, -1.5, -7.0),
        Point3::new(-1.6, 1.2, -7.5),
        Point3::new(-0.6, -1.5, -8.0),
    );
    fin.material_name = "red".to_string();
    scene.add_object(SceneItem::Shape(fin)).expect("example scene");

    let mut sun = Light::directional(Vec3::new(-0.3, 0.8, 0.5));
    sun.color = Color::rgb(0.9, 0.9, 0.9);
    scene.add_object(SceneItem::Light(sun)).expect("example scene");

    let mut lamp = Light::positional(Point3::new(3.0, 4.0, -2.0));
    lamp.attenuation = Vec3::new(1.0, 0.05, 0.01);
    scene.add_object(SceneItem::Light(lamp)).expect("example scene");

    scene.setup().expect("example scene");
    scene
}

#[derive(Deserialize, Debug)]
struct SceneJson {
    camera: Option<CameraJson>,

    #[serde(default)]
    materials: Vec<MaterialJson>,

    #[serde(default)]
    lights: Vec<LightJson>,

    #[serde(default)]
    shapes: Vec<ShapeJson>,
}

#[derive(Deserialize, Debug)]
struct CameraJson {
    #[serde(default = "default_eye")]
    eye: [f64; 3],

    #[serde(default = "default_look")]
    look: [f64; 3],

    #[serde(default = "default_up")]
    up: [f64; 3],

    #[serde(default = "default_fovy")]
    fovy: f64,

    #[serde(default = "default_near")]
    near: f64,
}

fn default_eye() -> [f64; 3] { [0.0, 0.0, 0.0] }
fn default_look() -> [f64; 3] { [0.0, 0.0, -1.0] }
fn default_up() -> [f64; 3] { [0.0, 1.0, 0.0] }
fn default_fovy() -> f64 { DEFAULT_FOVY }
fn default_near() -> f64 { DEFAULT_NEAR }
fn default_scale() -> f64 { 1.0 }

impl CameraJson {
    fn to_camera(&self) -> Camera {
        Camera::new(
            self.eye.into(),
            self.look.into(),
            self.up.into(),
            self.fovy,
            self.near,
        )
    }
}

#[derive(Deserialize, Debug)]
struct MaterialJson {
    name: String,
    ambient: Option<[f64; 3]>,
    diffuse: Option<[f64; 3]>,
    specular: Option<[f64; 3]>,
    shininess: Option<f64>,
    transmission: Option<[f64; 3]>,
    texture: Option<TextureJson>,
}

impl MaterialJson {
    /// Builds a material, keeping the stock coefficient for any field the
    /// description leaves out.
    fn to_material(&self) -> Material {
        let mut material = Material::named(&self.name);

        if let Some(ka) = self.ambient { material.ambient = ka.into(); }
        if let Some(kd) = self.diffuse { material.diffuse = kd.into(); }
        if let Some(ks) = self.specular { material.specular = ks.into(); }
        if let Some(shininess) = self.shininess {
            material.shininess = shininess;
        }
        if let Some(kt) = self.transmission { material.transmission = kt.into(); }
        material.texture = self.texture.as_ref().map(|t| t.to_texture());

        material
    }
}

#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "camelCase")]
enum TextureJson {
    Checker {
        primary: [f64; 3],
        secondary: [f64; 3],
        #[serde(default = "default_scale")]
        scale: f64,
    },
    Gradient {
        start: [f64; 3],
        end: [f64; 3],
    },
}

impl TextureJson {
    fn to_texture(&self) -> Texture {
        match *self {
            TextureJson::Checker { primary, secondary, scale } => {
                Texture::checker(primary.into(), secondary.into(), scale)
            },
            TextureJson::Gradient { start, end } => {
                Texture::gradient(start.into(), end.into())
            },
        }
    }
}

#[derive(Deserialize, Debug)]
struct LightJson {
    direction: Option<[f64; 3]>,
    position: Option<[f64; 3]>,
    color: Option<[f64; 3]>,
    attenuation: Option<[f64; 3]>,
}

impl LightJson {
    /// Builds a light. Exactly one of `direction` and `position` must be
    /// present — the two location kinds are mutually exclusive.
    fn to_light(&self) -> Result<Light> {
        let mut light = match (self.direction, self.position) {
            (Some(d), None) => Light::directional(d.into()),
            (None, Some(p)) => Light::positional(p.into()),
            (Some(_), Some(_)) => {
                return Err(anyhow!(
                    "light cannot have both a direction and a position"));
            },
            (None, None) => {
                return Err(anyhow!(
                    "light needs either a direction or a position"));
            },
        };

        if let Some(color) = self.color { light.color = color.into(); }
        if let Some(attenuation) = self.attenuation {
            light.attenuation = attenuation.into();
        }

        Ok(light)
    }
}

#[derive(Deserialize, Debug)]
struct ShapeJson {
    #[serde(rename = "type")]
    ty: String,

    #[serde(default)]
    material: String,

    #[serde(default)]
    transform: Vec<TransformJson>,

    /// Triangle vertices; required for (and only valid on) triangles.
    points: Option<[[f64; 3]; 3]>,
}

impl ShapeJson {
    fn to_shape(&self) -> Result<Shape> {
        let mut shape = match self.ty.as_str() {
            "sphere" => Shape::sphere(),
            "plane" => Shape::plane(),
            "triangle" => {
                let points = self.points.ok_or_else(|| {
                    anyhow!("triangle needs a 'points' array of three vertices")
                })?;
                Shape::triangle(
                    points[0].into(),
                    points[1].into(),
                    points[2].into(),
                )
            },
            other => {
                return Err(anyhow!("unrecognized shape type '{}'", other));
            },
        };

        shape.material_name = self.material.clone();
        Ok(shape)
    }
}

#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "camelCase")]
enum TransformJson {
    Translate { v: [f64; 3] },
    Scale { v: [f64; 3] },
    RotateX { angle: f64 },
    RotateY { angle: f64 },
    RotateZ { angle: f64 },
}

impl TransformJson {
    /// Angles in the description are degrees.
    fn to_matrix(&self) -> Matrix4 {
        match *self {
            TransformJson::Translate { v } => {
                Matrix4::translation(v[0], v[1], v[2])
            },
            TransformJson::Scale { v } => Matrix4::scaling(v[0], v[1], v[2]),
            TransformJson::RotateX { angle } => {
                Matrix4::rotation_x(angle.to_radians())
            },
            TransformJson::RotateY { angle } => {
                Matrix4::rotation_y(angle.to_radians())
            },
            TransformJson::RotateZ { angle } => {
                Matrix4::rotation_z(angle.to_radians())
            },
        }
    }
}

/* Tests */

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Scene> {
        let config: SceneJson = serde_json::from_str(json).unwrap();
        build_scene(config)
    }

    #[test]
    fn minimal_scene_description() {
        let scene = parse(r#"{
            "camera": { "eye": [0, 1, 5], "look": [0, 0, -1] },
            "materials": [
                { "name": "red", "diffuse": [1, 0, 0] }
            ],
            "lights": [
                { "direction": [0, 0, -1] }
            ],
            "shapes": [
                { "type": "sphere", "material": "red" }
            ]
        }"#).unwrap();

        assert_eq!(scene.objects().len(), 1);
        assert_eq!(scene.lights().len(), 1);
        assert_eq!(scene.materials().len(), 2);
        assert_eq!(scene.camera().unwrap().eye, Point3::new(0.0, 1.0, 5.0));
        assert_eq!(scene.objects()[0].material, 1);
    }

    #[test]
    fn omitted_sections_default_to_empty() {
        let scene = parse("{}").unwrap();

        assert!(scene.objects().is_empty());
        assert!(scene.lights().is_empty());
        // setup() installed the default camera.
        assert!(scene.camera().is_some());
    }

    #[test]
    fn shape_transforms_compose_in_listed_order() {
        let scene = parse(r#"{
            "shapes": [{
                "type": "sphere",
                "transform": [
                    { "type": "translate", "v": [0, 5, 0] },
                    { "type": "scale", "v": [2, 2, 2] }
                ]
            }]
        }"#).unwrap();

        let expected = Matrix4::translation(0.0, 5.0, 0.0)
            * Matrix4::scaling(2.0, 2.0, 2.0);
        assert_eq!(*scene.objects()[0].matrix(), expected);
    }

    #[test]
    fn transform_stack_resets_between_shapes() {
        let scene = parse(r#"{
            "shapes": [
                {
                    "type": "sphere",
                    "transform": [{ "type": "translate", "v": [9, 0, 0] }]
                },
                { "type": "sphere" }
            ]
        }"#).unwrap();

        assert_eq!(*scene.objects()[1].matrix(), Matrix4::identity());
    }

    #[test]
    fn triangle_requires_points() {
        let result = parse(r#"{ "shapes": [{ "type": "triangle" }] }"#);

        assert!(result.is_err());
    }

    #[test]
    fn unknown_shape_type_is_an_error() {
        let result = parse(r#"{ "shapes": [{ "type": "torus" }] }"#);

        assert!(result.is_err());
    }

    #[test]
    fn light_location_kinds_are_exclusive() {
        let both = parse(r#"{
            "lights": [{ "direction": [0, 0, -1], "position": [0, 5, 0] }]
        }"#);
        assert!(both.is_err());

        let neither = parse(r#"{ "lights": [{ "color": [1, 1, 1] }] }"#);
        assert!(neither.is_err());
    }

    #[test]
    fn undefined_material_fails_before_render() {
        let result = parse(r#"{
            "shapes": [{ "type": "sphere", "material": "chrome" }]
        }"#);

        assert!(result.is_err());
    }

    #[test]
    fn material_texture_round_trips() {
        let scene = parse(r#"{
            "materials": [{
                "name": "tiles",
                "texture": {
                    "type": "checker",
                    "primary": [1, 1, 1],
                    "secondary": [0, 0, 0],
                    "scale": 4.0
                }
            }]
        }"#).unwrap();

        let tiles = &scene.materials()[1];
        assert!(tiles.has_texture());
        assert_eq!(tiles.sample_texture(0.05, 0.05), Color::white());
        assert_eq!(tiles.sample_texture(0.3, 0.05), Color::black());
    }

    #[test]
    fn example_scene_is_renderable() {
        let scene = example_scene();

        assert!(!scene.objects().is_empty());
        assert!(!scene.lights().is_empty());

        // A few pixels of a small render should come out lit.
        let image = scene.render(8, 8);
        let mut lit = 0;
        for x in 0..8 {
            for y in 0..8 {
                if image.read_pixel(x, y).unwrap() != Color::black() {
                    lit += 1;
                }
            }
        }
        assert!(lit > 0);
    }
}
