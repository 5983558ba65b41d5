use anyhow::{ anyhow, Result };
use log::{ debug, info };

use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::color::Color;
use crate::consts::{ HIT_EPSILON, RECURSION_DEPTH, SHADOW_CUTOFF };
use crate::intersect::ISect;
use crate::light::{ Light, LightKind };
use crate::material::Material;
use crate::matrix::MatrixStack;
use crate::ray::Ray;
use crate::shape::Shape;

/// Anything a scene description can contribute to a scene.
///
/// The loader constructs these and hands them to `Scene::add_object`, which
/// routes each kind to the right collection and applies the transform stack
/// where it applies.
pub enum SceneItem {
    Light(Light),
    Material(Material),
    Shape(Shape),
    Camera(Camera),
}

/// The scene: shape, light and material collections plus the camera, and
/// the render/trace engine that consumes them.
///
/// A scene is populated through `add_object` while the description is being
/// read, frozen with `setup`, and rendered through `&self` — nothing can
/// mutate shapes, lights or materials while pixels are being produced,
/// which is what lets the parallel renderer share the scene across workers
/// without locks.
pub struct Scene {
    objects: Vec<Shape>,
    lights: Vec<Light>,
    materials: Vec<Material>,
    camera: Option<Camera>,
    mstack: MatrixStack,

    /// Maximum recursion depth for a ray.
    pub recursion_depth: u32,

    /// Minimum valid hit parameter, keeps surfaces from shadowing and
    /// re-intersecting themselves.
    pub epsilon: f64,

    /// How far a positional light's shadow ray reaches, in units of the
    /// surface-to-light displacement.
    pub shadow_cutoff: f64,
}

impl Default for Scene {
    fn default() -> Scene {
        Scene::new()
    }
}

impl Scene {
    /// Creates an empty scene whose material registry holds the required
    /// `"default"` entry.
    pub fn new() -> Scene {
        Scene {
            objects: Vec::new(),
            lights: Vec::new(),
            materials: vec![Material::default()],
            camera: None,
            mstack: MatrixStack::new(),
            recursion_depth: RECURSION_DEPTH,
            epsilon: HIT_EPSILON,
            shadow_cutoff: SHADOW_CUTOFF,
        }
    }

    pub fn objects(&self) -> &[Shape] {
        &self.objects
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    /// The transform stack applied to newly added shapes and lights.
    pub fn mstack(&mut self) -> &mut MatrixStack {
        &mut self.mstack
    }

    /// Adds a scene element, routed by kind.
    ///
    /// Lights are carried through the current transform-stack top and
    /// appended. Materials extend the registry. Shapes take the stack top
    /// as their instance matrix and resolve their material name against the
    /// registry (an unresolved name is a fatal configuration error). A
    /// camera replaces the active camera.
    pub fn add_object(&mut self, item: SceneItem) -> Result<()> {
        match item {
            SceneItem::Light(mut light) => {
                light.transform(self.mstack.peek());
                self.lights.push(light);
            },

            SceneItem::Material(material) => {
                self.materials.push(material);
            },

            SceneItem::Shape(mut shape) => {
                shape.set_matrix(*self.mstack.peek())?;
                shape.material = self.get_material(&shape.material_name)?;
                self.objects.push(shape);
            },

            SceneItem::Camera(camera) => {
                self.camera = Some(camera);
            },
        }

        Ok(())
    }

    /// Looks up a material index by name. An empty name resolves to the
    /// registry default; an unregistered name is a configuration error.
    pub fn get_material(&self, name: &str) -> Result<usize> {
        let name = if name.is_empty() { "default" } else { name };

        self.materials
            .iter()
            .position(|m| m.name == name)
            .ok_or_else(|| anyhow!("undefined material '{}'", name))
    }

    /// Finalizes the scene after the description has been read: installs a
    /// default camera when none was supplied and re-checks the registry
    /// invariant. Rendering an un-setup scene with no camera still works
    /// (the default camera is used), but configuration errors surface here,
    /// before any pixel is produced.
    pub fn setup(&mut self) -> Result<()> {
        if self.camera.is_none() {
            self.camera = Some(Camera::default());
        }

        self.get_material("")?;

        info!(
            "scene ready: {} shapes, {} lights, {} materials",
            self.objects.len(), self.lights.len(), self.materials.len(),
        );
        Ok(())
    }

    /// Renders an image of size width x height.
    ///
    /// Pixel (i, j) maps to screen coordinates in [-1, 1] spanning the
    /// frustum corner to corner; a single-pixel axis maps to the center.
    pub fn render(&self, width: usize, height: usize) -> Canvas {
        let mut camera = self.camera.clone().unwrap_or_default();
        camera.setup(width, height);

        info!("rendering {}x{}", width, height);

        let mut image = Canvas::new(width, height);
        for i in 0..width {
            for j in 0..height {
                let color = self.pixel(&camera, i, j, width, height);
                image.write_pixel(i, j, &color);
            }

            debug!("rendered column {}/{}", i + 1, width);
        }

        image
    }

    /// Computes the color of pixel (i, j) for an image of the given size.
    /// The camera must already be set up for that size.
    pub fn pixel(&self, camera: &Camera, i: usize, j: usize,
        width: usize, height: usize) -> Color {
        let x = screen_coord(i, width);
        let y = screen_coord(j, height);

        let ray = camera.pixel_ray(x, y);
        self.cast_ray(&ray, 0)
    }

    /// Computes the radiance along a ray at a recursion depth.
    ///
    /// A ray that exceeds the depth bound or hits nothing contributes
    /// black. Otherwise every light's contribution at the nearest hit is
    /// summed — lights brighten the surface additively, they are never
    /// averaged. The depth bound is the hook for secondary bounces; the
    /// baseline casts none.
    pub fn cast_ray(&self, ray: &Ray, depth: u32) -> Color {
        if depth > self.recursion_depth {
            return Color::black();
        }

        let isect = match self.intersects(ray) {
            Some(isect) => isect,
            None => return Color::black(),
        };

        let mat = &self.materials[isect.shape.material];

        let mut color = Color::black();
        for light in self.lights.iter() {
            let tint = self.shadow_ray(&isect, light);
            color += light.compute(&isect, mat, tint, ray);
        }

        color
    }

    /// Finds the closest intersecting shape along a ray, if any.
    ///
    /// Every shape is probed in its own object space, through a ray built
    /// fresh from that shape's inverse matrix — the world ray is never
    /// mutated, so concurrent queries can share it. Candidates are ranked
    /// by the hit parameter t, which is comparable across shapes because
    /// the object-space directions are never renormalized. The strict
    /// comparison means the first shape added wins ties.
    pub fn intersects(&self, ray: &Ray) -> Option<ISect<'_>> {
        let mut nearest: Option<(f64, &Shape)> = None;

        for shape in self.objects.iter() {
            let local = ray.transform(shape.inverse());
            if let Some(t) = shape.probe(&local, self.epsilon, f64::INFINITY) {
                if nearest.map_or(true, |(best, _)| t < best) {
                    nearest = Some((t, shape));
                }
            }
        }

        let (_, shape) = nearest?;

        // Re-run the winning shape's test to fill the full record, then
        // carry the point and normal back into world space.
        let local = ray.transform(shape.inverse());
        let hit = shape.hit(&local, self.epsilon, f64::INFINITY)?;

        Some(ISect {
            t: hit.t,
            point: shape.matrix().transform_point(&hit.point),
            normal: shape.inverse_transpose()
                .transform_vector(&hit.normal.normalize()),
            u: hit.u,
            v: hit.v,
            shape,
        })
    }

    /// Computes how much of a light reaches an intersection point.
    ///
    /// The shadow ray points from the hit toward the light. For positional
    /// lights the direction keeps the unnormalized displacement — t = 1
    /// lands on the light — and the reach is bounded by `shadow_cutoff`.
    /// Directional lights probe without a distance bound.
    pub fn shadow_ray(&self, isect: &ISect, light: &Light) -> Color {
        match *light.kind() {
            LightKind::Directional(d) => {
                self.shadow_tint(&Ray::new(isect.point, d), f64::INFINITY)
            },
            LightKind::Positional(p) => {
                let ray = Ray::new(isect.point, p - isect.point);
                self.shadow_tint(&ray, self.shadow_cutoff)
            },
        }
    }

    /// Accumulates the transmission of every occluder along a ray.
    ///
    /// No occluder at all forces full visibility (1,1,1). Otherwise the
    /// tint is the plain sum of the occluders' transmission coefficients —
    /// not their product, and not clamped — so stacked translucent objects
    /// can brighten past white while one opaque occluder yields black.
    fn shadow_tint(&self, ray: &Ray, max_t: f64) -> Color {
        let mut was_hit = false;
        let mut tint = Color::black();

        for shape in self.objects.iter() {
            let local = ray.transform(shape.inverse());
            if shape.probe(&local, self.epsilon, max_t).is_some() {
                was_hit = true;
                tint += self.materials[shape.material].transmission;
            }
        }

        if !was_hit {
            Color::white()
        } else {
            tint
        }
    }
}

/// Maps a pixel index to [-1, 1], spanning corner to corner inclusive. A
/// single-pixel axis maps to the frustum center.
fn screen_coord(i: usize, extent: usize) -> f64 {
    if extent > 1 {
        (i as f64) / ((extent - 1) as f64) * 2.0 - 1.0
    } else {
        0.0
    }
}

/* Tests */
