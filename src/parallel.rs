use std::thread;
use std::sync::mpsc;
use std::sync::{ Arc, Mutex };

use log::info;

use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::scene::Scene;

/// Work items handed to render workers. Rows, not pixels: a row is enough
/// work to amortize the channel and canvas-lock traffic.
pub enum Message {
    Row(usize),
    Terminate,
}

struct Worker {
    thread: Option<thread::JoinHandle<()>>,
}

impl Worker {
    fn new(scene: Arc<Scene>, camera: Arc<Camera>, canvas: Arc<Mutex<Canvas>>,
        receiver: Arc<Mutex<mpsc::Receiver<Message>>>,
        width: usize, height: usize) -> Worker {

        let thread = thread::spawn(move || loop {
            let message: Message = receiver.lock().unwrap().recv().unwrap();

            match message {
                Message::Row(y) => {
                    // Trace the whole row into a local buffer, then write
                    // it out under one canvas lock.
                    let row: Vec<_> = (0..width)
                        .map(|x| scene.pixel(&camera, x, y, width, height))
                        .collect();

                    let mut canvas = canvas.lock().unwrap();
                    for (x, color) in row.iter().enumerate() {
                        canvas.write_pixel(x, y, color);
                    }
                },

                Message::Terminate => {
                    break;
                },
            }
        });

        Worker { thread: Some(thread) }
    }
}

/// A pool of render workers fed rows over a shared channel.
pub struct ThreadPool {
    workers: Vec<Worker>,
    sender: mpsc::Sender<Message>,
}

impl ThreadPool {
    pub fn new(size: usize, scene: Arc<Scene>, camera: Arc<Camera>,
        canvas: Arc<Mutex<Canvas>>, width: usize, height: usize) -> ThreadPool {
        assert!(size > 0);

        let (sender, receiver) = mpsc::channel();
        let receiver = Arc::new(Mutex::new(receiver));

        let mut workers = Vec::with_capacity(size);
        for _ in 0..size {
            workers.push(Worker::new(
                Arc::clone(&scene),
                Arc::clone(&camera),
                Arc::clone(&canvas),
                Arc::clone(&receiver),
                width,
                height,
            ));
        }

        ThreadPool { workers, sender }
    }

    pub fn execute(&mut self, message: Message) {
        self.sender.send(message).unwrap();
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        for _ in &self.workers {
            self.sender.send(Message::Terminate).unwrap();
        }

        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                thread.join().unwrap();
            }
        }
    }
}

/// Renders the scene across `threads` workers, pixel-identical to
/// `Scene::render`.
///
/// The scene is shared read-only; the only synchronization is the work
/// channel and the canvas lock.
pub fn parallel_render(scene: Arc<Scene>, width: usize, height: usize,
    threads: usize) -> Canvas {
    let mut camera = scene.camera().cloned().unwrap_or_default();
    camera.setup(width, height);
    let camera = Arc::new(camera);

    let canvas = Arc::new(Mutex::new(Canvas::new(width, height)));

    info!("rendering {}x{} using {} threads", width, height, threads);
    {
        let mut pool = ThreadPool::new(
            threads, scene, camera, Arc::clone(&canvas), width, height,
        );

        for y in 0..height {
            pool.execute(Message::Row(y));
        }
    }

    // Workers have been joined by the pool's Drop; the canvas is ours.
    Arc::try_unwrap(canvas)
        .expect("render workers still hold the canvas")
        .into_inner()
        .unwrap()
}

/* Tests */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::light::Light;
    use crate::material::Material;
    use crate::matrix::Matrix4;
    use crate::scene::SceneItem;
    use crate::shape::Shape;
    use crate::vec::{ Vec3, Point3 };

    fn lit_scene() -> Scene {
        let mut scene = Scene::new();

        let mut red = Material::named("red");
        red.ambient = Color::black();
        red.diffuse = Color::rgb(1.0, 0.0, 0.0);
        red.specular = Color::black();
        scene.add_object(SceneItem::Material(red)).unwrap();

        let mut sphere = Shape::sphere();
        sphere.material_name = "red".to_string();
        scene.mstack().push();
        scene.mstack().apply(Matrix4::translation(0.0, 0.0, -5.0));
        scene.add_object(SceneItem::Shape(sphere)).unwrap();
        scene.mstack().pop();

        scene.add_object(SceneItem::Light(
            Light::directional(Vec3::new(0.0, 0.0, 1.0)))).unwrap();
        scene.add_object(SceneItem::Light(
            Light::positional(Point3::new(0.0, 4.0, 0.0)))).unwrap();
        scene.setup().unwrap();

        scene
    }

    #[test]
    fn parallel_render_matches_serial_render() {
        let scene = lit_scene();
        let serial = scene.render(24, 16);

        let parallel = parallel_render(Arc::new(scene), 24, 16, 3);

        for x in 0..24 {
            for y in 0..16 {
                assert_eq!(serial.read_pixel(x, y), parallel.read_pixel(x, y));
            }
        }
    }

    #[test]
    fn single_worker_covers_every_row() {
        let scene = lit_scene();
        let serial = scene.render(8, 8);

        let parallel = parallel_render(Arc::new(scene), 8, 8, 1);
        assert_eq!(serial, parallel);
    }
}
