use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::info;

use phong_tracer::consts;
use phong_tracer::load;
use phong_tracer::logger;
use phong_tracer::parallel;

#[derive(Parser)]
#[clap(author, version, about)]
/// A Phong-shading ray tracer.
struct TracerOpt {
    /// A scene description file (JSON) to render.
    ///
    /// Renders a built-in example scene when omitted.
    #[clap(long)]
    scene: Option<String>,

    /// Destination of the output image (PPM).
    #[clap(long, short, default_value(consts::OUT_FILE))]
    output: String,

    /// Output image width.
    #[clap(long, default_value_t = 512)]
    width: usize,

    /// Output image height.
    #[clap(long, default_value_t = 512)]
    height: usize,

    /// Number of render threads.
    #[clap(long, short = 't', default_value_t = consts::NUM_THREADS)]
    threads: usize,

    /// Verbose output (-v for debug, -vv for trace).
    #[clap(short, long, parse(from_occurrences))]
    verbose: usize,
}

fn main() -> anyhow::Result<()> {
    let opt = TracerOpt::parse();
    logger::init(logger::level_from_verbosity(opt.verbose));

    let scene = match opt.scene {
        Some(ref path) => load::load_scene(path)
            .with_context(|| format!("load scene file '{}'", path))?,
        None => load::example_scene(),
    };

    let start = Instant::now();
    let canvas = if opt.threads > 1 {
        parallel::parallel_render(Arc::new(scene), opt.width, opt.height,
            opt.threads)
    } else {
        scene.render(opt.width, opt.height)
    };

    let elapsed = start.elapsed().as_secs_f64();
    let rays = (opt.width * opt.height) as f64;
    info!("done in {:.2}s ({:.0} rays/s)", elapsed, rays / elapsed);

    canvas.save(Path::new(&opt.output))
        .with_context(|| format!("could not write image '{}'", opt.output))?;
    info!("saved render to {}", opt.output);

    Ok(())
}
