//! render_frame - headless front end for the Hangar level.
//!
//! USAGE:
//! ```bash
//! cargo run --release --bin render_frame -- render --time 12 --out frame.png
//! cargo run --bin render_frame -- probe --time 12 --x 480 --y 360
//! cargo run --bin render_frame -- check
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

use sectorcast::{
    renderer::{Compositor, RenderConfig, RenderFlags, Renderer, Software, save_png},
    world::{Camera, HANGAR, Procedural, texture_name},
};

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Render one frame of the demo to a PNG file.
    Render {
        /// Demo clock in seconds.
        #[arg(long, default_value_t = 12.0)]
        time: f32,
        #[arg(long, value_name = "FILE", default_value = "frame.png")]
        out: PathBuf,
        #[command(flatten)]
        size: Size,
        #[arg(long, default_value_t = 1)]
        supersample: u32,
    },
    /// Print what one pixel of the demo sees.
    Probe {
        #[arg(long, default_value_t = 12.0)]
        time: f32,
        /// Column, from the left.
        #[arg(long)]
        x: usize,
        /// Row, from the top.
        #[arg(long)]
        y: usize,
        #[command(flatten)]
        size: Size,
    },
    /// Run the authoring checks on the level table.
    Check,
}

#[derive(Args, Debug, Clone, Copy)]
struct Size {
    #[arg(long, default_value_t = 960)]
    width: usize,
    #[arg(long, default_value_t = 720)]
    height: usize,
}

impl Size {
    fn config(self, supersample: u32) -> RenderConfig {
        RenderConfig {
            width: self.width,
            height: self.height,
            supersample: supersample.max(1),
            flags: RenderFlags::default(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opts = Opts::parse();

    match opts.cmd {
        Cmd::Render {
            time,
            out,
            size,
            supersample,
        } => render(time, &out, size.config(supersample)),
        Cmd::Probe { time, x, y, size } => probe(time, x, y, size.config(1)),
        Cmd::Check => check(),
    }
}

fn render(time: f32, out: &Path, config: RenderConfig) -> anyhow::Result<()> {
    let colorizer = Procedural::new(config.flags.contains(RenderFlags::PIXELATE_TEXTURES));
    let mut renderer = Software::new(config);
    let camera = Camera::demo(time);

    let t0 = Instant::now();
    renderer.render(&HANGAR, &camera, time, &colorizer);
    log::info!(
        "{}×{} ×{} at t = {time:.2}s in {:.1} ms",
        config.width,
        config.height,
        config.supersample * config.supersample,
        t0.elapsed().as_secs_f64() * 1000.0
    );

    let mut saved = Ok(());
    renderer.end_frame(|fb, w, h| saved = save_png(out, fb, w, h));
    saved?;
    log::info!("wrote {}", out.display());
    Ok(())
}

fn probe(time: f32, x: usize, y: usize, config: RenderConfig) -> anyhow::Result<()> {
    anyhow::ensure!(
        x < config.width && y < config.height,
        "pixel ({x}, {y}) outside {}×{}",
        config.width,
        config.height
    );

    let mut renderer = Software::new(config);
    renderer.begin_frame(config.width, config.height);
    let camera = Camera::demo(time);
    let sample = renderer.probe(&HANGAR, &camera, time, x, y);

    let compositor = Compositor::new(camera.view(time), config.flags);
    let shading = compositor.shading(&sample);
    let colorizer = Procedural::new(config.flags.contains(RenderFlags::PIXELATE_TEXTURES));
    let colour = compositor.shade(&sample, &colorizer);
    let hit = sample.hit;

    println!("pixel     ({x}, {y}) screen ({:.4}, {:.4})", sample.screen.x, sample.screen.y);
    println!("surface   {:?}", hit.surface);
    println!("material  {} ({})", texture_name(hit.tex), hit.tex);
    println!("t         {:.3}", hit.t);
    println!("uv        ({:.3}, {:.3})", hit.uv.x, hit.uv.y);
    println!("light     {:.4} -> {:.4} shaded", hit.light, shading.light);
    println!("rgb       ({:.3}, {:.3}, {:.3})", colour.x, colour.y, colour.z);
    Ok(())
}

fn check() -> anyhow::Result<()> {
    let problems = HANGAR.problems();
    for p in &problems {
        println!("error: {p}");
    }
    let mismatches = HANGAR.portal_mismatches();
    for m in &mismatches {
        println!("warning: {m}");
    }
    anyhow::ensure!(problems.is_empty(), "{} problem(s) in {}", problems.len(), HANGAR.name);
    println!(
        "{}: {} sectors, {} segments, {} sprites, {} warning(s)",
        HANGAR.name,
        HANGAR.sectors.len(),
        HANGAR.sectors.iter().map(|s| s.segments.len()).sum::<usize>(),
        HANGAR.sprites.len(),
        mismatches.len()
    );
    Ok(())
}
