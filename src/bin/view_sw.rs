use clap::Parser;
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use std::time::{Duration, Instant};

use sectorcast::{
    renderer::{RenderConfig, RenderFlags, Renderer, Software},
    world::{Camera, HANGAR, Procedural},
};

/// World units per frame when walking; doubled with Shift.
const WALK_SPEED: f32 = 8.0;
/// Radians per frame when turning.
const TURN_SPEED: f32 = 0.04;

/// Interactive viewer for the built-in Hangar level.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    #[arg(long, default_value_t = 960)]
    width: usize,
    #[arg(long, default_value_t = 720)]
    height: usize,
    /// Rays per pixel along each axis.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=8))]
    supersample: u32,
    #[arg(long)]
    no_sky: bool,
    #[arg(long)]
    no_fog: bool,
    #[arg(long)]
    no_intro: bool,
    #[arg(long)]
    no_sprites: bool,
}

impl Opts {
    fn config(&self) -> RenderConfig {
        let mut flags = RenderFlags::all();
        flags.set(RenderFlags::SKY, !self.no_sky);
        flags.set(RenderFlags::FOG, !self.no_fog);
        flags.set(RenderFlags::INTRO, !self.no_intro);
        flags.set(RenderFlags::SPRITES, !self.no_sprites);
        RenderConfig {
            width: self.width,
            height: self.height,
            supersample: self.supersample,
            flags,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opts = Opts::parse();
    let config = opts.config();

    HANGAR.validate()?;
    log::info!(
        "level {}: {} sectors, {} sprites",
        HANGAR.name,
        HANGAR.sectors.len(),
        HANGAR.sprites.len()
    );

    let colorizer = Procedural::new(config.flags.contains(RenderFlags::PIXELATE_TEXTURES));
    let mut renderer = Software::new(config);

    let mut win = Window::new(
        "sectorcast: E1M1 Hangar",
        config.width,
        config.height,
        WindowOptions::default(),
    )?;
    win.set_target_fps(60);

    let start = Instant::now();
    // `None` while the scripted fly-through drives the camera
    let mut free: Option<Camera> = None;

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO; // cumulated render time
    let mut acc_frames = 0usize; // frames in the current window
    let mut last_print = Instant::now(); // when we printed last

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now(); // ┌─ frame timer start
        let time = start.elapsed().as_secs_f32();

        if win.is_key_pressed(Key::Tab, KeyRepeat::No) {
            free = match free {
                Some(_) => None,
                None => Some(Camera::demo(time)),
            };
            log::info!("camera: {}", if free.is_some() { "free" } else { "demo" });
        }

        /* movement --------------------------------------------------------- */
        if let Some(cam) = free.as_mut() {
            let run = win.is_key_down(Key::LeftShift) || win.is_key_down(Key::RightShift);
            let speed = if run { WALK_SPEED * 2.0 } else { WALK_SPEED };
            let (mut fwd, mut side, mut turn) = (0.0, 0.0, 0.0);

            if win.is_key_down(Key::Up) || win.is_key_down(Key::W) {
                fwd += 1.0;
            }
            if win.is_key_down(Key::Down) || win.is_key_down(Key::S) {
                fwd -= 1.0;
            }
            if win.is_key_down(Key::Left) {
                turn += 1.0;
            }
            if win.is_key_down(Key::Right) {
                turn -= 1.0;
            }
            /* WASD strafing */
            if win.is_key_down(Key::A) {
                side -= 1.0;
            }
            if win.is_key_down(Key::D) {
                side += 1.0;
            }

            cam.turn(turn * TURN_SPEED);
            cam.step(fwd * speed, side * speed);
        }

        let camera = free.unwrap_or_else(|| Camera::demo(time));

        /* draw */
        let mut shown = Ok(());
        renderer.begin_frame(config.width, config.height);
        renderer.draw_level(&HANGAR, &camera, time, &colorizer);
        renderer.end_frame(|fb, w, h| {
            // ─────────── accumulate & report every ~3 s ────────────────────
            acc_time += t0.elapsed();
            acc_frames += 1;
            shown = win.update_with_buffer(fb, w, h);
        });
        shown?;

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            let fps = 1000.0 / avg_ms;
            log::info!("avg render: {:.2} ms  ({:.1} FPS)", avg_ms, fps);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
