//! ---------------------------------------------------------------------------
//! Per-pixel software (CPU) renderer
//!
//! * Fills a `Vec<u32>` frame-buffer in **0xAARRGGBB** format.
//! * Every pixel is one independent query against the level, so rows are
//!   handed to `rayon` and evaluated in parallel. Nothing is shared between
//!   pixels except `&Level` and the colorizer.
//! * `supersample = n` traces an `n × n` grid of sub-pixel rays and averages
//!   the shaded colours.
//! ---------------------------------------------------------------------------

use std::path::Path;

use glam::{Vec2, Vec3, vec2};
use rayon::prelude::*;
use thiserror::Error;

use crate::{
    renderer::{
        Compositor, LOW_RES, RenderConfig, RenderFlags, Renderer, Rgba, Sample, pack_rgb,
        unpack_rgb,
    },
    trace::View,
    world::{Camera, Colorizer, Level},
};

/// Colour of pixels nothing has been drawn to yet.
const CLEAR: Rgba = 0xFF_202020;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("frame buffer holds {found} pixels, {width}×{height} needs {expected}")]
    SizeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        found: usize,
    },
    #[error("image export failed: {0}")]
    Image(#[from] image::ImageError),
}

/*───────────────────────────────────────────────────────────────────────*/
/*                              Backend                                 */
/*───────────────────────────────────────────────────────────────────────*/

pub struct Software {
    scratch: Vec<Rgba>,
    width: usize,
    height: usize,
    config: RenderConfig,
}

impl Default for Software {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl Software {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            scratch: Vec::new(),
            width: 0,
            height: 0,
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    #[inline]
    pub fn flags_mut(&mut self) -> &mut RenderFlags {
        &mut self.config.flags
    }

    /// Last finished frame.
    #[inline]
    pub fn frame(&self) -> &[Rgba] {
        &self.scratch
    }

    /// Trace the centre of pixel `(x, y)` (row 0 at the top) exactly the
    /// way [`Renderer::draw_level`] would, without touching the buffer.
    pub fn probe(&self, level: &Level, camera: &Camera, time: f32, x: usize, y: usize) -> Sample {
        let res = vec2(self.width.max(1) as f32, self.height.max(1) as f32);
        let frame = FrameSetup::new(level, camera, time, self.config.flags, res);
        let frag = vec2(x as f32 + 0.5, res.y - y as f32 - 0.5);
        frame.sample(frag)
    }

    /// Convenience: one complete frame at the configured size.
    pub fn render<C: Colorizer>(
        &mut self,
        level: &Level,
        camera: &Camera,
        time: f32,
        colorizer: &C,
    ) -> &[Rgba] {
        self.begin_frame(self.config.width, self.config.height);
        self.draw_level(level, camera, time, colorizer);
        &self.scratch
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // (re)allocate if resolution changed
        if w != self.width || h != self.height {
            log::debug!("frame buffer {}×{} -> {}×{}", self.width, self.height, w, h);
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
        }

        /* dark-grey clear */
        self.scratch.fill(CLEAR);
    }

    fn draw_level<C: Colorizer>(&mut self, level: &Level, camera: &Camera, time: f32, colorizer: &C) {
        let (w, h) = (self.width, self.height);
        if w == 0 || h == 0 {
            return;
        }

        let res = vec2(w as f32, h as f32);
        let frame = FrameSetup::new(level, camera, time, self.config.flags, res);
        let n = self.config.supersample.max(1);
        let weight = 1.0 / (n * n) as f32;
        let offsets: Vec<Vec2> = (0..n * n)
            .map(|i| vec2((i % n) as f32 + 0.5, (i / n) as f32 + 0.5) / n as f32)
            .collect();

        self.scratch
            .par_chunks_mut(w)
            .enumerate()
            .for_each(|(row, line)| {
                // fragment y grows upwards
                let frag_y = (h - 1 - row) as f32;
                for (col, px) in line.iter_mut().enumerate() {
                    let corner = vec2(col as f32, frag_y);
                    let sum: Vec3 = offsets
                        .iter()
                        .map(|&o| frame.shade(frame.sample(corner + o), colorizer))
                        .sum();
                    *px = pack_rgb(sum * weight);
                }
            });
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

/*──────────────────────── per-frame constants ────────────────────────*/

/// Everything a pixel needs that does not depend on the pixel.
struct FrameSetup<'a> {
    level: &'a Level,
    camera: Camera,
    view: View,
    compositor: Compositor,
    flags: RenderFlags,
    res: Vec2,
}

impl<'a> FrameSetup<'a> {
    fn new(level: &'a Level, camera: &Camera, time: f32, flags: RenderFlags, res: Vec2) -> Self {
        let camera = if flags.contains(RenderFlags::HEAD_BOB) {
            camera.with_head_bob()
        } else {
            *camera
        };
        let view = camera.view(time);
        Self {
            level,
            camera,
            view,
            compositor: Compositor::new(view, flags),
            flags,
            res,
        }
    }

    /// Trace the ray through fragment position `frag` (pixels, origin
    /// bottom-left).
    fn sample(&self, frag: Vec2) -> Sample {
        let mut screen = frag / self.res;
        if self.flags.contains(RenderFlags::PIXELATE) {
            screen = (screen * LOW_RES + Vec2::splat(0.5)).floor() / LOW_RES;
        }

        let ray = self.camera.ray(Camera::window_coord(screen, self.res.x / self.res.y));
        let hit = if self.flags.contains(RenderFlags::SPRITES) {
            self.level.trace(&ray, &self.view)
        } else {
            self.level.intersect(&ray, self.view.time)
        };
        Sample {
            hit,
            dir: ray.dir,
            screen,
        }
    }

    #[inline]
    fn shade<C: Colorizer>(&self, sample: Sample, colorizer: &C) -> Vec3 {
        self.compositor.shade(&sample, colorizer)
    }
}

/*──────────────────────────── PNG export ─────────────────────────────*/

/// Copy a 0xAARRGGBB buffer into an 8-bit RGB image.
pub fn to_rgb_image(fb: &[Rgba], width: usize, height: usize) -> Result<image::RgbImage, RenderError> {
    let expected = width * height;
    let mismatch = || RenderError::SizeMismatch {
        width,
        height,
        expected,
        found: fb.len(),
    };
    if fb.len() != expected {
        return Err(mismatch());
    }

    let bytes: Vec<u8> = fb.iter().flat_map(|&px| unpack_rgb(px)).collect();
    image::RgbImage::from_raw(width as u32, height as u32, bytes).ok_or_else(mismatch)
}

pub fn save_png(path: impl AsRef<Path>, fb: &[Rgba], width: usize, height: usize) -> Result<(), RenderError> {
    let img = to_rgb_image(fb, width, height)?;
    img.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::Surface;
    use crate::world::geometry::Sector;
    use crate::world::texture::TextureId;
    use crate::world::HANGAR;

    struct Flat(Vec3);

    impl Colorizer for Flat {
        fn color(&self, _: TextureId, _: Vec2) -> Vec3 {
            self.0
        }
    }

    fn small(flags: RenderFlags, supersample: u32) -> Software {
        Software::new(RenderConfig {
            width: 32,
            height: 24,
            supersample,
            flags,
        })
    }

    /// One big room, every surface equally lit.
    fn hall() -> Level {
        let room = Sector::new(0.0, 128.0, (3, 6), 0.5).with_wall_loop(
            &[
                vec2(-1000.0, -1000.0),
                vec2(-1000.0, 1000.0),
                vec2(1000.0, 1000.0),
                vec2(1000.0, -1000.0),
            ],
            14,
        );
        Level {
            name: "hall".into(),
            sectors: vec![room],
            sprites: Vec::new(),
        }
    }

    #[test]
    fn every_pixel_is_drawn() {
        let mut sw = small(RenderFlags::SPRITES | RenderFlags::SKY, 1);
        // magenta can never shade to the grey clear colour
        sw.render(&HANGAR, &Camera::start(), 10.0, &Flat(Vec3::new(1.0, 0.0, 1.0)));

        let mut seen = None;
        sw.end_frame(|fb, w, h| {
            assert_eq!((w, h), (32, 24));
            assert_eq!(fb.len(), w * h);
            assert!(fb.iter().all(|&px| px != CLEAR && px >> 24 == 0xFF));
            seen = Some(fb.len());
        });
        assert_eq!(seen, Some(32 * 24));
    }

    #[test]
    fn supersampling_a_uniform_scene_changes_nothing() {
        let level = hall();
        let cam = Camera::new(Vec3::new(0.0, 30.0, 0.0), Vec3::new(100.0, 40.0, 300.0));
        let colour = Flat(Vec3::splat(0.5));

        let single = small(RenderFlags::empty(), 1).render(&level, &cam, 0.0, &colour).to_vec();
        assert!(single.iter().all(|&px| px == single[0]));
        // 0.5 · 0.5 · 1.2 = 0.3
        assert!((76..=77).contains(&unpack_rgb(single[0])[0]));

        for n in [2, 3] {
            let mut sw = small(RenderFlags::empty(), n);
            let frame = sw.render(&level, &cam, 0.0, &colour);
            // averaging may round the last bit either way
            for (&a, &b) in frame.iter().zip(&single) {
                for (ca, cb) in unpack_rgb(a).into_iter().zip(unpack_rgb(b)) {
                    assert!(ca.abs_diff(cb) <= 1, "n = {n}: {a:08x} vs {b:08x}");
                }
            }
        }
    }

    #[test]
    fn resize_reallocates_and_clears() {
        let mut sw = Software::default();
        sw.begin_frame(4, 3);
        assert_eq!(sw.frame().len(), 12);
        sw.begin_frame(8, 2);
        sw.end_frame(|fb, w, h| {
            assert_eq!((w, h), (8, 2));
            assert!(fb.iter().all(|&px| px == CLEAR));
        });
    }

    #[test]
    fn probe_matches_the_rendered_frame() {
        let level = hall();
        let cam = Camera::new(Vec3::new(0.0, 30.0, 0.0), Vec3::new(0.0, 30.0, 100.0));
        let mut sw = small(RenderFlags::empty(), 1);
        sw.render(&level, &cam, 0.0, &Flat(Vec3::ONE));

        // top row looks up at the ceiling, bottom row down at the floor
        assert_eq!(sw.probe(&level, &cam, 0.0, 16, 0).hit.surface, Surface::Ceiling);
        assert_eq!(sw.probe(&level, &cam, 0.0, 16, 23).hit.surface, Surface::Floor);
        let centre = sw.probe(&level, &cam, 0.0, 16, 12);
        assert!(centre.screen.y < 0.5 && centre.screen.x > 0.5);
    }

    #[test]
    fn pixelation_snaps_neighbours_to_one_cell() {
        let mut sw = Software::new(RenderConfig {
            width: 640,
            height: 480,
            supersample: 1,
            flags: RenderFlags::PIXELATE,
        });
        sw.begin_frame(640, 480);
        let cam = Camera::start();
        let a = sw.probe(&HANGAR, &cam, 0.0, 1, 100);
        let b = sw.probe(&HANGAR, &cam, 0.0, 2, 100);
        let c = sw.probe(&HANGAR, &cam, 0.0, 3, 100);
        assert_eq!(a.screen, b.screen);
        assert_eq!(a.hit, b.hit);
        assert_ne!(b.screen, c.screen);
    }

    #[test]
    fn png_export_checks_the_size() {
        assert!(matches!(
            to_rgb_image(&[0; 5], 2, 3),
            Err(RenderError::SizeMismatch { expected: 6, found: 5, .. })
        ));
        let img = to_rgb_image(&[0xFF_102030, 0xFF_405060], 2, 1).expect("2×1 image");
        assert_eq!(img.get_pixel(1, 0).0, [0x40, 0x50, 0x60]);
    }
}
