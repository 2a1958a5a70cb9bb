//! Rendering abstraction layer.
//!
//! *The tracer never touches a pixel buffer.* It answers one ray at a time;
//! a type implementing [`Renderer`] decides which rays to ask about and
//! turns the answers into pixels through the [`compositor`].
//!
//! * Back-ends only differ in how they schedule rays; the per-sample
//!   shading is shared.
//! * Behaviour toggles live in [`RenderFlags`], resolution and
//!   supersampling in [`RenderConfig`].

use bitflags::bitflags;
use glam::{Vec2, Vec3};

use crate::world::{Camera, Colorizer, Level};

pub mod compositor;
pub mod software;

pub use compositor::{Compositor, DEPTH_FADE, Sample, Shading};
pub use software::{RenderError, Software, save_png, to_rgb_image};

/// Pixel format of the software frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

/// Nominal low-resolution screen: the pixelation grid, and the layout of
/// the sky panorama and the intro wipe.
pub const LOW_RES: Vec2 = Vec2::new(320.0, 240.0);

bitflags! {
    /// Per-frame feature switches.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct RenderFlags: u16 {
        /// Replace sky-flat hits by the screen-space sky panorama.
        const SKY               = 0x0001;
        /// Darken with view-axis depth.
        const FOG               = 0x0002;
        /// Melt-style wipe during the first seconds.
        const INTRO             = 0x0004;
        /// Snap the final colour to 48 levels per channel.
        const QUANTIZE          = 0x0008;
        /// Evaluate on a 320×240 grid and scale up.
        const PIXELATE          = 0x0010;
        /// Snap texture coordinates to whole texels.
        const PIXELATE_TEXTURES = 0x0020;
        /// Walking bob on the demo camera.
        const HEAD_BOB          = 0x0040;
        /// Trace billboards after the map.
        const SPRITES           = 0x0080;
    }
}

impl Default for RenderFlags {
    fn default() -> Self {
        Self::all()
    }
}

/// Output resolution and quality knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    /// `n` means `n × n` rays per pixel, averaged.
    pub supersample: u32,
    pub flags: RenderFlags,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 720,
            supersample: 1,
            flags: RenderFlags::default(),
        }
    }
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Evaluate every pixel of `level` seen from `camera` at `time`.
    fn draw_level<C: Colorizer>(&mut self, level: &Level, camera: &Camera, time: f32, colorizer: &C);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Window callers pass `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Linear `0..=1` RGB → opaque 0xAARRGGBB.
#[inline]
pub fn pack_rgb(col: Vec3) -> Rgba {
    let c = (col.clamp(Vec3::ZERO, Vec3::ONE) * 255.0 + Vec3::splat(0.5)).as_uvec3();
    0xFF00_0000 | (c.x << 16) | (c.y << 8) | c.z
}

/// 0xAARRGGBB → `[r, g, b]` bytes.
#[inline]
pub fn unpack_rgb(px: Rgba) -> [u8; 3] {
    [(px >> 16) as u8, (px >> 8) as u8, px as u8]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_clamps_and_rounds() {
        assert_eq!(pack_rgb(Vec3::new(1.0, 0.0, 0.5)), 0xFF_FF_00_80);
        assert_eq!(pack_rgb(Vec3::new(2.0, -1.0, 0.0)), 0xFF_FF_00_00);
        assert_eq!(unpack_rgb(0xFF_12_34_56), [0x12, 0x34, 0x56]);
    }

    #[test]
    fn defaults_enable_everything() {
        let cfg = RenderConfig::default();
        assert_eq!(cfg.flags, RenderFlags::all());
        assert_eq!(cfg.supersample, 1);
        assert!(cfg.flags.contains(RenderFlags::SPRITES | RenderFlags::SKY));
    }
}
