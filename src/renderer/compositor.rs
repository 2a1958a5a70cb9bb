//! Per-sample shading: turns a traced [`Hit`] into a colour.
//!
//! Order of operations for one sample:
//!
//! 1. sky-flat hits are swapped for the screen-space panorama,
//! 2. the intro wipe covers whatever is left of the screen,
//! 3. depth fog darkens the light level (skipped for 1 and 2),
//! 4. the colorizer is sampled and scaled by the light,
//! 5. the result is brightened, clamped and optionally quantised.

use glam::{Vec2, Vec3, vec2};
use std::f32::consts::PI;

use crate::renderer::{LOW_RES, RenderFlags};
use crate::trace::{Hit, View};
use crate::world::helpers::{hash, quantize};
use crate::world::texture::{Colorizer, F_SKY1, FLOOR7_1, TextureId};

/// Light lost per world unit of view-axis depth.
pub const DEPTH_FADE: f32 = 1.0 / 3500.0;

/// Final brightness boost before clamping.
const EXPOSURE: f32 = 1.2;

/// Sky texels per radian of yaw.
const SKY_YAW_SCALE: f32 = 512.0 / PI;
/// Texels per screen height of the wipe.
const WIPE_SCALE: f32 = 128.0;

/// One traced sample: the hit plus where it came from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub hit: Hit,
    /// Normalised direction of the ray that produced `hit`.
    pub dir: Vec3,
    /// Screen position in `0..1`, origin bottom-left.
    pub screen: Vec2,
}

/// What will actually be handed to the colorizer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shading {
    pub tex: TextureId,
    pub uv: Vec2,
    pub light: f32,
}

/// Frame-constant shading state.
#[derive(Clone, Copy, Debug)]
pub struct Compositor {
    view: View,
    flags: RenderFlags,
}

impl Compositor {
    pub fn new(view: View, flags: RenderFlags) -> Self {
        Self { view, flags }
    }

    /// Material, coordinates and final light level for `sample`.
    pub fn shading(&self, sample: &Sample) -> Shading {
        let hit = &sample.hit;
        let mut out = Shading {
            tex: hit.tex,
            uv: hit.uv,
            light: hit.light.clamp(0.0, 1.0),
        };
        let mut fog = self.flags.contains(RenderFlags::FOG);

        if self.flags.contains(RenderFlags::SKY) && hit.tex == F_SKY1 {
            let fwd = self.view.forward;
            let yaw = fwd.x.atan2(fwd.z) * SKY_YAW_SCALE;
            out.uv = vec2(yaw + sample.screen.x * LOW_RES.x, sample.screen.y * LOW_RES.y);
            out.light = 1.0;
            fog = false;
        }

        if self.flags.contains(RenderFlags::INTRO) {
            if let Some(uv) = wipe(self.view.time, sample.screen) {
                out = Shading {
                    tex: FLOOR7_1,
                    uv,
                    light: 1.0,
                };
                fog = false;
            }
        }

        if fog {
            let depth = sample.dir.dot(self.view.forward) * hit.t;
            out.light = (out.light - depth * DEPTH_FADE).clamp(0.0, 1.0);
        }
        out
    }

    /// Final linear colour of `sample` in `0..=1`.
    pub fn shade<C: Colorizer>(&self, sample: &Sample, colorizer: &C) -> Vec3 {
        let s = self.shading(sample);
        let col = (colorizer.color(s.tex, s.uv) * s.light * EXPOSURE).clamp(Vec3::ZERO, Vec3::ONE);
        if self.flags.contains(RenderFlags::QUANTIZE) {
            quantize(col)
        } else {
            col
        }
    }
}

/// Wipe texture coordinates if the curtain still covers `screen` at `time`.
///
/// Each column starts sliding down after one second, delayed by a per-column
/// hash; a column is fully open once its offset reaches one screen height.
fn wipe(time: f32, screen: Vec2) -> Option<Vec2> {
    let offset = (time - 1.0).max(0.0) - hash(screen.x);
    let y = screen.y + offset.clamp(0.0, 1.0);
    (y <= 1.0 && offset < 1.0).then(|| vec2(screen.x, y) * WIPE_SCALE)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::Surface;
    use crate::world::texture::STARTAN3;

    struct Flat(Vec3);

    impl Colorizer for Flat {
        fn color(&self, _: TextureId, _: Vec2) -> Vec3 {
            self.0
        }
    }

    fn sample(tex: TextureId, t: f32, light: f32) -> Sample {
        Sample {
            hit: Hit::new(t, vec2(3.0, 4.0), light, tex, Surface::Wall),
            dir: Vec3::Z,
            screen: vec2(0.5, 0.5),
        }
    }

    fn late(flags: RenderFlags) -> Compositor {
        Compositor::new(View::new(Vec3::Z, 10.0), flags)
    }

    #[test]
    fn fog_darkens_with_view_depth() {
        let c = late(RenderFlags::FOG);
        let s = c.shading(&sample(STARTAN3, 1750.0, 1.0));
        assert!((s.light - 0.5).abs() < 1e-5);
        assert_eq!(s.uv, vec2(3.0, 4.0));

        // depth is measured along the view axis, not along the ray
        let mut oblique = sample(STARTAN3, 1750.0, 1.0);
        oblique.dir = Vec3::new(0.6, 0.0, 0.8);
        assert!((c.shading(&oblique).light - 0.6).abs() < 1e-5);

        // never below black
        assert_eq!(c.shading(&sample(STARTAN3, 9000.0, 0.3)).light, 0.0);
    }

    #[test]
    fn sky_bypasses_fog() {
        let c = late(RenderFlags::FOG | RenderFlags::SKY);
        let s = c.shading(&sample(F_SKY1, 5000.0, 0.2));
        assert_eq!(s.light, 1.0);
        assert_eq!(s.tex, F_SKY1);
        // looking down +z: no yaw offset, centre of the nominal screen
        assert!((s.uv - vec2(160.0, 120.0)).length() < 1e-4);
    }

    #[test]
    fn sky_scrolls_with_yaw() {
        let fwd = Vec3::new(1.0, 0.0, 1.0).normalize();
        let c = Compositor::new(View::new(fwd, 10.0), RenderFlags::SKY);
        let s = c.shading(&sample(F_SKY1, 5000.0, 1.0));
        assert!((s.uv.x - (128.0 + 160.0)).abs() < 1e-3);
    }

    #[test]
    fn without_the_sky_flag_sky_is_a_plain_flat() {
        let c = late(RenderFlags::FOG);
        let s = c.shading(&sample(F_SKY1, 1750.0, 1.0));
        assert_eq!(s.uv, vec2(3.0, 4.0));
        assert!((s.light - 0.5).abs() < 1e-5);
    }

    #[test]
    fn intro_covers_the_screen_at_start_and_is_gone_after_three_seconds() {
        let covered = |time: f32| {
            let c = Compositor::new(View::new(Vec3::Z, time), RenderFlags::INTRO | RenderFlags::FOG);
            let mut n = 0;
            for i in 0..32 {
                for j in 0..24 {
                    let mut s = sample(STARTAN3, 100.0, 0.5);
                    s.screen = vec2(i as f32 / 31.0, j as f32 / 23.0);
                    let out = c.shading(&s);
                    if out.tex == FLOOR7_1 {
                        assert_eq!(out.light, 1.0);
                        n += 1;
                    }
                }
            }
            n
        };
        assert_eq!(covered(0.0), 32 * 24);
        assert_eq!(covered(1.0), 32 * 24);
        let mid = covered(2.0);
        assert!(mid > 0 && mid < 32 * 24, "{mid}");
        assert_eq!(covered(3.0), 0);
    }

    #[test]
    fn shade_brightens_and_clamps() {
        let c = late(RenderFlags::empty());
        let col = c.shade(&sample(STARTAN3, 10.0, 0.5), &Flat(Vec3::new(0.5, 1.0, 2.0)));
        assert!((col - Vec3::new(0.3, 0.6, 1.0)).length() < 1e-5);
    }

    #[test]
    fn quantisation_snaps_to_48_levels() {
        let c = late(RenderFlags::QUANTIZE);
        let col = c.shade(&sample(STARTAN3, 10.0, 0.77), &Flat(Vec3::new(0.31, 0.52, 0.13)));
        for ch in col.to_array() {
            let steps = ch * 48.0;
            assert!((steps - steps.round()).abs() < 1e-3, "{ch}");
        }
    }

    #[test]
    fn background_stays_black() {
        let c = late(RenderFlags::all());
        let miss = Sample {
            hit: Hit::miss(),
            dir: Vec3::Z,
            screen: vec2(0.2, 0.7),
        };
        assert_eq!(c.shade(&miss, &Flat(Vec3::ONE)), Vec3::ZERO);
    }
}
