use glam::Vec2;

use crate::world::texture::{NO_TEXTURE, TextureId};

/// Far clip distance: the starting value of every nearest-hit search.
pub const FAR_CLIP: f32 = 10_000.0;

/// What kind of surface produced a [`Hit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Surface {
    Wall,
    Floor,
    Ceiling,
    Sprite,
    /// Nothing was hit before `FAR_CLIP`.
    Background,
}

/// Nearest surface found so far along one ray.
///
/// * `t` only ever shrinks while a ray is being traced.
/// * `uv` is `(u · segment length, height offset)` for walls and sprites,
///   world `(x, z)` for floors and ceilings.
/// * `light` is already clamped to `0..=1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub t: f32,
    pub uv: Vec2,
    pub light: f32,
    pub tex: TextureId,
    pub surface: Surface,
}

impl Hit {
    /// "No hit, background at the far clip": the seed of every fold.
    pub const fn miss() -> Self {
        Self {
            t: FAR_CLIP,
            uv: Vec2::ZERO,
            light: 0.0,
            tex: NO_TEXTURE,
            surface: Surface::Background,
        }
    }

    pub fn new(t: f32, uv: Vec2, light: f32, tex: TextureId, surface: Surface) -> Self {
        Self {
            t,
            uv,
            light: light.clamp(0.0, 1.0),
            tex,
            surface,
        }
    }

    #[inline]
    pub fn is_background(&self) -> bool {
        self.surface == Surface::Background
    }

    /// True if a candidate at parameter `t` would replace this hit.
    #[inline(always)]
    pub fn beaten_by(&self, t: f32) -> bool {
        t < self.t
    }
}

impl Default for Hit {
    fn default() -> Self {
        Self::miss()
    }
}
