//! Camera-facing billboards with procedural opacity masks.

use glam::{Vec2, Vec4, vec2};

use crate::trace::hit::{Hit, Surface};
use crate::trace::primitive::intersect_edge;
use crate::trace::Ray;
use crate::world::geometry::{Sprite, SpriteMask};
use crate::world::helpers::{cos_approx, wrap};

impl SpriteMask {
    /// Is the sprite opaque at local `uv` (units from its bottom-left)?
    pub fn covers(self, uv: Vec2) -> bool {
        match self {
            SpriteMask::Solid => true,
            SpriteMask::Barrel => {
                // 23×32 texels, one texel knocked off every corner
                let tc = uv.floor() + vec2(2.0, 1.0);
                wrap(tc.x, 23.0) >= 4.0 || wrap(tc.y, 32.0) >= 2.0
            }
            SpriteMask::Corpse => {
                let o = uv / vec2(57.0, 22.0) * 2.0 - vec2(1.0, 0.8);
                let ripple =
                    cos_approx(Vec4::new(uv.x, uv.y, uv.x, uv.y) * Vec4::new(0.55, 0.41, 0.25, 0.1));
                let d = o.dot(o) + ripple.dot(Vec4::splat(-0.2 * o.y));
                d < 0.4
            }
        }
    }
}

impl Sprite {
    /// Tighten `hit` with this sprite, its quad turned along `axis`.
    ///
    /// Unlike walls there is no facing test: a billboard is visible from
    /// both sides. The ray must cross the quad strictly between its bottom
    /// and top edge, and the mask must be opaque there.
    pub fn resolve(&self, ray: &Ray, axis: Vec2, hit: Hit) -> Hit {
        let half = axis * (0.5 * self.size.x);
        let centre = self.ground_pos();
        let Some(edge) = intersect_edge(ray, centre - half, centre + half) else {
            return hit;
        };

        let y = ray.height_at(edge.t);
        if !(hit.beaten_by(edge.t) && y > self.pos.y && y < self.pos.y + self.size.y) {
            return hit;
        }

        let uv = vec2(edge.u * self.size.x, y - self.pos.y);
        if self.mask.covers(uv) {
            Hit::new(edge.t, uv, self.light, self.tex, Surface::Sprite)
        } else {
            hit
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
