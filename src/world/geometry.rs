use glam::{Vec2, Vec3, vec2};

use crate::world::helpers::hash;
use crate::world::texture::TextureId;

pub type SectorId = u16;
pub type SegmentId = u16;

/// Light step used for Doom's "fake contrast" on axis-aligned walls.
pub const LIGHT_STEP: f32 = 1.0 / 16.0;

/// Runtime snapshot of one map (immutable after construction).
///
/// There is no BSP, blockmap or adjacency graph: the tracer visits every
/// sector and every segment for every ray.
#[derive(Clone, Debug)]
pub struct Level {
    pub name: String,
    pub sectors: Vec<Sector>,
    pub sprites: Vec<Sprite>,
}

/*--------------------------- boundaries -----------------------------*/

/// What a boundary segment looks like from inside its sector.
///
/// Closed set, dispatched by a single `match` in the tracer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Boundary {
    /// Solid from floor to ceiling.
    Wall { tex: TextureId },
    /// Two partial walls with a pass-through gap `lower .. upper` between.
    Opening {
        lower: f32,
        upper: f32,
        lower_tex: TextureId,
        upper_tex: TextureId,
    },
    /// Partial wall above `height` (neighbour has a lower ceiling).
    Upper { height: f32, tex: TextureId },
    /// Partial wall below `height` (neighbour has a higher floor).
    Lower { height: f32, tex: TextureId },
    /// Invisible; only closes the polygon for the parity test.
    Null,
}

/// One edge of a sector polygon on the ground (x, z) plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
    /// Authored length, scales the `u` texture coordinate.
    pub len: f32,
    /// Added to the sector light for this segment.
    pub light: f32,
    pub boundary: Boundary,
}

impl Segment {
    pub fn new(a: Vec2, b: Vec2, len: f32, light: f32, boundary: Boundary) -> Self {
        Self {
            a,
            b,
            len,
            light,
            boundary,
        }
    }

    /// Solid wall whose length is measured from its end points.
    pub fn wall(a: Vec2, b: Vec2, tex: TextureId) -> Self {
        Self::new(a, b, a.distance(b), 0.0, Boundary::Wall { tex })
    }

    pub fn null(a: Vec2, b: Vec2) -> Self {
        Self::new(a, b, a.distance(b), 0.0, Boundary::Null)
    }

    pub fn opening(a: Vec2, b: Vec2, lower: f32, upper: f32, tex: (TextureId, TextureId)) -> Self {
        Self::new(
            a,
            b,
            a.distance(b),
            0.0,
            Boundary::Opening {
                lower,
                upper,
                lower_tex: tex.0,
                upper_tex: tex.1,
            },
        )
    }

    pub fn upper(a: Vec2, b: Vec2, height: f32, tex: TextureId) -> Self {
        Self::new(a, b, a.distance(b), 0.0, Boundary::Upper { height, tex })
    }

    pub fn lower(a: Vec2, b: Vec2, height: f32, tex: TextureId) -> Self {
        Self::new(a, b, a.distance(b), 0.0, Boundary::Lower { height, tex })
    }

    /// Same segment with a light delta.
    pub fn lit(self, light: f32) -> Self {
        Self { light, ..self }
    }
}

/*----------------------------- sectors ------------------------------*/

/// Sector brightness as a pure function of time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SectorLight {
    Steady(f32),
    /// Random on/off flicker, re-rolled `rate` times per second.
    Flicker {
        lit: f32,
        dim: f32,
        rate: f32,
        threshold: f32,
    },
}

impl SectorLight {
    pub fn at(self, time: f32) -> f32 {
        match self {
            SectorLight::Steady(l) => l,
            SectorLight::Flicker {
                lit,
                dim,
                rate,
                threshold,
            } => {
                if hash((time * rate).floor()) > threshold {
                    dim
                } else {
                    lit
                }
            }
        }
    }
}

/// Vertically bounded polygonal region.
///
/// * `segments` must form one or more closed, simple loops when projected
///   onto the ground plane (see [`Level::validate`]).
/// * A segment is visible only from the side its winding faces.
#[derive(Clone, Debug)]
pub struct Sector {
    pub floor_h: f32,
    pub ceil_h: f32,
    pub floor_tex: TextureId,
    pub ceil_tex: TextureId,
    pub light: SectorLight,
    pub segments: Vec<Segment>,
}

impl Sector {
    pub fn new(floor_h: f32, ceil_h: f32, flats: (TextureId, TextureId), light: f32) -> Self {
        Self {
            floor_h,
            ceil_h,
            floor_tex: flats.0,
            ceil_tex: flats.1,
            light: SectorLight::Steady(light),
            segments: Vec::new(),
        }
    }

    pub fn with_light(mut self, light: SectorLight) -> Self {
        self.light = light;
        self
    }

    pub fn with_segments<I: IntoIterator<Item = Segment>>(mut self, segments: I) -> Self {
        self.segments.extend(segments);
        self
    }

    /// Closed loop of solid walls through `points` (last joins first).
    pub fn with_wall_loop(self, points: &[Vec2], tex: TextureId) -> Self {
        let n = points.len();
        self.with_segments((0..n).map(|i| Segment::wall(points[i], points[(i + 1) % n], tex)))
    }

    /// Axis-aligned bounds of the footprint: `(min, max)`.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        self.segments.iter().fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(lo, hi), s| (lo.min(s.a).min(s.b), hi.max(s.a).max(s.b)),
        )
    }
}

/*----------------------------- sprites ------------------------------*/

/// Per-sprite opacity mask over local quad coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteMask {
    Solid,
    Barrel,
    Corpse,
}

/// Camera-facing billboard standing on `pos`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    /// Bottom-centre anchor in world space.
    pub pos: Vec3,
    /// Quad width / height in map units.
    pub size: Vec2,
    pub light: f32,
    pub tex: TextureId,
    pub mask: SpriteMask,
}

impl Sprite {
    pub fn new(pos: Vec3, size: Vec2, light: f32, tex: TextureId, mask: SpriteMask) -> Self {
        Self {
            pos,
            size,
            light,
            tex,
            mask,
        }
    }

    #[inline]
    pub fn ground_pos(&self) -> Vec2 {
        vec2(self.pos.x, self.pos.z)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_loop_closes() {
        let pts = [
            vec2(0.0, 0.0),
            vec2(0.0, 100.0),
            vec2(100.0, 100.0),
            vec2(100.0, 0.0),
        ];
        let sector = Sector::new(0.0, 128.0, (1, 2), 1.0).with_wall_loop(&pts, 3);
        assert_eq!(sector.segments.len(), 4);
        assert_eq!(sector.segments[3].b, pts[0]);
        assert_eq!(sector.segments[1].len, 100.0);
        assert_eq!(sector.bounds(), (vec2(0.0, 0.0), vec2(100.0, 100.0)));
    }

    #[test]
    fn steady_light_ignores_time() {
        let l = SectorLight::Steady(0.75);
        assert_eq!(l.at(0.0), 0.75);
        assert_eq!(l.at(123.4), 0.75);
    }

    #[test]
    fn flicker_only_takes_its_two_levels_and_holds_per_tick() {
        let l = SectorLight::Flicker {
            lit: 1.0,
            dim: 0.5,
            rate: 10.0,
            threshold: 0.3,
        };
        let mut seen = [false; 2];
        for i in 0..200 {
            let t = i as f32 * 0.1 + 0.05;
            let v = l.at(t);
            assert!(v == 1.0 || v == 0.5);
            seen[(v == 1.0) as usize] = true;
            // constant within one tick
            assert_eq!(v, l.at(t + 0.02));
        }
        assert!(seen[0] && seen[1], "flicker should hit both levels");
    }

    #[test]
    fn lit_sets_delta() {
        let s = Segment::null(vec2(0.0, 0.0), vec2(3.0, 4.0)).lit(-LIGHT_STEP);
        assert_eq!(s.len, 5.0);
        assert_eq!(s.light, -LIGHT_STEP);
    }
}
