//! Boundary resolvers: one fold step per segment.
//!
//! Every valid crossing feeds the parity counters, whatever the segment
//! kind. Only then do we ask whether the segment is *seen*: it must face
//! the ray, beat the current nearest hit, and the hit height must fall in
//! one of the bands its [`Boundary`] paints.

use glam::vec2;

use crate::trace::hit::{Hit, Surface};
use crate::trace::parity::Crossings;
use crate::trace::primitive::intersect_edge;
use crate::trace::Ray;
use crate::world::geometry::{Boundary, Segment};
use crate::world::texture::TextureId;

/// Vertical extent and current light level of the sector being evaluated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    pub floor_h: f32,
    pub ceil_h: f32,
    pub light: f32,
}

impl Span {
    #[inline(always)]
    fn contains(&self, y: f32) -> bool {
        y > self.floor_h && y < self.ceil_h
    }
}

impl Boundary {
    /// Painted band at height `y`: `(v, material)`, or `None` where the
    /// boundary is transparent.
    ///
    /// `v` is measured from the band's reference height (floor for walls,
    /// the threshold for partial walls) and is negative below it.
    #[inline]
    pub fn band(&self, y: f32, span: &Span) -> Option<(f32, TextureId)> {
        match *self {
            Boundary::Wall { tex } => span.contains(y).then(|| (y - span.floor_h, tex)),
            Boundary::Opening {
                lower,
                upper,
                lower_tex,
                upper_tex,
            } => {
                if !span.contains(y) {
                    None
                } else if y > upper {
                    Some((y - upper, upper_tex))
                } else if y < lower {
                    Some((y - lower, lower_tex))
                } else {
                    None
                }
            }
            Boundary::Upper { height, tex } => {
                (y > height && y < span.ceil_h).then(|| (y - height, tex))
            }
            Boundary::Lower { height, tex } => {
                (y > span.floor_h && y < height).then(|| (y - height, tex))
            }
            Boundary::Null => None,
        }
    }
}

impl Segment {
    /// Fold step over a sector's segments: `(nearest hit, parity)` in,
    /// tightened `(nearest hit, parity)` out.
    #[inline]
    pub fn resolve(&self, ray: &Ray, span: &Span, acc: (Hit, Crossings)) -> (Hit, Crossings) {
        let (hit, crossings) = acc;
        let Some(edge) = intersect_edge(ray, self.a, self.b) else {
            return acc;
        };
        let crossings = crossings.record(edge.t);

        if !(edge.faces_ray() && hit.beaten_by(edge.t)) {
            return (hit, crossings);
        }

        let y = ray.height_at(edge.t);
        let hit = match self.boundary.band(y, span) {
            Some((v, tex)) => Hit::new(
                edge.t,
                vec2(edge.u * self.len, v),
                span.light + self.light,
                tex,
                Surface::Wall,
            ),
            None => hit,
        };
        (hit, crossings)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
