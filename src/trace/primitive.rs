//! Ray vs. 2-D line segment, the one primitive every higher-level test uses.
//!
//! ```text
//! D     = B − A
//! denom = cross(dir, D)
//! t     = cross(A − O, D)   / denom      (distance along the ray)
//! u     = cross(A − O, dir) / denom      (fraction along the segment)
//! ```
//!
//! A parallel ray makes `denom == 0`; the divisions then yield ±inf or NaN
//! and the range test below rejects them without a dedicated branch.

use glam::Vec2;

use crate::trace::Ray;

/// Valid ray/segment crossing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeHit {
    pub t: f32,
    /// `0 ≤ u < 1` along `A → B`.
    pub u: f32,
    pub denom: f32,
}

impl EdgeHit {
    /// Segments are only visible from the side their winding faces.
    #[inline(always)]
    pub fn faces_ray(&self) -> bool {
        self.denom < 0.0
    }
}

/// 2-D cross product (`a.x·b.y − a.y·b.x`).
#[inline(always)]
pub fn cross2d(a: Vec2, b: Vec2) -> f32 {
    a.perp_dot(b)
}

/// Intersect a ground-plane ray with the segment `a → b`.
#[inline(always)]
pub fn intersect_segment(origin: Vec2, dir: Vec2, a: Vec2, b: Vec2) -> Option<EdgeHit> {
    let d = b - a;
    let oa = a - origin;
    let denom = cross2d(dir, d);
    let rcp = 1.0 / denom;
    let t = cross2d(oa, d) * rcp;
    let u = cross2d(oa, dir) * rcp;

    // NaN fails every comparison; +inf is caught by `is_finite`.
    let valid = t > 0.0 && t.is_finite() && u >= 0.0 && u < 1.0;
    valid.then_some(EdgeHit { t, u, denom })
}

/// [`intersect_segment`] for a 3-D ray projected onto the ground plane.
#[inline(always)]
pub fn intersect_edge(ray: &Ray, a: Vec2, b: Vec2) -> Option<EdgeHit> {
    intersect_segment(ray.origin_xz(), ray.dir_xz(), a, b)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
