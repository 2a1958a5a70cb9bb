//! Small numeric helpers shared by the colorizer, the compositor and the
//! demo camera. All of them are pure and branch-light.

use glam::{Vec2, Vec3, Vec4, vec2};

/// `x - floor(x)`, always in `0..1` (unlike `f32::fract` for negatives).
#[inline(always)]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

#[inline(always)]
pub fn fract2(v: Vec2) -> Vec2 {
    v - v.floor()
}

/// Floored modulo, `x - y·floor(x/y)`.
#[inline(always)]
pub fn wrap(x: f32, y: f32) -> f32 {
    x - y * (x / y).floor()
}

#[inline(always)]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite step between `e0` and `e1`; `e0 > e1` gives a falling edge.
#[inline(always)]
pub fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// `1.0` if `x >= edge`, else `0.0`.
#[inline(always)]
pub fn step(edge: f32, x: f32) -> f32 {
    if x >= edge { 1.0 } else { 0.0 }
}

/// Scalar hash in `0..1`.
pub fn hash(p: f32) -> f32 {
    let mut p2 = fract2(vec2(p * 5.3983, p * 5.4427));
    let d = vec2(p2.y, p2.x).dot(p2 + vec2(21.5351, 14.3137));
    p2 += Vec2::splat(d);
    fract(p2.x * p2.y * 95.4337)
}

pub fn hash2d(p: Vec2) -> f32 {
    hash(p.dot(vec2(1.0, 41.0)))
}

/// 1-D value noise with cubic fade.
pub fn noise1d(p: f32) -> f32 {
    let fl = p.floor();
    let h0 = hash(fl);
    let h1 = hash(fl + 1.0);
    let fr = p - fl;
    let t = fr * fr * (3.0 - 2.0 * fr);
    h0 * (1.0 - t) + h1 * t
}

/// 2-D value noise tiling every `period` cells.
pub fn noise2d(p: Vec2, period: f32) -> f32 {
    let fl = p.floor();
    let corner = |o: Vec2| {
        let c = fl + o;
        hash2d(vec2(wrap(c.x, period), wrap(c.y, period)))
    };
    let h00 = corner(vec2(0.0, 0.0));
    let h10 = corner(vec2(1.0, 0.0));
    let h01 = corner(vec2(0.0, 1.0));
    let h11 = corner(vec2(1.0, 1.0));

    let fr = p - fl;
    let t1 = fr * fr * (Vec2::splat(3.0) - 2.0 * fr);
    let t0 = Vec2::ONE - t1;
    h00 * t0.x * t0.y + h10 * t1.x * t0.y + h01 * t0.x * t1.y + h11 * t1.x * t1.y
}

/// Four octaves of [`noise2d`], each `persistence` times weaker.
pub fn fbm(p: Vec2, persistence: f32) -> f32 {
    let mut p = (p + Vec2::splat(0.5)) / 8.0;
    let mut val = 0.0;
    let mut tot = 0.0;
    let mut mag = 0.5;
    for (period, shift) in [(4.0, 1.234), (8.0, 2.456), (16.0, 3.678), (32.0, 0.0)] {
        val += noise2d(p, period) * mag;
        tot += mag;
        p = p * 2.0 + Vec2::splat(shift);
        mag *= persistence;
    }
    val / tot
}

/// Cheap triangle-wave cosine approximation on a period of 2.
pub fn cos_approx(x: Vec4) -> Vec4 {
    let x = ((x * 0.5) - (x * 0.5).floor()) * 2.0 - Vec4::ONE;
    let x = x.abs();
    let x2 = x * x;
    x2 * 3.0 - 2.0 * x2 * x
}

/// Snap every channel to 1/48 steps.
pub fn quantize(col: Vec3) -> Vec3 {
    (col * 48.0 + Vec3::splat(0.5)).floor() / 48.0
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
