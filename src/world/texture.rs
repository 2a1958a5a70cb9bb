// Material ids and the procedural colorizer that turns (material, uv) into
// RGB. The tracer only ever sees `TextureId`s; colour is decided here.

use glam::{Vec2, Vec3, Vec4, vec2};

use crate::world::helpers::{
    fbm, fract, fract2, mix, noise1d, smoothstep, step, wrap,
};

/// Runtime handle for a material.
pub type TextureId = u16;

/// Black "no material" id, also used for background hits.
pub const NO_TEXTURE: TextureId = 0;

pub const F_SKY1: TextureId = 1;
pub const NUKAGE3: TextureId = 2;
pub const FLOOR7_1: TextureId = 3;
pub const FLAT5_5: TextureId = 4;
pub const FLOOR4_8: TextureId = 5;
pub const CEIL3_5: TextureId = 6;
pub const TLITE6_4: TextureId = 7;
pub const FLAT14: TextureId = 8;
pub const FLOOR7_2: TextureId = 9;
pub const STEP2: TextureId = 10;
pub const TLITE6_1: TextureId = 11;
pub const DOOR3: TextureId = 12;
pub const LITE3: TextureId = 13;
pub const STARTAN3: TextureId = 14;
pub const BROWN1: TextureId = 15;
pub const DOORSTOP: TextureId = 16;
pub const COMPUTE2: TextureId = 17;
pub const STEP6: TextureId = 18;
pub const BROWN144: TextureId = 19;
pub const SUPPORT2: TextureId = 20;
pub const STARG3: TextureId = 21;
pub const DOORTRAK: TextureId = 22;
pub const SLADWALL: TextureId = 23;
pub const TEKWALL4: TextureId = 24;
pub const SW1COMP: TextureId = 25;
pub const BIGDOOR2: TextureId = 26;
pub const BAR1A: TextureId = 32;
pub const PLAYW: TextureId = 33;

const NAMES: &[(TextureId, &str)] = &[
    (NO_TEXTURE, "-"),
    (F_SKY1, "F_SKY1"),
    (NUKAGE3, "NUKAGE3"),
    (FLOOR7_1, "FLOOR7_1"),
    (FLAT5_5, "FLAT5_5"),
    (FLOOR4_8, "FLOOR4_8"),
    (CEIL3_5, "CEIL3_5"),
    (TLITE6_4, "TLITE6_4"),
    (FLAT14, "FLAT14"),
    (FLOOR7_2, "FLOOR7_2"),
    (STEP2, "STEP2"),
    (TLITE6_1, "TLITE6_1"),
    (DOOR3, "DOOR3"),
    (LITE3, "LITE3"),
    (STARTAN3, "STARTAN3"),
    (BROWN1, "BROWN1"),
    (DOORSTOP, "DOORSTOP"),
    (COMPUTE2, "COMPUTE2"),
    (STEP6, "STEP6"),
    (BROWN144, "BROWN144"),
    (SUPPORT2, "SUPPORT2"),
    (STARG3, "STARG3"),
    (DOORTRAK, "DOORTRAK"),
    (SLADWALL, "SLADWALL"),
    (TEKWALL4, "TEKWALL4"),
    (SW1COMP, "SW1COMP"),
    (BIGDOOR2, "BIGDOOR2"),
    (BAR1A, "BAR1A"),
    (PLAYW, "PLAYW"),
];

/// Lump-style name of a material, `"?"` for unknown ids.
pub fn texture_name(id: TextureId) -> &'static str {
    NAMES
        .iter()
        .find(|(i, _)| *i == id)
        .map(|(_, n)| *n)
        .unwrap_or("?")
}

/// Reverse of [`texture_name`].
pub fn texture_id(name: &str) -> Option<TextureId> {
    NAMES.iter().find(|(_, n)| *n == name).map(|(i, _)| *i)
}

/// Material + local coordinates → linear RGB in `0..=1`.
///
/// Implementations must be pure; the renderer calls them from many threads.
pub trait Colorizer: Sync {
    fn color(&self, tex: TextureId, uv: Vec2) -> Vec3;
}

/// Noise-based stand-ins for the E1M1 textures.
#[derive(Clone, Copy, Debug, Default)]
pub struct Procedural {
    /// Snap texture coordinates to whole texels.
    pub pixelate: bool,
}

impl Procedural {
    pub fn new(pixelate: bool) -> Self {
        Self { pixelate }
    }
}

impl Colorizer for Procedural {
    fn color(&self, tex: TextureId, uv: Vec2) -> Vec3 {
        let tc = if self.pixelate { uv.floor() } else { uv };
        let rnd = fbm(tc, 0.5);
        let hrnd = noise1d(tc.y * 0.1);

        match tex {
            F_SKY1 => sky1(tc, rnd, hrnd),
            NUKAGE3 => nukage3(rnd),
            FLOOR7_1 => rgb255(51.0, 43.0, 19.0).lerp(rgb255(79.0, 59.0, 35.0), rnd * rnd * 2.5),
            FLAT5_5 => {
                let col = rgb255(63.0, 47.0, 23.0).lerp(rgb255(147.0, 123.0, 99.0), rnd);
                col * (wrap(tc.x, 2.0) * 0.15 + 0.85)
            }
            FLOOR4_8 => floor4_8(tc, rnd),
            CEIL3_5 => ceil3_5(tc, rnd),
            TLITE6_4 | TLITE6_1 => tlite6(tc),
            FLAT14 => Vec3::new(0.0, 0.0, 35.0 / 255.0)
                .lerp(Vec3::new(0.0, 0.0, 200.0 / 255.0), rnd * rnd),
            FLOOR7_2 => rgb255(59.0, 47.0, 23.0).lerp(rgb255(91.0, 71.0, 43.0), rnd * rnd * 2.0),
            STEP2 => Vec3::splat(0.30).lerp(Vec3::splat(0.55), rnd) * Vec3::new(0.85, 0.80, 0.75),
            DOOR3 => door3(tc, rnd, hrnd),
            LITE3 => lite3(tc),
            STARTAN3 => {
                let panel = step(wrap(tc.x, 64.0), 1.0) * 0.12;
                let vline = step(wrap(tc.y, 32.0), 0.5) * 0.06;
                tint(rnd * 0.4 + 0.4 - panel - vline, 0.65, 0.50, 0.35)
            }
            BROWN1 => {
                let shade = (rnd * 0.35 + 0.25) * (1.0 - step(wrap(tc.y, 64.0), 0.5) * 0.08);
                tint(shade, 0.60, 0.45, 0.30)
            }
            DOORSTOP => {
                let shade = (rnd * 0.2 + 0.35) * (1.0 - step(wrap(tc.x, 8.0), 0.5) * 0.1);
                tint(shade, 0.55, 0.43, 0.30)
            }
            COMPUTE2 => compute2(tc, rnd),
            STEP6 => {
                let edge = step(wrap(tc.y, 16.0), 1.0) * 0.1;
                (Vec3::splat(0.28).lerp(Vec3::splat(0.50), rnd) - Vec3::splat(edge))
                    * Vec3::new(0.80, 0.75, 0.70)
            }
            BROWN144 => tint(rnd * 0.3 + 0.3, 0.58, 0.42, 0.28),
            SUPPORT2 => {
                Vec3::splat(0.25).lerp(Vec3::splat(0.50), rnd) * Vec3::new(0.75, 0.70, 0.65)
            }
            STARG3 => {
                let panel = step(wrap(tc.x, 64.0), 1.0) * 0.08;
                tint(rnd * 0.3 + 0.35 - panel, 0.70, 0.68, 0.65)
            }
            DOORTRAK => {
                Vec3::splat(0.15).lerp(Vec3::splat(0.35), rnd) * Vec3::new(0.70, 0.65, 0.60)
            }
            SLADWALL => tint(rnd * 0.3 + 0.25, 0.45, 0.55, 0.35),
            TEKWALL4 => tekwall4(tc, rnd),
            SW1COMP => tekwall4(tc, rnd) + Vec3::new(0.1, 0.0, 0.0),
            BIGDOOR2 => {
                let panel = step(8.0, wrap(tc.x, 128.0)) * step(wrap(tc.x, 128.0), 120.0);
                tint((rnd * 0.25 + 0.30) * (panel * 0.2 + 0.8), 0.55, 0.52, 0.48)
            }
            BAR1A => {
                let stripe = step(wrap(tc.y, 11.0), 3.0);
                Vec3::new(0.15, 0.35, 0.10)
                    .lerp(Vec3::new(0.40, 0.28, 0.12), stripe * 0.6 + rnd * 0.3)
            }
            PLAYW => Vec3::new(0.35, 0.22, 0.15).lerp(Vec3::new(0.55, 0.35, 0.25), rnd * 0.8),
            _ => Vec3::ZERO,
        }
    }
}

/*──────────────────────── per-material procedures ───────────────────────*/

#[inline]
fn rgb255(r: f32, g: f32, b: f32) -> Vec3 {
    Vec3::new(r, g, b) / 255.0
}

#[inline]
fn tint(shade: f32, r: f32, g: f32, b: f32) -> Vec3 {
    Vec3::new(shade * r, shade * g, shade * b)
}

fn nukage3(rnd: f32) -> Vec3 {
    let blend = smoothstep(0.8, 0.0, rnd).min(smoothstep(1.0, 0.8, rnd)) * 1.5;
    rgb255(11.0, 23.0, 7.0).lerp(rgb255(46.0, 83.0, 39.0), blend)
}

fn add_mountain(shade: &mut f32, uv: Vec2, rnd: f32, hrnd: f32, m: [f32; 4]) {
    let [x_pos, width, height, fog] = m;
    let mut y = 1.0
        - smoothstep(
            0.0,
            1.0,
            (fract(x_pos - uv.x + uv.y * 0.05 + 0.5) - 0.5).abs() * width,
        );
    y += hrnd * 0.05 + rnd * 0.05;
    y *= height;
    let dist = y - uv.y;
    if dist > 0.0 {
        let s = rnd * ((1.0 - (dist.sqrt() * 2.0).clamp(0.0, 1.0)) * 0.3 + 0.1);
        *shade = mix(s, 0.6 + 0.1 * rnd, fog);
    }
}

fn sky1(tc: Vec2, rnd: f32, hrnd: f32) -> Vec3 {
    let mut shade = 0.6 + 0.1 * rnd;
    let mut uv = tc * vec2(1.0 / 256.0, 1.0 / 128.0);
    uv.y = 1.0 - uv.y;
    for m in [
        [0.25, 1.0, 0.85, 0.5],
        [1.5, 4.0, 0.78, 0.2],
        [1.94, 2.51, 0.8, 0.0],
    ] {
        add_mountain(&mut shade, uv, rnd, hrnd, m);
    }
    Vec3::splat(shade)
}

/// Hex-grid cell: (cell index, distance to centre, edge test).
fn hexagon(uv: Vec2) -> Vec4 {
    let row = uv.y.floor();
    let mut local = uv;
    let mut row_even = wrap(row, 2.0);
    if row_even < 0.5 {
        local.x += 0.5;
    }
    let mut index = local.floor();
    let tile = fract2(local);

    if tile.x * (2.0 / 3.0) + 2.0 / 3.0 < tile.y {
        if row_even < 0.5 {
            index.x -= 1.0;
        }
        row_even = 1.0 - row_even;
        index.y += 1.0;
    }
    if tile.x * (-2.0 / 3.0) + 4.0 / 3.0 < tile.y {
        if row_even >= 0.5 {
            index.x += 1.0;
        }
        row_even = 1.0 - row_even;
        index.y += 1.0;
    }

    let mut centre = index - vec2(0.0, -1.0 / 3.0);
    if row_even > 0.5 {
        centre.x += 0.5;
    }
    let delta = uv - centre;
    let d1 = delta.x;
    let d2 = delta.dot(vec2(2.0 / 3.0, 1.0).normalize()) * 0.9;
    let d3 = delta.dot(vec2(-2.0 / 3.0, 1.0).normalize()) * 0.9;
    let dist = d1.abs().max(d2.abs().max(d3.abs()));
    let test = (-d1).max(-d2).max(d3);
    Vec4::new(index.x, index.y, dist, test)
}

fn floor4_8(tc: Vec2, rnd: f32) -> Vec3 {
    let col = Vec3::splat(30.0 / 255.0).lerp(Vec3::splat(150.0 / 255.0), rnd * rnd);
    let hex = hexagon(vec2(tc.y, tc.x) / 32.0);
    let shadow = ((0.5 - hex.z) * 15.0).clamp(0.0, 1.0) * 0.5 + 0.5;
    let highlight = 1.0 + (1.0 - (0.45 - hex.w).abs() * 32.0).clamp(0.0, 1.0) * 0.5;
    col * (((0.5 - hex.z) * 2.0).clamp(0.0, 1.0) * 0.25 + 0.75) * highlight * shadow
}

fn ceil3_5(tc: Vec2, rnd: f32) -> Vec3 {
    let mut t = tc;
    t.x -= 17.0;
    let y_off = if (0.0..32.0).contains(&t.x) { 58.0 } else { 11.0 };
    t.y -= y_off;
    t = vec2(wrap(t.x, 32.0), wrap(t.y, 64.0));

    let closest = t.clamp(Vec2::splat(4.0), vec2(28.0, 60.0));
    let dist2 = (t - closest).length_squared();

    let mut shade = 55.0 / 255.0;
    shade = mix(shade, 59.0 / 255.0, smoothstep(0.6, 0.45, rnd));
    shade = mix(shade, 47.0 / 255.0, smoothstep(0.45, 0.35, rnd));
    shade = mix(shade, 47.0 / 255.0, step(1.5, dist2));
    shade = mix(shade, 39.0 / 255.0, step(13.5, dist2));
    let mut col = Vec3::splat(shade);

    // rivets around the panel border
    if t.x < 12.0 || t.x > 20.0 || t.y < 12.0 || t.y > 52.0 {
        let r_row = wrap(t.y - 3.5, 7.5).floor();
        let r_col = wrap(t.x - 15.0, 10.0);
        if r_row == 2.0 && r_col == 0.0 {
            col -= Vec3::splat(0.05);
        }
        if r_row <= 2.0 && r_col <= 2.0 {
            let off = vec2(r_row - 1.0, r_col - 1.0);
            let d2 = off.length_squared() / 2.0;
            col += Vec3::splat((1.0 - d2).clamp(0.0, 1.0) * 0.05);
        }
    }
    col
}

fn tlite6(tc: Vec2) -> Vec3 {
    let v = wrap(tc.y, 16.0) / 16.0;
    let bright = smoothstep(0.2, 0.5, 1.0 - (v - 0.5).abs() * 2.0);
    Vec3::splat(0.15).lerp(Vec3::new(0.90, 0.85, 0.70), bright)
}

/// Raised (`hi`) / sunken (`lo`) outline of the box spanned by two corners.
fn indent(tc: Vec2, high: Vec2, low: Vec2, hi: f32, lo: f32) -> f32 {
    let min = low.min(high);
    let max = low.max(high);
    if tc.x < min.x || tc.x > max.x || tc.y < min.y || tc.y > max.y {
        return 1.0;
    }
    if tc.x == high.x || tc.y == high.y {
        return hi;
    }
    if tc.x == low.x || tc.y == low.y {
        return lo;
    }
    1.0
}

fn door3(tc: Vec2, rnd: f32, hrnd: f32) -> Vec3 {
    let streak = ((fract(hrnd + rnd) - 0.5).abs() * 3.0).clamp(0.0, 1.0);
    let streak = streak * streak;
    let mut shade = 1.0 - ((tc.y / 72.0) - 0.5).abs() * 2.0;
    shade = shade * shade * 0.2 + 0.3;
    shade *= hrnd * 0.2 + 0.8;
    shade *= indent(tc, Vec2::splat(8.0), Vec2::splat(56.0), 0.8, 1.2);
    shade += rnd * 0.1;
    let top = smoothstep(32.0, 0.0, tc.y);
    let bot = smoothstep(40.0, 72.0, tc.y);
    shade *= 1.0 - streak * top.max(bot) * 0.2;
    Vec3::splat(shade)
}

fn lite3(tc: Vec2) -> Vec3 {
    let u = wrap(tc.x, 16.0) / 16.0;
    let v = wrap(tc.y, 128.0) / 128.0;
    let bright = smoothstep(0.3, 0.5, 1.0 - (u - 0.5).abs() * 2.0)
        * smoothstep(0.1, 0.3, v)
        * smoothstep(0.9, 0.7, v);
    Vec3::new(0.12, 0.12, 0.10).lerp(Vec3::new(0.85, 0.80, 0.65), bright)
}

fn compute2(tc: Vec2, rnd: f32) -> Vec3 {
    let x = wrap(tc.x, 64.0);
    let y = wrap(tc.y, 128.0);
    let screen = step(4.0, x) * step(x, 60.0) * step(4.0, y) * step(y, 124.0);
    let scanline = (tc.y * std::f32::consts::TAU).sin() * 0.1 + 0.9;
    let frame = Vec3::new(0.25, 0.22, 0.18);
    let scr = Vec3::new(0.05, 0.25 * rnd * scanline, 0.12 * scanline);
    frame.lerp(scr, screen)
}

fn tekwall4(tc: Vec2, rnd: f32) -> Vec3 {
    let x = wrap(tc.x, 64.0);
    let y = wrap(tc.y, 128.0);
    let panel = step(2.0, x) * step(x, 62.0) * step(2.0, y) * step(y, 126.0);
    Vec3::new(0.28, 0.26, 0.24).lerp(Vec3::new(0.45, 0.42, 0.38), rnd * panel)
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
