//! The "Hangar" (E1M1) as a compile-time table: the part of the map around
//! the player start, nine sectors and four props.
//!
//! Coordinates are Doom map units with the map's `y` axis stored as `z`.
//! Segment lengths are the authored ones, not recomputed, so wall textures
//! line up the way they do in Doom.

use glam::{Vec2, Vec3, vec2};
use once_cell::sync::Lazy;

use crate::world::geometry::{
    Boundary, LIGHT_STEP, Level, Sector, SectorLight, Segment, Sprite, SpriteMask,
};
use crate::world::texture::*;

const KC: f32 = LIGHT_STEP;

pub const BARREL_SIZE: Vec2 = Vec2::new(23.0, 32.0);
pub const CORPSE_SIZE: Vec2 = Vec2::new(57.0, 22.0);

/// Built once on first use, shared read-only afterwards.
pub static HANGAR: Lazy<Level> = Lazy::new(hangar);

/*──────────────────────── table helpers ─────────────────────────*/

#[inline]
fn ends(e: &[i32]) -> (Vec2, Vec2) {
    (
        vec2(e[0] as f32, e[1] as f32),
        vec2(e[2] as f32, e[3] as f32),
    )
}

/// `e = [ax, az, bx, bz, len]`
fn edge(e: [i32; 5], light: f32, boundary: Boundary) -> Segment {
    let (a, b) = ends(&e);
    Segment::new(a, b, e[4] as f32, light, boundary)
}

fn wall(e: [i32; 5], light: f32, tex: TextureId) -> Segment {
    edge(e, light, Boundary::Wall { tex })
}

fn open(e: [i32; 5], light: f32, lower: f32, upper: f32, tex: (TextureId, TextureId)) -> Segment {
    edge(
        e,
        light,
        Boundary::Opening {
            lower,
            upper,
            lower_tex: tex.0,
            upper_tex: tex.1,
        },
    )
}

fn upper(e: [i32; 5], light: f32, height: f32, tex: TextureId) -> Segment {
    edge(e, light, Boundary::Upper { height, tex })
}

fn lower(e: [i32; 5], light: f32, height: f32, tex: TextureId) -> Segment {
    edge(e, light, Boundary::Lower { height, tex })
}

fn null(e: [i32; 4]) -> Segment {
    let (a, b) = ends(&e);
    Segment::null(a, b)
}

fn barrel(x: f32, y: f32, z: f32, light: f32) -> Sprite {
    Sprite::new(Vec3::new(x, y, z), BARREL_SIZE, light, BAR1A, SpriteMask::Barrel)
}

fn corpse(x: f32, y: f32, z: f32, light: f32) -> Sprite {
    Sprite::new(Vec3::new(x, y, z), CORPSE_SIZE, light, PLAYW, SpriteMask::Corpse)
}

/*──────────────────────────── table ─────────────────────────────*/

fn hangar() -> Level {
    let sectors = vec![
        // Nukage pool, sunk below the courtyard.
        Sector::new(-80.0, 216.0, (NUKAGE3, F_SKY1), 1.0)
            .with_segments([
                lower([1520, -3168, 1672, -3104, 164], 0.0, -56.0, BROWN144),
                lower([1672, -3104, 1896, -3104, 224], -KC, -56.0, BROWN144),
                lower([1896, -3104, 2040, -3144, 149], 0.0, -56.0, BROWN144),
                lower([2040, -3144, 2128, -3272, 155], 0.0, -56.0, BROWN144),
                lower([2128, -3272, 2064, -3408, 150], 0.0, -56.0, BROWN144),
                lower([2064, -3408, 1784, -3448, 282], 0.0, -56.0, BROWN144),
                lower([1784, -3448, 1544, -3384, 248], 0.0, -56.0, BROWN144),
                lower([1544, -3384, 1520, -3168, 217], 0.0, -56.0, BROWN144),
            ]),
        // Open-air courtyard around the pool.
        Sector::new(-56.0, 216.0, (FLOOR7_1, F_SKY1), 1.0)
            .with_segments([
                open([1376, -3200, 1376, -3104, 96], KC, 8.0, 192.0, (STARTAN3, STARTAN3)),
                open([1376, -3360, 1376, -3264, 96], KC, 8.0, 192.0, (STARTAN3, STARTAN3)),
                wall([1376, -3264, 1376, -3200, 64], KC, STARTAN3),
                wall([1376, -3104, 1376, -2944, 160], KC, STARTAN3),
                wall([1376, -2944, 1472, -2880, 115], 0.0, STARTAN3),
                wall([1856, -2880, 1920, -2920, 75], 0.0, STARTAN3),
                null([1520, -3168, 1672, -3104]),
                null([1672, -3104, 1896, -3104]),
                null([1896, -3104, 2040, -3144]),
                null([2040, -3144, 2128, -3272]),
                null([2128, -3272, 2064, -3408]),
                null([2064, -3408, 1784, -3448]),
                null([1784, -3448, 1544, -3384]),
                null([1544, -3384, 1520, -3168]),
                wall([2736, -3360, 2736, -3648, 288], KC, STARTAN3),
                wall([2736, -3648, 1376, -3648, 1360], 0.0, STARTAN3),
                wall([2240, -2920, 2272, -3008, 93], 0.0, STARTAN3),
                wall([2272, -3008, 2432, -3112, 190], 0.0, STARTAN3),
                wall([2432, -3112, 2736, -3112, 304], -KC, STARTAN3),
                open([2736, -3112, 2736, -3360, 248], KC, 0.0, 136.0, (STARTAN3, STARTAN3)),
                wall([1376, -3648, 1376, -3360, 288], KC, STARTAN3),
                wall([1472, -2880, 1856, -2880, 384], -KC, STARTAN3),
                wall([1920, -2920, 2240, -2920, 320], -KC, STARTAN3),
            ]),
        // Southern window frame between the hall and the courtyard.
        Sector::new(8.0, 192.0, (FLAT5_5, FLAT5_5), 1.0)
            .with_segments([
                null([1344, -3264, 1344, -3360]),
                null([1376, -3360, 1376, -3264]),
                wall([1344, -3264, 1376, -3264, 32], -KC, DOORSTOP),
                wall([1376, -3360, 1344, -3360, 32], -KC, DOORSTOP),
            ]),
        // Northern window frame.
        Sector::new(8.0, 192.0, (FLAT5_5, FLAT5_5), 1.0)
            .with_segments([
                null([1344, -3104, 1344, -3200]),
                null([1376, -3200, 1376, -3104]),
                wall([1376, -3200, 1344, -3200, 32], -KC, DOORSTOP),
                wall([1344, -3104, 1376, -3104, 32], -KC, DOORSTOP),
            ]),
        // Corridor leading north.
        Sector::new(0.0, 144.0, (FLOOR4_8, CEIL3_5), 0.565)
            .with_segments([
                wall([1216, -2880, 1248, -2528, 353], 0.0, STARTAN3),
                wall([1384, -2592, 1344, -2880, 290], 0.0, STARTAN3),
                wall([1472, -2560, 1384, -2592, 93], 0.0, STARTAN3),
                wall([1248, -2528, 1472, -2432, 243], 0.0, STARTAN3),
                upper([1344, -2880, 1216, -2880, 128], -KC, 72.0, STARTAN3),
                upper([1472, -2432, 1472, -2560, 128], KC, 88.0, STARTAN3),
            ]),
        // Sunken centre of the hall under the tall ceiling.
        Sector::new(-16.0, 200.0, (FLAT14, CEIL3_5), 0.878)
            .with_segments([
                wall([1216, -3392, 1216, -3360, 32], KC, BROWN1),
                wall([1216, -3360, 1184, -3360, 32], -KC, BROWN1),
                wall([1184, -3104, 1216, -3104, 32], -KC, BROWN1),
                wall([1216, -3104, 1216, -3072, 32], KC, BROWN1),
                open([1344, -3264, 1344, -3360, 96], KC, 8.0, 192.0, (STARTAN3, STARTAN3)),
                wall([1344, -3200, 1344, -3264, 64], KC, STARTAN3),
                open([1344, -3104, 1344, -3200, 96], KC, 8.0, 192.0, (STARTAN3, STARTAN3)),
                open([1344, -3360, 1216, -3392, 131], 0.0, 0.0, 72.0, (STEP6, STARTAN3)),
                open([1216, -3072, 1344, -3104, 131], 0.0, 0.0, 72.0, (STEP6, STARTAN3)),
                open([928, -3104, 1184, -3104, 256], -KC, -8.0, 120.0, (STEP6, STARTAN3)),
                open([1184, -3360, 928, -3360, 256], -KC, -8.0, 120.0, (STEP6, STARTAN3)),
                open([928, -3360, 928, -3104, 256], KC, -8.0, 120.0, (STEP6, STARTAN3)),
            ]),
        // Step ring around the carpet.
        Sector::new(-8.0, 120.0, (FLAT14, CEIL3_5), 0.753)
            .with_segments([
                wall([928, -3392, 928, -3360, 32], KC, BROWN1),
                wall([928, -3360, 896, -3360, 32], -KC, BROWN1),
                wall([1184, -3360, 1184, -3392, 32], KC, BROWN1),
                wall([896, -3104, 928, -3104, 32], -KC, BROWN1),
                wall([928, -3104, 928, -3072, 32], KC, BROWN1),
                wall([1184, -3072, 1184, -3104, 32], KC, BROWN1),
                open([1184, -3392, 928, -3392, 256], -KC, 0.0, 72.0, (STEP6, COMPUTE2)),
                null([928, -3104, 1184, -3104]),
                null([1184, -3360, 928, -3360]),
                null([928, -3360, 928, -3104]),
                open([896, -3360, 896, -3104, 256], KC, 0.0, 72.0, (STEP6, COMPUTE2)),
                open([928, -3072, 1184, -3072, 256], -KC, 0.0, 72.0, (STEP6, COMPUTE2)),
            ]),
        // Outer hall where the player starts.
        Sector::new(0.0, 72.0, (FLOOR4_8, CEIL3_5), 0.565)
            .with_segments([
                wall([1152, -3648, 1088, -3648, 64], -KC, STARTAN3),
                wall([1024, -3648, 960, -3648, 64], -KC, STARTAN3),
                wall([1280, -3552, 1152, -3648, 160], 0.0, STARTAN3),
                wall([960, -3648, 832, -3552, 160], 0.0, STARTAN3),
                wall([1344, -3552, 1280, -3552, 64], -KC, STARTAN3),
                wall([832, -3552, 704, -3552, 128], -KC, STARTAN3),
                wall([896, -3392, 928, -3392, 32], -KC, BROWN1),
                wall([896, -3360, 896, -3392, 32], KC, BROWN1),
                wall([1184, -3392, 1216, -3392, 32], -KC, BROWN1),
                wall([896, -3072, 896, -3104, 32], KC, BROWN1),
                wall([928, -3072, 896, -3072, 32], -KC, BROWN1),
                wall([1216, -3072, 1184, -3072, 32], -KC, BROWN1),
                wall([1344, -2880, 1344, -3104, 224], KC, STARTAN3),
                null([1184, -3392, 928, -3392]),
                null([1344, -3360, 1216, -3392]),
                null([1216, -3072, 1344, -3104]),
                wall([704, -2944, 832, -2944, 128], -KC, STARTAN3),
                wall([832, -2944, 968, -2880, 150], 0.0, STARTAN3),
                wall([968, -2880, 1216, -2880, 248], -KC, STARTAN3),
                null([1088, -3648, 1024, -3648]),
                null([896, -3360, 896, -3104]),
                null([928, -3072, 1184, -3072]),
                wall([704, -3552, 704, -2944, 608], KC, STARTAN3),
                null([1344, -2880, 1216, -2880]),
                wall([1344, -3360, 1344, -3392, 32], KC, STARTAN3),
                wall([1344, -3392, 1344, -3552, 160], KC, STARTAN3),
            ]),
        // Door alcove behind the start, with a flickering light.
        Sector::new(0.0, 72.0, (FLOOR4_8, CEIL3_5), 1.0)
            .with_light(SectorLight::Flicker {
                lit: 1.0,
                dim: 0.565,
                rate: 10.0,
                threshold: 0.3,
            })
            .with_segments([
                wall([1088, -3680, 1024, -3680, 64], -KC, DOOR3),
                wall([1024, -3680, 1024, -3648, 32], KC, LITE3),
                wall([1088, -3648, 1088, -3680, 32], KC, LITE3),
                null([1088, -3648, 1024, -3648]),
            ]),
    ];

    let sprites = vec![
        barrel(1088.0, 0.0, -2944.0, 0.565),
        barrel(864.0, 0.0, -3328.0, 0.565),
        barrel(1312.0, -16.0, -3264.0, 0.878),
        corpse(1024.0, -16.0, -3264.0, 0.878),
    ];

    Level {
        name: "E1M1".to_owned(),
        sectors,
        sprites,
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{Ray, Surface};
    use crate::world::camera::Camera;

    #[test]
    fn table_shape() {
        assert_eq!(HANGAR.name, "E1M1");
        assert_eq!(HANGAR.sectors.len(), 9);
        assert_eq!(HANGAR.sprites.len(), 4);
        let total: usize = HANGAR.sectors.iter().map(|s| s.segments.len()).sum();
        assert_eq!(total, 8 + 23 + 4 + 4 + 6 + 12 + 12 + 26 + 4);
    }

    #[test]
    fn table_passes_the_level_check() {
        HANGAR.validate().expect("hangar loops must be closed");
    }

    #[test]
    fn authored_lengths_are_close_to_measured_ones() {
        for (i, s) in HANGAR.sectors.iter().enumerate() {
            for seg in &s.segments {
                let measured = seg.a.distance(seg.b);
                assert!(
                    (seg.len - measured).abs() <= 1.0,
                    "sector {i}: {seg:?} measured {measured}"
                );
            }
        }
    }

    #[test]
    fn start_stands_on_the_hall_floor() {
        let cam = Camera::start();
        let down = Ray::new(cam.pos(), Vec3::new(0.001, -1.0, 0.002));
        let hit = HANGAR.intersect(&down, 0.0);
        assert_eq!(hit.surface, Surface::Floor);
        assert_eq!(hit.tex, FLOOR4_8);
        assert!((hit.t - 30.0).abs() < 1e-3);
        assert!((hit.light - 0.565).abs() < 1e-6);
    }

    #[test]
    fn start_looks_through_the_hall_at_the_far_wall() {
        let cam = Camera::start();
        let hit = HANGAR.intersect(&cam.ray(Vec2::ZERO), 0.0);
        assert_eq!(hit.surface, Surface::Wall);
        assert_eq!(hit.tex, STARTAN3);
        assert!((hit.t - 736.0).abs() < 1e-2, "t = {}", hit.t);
        assert!((hit.uv.x - 82.0).abs() < 1e-2);
        assert!((hit.uv.y - 30.0).abs() < 1e-2);
        assert!((hit.light - (0.565 - KC)).abs() < 1e-6);
    }
}
