use glam::{Vec2, Vec3, vec2};

use crate::trace::hit::Hit;
use crate::trace::Ray;
use crate::world::geometry::Level;

/// Per-frame context shared by every ray: where the camera looks (sprites
/// turn to face it) and the clock (animated sector lights).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct View {
    pub forward: Vec3,
    pub time: f32,
}

impl View {
    pub fn new(forward: Vec3, time: f32) -> Self {
        Self { forward, time }
    }

    /// Ground-plane direction of every billboard quad.
    #[inline]
    pub fn sprite_axis(&self) -> Vec2 {
        -vec2(-self.forward.z, self.forward.x).normalize()
    }
}

impl Level {
    /// Nearest sector surface along `ray`, or the background hit.
    ///
    /// Every sector is evaluated; the order of `sectors` never changes the
    /// result because each one can only tighten the hit.
    pub fn intersect(&self, ray: &Ray, time: f32) -> Hit {
        self.sectors
            .iter()
            .fold(Hit::miss(), |hit, sector| sector.evaluate(ray, time, hit))
    }

    /// [`Level::intersect`], then the sprites on top.
    pub fn trace(&self, ray: &Ray, view: &View) -> Hit {
        let axis = view.sprite_axis();
        self.sprites
            .iter()
            .fold(self.intersect(ray, view.time), |hit, sprite| {
                sprite.resolve(ray, axis, hit)
            })
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::Surface;
    use crate::world::camera::Camera;
    use crate::world::e1m1::{BARREL_SIZE, HANGAR};
    use crate::world::geometry::{Sector, Segment, Sprite, SpriteMask};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    const A_FLOOR: u16 = 3;
    const B_FLOOR: u16 = 4;
    const WALL: u16 = 14;
    const LOWER: u16 = 18;
    const UPPER: u16 = 17;

    /// Room A (0..100) opens on room B (100..200) through a gap 32..96.
    fn two_rooms() -> Level {
        let a = Sector::new(0.0, 128.0, (A_FLOOR, 6), 0.75).with_segments([
            Segment::wall(vec2(0.0, 0.0), vec2(0.0, 100.0), WALL),
            Segment::wall(vec2(0.0, 100.0), vec2(100.0, 100.0), WALL),
            Segment::opening(vec2(100.0, 100.0), vec2(100.0, 0.0), 32.0, 96.0, (LOWER, UPPER)),
            Segment::wall(vec2(100.0, 0.0), vec2(0.0, 0.0), WALL),
        ]);
        let b = Sector::new(32.0, 96.0, (B_FLOOR, 6), 0.5).with_segments([
            Segment::null(vec2(100.0, 0.0), vec2(100.0, 100.0)),
            Segment::wall(vec2(100.0, 100.0), vec2(200.0, 100.0), WALL),
            Segment::wall(vec2(200.0, 100.0), vec2(200.0, 0.0), WALL),
            Segment::wall(vec2(200.0, 0.0), vec2(100.0, 0.0), WALL),
        ]);
        Level {
            name: "two rooms".into(),
            sectors: vec![a, b],
            sprites: Vec::new(),
        }
    }

    #[test]
    fn empty_level_is_background() {
        let level = Level {
            name: "void".into(),
            sectors: Vec::new(),
            sprites: Vec::new(),
        };
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, -0.2, 0.3));
        assert_eq!(level.intersect(&ray, 0.0), Hit::miss());
        assert_eq!(level.trace(&ray, &View::new(Vec3::Z, 0.0)), Hit::miss());
    }

    #[test]
    fn gap_shows_the_room_behind() {
        let level = two_rooms();
        let hit = level.intersect(&Ray::new(Vec3::new(50.0, 64.0, 50.0), Vec3::X), 0.0);
        assert_eq!(hit.surface, Surface::Wall);
        assert_eq!(hit.tex, WALL);
        assert!((hit.t - 150.0).abs() < 1e-3);
        // v is measured from room B's floor
        assert!((hit.uv - vec2(50.0, 32.0)).length() < 1e-3);
        assert_eq!(hit.light, 0.5);
    }

    #[test]
    fn step_below_the_gap_is_painted() {
        let level = two_rooms();
        let hit = level.intersect(&Ray::new(Vec3::new(50.0, 16.0, 50.0), Vec3::X), 0.0);
        assert_eq!(hit.tex, LOWER);
        assert!((hit.t - 50.0).abs() < 1e-3);
        assert!((hit.uv.y + 16.0).abs() < 1e-3);

        let hit = level.intersect(&Ray::new(Vec3::new(50.0, 112.0, 50.0), Vec3::X), 0.0);
        assert_eq!(hit.tex, UPPER);
        assert!((hit.uv.y - 16.0).abs() < 1e-3);
    }

    #[test]
    fn neighbour_floor_through_the_gap() {
        let level = two_rooms();
        let ray = Ray::new(Vec3::new(50.0, 64.0, 50.0), Vec3::new(1.0, -0.3, 0.0));
        let hit = level.intersect(&ray, 0.0);
        assert_eq!(hit.surface, Surface::Floor);
        assert_eq!(hit.tex, B_FLOOR);
        assert!((hit.t - 32.0 / 0.3).abs() < 1e-2);
    }

    #[test]
    fn sprites_are_drawn_over_the_map_but_not_through_walls() {
        let mut level = two_rooms();
        let view = View::new(Vec3::Z, 0.0);
        let ray = Ray::new(Vec3::new(50.0, 16.0, 10.0), Vec3::Z);

        level.sprites.push(Sprite::new(
            Vec3::new(50.0, 0.0, 70.0),
            BARREL_SIZE,
            0.9,
            32,
            SpriteMask::Barrel,
        ));
        let hit = level.trace(&ray, &view);
        assert_eq!(hit.surface, Surface::Sprite);
        assert!((hit.t - 60.0).abs() < 1e-3);

        // same barrel moved behind the wall at z = 100
        level.sprites[0].pos.z = 150.0;
        let hit = level.trace(&ray, &view);
        assert_eq!(hit.surface, Surface::Wall);
        assert!((hit.t - 90.0).abs() < 1e-3);
        // intersect() alone never sees sprites
        assert_eq!(level.intersect(&ray, 0.0), hit);
    }

    #[test]
    fn sprite_axis_is_perpendicular_to_the_view() {
        let v = View::new(Vec3::new(0.6, -0.2, 0.8), 0.0);
        let axis = v.sprite_axis();
        assert!((axis.length() - 1.0).abs() < 1e-5);
        assert!(axis.dot(vec2(0.6, 0.8)).abs() < 1e-5);
        assert!((View::new(Vec3::Z, 0.0).sprite_axis() - Vec2::X).length() < 1e-6);
    }

    #[test]
    fn nearest_hit_is_order_independent() {
        let mut rng = StdRng::seed_from_u64(0x5EC7);
        let mut shuffled = HANGAR.clone();

        let probes: Vec<(Ray, View)> = (0..400)
            .map(|i| {
                let cam = Camera::demo(i as f32 * 0.1);
                let w = vec2(rng.gen_range(-1.4..1.4), rng.gen_range(-1.0..1.0));
                (cam.ray(w), cam.view(i as f32 * 0.1))
            })
            .collect();
        let expected: Vec<Hit> = probes.iter().map(|(r, v)| HANGAR.trace(r, v)).collect();

        for _ in 0..4 {
            shuffled.sectors.shuffle(&mut rng);
            for sector in &mut shuffled.sectors {
                sector.segments.shuffle(&mut rng);
            }
            shuffled.sprites.shuffle(&mut rng);

            for ((ray, view), want) in probes.iter().zip(&expected) {
                assert_eq!(shuffled.trace(ray, view), *want, "ray {ray:?}");
            }
        }
    }

    #[test]
    fn no_nan_escapes_degenerate_rays() {
        let origin = Camera::start().pos();
        for dir in [
            Vec3::ZERO,
            Vec3::Y,
            Vec3::NEG_Y,
            Vec3::X,
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(f32::MIN_POSITIVE, -1.0, 0.0),
        ] {
            let ray = Ray::new(origin, dir);
            let hit = HANGAR.trace(&ray, &View::new(Vec3::Z, 0.0));
            assert!(hit.t.is_finite() && hit.t > 0.0, "{dir:?}: {hit:?}");
            assert!(hit.uv.is_finite(), "{dir:?}: {hit:?}");
            assert!((0.0..=1.0).contains(&hit.light));
        }
    }

    #[test]
    fn every_probe_of_the_demo_sees_something() {
        for i in 0..60 {
            let time = i as f32 * 0.5;
            let cam = Camera::demo(time);
            for (x, y) in [(0.0, 0.0), (-1.0, -0.9), (1.0, 0.9)] {
                let hit = HANGAR.trace(&cam.ray(vec2(x, y)), &cam.view(time));
                assert!(!hit.is_background(), "t = {time}, ({x}, {y})");
            }
        }
    }
}
