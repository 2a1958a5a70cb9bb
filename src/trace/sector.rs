use glam::vec2;

use crate::trace::boundary::Span;
use crate::trace::hit::{Hit, Surface};
use crate::trace::parity::Crossings;
use crate::trace::Ray;
use crate::world::geometry::Sector;

impl Sector {
    /// Tighten `hit` with everything this sector contributes: its painted
    /// boundaries, then its floor, then its ceiling.
    ///
    /// * Floor and ceiling are accepted only if the plane parameter is in
    ///   front of the ray, nearer than `hit`, the plane point is inside the
    ///   footprint (odd parity) and the eye is on the visible side.
    /// * Never returns a hit farther than the one passed in.
    pub fn evaluate(&self, ray: &Ray, time: f32, hit: Hit) -> Hit {
        let span = Span {
            floor_h: self.floor_h,
            ceil_h: self.ceil_h,
            light: self.light.at(time),
        };

        let (hit, crossings) = self.segments.iter().fold(
            (hit, Crossings::begin(ray, self.floor_h, self.ceil_h)),
            |acc, seg| seg.resolve(ray, &span, acc),
        );

        let tf = crossings.floor_t;
        let hit = if tf > 0.0
            && hit.beaten_by(tf)
            && crossings.floor_inside()
            && ray.origin.y > self.floor_h
        {
            let p = ray.at(tf);
            Hit::new(tf, vec2(p.x, p.z), span.light, self.floor_tex, Surface::Floor)
        } else {
            hit
        };

        let tc = crossings.ceil_t;
        if tc > 0.0 && hit.beaten_by(tc) && crossings.ceil_inside() && ray.origin.y < self.ceil_h {
            let p = ray.at(tc);
            Hit::new(tc, vec2(p.x, p.z), span.light, self.ceil_tex, Surface::Ceiling)
        } else {
            hit
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::geometry::SectorLight;
    use glam::{Vec2, Vec3};

    const FLOOR: u16 = 3;
    const CEIL: u16 = 6;
    const WALL: u16 = 14;

    /// 100×100 room, floor 0, ceiling 128; walls face inwards.
    fn room() -> Sector {
        Sector::new(0.0, 128.0, (FLOOR, CEIL), 0.75).with_wall_loop(
            &[
                vec2(0.0, 0.0),
                vec2(0.0, 100.0),
                vec2(100.0, 100.0),
                vec2(100.0, 0.0),
            ],
            WALL,
        )
    }

    fn trace(ray: Ray) -> Hit {
        room().evaluate(&ray, 0.0, Hit::miss())
    }

    #[test]
    fn level_ray_from_outside_hits_the_far_wall() {
        // enters through the back of x = 0, sees the inside of x = 100
        let hit = trace(Ray::new(Vec3::new(-50.0, 64.0, 50.0), Vec3::X));
        assert_eq!(hit.surface, Surface::Wall);
        assert_eq!(hit.tex, WALL);
        assert!((hit.t - 150.0).abs() < 1e-4);
        assert!((hit.uv - vec2(50.0, 64.0)).length() < 1e-3);
        assert_eq!(hit.light, 0.75);
    }

    #[test]
    fn descending_ray_from_outside_hits_the_floor() {
        let hit = trace(Ray::new(Vec3::new(-50.0, 64.0, 50.0), Vec3::new(1.0, -0.5, 0.0)));
        assert_eq!(hit.surface, Surface::Floor);
        assert_eq!(hit.tex, FLOOR);
        assert!((hit.t - 128.0).abs() < 1e-4);
        assert!((hit.uv - vec2(78.0, 50.0)).length() < 1e-3);
    }

    #[test]
    fn rising_ray_from_outside_hits_the_ceiling() {
        let hit = trace(Ray::new(Vec3::new(-50.0, 64.0, 50.0), Vec3::new(1.0, 0.5, 0.0)));
        assert_eq!(hit.surface, Surface::Ceiling);
        assert_eq!(hit.tex, CEIL);
        assert!((hit.t - 128.0).abs() < 1e-4);
    }

    #[test]
    fn steep_ray_from_inside_hits_the_floor_before_any_wall() {
        let hit = trace(Ray::new(Vec3::new(50.0, 64.0, 50.0), Vec3::new(0.1, -1.0, 0.2)));
        assert_eq!(hit.surface, Surface::Floor);
        assert!((hit.t - 64.0).abs() < 1e-4);
    }

    #[test]
    fn eye_above_the_ceiling_sees_the_floor_through_it() {
        let hit = trace(Ray::new(Vec3::new(50.0, 200.0, 50.0), Vec3::new(0.1, -1.0, 0.2)));
        assert_eq!(hit.surface, Surface::Floor);
        assert!((hit.t - 200.0).abs() < 1e-4);
    }

    #[test]
    fn floor_beyond_the_far_wall_is_hidden() {
        // floor plane reached at x = 178; the wall at x = 100 is hit at y = 39
        let hit = trace(Ray::new(Vec3::new(50.0, 64.0, 50.0), Vec3::new(2.0, -1.0, 0.0)));
        assert_eq!(hit.surface, Surface::Wall);
        assert!((hit.t - 25.0).abs() < 1e-4);
    }

    #[test]
    fn ray_landing_outside_the_footprint_misses() {
        // starts east of the room and moves away from it
        let hit = trace(Ray::new(Vec3::new(150.0, 64.0, 50.0), Vec3::new(1.0, -0.5, 0.0)));
        assert!(hit.is_background());
    }

    #[test]
    fn only_one_surface_wins() {
        // sweep a fan of rays from outside through the room
        for i in 0..=40 {
            let dy = -1.0 + i as f32 * 0.05;
            let ray = Ray::new(Vec3::new(-50.0, 64.0, 50.0), Vec3::new(1.0, dy, 0.0));
            let hit = trace(ray);
            let tf = ray.plane_t(0.0);
            let tc = ray.plane_t(128.0);
            let expected = match hit.surface {
                Surface::Wall => 150.0,
                Surface::Floor => tf,
                Surface::Ceiling => tc,
                other => panic!("dy = {dy}: unexpected {other:?}"),
            };
            assert!((hit.t - expected).abs() < 1e-3, "dy = {dy}: {hit:?}");
            // the winner is the nearest of the candidates that are in view
            let wall_y = ray.height_at(150.0);
            if wall_y > 0.0 && wall_y < 128.0 {
                assert_eq!(hit.surface, Surface::Wall, "dy = {dy}");
            }
        }
    }

    #[test]
    fn evaluation_never_loosens_a_hit() {
        let near = Hit::new(5.0, Vec2::ZERO, 1.0, 99, Surface::Wall);
        let ray = Ray::new(Vec3::new(-50.0, 64.0, 50.0), Vec3::new(1.0, -0.5, 0.0));
        assert_eq!(room().evaluate(&ray, 0.0, near), near);
    }

    #[test]
    fn flickering_light_follows_time() {
        let sector = room().with_light(SectorLight::Flicker {
            lit: 1.0,
            dim: 0.25,
            rate: 10.0,
            threshold: 0.3,
        });
        let ray = Ray::new(Vec3::new(50.0, 64.0, 50.0), Vec3::X);
        let lights: Vec<f32> = (0..50)
            .map(|i| sector.evaluate(&ray, i as f32 * 0.1 + 0.05, Hit::miss()).light)
            .collect();
        assert!(lights.contains(&1.0));
        assert!(lights.contains(&0.25));
    }

    #[test]
    fn horizontal_ray_never_reports_a_plane() {
        for y in [0.0, 64.0, 128.0, 300.0] {
            let hit = trace(Ray::new(Vec3::new(50.0, y, 50.0), Vec3::new(1.0, 0.0, 0.3)));
            assert!(matches!(hit.surface, Surface::Wall | Surface::Background));
            assert!(hit.t.is_finite());
        }
    }

    #[test]
    fn vertical_ray_reports_nothing() {
        let hit = trace(Ray::new(Vec3::new(50.0, 64.0, 50.0), Vec3::NEG_Y));
        assert!(hit.is_background());
    }
}
