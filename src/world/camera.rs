use glam::{Vec2, Vec3, vec2};

use crate::trace::{Ray, View};
use crate::world::helpers::{smoothstep, wrap};

/// Distance from the eye to the image plane, in half-heights of the window.
pub const FOCAL: f32 = 1.8;

/// Where the demo starts, and the reference point for head bob (x, z).
pub const START_POS: Vec3 = Vec3::new(1050.0, 30.0, -3616.0);
pub const START_TARGET: Vec3 = Vec3::new(1050.0, 30.0, -3500.0);

/// Length of one lap of the scripted fly-through, in seconds.
pub const DEMO_LOOP: f32 = 28.0;

/// Look-at camera.
///
/// * `y` is up; the camera never rolls.
/// * The image plane sits [`FOCAL`] units in front of the eye, window
///   coordinates span `-1..1` vertically and `-aspect..aspect` horizontally.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pos: Vec3,
    target: Vec3,
}

impl Camera {
    pub fn new(pos: Vec3, target: Vec3) -> Self {
        Self { pos, target }
    }

    /// Player start of the built-in level.
    pub fn start() -> Self {
        Self::new(START_POS, START_TARGET)
    }

    #[inline]
    pub fn pos(&self) -> Vec3 {
        self.pos
    }

    #[inline]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    #[inline(always)]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.pos).normalize()
    }

    #[inline(always)]
    pub fn right(&self) -> Vec3 {
        Vec3::Y.cross(self.forward()).normalize()
    }

    #[inline(always)]
    pub fn up(&self) -> Vec3 {
        let f = self.forward();
        f.cross(Vec3::Y.cross(f).normalize()).normalize()
    }

    /// What the tracer needs besides the ray: view direction and clock.
    pub fn view(&self, time: f32) -> View {
        View::new(self.forward(), time)
    }

    /*──────────────────────── ray generation ────────────────────────*/

    /// Screen `uv` in `0..1` (origin bottom-left) → window coordinates.
    #[inline]
    pub fn window_coord(uv: Vec2, aspect: f32) -> Vec2 {
        vec2((uv.x * 2.0 - 1.0) * aspect, uv.y * 2.0 - 1.0)
    }

    /// Normalised direction through window coordinate `w`.
    pub fn ray_dir(&self, w: Vec2) -> Vec3 {
        let f = self.forward();
        let r = Vec3::Y.cross(f).normalize();
        let u = f.cross(r).normalize();
        (r * w.x + u * w.y + f * FOCAL).normalize()
    }

    pub fn ray(&self, w: Vec2) -> Ray {
        Ray::new(self.pos, self.ray_dir(w))
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Move by `forward` units and `side` (strafe, + right) on the ground.
    pub fn step(&mut self, forward: f32, side: f32) {
        let f = self.forward();
        let ground = vec2(f.x, f.z).normalize_or_zero();
        let right = vec2(ground.y, -ground.x);
        let delta = ground * forward + right * side;
        let delta = Vec3::new(delta.x, 0.0, delta.y);
        self.pos += delta;
        self.target += delta;
    }

    /// Rotate around the vertical axis (positive = turn left).
    pub fn turn(&mut self, delta_yaw: f32) {
        let (s, c) = delta_yaw.sin_cos();
        let d = self.target - self.pos;
        let rotated = Vec3::new(d.x * c - d.z * s, d.y, d.x * s + d.z * c);
        self.target = self.pos + rotated;
    }

    /// Walking bob: a sine of the ground distance from the start point,
    /// applied to both eye and target.
    pub fn with_head_bob(self) -> Self {
        let d = vec2(self.pos.x, self.pos.z).distance(vec2(START_POS.x, START_POS.z));
        let bob = Vec3::new(0.0, (d * 0.04).sin() * 4.0, 0.0);
        Self::new(self.pos + bob, self.target + bob)
    }

    /*──────────────────────── scripted demo ─────────────────────────*/

    /// Fly-through pose at `time` seconds: five seconds standing at the
    /// start, then a looping tour of the hangar.
    pub fn demo(time: f32) -> Self {
        let mut t = time - 5.0;
        if t > 0.0 {
            t = wrap(t, DEMO_LOOP) + 5.0;
        }

        let mut pos = START_POS;
        let mut tgt = START_TARGET;
        let ease = |a: f32, b: f32| smoothstep(a, b, t);

        tgt = tgt.lerp(Vec3::new(1834.0, 30.0, -3264.0), ease(5.0, 10.0));
        pos = pos.lerp(Vec3::new(1280.0, 30.0, -3350.0), ease(8.0, 13.0));
        tgt = tgt.lerp(Vec3::new(1280.0, 30.0, -2976.0), ease(11.0, 16.0));
        pos = pos.lerp(Vec3::new(1280.0, 30.0, -2976.0), ease(13.0, 19.0));
        tgt = tgt.lerp(Vec3::new(768.0, 30.0, -3050.0), ease(16.0, 20.0));
        pos = pos.lerp(Vec3::new(832.0, 30.0, -3020.0), ease(19.0, 23.0));
        tgt = tgt.lerp(Vec3::new(1256.0, 30.0, -3648.0), ease(20.0, 25.0));
        pos = pos.lerp(Vec3::new(768.0, 30.0, -3424.0), ease(23.0, 28.0));
        pos = pos.lerp(START_POS, ease(25.0, 30.0));
        tgt = tgt.lerp(START_TARGET, ease(28.0, 33.0));

        Self::new(pos, tgt)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::start()
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
