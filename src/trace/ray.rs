use glam::{Vec2, Vec3, vec2};

/// One view ray. `dir` does not have to be normalised: every distance the
/// tracer reports is a multiple of `dir`, never of its length.
///
/// World axes: `x`/`z` span the ground plane, `y` is up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    /// Origin projected onto the ground plane.
    #[inline(always)]
    pub fn origin_xz(&self) -> Vec2 {
        vec2(self.origin.x, self.origin.z)
    }

    /// Direction projected onto the ground plane.
    #[inline(always)]
    pub fn dir_xz(&self) -> Vec2 {
        vec2(self.dir.x, self.dir.z)
    }

    #[inline(always)]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }

    /// World height of the ray at parameter `t`.
    #[inline(always)]
    pub fn height_at(&self, t: f32) -> f32 {
        self.dir.y * t + self.origin.y
    }

    /// Parameter at which the ray meets the horizontal plane `y = h`.
    ///
    /// Horizontal rays give ±inf (or NaN when the origin lies on the plane);
    /// callers rely on ordinary comparisons to reject those.
    #[inline(always)]
    pub fn plane_t(&self, h: f32) -> f32 {
        (h - self.origin.y) / self.dir.y
    }
}
