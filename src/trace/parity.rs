//! Crossing-parity point-in-polygon test, piggy-backing on the ray itself.
//!
//! The ground projection of the view ray, started at the floor (or ceiling)
//! hit point, is a perfectly good casting ray for the even/odd rule. Every
//! boundary segment already intersects the view ray in 2-D, so counting the
//! crossings that lie *at or beyond* the plane parameter answers "is the
//! plane hit inside this sector?" without a second cast.
//!
//! Floor and ceiling are two different parameters along the same ray and
//! therefore need two independent counters.

use crate::trace::Ray;

/// Per-sector parity accumulator. `Copy`, threaded by value through the
/// boundary fold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Crossings {
    /// Ray parameter of the floor plane.
    pub floor_t: f32,
    /// Ray parameter of the ceiling plane.
    pub ceil_t: f32,
    floor: u32,
    ceil: u32,
}

impl Crossings {
    /// Start counting for a sector spanning `floor_h .. ceil_h`.
    pub fn begin(ray: &Ray, floor_h: f32, ceil_h: f32) -> Self {
        Self {
            floor_t: ray.plane_t(floor_h),
            ceil_t: ray.plane_t(ceil_h),
            floor: 0,
            ceil: 0,
        }
    }

    /// Account for one valid boundary crossing at `t_edge`.
    ///
    /// NaN plane parameters (ray parallel to and on the plane) never count.
    #[inline(always)]
    pub fn record(self, t_edge: f32) -> Self {
        Self {
            floor: self.floor + (t_edge >= self.floor_t) as u32,
            ceil: self.ceil + (t_edge >= self.ceil_t) as u32,
            ..self
        }
    }

    #[inline]
    pub fn floor_inside(&self) -> bool {
        self.floor & 1 == 1
    }

    #[inline]
    pub fn ceil_inside(&self) -> bool {
        self.ceil & 1 == 1
    }

    pub fn counts(&self) -> (u32, u32) {
        (self.floor, self.ceil)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
