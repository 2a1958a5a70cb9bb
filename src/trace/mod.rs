//! Analytic per-ray scene query.
//!
//! One call answers "what does this ray see first?" by testing the ray
//! against every segment of every sector, with no acceleration structure
//! and no mutable state. Everything here is a pure function of
//! `(&Level, Ray, time)` and safe to call from any number of threads.
//!
//! Leaves first: [`primitive`] (ray vs. 2-D segment), [`parity`] (point in
//! polygon from the same crossings), [`boundary`] (what a crossed segment
//! paints), [`sector`], [`map`] and [`sprite`].

pub mod boundary;
pub mod hit;
pub mod map;
pub mod parity;
pub mod primitive;
pub mod ray;
pub mod sector;
pub mod sprite;

pub use boundary::Span;
pub use hit::{FAR_CLIP, Hit, Surface};
pub use map::View;
pub use parity::Crossings;
pub use primitive::{EdgeHit, cross2d, intersect_edge, intersect_segment};
pub use ray::Ray;
