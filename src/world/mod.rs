pub mod camera;
pub mod e1m1;
pub mod geometry;
pub mod helpers;
pub mod texture;
mod validate;

pub use geometry::{
    Boundary, LIGHT_STEP, Level, Sector, SectorId, SectorLight, Segment, SegmentId, Sprite,
    SpriteMask,
};

pub use camera::Camera;

pub use e1m1::HANGAR;

pub use texture::{Colorizer, NO_TEXTURE, Procedural, TextureId, texture_id, texture_name};

pub use validate::{LevelError, PortalMismatch};
