pub mod renderer;
pub mod trace;
pub mod world;
