pub mod event;
pub mod step;
pub mod tilemap;
pub mod world;
