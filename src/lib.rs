//! Cubefield library - noise-animated cube grids

pub mod cli;
pub mod grid;
pub mod noise;
pub mod palette;
pub mod params;
pub mod rendering;
pub mod scene;
pub mod texture;
