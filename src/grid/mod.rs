//! Noise-driven cube grids: lattice instancing and per-frame animation.

mod instance;
mod instancer;
mod material;

// Re-export public types
pub use instance::{Instance, InstanceRaw, InstanceState};
pub use instancer::{advance, InstanceGrid};
pub use material::{ColourStop, Face, FaceMaterials, MaterialId, MaterialTable, Surface};

/// Errors from grid construction
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("invalid grid spec: {0}")]
    InvalidSpec(String),
}
