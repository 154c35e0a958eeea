//! Scene parameters in world units and seconds.
//!
//! Grid shape and appearance live in [`GridSpec`]; each [`DemoVariant`] bundles a
//! grid with its camera and group transform.

mod grid;
mod render;
mod scene;

// Re-export all types
pub use grid::{Footprint, GridSpec, HeightLaw, LatticeLayout, MaterialScheme, Selection};
pub use render::{RecordingConfig, RenderConfig};
pub use scene::{DebugControls, DemoVariant, GroupTransform, OrthoCamera, ScenePreset};
