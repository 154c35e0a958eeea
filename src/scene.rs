//! Scene state owned by the frame driver.

use rand::Rng;

use crate::grid::{GridError, InstanceGrid, InstanceRaw};
use crate::noise::{NoiseError, NoiseField, Seed};
use crate::palette::{Colour, Palette};
use crate::params::{GridSpec, GroupTransform, OrthoCamera, ScenePreset};
use crate::rendering::Frame;

/// Errors from scene setup
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("noise error: {0}")]
    Noise(#[from] NoiseError),
    #[error("grid error: {0}")]
    Grid(#[from] GridError),
}

/// One animated cube grid with its camera and group transform
pub struct RenderContext {
    pub spec: GridSpec,
    pub noise: NoiseField,
    pub grid: InstanceGrid,
    pub camera: OrthoCamera,
    pub group: GroupTransform,
    pub background: Colour,
    /// Instance data as of the last `tick`
    buffer: Vec<InstanceRaw>,
}

impl RenderContext {
    /// Seed the noise field and build the grid described by `preset`
    pub fn setup<R: Rng + ?Sized>(
        preset: ScenePreset,
        seed: impl Into<Seed>,
        palette: Option<&Palette>,
        rng: &mut R,
    ) -> Result<Self, SetupError> {
        let noise = NoiseField::new(seed)?;
        let grid = InstanceGrid::build(&preset.grid, &noise, palette, rng)?;
        let buffer = grid.instance_buffer();

        tracing::info!(
            seed = noise.seed(),
            instances = grid.len(),
            "scene ready"
        );

        Ok(Self {
            spec: preset.grid,
            noise,
            grid,
            camera: preset.camera,
            group: preset.group,
            background: preset.background,
            buffer,
        })
    }

    /// Advance the animation to `elapsed_time` seconds since setup
    pub fn tick(&mut self, elapsed_time: f32) {
        self.grid.advance(&self.noise, elapsed_time, &self.spec);
        self.buffer = self.grid.instance_buffer();
    }

    /// Frame description for the renderer
    pub fn frame(&self, aspect_ratio: f32) -> Frame<'_> {
        Frame {
            view_proj: self.camera.view_proj(aspect_ratio),
            group: self.group.matrix(),
            instances: &self.buffer,
            materials: self.grid.materials.as_slice(),
            background: self.background,
        }
    }

    pub fn instance_buffer(&self) -> &[InstanceRaw] {
        &self.buffer
    }
}
