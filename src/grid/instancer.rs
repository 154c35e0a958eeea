//! Lattice instancing: build a noise-shaped grid once, then animate it per frame.

use glam::Vec3;
use rand::Rng;

use super::instance::{Instance, InstanceRaw, InstanceState};
use super::material::{ColourStop, FaceMaterials, MaterialId, MaterialTable, Surface};
use super::GridError;
use crate::noise::NoiseField;
use crate::palette::{Colour, Palette};
use crate::params::{GridSpec, MaterialScheme};

/// Instances of one grid plus the materials they reference
#[derive(Debug, Clone)]
pub struct InstanceGrid {
    pub instances: Vec<Instance>,
    pub materials: MaterialTable,
}

impl InstanceGrid {
    /// Build the grid for `spec`
    ///
    /// Walks the lattice column by column. Each included cell gets its extrusion from
    /// the noise field at its plane coordinates and random footprint scales from
    /// `rng`. Without a palette, palette-driven materials use [`Palette::builtin`].
    ///
    /// # Arguments
    /// * `spec` - Grid parameters (validated here)
    /// * `noise` - Noise field shared with the animation
    /// * `palette` - Colour schemes, if the palette resource is available
    /// * `rng` - Random source for selection, footprints and colours
    pub fn build<R: Rng + ?Sized>(
        spec: &GridSpec,
        noise: &NoiseField,
        palette: Option<&Palette>,
        rng: &mut R,
    ) -> Result<Self, GridError> {
        spec.validate()?;

        let mut materials = MaterialTable::new();
        let mut picker = MaterialPicker::new(&spec.materials, palette, &mut materials, rng);

        let layout = spec.layout;
        let (axis_a, axis_b) = layout.plane_axes();
        let mut instances = Vec::with_capacity(spec.cell_count());

        for column in 0..spec.columns {
            for row in 0..spec.rows {
                if let Some(selection) = &spec.selection {
                    if !selection.includes(column, spec.columns, rng.gen::<f32>()) {
                        continue;
                    }
                }

                let plane = spec.plane_coords(column, row);
                let (nx, ny) = spec.noise_key(plane, 0.0);
                let extrusion = spec.height_law.scale_for(noise.sample_2d(nx, ny));

                let mut scale = Vec3::ONE;
                scale[axis_a] = spec.footprint.sample(rng);
                scale[axis_b] = spec.footprint.sample(rng);

                let mut instance = Instance {
                    lattice: (column, row),
                    plane,
                    position: layout.place(plane, 0.0),
                    scale,
                    material: picker.pick(&mut materials, rng),
                    state: InstanceState::Built,
                };
                instance.set_extrusion(layout, extrusion, spec.anchored_offset(extrusion));
                instances.push(instance);
            }
        }

        tracing::debug!(
            columns = spec.columns,
            rows = spec.rows,
            instances = instances.len(),
            materials = materials.len(),
            "built instance grid"
        );

        Ok(Self {
            instances,
            materials,
        })
    }

    /// Animate every instance for `elapsed_time` (see [`advance`])
    pub fn advance(&mut self, noise: &NoiseField, elapsed_time: f32, spec: &GridSpec) {
        advance(&mut self.instances, noise, elapsed_time, spec);
    }

    /// Instance buffer contents for the renderer
    pub fn instance_buffer(&self) -> Vec<InstanceRaw> {
        self.instances.iter().map(Instance::to_raw).collect()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Re-sample the noise field for every instance at `elapsed_time`
///
/// The noise key is each instance's build-time plane coordinates with time added
/// along the row axis, so the grid breathes as a wave travelling across rows.
/// Depends only on the instance and `elapsed_time`: repeating a call with the same
/// time reproduces the same transforms. Non-finite times propagate into the scales.
pub fn advance(instances: &mut [Instance], noise: &NoiseField, elapsed_time: f32, spec: &GridSpec) {
    let layout = spec.layout;
    for instance in instances.iter_mut() {
        let (nx, ny) = spec.noise_key(instance.plane, elapsed_time);
        let extrusion = spec.height_law.scale_for(noise.sample_2d(nx, ny));
        instance.set_extrusion(layout, extrusion, spec.anchored_offset(extrusion));
        instance.state = InstanceState::Animated;
    }
}

/// Resolves the material for each new instance
enum MaterialPicker {
    Shared(MaterialId),
    Palette { scheme: Vec<Colour>, base: Colour },
}

impl MaterialPicker {
    fn new<R: Rng + ?Sized>(
        scheme: &MaterialScheme,
        palette: Option<&Palette>,
        table: &mut MaterialTable,
        rng: &mut R,
    ) -> Self {
        match scheme {
            MaterialScheme::Uniform(materials) => MaterialPicker::Shared(table.intern(*materials)),
            MaterialScheme::PaletteGradient { base } => {
                let colours = match palette {
                    Some(palette) => palette.choose_scheme(rng).to_vec(),
                    None => Palette::builtin().choose_scheme(rng).to_vec(),
                };
                MaterialPicker::Palette {
                    scheme: colours,
                    base: *base,
                }
            }
        }
    }

    fn pick<R: Rng + ?Sized>(&mut self, table: &mut MaterialTable, rng: &mut R) -> MaterialId {
        match self {
            MaterialPicker::Shared(id) => *id,
            MaterialPicker::Palette { scheme, base } => {
                let colour = scheme
                    .get(rng.gen_range(0..scheme.len().max(1)))
                    .copied()
                    .unwrap_or(*base);
                let fade_end = rng.gen::<f32>() * 0.5;
                let sides = Surface::Gradient([
                    ColourStop::new(0.0, colour),
                    ColourStop::new(fade_end, *base),
                    ColourStop::new(1.0, *base),
                ]);
                table.intern(FaceMaterials::sides_and_caps(sides, Surface::Solid(*base)))
            }
        }
    }
}
