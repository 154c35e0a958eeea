//! Grid layout, noise sampling and instance appearance parameters.

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::grid::{FaceMaterials, GridError};
use crate::palette::Colour;

/// How lattice indices map onto world axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LatticeLayout {
    /// Columns along X, rows along Z, cubes grow upward along Y
    #[default]
    Floor,

    /// Columns along Z, rows along Y, cubes grow outward along X
    Wall,
}

impl LatticeLayout {
    /// World axis indices of the (column, row) plane coordinates
    pub fn plane_axes(self) -> (usize, usize) {
        match self {
            LatticeLayout::Floor => (0, 2),
            LatticeLayout::Wall => (2, 1),
        }
    }

    /// World axis index whose scale is driven by noise
    pub fn extrusion_axis(self) -> usize {
        match self {
            LatticeLayout::Floor => 1,
            LatticeLayout::Wall => 0,
        }
    }

    /// Place plane coordinates in world space with the given extrusion offset
    pub fn place(self, plane: Vec2, extrusion: f32) -> Vec3 {
        let (a, b) = self.plane_axes();
        let mut position = Vec3::ZERO;
        position[a] = plane.x;
        position[b] = plane.y;
        position[self.extrusion_axis()] = extrusion;
        position
    }
}

/// Linear map from a noise value in [-1, 1] to an extrusion scale
///
/// Formula: scale = (noise + 1) * gain, i.e. [0, 2 * gain]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightLaw {
    pub gain: f32,
}

impl HeightLaw {
    pub fn scale_for(&self, noise: f32) -> f32 {
        (noise + 1.0) * self.gain
    }

    pub fn validate(&self) -> Result<(), GridError> {
        if !(self.gain > 0.0 && self.gain.is_finite()) {
            return Err(GridError::InvalidSpec(format!(
                "height gain must be finite and > 0, got {}",
                self.gain
            )));
        }
        Ok(())
    }
}

impl Default for HeightLaw {
    fn default() -> Self {
        Self { gain: 1.0 }
    }
}

/// Distribution of the two scales that are not driven by noise
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Footprint {
    /// Uniform in (min, max]
    Uniform { min: f32, max: f32 },

    /// Mostly uniform in (min, max], with an occasional wide "tower" in (0, tower_max]
    Skyline {
        min: f32,
        max: f32,
        /// Probability of a tower (0..1)
        tower_chance: f32,
        tower_max: f32,
    },
}

impl Footprint {
    /// Draw one footprint scale
    ///
    /// Draws use `1 - u` so the lower bound is excluded and a zero scale never occurs.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        match *self {
            Footprint::Uniform { min, max } => min + upper_inclusive(rng) * (max - min),
            Footprint::Skyline {
                min,
                max,
                tower_chance,
                tower_max,
            } => {
                if rng.gen::<f32>() >= 1.0 - tower_chance {
                    upper_inclusive(rng) * tower_max
                } else {
                    min + upper_inclusive(rng) * (max - min)
                }
            }
        }
    }
}

impl Footprint {
    /// Reject ranges that could produce non-positive scales
    pub fn validate(&self) -> Result<(), GridError> {
        let (min, max) = match *self {
            Footprint::Uniform { min, max } => (min, max),
            Footprint::Skyline {
                min,
                max,
                tower_chance,
                tower_max,
            } => {
                if !(0.0..=1.0).contains(&tower_chance) {
                    return Err(GridError::InvalidSpec(format!(
                        "tower chance must be in [0, 1], got {tower_chance}"
                    )));
                }
                if !(tower_max > 0.0 && tower_max.is_finite()) {
                    return Err(GridError::InvalidSpec(format!(
                        "tower max must be finite and > 0, got {tower_max}"
                    )));
                }
                (min, max)
            }
        };
        if !(min >= 0.0 && max > min && max.is_finite()) {
            return Err(GridError::InvalidSpec(format!(
                "footprint range must satisfy 0 <= min < max, got {min}..{max}"
            )));
        }
        Ok(())
    }
}

impl Default for Footprint {
    fn default() -> Self {
        Footprint::Uniform { min: 0.5, max: 1.5 }
    }
}

fn upper_inclusive<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    1.0 - rng.gen::<f32>()
}

/// Per-column inclusion probability for masked grids
#[derive(Debug, Clone, Copy)]
pub enum Selection {
    /// clamp(column, 0, columns) / columns: empty on the left, dense on the right
    ColumnGradient,

    /// Same probability for every column
    Uniform(f32),

    /// Arbitrary rule, called with (column, columns)
    PerColumn(fn(usize, usize) -> f32),
}

impl Selection {
    pub fn probability(&self, column: usize, columns: usize) -> f32 {
        match *self {
            Selection::ColumnGradient => column.min(columns) as f32 / columns as f32,
            Selection::Uniform(p) => p,
            Selection::PerColumn(rule) => rule(column, columns),
        }
    }

    /// Decide inclusion from a uniform draw in [0, 1)
    pub fn includes(&self, column: usize, columns: usize, draw: f32) -> bool {
        let p = self.probability(column, columns);
        p > 0.0 && draw <= p
    }
}

/// How instances get their face materials
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialScheme {
    /// Every instance shares one material
    Uniform(FaceMaterials),

    /// Side faces fade from a random palette colour into `base`; top and bottom are `base`
    PaletteGradient { base: Colour },
}

impl Default for MaterialScheme {
    fn default() -> Self {
        MaterialScheme::Uniform(FaceMaterials::solid(Colour::rgb(0x83, 0x38, 0xec)))
    }
}

/// Grid generation and animation parameters
#[derive(Debug, Clone)]
pub struct GridSpec {
    /// Lattice columns (> 0)
    pub columns: usize,

    /// Lattice rows (> 0)
    pub rows: usize,

    /// Gap between neighbouring cubes in world units (>= 0)
    pub spacing: f32,

    /// Spatial frequency of noise sampling (> 0)
    pub noise_scale: f32,

    /// Temporal frequency of noise sampling (noise units per second)
    pub animation_speed: f32,

    pub layout: LatticeLayout,

    /// Extrusion size of the unit geometry; the floor sits at -base_scale / 2
    pub base_scale: f32,

    pub height_law: HeightLaw,

    pub footprint: Footprint,

    /// Optional column masking; `None` keeps every cell
    pub selection: Option<Selection>,

    pub materials: MaterialScheme,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            columns: 5,
            rows: 5,
            spacing: 0.5,
            noise_scale: 0.4,
            animation_speed: 0.5,
            layout: LatticeLayout::Floor,
            base_scale: 1.0,
            height_law: HeightLaw::default(),
            footprint: Footprint::default(),
            selection: None,
            materials: MaterialScheme::default(),
        }
    }
}

impl GridSpec {
    /// Reject degenerate grids
    pub fn validate(&self) -> Result<(), GridError> {
        if self.columns == 0 {
            return Err(GridError::InvalidSpec("columns must be > 0".to_string()));
        }
        if self.rows == 0 {
            return Err(GridError::InvalidSpec("rows must be > 0".to_string()));
        }
        if !(self.noise_scale > 0.0) {
            return Err(GridError::InvalidSpec(format!(
                "noise scale must be > 0, got {}",
                self.noise_scale
            )));
        }
        if !(self.spacing >= 0.0) {
            return Err(GridError::InvalidSpec(format!(
                "spacing must be >= 0, got {}",
                self.spacing
            )));
        }
        if !(self.base_scale > 0.0 && self.base_scale.is_finite()) {
            return Err(GridError::InvalidSpec(format!(
                "base scale must be finite and > 0, got {}",
                self.base_scale
            )));
        }
        self.height_law.validate()?;
        self.footprint.validate()
    }

    /// Plane coordinates of lattice cell (column, row): index + spacing * index
    pub fn plane_coords(&self, column: usize, row: usize) -> Vec2 {
        let a = column as f32;
        let b = row as f32;
        Vec2::new(a + self.spacing * a, b + self.spacing * b)
    }

    /// Noise-space key for plane coordinates at a point in time
    ///
    /// Floor grids key on (column, row); wall grids key on (row, column). Time is
    /// added to the second component.
    pub fn noise_key(&self, plane: Vec2, elapsed_time: f32) -> (f32, f32) {
        let (u, v) = match self.layout {
            LatticeLayout::Floor => (plane.x, plane.y),
            LatticeLayout::Wall => (plane.y, plane.x),
        };
        (
            u * self.noise_scale,
            v * self.noise_scale + elapsed_time * self.animation_speed,
        )
    }

    /// Extrusion offset that keeps the base face on the floor
    pub fn anchored_offset(&self, extrusion_scale: f32) -> f32 {
        (extrusion_scale - self.base_scale) / 2.0
    }

    pub fn cell_count(&self) -> usize {
        self.columns * self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_spec_is_valid() {
        assert!(GridSpec::default().validate().is_ok());
    }

    #[test]
    fn test_degenerate_specs_rejected() {
        let cases = [
            GridSpec {
                columns: 0,
                ..Default::default()
            },
            GridSpec {
                rows: 0,
                ..Default::default()
            },
            GridSpec {
                noise_scale: 0.0,
                ..Default::default()
            },
            GridSpec {
                noise_scale: f32::NAN,
                ..Default::default()
            },
            GridSpec {
                spacing: -0.5,
                ..Default::default()
            },
            GridSpec {
                base_scale: 0.0,
                ..Default::default()
            },
            GridSpec {
                height_law: HeightLaw { gain: -1.0 },
                ..Default::default()
            },
            GridSpec {
                height_law: HeightLaw { gain: 0.0 },
                ..Default::default()
            },
            GridSpec {
                footprint: Footprint::Uniform {
                    min: -2.0,
                    max: -1.0,
                },
                ..Default::default()
            },
            GridSpec {
                footprint: Footprint::Uniform { min: 1.0, max: 1.0 },
                ..Default::default()
            },
            GridSpec {
                footprint: Footprint::Skyline {
                    min: 0.5,
                    max: 2.5,
                    tower_chance: 0.1,
                    tower_max: 0.0,
                },
                ..Default::default()
            },
            GridSpec {
                footprint: Footprint::Skyline {
                    min: 0.5,
                    max: 2.5,
                    tower_chance: 1.5,
                    tower_max: 10.0,
                },
                ..Default::default()
            },
            GridSpec {
                footprint: Footprint::Skyline {
                    min: 3.0,
                    max: 2.5,
                    tower_chance: 0.1,
                    tower_max: 10.0,
                },
                ..Default::default()
            },
        ];

        for spec in cases {
            assert!(
                matches!(spec.validate(), Err(GridError::InvalidSpec(_))),
                "{spec:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_plane_coords_follow_spacing() {
        let spec = GridSpec {
            spacing: 0.5,
            ..Default::default()
        };
        assert_eq!(spec.plane_coords(0, 0), Vec2::ZERO);
        assert_eq!(spec.plane_coords(1, 1), Vec2::new(1.5, 1.5));
        assert_eq!(spec.plane_coords(4, 2), Vec2::new(6.0, 3.0));
    }

    #[test]
    fn test_layout_placement() {
        let plane = Vec2::new(2.0, 3.0);
        assert_eq!(
            LatticeLayout::Floor.place(plane, 0.5),
            Vec3::new(2.0, 0.5, 3.0)
        );
        assert_eq!(
            LatticeLayout::Wall.place(plane, 0.5),
            Vec3::new(0.5, 3.0, 2.0)
        );
    }

    #[test]
    fn test_height_law_maps_noise_range() {
        let law = HeightLaw { gain: 2.0 };
        assert_eq!(law.scale_for(-1.0), 0.0);
        assert_eq!(law.scale_for(0.0), 2.0);
        assert_eq!(law.scale_for(1.0), 4.0);
    }

    #[test]
    fn test_footprint_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(5);
        let uniform = Footprint::Uniform { min: 0.5, max: 1.5 };
        let skyline = Footprint::Skyline {
            min: 0.5,
            max: 2.5,
            tower_chance: 0.1,
            tower_max: 10.0,
        };

        let mut towers = 0;
        for _ in 0..5_000 {
            let s = uniform.sample(&mut rng);
            assert!(s > 0.5 && s <= 1.5, "uniform draw {s}");

            let s = skyline.sample(&mut rng);
            assert!(s > 0.0 && s <= 10.0, "skyline draw {s}");
            if s > 2.5 {
                towers += 1;
            }
        }
        // Towers land above 2.5 about 75% of the time they occur
        assert!(towers > 200 && towers < 600, "towers: {towers}");
    }

    #[test]
    fn test_column_gradient_probability() {
        let rule = Selection::ColumnGradient;
        assert_eq!(rule.probability(0, 4), 0.0);
        assert_eq!(rule.probability(2, 4), 0.5);
        assert_eq!(rule.probability(4, 4), 1.0);
        assert_eq!(rule.probability(9, 4), 1.0);
    }

    #[test]
    fn test_zero_probability_never_includes() {
        let rule = Selection::Uniform(0.0);
        assert!(!rule.includes(3, 5, 0.0));
        assert!(!rule.includes(3, 5, 0.5));

        let always = Selection::Uniform(1.0);
        assert!(always.includes(0, 5, 0.0));
        assert!(always.includes(0, 5, 0.999));
    }

    #[test]
    fn test_wall_noise_key_is_row_then_column() {
        let spec = GridSpec {
            layout: LatticeLayout::Wall,
            noise_scale: 0.1,
            animation_speed: 1.0,
            ..Default::default()
        };
        // plane = (column, row)
        let (u, v) = spec.noise_key(Vec2::new(6.0, 2.0), 0.0);
        assert!((u - 0.2).abs() < 1e-6 && (v - 0.6).abs() < 1e-6);

        let floor = GridSpec {
            layout: LatticeLayout::Floor,
            ..spec.clone()
        };
        let (u, v) = floor.noise_key(Vec2::new(6.0, 2.0), 0.0);
        assert!((u - 0.6).abs() < 1e-6 && (v - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_noise_key_moves_along_row_axis() {
        let spec = GridSpec {
            noise_scale: 0.4,
            animation_speed: 0.5,
            ..Default::default()
        };
        let plane = Vec2::new(1.5, 1.5);
        let (x0, y0) = spec.noise_key(plane, 0.0);
        let (x1, y1) = spec.noise_key(plane, 2.0);
        assert_eq!(x0, x1);
        assert!((y1 - y0 - 1.0).abs() < 1e-6);
    }
}
