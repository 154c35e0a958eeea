//! Camera, group transform and per-demo scene presets.

use std::f32::consts::PI;

use glam::{EulerRot, Mat4, Quat, Vec3};

use super::grid::{Footprint, GridSpec, HeightLaw, LatticeLayout, MaterialScheme, Selection};
use crate::grid::{ColourStop, FaceMaterials, Surface};
use crate::palette::Colour;

/// Orthographic camera looking at the origin
#[derive(Debug, Clone)]
pub struct OrthoCamera {
    /// Half height of the view volume (world units); width follows the aspect ratio
    pub frustum_size: f32,

    /// Eye position (world units)
    pub position: Vec3,

    /// Near clipping plane (may be negative for orthographic views)
    pub near: f32,

    /// Far clipping plane
    pub far: f32,
}

impl OrthoCamera {
    /// Camera on the (1, 1, 1) diagonal at `frustum_size` from the origin on each axis
    pub fn isometric(frustum_size: f32) -> Self {
        Self {
            frustum_size,
            position: Vec3::splat(frustum_size),
            near: -100.0,
            far: 100.0,
        }
    }

    /// Create view-projection matrix for rendering
    pub fn view_proj(&self, aspect_ratio: f32) -> Mat4 {
        let f = self.frustum_size;
        let proj = Mat4::orthographic_rh(
            -f * aspect_ratio,
            f * aspect_ratio,
            -f,
            f,
            self.near,
            self.far,
        );
        let view = Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y);
        proj * view
    }
}

impl Default for OrthoCamera {
    fn default() -> Self {
        Self::isometric(5.0)
    }
}

/// Transform applied to the whole grid
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTransform {
    pub position: Vec3,

    /// Euler angles in radians, applied in XYZ order
    pub rotation: Vec3,

    pub scale: Vec3,
}

impl GroupTransform {
    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}

impl Default for GroupTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

/// Live-tunable values, applied on top of a preset
///
/// Every field is optional; `None` keeps the preset's value.
#[derive(Debug, Clone, Default)]
pub struct DebugControls {
    pub spacing: Option<f32>,
    pub noise_scale: Option<f32>,
    pub animation_speed: Option<f32>,
    pub group_x: Option<f32>,
    pub group_y: Option<f32>,
    pub rotation_x: Option<f32>,
    pub rotation_y: Option<f32>,
    pub rotation_z: Option<f32>,
}

impl DebugControls {
    pub fn apply(&self, preset: &mut ScenePreset) {
        let set = |target: &mut f32, value: Option<f32>| {
            if let Some(value) = value {
                *target = value;
            }
        };
        set(&mut preset.grid.spacing, self.spacing);
        set(&mut preset.grid.noise_scale, self.noise_scale);
        set(&mut preset.grid.animation_speed, self.animation_speed);
        set(&mut preset.group.position.x, self.group_x);
        set(&mut preset.group.position.y, self.group_y);
        set(&mut preset.group.rotation.x, self.rotation_x);
        set(&mut preset.group.rotation.y, self.rotation_y);
        set(&mut preset.group.rotation.z, self.rotation_z);
    }
}

/// Everything needed to set up one demo scene
#[derive(Debug, Clone)]
pub struct ScenePreset {
    pub grid: GridSpec,
    pub camera: OrthoCamera,
    pub group: GroupTransform,
    pub background: Colour,
}

/// The cube grid demos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DemoVariant {
    /// 5x5 purple cubes
    #[default]
    SingleColour,

    /// 5x5 cubes with purple-pink gradient sides
    Gradient,

    /// 45x40 palette-coloured skyline, thinned towards the left
    GradientAdvanced,

    /// 24x8 wall of cubes pushed out from a back plane
    Wall,
}

impl DemoVariant {
    pub const ALL: [DemoVariant; 4] = [
        DemoVariant::SingleColour,
        DemoVariant::Gradient,
        DemoVariant::GradientAdvanced,
        DemoVariant::Wall,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DemoVariant::SingleColour => "single-colour",
            DemoVariant::Gradient => "gradient",
            DemoVariant::GradientAdvanced => "gradient-advanced",
            DemoVariant::Wall => "wall",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        Self::ALL.into_iter().find(|variant| variant.name() == name)
    }

    pub fn preset(self) -> ScenePreset {
        let tilted = GroupTransform {
            position: Vec3::new(0.0, 4.0, 0.0),
            rotation: Vec3::new(PI * 0.2, PI * 0.25, 0.0),
            scale: Vec3::ONE,
        };

        match self {
            DemoVariant::SingleColour => ScenePreset {
                grid: GridSpec {
                    height_law: HeightLaw { gain: 1.5 },
                    ..Default::default()
                },
                camera: OrthoCamera::isometric(5.0),
                group: tilted,
                background: Colour::rgb(0x10, 0x10, 0x14),
            },
            DemoVariant::Gradient => {
                let sides = Surface::Gradient([
                    ColourStop::new(0.0, Colour::rgb(0x66, 0x33, 0x99)),
                    ColourStop::new(0.2, Colour::rgb(0xff, 0x69, 0xb4)),
                    ColourStop::new(0.4, Colour::WHITE),
                ]);
                ScenePreset {
                    grid: GridSpec {
                        height_law: HeightLaw { gain: 2.0 },
                        materials: MaterialScheme::Uniform(FaceMaterials::sides_and_caps(
                            sides,
                            Surface::Solid(Colour::WHITE),
                        )),
                        ..Default::default()
                    },
                    camera: OrthoCamera::isometric(5.0),
                    group: tilted,
                    background: Colour::rgb(0x10, 0x10, 0x14),
                }
            }
            DemoVariant::GradientAdvanced => {
                let base = Colour::rgb(0xe9, 0xff, 0xfd);
                ScenePreset {
                    grid: GridSpec {
                        columns: 45,
                        rows: 40,
                        spacing: 1.0,
                        noise_scale: 1.0,
                        animation_speed: 0.5,
                        height_law: HeightLaw { gain: 2.0 },
                        footprint: Footprint::Skyline {
                            min: 0.5,
                            max: 2.5,
                            tower_chance: 0.1,
                            tower_max: 10.0,
                        },
                        selection: Some(Selection::ColumnGradient),
                        materials: MaterialScheme::PaletteGradient { base },
                        ..Default::default()
                    },
                    camera: OrthoCamera::isometric(25.0),
                    group: GroupTransform {
                        position: Vec3::new(-16.0, 10.0, 0.0),
                        ..tilted
                    },
                    background: base,
                }
            }
            DemoVariant::Wall => ScenePreset {
                grid: GridSpec {
                    columns: 24,
                    rows: 8,
                    spacing: 0.0,
                    noise_scale: 0.1,
                    animation_speed: 1.0,
                    layout: LatticeLayout::Wall,
                    height_law: HeightLaw { gain: 0.5 },
                    footprint: Footprint::Uniform { min: 0.0, max: 1.0 },
                    materials: MaterialScheme::Uniform(FaceMaterials::solid(Colour::rgb(
                        0xeb, 0xeb, 0xeb,
                    ))),
                    ..Default::default()
                },
                camera: OrthoCamera::isometric(2.0),
                group: GroupTransform {
                    position: Vec3::new(-2.5, -1.0, 0.0),
                    rotation: Vec3::new(0.0, PI * 0.5, 0.0),
                    scale: Vec3::splat(0.3),
                },
                background: Colour::rgb(0x1a, 0x1a, 0x2e),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_preset_is_valid() {
        for variant in DemoVariant::ALL {
            let preset = variant.preset();
            assert!(
                preset.grid.validate().is_ok(),
                "{} preset invalid",
                variant.name()
            );
        }
    }

    #[test]
    fn test_variant_names_round_trip() {
        for variant in DemoVariant::ALL {
            assert_eq!(DemoVariant::from_name(variant.name()), Some(variant));
        }
        assert_eq!(
            DemoVariant::from_name("Gradient-Advanced"),
            Some(DemoVariant::GradientAdvanced)
        );
        assert_eq!(DemoVariant::from_name("plasma"), None);
    }

    #[test]
    fn test_debug_controls_override_only_set_fields() {
        let mut preset = DemoVariant::SingleColour.preset();
        let controls = DebugControls {
            spacing: Some(1.25),
            group_y: Some(-2.0),
            rotation_z: Some(0.3),
            ..Default::default()
        };
        controls.apply(&mut preset);

        assert_eq!(preset.grid.spacing, 1.25);
        assert_eq!(preset.grid.noise_scale, 0.4);
        assert_eq!(preset.group.position, Vec3::new(0.0, -2.0, 0.0));
        assert_eq!(preset.group.rotation.z, 0.3);
        assert_eq!(preset.group.rotation.y, PI * 0.25);
    }

    #[test]
    fn test_camera_keeps_origin_centred() {
        let camera = OrthoCamera::isometric(5.0);
        let clip = camera.view_proj(16.0 / 9.0).project_point3(Vec3::ZERO);
        assert!(clip.x.abs() < 1e-5 && clip.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&clip.z));
    }

    #[test]
    fn test_group_transform_applies_translation_last() {
        let group = GroupTransform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::new(0.0, PI * 0.5, 0.0),
            scale: Vec3::splat(2.0),
        };
        let p = group.matrix().transform_point3(Vec3::X);
        // +X scaled to 2, rotated a quarter turn about Y onto -Z, then translated
        assert!((p - Vec3::new(1.0, 2.0, 1.0)).length() < 1e-5);
    }
}
