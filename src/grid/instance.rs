//! Grid cell instances and their GPU-ready layout.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec2, Vec3};

use super::material::MaterialId;
use crate::params::LatticeLayout;

/// Per-instance data for upload to an instance buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub material: u32,
    pub _padding: [u32; 3], // Padding for alignment
}

/// Whether an instance has been touched by the animation yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    /// Fresh from `build`
    Built,
    /// Updated by at least one `advance`
    Animated,
}

/// One grid cell: transform, material key and the lattice cell it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    /// (column, row) lattice coordinate
    pub lattice: (usize, usize),

    /// Plane coordinates assigned at build time; the animation's noise key
    pub plane: Vec2,

    pub position: Vec3,
    pub scale: Vec3,
    pub material: MaterialId,
    pub state: InstanceState,
}

impl Instance {
    /// Scale along the layout's extrusion axis
    pub fn extrusion(&self, layout: LatticeLayout) -> f32 {
        self.scale[layout.extrusion_axis()]
    }

    /// Position along the layout's extrusion axis
    pub fn extrusion_offset(&self, layout: LatticeLayout) -> f32 {
        self.position[layout.extrusion_axis()]
    }

    /// Set extrusion scale and the matching anchored offset together
    pub(crate) fn set_extrusion(&mut self, layout: LatticeLayout, scale: f32, offset: f32) {
        let axis = layout.extrusion_axis();
        self.scale[axis] = scale;
        self.position[axis] = offset;
    }

    /// Local-to-group transform of the unit cube
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, Quat::IDENTITY, self.position)
    }

    pub fn to_raw(&self) -> InstanceRaw {
        InstanceRaw {
            model: self.model_matrix().to_cols_array_2d(),
            material: self.material.0,
            _padding: [0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_instance() -> Instance {
        Instance {
            lattice: (1, 2),
            plane: Vec2::new(1.5, 3.0),
            position: Vec3::new(1.5, 0.25, 3.0),
            scale: Vec3::new(0.8, 1.5, 1.2),
            material: MaterialId(3),
            state: InstanceState::Built,
        }
    }

    #[test]
    fn test_extrusion_follows_layout() {
        let instance = sample_instance();
        assert_eq!(instance.extrusion(LatticeLayout::Floor), 1.5);
        assert_eq!(instance.extrusion(LatticeLayout::Wall), 0.8);
        assert_eq!(instance.extrusion_offset(LatticeLayout::Floor), 0.25);
    }

    #[test]
    fn test_set_extrusion_touches_one_axis() {
        let mut instance = sample_instance();
        instance.set_extrusion(LatticeLayout::Wall, 2.0, 0.5);
        assert_eq!(instance.scale, Vec3::new(2.0, 1.5, 1.2));
        assert_eq!(instance.position, Vec3::new(0.5, 0.25, 3.0));
    }

    #[test]
    fn test_model_matrix_places_unit_cube() {
        let instance = sample_instance();
        let model = instance.model_matrix();
        let top_corner = model.transform_point3(Vec3::new(0.5, 0.5, 0.5));
        assert!((top_corner - Vec3::new(1.9, 1.0, 3.6)).length() < 1e-6);
    }

    #[test]
    fn test_raw_layout() {
        let raw = sample_instance().to_raw();
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 80);
        assert_eq!(raw.material, 3);
        assert_eq!(raw.model[3], [1.5, 0.25, 3.0, 1.0]);

        let bytes: &[u8] = bytemuck::bytes_of(&raw);
        assert_eq!(bytes.len(), 80);
    }
}
