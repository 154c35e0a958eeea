//! Per-face cube materials and the shared material table.

use std::collections::HashMap;

use glam::Vec3;

use crate::palette::Colour;

/// Colour at an offset along a vertical gradient (0 = top edge, 1 = bottom edge)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColourStop {
    pub offset: f32,
    pub colour: Colour,
}

impl ColourStop {
    pub const fn new(offset: f32, colour: Colour) -> Self {
        Self { offset, colour }
    }
}

/// Appearance of one cube face
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Surface {
    Solid(Colour),

    /// Three stops with ascending offsets, evaluated like a canvas linear gradient
    Gradient([ColourStop; 3]),
}

impl Surface {
    /// Colour at vertical position `t` (0 = top, 1 = bottom)
    pub fn colour_at(&self, t: f32) -> Colour {
        match self {
            Surface::Solid(colour) => *colour,
            Surface::Gradient(stops) => gradient_colour(stops, t),
        }
    }
}

fn gradient_colour(stops: &[ColourStop], t: f32) -> Colour {
    let (first, last) = match (stops.first(), stops.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Colour::WHITE,
    };
    if t <= first.offset {
        return first.colour;
    }

    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            if span <= 0.0 {
                return b.colour;
            }
            return a.colour.lerp(b.colour, (t - a.offset) / span);
        }
    }
    last.colour
}

/// Cube face, in the order a box geometry lists its material groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Right,
    Left,
    Top,
    Bottom,
    Front,
    Back,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Right,
        Face::Left,
        Face::Top,
        Face::Bottom,
        Face::Front,
        Face::Back,
    ];

    /// Outward normal of the face
    pub fn normal(self) -> Vec3 {
        match self {
            Face::Right => Vec3::X,
            Face::Left => Vec3::NEG_X,
            Face::Top => Vec3::Y,
            Face::Bottom => Vec3::NEG_Y,
            Face::Front => Vec3::Z,
            Face::Back => Vec3::NEG_Z,
        }
    }
}

/// Materials for the six faces of a cube
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceMaterials {
    /// +X
    pub right: Surface,
    /// -X
    pub left: Surface,
    /// +Y
    pub top: Surface,
    /// -Y
    pub bottom: Surface,
    /// +Z
    pub front: Surface,
    /// -Z
    pub back: Surface,
}

impl FaceMaterials {
    /// Same solid colour on every face
    pub fn solid(colour: Colour) -> Self {
        Self::sides_and_caps(Surface::Solid(colour), Surface::Solid(colour))
    }

    /// One surface for the four side faces, another for top and bottom
    pub fn sides_and_caps(sides: Surface, caps: Surface) -> Self {
        Self {
            right: sides,
            left: sides,
            top: caps,
            bottom: caps,
            front: sides,
            back: sides,
        }
    }

    pub fn face(&self, face: Face) -> &Surface {
        match face {
            Face::Right => &self.right,
            Face::Left => &self.left,
            Face::Top => &self.top,
            Face::Bottom => &self.bottom,
            Face::Front => &self.front,
            Face::Back => &self.back,
        }
    }
}

/// Index into a [`MaterialTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

/// Hashable identity of a surface (offsets compared bitwise)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SurfaceKey {
    Solid(Colour),
    Gradient([(u32, Colour); 3]),
}

impl From<&Surface> for SurfaceKey {
    fn from(surface: &Surface) -> Self {
        match surface {
            Surface::Solid(colour) => SurfaceKey::Solid(*colour),
            Surface::Gradient(stops) => {
                SurfaceKey::Gradient(stops.map(|stop| (stop.offset.to_bits(), stop.colour)))
            }
        }
    }
}

fn material_key(material: &FaceMaterials) -> [SurfaceKey; 6] {
    Face::ALL.map(|face| SurfaceKey::from(material.face(face)))
}

/// Deduplicated list of materials referenced by instances
#[derive(Debug, Clone, Default)]
pub struct MaterialTable {
    materials: Vec<FaceMaterials>,
    index: HashMap<[SurfaceKey; 6], MaterialId>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id of an equal material, registering it if it is new
    pub fn intern(&mut self, material: FaceMaterials) -> MaterialId {
        let next = MaterialId(self.materials.len() as u32);
        let id = *self.index.entry(material_key(&material)).or_insert(next);
        if id == next {
            self.materials.push(material);
        }
        id
    }

    pub fn get(&self, id: MaterialId) -> Option<&FaceMaterials> {
        self.materials.get(id.0 as usize)
    }

    pub fn as_slice(&self) -> &[FaceMaterials] {
        &self.materials
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
