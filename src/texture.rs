//! Vertical gradient textures for cube side faces.

use std::collections::HashMap;

use image::{Rgba, RgbaImage};

use crate::grid::{ColourStop, Surface};
use crate::palette::Colour;

/// Draw a square texture filled with a top-to-bottom linear gradient
pub fn gradient_texture(stops: &[ColourStop; 3], size: u32) -> RgbaImage {
    let size = size.max(1);
    let surface = Surface::Gradient(*stops);
    let mut texture = RgbaImage::new(size, size);

    for y in 0..size {
        // Sample at the pixel centre
        let t = (y as f32 + 0.5) / size as f32;
        let pixel = Rgba(surface.colour_at(t).to_rgba8());
        for x in 0..size {
            texture.put_pixel(x, y, pixel);
        }
    }
    texture
}

/// Hashable identity of a gradient (offsets compared bitwise)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct GradientKey([(u32, Colour); 3]);

impl GradientKey {
    fn new(stops: &[ColourStop; 3]) -> Self {
        Self(stops.map(|stop| (stop.offset.to_bits(), stop.colour)))
    }
}

/// Gradient textures keyed by their stops, so equal gradients share one texture
#[derive(Debug)]
pub struct TextureCache {
    size: u32,
    textures: HashMap<GradientKey, RgbaImage>,
}

impl TextureCache {
    pub fn new(size: u32) -> Self {
        Self {
            size: size.max(1),
            textures: HashMap::new(),
        }
    }

    /// Texture for a gradient, drawing it on first use
    pub fn texture(&mut self, stops: &[ColourStop; 3]) -> &RgbaImage {
        let size = self.size;
        self.textures
            .entry(GradientKey::new(stops))
            .or_insert_with(|| gradient_texture(stops, size))
    }

    /// Colour of a surface at vertical texture coordinate `v` (0 = top, 1 = bottom)
    pub fn sample(&mut self, surface: &Surface, v: f32) -> Colour {
        match surface {
            Surface::Solid(colour) => *colour,
            Surface::Gradient(stops) => {
                let texture = self.texture(stops);
                let last = texture.height() - 1;
                let row = ((v * texture.height() as f32).floor().max(0.0) as u32).min(last);
                let [r, g, b, _] = texture.get_pixel(0, row).0;
                Colour::rgb(r, g, b)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
