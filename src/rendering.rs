//! Headless preview renderer: z-buffered flat rasterizer writing RGBA frames.
//!
//! Draws each instance as a box with one tint per face; gradient faces sample
//! cached gradient textures along the box's local vertical axis. No lighting.

use std::path::Path;

use glam::{Mat4, Vec2, Vec3, Vec4};
use image::{GrayImage, Luma, Rgba, RgbaImage};

use crate::grid::{Face, FaceMaterials, InstanceRaw, Surface};
use crate::noise::NoiseField;
use crate::palette::Colour;
use crate::params::RenderConfig;
use crate::texture::TextureCache;

/// Errors from frame output
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub view_proj: Mat4,
    /// Transform of the whole grid
    pub group: Mat4,
    pub instances: &'a [InstanceRaw],
    /// Indexed by `InstanceRaw::material`
    pub materials: &'a [FaceMaterials],
    pub background: Colour,
}

/// Fixed per-face tint so box edges read without a lighting model
fn face_tint(face: Face) -> f32 {
    match face {
        Face::Top => 1.0,
        Face::Right => 0.85,
        Face::Front => 0.72,
        Face::Left => 0.62,
        Face::Back => 0.55,
        Face::Bottom => 0.45,
    }
}

/// Corners of a unit-cube face, counter-clockwise seen from outside
fn face_corners(face: Face) -> [Vec3; 4] {
    let n = face.normal();
    let (u, w) = if n.x != 0.0 {
        (Vec3::Y, Vec3::Z)
    } else if n.y != 0.0 {
        (Vec3::Z, Vec3::X)
    } else {
        (Vec3::X, Vec3::Y)
    };
    let centre = n * 0.5;
    let corners = [
        centre - u * 0.5 - w * 0.5,
        centre + u * 0.5 - w * 0.5,
        centre + u * 0.5 + w * 0.5,
        centre - u * 0.5 + w * 0.5,
    ];
    // u x w points along +axis; reverse for the negative faces
    if n.x + n.y + n.z < 0.0 {
        [corners[0], corners[3], corners[2], corners[1]]
    } else {
        corners
    }
}

/// Projected vertex: screen position, depth in [0, 1], texture v
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    screen: Vec2,
    depth: f32,
    v: f32,
}

/// Software rendering system with colour and depth buffers
pub struct RenderSystem {
    config: RenderConfig,
    colour: RgbaImage,
    depth: Vec<f32>,
    textures: TextureCache,
}

impl RenderSystem {
    pub fn new(config: RenderConfig) -> Self {
        let colour = RgbaImage::new(config.width.max(1), config.height.max(1));
        let depth = vec![f32::INFINITY; colour.len() / 4];
        let textures = TextureCache::new(config.texture_size);
        Self {
            config,
            colour,
            depth,
            textures,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Last rendered frame
    pub fn image(&self) -> &RgbaImage {
        &self.colour
    }

    /// Render a frame into the colour buffer
    pub fn render(&mut self, frame: &Frame<'_>) -> &RgbaImage {
        let background = Rgba(frame.background.to_rgba8());
        for pixel in self.colour.pixels_mut() {
            *pixel = background;
        }
        self.depth.fill(f32::INFINITY);

        let fallback = FaceMaterials::solid(Colour::WHITE);
        let world = frame.view_proj * frame.group;

        for raw in frame.instances {
            let mvp = world * Mat4::from_cols_array_2d(&raw.model);
            let materials = frame
                .materials
                .get(raw.material as usize)
                .unwrap_or(&fallback);

            for face in Face::ALL {
                let corners = face_corners(face).map(|local| self.project(mvp, local));
                let surface = materials.face(face);
                let tint = face_tint(face);
                self.fill_triangle([corners[0], corners[1], corners[2]], surface, tint);
                self.fill_triangle([corners[0], corners[2], corners[3]], surface, tint);
            }
        }

        &self.colour
    }

    /// Save the last rendered frame as PNG
    pub fn save_frame(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.colour.save(path)?;
        Ok(())
    }

    fn project(&self, mvp: Mat4, local: Vec3) -> ScreenVertex {
        let clip = mvp * Vec4::new(local.x, local.y, local.z, 1.0);
        let ndc = clip.truncate() / clip.w;
        let (width, height) = self.colour.dimensions();
        ScreenVertex {
            screen: Vec2::new(
                (ndc.x + 1.0) * 0.5 * width as f32,
                (1.0 - ndc.y) * 0.5 * height as f32,
            ),
            depth: ndc.z,
            // Top edge of the box is the start of the gradient
            v: 0.5 - local.y,
        }
    }

    fn fill_triangle(&mut self, tri: [ScreenVertex; 3], surface: &Surface, tint: f32) {
        let [a, b, c] = tri;
        let finite = tri
            .iter()
            .all(|v| v.screen.is_finite() && v.depth.is_finite());
        if !finite {
            return;
        }

        // Screen y points down, so front faces wind negative
        let area = edge(a.screen, b.screen, c.screen);
        if area > -1e-8 {
            return;
        }

        let (width, height) = self.colour.dimensions();
        let min = a.screen.min(b.screen).min(c.screen).floor().max(Vec2::ZERO);
        let max = a
            .screen
            .max(b.screen)
            .max(c.screen)
            .ceil()
            .min(Vec2::new(width as f32 - 1.0, height as f32 - 1.0));
        if min.x > max.x || min.y > max.y {
            return;
        }

        let Self {
            colour,
            depth,
            textures,
            ..
        } = self;

        for y in min.y as u32..=max.y as u32 {
            for x in min.x as u32..=max.x as u32 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let wa = edge(b.screen, c.screen, p) / area;
                let wb = edge(c.screen, a.screen, p) / area;
                let wc = edge(a.screen, b.screen, p) / area;
                if wa < 0.0 || wb < 0.0 || wc < 0.0 {
                    continue;
                }

                let z = wa * a.depth + wb * b.depth + wc * c.depth;
                let index = (y * width + x) as usize;
                if !(0.0..=1.0).contains(&z) || z >= depth[index] {
                    continue;
                }
                depth[index] = z;

                let v = wa * a.v + wb * b.v + wc * c.v;
                let shaded = textures.sample(surface, v).shade(tint);
                colour.put_pixel(x, y, Rgba(shaded.to_rgba8()));
            }
        }
    }
}

fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Render the noise field as a grayscale heightmap (black = -1, white = 1)
pub fn render_heightmap(noise: &NoiseField, size: u32, frequency: f32) -> GrayImage {
    let mut img = GrayImage::new(size, size);

    for y in 0..size {
        for x in 0..size {
            let value = noise.sample_2d(x as f32 * frequency, y as f32 * frequency);

            // Map noise from [-1, 1] to grayscale [0, 255]
            let gray = ((value + 1.0) * 127.5).clamp(0.0, 255.0) as u8;
            img.put_pixel(x, y, Luma([gray]));
        }
    }
    img
}
