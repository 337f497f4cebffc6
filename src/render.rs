use crate::config::BoundaryMode;
use crate::error::{FluidError, Result};
use crate::grid::VectorGrid;
use glam::{Vec2, Vec4};
use image::{ImageBuffer, Rgba, RgbaImage};

pub const DEFAULT_COLORS: [&str; 3] = ["#5227FF", "#FF9FFC", "#B19EEF"];

/// Colour ramp indexed by speed, sampled like a linearly filtered,
/// edge-clamped 1D texture.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Vec4>,
}

impl Palette {
    pub fn from_hex(colors: &[&str]) -> Result<Self> {
        if colors.is_empty() {
            return Err(FluidError::InvalidConfig("palette needs at least one colour".into()));
        }
        let colors = colors.iter().map(|c| parse_hex(c)).collect::<Result<Vec<_>>>()?;
        Ok(Self { colors })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn sample(&self, t: f32) -> Vec4 {
        let n = self.colors.len();
        let u = (t * n as f32 - 0.5).clamp(0.0, (n - 1) as f32);
        let i0 = u.floor() as usize;
        let i1 = (i0 + 1).min(n - 1);
        self.colors[i0].lerp(self.colors[i1], u - i0 as f32)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS
                .iter()
                .filter_map(|c| parse_hex(c).ok())
                .collect(),
        }
    }
}

fn parse_hex(color: &str) -> Result<Vec4> {
    let hex = color.trim_start_matches('#');
    let invalid = || FluidError::InvalidConfig(format!("bad palette colour {color:?}"));
    if hex.len() != 6 {
        return Err(invalid());
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map(|v| v as f32 / 255.0)
            .map_err(|_| invalid())
    };
    Ok(Vec4::new(channel(0)?, channel(2)?, channel(4)?, 1.0))
}

/// Maps velocity to colour: speed picks the palette entry and blends it
/// over the background.
pub struct Renderer {
    palette: Palette,
    background: Vec4,
}

impl Renderer {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            background: Vec4::ZERO,
        }
    }

    pub fn with_background(mut self, background: [f32; 4]) -> Self {
        self.background = Vec4::from_array(background);
        self
    }

    pub fn color(&self, velocity: Vec2) -> [u8; 4] {
        let speed = velocity.length().clamp(0.0, 1.0);
        let c = self.palette.sample(speed);
        let rgb = self.background.truncate().lerp(c.truncate(), speed);
        let a = self.background.w + (1.0 - self.background.w) * speed;
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [to_u8(rgb.x), to_u8(rgb.y), to_u8(rgb.z), to_u8(a)]
    }

    /// One pixel per cell. Image rows run top to bottom, grid rows bottom to top.
    pub fn render(&self, velocity: &VectorGrid) -> RgbaImage {
        let (w, h) = (velocity.width() as u32, velocity.height() as u32);
        ImageBuffer::from_fn(w, h, |x, y| {
            Rgba(self.color(velocity.get(x as usize, (h - 1 - y) as usize)))
        })
    }

    /// Bilinearly upsamples the field to `width × height` pixels.
    pub fn render_scaled(&self, velocity: &VectorGrid, width: u32, height: u32) -> RgbaImage {
        ImageBuffer::from_fn(width, height, |x, y| {
            let uv = Vec2::new(
                (x as f32 + 0.5) / width as f32,
                1.0 - (y as f32 + 0.5) / height as f32,
            );
            Rgba(self.color(velocity.sample(uv, BoundaryMode::Bounded)))
        })
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}
