//! Environment images and point sampling of their linear color.

use glam::{Vec2, Vec3};
use iblkit_core::{Error, Result};
use std::path::Path;

/// Exponent used when re-encoding sampled colors for display.
pub const DISPLAY_GAMMA: f32 = 2.2;

/// Read access to a decoded image, one linear RGB texel at a time.
///
/// `fetch_texel` returns `None` for coordinates it cannot serve; samplers
/// treat that as black rather than an error.
pub trait TexelSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn fetch_texel(&self, x: u32, y: u32) -> Option<[f32; 3]>;
}

/// A decoded environment map held in memory as linear RGB32F.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentImage {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl EnvironmentImage {
    pub fn from_rgb32f(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(Error::Image(format!(
                "{}x{} image needs {} floats, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self { width, height, data })
    }

    /// Image filled with a single color.
    pub fn solid(width: u32, height: u32, color: Vec3) -> Self {
        let data = color
            .to_array()
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();
        Self { width, height, data }
    }

    /// Decodes an image file. Radiance HDR and OpenEXR keep their float
    /// range; 8-bit formats map to 0-1.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|e| Error::Image(format!("Failed to open {}: {}", path.display(), e)))?
            .into_rgb32f();
        let (width, height) = img.dimensions();
        log::debug!("Decoded environment {} ({}x{})", path.display(), width, height);
        Ok(Self {
            width,
            height,
            data: img.into_raw(),
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| Error::Image(format!("Failed to decode environment: {}", e)))?
            .into_rgb32f();
        let (width, height) = img.dimensions();
        Ok(Self {
            width,
            height,
            data: img.into_raw(),
        })
    }

    pub fn set_texel(&mut self, x: u32, y: u32, color: Vec3) {
        if x < self.width && y < self.height {
            let i = (y as usize * self.width as usize + x as usize) * 3;
            self.data[i..i + 3].copy_from_slice(&color.to_array());
        }
    }
}

impl TexelSource for EnvironmentImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fetch_texel(&self, x: u32, y: u32) -> Option<[f32; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }
}

/// Nearest-texel color at `uv`.
///
/// A texel that cannot be read (outside the image, including `u` or `v` of
/// exactly 1.0) samples as black. With `srgb` set each channel is raised to
/// `1 / 2.2`; negative channels clamp to zero first.
pub fn sample_color<T: TexelSource + ?Sized>(image: &T, uv: Vec2, srgb: bool) -> Vec3 {
    let x = (uv.x * image.width() as f32).floor();
    let y = (uv.y * image.height() as f32).floor();

    let texel = if x >= 0.0 && y >= 0.0 && x.is_finite() && y.is_finite() {
        image.fetch_texel(x as u32, y as u32)
    } else {
        None
    };
    let color = texel.map(Vec3::from_array).unwrap_or(Vec3::ZERO);

    if srgb {
        color.max(Vec3::ZERO).powf(1.0 / DISPLAY_GAMMA)
    } else {
        color
    }
}
