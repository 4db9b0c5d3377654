//! RGB colors for fills and strokes.

use serde::{Deserialize, Serialize};

/// An RGB color with components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel (0.0 - 1.0)
    pub r: f32,
    /// Green channel (0.0 - 1.0)
    pub g: f32,
    /// Blue channel (0.0 - 1.0)
    pub b: f32,
}

impl Color {
    /// Create a new color, clamping each channel into range.
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    /// Create a color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Create a gray level color.
    pub fn gray_level(level: f32) -> Self {
        Self::new(level, level, level)
    }

    /// Black.
    pub fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// White.
    pub fn white() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    /// Navy (#000080).
    pub fn navy() -> Self {
        Self::from_rgb8(0x00, 0x00, 0x80)
    }

    /// Gray (#808080).
    pub fn gray() -> Self {
        Self::from_rgb8(0x80, 0x80, 0x80)
    }

    /// Light gray (#D3D3D3).
    pub fn light_gray() -> Self {
        Self::from_rgb8(0xD3, 0xD3, 0xD3)
    }

    /// Red (#FF0000).
    pub fn red() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Dark green (#006400).
    pub fn dark_green() -> Self {
        Self::from_rgb8(0x00, 0x64, 0x00)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}
