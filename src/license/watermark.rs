//! Background security watermark.

use crate::config::RenderConfig;
use crate::error::Result;
use crate::writer::{DrawingSurface, Transform};

/// Rotation of the watermark text, counter-clockwise.
pub const WATERMARK_ANGLE: f32 = 45.0;

/// Draw the rotated, semi-transparent watermark across the page centre.
///
/// Must run first so that everything drawn later sits on top of it.
pub fn render_watermark(surface: &mut DrawingSurface, config: &RenderConfig) -> Result<()> {
    let center = surface.geometry().center();
    let transform = Transform::translate(center.x, center.y).rotated(WATERMARK_ANGLE);

    surface.with_transform(transform, |surface| {
        surface.with_alpha(config.watermark_alpha, |surface| {
            surface.draw_centered_text(
                0.0,
                0.0,
                &config.text.watermark,
                &config.typography.watermark,
                config.palette.watermark,
            )
        })
    })
}
