//! Double border, header block, title and status pill.
//!
//! Every vertical position is a fixed offset from the top edge, so the frame
//! does not move with the field table's content. Centred texts are shrunk to
//! stay inside the space they are drawn in: between the logo and seal when
//! either is drawn, inside the inner border otherwise, and inside the pill for
//! the status label.

use super::assets::{AssetSlot, ResolvedAssets};
use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::geometry::{cm, Point, Rect};
use crate::writer::{Color, DrawingSurface, FontSpec, Paint};

const OUTER_BORDER_WIDTH: f32 = 4.0;
const INNER_BORDER_WIDTH: f32 = 1.0;
const DIVIDER_WIDTH: f32 = 2.0;
/// Corner radius of the status pill, in points.
const PILL_RADIUS: f32 = 10.0;
const PILL_WIDTH_CM: f32 = 8.0;
/// Logo and seal: square side and distance from the page side.
const BADGE_CM: f32 = 2.0;
const BADGE_X_CM: f32 = 2.0;
/// Clear space kept around centred texts.
const TEXT_PADDING_CM: f32 = 0.3;

/// Draw the frame and header.
pub fn render_frame(surface: &mut DrawingSurface, config: &RenderConfig, assets: &ResolvedAssets) -> Result<()> {
    let page = surface.geometry();
    let palette = &config.palette;
    let fonts = &config.typography;
    let cx = page.center_x();

    // Borders
    surface.draw_rectangle(
        page.bounds().inset(cm(config.outer_inset_cm)),
        &Paint::stroke(palette.navy, OUTER_BORDER_WIDTH),
    )?;
    surface.draw_rectangle(
        page.bounds().inset(cm(config.inner_inset_cm)),
        &Paint::stroke(palette.navy, INNER_BORDER_WIDTH),
    )?;

    // Logo left, seal mirrored right
    let badge = cm(BADGE_CM);
    let badge_y = page.from_top(cm(3.5));
    draw_asset(surface, Rect::new(cm(BADGE_X_CM), badge_y, badge, badge), &assets.logo)?;
    draw_asset(
        surface,
        Rect::new(page.width - cm(BADGE_X_CM) - badge, badge_y, badge, badge),
        &assets.seal,
    )?;

    // Header
    let padding = cm(TEXT_PADDING_CM);
    let inner_width = page.width - 2.0 * (cm(config.inner_inset_cm) + padding);
    let header_width = if assets.any_drawn() {
        page.width - 2.0 * (cm(BADGE_X_CM) + badge + padding)
    } else {
        inner_width
    };
    let text = &config.text;
    let header = [
        (2.5, &text.name, &fonts.institution),
        (3.0, &text.department, &fonts.subtitle),
        (3.5, &text.legal_basis, &fonts.subtitle),
    ];
    for (offset_cm, line, font) in header {
        draw_fitted_text(surface, config, page.from_top(cm(offset_cm)), line, font, header_width, palette.black)?;
    }

    let divider_y = page.from_top(cm(4.0));
    surface.draw_line(
        Point::new(cm(2.0), divider_y),
        Point::new(page.width - cm(2.0), divider_y),
        palette.navy,
        DIVIDER_WIDTH,
    )?;

    // Title and status pill
    draw_fitted_text(surface, config, page.from_top(cm(6.0)), &text.title, &fonts.title, inner_width, palette.navy)?;
    let pill_width = cm(PILL_WIDTH_CM);
    surface.draw_rounded_rectangle(
        Rect::new(cx - pill_width / 2.0, page.from_top(cm(7.5)), pill_width, cm(1.0)),
        PILL_RADIUS,
        &Paint::fill(palette.white),
    )?;
    draw_fitted_text(
        surface,
        config,
        page.from_top(cm(7.3)),
        &config.status_label,
        &fonts.status,
        pill_width - 2.0 * padding,
        palette.red,
    )?;

    log::debug!("Frame drawn");
    Ok(())
}

/// Centre `text` on the page at baseline `y`, shrunk to fit `max_width`.
fn draw_fitted_text(
    surface: &mut DrawingSurface,
    config: &RenderConfig,
    y: f32,
    text: &str,
    font: &FontSpec,
    max_width: f32,
    color: Color,
) -> Result<()> {
    let fitted = surface
        .fit_font(text, font, max_width, config.min_value_font_size)?
        .ok_or_else(|| {
            Error::Rendering(format!(
                "'{}' does not fit in {:.1}pt even at {}pt",
                text, max_width, config.min_value_font_size
            ))
        })?;
    if fitted.size < font.size {
        log::debug!("Shrinking '{}' to {:.1}pt", text, fitted.size);
    }
    let cx = surface.geometry().center_x();
    surface.draw_centered_text(cx, y, text, &fitted, color)
}

fn draw_asset(surface: &mut DrawingSurface, rect: Rect, slot: &AssetSlot) -> Result<()> {
    match slot {
        AssetSlot::Empty => Ok(()),
        AssetSlot::Loaded(image) => surface.draw_image_or_placeholder(rect, Some(image)),
        AssetSlot::Unavailable => surface.draw_image_or_placeholder(rect, None),
    }
}
