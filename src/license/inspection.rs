//! Highlighted technical inspection certificate block.

use super::numbers::DerivedFields;
use super::record::LicenseRecord;
use crate::config::RenderConfig;
use crate::error::Result;
use crate::geometry::{cm, PageGeometry, Rect};
use crate::writer::{DrawingSurface, Paint};

const BLOCK_RADIUS: f32 = 10.0;
const BLOCK_LINE_WIDTH: f32 = 2.0;

/// The certificate line, e.g. `Certificate No. 4567  -  Risk: EVALUATED`.
pub fn certificate_line(certificate_number: u32, risk_level: &str) -> String {
    format!("Certificate No. {}  -  Risk: {}", certificate_number, risk_level)
}

/// The validity line; the expiry date is printed as given.
pub fn validity_line(expiry: &str) -> String {
    format!("VALID UNTIL: {}", expiry)
}

/// Outline of the inspection block: 2 cm from the sides, 4 cm to 6.5 cm
/// above the bottom edge.
pub fn inspection_block_bounds(page: PageGeometry) -> Rect {
    Rect::new(cm(2.0), cm(4.0), page.width - cm(4.0), cm(2.5))
}

/// Draw the inspection block in the lower third of the page.
pub fn render_inspection_block(
    surface: &mut DrawingSurface,
    record: &LicenseRecord,
    derived: &DerivedFields,
    config: &RenderConfig,
) -> Result<()> {
    let page = surface.geometry();
    let cx = page.center_x();
    let fonts = &config.typography;
    let palette = &config.palette;

    surface.draw_rounded_rectangle(
        inspection_block_bounds(page),
        BLOCK_RADIUS,
        &Paint::stroke(palette.dark_green, BLOCK_LINE_WIDTH),
    )?;

    surface.draw_centered_text(cx, cm(5.8), &config.text.inspection_header, &fonts.section_header, palette.dark_green)?;
    surface.draw_centered_text(
        cx,
        cm(5.0),
        &certificate_line(derived.certificate_number, record.risk_level_display()),
        &fonts.body,
        palette.black,
    )?;
    surface.draw_centered_text(
        cx,
        cm(4.5),
        &validity_line(&record.inspection_expiry_date),
        &fonts.body,
        palette.black,
    )?;

    log::debug!("Inspection block drawn");
    Ok(())
}
