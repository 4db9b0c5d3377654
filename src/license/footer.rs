//! Footer: security mark and signature line.
//!
//! The security mark is an extension point. [`PlaceholderMark`] reserves the
//! area with a filled box; a real scannable-code generator implements
//! [`SecurityMark`] and draws into the same area.

use crate::config::RenderConfig;
use crate::error::Result;
use crate::geometry::{cm, PageGeometry, Point, Rect};
use crate::writer::{DrawingSurface, Paint};

const SIGNATURE_LINE_WIDTH: f32 = 1.0;

/// Draws the machine-scannable verification mark.
pub trait SecurityMark: Send + Sync {
    /// Draw the mark inside `area`.
    fn draw(&self, surface: &mut DrawingSurface, area: Rect, config: &RenderConfig) -> Result<()>;
}

/// Filled black square with a centred caption.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderMark;

impl SecurityMark for PlaceholderMark {
    fn draw(&self, surface: &mut DrawingSurface, area: Rect, config: &RenderConfig) -> Result<()> {
        let palette = &config.palette;
        surface.draw_rectangle(area, &Paint::fill(palette.black))?;
        // Caption baseline sits a little below the middle of the box
        surface.draw_centered_text(
            area.center().x,
            area.y + area.height * 0.4,
            &config.text.mark_caption,
            &config.typography.mark_caption,
            palette.white,
        )
    }
}

/// Area reserved for the security mark: a 2.5 cm square near the
/// bottom-right corner.
pub fn security_mark_area(page: PageGeometry) -> Rect {
    Rect::new(page.width - cm(5.0), cm(1.5), cm(2.5), cm(2.5))
}

/// Draw the security mark and the signature line with its caption.
pub fn render_footer(surface: &mut DrawingSurface, config: &RenderConfig, mark: &dyn SecurityMark) -> Result<()> {
    let page = surface.geometry();
    mark.draw(surface, security_mark_area(page), config)?;

    let palette = &config.palette;
    surface.draw_line(
        Point::new(cm(4.0), cm(2.5)),
        Point::new(cm(9.0), cm(2.5)),
        palette.black,
        SIGNATURE_LINE_WIDTH,
    )?;
    surface.draw_centered_text(
        cm(6.5),
        cm(2.2),
        &config.text.signature_caption,
        &config.typography.caption,
        palette.black,
    )?;

    log::debug!("Footer drawn");
    Ok(())
}
