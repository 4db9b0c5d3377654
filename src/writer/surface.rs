//! Drawing surface for one page.
//!
//! A [`DrawingSurface`] owns the content stream and resources of a single
//! page. Drawing calls append operators in painter's order and record a
//! matching [`Primitive`] so layout can be inspected without parsing PDF.
//!
//! ```
//! use license_press::geometry::{PageGeometry, Rect};
//! use license_press::writer::{Color, DrawingSurface, Paint, PdfWriterConfig};
//!
//! let mut surface = DrawingSurface::new(PageGeometry::a4(), PdfWriterConfig::default());
//! surface.draw_rectangle(Rect::new(10.0, 10.0, 100.0, 50.0), &Paint::stroke(Color::navy(), 2.0))?;
//! let bytes = surface.finalize()?;
//! assert!(bytes.starts_with(b"%PDF-1.7"));
//! # Ok::<(), license_press::Error>(())
//! ```

use super::color::Color;
use super::font_manager::{encode_win_ansi, FontManager, FontSpec};
use super::graphics_state::ExtGStateBuilder;
use super::image_handler::ImageData;
use super::pdf_writer::{PageData, PdfWriter, PdfWriterConfig};
use crate::error::{Error, Result};
use crate::geometry::{PageGeometry, Point, Rect};

/// Stroke and fill settings for a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    /// Stroke color, `None` for no outline
    pub stroke: Option<Color>,
    /// Fill color, `None` for no fill
    pub fill: Option<Color>,
    /// Stroke width in points
    pub line_width: f32,
}

impl Paint {
    /// Outline only.
    pub fn stroke(color: Color, line_width: f32) -> Self {
        Self {
            stroke: Some(color),
            fill: None,
            line_width,
        }
    }

    /// Fill only.
    pub fn fill(color: Color) -> Self {
        Self {
            stroke: None,
            fill: Some(color),
            line_width: 1.0,
        }
    }

    /// Add a fill to this paint.
    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }
}

/// Horizontal text alignment relative to the anchor x.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// Text starts at the anchor
    Left,
    /// Text is centred on the anchor
    Center,
}

/// A translation followed by a rotation about the new origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    /// New origin in page units
    pub translate: Point,
    /// Counter-clockwise rotation in degrees
    pub rotate: f32,
}

impl Transform {
    /// Translate the origin to `(x, y)`.
    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            translate: Point::new(x, y),
            rotate: 0.0,
        }
    }

    /// Also rotate by `degrees`.
    pub fn rotated(mut self, degrees: f32) -> Self {
        self.rotate = degrees;
        self
    }

    /// The `cm` operands `[a b c d e f]`.
    pub fn matrix(&self) -> [f32; 6] {
        let (sin, cos) = self.rotate.to_radians().sin_cos();
        [cos, sin, -sin, cos, self.translate.x, self.translate.y]
    }
}

/// One recorded drawing operation.
///
/// Coordinates are in the user space active when the call was made.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Axis-aligned rectangle
    Rectangle {
        /// Bounds
        rect: Rect,
        /// Stroke/fill
        paint: Paint,
    },
    /// Rectangle with rounded corners
    RoundedRectangle {
        /// Bounds
        rect: Rect,
        /// Corner radius
        radius: f32,
        /// Stroke/fill
        paint: Paint,
    },
    /// Straight line
    Line {
        /// Start point
        from: Point,
        /// End point
        to: Point,
        /// Stroke color
        color: Color,
        /// Stroke width
        width: f32,
    },
    /// A single line of text
    Text {
        /// Text as given by the caller
        text: String,
        /// Anchor passed by the caller
        anchor: Point,
        /// Baseline start actually used
        origin: Point,
        /// Alignment used to derive `origin`
        align: TextAlign,
        /// Font face and size
        font: FontSpec,
        /// Fill color
        color: Color,
    },
    /// Embedded image
    Image {
        /// Placement
        rect: Rect,
        /// XObject resource name
        resource: String,
    },
    /// Blank region standing in for a missing image
    Placeholder {
        /// Placement
        rect: Rect,
    },
    /// Start of a transform scope
    BeginTransform(Transform),
    /// Start of a transparency scope
    BeginAlpha(f32),
    /// End of the innermost scope
    EndScope,
}

impl Primitive {
    /// The text of a `Text` primitive.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Primitive::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// The drawing target for one page.
///
/// Owned by a single render; `finalize` hands the page off as PDF bytes and
/// every later call fails with [`Error::UseAfterFinalize`].
#[derive(Debug)]
pub struct DrawingSurface {
    geometry: PageGeometry,
    writer_config: PdfWriterConfig,
    fonts: FontManager,
    page: PageData,
    primitives: Vec<Primitive>,
    /// Open transform/alpha scopes
    depth: usize,
    finalized: bool,
}

impl DrawingSurface {
    /// Create a blank page of the given size.
    pub fn new(geometry: PageGeometry, writer_config: PdfWriterConfig) -> Self {
        Self {
            geometry,
            writer_config,
            fonts: FontManager::new(),
            page: PageData::new(geometry.width, geometry.height),
            primitives: Vec::new(),
            depth: 0,
            finalized: false,
        }
    }

    /// Page size.
    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    /// Primitives drawn so far, in order.
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Whether [`finalize`](Self::finalize) has been called.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    fn ensure_open(&self) -> Result<()> {
        if self.finalized {
            Err(Error::UseAfterFinalize)
        } else {
            Ok(())
        }
    }

    fn apply_paint(&mut self, paint: &Paint) {
        let content = &mut self.page.content;
        if let Some(color) = paint.stroke {
            content.stroke_color(color).set_line_width(paint.line_width);
        }
        if let Some(color) = paint.fill {
            content.fill_color(color);
        }
    }

    fn paint_path(&mut self, paint: &Paint) {
        let content = &mut self.page.content;
        match (paint.stroke.is_some(), paint.fill.is_some()) {
            (true, true) => content.fill_stroke(),
            (true, false) => content.stroke(),
            (false, true) => content.fill(),
            (false, false) => content.end_path(),
        };
    }

    /// Draw a rectangle.
    pub fn draw_rectangle(&mut self, rect: Rect, paint: &Paint) -> Result<()> {
        self.ensure_open()?;
        self.apply_paint(paint);
        self.page.content.rect(rect.x, rect.y, rect.width, rect.height);
        self.paint_path(paint);
        self.primitives.push(Primitive::Rectangle { rect, paint: *paint });
        Ok(())
    }

    /// Draw a rectangle with rounded corners.
    pub fn draw_rounded_rectangle(&mut self, rect: Rect, radius: f32, paint: &Paint) -> Result<()> {
        self.ensure_open()?;
        self.apply_paint(paint);
        self.page
            .content
            .rounded_rect(rect.x, rect.y, rect.width, rect.height, radius);
        self.paint_path(paint);
        self.primitives.push(Primitive::RoundedRectangle {
            rect,
            radius,
            paint: *paint,
        });
        Ok(())
    }

    /// Draw a straight line.
    pub fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f32) -> Result<()> {
        self.ensure_open()?;
        self.page
            .content
            .stroke_color(color)
            .set_line_width(width)
            .move_to(from.x, from.y)
            .line_to(to.x, to.y)
            .stroke();
        self.primitives.push(Primitive::Line {
            from,
            to,
            color,
            width,
        });
        Ok(())
    }

    /// Draw text centred horizontally on `x` with its baseline at `y`.
    pub fn draw_centered_text(&mut self, x: f32, y: f32, text: &str, font: &FontSpec, color: Color) -> Result<()> {
        self.draw_text(Point::new(x, y), text, font, color, TextAlign::Center)
    }

    /// Draw text starting at `x` with its baseline at `y`.
    pub fn draw_left_text(&mut self, x: f32, y: f32, text: &str, font: &FontSpec, color: Color) -> Result<()> {
        self.draw_text(Point::new(x, y), text, font, color, TextAlign::Left)
    }

    fn draw_text(
        &mut self,
        anchor: Point,
        text: &str,
        font: &FontSpec,
        color: Color,
        align: TextAlign,
    ) -> Result<()> {
        self.ensure_open()?;
        let info = self.fonts.require(&font.name)?;
        let (encoded, replaced) = encode_win_ansi(text);
        if replaced > 0 {
            log::warn!(
                "{} character(s) in {:?} have no WinAnsi code, replaced with '?'",
                replaced,
                text
            );
        }

        let origin = match align {
            TextAlign::Left => anchor,
            TextAlign::Center => {
                Point::new(anchor.x - info.encoded_width(&encoded, font.size) / 2.0, anchor.y)
            },
        };

        let resource = self.page.resources.use_font(info);
        self.page
            .content
            .fill_color(color)
            .begin_text()
            .set_font(&resource, font.size)
            .text(encoded, origin.x, origin.y)
            .end_text();

        self.primitives.push(Primitive::Text {
            text: text.to_string(),
            anchor,
            origin,
            align,
            font: font.clone(),
            color,
        });
        Ok(())
    }

    /// Draw `image` scaled into `rect`, or a blank outlined region when
    /// there is no image.
    pub fn draw_image_or_placeholder(&mut self, rect: Rect, image: Option<&ImageData>) -> Result<()> {
        self.ensure_open()?;
        match image {
            Some(image) => {
                let resource = self.page.resources.use_image(image.clone());
                self.page
                    .content
                    .draw_image(&resource, rect.x, rect.y, rect.width, rect.height);
                self.primitives.push(Primitive::Image { rect, resource });
            },
            None => {
                self.page
                    .content
                    .stroke_color(Color::light_gray())
                    .set_line_width(0.5)
                    .rect(rect.x, rect.y, rect.width, rect.height)
                    .stroke();
                self.primitives.push(Primitive::Placeholder { rect });
            },
        }
        Ok(())
    }

    /// Width of `text` in `font`, in points.
    pub fn text_width(&self, text: &str, font: &FontSpec) -> Result<f32> {
        self.fonts.text_width(text, font)
    }

    /// `font` resized so that `text` fits in `max_width`, never below
    /// `min_size`.
    ///
    /// `None` when the text does not fit even at `min_size`.
    pub fn fit_font(&self, text: &str, font: &FontSpec, max_width: f32, min_size: f32) -> Result<Option<FontSpec>> {
        Ok(self
            .fonts
            .fit_size(text, font, max_width, min_size)?
            .map(|size| font.with_size(size)))
    }

    /// Run `body` with `transform` applied.
    ///
    /// The previous graphics state is restored when `body` returns, whether
    /// it succeeded or not.
    pub fn with_transform<T>(
        &mut self,
        transform: Transform,
        body: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.ensure_open()?;
        let [a, b, c, d, e, f] = transform.matrix();
        self.page.content.save_state().transform(a, b, c, d, e, f);
        self.primitives.push(Primitive::BeginTransform(transform));
        self.scoped(body)
    }

    /// Run `body` with fill and stroke opacity set to `alpha`.
    pub fn with_alpha<T>(&mut self, alpha: f32, body: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.ensure_open()?;
        let state = self
            .page
            .resources
            .use_ext_gstate(ExtGStateBuilder::new().alpha(alpha));
        self.page.content.save_state().set_ext_gstate(&state);
        self.primitives.push(Primitive::BeginAlpha(alpha.clamp(0.0, 1.0)));
        self.scoped(body)
    }

    fn scoped<T>(&mut self, body: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.depth += 1;
        let result = body(self);
        self.depth -= 1;
        self.page.content.restore_state();
        self.primitives.push(Primitive::EndScope);
        result
    }

    /// Serialize the page to PDF bytes.
    ///
    /// Terminal: the page content is handed off and the surface accepts no
    /// further calls.
    pub fn finalize(&mut self) -> Result<Vec<u8>> {
        self.ensure_open()?;
        if self.depth > 0 {
            return Err(Error::Rendering(
                "cannot finalize inside an open transform or alpha scope".to_string(),
            ));
        }
        self.finalized = true;

        let mut page = std::mem::replace(&mut self.page, PageData::new(0.0, 0.0));
        page.content.end_text();

        let mut writer = PdfWriter::with_config(self.writer_config.clone());
        writer.push_page(page);
        let bytes = writer.finish()?;
        log::debug!(
            "Finalized surface: {} primitive(s), {} bytes",
            self.primitives.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::ContentStreamOp;

    fn surface() -> DrawingSurface {
        DrawingSurface::new(PageGeometry::a4(), PdfWriterConfig::default())
    }

    fn ops(surface: &DrawingSurface) -> &[ContentStreamOp] {
        surface.page.content.operations()
    }

    #[test]
    fn test_calls_after_finalize_fail() {
        let mut s = surface();
        s.finalize().unwrap();
        assert!(s.is_finalized());
        let paint = Paint::stroke(Color::black(), 1.0);
        assert!(matches!(
            s.draw_rectangle(Rect::new(0.0, 0.0, 1.0, 1.0), &paint),
            Err(Error::UseAfterFinalize)
        ));
        assert!(matches!(
            s.draw_left_text(0.0, 0.0, "x", &FontSpec::regular(10.0), Color::black()),
            Err(Error::UseAfterFinalize)
        ));
        assert!(matches!(s.finalize(), Err(Error::UseAfterFinalize)));
    }

    #[test]
    fn test_transform_restored_on_error() {
        let mut s = surface();
        let result: Result<()> = s.with_transform(Transform::translate(10.0, 20.0).rotated(45.0), |s| {
            s.draw_left_text(0.0, 0.0, "inside", &FontSpec::regular(10.0), Color::black())?;
            Err(Error::Rendering("boom".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(ops(&s).last(), Some(&ContentStreamOp::RestoreState));
        assert_eq!(s.primitives().last(), Some(&Primitive::EndScope));
        // Scope closed, so the page can still be finalized
        assert!(s.finalize().is_ok());
    }

    #[test]
    fn test_finalize_inside_scope_fails() {
        let mut s = surface();
        let result = s.with_transform(Transform::translate(1.0, 1.0), |s| s.finalize());
        assert!(matches!(result, Err(Error::Rendering(_))));
        assert!(!s.is_finalized());
    }

    #[test]
    fn test_rotation_matrix() {
        let [a, b, c, d, e, f] = Transform::translate(5.0, 6.0).rotated(90.0).matrix();
        assert!(a.abs() < 1e-6 && (b - 1.0).abs() < 1e-6);
        assert!((c + 1.0).abs() < 1e-6 && d.abs() < 1e-6);
        assert_eq!((e, f), (5.0, 6.0));
    }

    #[test]
    fn test_centered_text_origin() {
        let mut s = surface();
        let font = FontSpec::bold(20.0);
        let width = s.text_width("CENTER", &font).unwrap();
        s.draw_centered_text(300.0, 700.0, "CENTER", &font, Color::black()).unwrap();
        match &s.primitives()[0] {
            Primitive::Text { origin, align, .. } => {
                assert_eq!(*align, TextAlign::Center);
                assert!((origin.x - (300.0 - width / 2.0)).abs() < 1e-3);
                assert_eq!(origin.y, 700.0);
            },
            other => panic!("unexpected primitive {:?}", other),
        }
    }

    #[test]
    fn test_unknown_font_is_an_error() {
        let mut s = surface();
        let result = s.draw_left_text(0.0, 0.0, "x", &FontSpec::new("Comic-Sans", 10.0), Color::black());
        assert!(matches!(result, Err(Error::Font(_))));
    }

    #[test]
    fn test_paint_selects_operator() {
        let mut s = surface();
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        s.draw_rectangle(rect, &Paint::fill(Color::black())).unwrap();
        assert_eq!(ops(&s).last(), Some(&ContentStreamOp::Fill));
        s.draw_rectangle(rect, &Paint::stroke(Color::navy(), 4.0)).unwrap();
        assert_eq!(ops(&s).last(), Some(&ContentStreamOp::Stroke));
        s.draw_rectangle(rect, &Paint::stroke(Color::navy(), 1.0).with_fill(Color::white()))
            .unwrap();
        assert_eq!(ops(&s).last(), Some(&ContentStreamOp::FillStroke));
    }

    #[test]
    fn test_missing_image_draws_placeholder() {
        let mut s = surface();
        let rect = Rect::new(50.0, 50.0, 56.0, 56.0);
        s.draw_image_or_placeholder(rect, None).unwrap();
        assert_eq!(s.primitives(), &[Primitive::Placeholder { rect }]);
    }

    #[test]
    fn test_alpha_scope_registers_state() {
        let mut s = surface();
        s.with_alpha(0.5, |s| {
            s.draw_centered_text(0.0, 0.0, "faint", &FontSpec::bold(60.0), Color::gray_level(0.9))
        })
        .unwrap();
        let bytes = s.finalize().unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/GSa500 gs"));
        assert!(text.contains("/Type /ExtGState"));
    }
}
