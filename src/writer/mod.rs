//! PDF writing module.
//!
//! ## Architecture
//!
//! ```text
//! renderers
//!     ↓
//! [DrawingSurface] (primitives, scoped transforms, one page)
//!     ↓
//! [ContentStreamBuilder] (operators → content stream bytes)
//!     ↓
//! [PdfWriter] (assembles complete PDF structure)
//!     ↓
//! [ObjectSerializer] (serializes PDF objects)
//!     ↓
//! PDF bytes
//! ```
//!
//! ## Low-Level API (PdfWriter)
//!
//! ```
//! use license_press::writer::{encode_win_ansi, FontManager, PageData, PdfWriter, PdfWriterConfig};
//!
//! let fonts = FontManager::new();
//! let mut page = PageData::new(595.0, 842.0);
//! let resource = page.resources.use_font(fonts.require("Helvetica")?);
//! let (encoded, _) = encode_win_ansi("Hello, World!");
//! page.content.begin_text().set_font(&resource, 12.0).text(encoded, 72.0, 720.0);
//!
//! let mut writer = PdfWriter::with_config(PdfWriterConfig::default());
//! writer.push_page(page);
//! let bytes = writer.finish()?;
//! assert!(bytes.ends_with(b"%%EOF"));
//! # Ok::<(), license_press::Error>(())
//! ```

mod color;
mod content_stream;
mod font_manager;
mod graphics_state;
mod image_handler;
mod object_serializer;
mod pdf_writer;
mod surface;

pub use color::Color;
pub use content_stream::{ContentStreamBuilder, ContentStreamOp};
pub use font_manager::{encode_win_ansi, FontFamily, FontInfo, FontManager, FontSpec, FontWeight};
pub use graphics_state::ExtGStateBuilder;
pub use image_handler::{ColorSpace, ImageData, ImageError, ImageFormat};
pub use object_serializer::ObjectSerializer;
pub use pdf_writer::{PageData, PageResources, PdfWriter, PdfWriterConfig};
pub use surface::{DrawingSurface, Paint, Primitive, TextAlign, Transform};
