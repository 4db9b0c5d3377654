//! Orchestrates the renderers into one finished license page.
//!
//! Drawing order is fixed: watermark, frame, field table, inspection block,
//! footer. Each stage only appends to the page.

use super::assets::{AssetLoader, NoAssets, RenderAssets};
use super::field_table::{layout_rows, render_field_table, TableRow};
use super::footer::{render_footer, PlaceholderMark, SecurityMark};
use super::frame::render_frame;
use super::inspection::render_inspection_block;
use super::numbers::{DerivedFields, NumberSource, RandomNumbers};
use super::record::LicenseRecord;
use super::watermark::render_watermark;
use crate::config::RenderConfig;
use crate::error::Result;
use crate::writer::{DrawingSurface, Primitive};
use std::path::Path;

/// A finished license PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    file_name: String,
    bytes: Vec<u8>,
}

impl Document {
    fn new(file_number: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: format!("license-{}.pdf", sanitize_file_stem(file_number, "document")),
            bytes,
        }
    }

    /// Suggested file name, e.g. `license-exp-0001.pdf`.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// PDF bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take the PDF bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the document has no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the PDF to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }
}

/// Lowercase ASCII alphanumerics joined by single dashes.
///
/// Returns `fallback` when nothing usable remains.
pub fn sanitize_file_stem(name: &str, fallback: &str) -> String {
    let mut result = String::new();
    let mut pending_dash = false;

    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !result.is_empty() {
                result.push('-');
            }
            pending_dash = false;
            result.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if result.is_empty() {
        fallback.to_string()
    } else {
        result
    }
}

/// Everything produced by one render, for callers that inspect layout.
#[derive(Debug, Clone)]
pub struct RenderedLicense {
    /// The PDF
    pub document: Document,
    /// Computed numbers and capacity
    pub derived: DerivedFields,
    /// Field table rows as laid out
    pub rows: Vec<TableRow>,
    /// Every primitive drawn, in order
    pub primitives: Vec<Primitive>,
}

/// Renders license records with a fixed configuration and collaborators.
///
/// A renderer holds no per-render state, so one instance can serve many
/// threads at once.
pub struct LicenseRenderer {
    config: RenderConfig,
    numbers: Box<dyn NumberSource>,
    assets: RenderAssets,
    loader: Box<dyn AssetLoader>,
    mark: Box<dyn SecurityMark>,
}

impl LicenseRenderer {
    /// Renderer with random numbers, no assets and the placeholder mark.
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            numbers: Box::new(RandomNumbers),
            assets: RenderAssets::none(),
            loader: Box::new(NoAssets),
            mark: Box::new(PlaceholderMark),
        }
    }

    /// Use `numbers` for resolution and certificate numbers.
    pub fn with_numbers(mut self, numbers: impl NumberSource + 'static) -> Self {
        self.numbers = Box::new(numbers);
        self
    }

    /// Draw the given logo and seal, loaded through `loader`.
    pub fn with_assets(mut self, assets: RenderAssets, loader: impl AssetLoader + 'static) -> Self {
        self.assets = assets;
        self.loader = Box::new(loader);
        self
    }

    /// Replace the security mark.
    pub fn with_security_mark(mut self, mark: impl SecurityMark + 'static) -> Self {
        self.mark = Box::new(mark);
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render `record` to a PDF document.
    pub fn render(&self, record: &LicenseRecord) -> Result<Document> {
        self.render_detailed(record).map(|rendered| rendered.document)
    }

    /// Render `record`, keeping the layout alongside the document.
    pub fn render_detailed(&self, record: &LicenseRecord) -> Result<RenderedLicense> {
        record.validate()?;
        let config = &self.config;
        config.validate()?;
        let page = config.page_geometry();

        log::info!("Rendering license {}", record.file_number);
        let derived = DerivedFields::compute(record, self.numbers.as_ref(), config)?;
        let assets = self.assets.resolve(self.loader.as_ref());

        let mut surface = DrawingSurface::new(page, config.writer_config());
        render_watermark(&mut surface, config)?;
        render_frame(&mut surface, config, &assets)?;
        let rows = layout_rows(record, &derived, config, page);
        render_field_table(&mut surface, &rows, config)?;
        render_inspection_block(&mut surface, record, &derived, config)?;
        render_footer(&mut surface, config, self.mark.as_ref())?;

        let bytes = surface.finalize()?;
        let document = Document::new(&record.file_number, bytes);
        log::info!(
            "Rendered license {} as {} ({} bytes)",
            record.file_number,
            document.file_name(),
            document.len()
        );

        Ok(RenderedLicense {
            document,
            derived,
            rows,
            primitives: surface.primitives().to_vec(),
        })
    }
}

/// Render `record` with `config`, drawing document numbers at random.
///
/// Use [`LicenseRenderer::with_numbers`] for reproducible output.
pub fn render(record: &LicenseRecord, config: &RenderConfig) -> Result<Document> {
    LicenseRenderer::new(config.clone()).render(record)
}
