//! PDF document writer.
//!
//! Assembles complete PDF documents with proper structure:
//! header, body, xref table, and trailer.
//!
//! Object numbering and dictionary layout depend only on the pages handed
//! in, so the same pages always produce the same bytes.

use super::content_stream::ContentStreamBuilder;
use super::font_manager::FontInfo;
use super::graphics_state::ExtGStateBuilder;
use super::image_handler::ImageData;
use super::object_serializer::ObjectSerializer;
use crate::error::Result;
use crate::object::{Object, ObjectRef};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::Write;

/// Configuration for PDF generation.
#[derive(Debug, Clone)]
pub struct PdfWriterConfig {
    /// PDF version (e.g., "1.7")
    pub version: String,
    /// Document title
    pub title: Option<String>,
    /// Document author
    pub author: Option<String>,
    /// Creator application
    pub creator: Option<String>,
    /// Creation date written to the Info dictionary
    pub creation_date: Option<DateTime<Utc>>,
    /// Whether to compress content streams with FlateDecode
    pub compress: bool,
}

impl Default for PdfWriterConfig {
    fn default() -> Self {
        Self {
            version: "1.7".to_string(),
            title: None,
            author: None,
            creator: Some("license_press".to_string()),
            creation_date: None,
            compress: false,
        }
    }
}

/// Compress data using Flate/Deflate compression.
fn compress_data(data: &[u8]) -> std::io::Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Format a date as a PDF date string (`D:YYYYMMDDHHmmSSZ`).
fn pdf_date(date: &DateTime<Utc>) -> String {
    format!("D:{}Z", date.format("%Y%m%d%H%M%S"))
}

/// Resources referenced by a page's content stream.
///
/// Ordered collections keep resource dictionaries stable across runs.
#[derive(Debug, Clone, Default)]
pub struct PageResources {
    /// Base font names (e.g. "Helvetica-Bold")
    pub fonts: BTreeSet<String>,
    /// ExtGState resources by resource name
    pub ext_gstates: BTreeMap<String, ExtGStateBuilder>,
    /// Image XObjects by resource name
    pub images: BTreeMap<String, ImageData>,
}

impl PageResources {
    /// Record a font and return its resource name.
    pub fn use_font(&mut self, font: &FontInfo) -> String {
        self.fonts.insert(font.name.clone());
        font.resource_name()
    }

    /// Record a graphics state and return its resource name.
    pub fn use_ext_gstate(&mut self, state: ExtGStateBuilder) -> String {
        let name = state.resource_name();
        self.ext_gstates.entry(name.clone()).or_insert(state);
        name
    }

    /// Record an image and return its resource name (`Im1`, `Im2`, ...).
    pub fn use_image(&mut self, image: ImageData) -> String {
        let name = format!("Im{}", self.images.len() + 1);
        self.images.insert(name.clone(), image);
        name
    }
}

/// A finished page: size, content and the resources it references.
#[derive(Debug, Clone)]
pub struct PageData {
    /// Width in points
    pub width: f32,
    /// Height in points
    pub height: f32,
    /// Content stream
    pub content: ContentStreamBuilder,
    /// Resources used by the content
    pub resources: PageResources,
}

impl PageData {
    /// Create an empty page.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            content: ContentStreamBuilder::new(),
            resources: PageResources::default(),
        }
    }
}

/// PDF document writer.
///
/// Builds a complete PDF document with pages, fonts, and content.
pub struct PdfWriter {
    config: PdfWriterConfig,
    pages: Vec<PageData>,
    /// Object ID counter
    next_obj_id: u32,
}

impl PdfWriter {
    /// Create a PDF writer with `config`.
    pub fn with_config(config: PdfWriterConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
            next_obj_id: 1,
        }
    }

    /// Allocate a new object ID.
    fn alloc_obj_id(&mut self) -> u32 {
        let id = self.next_obj_id;
        self.next_obj_id += 1;
        id
    }

    /// Add a page whose content was built elsewhere.
    pub fn push_page(&mut self, page: PageData) {
        self.pages.push(page);
    }

    fn info_dictionary(&self) -> Object {
        let mut info_entries = Vec::new();
        if let Some(title) = &self.config.title {
            info_entries.push(("Title", ObjectSerializer::text_string(title)));
        }
        if let Some(author) = &self.config.author {
            info_entries.push(("Author", ObjectSerializer::text_string(author)));
        }
        if let Some(creator) = &self.config.creator {
            info_entries.push(("Creator", ObjectSerializer::text_string(creator)));
        }
        if let Some(date) = &self.config.creation_date {
            info_entries.push(("CreationDate", ObjectSerializer::string(&pdf_date(date))));
        }
        ObjectSerializer::dict(info_entries)
    }

    /// Build the complete PDF document.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let serializer = ObjectSerializer::compact();
        let mut objects: Vec<(u32, Object)> = Vec::new();

        let catalog_id = self.alloc_obj_id();
        let pages_id = self.alloc_obj_id();

        // Shared font and graphics state objects, allocated in name order
        let font_names: BTreeSet<String> = self
            .pages
            .iter()
            .flat_map(|p| p.resources.fonts.iter().cloned())
            .collect();
        let mut font_refs: BTreeMap<String, ObjectRef> = BTreeMap::new();
        for font_name in &font_names {
            let id = self.alloc_obj_id();
            objects.push((
                id,
                ObjectSerializer::dict(vec![
                    ("Type", ObjectSerializer::name("Font")),
                    ("Subtype", ObjectSerializer::name("Type1")),
                    ("BaseFont", ObjectSerializer::name(font_name)),
                    ("Encoding", ObjectSerializer::name("WinAnsiEncoding")),
                ]),
            ));
            font_refs.insert(font_name.clone(), ObjectRef::new(id, 0));
        }

        let mut gs_refs: BTreeMap<String, ObjectRef> = BTreeMap::new();
        let states: BTreeMap<String, ExtGStateBuilder> = self
            .pages
            .iter()
            .flat_map(|p| p.resources.ext_gstates.clone())
            .collect();
        for (name, state) in &states {
            let id = self.alloc_obj_id();
            objects.push((id, state.build()));
            gs_refs.insert(name.clone(), ObjectRef::new(id, 0));
        }

        let pages = std::mem::take(&mut self.pages);
        let mut page_refs: Vec<Object> = Vec::with_capacity(pages.len());

        for page_data in &pages {
            let page_id = self.alloc_obj_id();
            let content_id = self.alloc_obj_id();

            let mut xobjects: HashMap<String, Object> = HashMap::new();
            for (name, image) in &page_data.resources.images {
                let image_id = self.alloc_obj_id();
                let smask = match image.build_soft_mask() {
                    Some(mask) => {
                        let mask_id = self.alloc_obj_id();
                        objects.push((mask_id, mask));
                        Some(ObjectSerializer::reference(mask_id, 0))
                    },
                    None => None,
                };
                objects.push((image_id, image.build_xobject(smask)));
                xobjects.insert(name.clone(), ObjectSerializer::reference(image_id, 0));
            }

            let raw_content = page_data.content.build()?;
            let (content_bytes, is_compressed) = if self.config.compress {
                (compress_data(&raw_content)?, true)
            } else {
                (raw_content, false)
            };
            let mut content_dict = HashMap::new();
            if is_compressed {
                content_dict.insert("Filter".to_string(), Object::Name("FlateDecode".to_string()));
            }

            let mut resources = Vec::new();
            let page_fonts: HashMap<String, Object> = page_data
                .resources
                .fonts
                .iter()
                .filter_map(|name| {
                    font_refs.get(name).map(|r| (name.replace('-', ""), Object::Reference(*r)))
                })
                .collect();
            if !page_fonts.is_empty() {
                resources.push(("Font", Object::Dictionary(page_fonts)));
            }
            let page_states: HashMap<String, Object> = page_data
                .resources
                .ext_gstates
                .keys()
                .filter_map(|name| gs_refs.get(name).map(|r| (name.clone(), Object::Reference(*r))))
                .collect();
            if !page_states.is_empty() {
                resources.push(("ExtGState", Object::Dictionary(page_states)));
            }
            if !xobjects.is_empty() {
                resources.push(("XObject", Object::Dictionary(xobjects)));
            }

            let page_obj = ObjectSerializer::dict(vec![
                ("Type", ObjectSerializer::name("Page")),
                ("Parent", ObjectSerializer::reference(pages_id, 0)),
                (
                    "MediaBox",
                    ObjectSerializer::rect(0.0, 0.0, page_data.width as f64, page_data.height as f64),
                ),
                ("Contents", ObjectSerializer::reference(content_id, 0)),
                ("Resources", ObjectSerializer::dict(resources)),
            ]);

            page_refs.push(ObjectSerializer::reference(page_id, 0));
            objects.push((page_id, page_obj));
            objects.push((
                content_id,
                Object::Stream {
                    dict: content_dict,
                    data: bytes::Bytes::from(content_bytes),
                },
            ));
        }

        objects.push((
            pages_id,
            ObjectSerializer::dict(vec![
                ("Type", ObjectSerializer::name("Pages")),
                ("Kids", Object::Array(page_refs)),
                ("Count", ObjectSerializer::integer(pages.len() as i64)),
            ]),
        ));
        objects.push((
            catalog_id,
            ObjectSerializer::dict(vec![
                ("Type", ObjectSerializer::name("Catalog")),
                ("Pages", ObjectSerializer::reference(pages_id, 0)),
            ]),
        ));

        let info_id = self.alloc_obj_id();
        objects.push((info_id, self.info_dictionary()));

        objects.sort_by_key(|(id, _)| *id);

        let mut output = Vec::new();
        writeln!(output, "%PDF-{}", self.config.version)?;
        // Binary marker (recommended for binary content)
        output.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        let mut xref_offsets: Vec<usize> = Vec::with_capacity(objects.len());
        for (id, obj) in &objects {
            xref_offsets.push(output.len());
            output.extend_from_slice(&serializer.serialize_indirect(*id, 0, obj)?);
        }

        let xref_start = output.len();
        writeln!(output, "xref")?;
        writeln!(output, "0 {}", self.next_obj_id)?;
        // Object 0 is always free
        writeln!(output, "0000000000 65535 f ")?;
        for offset in &xref_offsets {
            writeln!(output, "{:010} 00000 n ", offset)?;
        }

        let trailer = ObjectSerializer::dict(vec![
            ("Size", ObjectSerializer::integer(self.next_obj_id as i64)),
            ("Root", ObjectSerializer::reference(catalog_id, 0)),
            ("Info", ObjectSerializer::reference(info_id, 0)),
        ]);

        writeln!(output, "trailer")?;
        output.extend_from_slice(&serializer.serialize(&trailer)?);
        writeln!(output)?;
        writeln!(output, "startxref")?;
        writeln!(output, "{}", xref_start)?;
        write!(output, "%%EOF")?;

        log::debug!(
            "Assembled PDF: {} page(s), {} object(s), {} bytes",
            pages.len(),
            objects.len(),
            output.len()
        );

        Ok(output)
    }
}
