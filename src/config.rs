//! Configuration for license rendering.
//!
//! Every field has a default, so a JSON config file only needs the keys it
//! overrides:
//!
//! ```
//! use license_press::RenderConfig;
//!
//! let config: RenderConfig = serde_json::from_str(r#"{"status_label": "PROVISIONAL"}"#)?;
//! assert_eq!(config.status_label, "PROVISIONAL");
//! assert_eq!(config.row_pitch_cm, 1.0);
//! # Ok::<(), serde_json::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::geometry::{cm, PageGeometry};
use crate::license::{inspection_block_bounds, table_bottom};
use crate::writer::{Color, FontSpec, PdfWriterConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Font per typographic role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Typography {
    /// Background watermark
    pub watermark: FontSpec,
    /// Institution name in the header
    pub institution: FontSpec,
    /// Department and legal-basis lines
    pub subtitle: FontSpec,
    /// Main document title
    pub title: FontSpec,
    /// Status pill text
    pub status: FontSpec,
    /// Field table labels
    pub label: FontSpec,
    /// Field table values
    pub value: FontSpec,
    /// Inspection block header
    pub section_header: FontSpec,
    /// Inspection block lines
    pub body: FontSpec,
    /// Signature caption
    pub caption: FontSpec,
    /// Security mark caption
    pub mark_caption: FontSpec,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            watermark: FontSpec::bold(60.0),
            institution: FontSpec::bold(20.0),
            subtitle: FontSpec::regular(10.0),
            title: FontSpec::bold(30.0),
            status: FontSpec::bold(18.0),
            label: FontSpec::bold(10.0),
            value: FontSpec::regular(12.0),
            section_header: FontSpec::bold(14.0),
            body: FontSpec::regular(12.0),
            caption: FontSpec::regular(8.0),
            mark_caption: FontSpec::bold(10.0),
        }
    }
}

/// Color per role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Outer border and title
    pub navy: Color,
    /// Field labels
    pub gray: Color,
    /// Body text, inner border, signature line, security mark
    pub black: Color,
    /// Status text
    pub red: Color,
    /// Inspection block
    pub dark_green: Color,
    /// Row separators
    pub light_gray: Color,
    /// Status pill and mark caption
    pub white: Color,
    /// Watermark text fill
    pub watermark: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            navy: Color::navy(),
            gray: Color::gray(),
            black: Color::black(),
            red: Color::red(),
            dark_green: Color::dark_green(),
            light_gray: Color::light_gray(),
            white: Color::white(),
            watermark: Color::gray_level(0.9),
        }
    }
}

/// Fixed texts printed on every license.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstitutionText {
    /// Issuing institution
    pub name: String,
    /// Issuing department
    pub department: String,
    /// Legal basis citation
    pub legal_basis: String,
    /// Main document title
    pub title: String,
    /// Background watermark
    pub watermark: String,
    /// Inspection block header
    pub inspection_header: String,
    /// Caption below the signature line
    pub signature_caption: String,
    /// Caption inside the security mark
    pub mark_caption: String,
}

impl Default for InstitutionText {
    fn default() -> Self {
        Self {
            name: "DISTRICT MUNICIPALITY OF PACASMAYO".to_string(),
            department: "Economic Development and Oversight Department".to_string(),
            legal_basis: "OPERATING LICENSE FRAMEWORK LAW No. 28976".to_string(),
            title: "OPERATING LICENSE".to_string(),
            watermark: "OFFICIAL DOCUMENT".to_string(),
            inspection_header: "TECHNICAL INSPECTION CERTIFICATE".to_string(),
            signature_caption: "Authorizing Officer".to_string(),
            mark_caption: "SCAN CODE".to_string(),
        }
    }
}

/// PDF document metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMetadata {
    /// Info dictionary title
    pub title: Option<String>,
    /// Info dictionary author
    pub author: Option<String>,
    /// Info dictionary creator
    pub creator: Option<String>,
    /// Creation date; omitted from the output when `None`
    pub creation_date: Option<DateTime<Utc>>,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            title: Some("Operating License".to_string()),
            author: None,
            creator: Some("license_press".to_string()),
            creation_date: None,
        }
    }
}

/// License rendering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Page width in centimeters
    pub page_width_cm: f32,
    /// Page height in centimeters
    pub page_height_cm: f32,
    /// Outer border inset from the page edge, in centimeters
    pub outer_inset_cm: f32,
    /// Inner border inset from the page edge, in centimeters
    pub inner_inset_cm: f32,
    /// Field table row pitch in centimeters
    pub row_pitch_cm: f32,
    /// Smallest size a long field value or centred header text may shrink to
    pub min_value_font_size: f32,
    /// Fonts per role
    pub typography: Typography,
    /// Colors per role
    pub palette: Palette,
    /// Fixed texts
    pub text: InstitutionText,
    /// Status pill label
    pub status_label: String,
    /// Office code prefixed to resolution numbers
    pub office_code: String,
    /// Municipality code suffixed to resolution numbers
    pub municipality_code: String,
    /// Watermark opacity
    pub watermark_alpha: f32,
    /// PDF metadata
    pub metadata: DocumentMetadata,
    /// Flate-compress the page content
    pub compress: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            page_width_cm: 21.0,
            page_height_cm: 29.7,
            outer_inset_cm: 1.0,
            inner_inset_cm: 1.2,
            row_pitch_cm: 1.0,
            min_value_font_size: 7.0,
            typography: Typography::default(),
            palette: Palette::default(),
            text: InstitutionText::default(),
            status_label: "DEFINITIVE".to_string(),
            office_code: "GDE".to_string(),
            municipality_code: "MDP".to_string(),
            watermark_alpha: 0.5,
            metadata: DocumentMetadata::default(),
            compress: false,
        }
    }
}

impl RenderConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON configuration file; absent keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Set the page size in centimeters.
    pub fn with_page_size_cm(mut self, width: f32, height: f32) -> Self {
        self.page_width_cm = width;
        self.page_height_cm = height;
        self
    }

    /// Set the field table row pitch in centimeters.
    pub fn with_row_pitch_cm(mut self, pitch: f32) -> Self {
        self.row_pitch_cm = pitch;
        self
    }

    /// Set the status pill label.
    pub fn with_status_label(mut self, label: impl Into<String>) -> Self {
        self.status_label = label.into();
        self
    }

    /// Set the resolution number codes.
    pub fn with_codes(mut self, office: impl Into<String>, municipality: impl Into<String>) -> Self {
        self.office_code = office.into();
        self.municipality_code = municipality.into();
        self
    }

    /// Replace the typography table.
    pub fn with_typography(mut self, typography: Typography) -> Self {
        self.typography = typography;
        self
    }

    /// Replace the palette.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Replace the fixed texts.
    pub fn with_text(mut self, text: InstitutionText) -> Self {
        self.text = text;
        self
    }

    /// Set the watermark opacity.
    pub fn with_watermark_alpha(mut self, alpha: f32) -> Self {
        self.watermark_alpha = alpha;
        self
    }

    /// Stamp the PDF with a creation date.
    pub fn with_creation_date(mut self, date: DateTime<Utc>) -> Self {
        self.metadata.creation_date = Some(date);
        self
    }

    /// Enable or disable content stream compression.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Check that the configuration describes a printable license.
    ///
    /// Page size, row pitch and minimum value font size must be positive,
    /// the watermark must be neither invisible nor opaque, and the field
    /// table must end above the inspection block. All problems are reported
    /// together as [`Error::Rendering`].
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        let page_ok = positive(self.page_width_cm) && positive(self.page_height_cm);
        if !page_ok {
            problems.push(format!(
                "page size must be positive, got {} x {} cm",
                self.page_width_cm, self.page_height_cm
            ));
        }
        if !positive(self.row_pitch_cm) {
            problems.push(format!("row_pitch_cm must be positive, got {}", self.row_pitch_cm));
        }
        if !positive(self.min_value_font_size) {
            problems.push(format!(
                "min_value_font_size must be positive, got {}",
                self.min_value_font_size
            ));
        }
        if !(self.watermark_alpha > 0.0 && self.watermark_alpha < 1.0) {
            problems.push(format!(
                "watermark_alpha must be between 0 and 1 exclusive, got {}",
                self.watermark_alpha
            ));
        }
        if page_ok && positive(self.row_pitch_cm) {
            let page = self.page_geometry();
            let bottom = table_bottom(self, page);
            let block_top = inspection_block_bounds(page).top();
            if bottom < block_top {
                problems.push(format!(
                    "field table ends at {:.1}pt, inside the inspection block starting at {:.1}pt; reduce row_pitch_cm",
                    bottom, block_top
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::Rendering(format!("invalid configuration: {}", problems.join("; "))))
        }
    }

    /// Page size in points.
    pub fn page_geometry(&self) -> PageGeometry {
        PageGeometry::from_cm(self.page_width_cm, self.page_height_cm)
    }

    /// Row pitch in points.
    pub fn row_pitch(&self) -> f32 {
        cm(self.row_pitch_cm)
    }

    /// Writer settings derived from the metadata and compress flag.
    pub fn writer_config(&self) -> PdfWriterConfig {
        PdfWriterConfig {
            title: self.metadata.title.clone(),
            author: self.metadata.author.clone(),
            creator: self.metadata.creator.clone(),
            creation_date: self.metadata.creation_date,
            compress: self.compress,
            ..PdfWriterConfig::default()
        }
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
