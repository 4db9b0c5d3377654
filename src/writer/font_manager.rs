//! Font management for PDF generation.
//!
//! Provides metrics for the PDF Base-14 fonts so that text can be measured
//! (and therefore centred) without embedding font programs, plus the
//! WinAnsiEncoding used to write text into content streams.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A font face and size, e.g. `Helvetica-Bold` at 20 pt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    /// Base-14 font name
    pub name: String,
    /// Size in points
    pub size: f32,
}

impl FontSpec {
    /// Create a font spec.
    pub fn new(name: impl Into<String>, size: f32) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    /// Helvetica at `size`.
    pub fn regular(size: f32) -> Self {
        Self::new("Helvetica", size)
    }

    /// Helvetica-Bold at `size`.
    pub fn bold(size: f32) -> Self {
        Self::new("Helvetica-Bold", size)
    }

    /// Same face at another size.
    pub fn with_size(&self, size: f32) -> Self {
        Self::new(self.name.clone(), size)
    }
}

/// Font family grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFamily {
    /// Helvetica (sans-serif)
    Helvetica,
    /// Times (serif)
    Times,
    /// Courier (monospace)
    Courier,
}

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    /// Regular weight
    Normal,
    /// Bold weight
    Bold,
}

/// Metrics and identity of one registered font.
#[derive(Debug, Clone)]
pub struct FontInfo {
    /// PostScript name (e.g. "Helvetica-Bold")
    pub name: String,
    /// Family
    pub family: FontFamily,
    /// Weight
    pub weight: FontWeight,
    /// Whether the face is oblique
    pub italic: bool,
}

impl FontInfo {
    fn base14(name: &str, family: FontFamily, weight: FontWeight, italic: bool) -> Self {
        Self {
            name: name.to_string(),
            family,
            weight,
            italic,
        }
    }

    /// Width of one WinAnsi byte in 1/1000 text space units.
    pub fn glyph_width(&self, byte: u8) -> u16 {
        match self.family {
            FontFamily::Courier => 600,
            FontFamily::Helvetica => {
                let table = match self.weight {
                    FontWeight::Normal => &HELVETICA_WIDTHS,
                    FontWeight::Bold => &HELVETICA_BOLD_WIDTHS,
                };
                helvetica_width(table, self.weight, byte)
            },
            FontFamily::Times => {
                let table = match self.weight {
                    FontWeight::Normal => &TIMES_ROMAN_WIDTHS,
                    FontWeight::Bold => &TIMES_BOLD_WIDTHS,
                };
                times_width(table, self.weight, byte)
            },
        }
    }

    /// Width of already-encoded text at `font_size`.
    pub fn encoded_width(&self, bytes: &[u8], font_size: f32) -> f32 {
        let units: u32 = bytes.iter().map(|&b| self.glyph_width(b) as u32).sum();
        units as f32 * font_size / 1000.0
    }

    /// Width of `text` at `font_size`.
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let (bytes, _) = encode_win_ansi(text);
        self.encoded_width(&bytes, font_size)
    }

    /// Name used for this font in a page's /Font resource dictionary.
    pub fn resource_name(&self) -> String {
        self.name.replace('-', "")
    }
}

/// Font manager for PDF generation.
///
/// Knows the Base-14 faces whose metrics are bundled with the crate.
#[derive(Debug, Clone)]
pub struct FontManager {
    /// Registered fonts (name -> font info)
    fonts: HashMap<String, FontInfo>,
}

impl FontManager {
    /// Create a new font manager with the supported Base-14 fonts.
    pub fn new() -> Self {
        let mut manager = Self {
            fonts: HashMap::new(),
        };
        manager.register_base14_fonts();
        manager
    }

    fn register_base14_fonts(&mut self) {
        use FontFamily::*;
        use FontWeight::*;

        for info in [
            FontInfo::base14("Helvetica", Helvetica, Normal, false),
            FontInfo::base14("Helvetica-Bold", Helvetica, Bold, false),
            FontInfo::base14("Helvetica-Oblique", Helvetica, Normal, true),
            FontInfo::base14("Helvetica-BoldOblique", Helvetica, Bold, true),
            FontInfo::base14("Times-Roman", Times, Normal, false),
            FontInfo::base14("Times-Bold", Times, Bold, false),
            FontInfo::base14("Courier", Courier, Normal, false),
            FontInfo::base14("Courier-Bold", Courier, Bold, false),
            FontInfo::base14("Courier-Oblique", Courier, Normal, true),
            FontInfo::base14("Courier-BoldOblique", Courier, Bold, true),
        ] {
            self.fonts.insert(info.name.clone(), info);
        }
    }

    /// Get font info by name.
    pub fn get_font(&self, name: &str) -> Option<&FontInfo> {
        self.fonts.get(name)
    }

    /// Get font info by name, failing for faces without bundled metrics.
    pub fn require(&self, name: &str) -> Result<&FontInfo> {
        self.get_font(name)
            .ok_or_else(|| Error::Font(format!("unsupported font '{}'", name)))
    }

    /// Width of `text` set in `font`.
    pub fn text_width(&self, text: &str, font: &FontSpec) -> Result<f32> {
        Ok(self.require(&font.name)?.text_width(text, font.size))
    }

    /// Largest size not above `font.size` at which `text` fits in
    /// `max_width`.
    ///
    /// `None` when the text would have to be set below `min_size`.
    pub fn fit_size(&self, text: &str, font: &FontSpec, max_width: f32, min_size: f32) -> Result<Option<f32>> {
        let width = self.text_width(text, font)?;
        if width <= max_width {
            return Ok(Some(font.size));
        }
        let scaled = font.size * max_width / width;
        if scaled < min_size {
            return Ok(None);
        }
        Ok(Some(scaled))
    }
}

impl Default for FontManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode text as WinAnsiEncoding bytes.
///
/// Returns the bytes and the number of characters that had no WinAnsi code
/// and were replaced by `?`.
pub fn encode_win_ansi(text: &str) -> (Vec<u8>, usize) {
    let mut out = Vec::with_capacity(text.len());
    let mut replaced = 0;

    for ch in text.chars() {
        match win_ansi_byte(ch) {
            Some(b) => out.push(b),
            None => {
                out.push(b'?');
                replaced += 1;
            },
        }
    }

    (out, replaced)
}

fn win_ansi_byte(ch: char) -> Option<u8> {
    let code = ch as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
        _ => {
            let byte = match ch {
                '€' => 0x80,
                '‚' => 0x82,
                'ƒ' => 0x83,
                '„' => 0x84,
                '…' => 0x85,
                '†' => 0x86,
                '‡' => 0x87,
                'ˆ' => 0x88,
                '‰' => 0x89,
                'Š' => 0x8A,
                '‹' => 0x8B,
                'Œ' => 0x8C,
                'Ž' => 0x8E,
                '‘' => 0x91,
                '’' => 0x92,
                '“' => 0x93,
                '”' => 0x94,
                '•' => 0x95,
                '–' => 0x96,
                '—' => 0x97,
                '˜' => 0x98,
                '™' => 0x99,
                'š' => 0x9A,
                '›' => 0x9B,
                'œ' => 0x9C,
                'ž' => 0x9E,
                'Ÿ' => 0x9F,
                _ => return None,
            };
            Some(byte)
        },
    }
}

/// Helvetica widths for bytes 0x20..=0x7E (AFM, 1/1000 em).
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 0x20
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0x30
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // 0x40
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 0x50
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // 0x60
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 0x70
];

/// Helvetica-Bold widths for bytes 0x20..=0x7E (AFM, 1/1000 em).
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // 0x20
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0x30
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // 0x40
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 0x50
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // 0x60
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 0x70
];

fn helvetica_width(table: &[u16; 95], weight: FontWeight, byte: u8) -> u16 {
    match byte {
        0x20..=0x7E => table[(byte - 0x20) as usize],
        // Accented Latin-1 letters share the width of their base letter
        _ => match latin1_base_letter(byte) {
            Some(base) => table[(base - 0x20) as usize],
            None => match (byte, weight) {
                (0xA0, _) => 278,
                (0xB0, _) => 400,
                (0xB2 | 0xB3 | 0xB9, _) => 333,
                (0xBA, _) => 365,
                (0xAA, _) => 370,
                (0x96, _) => 556,
                (0x97, _) => 1000,
                (0x91 | 0x92, FontWeight::Normal) => 222,
                (0x91 | 0x92, FontWeight::Bold) => 278,
                (0x93 | 0x94, _) => 333,
                _ => 556,
            },
        },
    }
}

/// Times-Roman widths for bytes 0x20..=0x7E (AFM, 1/1000 em).
const TIMES_ROMAN_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278, // 0x20
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444, // 0x30
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722, // 0x40
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500, // 0x50
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500, // 0x60
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541, // 0x70
];

/// Times-Bold widths for bytes 0x20..=0x7E (AFM, 1/1000 em).
const TIMES_BOLD_WIDTHS: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278, // 0x20
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500, // 0x30
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778, // 0x40
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500, // 0x50
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500, // 0x60
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520, // 0x70
];

fn times_width(table: &[u16; 95], weight: FontWeight, byte: u8) -> u16 {
    match byte {
        0x20..=0x7E => table[(byte - 0x20) as usize],
        _ => match latin1_base_letter(byte) {
            Some(base) => table[(base - 0x20) as usize],
            None => match (byte, weight) {
                (0xA0, _) => 250,
                (0xB0, _) => 400,
                (0xB2 | 0xB3 | 0xB9, _) => 300,
                (0xAA, FontWeight::Normal) => 276,
                (0xAA, FontWeight::Bold) => 300,
                (0xBA, FontWeight::Normal) => 310,
                (0xBA, FontWeight::Bold) => 330,
                (0x96, _) => 500,
                (0x97, _) => 1000,
                (0x91 | 0x92, _) => 333,
                (0x93 | 0x94, FontWeight::Normal) => 444,
                (0x93 | 0x94, FontWeight::Bold) => 500,
                _ => 500,
            },
        },
    }
}

fn latin1_base_letter(byte: u8) -> Option<u8> {
    let base = match byte {
        0xC0..=0xC5 => b'A',
        0xC7 => b'C',
        0xC8..=0xCB => b'E',
        0xCC..=0xCF => b'I',
        0xD1 => b'N',
        0xD2..=0xD6 | 0xD8 => b'O',
        0xD9..=0xDC => b'U',
        0xDD => b'Y',
        0xE0..=0xE5 => b'a',
        0xE7 => b'c',
        0xE8..=0xEB => b'e',
        0xEC..=0xEF => b'i',
        0xF1 => b'n',
        0xF2..=0xF6 | 0xF8 => b'o',
        0xF9..=0xFC => b'u',
        0xFD | 0xFF => b'y',
        _ => return None,
    };
    Some(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helvetica_width() {
        let fonts = FontManager::new();
        // "Hi" = H(722) + i(222) = 944 units
        let w = fonts.text_width("Hi", &FontSpec::regular(10.0)).unwrap();
        assert!((w - 9.44).abs() < 1e-4);
    }

    #[test]
    fn test_bold_is_wider() {
        let fonts = FontManager::new();
        let regular = fonts.text_width("OPERATING LICENSE", &FontSpec::regular(30.0)).unwrap();
        let bold = fonts.text_width("OPERATING LICENSE", &FontSpec::bold(30.0)).unwrap();
        assert!(bold > regular);
    }

    #[test]
    fn test_times_widths() {
        let fonts = FontManager::new();
        // "Hi" = H(722) + i(278) = 1000 units in Times-Roman
        let w = fonts.text_width("Hi", &FontSpec::new("Times-Roman", 10.0)).unwrap();
        assert!((w - 10.0).abs() < 1e-4);
        // "W" is 1000 units in Times-Bold
        let w = fonts.text_width("W", &FontSpec::new("Times-Bold", 12.0)).unwrap();
        assert!((w - 12.0).abs() < 1e-4);
        assert!(fonts.require("Times-Italic").is_err());
    }

    #[test]
    fn test_courier_is_monospaced() {
        let fonts = FontManager::new();
        let w = fonts.text_width("iiii", &FontSpec::new("Courier", 10.0)).unwrap();
        assert!((w - 24.0).abs() < 1e-4);
    }

    #[test]
    fn test_accented_letters_use_base_width() {
        let info = FontManager::new().get_font("Helvetica").cloned().unwrap();
        assert_eq!(info.text_width("É", 10.0), info.text_width("E", 10.0));
    }

    #[test]
    fn test_unknown_font_is_an_error() {
        let fonts = FontManager::new();
        let err = fonts.text_width("x", &FontSpec::new("Comic Sans", 12.0)).unwrap_err();
        assert!(matches!(err, Error::Font(_)));
    }

    #[test]
    fn test_win_ansi_encoding() {
        let (bytes, replaced) = encode_win_ansi("120 m²");
        assert_eq!(bytes, b"120 m\xB2".to_vec());
        assert_eq!(replaced, 0);

        let (bytes, replaced) = encode_win_ansi("a€b");
        assert_eq!(bytes, vec![b'a', 0x80, b'b']);
        assert_eq!(replaced, 0);

        let (bytes, replaced) = encode_win_ansi("日本");
        assert_eq!(bytes, b"??".to_vec());
        assert_eq!(replaced, 2);
    }

    #[test]
    fn test_fit_size_shrinks_long_text() {
        let fonts = FontManager::new();
        let font = FontSpec::regular(12.0);
        assert_eq!(fonts.fit_size("short", &font, 500.0, 7.0).unwrap(), Some(12.0));

        let long = "A".repeat(40);
        let size = fonts.fit_size(&long, &font, 250.0, 7.0).unwrap().unwrap();
        assert!(size < 12.0 && size >= 7.0);
        assert!(fonts.text_width(&long, &font.with_size(size)).unwrap() <= 250.0 + 1e-3);
    }

    #[test]
    fn test_fit_size_gives_up_below_minimum() {
        let fonts = FontManager::new();
        let font = FontSpec::regular(12.0);
        // 100 x 667 units at 7 pt is about 467 pt
        assert_eq!(fonts.fit_size(&"A".repeat(100), &font, 300.0, 7.0).unwrap(), None);
        assert_eq!(fonts.fit_size("x", &font, 0.0, 7.0).unwrap(), None);
    }

    #[test]
    fn test_resource_name() {
        let info = FontManager::new().get_font("Helvetica-Bold").cloned().unwrap();
        assert_eq!(info.resource_name(), "HelveticaBold");
    }
}
