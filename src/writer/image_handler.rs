//! Image handling for PDF generation.
//!
//! Images are embedded as Image XObjects (ISO 32000-1, Section 8.9).
//!
//! - **JPEG**: pass-through embedding using the DCTDecode filter
//! - **PNG**: decoded, pixels re-encoded with FlateDecode, alpha split into an SMask

use std::collections::HashMap;
use std::io::Write;

use crate::error::Error;
use crate::object::Object;

/// Image format for PDF embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG image (DCTDecode filter)
    Jpeg,
    /// Decoded pixels (FlateDecode filter)
    Flate,
}

/// Color space for image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Grayscale (1 component per pixel)
    DeviceGray,
    /// RGB color (3 components per pixel)
    DeviceRGB,
    /// CMYK color (4 components per pixel)
    DeviceCMYK,
}

impl ColorSpace {
    /// Get the PDF name for this color space.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceCMYK => "DeviceCMYK",
        }
    }
}

/// Image embedding error.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// Unsupported image format
    #[error("Unsupported image format")]
    UnsupportedFormat,

    /// Failed to decode image
    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    /// Failed to compress image data
    #[error("Compression error: {0}")]
    CompressionError(String),

    /// Invalid image data
    #[error("Invalid image data: {0}")]
    InvalidData(String),
}

impl From<ImageError> for Error {
    fn from(err: ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

/// Image data ready for PDF embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Bits per component (always 8 here)
    pub bits_per_component: u8,
    /// Color space
    pub color_space: ColorSpace,
    /// Encoding of `data`
    pub format: ImageFormat,
    /// Encoded image data
    pub data: Vec<u8>,
    /// Optional soft mask (alpha channel), Flate-compressed
    pub soft_mask: Option<Vec<u8>>,
}

impl ImageData {
    /// Wrap JPEG bytes without re-encoding.
    pub fn from_jpeg(data: Vec<u8>) -> Result<Self, ImageError> {
        let (width, height, color_space) = parse_jpeg_header(&data)?;

        Ok(Self {
            width,
            height,
            bits_per_component: 8,
            color_space,
            format: ImageFormat::Jpeg,
            data,
            soft_mask: None,
        })
    }

    /// Decode PNG bytes.
    pub fn from_png(data: &[u8]) -> Result<Self, ImageError> {
        use image::GenericImageView;

        let img = image::load_from_memory_with_format(data, image::ImageFormat::Png)
            .map_err(|e| ImageError::DecodeError(e.to_string()))?;

        let (width, height) = img.dimensions();
        let pixel_count = (width as usize) * (height as usize);

        let (color_space, pixels, alpha) = match img.color() {
            image::ColorType::L8 | image::ColorType::L16 => {
                (ColorSpace::DeviceGray, img.to_luma8().into_raw(), None)
            },
            image::ColorType::La8 | image::ColorType::La16 => {
                let la = img.to_luma_alpha8();
                let mut gray = Vec::with_capacity(pixel_count);
                let mut alpha_channel = Vec::with_capacity(pixel_count);
                for pixel in la.pixels() {
                    gray.push(pixel.0[0]);
                    alpha_channel.push(pixel.0[1]);
                }
                (ColorSpace::DeviceGray, gray, Some(alpha_channel))
            },
            image::ColorType::Rgba8 | image::ColorType::Rgba16 => {
                let rgba = img.to_rgba8();
                let mut rgb = Vec::with_capacity(pixel_count * 3);
                let mut alpha_channel = Vec::with_capacity(pixel_count);
                for pixel in rgba.pixels() {
                    rgb.extend_from_slice(&pixel.0[..3]);
                    alpha_channel.push(pixel.0[3]);
                }
                (ColorSpace::DeviceRGB, rgb, Some(alpha_channel))
            },
            _ => (ColorSpace::DeviceRGB, img.to_rgb8().into_raw(), None),
        };

        // Fully opaque alpha carries no information
        let alpha = alpha.filter(|a| a.iter().any(|&v| v != 0xFF));

        Ok(Self {
            width,
            height,
            bits_per_component: 8,
            color_space,
            format: ImageFormat::Flate,
            data: compress_image_data(&pixels)?,
            soft_mask: alpha.map(|a| compress_image_data(&a)).transpose()?,
        })
    }

    /// Detect the format from magic bytes and load.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ImageError> {
        if data.starts_with(&[0xFF, 0xD8]) {
            Self::from_jpeg(data.to_vec())
        } else if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            Self::from_png(data)
        } else {
            Err(ImageError::UnsupportedFormat)
        }
    }

    /// Build the Image XObject stream.
    ///
    /// `smask` is the reference to this image's soft mask object, if any.
    pub fn build_xobject(&self, smask: Option<Object>) -> Object {
        let mut dict = HashMap::new();

        dict.insert("Type".to_string(), Object::Name("XObject".to_string()));
        dict.insert("Subtype".to_string(), Object::Name("Image".to_string()));
        dict.insert("Width".to_string(), Object::Integer(self.width as i64));
        dict.insert("Height".to_string(), Object::Integer(self.height as i64));
        dict.insert(
            "ColorSpace".to_string(),
            Object::Name(self.color_space.pdf_name().to_string()),
        );
        dict.insert(
            "BitsPerComponent".to_string(),
            Object::Integer(self.bits_per_component as i64),
        );
        let filter = match self.format {
            ImageFormat::Jpeg => "DCTDecode",
            ImageFormat::Flate => "FlateDecode",
        };
        dict.insert("Filter".to_string(), Object::Name(filter.to_string()));
        if let Some(smask) = smask {
            dict.insert("SMask".to_string(), smask);
        }

        Object::Stream {
            dict,
            data: bytes::Bytes::from(self.data.clone()),
        }
    }

    /// Build the soft mask XObject stream, if the image has alpha.
    pub fn build_soft_mask(&self) -> Option<Object> {
        let mask = self.soft_mask.as_ref()?;
        let mut dict = HashMap::new();
        dict.insert("Type".to_string(), Object::Name("XObject".to_string()));
        dict.insert("Subtype".to_string(), Object::Name("Image".to_string()));
        dict.insert("Width".to_string(), Object::Integer(self.width as i64));
        dict.insert("Height".to_string(), Object::Integer(self.height as i64));
        dict.insert("ColorSpace".to_string(), Object::Name("DeviceGray".to_string()));
        dict.insert("BitsPerComponent".to_string(), Object::Integer(8));
        dict.insert("Filter".to_string(), Object::Name("FlateDecode".to_string()));

        Some(Object::Stream {
            dict,
            data: bytes::Bytes::from(mask.clone()),
        })
    }
}

/// Parse a JPEG header to get dimensions and color space.
fn parse_jpeg_header(data: &[u8]) -> Result<(u32, u32, ColorSpace), ImageError> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(ImageError::InvalidData("Not a valid JPEG".to_string()));
    }

    let mut pos = 2;
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            pos += 1;
            continue;
        }

        let marker = data[pos + 1];
        pos += 2;

        // Padding and standalone markers carry no length
        if marker == 0xFF || marker == 0x00 || (0xD0..=0xD9).contains(&marker) {
            continue;
        }

        // SOF markers (Start of Frame)
        if matches!(
            marker,
            0xC0 | 0xC1 | 0xC2 | 0xC3 | 0xC5 | 0xC6 | 0xC7 | 0xC9 | 0xCA | 0xCB | 0xCD | 0xCE | 0xCF
        ) {
            if pos + 7 >= data.len() {
                return Err(ImageError::InvalidData("Truncated JPEG header".to_string()));
            }

            let height = u16::from_be_bytes([data[pos + 3], data[pos + 4]]) as u32;
            let width = u16::from_be_bytes([data[pos + 5], data[pos + 6]]) as u32;
            let color_space = match data[pos + 7] {
                1 => ColorSpace::DeviceGray,
                4 => ColorSpace::DeviceCMYK,
                _ => ColorSpace::DeviceRGB,
            };
            return Ok((width, height, color_space));
        }

        if pos + 1 >= data.len() {
            break;
        }
        let segment_len = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
        pos += segment_len;
    }

    Err(ImageError::InvalidData("No SOF marker in JPEG".to_string()))
}

/// Compress image data with zlib for the FlateDecode filter.
fn compress_image_data(data: &[u8]) -> Result<Vec<u8>, ImageError> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| ImageError::CompressionError(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| ImageError::CompressionError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(alpha: u8) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(4, 3, image::Rgba([10, 20, 30, alpha]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageOutputFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_png_decoding() {
        let image = ImageData::from_bytes(&png_bytes(255)).unwrap();
        assert_eq!((image.width, image.height), (4, 3));
        assert_eq!(image.color_space, ColorSpace::DeviceRGB);
        assert_eq!(image.format, ImageFormat::Flate);
        assert!(image.soft_mask.is_none());
    }

    #[test]
    fn test_png_alpha_becomes_soft_mask() {
        let image = ImageData::from_png(&png_bytes(128)).unwrap();
        assert!(image.soft_mask.is_some());
        assert!(image.build_soft_mask().is_some());
    }

    #[test]
    fn test_jpeg_header() {
        // SOI, APP0 (len 4, 2 payload bytes), SOF0 for an 8x16 RGB frame
        let data = vec![
            0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00, 0xFF, 0xC0, 0x00, 0x11, 0x08, 0x00,
            0x10, 0x00, 0x08, 0x03,
        ];
        let image = ImageData::from_jpeg(data).unwrap();
        assert_eq!((image.width, image.height), (8, 16));
        assert_eq!(image.color_space, ColorSpace::DeviceRGB);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            ImageData::from_bytes(b"not an image"),
            Err(ImageError::UnsupportedFormat)
        ));
        assert!(ImageData::from_jpeg(vec![0xFF, 0xD8, 0x00, 0x00]).is_err());
    }

    #[test]
    fn test_xobject_dictionary() {
        let image = ImageData::from_png(&png_bytes(255)).unwrap();
        let xobject = image.build_xobject(None);
        let dict = xobject.as_dict().unwrap();
        assert_eq!(dict.get("Subtype").and_then(Object::as_name), Some("Image"));
        assert_eq!(dict.get("Filter").and_then(Object::as_name), Some("FlateDecode"));
        assert_eq!(dict.get("Width"), Some(&Object::Integer(4)));
    }
}
