// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::len_without_is_empty)]

//! # License Press
//!
//! Renders municipal operating-license certificates as single-page PDFs
//! with security features: a rotated translucent watermark, a double
//! border, a fixed-order field table, a highlighted inspection certificate
//! block, a signature line and a reserved security-mark area.
//!
//! ## Pipeline
//!
//! ```text
//! LicenseRecord + RenderConfig
//!     ↓ validate, derive numbers and capacity
//! [DrawingSurface]
//!     ↓ watermark → frame → field table → inspection block → footer
//! [PdfWriter]
//!     ↓
//! Document (PDF bytes)
//! ```
//!
//! Given the same record, configuration and injected numbers, the output is
//! byte-for-byte identical. Separate renders share no state and may run on
//! separate threads.
//!
//! ## Quick Start
//!
//! ```
//! use license_press::license::{FixedNumbers, LicenseRecord, LicenseRenderer};
//! use license_press::RenderConfig;
//!
//! # fn main() -> license_press::Result<()> {
//! let record: LicenseRecord = serde_json::from_str(r#"{
//!     "file_number": "EXP-0001",
//!     "owner_name": "ACME",
//!     "trade_name": "ACME SHOP",
//!     "address": "MAIN ST 1",
//!     "business_activity": "RETAIL",
//!     "zoning": "COMMERCIAL",
//!     "area_square_meters": 120,
//!     "inspection_expiry_date": "12/12/2026"
//! }"#)?;
//!
//! let renderer = LicenseRenderer::new(RenderConfig::default())
//!     .with_numbers(FixedNumbers::new(482, 5531, 2025));
//! let document = renderer.render(&record)?;
//! assert!(document.as_bytes().starts_with(b"%PDF-1.7"));
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 (<http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license (<http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Page geometry
pub mod geometry;

// PDF objects and writing
pub mod object;
pub mod writer;

// License rendering
pub mod license;

// Event notifications
pub mod notify;

pub use config::RenderConfig;
pub use error::{Error, Result, ValidationError, ValidationErrors};
pub use license::{render, Document, LicenseRecord, LicenseRenderer};
