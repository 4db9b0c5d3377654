//! Operating license rendering.
//!
//! ```
//! use license_press::license::{FixedNumbers, LicenseRecord, LicenseRenderer};
//! use license_press::RenderConfig;
//!
//! let record = LicenseRecord {
//!     file_number: "EXP-0001".into(),
//!     owner_name: "ACME".into(),
//!     trade_name: "ACME SHOP".into(),
//!     address: "MAIN ST 1".into(),
//!     business_activity: "RETAIL".into(),
//!     zoning: "COMMERCIAL".into(),
//!     area_square_meters: 120.0,
//!     inspection_expiry_date: "12/12/2026".into(),
//!     ..Default::default()
//! };
//!
//! let renderer = LicenseRenderer::new(RenderConfig::default())
//!     .with_numbers(FixedNumbers::new(482, 5531, 2025));
//! let document = renderer.render(&record)?;
//! assert_eq!(document.file_name(), "license-exp-0001.pdf");
//! # Ok::<(), license_press::Error>(())
//! ```

mod assembler;
mod assets;
mod field_table;
mod footer;
mod frame;
mod inspection;
mod numbers;
mod record;
mod watermark;

pub use assembler::{render, sanitize_file_stem, Document, LicenseRenderer, RenderedLicense};
pub use assets::{AssetLoader, AssetSlot, FileAssetLoader, NoAssets, RenderAssets, ResolvedAssets};
pub use field_table::{fit_values, layout_rows, render_field_table, table_bottom, TableRow, ROW_FIELDS, ROW_LABELS};
pub use footer::{render_footer, security_mark_area, PlaceholderMark, SecurityMark};
pub use frame::render_frame;
pub use inspection::{certificate_line, inspection_block_bounds, render_inspection_block, validity_line};
pub use numbers::{
    capacity, format_area, DerivedFields, FixedNumbers, NumberSource, RandomNumbers, CERTIFICATE_RANGE,
    RESOLUTION_RANGE, SQUARE_METERS_PER_PERSON,
};
pub use record::{LicenseRecord, DEFAULT_RISK_LEVEL, TAX_ID_PLACEHOLDER};
pub use watermark::{render_watermark, WATERMARK_ANGLE};
