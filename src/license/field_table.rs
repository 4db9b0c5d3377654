//! Field table: the ordered label/value rows of the license.
//!
//! Layout and drawing are separate steps. [`layout_rows`] is pure and fixes
//! the row order and baselines; [`render_field_table`] only draws them.

use super::numbers::{format_area, DerivedFields};
use super::record::LicenseRecord;
use crate::config::RenderConfig;
use crate::error::{Error, Result, ValidationError, ValidationErrors};
use crate::geometry::{cm, PageGeometry, Point};
use crate::writer::{DrawingSurface, FontSpec};

/// Labels in print order.
pub const ROW_LABELS: [&str; 10] = [
    "FILE NUMBER:",
    "RESOLUTION:",
    "OWNER NAME:",
    "TAX ID:",
    "TRADE NAME:",
    "ADDRESS:",
    "BUSINESS ACTIVITY:",
    "ZONING:",
    "TOTAL AREA:",
    "CAPACITY:",
];

/// Record field behind each row, in the same order as [`ROW_LABELS`].
pub const ROW_FIELDS: [&str; 10] = [
    "file_number",
    "resolution",
    "owner_name",
    "tax_id",
    "trade_name",
    "address",
    "business_activity",
    "zoning",
    "area_square_meters",
    "capacity",
];

/// Distance from the top edge to the first row's baseline.
const TABLE_TOP_CM: f32 = 9.5;
const LABEL_X_CM: f32 = 2.5;
const VALUE_X_CM: f32 = 8.0;
/// Distance from the right edge where separators and values stop.
const RIGHT_MARGIN_CM: f32 = 2.5;
/// Separator offset below the baseline.
const SEPARATOR_DROP_CM: f32 = 0.2;
const SEPARATOR_WIDTH: f32 = 0.5;

/// One laid-out row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// Label text
    pub label: &'static str,
    /// Record field the value comes from
    pub field: &'static str,
    /// Value text
    pub value: String,
    /// Baseline in page units
    pub y: f32,
}

/// Lay out the rows of `record`.
///
/// Baselines start at a fixed offset from the top and step down by exactly
/// the configured row pitch.
pub fn layout_rows(
    record: &LicenseRecord,
    derived: &DerivedFields,
    config: &RenderConfig,
    page: PageGeometry,
) -> Vec<TableRow> {
    let values = [
        record.file_number.clone(),
        derived.resolution.clone(),
        record.owner_name.clone(),
        record.tax_id_display().to_string(),
        record.trade_name.clone(),
        record.address.clone(),
        record.business_activity.clone(),
        record.zoning.clone(),
        format_area(record.area_square_meters),
        format!("{} Persons (Occupancy)", derived.capacity),
    ];

    let top = page.from_top(cm(TABLE_TOP_CM));
    let pitch = config.row_pitch();
    ROW_LABELS
        .into_iter()
        .zip(ROW_FIELDS)
        .zip(values)
        .enumerate()
        .map(|(i, ((label, field), value))| TableRow {
            label,
            field,
            value,
            y: top - pitch * i as f32,
        })
        .collect()
}

/// Baseline of the last row's separator, the lowest point the table reaches.
pub fn table_bottom(config: &RenderConfig, page: PageGeometry) -> f32 {
    page.from_top(cm(TABLE_TOP_CM)) - config.row_pitch() * (ROW_LABELS.len() - 1) as f32 - cm(SEPARATOR_DROP_CM)
}

/// Font for each row's value, shrunk to fit between the value column and
/// the right margin.
///
/// Fails with [`Error::InvalidRecord`] naming every field whose value does
/// not fit even at `config.min_value_font_size`.
pub fn fit_values(surface: &DrawingSurface, rows: &[TableRow], config: &RenderConfig) -> Result<Vec<FontSpec>> {
    let available = value_column_width(surface.geometry());
    let mut fonts = Vec::with_capacity(rows.len());
    let mut errors = ValidationErrors::new();

    for row in rows {
        match surface.fit_font(&row.value, &config.typography.value, available, config.min_value_font_size)? {
            Some(font) => fonts.push(font),
            None => {
                let width = surface.text_width(&row.value, &config.typography.value.with_size(config.min_value_font_size))?;
                errors.add(ValidationError::new(
                    row.field,
                    format!(
                        "too long to print: {:.1}pt wide at {}pt, {:.1}pt available",
                        width, config.min_value_font_size, available
                    ),
                ));
            },
        }
    }

    errors.into_result()?;
    Ok(fonts)
}

fn value_column_width(page: PageGeometry) -> f32 {
    page.width - cm(RIGHT_MARGIN_CM) - cm(VALUE_X_CM)
}

/// Draw laid-out rows with their separators.
///
/// Values are fitted with [`fit_values`] before anything is drawn, so a
/// value that cannot fit leaves the surface untouched.
pub fn render_field_table(surface: &mut DrawingSurface, rows: &[TableRow], config: &RenderConfig) -> Result<()> {
    let value_fonts = fit_values(surface, rows, config)?;
    let page = surface.geometry();
    let palette = &config.palette;
    let label_x = cm(LABEL_X_CM);
    let value_x = cm(VALUE_X_CM);
    let right = page.width - cm(RIGHT_MARGIN_CM);

    for (row, value_font) in rows.iter().zip(&value_fonts) {
        surface.draw_left_text(label_x, row.y, row.label, &config.typography.label, palette.gray)?;

        if value_font.size < config.typography.value.size {
            log::debug!("Shrinking {} value to {:.1}pt", row.label, value_font.size);
        }
        surface.draw_left_text(value_x, row.y, &row.value, value_font, palette.black)?;

        let separator_y = row.y - cm(SEPARATOR_DROP_CM);
        surface.draw_line(
            Point::new(label_x, separator_y),
            Point::new(right, separator_y),
            palette.light_gray,
            SEPARATOR_WIDTH,
        )?;
    }

    log::debug!("Field table drawn: {} row(s)", rows.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::numbers::FixedNumbers;
    use crate::writer::Primitive;

    fn record() -> LicenseRecord {
        LicenseRecord {
            file_number: "EXP-0001".to_string(),
            owner_name: "ACME".to_string(),
            tax_id: None,
            trade_name: "ACME SHOP".to_string(),
            address: "MAIN ST 1".to_string(),
            business_activity: "RETAIL".to_string(),
            zoning: "COMMERCIAL".to_string(),
            area_square_meters: 120.0,
            inspection_expiry_date: "12/12/2026".to_string(),
            risk_level: None,
        }
    }

    fn rows(record: &LicenseRecord, config: &RenderConfig) -> Vec<TableRow> {
        let derived = DerivedFields::compute(record, &FixedNumbers::new(123, 4567, 2025), config).unwrap();
        layout_rows(record, &derived, config, config.page_geometry())
    }

    #[test]
    fn test_row_order_and_values() {
        let rows = rows(&record(), &RenderConfig::default());
        let labels: Vec<&str> = rows.iter().map(|r| r.label).collect();
        assert_eq!(labels, ROW_LABELS.to_vec());
        assert_eq!(rows[5].field, "address");
        assert_eq!(rows[1].value, "GDE-123-2025/MDP");
        assert_eq!(rows[3].value, "Not registered");
        assert_eq!(rows[8].value, "120 m²");
        assert_eq!(rows[9].value, "80 Persons (Occupancy)");
    }

    #[test]
    fn test_rows_step_by_pitch() {
        let config = RenderConfig::default().with_row_pitch_cm(0.8);
        let rows = rows(&record(), &config);
        assert!((rows[0].y - config.page_geometry().from_top(cm(9.5))).abs() < 1e-3);
        for pair in rows.windows(2) {
            assert!(((pair[0].y - pair[1].y) - cm(0.8)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_long_value_shrinks_within_margin() {
        let config = RenderConfig::default();
        let long = LicenseRecord {
            address: "AVENIDA DE LOS HEROES DEL PACIFICO 1234, URBANIZACION LAS FLORES".to_string(),
            ..record()
        };
        let rows = rows(&long, &config);
        let mut surface = DrawingSurface::new(config.page_geometry(), config.writer_config());
        render_field_table(&mut surface, &rows, &config).unwrap();

        let right = surface.geometry().width - cm(2.5);
        for prim in surface.primitives() {
            if let Primitive::Text { text, origin, font, .. } = prim {
                if text.starts_with("AVENIDA") {
                    assert!(font.size < 12.0);
                    assert!(font.size >= config.min_value_font_size);
                    let width = surface.text_width(text, font).unwrap();
                    assert!(origin.x + width <= right + 0.01);
                }
            }
        }
    }

    #[test]
    fn test_value_too_long_at_minimum_size_is_rejected() {
        let config = RenderConfig::default();
        let long = LicenseRecord {
            address: "AVENIDA ".repeat(20),
            trade_name: "BODEGA ".repeat(30),
            ..record()
        };
        let rows = rows(&long, &config);
        let mut surface = DrawingSurface::new(config.page_geometry(), config.writer_config());

        match render_field_table(&mut surface, &rows, &config) {
            Err(Error::InvalidRecord(errors)) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.has_field("address"));
                assert!(errors.has_field("trade_name"));
            },
            other => panic!("expected InvalidRecord, got {:?}", other),
        }
        assert!(surface.primitives().is_empty());
    }

    #[test]
    fn test_table_bottom_tracks_pitch() {
        let page = RenderConfig::default().page_geometry();
        let tight = table_bottom(&RenderConfig::default().with_row_pitch_cm(0.5), page);
        let loose = table_bottom(&RenderConfig::default().with_row_pitch_cm(1.0), page);
        assert!((tight - loose - cm(4.5)).abs() < 1e-2);
        assert!((loose - cm(29.7 - 9.5 - 9.0 - 0.2)).abs() < 1e-2);
    }

    #[test]
    fn test_each_row_has_label_value_separator() {
        let config = RenderConfig::default();
        let rows = rows(&record(), &config);
        let mut surface = DrawingSurface::new(config.page_geometry(), config.writer_config());
        render_field_table(&mut surface, &rows, &config).unwrap();
        let prims = surface.primitives();
        assert_eq!(prims.len(), 30);
        match &prims[2] {
            Primitive::Line { from, to, width, .. } => {
                assert_eq!(from.y, to.y);
                assert!((from.y - (rows[0].y - cm(0.2))).abs() < 1e-3);
                assert_eq!(*width, 0.5);
            },
            other => panic!("unexpected primitive {:?}", other),
        }
    }
}
