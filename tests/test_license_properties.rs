//! Property tests for derived values and table layout.

use license_press::geometry::cm;
use license_press::license::{
    capacity, inspection_block_bounds, layout_rows, table_bottom, DerivedFields, FixedNumbers,
    LicenseRecord, LicenseRenderer, SQUARE_METERS_PER_PERSON,
};
use license_press::writer::Primitive;
use license_press::{Error, RenderConfig};
use proptest::prelude::*;

fn record_with_area(area: f64) -> LicenseRecord {
    LicenseRecord {
        file_number: "EXP-0001".to_string(),
        owner_name: "ACME".to_string(),
        trade_name: "ACME SHOP".to_string(),
        address: "MAIN ST 1".to_string(),
        business_activity: "RETAIL".to_string(),
        zoning: "COMMERCIAL".to_string(),
        area_square_meters: area,
        inspection_expiry_date: "12/12/2026".to_string(),
        ..Default::default()
    }
}

proptest! {
    #[test]
    fn capacity_is_floor_of_area_per_person(area in 0.01f64..1_000_000.0) {
        let persons = capacity(area).unwrap();
        prop_assert_eq!(persons, (area / SQUARE_METERS_PER_PERSON).floor() as u64);
        prop_assert!(persons as f64 * SQUARE_METERS_PER_PERSON <= area);
    }

    #[test]
    fn non_positive_area_is_rejected(area in -1_000_000.0f64..=0.0) {
        prop_assert!(matches!(capacity(area), Err(Error::InvalidRecord(_))));

        let result = LicenseRenderer::new(RenderConfig::default())
            .with_numbers(FixedNumbers::new(482, 5531, 2025))
            .render(&record_with_area(area));
        prop_assert!(matches!(result, Err(Error::InvalidRecord(_))));
    }

    #[test]
    fn rows_step_down_by_configured_pitch(pitch_cm in 0.5f32..1.5) {
        let config = RenderConfig::default().with_row_pitch_cm(pitch_cm);
        let record = record_with_area(120.0);
        let derived = DerivedFields::compute(&record, &FixedNumbers::new(482, 5531, 2025), &config).unwrap();
        let rows = layout_rows(&record, &derived, &config, config.page_geometry());

        prop_assert_eq!(rows.len(), 10);
        for pair in rows.windows(2) {
            prop_assert!((pair[0].y - pair[1].y - cm(pitch_cm)).abs() < 1e-3);
        }
    }

    #[test]
    fn fixed_numbers_give_identical_documents(
        resolution in 100u32..=999,
        certificate in 1000u32..=9999,
    ) {
        let renderer = LicenseRenderer::new(RenderConfig::default())
            .with_numbers(FixedNumbers::new(resolution, certificate, 2025));
        let first = renderer.render(&record_with_area(120.0)).unwrap();
        let second = renderer.render(&record_with_area(120.0)).unwrap();
        prop_assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn table_never_overlaps_inspection_block(pitch_cm in 0.1f32..3.0) {
        let config = RenderConfig::default().with_row_pitch_cm(pitch_cm);
        let page = config.page_geometry();
        let block_top = inspection_block_bounds(page).top();
        let result = LicenseRenderer::new(config.clone())
            .with_numbers(FixedNumbers::new(482, 5531, 2025))
            .render_detailed(&record_with_area(120.0));

        if table_bottom(&config, page) < block_top {
            prop_assert!(matches!(result, Err(Error::Rendering(_))));
        } else {
            let rendered = result.unwrap();
            let lowest_separator = rendered
                .primitives
                .iter()
                .filter_map(|p| match p {
                    // Table separators lie between the footer and the divider
                    Primitive::Line { from, to, .. }
                        if from.y == to.y && from.y > cm(6.0) && from.y < cm(20.2) =>
                    {
                        Some(from.y)
                    },
                    _ => None,
                })
                .fold(f32::INFINITY, f32::min);
            prop_assert!(lowest_separator >= block_top - 1e-3);
        }
    }
}
