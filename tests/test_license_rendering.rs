//! End-to-end tests for license rendering.
//!
//! Content streams are uncompressed by default, so most checks look for
//! operators and text directly in the PDF bytes.

use chrono::{TimeZone, Utc};
use license_press::geometry::cm;
use license_press::license::{
    FileAssetLoader, FixedNumbers, LicenseRecord, LicenseRenderer, RenderAssets, ROW_LABELS,
};
use license_press::writer::Primitive;
use license_press::{render, Error, RenderConfig};
use regex::Regex;
use std::io::{Cursor, Read};
use std::sync::Arc;

fn scenario_record() -> LicenseRecord {
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

fn fixed_renderer() -> LicenseRenderer {
    LicenseRenderer::new(RenderConfig::default()).with_numbers(FixedNumbers::new(482, 5531, 2025))
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

fn create_test_png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([0, 0, 128, 200]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageOutputFormat::Png)
        .unwrap();
    buf
}

#[test]
fn test_end_to_end_scenario() {
    let document = fixed_renderer().render(&scenario_record()).unwrap();
    let bytes = document.as_bytes();

    assert!(bytes.starts_with(b"%PDF-1.7"));
    assert!(bytes.ends_with(b"%%EOF"));
    assert!(contains(bytes, b"(Not registered) Tj"));
    assert!(contains(bytes, b"(80 Persons \\(Occupancy\\)) Tj"));
    assert!(contains(bytes, b"Risk: EVALUATED) Tj"));
    assert!(contains(bytes, b"(DEFINITIVE) Tj"));
    assert!(contains(bytes, b"(GDE-482-2025/MDP) Tj"));
    assert!(contains(bytes, b"(Certificate No. 5531  -  Risk: EVALUATED) Tj"));
    assert!(contains(bytes, b"(VALID UNTIL: 12/12/2026) Tj"));
    // m² in WinAnsiEncoding
    assert!(contains(bytes, b"(120 m\xB2) Tj"));
    assert_eq!(document.file_name(), "license-exp-0001.pdf");
}

#[test]
fn test_single_page_with_base14_fonts() {
    let document = fixed_renderer().render(&scenario_record()).unwrap();
    let text = String::from_utf8_lossy(document.as_bytes());

    assert!(text.contains("/Count 1"));
    assert_eq!(text.matches("/Type /Page/").count() + text.matches("/Type /Page>>").count(), 1);
    assert!(text.contains("/BaseFont /Helvetica-Bold"));
    assert!(text.contains("/BaseFont /Helvetica/"));
    assert!(text.contains("/Encoding /WinAnsiEncoding"));
    let media_box = Regex::new(r"/MediaBox \[0 0 595\.27\d* 841\.89\d*\]").unwrap();
    assert!(media_box.is_match(&text));
}

#[test]
fn test_same_inputs_same_bytes() {
    let a = fixed_renderer().render(&scenario_record()).unwrap();
    let b = fixed_renderer().render(&scenario_record()).unwrap();
    assert_eq!(a, b);

    let other = LicenseRenderer::new(RenderConfig::default())
        .with_numbers(FixedNumbers::new(483, 5531, 2025))
        .render(&scenario_record())
        .unwrap();
    assert_ne!(a.as_bytes(), other.as_bytes());
}

#[test]
fn test_random_numbers_by_default() {
    let document = render(&scenario_record(), &RenderConfig::default()).unwrap();
    let text = String::from_utf8_lossy(document.as_bytes());

    let resolution = Regex::new(r"\(GDE-[1-9]\d{2}-\d{4}/MDP\) Tj").unwrap();
    assert!(resolution.is_match(&text));
    let certificate = Regex::new(r"Certificate No\. [1-9]\d{3}  -  Risk").unwrap();
    assert!(certificate.is_match(&text));
}

#[test]
fn test_row_baselines_step_by_pitch() {
    let document = fixed_renderer().render(&scenario_record()).unwrap();
    let text = String::from_utf8_lossy(document.as_bytes()).to_string();

    let mut ys = Vec::new();
    for label in ROW_LABELS {
        let pattern = format!(r"1 0 0 1 ([\d.]+) ([\d.]+) Tm\n\({}\) Tj", regex::escape(label));
        let caps = Regex::new(&pattern).unwrap().captures(&text).unwrap();
        let x: f32 = caps[1].parse().unwrap();
        let y: f32 = caps[2].parse().unwrap();
        assert!((x - cm(2.5)).abs() < 1e-3, "{} at x {}", label, x);
        ys.push(y);
    }

    assert!((ys[0] - (cm(29.7) - cm(9.5))).abs() < 1e-2);
    for pair in ys.windows(2) {
        assert!(pair[0] > pair[1]);
        assert!(((pair[0] - pair[1]) - cm(1.0)).abs() < 1e-2);
    }
}

#[test]
fn test_row_order_ignores_input_order() {
    let json = r#"{
        "zoning": "COMMERCIAL",
        "area_square_meters": 45,
        "inspection_expiry_date": "01/01/2027",
        "address": "MAIN ST 1",
        "owner_name": "ACME",
        "business_activity": "RETAIL",
        "trade_name": "ACME SHOP",
        "file_number": "EXP-0002"
    }"#;
    let record: LicenseRecord = serde_json::from_str(json).unwrap();
    let rendered = fixed_renderer().render_detailed(&record).unwrap();

    let labels: Vec<&str> = rendered.rows.iter().map(|row| row.label).collect();
    assert_eq!(labels, ROW_LABELS.to_vec());
    assert_eq!(rendered.rows[9].value, "30 Persons (Occupancy)");
}

#[test]
fn test_optional_fields_verbatim_when_present() {
    let record = scenario_record()
        .with_tax_id("20481234567")
        .with_risk_level("HIGH");
    let bytes = fixed_renderer().render(&record).unwrap().into_bytes();

    assert!(contains(&bytes, b"(20481234567) Tj"));
    assert!(contains(&bytes, b"Risk: HIGH) Tj"));
    assert!(!contains(&bytes, b"Not registered"));
}

#[test]
fn test_invalid_records_rejected() {
    let mut record = scenario_record();
    record.owner_name.clear();
    record.inspection_expiry_date = "   ".to_string();
    record.area_square_meters = 0.0;

    match fixed_renderer().render(&record) {
        Err(Error::InvalidRecord(errors)) => {
            assert_eq!(errors.len(), 3);
            assert!(errors.has_field("owner_name"));
            assert!(errors.has_field("inspection_expiry_date"));
            assert!(errors.has_field("area_square_meters"));
        },
        other => panic!("expected InvalidRecord, got {:?}", other),
    }
}

#[test]
fn test_out_of_range_injected_numbers_rejected() {
    let result = LicenseRenderer::new(RenderConfig::default())
        .with_numbers(FixedNumbers::new(1000, 5531, 2025))
        .render(&scenario_record());
    assert!(matches!(result, Err(Error::InvalidRecord(_))));
}

#[test]
fn test_watermark_drawn_first_and_translucent() {
    let rendered = fixed_renderer().render_detailed(&scenario_record()).unwrap();
    assert!(matches!(rendered.primitives[0], Primitive::BeginTransform(_)));
    assert_eq!(rendered.primitives[1], Primitive::BeginAlpha(0.5));
    assert_eq!(rendered.primitives[2].as_text(), Some("OFFICIAL DOCUMENT"));

    let text = String::from_utf8_lossy(rendered.document.as_bytes());
    assert!(text.contains("/CA 0.5/Type /ExtGState/ca 0.5"));
    let rotation = Regex::new(r"0\.7071\d* 0\.7071\d* -0\.7071\d* 0\.7071\d* [\d.]+ [\d.]+ cm").unwrap();
    assert!(rotation.is_match(&text));
}

#[test]
fn test_assets_embedded_or_replaced() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("logo.png"), create_test_png()).unwrap();

    let renderer = fixed_renderer().with_assets(
        RenderAssets::none().with_logo("logo.png").with_seal("missing-seal.png"),
        FileAssetLoader::new(dir.path()),
    );
    let rendered = renderer.render_detailed(&scenario_record()).unwrap();

    let text = String::from_utf8_lossy(rendered.document.as_bytes());
    assert!(text.contains("/Im1 Do"));
    assert!(text.contains("/Subtype /Image"));
    assert!(text.contains("/SMask"));

    let images = rendered
        .primitives
        .iter()
        .filter(|p| matches!(p, Primitive::Image { .. }))
        .count();
    let placeholders = rendered
        .primitives
        .iter()
        .filter(|p| matches!(p, Primitive::Placeholder { .. }))
        .count();
    assert_eq!((images, placeholders), (1, 1));
}

#[test]
fn test_compressed_output_still_contains_fields() {
    let renderer = LicenseRenderer::new(RenderConfig::default().with_compress(true))
        .with_numbers(FixedNumbers::new(482, 5531, 2025));
    let bytes = renderer.render(&scenario_record()).unwrap().into_bytes();
    assert!(!contains(&bytes, b"(Not registered) Tj"));

    let start = bytes
        .windows(7)
        .position(|w| w == b"stream\n")
        .map(|p| p + 7)
        .unwrap();
    let mut decoder = flate2::read::ZlibDecoder::new(&bytes[start..]);
    let mut content = Vec::new();
    decoder.read_to_end(&mut content).unwrap();
    assert!(contains(&content, b"(Not registered) Tj"));
}

#[test]
fn test_creation_date_only_when_injected() {
    let plain = fixed_renderer().render(&scenario_record()).unwrap();
    assert!(!contains(plain.as_bytes(), b"/CreationDate"));

    let config =
        RenderConfig::default().with_creation_date(Utc.with_ymd_and_hms(2025, 6, 30, 9, 0, 0).unwrap());
    let dated = LicenseRenderer::new(config)
        .with_numbers(FixedNumbers::new(482, 5531, 2025))
        .render(&scenario_record())
        .unwrap();
    assert!(contains(dated.as_bytes(), b"/CreationDate (D:20250630090000Z)"));
}

#[test]
fn test_parallel_renders_are_independent() {
    let renderer = Arc::new(fixed_renderer());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let renderer = Arc::clone(&renderer);
            std::thread::spawn(move || {
                let record = LicenseRecord {
                    file_number: format!("EXP-{:04}", i),
                    ..scenario_record()
                };
                renderer.render(&record)
            })
        })
        .collect();

    let reference = fixed_renderer().render(&scenario_record()).unwrap();
    for (i, handle) in handles.into_iter().enumerate() {
        let document = handle.join().unwrap().unwrap();
        let expected = format!("(EXP-{:04}) Tj", i);
        assert!(contains(document.as_bytes(), expected.as_bytes()));
        if i == 1 {
            assert_eq!(document, reference);
        }
    }
}

#[test]
fn test_custom_status_and_codes() {
    let config = RenderConfig::default()
        .with_status_label("PROVISIONAL")
        .with_codes("GAT", "MPC");
    let bytes = LicenseRenderer::new(config)
        .with_numbers(FixedNumbers::new(100, 1000, 2026))
        .render(&scenario_record())
        .unwrap()
        .into_bytes();
    assert!(contains(&bytes, b"(PROVISIONAL) Tj"));
    assert!(contains(&bytes, b"(GAT-100-2026/MPC) Tj"));
}

#[test]
fn test_value_too_long_for_column_rejected() {
    let mut record = scenario_record();
    record.address = "AVENIDA ".repeat(20);

    match fixed_renderer().render(&record) {
        Err(Error::InvalidRecord(errors)) => {
            assert_eq!(errors.len(), 1);
            assert!(errors.has_field("address"));
        },
        other => panic!("expected InvalidRecord, got {:?}", other),
    }
}

#[test]
fn test_invalid_config_rejected() {
    for config in [
        RenderConfig::default().with_row_pitch_cm(0.0),
        RenderConfig::default().with_row_pitch_cm(2.5),
        RenderConfig::default().with_watermark_alpha(1.0),
    ] {
        let result = LicenseRenderer::new(config)
            .with_numbers(FixedNumbers::new(482, 5531, 2025))
            .render(&scenario_record());
        assert!(matches!(result, Err(Error::Rendering(_))), "got {:?}", result);
    }
}

#[test]
fn test_non_ascii_title_written_as_utf16() {
    let mut config = RenderConfig::default();
    config.metadata.title = Some("Licencia Única".to_string());
    let bytes = LicenseRenderer::new(config)
        .with_numbers(FixedNumbers::new(482, 5531, 2025))
        .render(&scenario_record())
        .unwrap()
        .into_bytes();

    assert!(contains(&bytes, b"/Title <FEFF004C"));
    assert!(contains(&bytes, b"00DA006E006900630061>"));
}
