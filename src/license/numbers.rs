//! Document numbers and other derived fields.
//!
//! Resolution and certificate numbers come from a [`NumberSource`]. The
//! random source is a convenience for ad-hoc printing; callers that need
//! reproducible output inject [`FixedNumbers`].

use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::license::record::LicenseRecord;
use chrono::Datelike;
use rand::Rng;
use std::ops::RangeInclusive;

/// Valid resolution sequence numbers.
pub const RESOLUTION_RANGE: RangeInclusive<u32> = 100..=999;

/// Valid inspection certificate numbers.
pub const CERTIFICATE_RANGE: RangeInclusive<u32> = 1000..=9999;

/// Square meters per person when computing occupancy.
pub const SQUARE_METERS_PER_PERSON: f64 = 1.5;

/// Supplies the numbers printed on a license.
pub trait NumberSource: Send + Sync {
    /// Three-digit resolution sequence.
    fn resolution_sequence(&self) -> u32;

    /// Four-digit inspection certificate number.
    fn certificate_number(&self) -> u32;

    /// Year printed in the resolution identifier.
    fn year(&self) -> i32;
}

impl<T: NumberSource + ?Sized> NumberSource for Box<T> {
    fn resolution_sequence(&self) -> u32 {
        (**self).resolution_sequence()
    }

    fn certificate_number(&self) -> u32 {
        (**self).certificate_number()
    }

    fn year(&self) -> i32 {
        (**self).year()
    }
}

/// Random numbers and the current calendar year.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomNumbers;

impl NumberSource for RandomNumbers {
    fn resolution_sequence(&self) -> u32 {
        rand::thread_rng().gen_range(RESOLUTION_RANGE)
    }

    fn certificate_number(&self) -> u32 {
        rand::thread_rng().gen_range(CERTIFICATE_RANGE)
    }

    fn year(&self) -> i32 {
        chrono::Local::now().year()
    }
}

/// Caller-supplied numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedNumbers {
    /// Resolution sequence
    pub resolution_sequence: u32,
    /// Certificate number
    pub certificate_number: u32,
    /// Year
    pub year: i32,
}

impl FixedNumbers {
    /// Create a fixed source.
    pub fn new(resolution_sequence: u32, certificate_number: u32, year: i32) -> Self {
        Self {
            resolution_sequence,
            certificate_number,
            year,
        }
    }
}

impl NumberSource for FixedNumbers {
    fn resolution_sequence(&self) -> u32 {
        self.resolution_sequence
    }

    fn certificate_number(&self) -> u32 {
        self.certificate_number
    }

    fn year(&self) -> i32 {
        self.year
    }
}

/// Occupancy capacity: whole persons at 1.5 m² each.
///
/// ```
/// use license_press::license::capacity;
///
/// assert_eq!(capacity(120.0)?, 80);
/// assert_eq!(capacity(1.4)?, 0);
/// assert!(capacity(0.0).is_err());
/// # Ok::<(), license_press::Error>(())
/// ```
pub fn capacity(area_square_meters: f64) -> Result<u64> {
    if !area_square_meters.is_finite() || area_square_meters <= 0.0 {
        return Err(Error::invalid_field(
            "area_square_meters",
            format!("must be a positive number, got {}", area_square_meters),
        ));
    }
    Ok((area_square_meters / SQUARE_METERS_PER_PERSON).floor() as u64)
}

/// Format a floor area for printing, e.g. `120 m²`.
pub fn format_area(area_square_meters: f64) -> String {
    format!("{} m²", area_square_meters)
}

/// Values computed for one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedFields {
    /// Resolution identifier, e.g. `GDE-482-2025/MDP`
    pub resolution: String,
    /// Inspection certificate number
    pub certificate_number: u32,
    /// Occupancy capacity in persons
    pub capacity: u64,
}

impl DerivedFields {
    /// Compute the derived fields of `record`.
    ///
    /// Numbers outside their ranges are rejected as invalid records.
    pub fn compute(record: &LicenseRecord, numbers: &dyn NumberSource, config: &RenderConfig) -> Result<Self> {
        let sequence = numbers.resolution_sequence();
        if !RESOLUTION_RANGE.contains(&sequence) {
            return Err(Error::invalid_field(
                "resolution_sequence",
                format!("{} is outside {:?}", sequence, RESOLUTION_RANGE),
            ));
        }
        let certificate_number = numbers.certificate_number();
        if !CERTIFICATE_RANGE.contains(&certificate_number) {
            return Err(Error::invalid_field(
                "certificate_number",
                format!("{} is outside {:?}", certificate_number, CERTIFICATE_RANGE),
            ));
        }

        Ok(Self {
            resolution: format!(
                "{}-{}-{}/{}",
                config.office_code,
                sequence,
                numbers.year(),
                config.municipality_code
            ),
            certificate_number,
            capacity: capacity(record.area_square_meters)?,
        })
    }
}
