//! Error types for the license renderer.
//!
//! This module defines all error types that can occur while validating a
//! license record and drawing it onto a page.

use std::fmt;

/// Result type alias for license renderer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during rendering.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The record is missing a required field or carries an impossible value.
    ///
    /// Fatal: no partial document is produced.
    #[error("Invalid license record: {0}")]
    InvalidRecord(#[from] ValidationErrors),

    /// An optional asset (logo, seal) could not be loaded or decoded.
    ///
    /// Renderers recover from this locally by drawing a placeholder.
    #[error("Asset unavailable: {0}")]
    AssetUnavailable(String),

    /// A drawing call was made after the surface was finalized.
    #[error("Drawing surface used after finalize")]
    UseAfterFinalize,

    /// Font error (unknown font name, unusable size)
    #[error("Font error: {0}")]
    Font(String),

    /// Image error
    #[error("Image error: {0}")]
    Image(String),

    /// Any other failure while building the page
    #[error("Rendering failed: {0}")]
    Rendering(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a record error on a single field.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(ValidationError::new(field, message));
        Error::InvalidRecord(errors)
    }
}

/// A single failed field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable message
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Error for a required field that is empty or blank.
    pub fn empty_field(field: &str) -> Self {
        Self::new(field, "must not be empty")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)
    }
}

/// Collection of validation errors, reported together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure.
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// True when nothing failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of failures.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The failures in the order they were found.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// True if any failure concerns `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when empty, otherwise the collection as an error.
    pub fn into_result(self) -> std::result::Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
