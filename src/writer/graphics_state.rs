//! Extended Graphics State (ExtGState) for transparency.
//!
//! # Example
//!
//! ```
//! use license_press::writer::ExtGStateBuilder;
//!
//! let gs = ExtGStateBuilder::new().alpha(0.5).build();
//! assert_eq!(gs.type_name(), "Dictionary");
//! ```

use crate::object::Object;
use std::collections::HashMap;

/// Builder for Extended Graphics State dictionaries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtGStateBuilder {
    /// Fill alpha (ca) - 0.0 to 1.0
    fill_alpha: Option<f32>,
    /// Stroke alpha (CA) - 0.0 to 1.0
    stroke_alpha: Option<f32>,
}

impl ExtGStateBuilder {
    /// Create a new ExtGState builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set fill alpha (opacity for fill operations, including text).
    pub fn fill_alpha(mut self, alpha: f32) -> Self {
        self.fill_alpha = Some(alpha.clamp(0.0, 1.0));
        self
    }

    /// Set stroke alpha (opacity for stroke operations).
    pub fn stroke_alpha(mut self, alpha: f32) -> Self {
        self.stroke_alpha = Some(alpha.clamp(0.0, 1.0));
        self
    }

    /// Set both fill and stroke alpha to the same value.
    pub fn alpha(self, alpha: f32) -> Self {
        self.fill_alpha(alpha).stroke_alpha(alpha)
    }

    /// Resource name for this state, stable for equal alpha values.
    ///
    /// Alphas are quantized to thousandths, e.g. `GSa500` for 0.5.
    pub fn resource_name(&self) -> String {
        let milli = |a: Option<f32>| a.map(|v| (v * 1000.0).round() as u32).unwrap_or(1000);
        let fill = milli(self.fill_alpha);
        let stroke = milli(self.stroke_alpha);
        if fill == stroke {
            format!("GSa{}", fill)
        } else {
            format!("GSf{}s{}", fill, stroke)
        }
    }

    /// Build the ExtGState dictionary as a PDF Object.
    pub fn build(&self) -> Object {
        let mut dict: HashMap<String, Object> = HashMap::new();
        dict.insert("Type".to_string(), Object::Name("ExtGState".to_string()));

        if let Some(alpha) = self.fill_alpha {
            dict.insert("ca".to_string(), Object::Real(alpha as f64));
        }
        if let Some(alpha) = self.stroke_alpha {
            dict.insert("CA".to_string(), Object::Real(alpha as f64));
        }

        Object::Dictionary(dict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::ObjectSerializer;

    #[test]
    fn test_alpha_dictionary() {
        let gs = ExtGStateBuilder::new().alpha(0.5).build();
        let text = ObjectSerializer::compact().serialize_to_string(&gs);
        assert_eq!(text, "<</CA 0.5/Type /ExtGState/ca 0.5>>");
    }

    #[test]
    fn test_alpha_is_clamped() {
        assert_eq!(ExtGStateBuilder::new().fill_alpha(3.0).resource_name(), "GSa1000");
        assert_eq!(ExtGStateBuilder::new().fill_alpha(0.3).resource_name(), "GSf300s1000");
    }

    #[test]
    fn test_resource_name_is_stable() {
        let a = ExtGStateBuilder::new().alpha(0.5);
        let b = ExtGStateBuilder::new().alpha(0.5);
        assert_eq!(a.resource_name(), b.resource_name());
        assert_eq!(a.resource_name(), "GSa500");
    }
}
