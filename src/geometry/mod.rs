//! Page geometry: unit conversion and coordinate helpers.
//!
//! All drawing happens in PDF user space: one unit is one point, the origin
//! is the bottom-left corner of the page and y grows upward.

use serde::{Deserialize, Serialize};

/// Points per centimeter.
pub const POINTS_PER_CM: f32 = 28.3465;

/// Points per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Physical units accepted by [`to_page_units`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Native page unit
    Point,
    /// Centimeter (28.3465 pt)
    Centimeter,
    /// Millimeter (2.83465 pt)
    Millimeter,
    /// Inch (72 pt)
    Inch,
}

impl Unit {
    /// Points per one of this unit.
    pub fn factor(self) -> f32 {
        match self {
            Unit::Point => 1.0,
            Unit::Centimeter => POINTS_PER_CM,
            Unit::Millimeter => POINTS_PER_CM / 10.0,
            Unit::Inch => POINTS_PER_INCH,
        }
    }
}

/// Convert a physical length to page units (points).
///
/// # Examples
///
/// ```
/// use license_press::geometry::{to_page_units, Unit};
///
/// assert_eq!(to_page_units(1.0, Unit::Centimeter), 28.3465);
/// assert_eq!(to_page_units(2.0, Unit::Inch), 144.0);
/// ```
pub fn to_page_units(value: f32, unit: Unit) -> f32 {
    value * unit.factor()
}

/// Centimeters to points.
pub fn cm(value: f32) -> f32 {
    to_page_units(value, Unit::Centimeter)
}

/// A 2D point in page space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangle in page space, anchored at its bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// X coordinate of the left edge
    pub x: f32,
    /// Y coordinate of the bottom edge
    pub y: f32,
    /// Width of rectangle
    pub width: f32,
    /// Height of rectangle
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from its bottom-left corner and dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use license_press::geometry::Rect;
    ///
    /// let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
    /// assert_eq!(rect.top(), 70.0);
    /// assert_eq!(rect.right(), 110.0);
    /// ```
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Get the left edge x-coordinate.
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Get the right edge x-coordinate.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the bottom edge y-coordinate.
    pub fn bottom(&self) -> f32 {
        self.y
    }

    /// Get the top edge y-coordinate.
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Get the center point of the rectangle.
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Check if this rectangle contains a point (edges inclusive).
    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.bottom() && p.y <= self.top()
    }

    /// Check if `other` lies entirely inside this rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.bottom() >= self.bottom()
            && other.top() <= self.top()
    }

    /// Check if this rectangle overlaps another (touching edges do not count).
    ///
    /// # Examples
    ///
    /// ```
    /// use license_press::geometry::Rect;
    ///
    /// let r1 = Rect::new(0.0, 0.0, 100.0, 100.0);
    /// let r2 = Rect::new(50.0, 50.0, 100.0, 100.0);
    /// let r3 = Rect::new(100.0, 0.0, 10.0, 10.0);
    ///
    /// assert!(r1.intersects(&r2));
    /// assert!(!r1.intersects(&r3));
    /// ```
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.bottom() < other.top()
            && self.top() > other.bottom()
    }

    /// Shrink the rectangle by `amount` on every side.
    pub fn inset(&self, amount: f32) -> Rect {
        Rect::new(
            self.x + amount,
            self.y + amount,
            self.width - 2.0 * amount,
            self.height - 2.0 * amount,
        )
    }
}

/// Dimensions of one page in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Page width
    pub width: f32,
    /// Page height
    pub height: f32,
}

impl PageGeometry {
    /// Page of the given size in points.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Page of the given size in centimeters.
    pub fn from_cm(width_cm: f32, height_cm: f32) -> Self {
        Self::new(cm(width_cm), cm(height_cm))
    }

    /// A4 portrait (21.0 x 29.7 cm).
    pub fn a4() -> Self {
        Self::from_cm(21.0, 29.7)
    }

    /// Y coordinate `offset` points below the top edge.
    pub fn from_top(&self, offset: f32) -> f32 {
        self.height - offset
    }

    /// Horizontal center line.
    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }

    /// Center of the page.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// The whole page as a rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}
