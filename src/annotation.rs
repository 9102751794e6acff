use egui::{Color32, Pos2, Rect, Vec2};
use serde::{de::Visitor, Deserialize, Deserializer, Serialize, Serializer};

pub type AnnotationId = u64;

/// Font size in points, clamped to the range the editor offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontSize(u8);

impl FontSize {
    pub const MIN: u8 = 16;
    pub const MAX: u8 = 48;
    pub const DEFAULT: Self = Self(28);

    pub fn from_points(points: u8) -> Self {
        Self(points.clamp(Self::MIN, Self::MAX))
    }

    pub fn as_u8(self) -> u8 {
        self.0
    }

    pub fn points(self) -> f32 {
        self.0 as f32
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Serialize for FontSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for FontSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FontSizeVisitor;

        impl<'de> Visitor<'de> for FontSizeVisitor {
            type Value = FontSize;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.write_str("font size as a number in 16..48")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(FontSize::from_points(value.min(FontSize::MAX as u64) as u8))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let numeric = value.max(FontSize::MIN as i64).min(FontSize::MAX as i64) as u8;
                Ok(FontSize::from_points(numeric))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let numeric = value.clamp(FontSize::MIN as f64, FontSize::MAX as f64) as u8;
                Ok(FontSize::from_points(numeric))
            }
        }

        deserializer.deserialize_any(FontSizeVisitor)
    }
}

/// Annotation color, stored as RGB and written as `#RRGGBB` in project files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub fn from_hex(value: &str) -> Option<Self> {
        let digits = value.strip_prefix('#')?;
        if digits.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
        let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
        let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
        Some(Self([r, g, b]))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0[0], self.0[1], self.0[2])
    }

    pub fn to_color32(self) -> Color32 {
        Color32::from_rgb(self.0[0], self.0[1], self.0[2])
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ColorVisitor;

        impl<'de> Visitor<'de> for ColorVisitor {
            type Value = Color;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.write_str("color as a #RRGGBB hex string")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Color::from_hex(value)
                    .ok_or_else(|| E::custom(format!("invalid color '{value}', expected #RRGGBB")))
            }
        }

        deserializer.deserialize_str(ColorVisitor)
    }
}

/// Position in canvas display space. Not normalized to the image's natural
/// resolution: annotations stay pinned to these coordinates across viewport
/// resizes and zoom changes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn to_pos2(self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }

    pub fn from_pos2(value: Pos2) -> Self {
        Self {
            x: value.x,
            y: value.y,
        }
    }

    pub fn delta(self, other: Point) -> Vec2 {
        Vec2::new(other.x - self.x, other.y - self.y)
    }

    pub fn offset(self, delta: Vec2) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
        }
    }
}

/// One placed text glyph. The id is assigned at creation, never reused, and
/// is the sole key for lookup, selection and mutation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Annotation {
    pub id: AnnotationId,
    #[serde(flatten)]
    pub pos: Point,
    pub text: String,
    pub color: Color,
    #[serde(rename = "fontSize", default)]
    pub font_size: FontSize,
}

impl Annotation {
    pub fn color32(&self) -> Color32 {
        self.color.to_color32()
    }

    /// Conservative text-extent estimate for hit-testing and selection boxes.
    pub fn bounds(&self) -> Rect {
        let points = self.font_size.points();
        let width = (self.text.chars().count().max(1) as f32 * points * 0.6).max(20.0);
        let height = points * 1.4;
        Rect::from_min_size(self.pos.to_pos2(), Vec2::new(width, height))
    }

    pub fn contains(&self, point: Point, tolerance: f32) -> bool {
        self.bounds().expand(tolerance).contains(point.to_pos2())
    }
}

#[cfg(test)]
mod tests {
    use super::{Annotation, Color, FontSize, Point};

    #[test]
    fn font_size_clamps_to_range() {
        assert_eq!(FontSize::from_points(8).as_u8(), FontSize::MIN);
        assert_eq!(FontSize::from_points(28).as_u8(), 28);
        assert_eq!(FontSize::from_points(200).as_u8(), FontSize::MAX);
    }

    #[test]
    fn font_size_deserializes_and_clamps_numbers() {
        let normal: FontSize = serde_json::from_str("28").expect("numeric font size");
        assert_eq!(normal.as_u8(), 28);

        let clamped: FontSize = serde_json::from_str("100").expect("clamped font size");
        assert_eq!(clamped.as_u8(), FontSize::MAX);

        let fractional: FontSize = serde_json::from_str("24.0").expect("fractional font size");
        assert_eq!(fractional.as_u8(), 24);
    }

    #[test]
    fn color_round_trips_through_hex() {
        let blue = Color::rgb(0, 0, 255);
        assert_eq!(blue.to_hex(), "#0000FF");
        assert_eq!(Color::from_hex("#0000FF"), Some(blue));
        assert_eq!(Color::from_hex("#0000ff"), Some(blue));
        assert_eq!(Color::from_hex("0000FF"), None);
        assert_eq!(Color::from_hex("#00F"), None);
    }

    #[test]
    fn annotation_serializes_flat_record() {
        let annotation = Annotation {
            id: 3,
            pos: Point::new(120.0, 80.0),
            text: "∠A".to_string(),
            color: Color::rgb(0, 0, 255),
            font_size: FontSize::from_points(28),
        };

        let value = serde_json::to_value(&annotation).expect("serialize annotation");
        assert_eq!(value["id"], 3);
        assert_eq!(value["x"], 120.0);
        assert_eq!(value["y"], 80.0);
        assert_eq!(value["text"], "∠A");
        assert_eq!(value["color"], "#0000FF");
        assert_eq!(value["fontSize"], 28);
    }

    #[test]
    fn hit_test_covers_text_extent() {
        let annotation = Annotation {
            id: 1,
            pos: Point::new(100.0, 100.0),
            text: "ABC".to_string(),
            color: Color::rgb(0, 0, 0),
            font_size: FontSize::from_points(20),
        };

        assert!(annotation.contains(Point::new(110.0, 110.0), 0.0));
        assert!(!annotation.contains(Point::new(100.0, 300.0), 4.0));
    }
}
