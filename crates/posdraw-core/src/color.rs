//! Color normalization for pos documents.
//!
//! Source documents store colors either as an RGB array (`[255, 0, 0]`) or as
//! an already encoded hex string (`"#ff0000"`). This module maps both forms to
//! the canonical `#rrggbb` notation understood by draw.io.
//!
//! Normalization never fails. Anything that is not a recognizable color falls
//! back to the default for its [`ColorRole`]: white for fills, black for
//! strokes. A fill that ends up pure black is turned white so labels stay
//! readable on the default black font.
//!
//! # Example
//!
//! ```
//! # use posdraw_core::color::{ColorRole, normalize};
//! # use serde_json::json;
//! assert_eq!(normalize(Some(&json!([255, 0, 0])), ColorRole::Fill).to_string(), "#ff0000");
//! assert_eq!(normalize(Some(&json!([0, 0, 0])), ColorRole::Fill).to_string(), "#ffffff");
//! assert_eq!(normalize(Some(&json!([0, 0, 0])), ColorRole::Stroke).to_string(), "#000000");
//! assert_eq!(normalize(Some(&json!("oops")), ColorRole::Stroke).to_string(), "#000000");
//! ```

use std::{fmt, str::FromStr};

use color::{DynamicColor, Srgb};
use serde_json::Value;

/// An opaque 24-bit sRGB color.
///
/// [`Display`](fmt::Display) renders the canonical lowercase `#rrggbb` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
}

impl Color {
    /// Pure white, `#ffffff`.
    pub const WHITE: Color = Color::from_rgb(255, 255, 255);

    /// Pure black, `#000000`.
    pub const BLACK: Color = Color::from_rgb(0, 0, 0);

    /// Creates a color from its three channels.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Returns the red channel.
    pub fn r(self) -> u8 {
        self.r
    }

    /// Returns the green channel.
    pub fn g(self) -> u8 {
        self.g
    }

    /// Returns the blue channel.
    pub fn b(self) -> u8 {
        self.b
    }

    /// Parses any CSS color string ("#ff0000", "rgb(255, 0, 0)", "red", ...).
    ///
    /// The alpha channel is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// # use posdraw_core::color::Color;
    /// assert_eq!(Color::new("red"), Ok(Color::from_rgb(255, 0, 0)));
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        let color = DynamicColor::from_str(color_str)
            .map_err(|err| format!("invalid color `{color_str}`: {err}"))?;
        let rgba = color.to_alpha_color::<Srgb>().to_rgba8();
        Ok(Self::from_rgb(rgba.r, rgba.g, rgba.b))
    }

    /// Parses a `#rrggbb` string. Digits may be upper or lower case.
    ///
    /// Shorthand (`#abc`), alpha (`#rrggbbaa`) and named colors are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// # use posdraw_core::color::Color;
    /// assert_eq!(Color::from_hex("#ABC123"), Some(Color::from_rgb(0xab, 0xc1, 0x23)));
    /// assert_eq!(Color::from_hex("#abc"), None);
    /// assert_eq!(Color::from_hex("abc123"), None);
    /// ```
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Self::new(hex).ok()
    }

    /// Interprets a JSON value as a color.
    ///
    /// Accepts an array whose first three entries are numbers (extra entries,
    /// such as an alpha channel, are ignored) or a `#rrggbb` string. Channels
    /// are truncated toward zero and clamped to `0..=255`.
    ///
    /// Returns `None` for every other shape of value.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(channels) if channels.len() >= 3 => Some(Self::from_rgb(
                clamp_channel(&channels[0])?,
                clamp_channel(&channels[1])?,
                clamp_channel(&channels[2])?,
            )),
            Value::String(hex) => Self::from_hex(hex),
            _ => None,
        }
    }

    /// Returns the canonical `#rrggbb` representation.
    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// What a color is used for; decides the fallback and the black override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    /// Shape background. Defaults to white; black is remapped to white.
    Fill,
    /// Outline or connector line. Defaults to black.
    Stroke,
}

impl ColorRole {
    /// Returns the color used when the source value is absent or unusable.
    pub fn default_color(self) -> Color {
        match self {
            ColorRole::Fill => Color::WHITE,
            ColorRole::Stroke => Color::BLACK,
        }
    }
}

/// Normalizes an optional source color value for the given role.
pub fn normalize(value: Option<&Value>, role: ColorRole) -> Color {
    let color = value
        .and_then(Color::from_value)
        .unwrap_or_else(|| role.default_color());

    match role {
        ColorRole::Fill if color == Color::BLACK => Color::WHITE,
        _ => color,
    }
}

/// Normalizes a source color value straight to its `#rrggbb` string.
///
/// # Examples
///
/// ```
/// # use posdraw_core::color::{ColorRole, rgb_to_hex};
/// # use serde_json::json;
/// assert_eq!(rgb_to_hex(&json!([255, 0, 0]), ColorRole::Stroke), "#ff0000");
/// assert_eq!(rgb_to_hex(&json!("#abc123"), ColorRole::Fill), "#abc123");
/// ```
pub fn rgb_to_hex(value: &Value, role: ColorRole) -> String {
    normalize(Some(value), role).to_hex()
}

fn clamp_channel(value: &Value) -> Option<u8> {
    let Value::Number(number) = value else {
        return None;
    };
    let clamped = if let Some(int) = number.as_i64() {
        int.clamp(0, 255)
    } else if number.is_u64() {
        // Only values beyond i64::MAX reach this branch.
        255
    } else {
        let float = number.as_f64()?.trunc();
        float.clamp(0.0, 255.0) as i64
    };
    u8::try_from(clamped).ok()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_rgb_array_to_hex() {
        assert_eq!(rgb_to_hex(&json!([255, 0, 0]), ColorRole::Fill), "#ff0000");
        assert_eq!(rgb_to_hex(&json!([0, 128, 255]), ColorRole::Stroke), "#0080ff");
    }

    #[test]
    fn test_hex_string_passes_through() {
        assert_eq!(rgb_to_hex(&json!("#abc123"), ColorRole::Fill), "#abc123");
        assert_eq!(rgb_to_hex(&json!("#ABC123"), ColorRole::Stroke), "#abc123");
    }

    #[test]
    fn test_black_fill_becomes_white() {
        assert_eq!(rgb_to_hex(&json!([0, 0, 0]), ColorRole::Fill), "#ffffff");
        assert_eq!(rgb_to_hex(&json!("#000000"), ColorRole::Fill), "#ffffff");
    }

    #[test]
    fn test_black_stroke_stays_black() {
        assert_eq!(rgb_to_hex(&json!([0, 0, 0]), ColorRole::Stroke), "#000000");
    }

    #[test]
    fn test_channels_are_clamped() {
        assert_eq!(rgb_to_hex(&json!([300, -20, 12.9]), ColorRole::Stroke), "#ff000c");
    }

    #[test]
    fn test_extra_channels_ignored() {
        assert_eq!(rgb_to_hex(&json!([1, 2, 3, 0.5]), ColorRole::Stroke), "#010203");
    }

    #[test]
    fn test_malformed_values_use_role_default() {
        let malformed = [
            json!([1, 2]),
            json!(["a", "b", "c"]),
            json!("red"),
            json!("#abc"),
            json!("#gggggg"),
            json!(42),
            json!(null),
            json!({"r": 1}),
        ];

        for value in &malformed {
            assert_eq!(rgb_to_hex(value, ColorRole::Fill), "#ffffff", "{value}");
            assert_eq!(rgb_to_hex(value, ColorRole::Stroke), "#000000", "{value}");
        }
    }

    #[test]
    fn test_absent_value_uses_role_default() {
        assert_eq!(normalize(None, ColorRole::Fill), Color::WHITE);
        assert_eq!(normalize(None, ColorRole::Stroke), Color::BLACK);
    }

    #[test]
    fn test_css_color_strings() {
        assert_eq!(Color::new("#336699"), Ok(Color::from_rgb(0x33, 0x66, 0x99)));
        assert_eq!(Color::new("rgb(1, 2, 3)"), Ok(Color::from_rgb(1, 2, 3)));
        assert_eq!(Color::new("white"), Ok(Color::WHITE));

        let err = Color::new("not-a-color").unwrap_err();
        assert!(err.contains("not-a-color"));
    }

    #[test]
    fn test_huge_unsigned_channel() {
        assert_eq!(
            rgb_to_hex(&json!([u64::MAX, 0, 0]), ColorRole::Stroke),
            "#ff0000"
        );
    }

    proptest! {
        #[test]
        fn prop_always_canonical_hex(r in any::<i64>(), g in any::<i64>(), b in any::<i64>()) {
            let hex = rgb_to_hex(&json!([r, g, b]), ColorRole::Stroke);
            prop_assert_eq!(hex.len(), 7);
            prop_assert!(hex.starts_with('#'));
            prop_assert!(hex[1..].chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }

        #[test]
        fn prop_fill_is_never_black(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            let color = normalize(Some(&json!([r, g, b])), ColorRole::Fill);
            prop_assert_ne!(color, Color::BLACK);
        }

        #[test]
        fn prop_in_range_channels_roundtrip(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            let color = normalize(Some(&json!([r, g, b])), ColorRole::Stroke);
            prop_assert_eq!(color, Color::from_rgb(r, g, b));
            prop_assert_eq!(Color::from_hex(&color.to_hex()), Some(color));
        }

        #[test]
        fn prop_arbitrary_strings_never_panic(s in ".*") {
            let _ = rgb_to_hex(&json!(s), ColorRole::Fill);
        }
    }
}
