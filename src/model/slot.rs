use serde::Serialize;
use smol_str::SmolStr;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    /// Decodes an `RRGGBBAA` hex string; `None` if any channel is invalid.
    pub fn from_hex(value: &str) -> Option<Color> {
        Some(Color {
            r: to_color(value, 0)?,
            g: to_color(value, 1)?,
            b: to_color(value, 2)?,
            a: to_color(value, 3)?,
        })
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// Reads channel `index` (0..=3) of an 8-digit hex color as a value in
/// `[0, 1]`. Any string that is not exactly 8 bytes long is invalid for
/// every channel.
pub fn to_color(value: &str, index: usize) -> Option<f32> {
    let bytes = value.as_bytes();
    if bytes.len() != 8 || index > 3 {
        return None;
    }
    let digits = &bytes[index * 2..index * 2 + 2];
    if !digits.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let text = std::str::from_utf8(digits).ok()?;
    let channel = u8::from_str_radix(text, 16).ok()?;
    Some(f32::from(channel) / 255.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotData {
    pub name: SmolStr,
    pub bone: usize,
    pub color: Color,
    pub attachment_name: Option<SmolStr>,
}

impl SlotData {
    pub fn new(name: impl Into<SmolStr>, bone: usize) -> Self {
        Self {
            name: name.into(),
            bone,
            color: Color::WHITE,
            attachment_name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_to_color_channels() {
        let channels: Vec<_> = (0..4).map(|index| to_color("ff0000ff", index)).collect();
        assert_eq!(channels, vec![Some(1.0), Some(0.0), Some(0.0), Some(1.0)]);
        assert_eq!(to_color("80808080", 2), Some(128.0 / 255.0));
    }

    #[rstest::rstest]
    #[case("fff")]
    #[case("ff0000ff00")]
    #[case("")]
    fn test_wrong_length_is_invalid_for_every_channel(#[case] value: &str) {
        assert!((0..4).all(|index| to_color(value, index).is_none()));
    }

    #[rstest::rstest]
    fn test_non_hex_digits_are_invalid() {
        assert_eq!(to_color("zz0000ff", 0), None);
        assert_eq!(to_color("+f0000ff", 0), None);
        assert_eq!(to_color("zz0000ff", 1), Some(0.0));
        assert!(Color::from_hex("ff00zzff").is_none());
    }

    #[rstest::rstest]
    fn test_from_hex() {
        let color = Color::from_hex("00ff00ff").unwrap();
        assert_eq!(
            color,
            Color {
                r: 0.0,
                g: 1.0,
                b: 0.0,
                a: 1.0
            }
        );
        assert_eq!(SlotData::new("s", 0).color, Color::WHITE);
    }
}
