//! RGBA colors shared by color literals and runtime values.

use std::fmt;

/// An 8-bit-per-channel RGBA color.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

/// Error returned by [`Color::from_hex`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColorParseError {
    /// The literal does not have 3, 4, 6 or 8 digits.
    InvalidLength(usize),
    /// The literal contains a character that is not a hex digit.
    InvalidDigit(char),
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorParseError::InvalidLength(n) => {
                write!(f, "color literal must have 3, 4, 6 or 8 hex digits, found {n}")
            }
            ColorParseError::InvalidDigit(c) => write!(f, "`{c}` is not a hex digit"),
        }
    }
}

impl std::error::Error for ColorParseError {}

impl Color {
    pub const TRANSPARENT: Color = Color::from_rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::from_rgb(0, 0, 0);
    pub const WHITE: Color = Color::from_rgb(0xff, 0xff, 0xff);

    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Color {
        Color::from_rgba(red, green, blue, 0xff)
    }

    pub const fn from_rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Color {
        Color {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Parse the digits of a color literal (without the leading `#`).
    ///
    /// Short forms expand each digit: `#f80` is `#ff8800`.
    pub fn from_hex(digits: &str) -> Result<Color, ColorParseError> {
        let mut nibbles = Vec::with_capacity(8);
        for c in digits.chars() {
            let Some(v) = c.to_digit(16) else {
                return Err(ColorParseError::InvalidDigit(c));
            };
            // to_digit(16) is always < 16
            nibbles.push(u8::try_from(v).unwrap_or(0));
        }
        let byte = |hi: u8, lo: u8| (hi << 4) | lo;
        match nibbles.as_slice() {
            [r, g, b] => Ok(Color::from_rgb(byte(*r, *r), byte(*g, *g), byte(*b, *b))),
            [r, g, b, a] => Ok(Color::from_rgba(
                byte(*r, *r),
                byte(*g, *g),
                byte(*b, *b),
                byte(*a, *a),
            )),
            [r1, r2, g1, g2, b1, b2] => {
                Ok(Color::from_rgb(byte(*r1, *r2), byte(*g1, *g2), byte(*b1, *b2)))
            }
            [r1, r2, g1, g2, b1, b2, a1, a2] => Ok(Color::from_rgba(
                byte(*r1, *r2),
                byte(*g1, *g2),
                byte(*b1, *b2),
                byte(*a1, *a2),
            )),
            other => Err(ColorParseError::InvalidLength(other.len())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.red, self.green, self.blue, self.alpha
        )
    }
}
