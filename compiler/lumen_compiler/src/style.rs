//! Widget styles.
//!
//! A style is chosen by name on the compiler (`fluent`, `material-dark`,
//! ...). The name is only validated when a build starts; the resolved
//! [`Style`] then selects the palette used by the `std-widgets.lumen`
//! library.

use std::fmt;
use std::str::FromStr;

use lumen_diagnostic::suggest::suggest_similar;
use lumen_ir::Color;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum StyleFamily {
    #[default]
    Fluent,
    Material,
    Cupertino,
    Cosmic,
}

impl StyleFamily {
    pub const ALL: [StyleFamily; 4] = [
        StyleFamily::Fluent,
        StyleFamily::Material,
        StyleFamily::Cupertino,
        StyleFamily::Cosmic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StyleFamily::Fluent => "fluent",
            StyleFamily::Material => "material",
            StyleFamily::Cupertino => "cupertino",
            StyleFamily::Cosmic => "cosmic",
        }
    }
}

/// Light or dark variant. `System` follows the platform preference, which
/// is light on the headless platform.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ColorScheme {
    #[default]
    System,
    Light,
    Dark,
}

/// A resolved widget style.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub family: StyleFamily,
    pub scheme: ColorScheme,
}

/// Every name accepted by [`Style::from_str`].
pub const STYLE_NAMES: &[&str] = &[
    "native",
    "fluent",
    "fluent-light",
    "fluent-dark",
    "material",
    "material-light",
    "material-dark",
    "cupertino",
    "cupertino-light",
    "cupertino-dark",
    "cosmic",
    "cosmic-light",
    "cosmic-dark",
];

/// Error for a style name that is not in [`STYLE_NAMES`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownStyle {
    pub name: String,
    pub suggestion: Option<&'static str>,
}

impl fmt::Display for UnknownStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown style `{}`", self.name)
    }
}

impl std::error::Error for UnknownStyle {}

impl FromStr for Style {
    type Err = UnknownStyle;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        if name == "native" {
            // The headless platform has no native look; fluent stands in
            return Ok(Style::default());
        }
        let (family_name, scheme) = if let Some(base) = name.strip_suffix("-light") {
            (base, ColorScheme::Light)
        } else if let Some(base) = name.strip_suffix("-dark") {
            (base, ColorScheme::Dark)
        } else {
            (name, ColorScheme::System)
        };
        StyleFamily::ALL
            .into_iter()
            .find(|family| family.as_str() == family_name)
            .map(|family| Style { family, scheme })
            .ok_or_else(|| UnknownStyle {
                name: name.to_string(),
                suggestion: suggest_similar(name, STYLE_NAMES.iter().copied()),
            })
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.family.as_str())?;
        match self.scheme {
            ColorScheme::System => Ok(()),
            ColorScheme::Light => f.write_str("-light"),
            ColorScheme::Dark => f.write_str("-dark"),
        }
    }
}

/// Colors the standard widgets are drawn with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub accent: Color,
    pub accent_pressed: Color,
    pub border: Color,
    /// Corner radius of buttons and fields, in logical pixels.
    pub radius: u32,
}

impl Style {
    pub fn is_dark(self) -> bool {
        self.scheme == ColorScheme::Dark
    }

    pub fn palette(self) -> Palette {
        let rgb = Color::from_rgb;
        let (accent, accent_pressed, radius) = match self.family {
            StyleFamily::Fluent => (rgb(0x00, 0x5f, 0xb8), rgb(0x00, 0x4c, 0x93), 4),
            StyleFamily::Material => (rgb(0x67, 0x50, 0xa4), rgb(0x52, 0x40, 0x83), 20),
            StyleFamily::Cupertino => (rgb(0x00, 0x7a, 0xff), rgb(0x00, 0x62, 0xcc), 6),
            StyleFamily::Cosmic => (rgb(0x6a, 0xcb, 0xd3), rgb(0x55, 0xa2, 0xa9), 8),
        };
        if self.is_dark() {
            Palette {
                background: Color::from_rgb(0x20, 0x20, 0x20),
                foreground: Color::WHITE,
                accent,
                accent_pressed,
                border: Color::from_rgb(0x3c, 0x3c, 0x3c),
                radius,
            }
        } else {
            Palette {
                background: Color::from_rgb(0xfa, 0xfa, 0xfa),
                foreground: Color::from_rgb(0x1a, 0x1a, 0x1a),
                accent,
                accent_pressed,
                border: Color::from_rgb(0xd1, 0xd1, 0xd1),
                radius,
            }
        }
    }
}
