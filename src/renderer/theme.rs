//! Theme-aware color resolution
//!
//! Config colors are either literal CSS hex strings or symbolic tokens that
//! follow the host page's light/dark theme. Resolution happens on every
//! paint so a theme flip only needs a repaint.

use serde::{Deserialize, Serialize};

/// Active page theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Interpret a `class`/`data-theme` attribute value
    pub fn from_attribute(value: &str) -> Self {
        if value.split_whitespace().any(|c| c.eq_ignore_ascii_case("dark")) {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

/// Symbolic palette entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThemeToken {
    Background,
    Foreground,
    Muted,
    Accent,
    Border,
    Destructive,
}

/// A configured color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Token(ThemeToken),
    Literal(String),
}

impl ColorSpec {
    pub fn hex(value: &str) -> Self {
        ColorSpec::Literal(value.to_string())
    }
}

impl From<ThemeToken> for ColorSpec {
    fn from(token: ThemeToken) -> Self {
        ColorSpec::Token(token)
    }
}

/// Concrete color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS color string for canvas `fillStyle`
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, self.a)
        }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`
    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.trim().strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut it = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
                Some(Self::rgb(it.next()??, it.next()??, it.next()??))
            }
            6 => Some(Self::rgb(byte(&hex[0..2])?, byte(&hex[2..4])?, byte(&hex[4..6])?)),
            8 => {
                let a = byte(&hex[6..8])? as f32 / 255.0;
                Some(Self::rgb(byte(&hex[0..2])?, byte(&hex[2..4])?, byte(&hex[4..6])?).with_alpha(a))
            }
            _ => None,
        }
    }
}

/// Palette entry for a token under a theme
pub fn token_color(token: ThemeToken, theme: Theme) -> Rgba {
    match (theme, token) {
        (Theme::Light, ThemeToken::Background) => Rgba::rgb(0xff, 0xff, 0xff),
        (Theme::Light, ThemeToken::Foreground) => Rgba::rgb(0x0a, 0x0a, 0x0a),
        (Theme::Light, ThemeToken::Muted) => Rgba::rgb(0x71, 0x71, 0x7a),
        (Theme::Light, ThemeToken::Accent) => Rgba::rgb(0x25, 0x63, 0xeb),
        (Theme::Light, ThemeToken::Border) => Rgba::rgb(0xe4, 0xe4, 0xe7),
        (Theme::Light, ThemeToken::Destructive) => Rgba::rgb(0xdc, 0x26, 0x26),
        (Theme::Dark, ThemeToken::Background) => Rgba::rgb(0x0a, 0x0a, 0x0a),
        (Theme::Dark, ThemeToken::Foreground) => Rgba::rgb(0xfa, 0xfa, 0xfa),
        (Theme::Dark, ThemeToken::Muted) => Rgba::rgb(0xa1, 0xa1, 0xaa),
        (Theme::Dark, ThemeToken::Accent) => Rgba::rgb(0x60, 0xa5, 0xfa),
        (Theme::Dark, ThemeToken::Border) => Rgba::rgb(0x27, 0x27, 0x2a),
        (Theme::Dark, ThemeToken::Destructive) => Rgba::rgb(0xf8, 0x71, 0x71),
    }
}

/// Resolve a configured color; unparseable literals fall back to the foreground
pub fn resolve(spec: &ColorSpec, theme: Theme) -> Rgba {
    match spec {
        ColorSpec::Token(token) => token_color(*token, theme),
        ColorSpec::Literal(value) => Rgba::parse_hex(value).unwrap_or_else(|| {
            log::warn!("Unparseable color {:?}, using foreground", value);
            token_color(ThemeToken::Foreground, theme)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(Rgba::parse_hex("#fff"), Some(Rgba::rgb(255, 255, 255)));
        assert_eq!(Rgba::parse_hex("#10b981"), Some(Rgba::rgb(0x10, 0xb9, 0x81)));
        let translucent = Rgba::parse_hex("#00000080").unwrap();
        assert!((translucent.a - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(Rgba::parse_hex("red"), None);
        assert_eq!(Rgba::parse_hex("#12345"), None);
        assert_eq!(Rgba::parse_hex("#ggg"), None);
    }

    #[test]
    fn test_tokens_follow_theme() {
        let spec = ColorSpec::Token(ThemeToken::Foreground);
        assert_ne!(resolve(&spec, Theme::Light), resolve(&spec, Theme::Dark));

        let literal = ColorSpec::hex("#123456");
        assert_eq!(resolve(&literal, Theme::Light), resolve(&literal, Theme::Dark));
    }

    #[test]
    fn test_color_spec_json() {
        let token: ColorSpec = serde_json::from_str("\"accent\"").unwrap();
        assert_eq!(token, ColorSpec::Token(ThemeToken::Accent));
        let literal: ColorSpec = serde_json::from_str("\"#ff0000\"").unwrap();
        assert_eq!(literal, ColorSpec::hex("#ff0000"));
    }

    #[test]
    fn test_theme_attribute() {
        assert_eq!(Theme::from_attribute("font-sans dark"), Theme::Dark);
        assert_eq!(Theme::from_attribute("light"), Theme::Light);
        assert_eq!(Theme::from_attribute(""), Theme::Light);
    }

    #[test]
    fn test_css_output() {
        assert_eq!(Rgba::rgb(255, 0, 16).to_css(), "#ff0010");
        assert_eq!(Rgba::rgb(0, 0, 0).with_alpha(0.5).to_css(), "rgba(0, 0, 0, 0.500)");
    }
}
