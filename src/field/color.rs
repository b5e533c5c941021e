use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error;

/// An 8-bit RGB colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl From<colorous::Color> for Rgb {
    fn from(color: colorous::Color) -> Self {
        Rgb {
            r: color.r,
            g: color.g,
            b: color.b,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", color_to_hex(*self))
    }
}

/// Convert a colour to a 6 digit hex string
/// # Examples
///
/// ```
/// # use glyphfield::field::color::{color_to_hex, Rgb};
/// assert_eq!(color_to_hex(Rgb {r: 255, g: 127, b: 0}), "#ff7f00");
/// ```
pub fn color_to_hex(color: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

/// Convert a colour to an X3D `SFColor` string with components in `[0, 1]`.
pub fn color_to_x3d(color: Rgb) -> String {
    format!(
        "{:.3} {:.3} {:.3}",
        color.r as f64 / 255.0,
        color.g as f64 / 255.0,
        color.b as f64 / 255.0
    )
}

/// Parse `#rrggbb`, `rrggbb` or `hexrrggbb`.
pub fn parse_hex(color: &str) -> Result<Rgb, error::Error> {
    let hexcode = color.trim().replace("hex", "#");
    let digits = hexcode.trim_start_matches('#');
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(error::Error::InvalidColor(color.to_string()));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|_| error::Error::InvalidColor(color.to_string()))
    };
    Ok(Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

/// Named continuous colour interpolators.
#[derive(ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Palette {
    #[default]
    RedYellowGreen,
    RedYellowBlue,
    RedBlue,
    Spectral,
    Viridis,
    Plasma,
    Inferno,
    Magma,
    Cividis,
    Turbo,
    Blues,
}

impl Palette {
    pub fn gradient(self) -> colorous::Gradient {
        match self {
            Palette::RedYellowGreen => colorous::RED_YELLOW_GREEN,
            Palette::RedYellowBlue => colorous::RED_YELLOW_BLUE,
            Palette::RedBlue => colorous::RED_BLUE,
            Palette::Spectral => colorous::SPECTRAL,
            Palette::Viridis => colorous::VIRIDIS,
            Palette::Plasma => colorous::PLASMA,
            Palette::Inferno => colorous::INFERNO,
            Palette::Magma => colorous::MAGMA,
            Palette::Cividis => colorous::CIVIDIS,
            Palette::Turbo => colorous::TURBO,
            Palette::Blues => colorous::BLUES,
        }
    }
}

/// Colours used by the colour scale: a named interpolator or a custom
/// list interpolated piecewise in RGB.
#[derive(Clone, Debug, PartialEq)]
pub enum Colors {
    Interpolator(Palette),
    Custom(Vec<Rgb>),
}

impl Default for Colors {
    fn default() -> Colors {
        Colors::Interpolator(Palette::default())
    }
}

impl Colors {
    pub fn from_hex_list(list: &[String]) -> Result<Colors, error::Error> {
        if list.is_empty() {
            return Err(error::Error::InvalidColor("empty colour list".to_string()));
        }
        let colors = list
            .iter()
            .map(|hex| parse_hex(hex))
            .collect::<Result<Vec<Rgb>, error::Error>>()?;
        Ok(Colors::Custom(colors))
    }

    /// Sample the scheme at `t`, clamped to `[0, 1]`.
    pub fn interpolate(&self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
        match self {
            Colors::Interpolator(palette) => palette.gradient().eval_continuous(t).into(),
            Colors::Custom(list) => match list.len() {
                0 => Rgb::default(),
                1 => list[0],
                n => {
                    let position = t * (n - 1) as f64;
                    let i = (position.floor() as usize).min(n - 2);
                    let local = position - i as f64;
                    let lerp = |a: u8, b: u8| {
                        (a as f64 + (b as f64 - a as f64) * local).round() as u8
                    };
                    Rgb {
                        r: lerp(list[i].r, list[i + 1].r),
                        g: lerp(list[i].g, list[i + 1].g),
                        b: lerp(list[i].b, list[i + 1].b),
                    }
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#ff7f00").unwrap(), Rgb { r: 255, g: 127, b: 0 });
        assert_eq!(parse_hex("hex0000ff").unwrap(), Rgb { r: 0, g: 0, b: 255 });
        assert!(parse_hex("#ff7f0").is_err());
        assert!(parse_hex("purple").is_err());
    }

    #[test]
    fn test_color_to_x3d() {
        assert_eq!(color_to_x3d(Rgb { r: 255, g: 0, b: 51 }), "1.000 0.000 0.200");
    }

    #[test]
    fn test_custom_interpolation() {
        let colors = Colors::from_hex_list(&[
            "#000000".to_string(),
            "#ff0000".to_string(),
            "#ffffff".to_string(),
        ])
        .unwrap();
        assert_eq!(colors.interpolate(0.0), Rgb { r: 0, g: 0, b: 0 });
        assert_eq!(colors.interpolate(0.25), Rgb { r: 128, g: 0, b: 0 });
        assert_eq!(colors.interpolate(0.5), Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(colors.interpolate(1.0), Rgb { r: 255, g: 255, b: 255 });
        assert_eq!(colors.interpolate(7.0), Rgb { r: 255, g: 255, b: 255 });
    }

    #[test]
    fn test_named_palette_ends_differ() {
        let colors = Colors::default();
        let low = colors.interpolate(0.0);
        let high = colors.interpolate(1.0);
        assert_ne!(low, high);
        // red end of red-yellow-green
        assert!(low.r > low.g);
        assert!(high.g > high.r);
    }
}
