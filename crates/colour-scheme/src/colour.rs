//! The [`Colour`] value type and its perceptual transforms.
//!
//! Colours are stored as gamut-clipped sRGB components in `[0, 1]` without
//! rounding, so chains of transforms do not accumulate quantisation error.
//! Rounding to 8-bit channels only happens when rendering hex.

use std::fmt;
use std::str::FromStr;

use palette::encoding;
use palette::white_point::D65;
use palette::{FromColor, Hsl, Lab, RgbHue, Srgb};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ColourError;
use crate::parse::parse_colour;

/// Lab lightness step applied per unit of [`Colour::brighten`] or
/// [`Colour::darken`].
pub const LIGHTNESS_STEP: f64 = 18.0;

type SrgbHsl = Hsl<encoding::Srgb, f64>;

/// An sRGB colour.
///
/// ## Invariants
/// - every channel is finite and within `[0, 1]`.
///
/// # Examples
/// ```
/// use colour_scheme::Colour;
///
/// let colour: Colour = "#3498db".parse().expect("valid hex");
/// assert_eq!(colour.to_hex(), "#3498db");
/// assert_eq!(colour.darken(0.0), colour);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour {
    rgb: Srgb<f64>,
}

impl Colour {
    /// Build a colour from 8-bit channels.
    #[must_use]
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::from_srgb(Srgb::new(red, green, blue).into_format())
    }

    /// Build a colour from unit-range channels; values are clipped to `[0, 1]`.
    #[must_use]
    pub fn from_rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::from_srgb(Srgb::new(red, green, blue))
    }

    /// Build a colour from HSL: hue in degrees, saturation and lightness in
    /// `[0, 1]`.
    #[must_use]
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
        let hsl = SrgbHsl::new(
            RgbHue::from_degrees(hue.rem_euclid(360.0)),
            unit(saturation),
            unit(lightness),
        );
        Self::from_srgb(Srgb::from_color(hsl))
    }

    /// Pick a uniformly random 24-bit colour.
    #[must_use]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let [red, green, blue]: [u8; 3] = rng.r#gen();
        Self::from_rgb8(red, green, blue)
    }

    fn from_srgb(rgb: Srgb<f64>) -> Self {
        Self {
            rgb: Srgb::new(unit(rgb.red), unit(rgb.green), unit(rgb.blue)),
        }
    }

    fn hsl(&self) -> SrgbHsl {
        SrgbHsl::from_color(self.rgb)
    }

    fn lab(&self) -> Lab<D65, f64> {
        Lab::from_color(self.rgb)
    }

    /// HSL hue in degrees within `[0, 360)`. Achromatic colours report `0`.
    #[must_use]
    pub fn hue(&self) -> f64 {
        self.hsl().hue.into_degrees().rem_euclid(360.0)
    }

    /// HSL saturation in `[0, 1]`.
    #[must_use]
    pub fn saturation(&self) -> f64 {
        self.hsl().saturation
    }

    /// HSL lightness in `[0, 1]`.
    #[must_use]
    pub fn lightness(&self) -> f64 {
        self.hsl().lightness
    }

    /// Replace the HSL hue, keeping saturation and lightness. The hue is
    /// reduced modulo 360 first, so `350 + 30` lands on `20`.
    #[must_use]
    pub fn with_hue(&self, degrees: f64) -> Self {
        let mut hsl = self.hsl();
        hsl.hue = RgbHue::from_degrees(degrees.rem_euclid(360.0));
        Self::from_srgb(Srgb::from_color(hsl))
    }

    /// Rotate the HSL hue by `offset` degrees.
    #[must_use]
    pub fn rotate_hue(&self, offset: f64) -> Self {
        self.with_hue(self.hue() + offset)
    }

    /// Replace the HSL lightness with `lightness`, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_lightness(&self, lightness: f64) -> Self {
        let mut hsl = self.hsl();
        hsl.lightness = unit(lightness);
        Self::from_srgb(Srgb::from_color(hsl))
    }

    /// Raise Lab lightness by `amount` steps of [`LIGHTNESS_STEP`].
    ///
    /// Negative amounts darken. The result is clipped to the sRGB gamut, so
    /// repeated brightening saturates at white.
    #[must_use]
    pub fn brighten(&self, amount: f64) -> Self {
        let mut lab = self.lab();
        lab.l += LIGHTNESS_STEP * amount;
        Self::from_srgb(Srgb::from_color(lab))
    }

    /// Lower Lab lightness by `amount` steps of [`LIGHTNESS_STEP`].
    #[must_use]
    pub fn darken(&self, amount: f64) -> Self {
        self.brighten(-amount)
    }

    /// WCAG 2.0 relative luminance in `[0, 1]`.
    #[must_use]
    pub fn luminance(&self) -> f64 {
        0.2126 * linear_channel(self.rgb.red)
            + 0.7152 * linear_channel(self.rgb.green)
            + 0.0722 * linear_channel(self.rgb.blue)
    }

    /// Channels rounded to 8 bits.
    #[must_use]
    pub fn to_rgb8(&self) -> [u8; 3] {
        [
            channel_to_u8(self.rgb.red),
            channel_to_u8(self.rgb.green),
            channel_to_u8(self.rgb.blue),
        ]
    }

    /// Lowercase `#rrggbb` rendering.
    #[must_use]
    pub fn to_hex(&self) -> String {
        let [red, green, blue] = self.to_rgb8();
        format!("#{red:02x}{green:02x}{blue:02x}")
    }
}

fn unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn linear_channel(value: f64) -> f64 {
    if value <= 0.039_28 {
        value / 12.92
    } else {
        ((value + 0.055) / 1.055).powf(2.4)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "channel is clamped to [0, 255] before the cast"
)]
fn channel_to_u8(value: f64) -> u8 {
    (unit(value) * 255.0).round() as u8
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Colour {
    type Err = ColourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_colour(s)
    }
}

impl From<Colour> for String {
    fn from(value: Colour) -> Self {
        value.to_hex()
    }
}

impl TryFrom<String> for Colour {
    type Error = ColourError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_colour(&value)
    }
}
