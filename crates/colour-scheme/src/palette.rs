//! Five-colour palettes ordered by luminance.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::colour::Colour;
use crate::error::ColourError;
use crate::scheme::{PALETTE_SIZE, Scheme};

/// How a palette was derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteMetadata {
    /// The colour the scheme was applied to.
    #[serde(rename = "baseColor")]
    pub base_colour: Colour,
    /// The scheme that produced the palette.
    pub scheme: Scheme,
}

/// Exactly five colours plus their derivation metadata.
///
/// ## Invariants
/// - colours are sorted by non-decreasing [`Colour::luminance`], whatever
///   order the scheme produced them in.
///
/// # Examples
/// ```
/// use colour_scheme::{Colour, Palette, Scheme};
///
/// let base: Colour = "#3498db".parse().expect("valid colour");
/// let palette = Palette::from_scheme(base, Scheme::Monochromatic);
/// let luminances: Vec<f64> = palette.colours().iter().map(Colour::luminance).collect();
/// assert!(luminances.is_sorted());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PaletteDto", into = "PaletteDto")]
pub struct Palette {
    colours: [Colour; PALETTE_SIZE],
    metadata: PaletteMetadata,
}

impl Palette {
    /// Apply `scheme` to `base` and sort the result by luminance.
    #[must_use]
    pub fn from_scheme(base: Colour, scheme: Scheme) -> Self {
        let mut colours = scheme.derive(&base);
        sort_by_luminance(&mut colours);
        Self {
            colours,
            metadata: PaletteMetadata {
                base_colour: base,
                scheme,
            },
        }
    }

    /// Parse an optional seed and apply `scheme`; a missing seed is replaced
    /// by a random colour drawn from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`ColourError`] when the seed cannot be parsed.
    pub fn try_generate<R: Rng + ?Sized>(
        seed: Option<&str>,
        scheme: Scheme,
        rng: &mut R,
    ) -> Result<Self, ColourError> {
        let base = match seed {
            Some(raw) => raw.parse::<Colour>()?,
            None => Colour::random(rng),
        };
        Ok(Self::from_scheme(base, scheme))
    }

    /// Like [`Palette::try_generate`] with a randomly chosen scheme.
    ///
    /// # Errors
    ///
    /// Returns [`ColourError`] when the seed cannot be parsed.
    pub fn try_generate_random<R: Rng + ?Sized>(
        seed: Option<&str>,
        rng: &mut R,
    ) -> Result<Self, ColourError> {
        let scheme = Scheme::random(rng);
        Self::try_generate(seed, scheme, rng)
    }

    /// Colours ordered darkest first.
    #[must_use]
    pub const fn colours(&self) -> &[Colour; PALETTE_SIZE] {
        &self.colours
    }

    /// Colours rendered as `#rrggbb` strings, darkest first.
    #[must_use]
    pub fn hex_colours(&self) -> Vec<String> {
        self.colours.iter().map(Colour::to_hex).collect()
    }

    /// Derivation metadata.
    #[must_use]
    pub const fn metadata(&self) -> &PaletteMetadata {
        &self.metadata
    }

    /// The scheme that produced this palette.
    #[must_use]
    pub const fn scheme(&self) -> Scheme {
        self.metadata.scheme
    }

    /// The base colour the scheme was applied to.
    #[must_use]
    pub const fn base_colour(&self) -> Colour {
        self.metadata.base_colour
    }

    /// Whether two palettes render to the same hex sequence.
    #[must_use]
    pub fn same_colours(&self, other: &Self) -> bool {
        self.hex_colours() == other.hex_colours()
    }
}

fn sort_by_luminance(colours: &mut [Colour]) {
    colours.sort_by(|left, right| left.luminance().total_cmp(&right.luminance()));
}

/// Serialised palette shape: `{colors: [...], metadata: {baseColor, scheme}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PaletteDto {
    colors: [Colour; PALETTE_SIZE],
    metadata: PaletteMetadata,
}

impl From<Palette> for PaletteDto {
    fn from(value: Palette) -> Self {
        Self {
            colors: value.colours,
            metadata: value.metadata,
        }
    }
}

impl From<PaletteDto> for Palette {
    fn from(value: PaletteDto) -> Self {
        let mut colours = value.colors;
        sort_by_luminance(&mut colours);
        Self {
            colours,
            metadata: value.metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn deserialising_restores_luminance_order() {
        let json = r##"{
            "colors": ["#ffffff", "#000000", "#808080", "#ff0000", "#0000ff"],
            "metadata": { "baseColor": "#808080", "scheme": "monochromatic" }
        }"##;
        let palette: Palette = serde_json::from_str(json).expect("palette should decode");
        assert_eq!(
            palette.hex_colours(),
            vec!["#000000", "#0000ff", "#ff0000", "#808080", "#ffffff"]
        );
    }

    #[test]
    fn serialises_with_storage_field_names() {
        let palette = Palette::from_scheme(Colour::from_rgb8(0x34, 0x98, 0xdb), Scheme::Triadic);
        let value = serde_json::to_value(&palette).expect("palette should encode");
        assert_eq!(value["metadata"]["baseColor"], "#3498db");
        assert_eq!(value["metadata"]["scheme"], "triadic");
        assert_eq!(value["colors"].as_array().map(Vec::len), Some(PALETTE_SIZE));
    }

    #[test]
    fn random_seed_becomes_the_recorded_base() {
        let mut rng = SmallRng::seed_from_u64(3);
        let palette = Palette::try_generate(None, Scheme::Monochromatic, &mut rng)
            .expect("random generation cannot fail");
        assert!(palette.colours().contains(&palette.base_colour()));
    }

    #[test]
    fn malformed_seed_is_reported() {
        let mut rng = SmallRng::seed_from_u64(3);
        let result = Palette::try_generate(Some("#nothex"), Scheme::Analogous, &mut rng);
        assert!(matches!(result, Err(ColourError::InvalidHex { .. })));
    }
}
