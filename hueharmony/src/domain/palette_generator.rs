//! Palette generation for the shell.
//!
//! Wraps the `colour-scheme` engine with the randomness source and the
//! "log and return nothing" failure policy the UI expects: a failed
//! generation is never shown as an empty or partial palette.

use colour_scheme::{Colour, ColourError, Palette, Scheme};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, warn};

/// Stateful generator owning its random source.
///
/// # Examples
/// ```
/// use hueharmony::domain::PaletteGenerator;
///
/// let mut generator = PaletteGenerator::seeded(7);
/// let palette = generator.generate_palette(Some("#3498db")).expect("valid seed");
/// assert_eq!(palette.hex_colours().len(), 5);
/// assert!(generator.generate_palette(Some("not a colour")).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct PaletteGenerator {
    rng: SmallRng,
}

impl PaletteGenerator {
    /// Generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Reproducible generator for tests and demos.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Generate a palette with a random scheme. A missing seed picks a
    /// random base colour. Failures are logged and yield `None`.
    pub fn generate_palette(&mut self, seed: Option<&str>) -> Option<Palette> {
        let scheme = Scheme::random(&mut self.rng);
        self.generate_with(seed, scheme)
    }

    /// Like [`PaletteGenerator::generate_palette`] with a fixed scheme.
    pub fn generate_with(&mut self, seed: Option<&str>, scheme: Scheme) -> Option<Palette> {
        match self.try_generate(seed, scheme) {
            Ok(palette) => {
                debug!(
                    scheme = %palette.scheme(),
                    base = %palette.base_colour(),
                    "generated palette"
                );
                Some(palette)
            }
            Err(error) => {
                warn!(%error, seed = seed.unwrap_or_default(), %scheme, "palette generation failed");
                None
            }
        }
    }

    /// Fallible core shared by the generating helpers.
    ///
    /// # Errors
    ///
    /// Returns [`ColourError`] when the seed cannot be parsed.
    pub fn try_generate(
        &mut self,
        seed: Option<&str>,
        scheme: Scheme,
    ) -> Result<Palette, ColourError> {
        Palette::try_generate(seed, scheme, &mut self.rng)
    }
}

impl Default for PaletteGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Deterministically apply `scheme` to `base`.
pub fn generate_scheme(base: Colour, scheme: Scheme) -> Palette {
    Palette::from_scheme(base, scheme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None)]
    #[case(Some("#3498db"))]
    #[case(Some("navy"))]
    #[case(Some("hsl(350, 80%, 50%)"))]
    fn generated_palettes_have_five_sorted_colours(#[case] seed: Option<&str>) {
        let mut generator = PaletteGenerator::seeded(5);
        for _ in 0..20 {
            let Some(palette) = generator.generate_palette(seed) else {
                panic!("generation should succeed for {seed:?}");
            };
            let luminances: Vec<f64> = palette.colours().iter().map(Colour::luminance).collect();
            assert_eq!(luminances.len(), 5);
            assert!(luminances.is_sorted());
        }
    }

    #[rstest]
    fn missing_seed_never_fails() {
        let mut generator = PaletteGenerator::seeded(99);
        for _ in 0..100 {
            assert!(generator.generate_palette(None).is_some());
        }
    }

    #[rstest]
    #[case("")]
    #[case("#12")]
    #[case("definitely-not-a-colour")]
    fn malformed_seed_yields_none(#[case] seed: &str) {
        let mut generator = PaletteGenerator::seeded(1);
        assert!(generator.generate_palette(Some(seed)).is_none());
    }

    #[rstest]
    fn fixed_scheme_is_recorded() {
        let mut generator = PaletteGenerator::seeded(1);
        let palette = generator
            .generate_with(Some("#3498db"), Scheme::SplitComplementary)
            .expect("valid seed");
        assert_eq!(palette.scheme(), Scheme::SplitComplementary);
        assert_eq!(palette.base_colour().to_hex(), "#3498db");
    }
}
