//! Named colour schemes and their geometric offsets.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::colour::Colour;
use crate::error::ColourError;

/// Number of colours produced by every scheme.
pub const PALETTE_SIZE: usize = 5;

/// A rule for deriving related colours from a base colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scheme {
    /// Neighbouring hues at 30° steps.
    Analogous,
    /// Hues spaced 120° apart plus brightened variants.
    Triadic,
    /// The base against its 180° complement, darkened and brightened.
    Complementary,
    /// The base against the two hues flanking its complement.
    SplitComplementary,
    /// One hue at five lightness steps.
    Monochromatic,
}

impl Scheme {
    /// Every scheme, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Analogous,
        Self::Triadic,
        Self::Complementary,
        Self::SplitComplementary,
        Self::Monochromatic,
    ];

    /// Kebab-case name used in storage and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Analogous => "analogous",
            Self::Triadic => "triadic",
            Self::Complementary => "complementary",
            Self::SplitComplementary => "split-complementary",
            Self::Monochromatic => "monochromatic",
        }
    }

    /// Pick a scheme uniformly at random.
    #[must_use]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL
            .choose(rng)
            .copied()
            .unwrap_or(Self::Complementary)
    }

    /// Derive the five unsorted colours of this scheme from `base`.
    ///
    /// Callers normally want [`crate::Palette::from_scheme`], which also
    /// applies luminance ordering.
    #[must_use]
    pub fn derive(self, base: &Colour) -> [Colour; PALETTE_SIZE] {
        let hue = base.hue();
        match self {
            Self::Analogous => [
                base.with_hue(hue - 30.0),
                *base,
                base.with_hue(hue + 30.0),
                base.with_hue(hue + 60.0),
                base.with_hue(hue + 90.0),
            ],
            Self::Triadic => {
                let second = base.with_hue(hue + 120.0);
                let third = base.with_hue(hue + 240.0);
                [*base, second, third, second.brighten(1.0), third.brighten(1.0)]
            }
            Self::Complementary => {
                let complement = base.with_hue(hue + 180.0);
                [
                    base.darken(1.5),
                    *base,
                    base.brighten(1.0),
                    complement.darken(0.5),
                    complement.brighten(1.0),
                ]
            }
            Self::SplitComplementary => {
                let left = base.with_hue(hue + 150.0);
                let right = base.with_hue(hue + 210.0);
                [*base, left, right, left.brighten(1.0), right.brighten(1.0)]
            }
            Self::Monochromatic => [
                base.darken(2.0),
                base.darken(1.0),
                *base,
                base.brighten(1.0),
                base.brighten(2.0),
            ],
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = ColourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|scheme| scheme.as_str() == wanted)
            .ok_or_else(|| ColourError::UnknownScheme { name: s.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rstest::rstest;

    #[rstest]
    #[case("analogous", Scheme::Analogous)]
    #[case("Triadic", Scheme::Triadic)]
    #[case("split-complementary", Scheme::SplitComplementary)]
    #[case("split_complementary", Scheme::SplitComplementary)]
    #[case(" monochromatic ", Scheme::Monochromatic)]
    fn parses_scheme_names(#[case] raw: &str, #[case] expected: Scheme) {
        assert_eq!(raw.parse::<Scheme>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_scheme_names() {
        assert_eq!(
            "tetradic".parse::<Scheme>(),
            Err(ColourError::UnknownScheme {
                name: "tetradic".to_owned()
            })
        );
    }

    #[test]
    fn names_round_trip_through_display() {
        for scheme in Scheme::ALL {
            assert_eq!(scheme.to_string().parse::<Scheme>(), Ok(scheme));
        }
    }

    #[test]
    fn random_selection_covers_every_scheme() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(Scheme::random(&mut rng));
        }
        assert_eq!(seen.len(), Scheme::ALL.len());
    }

    #[test]
    fn analogous_wraps_hues_past_360() {
        let base = Colour::from_hsl(350.0, 0.8, 0.5);
        let hues: Vec<f64> = Scheme::Analogous
            .derive(&base)
            .iter()
            .map(Colour::hue)
            .collect();
        for expected in [320.0, 350.0, 20.0, 50.0, 80.0] {
            assert!(
                hues.iter().any(|hue| (hue - expected).abs() < 1e-6),
                "expected hue {expected} in {hues:?}"
            );
        }
        assert!(hues.iter().all(|hue| (0.0..360.0).contains(hue)));
    }

    #[test]
    fn monochromatic_keeps_the_base_in_the_middle() {
        let base = Colour::from_rgb8(0x34, 0x98, 0xdb);
        let colours = Scheme::Monochromatic.derive(&base);
        assert_eq!(colours.get(2), Some(&base));
    }
}
