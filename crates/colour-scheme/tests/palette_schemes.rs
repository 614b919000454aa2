//! Property-style checks over every scheme and a spread of seed colours.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use colour_scheme::{Colour, PALETTE_SIZE, Palette, Scheme};
use insta::assert_json_snapshot;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rstest::rstest;

fn assert_sorted_by_luminance(palette: &Palette) {
    let luminances: Vec<f64> = palette.colours().iter().map(Colour::luminance).collect();
    assert!(
        luminances.is_sorted(),
        "palette {:?} is not ordered by luminance: {luminances:?}",
        palette.hex_colours()
    );
}

#[rstest]
fn every_scheme_yields_five_sorted_colours(
    #[values("#3498db", "#000000", "#ffffff", "#808080", "#ff0000", "#f1c40f", "tomato")]
    seed: &str,
    #[values(
        Scheme::Analogous,
        Scheme::Triadic,
        Scheme::Complementary,
        Scheme::SplitComplementary,
        Scheme::Monochromatic
    )]
    scheme: Scheme,
) {
    let mut rng = SmallRng::seed_from_u64(1);
    let palette = Palette::try_generate(Some(seed), scheme, &mut rng).expect("seed parses");
    assert_eq!(palette.hex_colours().len(), PALETTE_SIZE);
    assert_eq!(palette.scheme(), scheme);
    assert_sorted_by_luminance(&palette);
    for hex in palette.hex_colours() {
        assert_eq!(hex.len(), 7);
        assert!(hex.starts_with('#'));
    }
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(42)]
#[case(1_000)]
fn random_palettes_are_sorted(#[case] seed: u64) {
    let mut rng = SmallRng::seed_from_u64(seed);
    for _ in 0..50 {
        let palette = Palette::try_generate_random(None, &mut rng).expect("no seed to parse");
        assert_sorted_by_luminance(&palette);
        assert!(
            palette
                .hex_colours()
                .iter()
                .all(|hex| hex.chars().skip(1).all(|c| c.is_ascii_hexdigit()))
        );
    }
}

#[test]
fn same_base_and_scheme_are_deterministic() {
    let base: Colour = "#2ecc71".parse().expect("valid hex");
    for scheme in Scheme::ALL {
        let first = Palette::from_scheme(base, scheme);
        let second = Palette::from_scheme(base, scheme);
        assert!(first.same_colours(&second));
    }
}

#[test]
fn brand_blue_complementary_palette() {
    let base: Colour = "#3498db".parse().expect("valid hex");
    let palette = Palette::from_scheme(base, Scheme::Complementary);
    assert_json_snapshot!(palette, @r###"
    {
      "colors": [
        "#005591",
        "#bf601d",
        "#3498db",
        "#ffa761",
        "#73c9ff"
      ],
      "metadata": {
        "baseColor": "#3498db",
        "scheme": "complementary"
      }
    }
    "###);
}

#[test]
fn grey_monochromatic_palette_steps_evenly_through_lab() {
    let base: Colour = "#808080".parse().expect("valid hex");
    let palette = Palette::from_scheme(base, Scheme::Monochromatic);
    assert_eq!(
        palette.hex_colours(),
        vec!["#2b2b2b", "#545454", "#808080", "#afafaf", "#e1e1e1"]
    );
}
