//! Colour palette generation.
//!
//! A [`Palette`] is five colours derived from a base [`Colour`] by a named
//! [`Scheme`] and ordered darkest first by WCAG relative luminance. The crate
//! performs no I/O; randomness is supplied by the caller's [`rand::Rng`].
//!
//! ```
//! use colour_scheme::{Palette, Scheme};
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//!
//! let mut rng = SmallRng::seed_from_u64(42);
//! let palette = Palette::try_generate(Some("#3498db"), Scheme::Complementary, &mut rng)
//!     .expect("seed parses");
//! assert_eq!(palette.hex_colours().len(), 5);
//! assert_eq!(palette.base_colour().to_hex(), "#3498db");
//! ```

#![expect(
    clippy::float_arithmetic,
    reason = "colour space conversions are floating point throughout"
)]

mod colour;
mod contrast;
mod error;
mod palette;
mod parse;
mod scheme;

pub use colour::{Colour, LIGHTNESS_STEP};
pub use contrast::{
    MIN_CONTRAST_RATIO, adjust_lightness, contrast_ratio, meets_contrast, validate_contrast,
};
pub use error::ColourError;
pub use self::palette::{Palette, PaletteMetadata};
pub use scheme::{PALETTE_SIZE, Scheme};
