//! WCAG contrast checks and lightness adjustment.

use crate::colour::Colour;
use crate::error::ColourError;

/// Minimum contrast ratio for normal body text (WCAG AA).
pub const MIN_CONTRAST_RATIO: f64 = 4.5;

/// Contrast ratio between two colours, from `1.0` (identical luminance) to
/// `21.0` (black on white). Argument order does not matter.
#[must_use]
pub fn contrast_ratio(first: &Colour, second: &Colour) -> f64 {
    let (a, b) = (first.luminance(), second.luminance());
    let (lighter, darker) = if a >= b { (a, b) } else { (b, a) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Whether `ratio` satisfies [`MIN_CONTRAST_RATIO`]. The boundary passes.
#[must_use]
pub const fn meets_contrast(ratio: f64) -> bool {
    ratio >= MIN_CONTRAST_RATIO
}

/// Parse two colours and report whether they are readable against each other.
///
/// # Errors
///
/// Returns [`ColourError`] when either colour cannot be parsed.
///
/// # Examples
/// ```
/// use colour_scheme::validate_contrast;
///
/// assert_eq!(validate_contrast("#000000", "#ffffff"), Ok(true));
/// assert_eq!(validate_contrast("#777777", "#888888"), Ok(false));
/// ```
pub fn validate_contrast(first: &str, second: &str) -> Result<bool, ColourError> {
    let foreground: Colour = first.parse()?;
    let background: Colour = second.parse()?;
    Ok(meets_contrast(contrast_ratio(&foreground, &background)))
}

/// Parse `colour`, set its HSL lightness to `target` (clamped to `[0, 1]`)
/// and return the result as hex.
///
/// # Errors
///
/// Returns [`ColourError`] when the colour cannot be parsed.
pub fn adjust_lightness(colour: &str, target: f64) -> Result<String, ColourError> {
    let parsed: Colour = colour.parse()?;
    Ok(parsed.with_lightness(target).to_hex())
}
