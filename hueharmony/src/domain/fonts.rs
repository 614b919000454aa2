//! Font catalogue entries and stylesheet links.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of catalogue entries kept after a fetch.
pub const FONT_CATALOG_LIMIT: usize = 50;

const STYLESHEET_BASE: &str = "https://fonts.googleapis.com/css2?family=";
const STYLESHEET_AXES: &str = ":ital,wght@0,400;0,700;1,400;1,700&display=swap";

/// Validation errors for [`FontFamily`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FontFamilyValidationError {
    /// The name was blank.
    #[error("font family must not be empty")]
    Empty,
}

/// A font family name such as `Open Sans`.
///
/// ## Invariants
/// - trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FontFamily(String);

impl FontFamily {
    /// Trim and validate a family name.
    pub fn new(raw: &str) -> Result<Self, FontFamilyValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FontFamilyValidationError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Google Fonts CSS2 URL loading regular and bold weights in upright and
    /// italic styles. Every space becomes `+`.
    ///
    /// # Examples
    /// ```
    /// use hueharmony::domain::FontFamily;
    ///
    /// let family = FontFamily::new("Noto Sans Display").unwrap();
    /// assert_eq!(
    ///     family.stylesheet_href(),
    ///     "https://fonts.googleapis.com/css2?family=Noto+Sans+Display:ital,wght@0,400;0,700;1,400;1,700&display=swap"
    /// );
    /// ```
    pub fn stylesheet_href(&self) -> String {
        format!(
            "{STYLESHEET_BASE}{}{STYLESHEET_AXES}",
            self.0.replace(' ', "+")
        )
    }
}

impl AsRef<str> for FontFamily {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<FontFamily> for String {
    fn from(value: FontFamily) -> Self {
        value.0
    }
}

impl TryFrom<String> for FontFamily {
    type Error = FontFamilyValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

/// One catalogue entry, in popularity order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontEntry {
    /// Family name.
    pub family: FontFamily,
    /// Variant identifiers such as `regular`, `700` or `italic`.
    pub variants: Vec<String>,
}
