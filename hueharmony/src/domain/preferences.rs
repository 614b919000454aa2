//! Saved palettes and fonts.
//!
//! Records are immutable once stored: they can be created and deleted but
//! never updated. Each user keeps at most [`SAVED_ITEM_CAPACITY`] of each
//! kind.

use std::fmt;

use chrono::{DateTime, Utc};
use colour_scheme::Palette;
use serde::{Deserialize, Serialize};

use super::fonts::FontFamily;

/// Maximum saved palettes, and separately saved fonts, per user.
pub const SAVED_ITEM_CAPACITY: usize = 5;

/// Validation errors for [`RecordId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordIdValidationError {
    /// The id was empty.
    #[error("record id must not be empty")]
    Empty,
    /// The id contained whitespace or a path separator.
    #[error("record id must not contain whitespace or '/'")]
    Invalid,
}

/// Store-assigned document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Validate and construct a [`RecordId`].
    pub fn new(raw: impl Into<String>) -> Result<Self, RecordIdValidationError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(RecordIdValidationError::Empty);
        }
        if raw.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err(RecordIdValidationError::Invalid);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<RecordId> for String {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

impl TryFrom<String> for RecordId {
    type Error = RecordIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Palette content about to be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPalette {
    /// The palette, flattened to `colors` and `metadata`.
    #[serde(flatten)]
    pub palette: Palette,
    /// Creation time from the service clock.
    pub created_at: DateTime<Utc>,
}

/// A palette as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPalette {
    /// Store-assigned id.
    pub id: RecordId,
    /// The palette, flattened to `colors` and `metadata`.
    #[serde(flatten)]
    pub palette: Palette,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Font selection about to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFont {
    /// Saved family.
    pub font_family: FontFamily,
    /// Creation time from the service clock.
    pub created_at: DateTime<Utc>,
}

/// A font selection as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFont {
    /// Store-assigned id.
    pub id: RecordId,
    /// Saved family.
    pub font_family: FontFamily,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}
