//! Saved palette and font services.
//!
//! Both collections follow the same rules: an identical item cannot be saved
//! twice, each user holds at most [`SAVED_ITEM_CAPACITY`] items, and deletes
//! succeed whether or not the id exists. Duplicates are checked before
//! capacity so a full collection still reports a duplicate as such.

use std::sync::Arc;

use colour_scheme::Palette;
use mockable::Clock;
use serde_json::json;
use tracing::debug;

use crate::domain::ports::{
    FontRepository, FontRepositoryError, PaletteRepository, PaletteRepositoryError,
};
use crate::domain::{
    Error, FontFamily, NewFont, NewPalette, RecordId, SAVED_ITEM_CAPACITY, SavedFont,
    SavedPalette, UserId,
};

/// Reason code attached to duplicate-item conflicts.
pub const DUPLICATE_ITEM: &str = "duplicate_item";
/// Reason code attached to capacity conflicts.
pub const CAPACITY_EXCEEDED: &str = "capacity_exceeded";

/// Per-user saved palettes and fonts.
#[derive(Clone)]
pub struct PreferenceService<P: ?Sized, F: ?Sized> {
    palettes: Arc<P>,
    fonts: Arc<F>,
    clock: Arc<dyn Clock>,
}

impl<P: ?Sized, F: ?Sized> PreferenceService<P, F> {
    /// Create a new service over the given repositories.
    pub fn new(palettes: Arc<P>, fonts: Arc<F>, clock: Arc<dyn Clock>) -> Self {
        Self {
            palettes,
            fonts,
            clock,
        }
    }
}

impl<P, F> PreferenceService<P, F>
where
    P: PaletteRepository + ?Sized,
    F: FontRepository + ?Sized,
{
    fn duplicate(message: &str) -> Error {
        Error::conflict(message).with_details(json!({ "code": DUPLICATE_ITEM }))
    }

    fn capacity(kind: &str) -> Error {
        Error::conflict(format!("Maximum number of {kind} ({SAVED_ITEM_CAPACITY}) reached"))
            .with_details(json!({
                "code": CAPACITY_EXCEEDED,
                "limit": SAVED_ITEM_CAPACITY,
            }))
    }

    fn map_palette_error(error: PaletteRepositoryError) -> Error {
        match error {
            PaletteRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("palette store unavailable: {message}"))
            }
            PaletteRepositoryError::Query { message } => {
                Error::internal(format!("palette store error: {message}"))
            }
            PaletteRepositoryError::Unauthorized { message } => {
                Error::unauthorized(format!("palette store refused access: {message}"))
            }
            PaletteRepositoryError::CapacityExceeded { .. } => Self::capacity("palettes"),
        }
    }

    fn map_font_error(error: FontRepositoryError) -> Error {
        match error {
            FontRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("font store unavailable: {message}"))
            }
            FontRepositoryError::Query { message } => {
                Error::internal(format!("font store error: {message}"))
            }
            FontRepositoryError::Unauthorized { message } => {
                Error::unauthorized(format!("font store refused access: {message}"))
            }
            FontRepositoryError::CapacityExceeded { .. } => Self::capacity("fonts"),
        }
    }

    /// Save `palette` for `user_id`.
    ///
    /// # Errors
    ///
    /// Conflicts carry a `duplicate_item` or `capacity_exceeded` reason in
    /// their details; store failures map to service-unavailable or internal
    /// errors.
    pub async fn save_palette(&self, user_id: &UserId, palette: &Palette) -> Result<RecordId, Error> {
        let existing = self
            .palettes
            .list(user_id, None)
            .await
            .map_err(Self::map_palette_error)?;
        if existing
            .iter()
            .any(|saved| saved.palette.same_colours(palette))
        {
            return Err(Self::duplicate("This palette is already saved"));
        }
        if existing.len() >= SAVED_ITEM_CAPACITY {
            return Err(Self::capacity("palettes"));
        }

        let record = NewPalette {
            palette: palette.clone(),
            created_at: self.clock.utc(),
        };
        let id = self
            .palettes
            .insert(user_id, &record, SAVED_ITEM_CAPACITY)
            .await
            .map_err(Self::map_palette_error)?;
        debug!(user_id = %user_id, palette_id = %id, "saved palette");
        Ok(id)
    }

    /// Saved palettes in store order, at most [`SAVED_ITEM_CAPACITY`].
    pub async fn list_palettes(&self, user_id: &UserId) -> Result<Vec<SavedPalette>, Error> {
        self.palettes
            .list(user_id, Some(SAVED_ITEM_CAPACITY))
            .await
            .map_err(Self::map_palette_error)
    }

    /// Delete a saved palette. Unknown ids succeed.
    pub async fn delete_palette(&self, user_id: &UserId, id: &RecordId) -> Result<(), Error> {
        self.palettes
            .delete(user_id, id)
            .await
            .map_err(Self::map_palette_error)?;
        debug!(user_id = %user_id, palette_id = %id, "deleted palette");
        Ok(())
    }

    /// Save `family` for `user_id`, with the same rules as palettes.
    pub async fn save_font(&self, user_id: &UserId, family: &FontFamily) -> Result<RecordId, Error> {
        let existing = self
            .fonts
            .list(user_id, None)
            .await
            .map_err(Self::map_font_error)?;
        if existing.iter().any(|saved| &saved.font_family == family) {
            return Err(Self::duplicate("This font is already saved"));
        }
        if existing.len() >= SAVED_ITEM_CAPACITY {
            return Err(Self::capacity("fonts"));
        }

        let record = NewFont {
            font_family: family.clone(),
            created_at: self.clock.utc(),
        };
        let id = self
            .fonts
            .insert(user_id, &record, SAVED_ITEM_CAPACITY)
            .await
            .map_err(Self::map_font_error)?;
        debug!(user_id = %user_id, font_id = %id, "saved font");
        Ok(id)
    }

    /// Saved fonts in store order, at most [`SAVED_ITEM_CAPACITY`].
    pub async fn list_fonts(&self, user_id: &UserId) -> Result<Vec<SavedFont>, Error> {
        self.fonts
            .list(user_id, Some(SAVED_ITEM_CAPACITY))
            .await
            .map_err(Self::map_font_error)
    }

    /// Delete a saved font. Unknown ids succeed.
    pub async fn delete_font(&self, user_id: &UserId, id: &RecordId) -> Result<(), Error> {
        self.fonts
            .delete(user_id, id)
            .await
            .map_err(Self::map_font_error)?;
        debug!(user_id = %user_id, font_id = %id, "deleted font");
        Ok(())
    }
}

#[cfg(test)]
#[path = "preferences_service_tests.rs"]
mod tests;
