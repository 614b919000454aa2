//! Driven port for per-user saved palettes.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{NewPalette, RecordId, SavedPalette, UserId};

define_port_error! {
    /// Errors raised by palette repositories.
    pub enum PaletteRepositoryError {
        /// The store could not be reached.
        Connection { message: String } =>
            "palette store connection failed: {message}",
        /// The store rejected or failed the operation.
        Query { message: String } =>
            "palette store query failed: {message}",
        /// The store refused the caller's credentials.
        Unauthorized { message: String } =>
            "palette store refused credentials: {message}",
        /// The user already holds `capacity` palettes.
        CapacityExceeded { capacity: usize } =>
            "palette store already holds {capacity} palettes",
    }
}

/// Port for the `users/{uid}/palettes` collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaletteRepository: Send + Sync {
    /// List saved palettes in the store's native order. `None` lists all.
    async fn list(
        &self,
        user_id: &UserId,
        limit: Option<usize>,
    ) -> Result<Vec<SavedPalette>, PaletteRepositoryError>;

    /// Store a palette and return its new id.
    ///
    /// Adapters able to count and insert atomically reject the insert with
    /// [`PaletteRepositoryError::CapacityExceeded`] once `capacity` records
    /// exist.
    async fn insert(
        &self,
        user_id: &UserId,
        palette: &NewPalette,
        capacity: usize,
    ) -> Result<RecordId, PaletteRepositoryError>;

    /// Remove a palette. Missing ids are not an error.
    async fn delete(&self, user_id: &UserId, id: &RecordId) -> Result<(), PaletteRepositoryError>;
}
