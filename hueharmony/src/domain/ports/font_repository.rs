//! Driven port for per-user saved fonts.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{NewFont, RecordId, SavedFont, UserId};

define_port_error! {
    /// Errors raised by font repositories.
    pub enum FontRepositoryError {
        /// The store could not be reached.
        Connection { message: String } =>
            "font store connection failed: {message}",
        /// The store rejected or failed the operation.
        Query { message: String } =>
            "font store query failed: {message}",
        /// The store refused the caller's credentials.
        Unauthorized { message: String } =>
            "font store refused credentials: {message}",
        /// The user already holds `capacity` fonts.
        CapacityExceeded { capacity: usize } =>
            "font store already holds {capacity} fonts",
    }
}

/// Port for the `users/{uid}/fonts` collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FontRepository: Send + Sync {
    /// List saved fonts in the store's native order. `None` lists all.
    async fn list(
        &self,
        user_id: &UserId,
        limit: Option<usize>,
    ) -> Result<Vec<SavedFont>, FontRepositoryError>;

    /// Store a font selection and return its new id, honouring `capacity`
    /// where the adapter can do so atomically.
    async fn insert(
        &self,
        user_id: &UserId,
        font: &NewFont,
        capacity: usize,
    ) -> Result<RecordId, FontRepositoryError>;

    /// Remove a font. Missing ids are not an error.
    async fn delete(&self, user_id: &UserId, id: &RecordId) -> Result<(), FontRepositoryError>;
}
