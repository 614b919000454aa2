//! Mutex-guarded saved-item store.
//!
//! Counting and inserting happen under one lock, so the capacity cap holds
//! even when saves race.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    FontRepository, FontRepositoryError, PaletteRepository, PaletteRepositoryError,
};
use crate::domain::{NewFont, NewPalette, RecordId, SavedFont, SavedPalette, UserId};

#[derive(Debug, Default)]
struct UserCollections {
    palettes: Vec<SavedPalette>,
    fonts: Vec<SavedFont>,
}

/// In-memory palette and font repository keyed by user.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    users: Mutex<HashMap<UserId, UserCollections>>,
}

impl InMemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<UserId, UserCollections>>, String> {
        self.users
            .lock()
            .map_err(|_| "document store state poisoned".to_owned())
    }

    fn next_id() -> Result<RecordId, String> {
        RecordId::new(Uuid::new_v4().simple().to_string()).map_err(|error| error.to_string())
    }
}

fn take<T: Clone>(items: &[T], limit: Option<usize>) -> Vec<T> {
    items
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .cloned()
        .collect()
}

#[async_trait]
impl PaletteRepository for InMemoryDocumentStore {
    async fn list(
        &self,
        user_id: &UserId,
        limit: Option<usize>,
    ) -> Result<Vec<SavedPalette>, PaletteRepositoryError> {
        let users = self.lock().map_err(PaletteRepositoryError::query)?;
        Ok(users
            .get(user_id)
            .map(|collections| take(&collections.palettes, limit))
            .unwrap_or_default())
    }

    async fn insert(
        &self,
        user_id: &UserId,
        palette: &NewPalette,
        capacity: usize,
    ) -> Result<RecordId, PaletteRepositoryError> {
        let mut users = self.lock().map_err(PaletteRepositoryError::query)?;
        let collections = users.entry(user_id.clone()).or_default();
        if collections.palettes.len() >= capacity {
            return Err(PaletteRepositoryError::capacity_exceeded(capacity));
        }
        let id = Self::next_id().map_err(PaletteRepositoryError::query)?;
        collections.palettes.push(SavedPalette {
            id: id.clone(),
            palette: palette.palette.clone(),
            created_at: palette.created_at,
        });
        Ok(id)
    }

    async fn delete(&self, user_id: &UserId, id: &RecordId) -> Result<(), PaletteRepositoryError> {
        let mut users = self.lock().map_err(PaletteRepositoryError::query)?;
        if let Some(collections) = users.get_mut(user_id) {
            collections.palettes.retain(|saved| &saved.id != id);
        }
        Ok(())
    }
}

#[async_trait]
impl FontRepository for InMemoryDocumentStore {
    async fn list(
        &self,
        user_id: &UserId,
        limit: Option<usize>,
    ) -> Result<Vec<SavedFont>, FontRepositoryError> {
        let users = self.lock().map_err(FontRepositoryError::query)?;
        Ok(users
            .get(user_id)
            .map(|collections| take(&collections.fonts, limit))
            .unwrap_or_default())
    }

    async fn insert(
        &self,
        user_id: &UserId,
        font: &NewFont,
        capacity: usize,
    ) -> Result<RecordId, FontRepositoryError> {
        let mut users = self.lock().map_err(FontRepositoryError::query)?;
        let collections = users.entry(user_id.clone()).or_default();
        if collections.fonts.len() >= capacity {
            return Err(FontRepositoryError::capacity_exceeded(capacity));
        }
        let id = Self::next_id().map_err(FontRepositoryError::query)?;
        collections.fonts.push(SavedFont {
            id: id.clone(),
            font_family: font.font_family.clone(),
            created_at: font.created_at,
        });
        Ok(id)
    }

    async fn delete(&self, user_id: &UserId, id: &RecordId) -> Result<(), FontRepositoryError> {
        let mut users = self.lock().map_err(FontRepositoryError::query)?;
        if let Some(collections) = users.get_mut(user_id) {
            collections.fonts.retain(|saved| &saved.id != id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FontFamily, SAVED_ITEM_CAPACITY};
    use chrono::Utc;
    use colour_scheme::{Colour, Palette, Scheme};
    use rstest::{fixture, rstest};
    use std::sync::Arc;

    #[fixture]
    fn user_id() -> UserId {
        UserId::new("uid-1").expect("valid uid")
    }

    fn new_palette(red: u8) -> NewPalette {
        NewPalette {
            palette: Palette::from_scheme(Colour::from_rgb8(red, 10, 200), Scheme::Triadic),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn concurrent_inserts_respect_capacity(user_id: UserId) {
        let store = Arc::new(InMemoryDocumentStore::new());
        let mut tasks = Vec::new();
        for red in 0..12_u8 {
            let store = Arc::clone(&store);
            let user_id = user_id.clone();
            tasks.push(tokio::spawn(async move {
                PaletteRepository::insert(&*store, &user_id, &new_palette(red), SAVED_ITEM_CAPACITY)
                    .await
            }));
        }
        let mut accepted = 0;
        for task in tasks {
            if task.await.expect("task joins").is_ok() {
                accepted += 1;
            }
        }

        assert_eq!(accepted, SAVED_ITEM_CAPACITY);
        let listed = PaletteRepository::list(&*store, &user_id, None)
            .await
            .expect("list succeeds");
        assert_eq!(listed.len(), SAVED_ITEM_CAPACITY);
    }

    #[rstest]
    #[tokio::test]
    async fn users_do_not_share_collections(user_id: UserId) {
        let store = InMemoryDocumentStore::new();
        let other = UserId::new("uid-2").expect("valid uid");
        let font = NewFont {
            font_family: FontFamily::new("Lato").expect("valid family"),
            created_at: Utc::now(),
        };
        FontRepository::insert(&store, &user_id, &font, 5)
            .await
            .expect("insert succeeds");

        let theirs = FontRepository::list(&store, &other, None)
            .await
            .expect("list succeeds");
        assert!(theirs.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_a_missing_id_is_a_no_op(user_id: UserId) {
        let store = InMemoryDocumentStore::new();
        let kept = PaletteRepository::insert(&store, &user_id, &new_palette(1), 5)
            .await
            .expect("insert succeeds");

        PaletteRepository::delete(&store, &user_id, &RecordId::new("missing").expect("valid id"))
            .await
            .expect("delete succeeds");

        let listed = PaletteRepository::list(&store, &user_id, Some(5))
            .await
            .expect("list succeeds");
        assert_eq!(listed.iter().map(|saved| &saved.id).collect::<Vec<_>>(), [&kept]);
    }
}
