//! Firestore REST outbound adapter.
//!
//! Saved palettes and fonts live in per-user sub-collections
//! `users/{uid}/palettes` and `users/{uid}/fonts`. Requests carry the signed-in
//! user's ID token, read from the session channel at call time.

mod dto;
mod store;

pub use store::{DEFAULT_FIRESTORE_ENDPOINT, FirestoreStore};
