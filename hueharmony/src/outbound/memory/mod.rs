//! In-process adapters for offline use and tests.

mod document_store;
mod identity_provider;

pub use document_store::InMemoryDocumentStore;
pub use identity_provider::{IdentityOperation, InMemoryIdentityProvider};
