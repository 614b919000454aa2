//! Outbound adapters implementing domain ports for external services.
//!
//! - **google_fonts**: popularity-ranked font catalogue over HTTP
//! - **firebase_auth**: Identity Toolkit REST identity provider
//! - **firestore**: Firestore REST document store for saved items
//! - **memory**: in-process stores and identity provider for offline use
//! - **stylesheet**: document head recording injected stylesheet links
//!
//! Adapters are thin translators between domain types and wire formats. They
//! contain no business rules beyond what a store must enforce atomically.

pub mod firebase_auth;
pub mod firestore;
pub mod google_fonts;
mod http_support;
pub mod memory;
pub mod stylesheet;
