//! Identity Toolkit outbound adapter.
//!
//! Implements the `IdentityProvider` port against the Firebase Auth REST
//! API (`accounts:*` methods).

mod client;
mod dto;

pub use client::{DEFAULT_IDENTITY_ENDPOINT, FirebaseAuthClient};
