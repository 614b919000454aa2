//! Driven port for fetching the popularity-ranked font catalogue.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::FontEntry;

define_port_error! {
    /// Errors surfaced while fetching the font catalogue.
    pub enum FontCatalogSourceError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "font catalogue transport failed: {message}",
        /// The request exceeded its timeout.
        Timeout { message: String } =>
            "font catalogue timeout: {message}",
        /// The catalogue throttled the request.
        RateLimited { message: String } =>
            "font catalogue rate limited request: {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "font catalogue response decode failed: {message}",
        /// The catalogue rejected the request, typically a bad API key.
        InvalidRequest { message: String } =>
            "font catalogue request invalid: {message}",
    }
}

/// Port for reading the font catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FontCatalogSource: Send + Sync {
    /// Fetch every entry in popularity order. Truncation is the caller's job.
    async fn fetch_fonts(&self) -> Result<Vec<FontEntry>, FontCatalogSourceError>;
}

/// Fixture implementation serving a fixed list.
#[derive(Debug, Clone, Default)]
pub struct FixtureFontCatalogSource {
    entries: Vec<FontEntry>,
}

impl FixtureFontCatalogSource {
    /// Serve `entries` on every fetch.
    pub fn new(entries: Vec<FontEntry>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl FontCatalogSource for FixtureFontCatalogSource {
    async fn fetch_fonts(&self) -> Result<Vec<FontEntry>, FontCatalogSourceError> {
        Ok(self.entries.clone())
    }
}
