//! Google Fonts outbound adapter.
//!
//! A thin HTTP implementation of the `FontCatalogSource` port.

mod dto;
mod http_source;

pub use http_source::{DEFAULT_FONTS_ENDPOINT, GoogleFontsHttpSource};
