//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod font_catalog_source;
mod font_repository;
mod identity_provider;
mod palette_repository;
mod stylesheet_sink;

#[cfg(test)]
pub use font_catalog_source::MockFontCatalogSource;
pub use font_catalog_source::{
    FixtureFontCatalogSource, FontCatalogSource, FontCatalogSourceError,
};
#[cfg(test)]
pub use font_repository::MockFontRepository;
pub use font_repository::{FontRepository, FontRepositoryError};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{FederatedProvider, IdentityProvider, IdentityProviderError};
#[cfg(test)]
pub use palette_repository::MockPaletteRepository;
pub use palette_repository::{PaletteRepository, PaletteRepositoryError};
#[cfg(test)]
pub use stylesheet_sink::MockStylesheetSink;
pub use stylesheet_sink::StylesheetSink;
