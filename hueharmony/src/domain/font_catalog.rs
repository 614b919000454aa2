//! Font catalogue service: load once, select, and inject stylesheets.

use std::sync::{Arc, PoisonError, RwLock};

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, error};

use crate::domain::ports::{FontCatalogSource, StylesheetSink};
use crate::domain::{FONT_CATALOG_LIMIT, FontEntry, FontFamily};

/// Holds the fetched catalogue and the current selection.
pub struct FontCatalogService<S: ?Sized, K: ?Sized> {
    source: Arc<S>,
    sink: Arc<K>,
    catalogue: RwLock<Vec<FontEntry>>,
    selected: RwLock<Option<FontFamily>>,
}

impl<S, K> FontCatalogService<S, K>
where
    S: FontCatalogSource + ?Sized,
    K: StylesheetSink + ?Sized,
{
    /// Create a service with an empty catalogue.
    pub fn new(source: Arc<S>, sink: Arc<K>) -> Self {
        Self {
            source,
            sink,
            catalogue: RwLock::new(Vec::new()),
            selected: RwLock::new(None),
        }
    }

    /// Fetch the catalogue and keep the [`FONT_CATALOG_LIMIT`] most popular
    /// entries.
    ///
    /// Failures are logged and return an empty list; the stored catalogue
    /// is left as it was. There is no retry.
    pub async fn load_fonts(&self) -> Vec<FontEntry> {
        match self.source.fetch_fonts().await {
            Ok(mut entries) => {
                entries.truncate(FONT_CATALOG_LIMIT);
                debug!(count = entries.len(), "loaded font catalogue");
                entries.clone_into(&mut self.catalogue.write().unwrap_or_else(PoisonError::into_inner));
                entries
            }
            Err(err) => {
                error!(error = %err, "failed to load font catalogue");
                Vec::new()
            }
        }
    }

    /// Current catalogue, popularity first.
    pub fn fonts(&self) -> Vec<FontEntry> {
        self.catalogue
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Select `family` and append its stylesheet link.
    ///
    /// Selecting the same family again appends another link.
    pub fn select_font(&self, family: &FontFamily) {
        let href = family.stylesheet_href();
        self.sink.append_stylesheet(&href);
        debug!(family = %family, href, "selected font");
        *self.selected.write().unwrap_or_else(PoisonError::into_inner) = Some(family.clone());
    }

    /// Select a uniformly random catalogue entry. Returns `None` without
    /// side effects when the catalogue is empty.
    pub fn select_random_font<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<FontFamily> {
        let family = self
            .catalogue
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .choose(rng)
            .map(|entry| entry.family.clone())?;
        self.select_font(&family);
        Some(family)
    }

    /// The most recent selection.
    pub fn selected_font(&self) -> Option<FontFamily> {
        self.selected
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        FixtureFontCatalogSource, FontCatalogSourceError, MockFontCatalogSource,
        MockStylesheetSink,
    };
    use mockall::predicate::eq;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rstest::rstest;

    fn entry(family: &str) -> FontEntry {
        FontEntry {
            family: FontFamily::new(family).expect("valid family"),
            variants: vec!["regular".to_owned(), "700".to_owned()],
        }
    }

    fn catalogue(size: usize) -> Vec<FontEntry> {
        (0..size).map(|index| entry(&format!("Font {index}"))).collect()
    }

    #[rstest]
    #[tokio::test]
    async fn load_keeps_the_fifty_most_popular() {
        let source = Arc::new(FixtureFontCatalogSource::new(catalogue(80)));
        let service = FontCatalogService::new(source, Arc::new(MockStylesheetSink::new()));

        let loaded = service.load_fonts().await;

        assert_eq!(loaded.len(), FONT_CATALOG_LIMIT);
        assert_eq!(loaded.first().map(|e| e.family.as_ref()), Some("Font 0"));
        assert_eq!(loaded.last().map(|e| e.family.as_ref()), Some("Font 49"));
        assert_eq!(service.fonts(), loaded);
    }

    #[rstest]
    #[tokio::test]
    async fn failed_load_leaves_catalogue_empty() {
        let mut source = MockFontCatalogSource::new();
        source
            .expect_fetch_fonts()
            .times(1)
            .returning(|| Err(FontCatalogSourceError::transport("offline")));
        let service = FontCatalogService::new(Arc::new(source), Arc::new(MockStylesheetSink::new()));

        assert!(service.load_fonts().await.is_empty());
        assert!(service.fonts().is_empty());
    }

    #[rstest]
    fn selecting_twice_appends_two_links() {
        let family = FontFamily::new("Open Sans").expect("valid family");
        let mut sink = MockStylesheetSink::new();
        sink.expect_append_stylesheet()
            .with(eq(family.stylesheet_href()))
            .times(2)
            .return_const(());
        let service = FontCatalogService::new(
            Arc::new(FixtureFontCatalogSource::default()),
            Arc::new(sink),
        );

        service.select_font(&family);
        service.select_font(&family);

        assert_eq!(service.selected_font(), Some(family));
    }

    #[rstest]
    fn random_selection_on_empty_catalogue_is_none() {
        let mut sink = MockStylesheetSink::new();
        sink.expect_append_stylesheet().never();
        let service = FontCatalogService::new(
            Arc::new(FixtureFontCatalogSource::default()),
            Arc::new(sink),
        );
        let mut rng = SmallRng::seed_from_u64(1);

        assert_eq!(service.select_random_font(&mut rng), None);
        assert_eq!(service.selected_font(), None);
    }

    #[rstest]
    #[tokio::test]
    async fn random_selection_picks_from_the_catalogue() {
        let mut sink = MockStylesheetSink::new();
        sink.expect_append_stylesheet().times(1).return_const(());
        let service = FontCatalogService::new(
            Arc::new(FixtureFontCatalogSource::new(catalogue(3))),
            Arc::new(sink),
        );
        service.load_fonts().await;
        let mut rng = SmallRng::seed_from_u64(4);

        let chosen = service.select_random_font(&mut rng).expect("catalogue not empty");

        assert!(service.fonts().iter().any(|entry| entry.family == chosen));
        assert_eq!(service.selected_font(), Some(chosen));
    }
}
