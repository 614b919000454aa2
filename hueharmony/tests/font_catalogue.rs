//! Font catalogue wired to the stylesheet head.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::sync::Arc;

use hueharmony::domain::ports::FixtureFontCatalogSource;
use hueharmony::domain::{FONT_CATALOG_LIMIT, FontCatalogService, FontEntry, FontFamily};
use hueharmony::outbound::stylesheet::DocumentHead;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rstest::{fixture, rstest};

type Catalogue = FontCatalogService<FixtureFontCatalogSource, DocumentHead>;

fn entries(count: usize) -> Vec<FontEntry> {
    (0..count)
        .map(|index| FontEntry {
            family: FontFamily::new(&format!("Family {index}")).expect("valid family"),
            variants: vec!["regular".to_owned(), "700".to_owned()],
        })
        .collect()
}

#[fixture]
fn head() -> Arc<DocumentHead> {
    Arc::new(DocumentHead::new())
}

fn catalogue(count: usize, head: &Arc<DocumentHead>) -> Catalogue {
    FontCatalogService::new(
        Arc::new(FixtureFontCatalogSource::new(entries(count))),
        head.clone(),
    )
}

#[rstest]
#[tokio::test]
async fn keeps_the_fifty_most_popular(head: Arc<DocumentHead>) {
    let service = catalogue(80, &head);

    let loaded = service.load_fonts().await;

    assert_eq!(loaded.len(), FONT_CATALOG_LIMIT);
    assert_eq!(
        loaded.first().map(|entry| entry.family.as_ref()),
        Some("Family 0")
    );
    assert_eq!(service.fonts(), loaded);
}

#[rstest]
#[tokio::test]
async fn selecting_fonts_appends_stylesheets(head: Arc<DocumentHead>) {
    let service = catalogue(3, &head);
    service.load_fonts().await;

    service.select_font(&FontFamily::new("Family 1").expect("valid family"));
    let random = service
        .select_random_font(&mut SmallRng::seed_from_u64(7))
        .expect("catalogue is loaded");

    let links = head.links();
    assert_eq!(links.len(), 2);
    assert!(links.first().is_some_and(|href| href.contains("family=Family+1:ital")));
    assert_eq!(service.selected_font(), Some(random));
    assert!(head.render().contains("rel=\"stylesheet\""));
}

#[rstest]
#[tokio::test]
async fn random_selection_on_an_empty_catalogue_is_none(head: Arc<DocumentHead>) {
    let service = catalogue(0, &head);
    service.load_fonts().await;

    assert_eq!(service.select_random_font(&mut SmallRng::seed_from_u64(7)), None);
    assert!(head.links().is_empty());
}
