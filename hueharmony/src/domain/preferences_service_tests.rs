//! Tests for the saved palette and font services.

use std::sync::Arc;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockFontRepository, MockPaletteRepository};
use crate::test_support::MutableClock;
use colour_scheme::{Colour, Scheme};
use mockable::Clock;
use rstest::{fixture, rstest};

type Service = PreferenceService<MockPaletteRepository, MockFontRepository>;

#[fixture]
fn user_id() -> UserId {
    UserId::new("uid-1").expect("valid uid")
}

fn service(palettes: MockPaletteRepository, fonts: MockFontRepository) -> Service {
    PreferenceService::new(
        Arc::new(palettes),
        Arc::new(fonts),
        Arc::new(MutableClock::default()),
    )
}

fn palette(red: u8) -> Palette {
    Palette::from_scheme(Colour::from_rgb8(red, 0x40, 0x80), Scheme::Analogous)
}

fn saved_palettes(count: u8) -> Vec<SavedPalette> {
    let created_at = MutableClock::default().utc();
    (0..count)
        .map(|index| SavedPalette {
            id: RecordId::new(format!("p{index}")).expect("valid id"),
            palette: palette(index.saturating_mul(40)),
            created_at,
        })
        .collect()
}

fn saved_fonts(names: &[&str]) -> Vec<SavedFont> {
    let created_at = MutableClock::default().utc();
    names
        .iter()
        .enumerate()
        .map(|(index, name)| SavedFont {
            id: RecordId::new(format!("f{index}")).expect("valid id"),
            font_family: FontFamily::new(name).expect("valid family"),
            created_at,
        })
        .collect()
}

#[rstest]
#[tokio::test]
async fn save_palette_inserts_with_clock_timestamp(user_id: UserId) {
    let mut palettes = MockPaletteRepository::new();
    palettes
        .expect_list()
        .times(1)
        .return_once(|_, _| Ok(saved_palettes(2)));
    let expected_at = MutableClock::default().utc();
    palettes
        .expect_insert()
        .withf(move |_, record, capacity| {
            record.created_at == expected_at && *capacity == SAVED_ITEM_CAPACITY
        })
        .times(1)
        .return_once(|_, _, _| Ok(RecordId::new("new-id").expect("valid id")));

    let id = service(palettes, MockFontRepository::new())
        .save_palette(&user_id, &palette(250))
        .await
        .expect("palette saved");

    assert_eq!(id.as_ref(), "new-id");
}

#[rstest]
#[tokio::test]
async fn duplicate_palette_is_rejected_even_when_full(user_id: UserId) {
    let existing = saved_palettes(5);
    let duplicate = existing
        .first()
        .map(|saved| saved.palette.clone())
        .expect("fixture palettes");
    let mut palettes = MockPaletteRepository::new();
    palettes
        .expect_list()
        .times(1)
        .return_once(move |_, _| Ok(existing));
    palettes.expect_insert().never();

    let error = service(palettes, MockFontRepository::new())
        .save_palette(&user_id, &duplicate)
        .await
        .expect_err("duplicate");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.reason(), Some(DUPLICATE_ITEM));
    assert_eq!(error.message(), "This palette is already saved");
}

#[rstest]
#[tokio::test]
async fn sixth_palette_is_rejected(user_id: UserId) {
    let mut palettes = MockPaletteRepository::new();
    palettes
        .expect_list()
        .times(1)
        .return_once(|_, _| Ok(saved_palettes(5)));
    palettes.expect_insert().never();

    let error = service(palettes, MockFontRepository::new())
        .save_palette(&user_id, &palette(255))
        .await
        .expect_err("capacity");

    assert_eq!(error.reason(), Some(CAPACITY_EXCEEDED));
    assert_eq!(error.message(), "Maximum number of palettes (5) reached");
    assert_eq!(
        error.details().and_then(|details| details.get("limit")),
        Some(&json!(5))
    );
}

#[rstest]
#[tokio::test]
async fn store_side_capacity_rejection_maps_to_conflict(user_id: UserId) {
    let mut palettes = MockPaletteRepository::new();
    palettes.expect_list().return_once(|_, _| Ok(Vec::new()));
    palettes
        .expect_insert()
        .return_once(|_, _, capacity| Err(PaletteRepositoryError::capacity_exceeded(capacity)));

    let error = service(palettes, MockFontRepository::new())
        .save_palette(&user_id, &palette(1))
        .await
        .expect_err("capacity");

    assert_eq!(error.reason(), Some(CAPACITY_EXCEEDED));
}

#[rstest]
#[case(PaletteRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(PaletteRepositoryError::query("bad document"), ErrorCode::InternalError)]
#[case(PaletteRepositoryError::unauthorized("expired token"), ErrorCode::Unauthorized)]
#[tokio::test]
async fn palette_store_errors_are_mapped(
    user_id: UserId,
    #[case] failure: PaletteRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut palettes = MockPaletteRepository::new();
    palettes.expect_list().return_once(move |_, _| Err(failure));

    let error = service(palettes, MockFontRepository::new())
        .list_palettes(&user_id)
        .await
        .expect_err("store failure");

    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn listing_asks_for_at_most_five(user_id: UserId) {
    let mut palettes = MockPaletteRepository::new();
    palettes
        .expect_list()
        .withf(|_, limit| *limit == Some(SAVED_ITEM_CAPACITY))
        .times(1)
        .return_once(|_, _| Ok(saved_palettes(3)));

    let listed = service(palettes, MockFontRepository::new())
        .list_palettes(&user_id)
        .await
        .expect("list succeeds");

    assert_eq!(listed.len(), 3);
}

#[rstest]
#[tokio::test]
async fn delete_palette_does_not_check_existence(user_id: UserId) {
    let mut palettes = MockPaletteRepository::new();
    palettes.expect_list().never();
    palettes.expect_delete().times(1).return_once(|_, _| Ok(()));

    service(palettes, MockFontRepository::new())
        .delete_palette(&user_id, &RecordId::new("missing").expect("valid id"))
        .await
        .expect("delete succeeds");
}

#[rstest]
#[tokio::test]
async fn duplicate_font_is_rejected(user_id: UserId) {
    let mut fonts = MockFontRepository::new();
    fonts
        .expect_list()
        .return_once(|_, _| Ok(saved_fonts(&["Lato", "Open Sans"])));
    fonts.expect_insert().never();

    let error = service(MockPaletteRepository::new(), fonts)
        .save_font(&user_id, &FontFamily::new("Open Sans").expect("valid family"))
        .await
        .expect_err("duplicate");

    assert_eq!(error.message(), "This font is already saved");
    assert_eq!(error.reason(), Some(DUPLICATE_ITEM));
}

#[rstest]
#[tokio::test]
async fn sixth_font_is_rejected(user_id: UserId) {
    let mut fonts = MockFontRepository::new();
    fonts
        .expect_list()
        .return_once(|_, _| Ok(saved_fonts(&["A", "B", "C", "D", "E"])));
    fonts.expect_insert().never();

    let error = service(MockPaletteRepository::new(), fonts)
        .save_font(&user_id, &FontFamily::new("F").expect("valid family"))
        .await
        .expect_err("capacity");

    assert_eq!(error.message(), "Maximum number of fonts (5) reached");
}

#[rstest]
#[tokio::test]
async fn save_font_inserts_new_family(user_id: UserId) {
    let mut fonts = MockFontRepository::new();
    fonts.expect_list().return_once(|_, _| Ok(Vec::new()));
    fonts
        .expect_insert()
        .withf(|_, record, _| record.font_family.as_ref() == "Roboto Slab")
        .times(1)
        .return_once(|_, _, _| Ok(RecordId::new("f9").expect("valid id")));

    let id = service(MockPaletteRepository::new(), fonts)
        .save_font(&user_id, &FontFamily::new("Roboto Slab").expect("valid family"))
        .await
        .expect("font saved");

    assert_eq!(id.as_ref(), "f9");
}
