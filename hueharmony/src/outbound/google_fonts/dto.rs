//! DTOs for decoding the web fonts list.

use serde::Deserialize;
use tracing::warn;

use crate::domain::{FontEntry, FontFamily};

#[derive(Debug, Deserialize)]
pub(super) struct WebfontListDto {
    pub(super) items: Vec<WebfontDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WebfontDto {
    pub(super) family: String,
    #[serde(default)]
    pub(super) variants: Vec<String>,
}

impl WebfontListDto {
    /// Convert to domain entries, dropping items without a usable family.
    pub(super) fn into_domain_entries(self) -> Vec<FontEntry> {
        self.items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match FontFamily::new(&item.family) {
                Ok(family) => Some(FontEntry {
                    family,
                    variants: item.variants,
                }),
                Err(error) => {
                    warn!(index, %error, "skipping web font entry");
                    None
                }
            })
            .collect()
    }
}
