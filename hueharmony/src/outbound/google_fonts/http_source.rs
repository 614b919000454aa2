//! Reqwest-backed font catalogue adapter.
//!
//! Owns transport details only: query construction, timeout and HTTP error
//! mapping, and JSON decoding into domain entries. Truncation to the
//! catalogue limit happens in the domain service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::WebfontListDto;
use crate::domain::FontEntry;
use crate::domain::ports::{FontCatalogSource, FontCatalogSourceError};
use crate::outbound::http_support::{
    FailureClass, classify_status, classify_transport, status_message,
};

/// Public web fonts list endpoint.
pub const DEFAULT_FONTS_ENDPOINT: &str = "https://www.googleapis.com/webfonts/v1/webfonts";

/// Catalogue adapter performing one GET per fetch.
pub struct GoogleFontsHttpSource {
    client: Client,
    endpoint: Url,
    api_key: Zeroizing<String>,
}

impl GoogleFontsHttpSource {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, api_key: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: Zeroizing::new(api_key.to_owned()),
        })
    }

    fn request_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("key", self.api_key.as_str())
            .append_pair("sort", "popularity");
        url
    }
}

#[async_trait]
impl FontCatalogSource for GoogleFontsHttpSource {
    async fn fetch_fonts(&self) -> Result<Vec<FontEntry>, FontCatalogSourceError> {
        let response = self
            .client
            .get(self.request_url())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let entries = parse_entries(body.as_ref())?;
        debug!(count = entries.len(), "fetched font catalogue");
        Ok(entries)
    }
}

fn parse_entries(body: &[u8]) -> Result<Vec<FontEntry>, FontCatalogSourceError> {
    let decoded: WebfontListDto = serde_json::from_slice(body).map_err(|error| {
        FontCatalogSourceError::decode(format!("invalid web fonts JSON payload: {error}"))
    })?;
    Ok(decoded.into_domain_entries())
}

fn map_transport_error(error: reqwest::Error) -> FontCatalogSourceError {
    match classify_transport(&error) {
        FailureClass::Timeout => FontCatalogSourceError::timeout(error.to_string()),
        _ => FontCatalogSourceError::transport(error.to_string()),
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> FontCatalogSourceError {
    let message = status_message(status, body);
    match classify_status(status) {
        FailureClass::RateLimited => FontCatalogSourceError::rate_limited(message),
        FailureClass::Timeout => FontCatalogSourceError::timeout(message),
        FailureClass::Unauthorized | FailureClass::InvalidRequest => {
            FontCatalogSourceError::invalid_request(message)
        }
        FailureClass::Transport => FontCatalogSourceError::transport(message),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network catalogue helpers.

    use super::*;
    use rstest::rstest;

    #[test]
    fn request_url_carries_key_and_popularity_sort() {
        let source = GoogleFontsHttpSource::new(
            Url::parse(DEFAULT_FONTS_ENDPOINT).expect("valid endpoint"),
            "abc 123",
            Duration::from_secs(1),
        )
        .expect("client builds");

        let url = source.request_url();

        assert_eq!(url.query(), Some("key=abc+123&sort=popularity"));
    }

    #[test]
    fn parses_items_in_response_order() {
        let body = r#"{
            "kind": "webfonts#webfontList",
            "items": [
                { "family": "Roboto", "variants": ["100", "regular", "700"], "category": "sans-serif" },
                { "family": "Open Sans", "variants": ["regular", "italic"] }
            ]
        }"#;

        let entries = parse_entries(body.as_bytes()).expect("JSON should decode");

        let families: Vec<&str> = entries.iter().map(|entry| entry.family.as_ref()).collect();
        assert_eq!(families, ["Roboto", "Open Sans"]);
        assert_eq!(
            entries.first().map(|entry| entry.variants.len()),
            Some(3)
        );
    }

    #[test]
    fn blank_families_are_skipped() {
        let body = br#"{"items": [{"family": "  "}, {"family": "Lato"}]}"#;

        let entries = parse_entries(body).expect("remaining items decode");

        let families: Vec<&str> = entries.iter().map(|entry| entry.family.as_ref()).collect();
        assert_eq!(families, ["Lato"]);
    }

    #[rstest]
    #[case::missing_items(br#"{"kind":"webfonts#webfontList"}"#.as_slice())]
    #[case::not_json(b"not json".as_slice())]
    fn rejects_bad_payloads(#[case] body: &[u8]) {
        let error = parse_entries(body).expect_err("decode should fail");
        assert!(matches!(error, FontCatalogSourceError::Decode { .. }));
    }

    #[test]
    fn rate_limits_are_reported_as_such() {
        let error = map_status_error(StatusCode::TOO_MANY_REQUESTS, b"");
        assert!(matches!(error, FontCatalogSourceError::RateLimited { .. }));
    }

    #[rstest]
    #[case::bad_key(StatusCode::BAD_REQUEST)]
    #[case::forbidden(StatusCode::FORBIDDEN)]
    fn rejected_keys_are_invalid_requests(#[case] status: StatusCode) {
        let error = map_status_error(status, br#"{"error": {"message": "API key not valid"}}"#);
        assert!(matches!(error, FontCatalogSourceError::InvalidRequest { .. }));
        assert!(error.to_string().contains("API key not valid"));
    }
}
