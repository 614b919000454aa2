//! Reqwest-backed Firestore document store.
//!
//! Implements both saved-item repositories. Firestore's REST surface offers no
//! conditional create, so the capacity check is a count followed by a create;
//! two concurrent saves can still exceed the cap.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{Document, DocumentWrite, ErrorEnvelope, ListDocumentsResponse};
use crate::domain::ports::{
    FontRepository, FontRepositoryError, PaletteRepository, PaletteRepositoryError,
};
use crate::domain::{
    NewFont, NewPalette, RecordId, SavedFont, SavedPalette, SecretToken, SessionChannel, UserId,
};
use crate::outbound::http_support::{
    FailureClass, classify_status, classify_transport, status_message,
};

/// Public Firestore v1 endpoint.
pub const DEFAULT_FIRESTORE_ENDPOINT: &str = "https://firestore.googleapis.com/v1/";

const PALETTES: &str = "palettes";
const FONTS: &str = "fonts";

/// Store-neutral failure, converted into each repository's error type.
#[derive(Debug)]
enum StoreFailure {
    Connection(String),
    Query(String),
    Unauthorized(String),
    CapacityExceeded(usize),
}

impl From<StoreFailure> for PaletteRepositoryError {
    fn from(failure: StoreFailure) -> Self {
        match failure {
            StoreFailure::Connection(message) => Self::connection(message),
            StoreFailure::Query(message) => Self::query(message),
            StoreFailure::Unauthorized(message) => Self::unauthorized(message),
            StoreFailure::CapacityExceeded(capacity) => Self::capacity_exceeded(capacity),
        }
    }
}

impl From<StoreFailure> for FontRepositoryError {
    fn from(failure: StoreFailure) -> Self {
        match failure {
            StoreFailure::Connection(message) => Self::connection(message),
            StoreFailure::Query(message) => Self::query(message),
            StoreFailure::Unauthorized(message) => Self::unauthorized(message),
            StoreFailure::CapacityExceeded(capacity) => Self::capacity_exceeded(capacity),
        }
    }
}

/// Firestore-backed palette and font repository for one project.
pub struct FirestoreStore {
    client: Client,
    documents_root: Url,
    session: SessionChannel,
}

impl FirestoreStore {
    /// Build a store for `project_id`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: &Url,
        project_id: &str,
        session: SessionChannel,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        let mut documents_root = endpoint.clone();
        if let Ok(mut segments) = documents_root.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["projects", project_id, "databases", "(default)", "documents", ""]);
        }
        Ok(Self {
            client,
            documents_root,
            session,
        })
    }

    fn collection_url(&self, user_id: &UserId, collection: &str) -> Url {
        let mut url = self.documents_root.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["users", user_id.as_ref(), collection]);
        }
        url
    }

    fn document_url(&self, user_id: &UserId, collection: &str, id: &RecordId) -> Url {
        let mut url = self.collection_url(user_id, collection);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id.as_ref());
        }
        url
    }

    fn bearer(&self) -> Result<SecretToken, StoreFailure> {
        self.session
            .current()
            .session()
            .map(|session| session.id_token().clone())
            .ok_or_else(|| StoreFailure::Unauthorized("no signed-in session".to_owned()))
    }

    async fn send<R: DeserializeOwned>(&self, request: RequestBuilder) -> Result<R, StoreFailure> {
        let token = self.bearer()?;
        let response = request
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        serde_json::from_slice(body.as_ref())
            .map_err(|error| StoreFailure::Query(format!("invalid Firestore payload: {error}")))
    }

    async fn list_records<T: DeserializeOwned>(
        &self,
        user_id: &UserId,
        collection: &str,
        limit: Option<usize>,
    ) -> Result<Vec<T>, StoreFailure> {
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut url = self.collection_url(user_id, collection);
            {
                let mut query = url.query_pairs_mut();
                if let Some(limit) = limit {
                    query.append_pair("pageSize", &limit.to_string());
                }
                if let Some(token) = page_token.as_deref() {
                    query.append_pair("pageToken", token);
                }
            }
            let page: ListDocumentsResponse =
                self.send(self.client.request(Method::GET, url)).await?;
            for document in page.documents {
                records.push(decode_document(document)?);
            }
            // A limited listing is a single page.
            match (limit, page.next_page_token) {
                (None, Some(token)) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        Ok(records)
    }

    async fn create_record<T: Serialize + Sync>(
        &self,
        user_id: &UserId,
        collection: &str,
        record: &T,
        capacity: usize,
    ) -> Result<RecordId, StoreFailure> {
        let existing: Vec<serde_json::Value> =
            self.list_records(user_id, collection, None).await?;
        if existing.len() >= capacity {
            return Err(StoreFailure::CapacityExceeded(capacity));
        }

        let plain = serde_json::to_value(record)
            .map_err(|error| StoreFailure::Query(format!("record encode failed: {error}")))?;
        let write = DocumentWrite::from_record(&plain).map_err(StoreFailure::Query)?;
        let created: Document = self
            .send(
                self.client
                    .request(Method::POST, self.collection_url(user_id, collection))
                    .json(&write),
            )
            .await?;
        let id = RecordId::new(created.id())
            .map_err(|error| StoreFailure::Query(format!("created document id: {error}")))?;
        debug!(user_id = %user_id, collection, id = %id, "created Firestore document");
        Ok(id)
    }

    async fn delete_record(
        &self,
        user_id: &UserId,
        collection: &str,
        id: &RecordId,
    ) -> Result<(), StoreFailure> {
        let url = self.document_url(user_id, collection, id);
        let _: serde_json::Value = self.send(self.client.request(Method::DELETE, url)).await?;
        Ok(())
    }
}

fn decode_document<T: DeserializeOwned>(document: Document) -> Result<T, StoreFailure> {
    let name = document.name.clone();
    let record = document.into_record().map_err(StoreFailure::Query)?;
    serde_json::from_value(record)
        .map_err(|error| StoreFailure::Query(format!("document {name}: {error}")))
}

fn map_transport_error(error: reqwest::Error) -> StoreFailure {
    match classify_transport(&error) {
        FailureClass::Timeout => StoreFailure::Connection(format!("timeout: {error}")),
        _ => StoreFailure::Connection(error.to_string()),
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> StoreFailure {
    let message = serde_json::from_slice::<ErrorEnvelope>(body).map_or_else(
        |_| status_message(status, body),
        |envelope| format!("{}: {}", envelope.error.status, envelope.error.message),
    );
    match classify_status(status) {
        FailureClass::Unauthorized => StoreFailure::Unauthorized(message),
        FailureClass::InvalidRequest => StoreFailure::Query(message),
        FailureClass::RateLimited | FailureClass::Timeout | FailureClass::Transport => {
            StoreFailure::Connection(message)
        }
    }
}

#[async_trait]
impl PaletteRepository for FirestoreStore {
    async fn list(
        &self,
        user_id: &UserId,
        limit: Option<usize>,
    ) -> Result<Vec<SavedPalette>, PaletteRepositoryError> {
        Ok(self.list_records(user_id, PALETTES, limit).await?)
    }

    async fn insert(
        &self,
        user_id: &UserId,
        palette: &NewPalette,
        capacity: usize,
    ) -> Result<RecordId, PaletteRepositoryError> {
        Ok(self
            .create_record(user_id, PALETTES, palette, capacity)
            .await?)
    }

    async fn delete(&self, user_id: &UserId, id: &RecordId) -> Result<(), PaletteRepositoryError> {
        Ok(self.delete_record(user_id, PALETTES, id).await?)
    }
}

#[async_trait]
impl FontRepository for FirestoreStore {
    async fn list(
        &self,
        user_id: &UserId,
        limit: Option<usize>,
    ) -> Result<Vec<SavedFont>, FontRepositoryError> {
        Ok(self.list_records(user_id, FONTS, limit).await?)
    }

    async fn insert(
        &self,
        user_id: &UserId,
        font: &NewFont,
        capacity: usize,
    ) -> Result<RecordId, FontRepositoryError> {
        Ok(self.create_record(user_id, FONTS, font, capacity).await?)
    }

    async fn delete(&self, user_id: &UserId, id: &RecordId) -> Result<(), FontRepositoryError> {
        Ok(self.delete_record(user_id, FONTS, id).await?)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network Firestore helpers.

    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> FirestoreStore {
        FirestoreStore::new(
            &Url::parse(DEFAULT_FIRESTORE_ENDPOINT).expect("valid endpoint"),
            "demo-project",
            SessionChannel::new(),
            Duration::from_secs(1),
        )
        .expect("client builds")
    }

    #[rstest]
    fn collection_urls_nest_under_the_user(store: FirestoreStore) {
        let user_id = UserId::new("uid-1").expect("valid uid");
        assert_eq!(
            store.collection_url(&user_id, PALETTES).as_str(),
            "https://firestore.googleapis.com/v1/projects/demo-project/databases/(default)/documents/users/uid-1/palettes"
        );
        assert_eq!(
            store
                .document_url(&user_id, FONTS, &RecordId::new("f1").expect("valid id"))
                .as_str(),
            "https://firestore.googleapis.com/v1/projects/demo-project/databases/(default)/documents/users/uid-1/fonts/f1"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn anonymous_requests_are_unauthorized(store: FirestoreStore) {
        let user_id = UserId::new("uid-1").expect("valid uid");
        let error = PaletteRepository::list(&store, &user_id, Some(5))
            .await
            .expect_err("no session");
        assert!(matches!(error, PaletteRepositoryError::Unauthorized { .. }));
    }

    #[rstest]
    #[case(StatusCode::FORBIDDEN, "Unauthorized")]
    #[case(StatusCode::BAD_REQUEST, "Query")]
    #[case(StatusCode::SERVICE_UNAVAILABLE, "Connection")]
    fn maps_statuses(#[case] status: StatusCode, #[case] expected: &str) {
        let body = br#"{"error":{"code":403,"message":"Missing or insufficient permissions.","status":"PERMISSION_DENIED"}}"#;
        let failure = map_status_error(status, body);
        let matched = match (&failure, expected) {
            (StoreFailure::Unauthorized(message), "Unauthorized") => {
                message.contains("PERMISSION_DENIED")
            }
            (StoreFailure::Query(_), "Query") | (StoreFailure::Connection(_), "Connection") => true,
            _ => false,
        };
        assert!(matched, "{failure:?} should be {expected}");
    }

    #[rstest]
    fn saved_palettes_decode_from_documents() {
        let document: Document = serde_json::from_value(serde_json::json!({
            "name": "projects/p/databases/(default)/documents/users/u1/palettes/xyz",
            "fields": {
                "colors": { "arrayValue": { "values": [
                    { "stringValue": "#005591" },
                    { "stringValue": "#bf601d" },
                    { "stringValue": "#3498db" },
                    { "stringValue": "#ffa761" },
                    { "stringValue": "#73c9ff" }
                ] } },
                "metadata": { "mapValue": { "fields": {
                    "baseColor": { "stringValue": "#3498db" },
                    "scheme": { "stringValue": "complementary" }
                } } },
                "createdAt": { "timestampValue": "2026-03-01T12:00:00Z" }
            }
        }))
        .expect("document decodes");

        let saved: SavedPalette = decode_document(document).expect("palette decodes");

        assert_eq!(saved.id.as_ref(), "xyz");
        assert_eq!(saved.palette.hex_colours().len(), 5);
        assert_eq!(saved.palette.scheme(), colour_scheme::Scheme::Complementary);
    }
}
