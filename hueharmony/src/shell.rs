//! Composition root: builds adapters from settings and exposes the services
//! a front end drives.

use std::sync::{Arc, Mutex, PoisonError};

use colour_scheme::{Palette, Scheme};
use mockable::Clock;
use tracing::info;
use url::Url;

use crate::config::{HueHarmonySettings, SettingsError};
use crate::domain::ports::{FontCatalogSource, FontRepository, IdentityProvider, PaletteRepository};
use crate::domain::{
    AuthGateway, AuthPanel, AuthSession, AuthState, Error, FontCatalogService, NoticeBoard,
    PaletteGenerator, PreferenceService, RedirectChallenge, SessionChannel, UserId,
};
use crate::outbound::firebase_auth::FirebaseAuthClient;
use crate::outbound::firestore::FirestoreStore;
use crate::outbound::google_fonts::GoogleFontsHttpSource;
use crate::outbound::memory::{InMemoryDocumentStore, InMemoryIdentityProvider};
use crate::outbound::stylesheet::DocumentHead;

/// Font catalogue wired to trait objects.
pub type DynFontCatalog = FontCatalogService<dyn FontCatalogSource, DocumentHead>;
/// Preference service wired to trait objects.
pub type DynPreferences = PreferenceService<dyn PaletteRepository, dyn FontRepository>;
/// Auth panel wired to a trait object.
pub type DynAuthPanel = AuthPanel<dyn IdentityProvider>;

/// Failures while assembling the shell.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// Settings could not be interpreted.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// An HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Adapters selected for this run.
pub struct Adapters {
    /// Font catalogue source.
    pub fonts: Arc<dyn FontCatalogSource>,
    /// Identity provider.
    pub identity: Arc<dyn IdentityProvider>,
    /// Saved palette store.
    pub palettes: Arc<dyn PaletteRepository>,
    /// Saved font store.
    pub saved_fonts: Arc<dyn FontRepository>,
    /// Present when the identity provider is in-process.
    pub offline_identity: Option<Arc<InMemoryIdentityProvider>>,
}

impl Adapters {
    /// In-process adapters with an empty font catalogue.
    pub fn offline() -> Self {
        let identity = Arc::new(InMemoryIdentityProvider::new());
        let store = Arc::new(InMemoryDocumentStore::new());
        Self {
            fonts: Arc::new(crate::domain::ports::FixtureFontCatalogSource::default()),
            identity: identity.clone(),
            palettes: store.clone(),
            saved_fonts: store,
            offline_identity: Some(identity),
        }
    }

    /// Remote adapters where settings allow, in-memory ones elsewhere.
    pub fn from_settings(
        settings: &HueHarmonySettings,
        channel: &SessionChannel,
    ) -> Result<Self, ShellError> {
        let mut adapters = Self::offline();
        let timeout = settings.http_timeout();

        if let Some((endpoint, key)) = settings.fonts()? {
            adapters.fonts = Arc::new(GoogleFontsHttpSource::new(endpoint, &key, timeout)?);
        }
        if let Some(firebase) = settings.firebase()? {
            adapters.identity = Arc::new(FirebaseAuthClient::new(
                firebase.identity_endpoint,
                &firebase.api_key,
                timeout,
            )?);
            let store = Arc::new(FirestoreStore::new(
                &firebase.firestore_endpoint,
                &firebase.project_id,
                channel.clone(),
                timeout,
            )?);
            adapters.palettes = store.clone();
            adapters.saved_fonts = store;
            adapters.offline_identity = None;
            info!(project_id = %firebase.project_id, "using Firebase adapters");
        } else {
            info!("using in-memory identity and storage adapters");
        }
        Ok(adapters)
    }
}

/// Everything a front end needs, sharing one session channel.
pub struct Shell {
    channel: SessionChannel,
    head: Arc<DocumentHead>,
    catalogue: DynFontCatalog,
    panel: DynAuthPanel,
    preferences: DynPreferences,
    generator: Mutex<PaletteGenerator>,
    continue_uri: Url,
    offline_identity: Option<Arc<InMemoryIdentityProvider>>,
}

impl Shell {
    /// Build the shell from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError`] when a URL setting is malformed or an HTTP
    /// client cannot be built.
    pub fn from_settings(
        settings: &HueHarmonySettings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ShellError> {
        let channel = SessionChannel::new();
        let adapters = Adapters::from_settings(settings, &channel)?;
        let notices = Arc::new(NoticeBoard::new(clock.clone(), settings.notice_dismiss()));
        Ok(Self::assemble(
            channel,
            adapters,
            notices,
            clock,
            settings.continue_uri()?,
        ))
    }

    /// Build the shell from explicit adapters.
    pub fn assemble(
        channel: SessionChannel,
        adapters: Adapters,
        notices: Arc<NoticeBoard>,
        clock: Arc<dyn Clock>,
        continue_uri: Url,
    ) -> Self {
        let head = Arc::new(DocumentHead::new());
        let gateway = AuthGateway::new(adapters.identity, channel.clone());
        Self {
            catalogue: FontCatalogService::new(adapters.fonts, head.clone()),
            panel: AuthPanel::new(gateway, notices),
            preferences: PreferenceService::new(adapters.palettes, adapters.saved_fonts, clock),
            generator: Mutex::new(PaletteGenerator::from_entropy()),
            offline_identity: adapters.offline_identity,
            channel,
            head,
            continue_uri,
        }
    }

    /// Shared session channel.
    pub fn session(&self) -> &SessionChannel {
        &self.channel
    }

    /// Stylesheet links injected so far.
    pub fn head(&self) -> &DocumentHead {
        &self.head
    }

    /// Font catalogue service.
    pub fn catalogue(&self) -> &DynFontCatalog {
        &self.catalogue
    }

    /// Sign-in panel.
    pub fn panel(&self) -> &DynAuthPanel {
        &self.panel
    }

    /// Saved palettes and fonts.
    pub fn preferences(&self) -> &DynPreferences {
        &self.preferences
    }

    /// Redirect sign-in return address.
    pub fn continue_uri(&self) -> &Url {
        &self.continue_uri
    }

    /// Generate a palette; `None` when the seed does not parse.
    pub fn generate_palette(&self, seed: Option<&str>, scheme: Option<Scheme>) -> Option<Palette> {
        let mut generator = self
            .generator
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match scheme {
            Some(scheme) => generator.generate_with(seed, scheme),
            None => generator.generate_palette(seed),
        }
    }

    /// Sign in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Option<AuthSession> {
        self.panel.sign_in(email, password).await
    }

    /// Sign in for a command that reads or writes saved items.
    ///
    /// Offline, the account is registered first so storage commands work
    /// without a hosted provider.
    pub async fn authenticate(&self, email: &str, password: &str) -> Option<AuthSession> {
        if let Some(identity) = &self.offline_identity {
            identity.add_account(email, password);
        }
        self.sign_in(email, password).await
    }

    /// Finish a Google sign-in started by an earlier run, identified by the
    /// provider `session_id`, with the URL the provider redirected to.
    pub async fn finish_google_sign_in(
        &self,
        session_id: &str,
        callback: &Url,
    ) -> Option<AuthSession> {
        let challenge = RedirectChallenge::resumed(session_id, self.continue_uri.clone());
        self.panel.gateway().restore_redirect(challenge);
        self.panel.resume_redirect(Some(callback)).await
    }

    /// Provider session id of the redirect sign-in awaiting its callback.
    pub fn pending_redirect(&self) -> Option<String> {
        match self.channel.current() {
            AuthState::PendingRedirect(challenge) => Some(challenge.session_id),
            AuthState::Anonymous | AuthState::Authenticated(_) => None,
        }
    }

    /// The signed-in user's id.
    ///
    /// # Errors
    ///
    /// Returns an unauthorized error when nobody is signed in.
    pub fn user_id(&self) -> Result<UserId, Error> {
        self.channel
            .current()
            .session()
            .map(|session| session.user_id().clone())
            .ok_or_else(|| Error::unauthorized("Please sign in first"))
    }
}
