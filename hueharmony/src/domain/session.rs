//! Authentication state and its change channel.
//!
//! The gateway is the single producer; panels, stores and the shell hold
//! [`SessionSubscription`]s and react to each published [`AuthState`].
//! Subscriptions end when dropped or explicitly unsubscribed.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use url::Url;
use zeroize::Zeroizing;

use super::user::{AuthUser, UserId};

/// Bearer credential issued by the identity provider. Zeroised on drop and
/// never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretToken(Zeroizing<String>);

impl SecretToken {
    /// Wrap a raw token.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    /// Raw token for use in an `Authorization` header.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretToken(<redacted>)")
    }
}

/// An authenticated session: the user plus the tokens that prove it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    user: AuthUser,
    id_token: SecretToken,
    refresh_token: Option<SecretToken>,
}

impl AuthSession {
    /// Assemble a session from provider output.
    pub fn new(user: AuthUser, id_token: SecretToken, refresh_token: Option<SecretToken>) -> Self {
        Self {
            user,
            id_token,
            refresh_token,
        }
    }

    /// The signed-in user.
    pub fn user(&self) -> &AuthUser {
        &self.user
    }

    /// Shorthand for the user's id.
    pub fn user_id(&self) -> &UserId {
        &self.user.uid
    }

    /// Bearer token for store requests.
    pub fn id_token(&self) -> &SecretToken {
        &self.id_token
    }

    /// Refresh token, when the provider issued one.
    pub fn refresh_token(&self) -> Option<&SecretToken> {
        self.refresh_token.as_ref()
    }
}

/// Phase one of a redirect sign-in: where to send the user and how to
/// recognise their return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectChallenge {
    /// Provider page the user must visit.
    pub auth_uri: Url,
    /// Opaque provider session correlating the two phases.
    pub session_id: String,
    /// Where the provider sends the user afterwards.
    pub continue_uri: Url,
}

impl RedirectChallenge {
    /// Rebuild a challenge started by an earlier process from its session id.
    ///
    /// Finishing a redirect only needs the session id and the return address,
    /// so the provider page is set to `continue_uri`.
    pub fn resumed(session_id: impl Into<String>, continue_uri: Url) -> Self {
        Self {
            auth_uri: continue_uri.clone(),
            session_id: session_id.into(),
            continue_uri,
        }
    }
}

/// Where the user stands with the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// No session.
    #[default]
    Anonymous,
    /// A redirect sign-in was started and has not been resumed yet.
    PendingRedirect(RedirectChallenge),
    /// Signed in.
    Authenticated(AuthSession),
}

impl AuthState {
    /// The active session, if any.
    pub fn session(&self) -> Option<&AuthSession> {
        match self {
            Self::Authenticated(session) => Some(session),
            Self::Anonymous | Self::PendingRedirect(_) => None,
        }
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&AuthUser> {
        self.session().map(AuthSession::user)
    }

    /// Whether a session is active.
    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }
}

/// Single-producer broadcast of the latest [`AuthState`].
///
/// Cloning shares the same channel.
///
/// # Examples
/// ```
/// use hueharmony::domain::{AuthState, SessionChannel};
///
/// let channel = SessionChannel::new();
/// let mut subscription = channel.subscribe();
/// assert_eq!(subscription.current(), AuthState::Anonymous);
/// assert_eq!(channel.subscriber_count(), 1);
/// subscription.unsubscribe();
/// assert_eq!(channel.subscriber_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct SessionChannel {
    sender: Arc<watch::Sender<AuthState>>,
}

impl SessionChannel {
    /// Create a channel starting in [`AuthState::Anonymous`].
    pub fn new() -> Self {
        let (sender, _initial) = watch::channel(AuthState::Anonymous);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Snapshot of the latest state.
    pub fn current(&self) -> AuthState {
        self.sender.borrow().clone()
    }

    /// Replace the state and wake every subscriber. Publishing with no
    /// subscribers still updates [`SessionChannel::current`].
    pub(crate) fn publish(&self, state: AuthState) {
        self.sender.send_replace(state);
    }

    /// Start observing state changes.
    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SessionChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// One consumer's view of the session channel.
#[derive(Debug)]
pub struct SessionSubscription {
    receiver: watch::Receiver<AuthState>,
}

impl SessionSubscription {
    /// Latest state; marks it as seen.
    pub fn current(&mut self) -> AuthState {
        self.receiver.borrow_and_update().clone()
    }

    /// Wait for the next published state. Returns `None` once the producer
    /// has gone away.
    pub async fn changed(&mut self) -> Option<AuthState> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Stop observing. Dropping the subscription has the same effect.
    pub fn unsubscribe(self) {
        drop(self);
    }
}
