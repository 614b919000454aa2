//! Authentication gateway.
//!
//! Sequences identity provider calls and publishes every resulting
//! [`AuthState`] on the shared [`SessionChannel`]. The gateway is the only
//! producer on that channel.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};
use url::Url;

use crate::domain::ports::{FederatedProvider, IdentityProvider, IdentityProviderError};
use crate::domain::{
    AuthErrorKind, AuthSession, AuthState, EmailAddress, EmailCredentials, Error,
    RedirectChallenge, SessionChannel, SessionSubscription,
};

/// Result of an email sign-up attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// An account already exists; nothing was created.
    AlreadyRegistered,
    /// Account created, signed in, and verification email sent.
    VerificationSent(AuthSession),
    /// Account created and signed in, but the verification email failed.
    VerificationFailed(AuthSession),
}

impl SignUpOutcome {
    /// The new session, when an account was created.
    pub fn session(&self) -> Option<&AuthSession> {
        match self {
            Self::AlreadyRegistered => None,
            Self::VerificationSent(session) | Self::VerificationFailed(session) => Some(session),
        }
    }
}

/// Convert a provider failure into a domain error carrying the user-facing
/// message and the kind's reason code.
pub fn map_identity_error(error: &IdentityProviderError) -> Error {
    let kind = error.kind();
    let message = match kind.user_message().trim() {
        "" => "Authentication failed.".to_owned(),
        text => text.to_owned(),
    };
    let base = match (&kind, error) {
        (_, IdentityProviderError::Transport { .. }) => Error::service_unavailable(message),
        (AuthErrorKind::EmailInUse, _) => Error::conflict(message),
        (AuthErrorKind::InvalidEmail | AuthErrorKind::WeakPassword, _) => {
            Error::invalid_request(message)
        }
        (
            AuthErrorKind::InvalidCredentials
            | AuthErrorKind::AccountDisabled
            | AuthErrorKind::OperationNotAllowed,
            _,
        ) => Error::unauthorized(message),
        (AuthErrorKind::RateLimited, _) => Error::service_unavailable(message),
        (AuthErrorKind::Unknown(_), _) => Error::internal(message),
    };
    base.with_details(json!({ "code": kind.code() }))
}

/// Entry point for sign-in, sign-up and sign-out flows.
#[derive(Clone)]
pub struct AuthGateway<I: ?Sized> {
    provider: Arc<I>,
    channel: SessionChannel,
}

impl<I: ?Sized> AuthGateway<I> {
    /// Create a gateway publishing on `channel`.
    pub fn new(provider: Arc<I>, channel: SessionChannel) -> Self {
        Self { provider, channel }
    }

    /// Observe session changes.
    pub fn subscribe(&self) -> SessionSubscription {
        self.channel.subscribe()
    }

    /// Latest published state.
    pub fn current(&self) -> AuthState {
        self.channel.current()
    }
}

impl<I> AuthGateway<I>
where
    I: IdentityProvider + ?Sized,
{
    /// Start a Google redirect sign-in and return the URL the user must
    /// visit.
    pub async fn sign_in_with_google(&self, continue_uri: &Url) -> Result<Url, Error> {
        let challenge = self
            .provider
            .start_redirect_sign_in(FederatedProvider::Google, continue_uri)
            .await
            .map_err(|err| map_identity_error(&err))?;
        let auth_uri = challenge.auth_uri.clone();
        self.channel.publish(AuthState::PendingRedirect(challenge));
        debug!(%auth_uri, "started redirect sign-in");
        Ok(auth_uri)
    }

    /// Mark a redirect started by an earlier process as pending so that
    /// [`AuthGateway::resume_redirect`] can finish it. An active session is
    /// left in place.
    pub fn restore_redirect(&self, challenge: RedirectChallenge) {
        if self.channel.current().is_authenticated() {
            debug!("session active; ignoring restored redirect");
            return;
        }
        self.channel.publish(AuthState::PendingRedirect(challenge));
    }

    /// Finish a pending redirect sign-in.
    ///
    /// Returns `Ok(None)` when no redirect is pending or no callback was
    /// supplied, so calling it again after completion is harmless. A failed
    /// exchange returns the state to [`AuthState::Anonymous`].
    pub async fn resume_redirect(&self, callback: Option<&Url>) -> Result<Option<AuthSession>, Error> {
        let AuthState::PendingRedirect(challenge) = self.channel.current() else {
            return Ok(None);
        };
        let Some(callback) = callback else {
            return Ok(None);
        };
        match self
            .provider
            .finish_redirect_sign_in(&challenge, callback)
            .await
        {
            Ok(session) => {
                debug!(user_id = %session.user_id(), "completed redirect sign-in");
                self.channel
                    .publish(AuthState::Authenticated(session.clone()));
                Ok(Some(session))
            }
            Err(err) => {
                self.channel.publish(AuthState::Anonymous);
                Err(map_identity_error(&err))
            }
        }
    }

    /// Register a new email/password account.
    ///
    /// The sign-in methods lookup runs first; an existing account yields
    /// [`SignUpOutcome::AlreadyRegistered`] without a create call. After
    /// creation the verification email is best-effort.
    pub async fn sign_up_with_email(
        &self,
        credentials: &EmailCredentials,
    ) -> Result<SignUpOutcome, Error> {
        let methods = self
            .provider
            .sign_in_methods(credentials.email())
            .await
            .map_err(|err| map_identity_error(&err))?;
        if !methods.is_empty() {
            debug!(email = %credentials.email(), "sign-up for registered email");
            return Ok(SignUpOutcome::AlreadyRegistered);
        }

        let session = self
            .provider
            .create_account(credentials)
            .await
            .map_err(|err| map_identity_error(&err))?;
        self.channel
            .publish(AuthState::Authenticated(session.clone()));

        match self.provider.send_email_verification(&session).await {
            Ok(()) => Ok(SignUpOutcome::VerificationSent(session)),
            Err(err) => {
                warn!(error = %err, "verification email failed after sign-up");
                Ok(SignUpOutcome::VerificationFailed(session))
            }
        }
    }

    /// Sign in with email and password.
    pub async fn sign_in_with_email(
        &self,
        credentials: &EmailCredentials,
    ) -> Result<AuthSession, Error> {
        let session = self
            .provider
            .sign_in_with_password(credentials)
            .await
            .map_err(|err| map_identity_error(&err))?;
        debug!(user_id = %session.user_id(), "signed in with email");
        self.channel
            .publish(AuthState::Authenticated(session.clone()));
        Ok(session)
    }

    /// Send a password-reset email.
    pub async fn send_password_reset(&self, email: &EmailAddress) -> Result<(), Error> {
        self.provider
            .send_password_reset(email)
            .await
            .map_err(|err| map_identity_error(&err))
    }

    /// Resend the verification email for the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an unauthorized error when nobody is signed in.
    pub async fn resend_verification(&self) -> Result<(), Error> {
        let AuthState::Authenticated(session) = self.channel.current() else {
            return Err(Error::unauthorized("Please sign in first"));
        };
        self.provider
            .send_email_verification(&session)
            .await
            .map_err(|err| map_identity_error(&err))
    }

    /// End the current session. Anonymous callers get a no-op.
    pub async fn sign_out(&self) -> Result<(), Error> {
        match self.channel.current() {
            AuthState::Anonymous => Ok(()),
            AuthState::PendingRedirect(_) => {
                self.channel.publish(AuthState::Anonymous);
                Ok(())
            }
            AuthState::Authenticated(session) => {
                self.provider
                    .sign_out(&session)
                    .await
                    .map_err(|err| map_identity_error(&err))?;
                self.channel.publish(AuthState::Anonymous);
                debug!(user_id = %session.user_id(), "signed out");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
