//! Driven port for the hosted identity provider.
//!
//! The provider owns accounts, passwords and token issuance. The domain only
//! sequences calls and maps the provider's error codes through
//! [`crate::domain::AuthErrorKind`].

use async_trait::async_trait;
use url::Url;

use super::define_port_error;
use crate::domain::{AuthErrorKind, AuthSession, EmailAddress, EmailCredentials, RedirectChallenge};

/// Federated identity providers reachable through a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FederatedProvider {
    /// Google accounts.
    Google,
}

impl FederatedProvider {
    /// Provider id understood by the identity service.
    pub fn provider_id(self) -> &'static str {
        match self {
            Self::Google => "google.com",
        }
    }
}

define_port_error! {
    /// Errors surfaced by identity provider adapters.
    pub enum IdentityProviderError {
        /// The provider answered with an error code.
        Rejected { code: String, message: String } =>
            "identity provider rejected request ({code}): {message}",
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "identity provider transport failed: {message}",
        /// The provider's response could not be decoded.
        Decode { message: String } =>
            "identity provider response decode failed: {message}",
    }
}

impl IdentityProviderError {
    /// Classify the failure for display.
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            Self::Rejected { code, message } => AuthErrorKind::from_provider_code(code, message),
            Self::Transport { .. } | Self::Decode { .. } => AuthErrorKind::Unknown(self.to_string()),
        }
    }
}

/// Port for account and session operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Begin a redirect sign-in; the user must visit the returned URL.
    async fn start_redirect_sign_in(
        &self,
        provider: FederatedProvider,
        continue_uri: &Url,
    ) -> Result<RedirectChallenge, IdentityProviderError>;

    /// Exchange the URL the user returned on for a session.
    async fn finish_redirect_sign_in(
        &self,
        challenge: &RedirectChallenge,
        callback: &Url,
    ) -> Result<AuthSession, IdentityProviderError>;

    /// Sign-in methods registered for `email`; empty when no account exists.
    async fn sign_in_methods(
        &self,
        email: &EmailAddress,
    ) -> Result<Vec<String>, IdentityProviderError>;

    /// Create an email/password account and sign it in.
    async fn create_account(
        &self,
        credentials: &EmailCredentials,
    ) -> Result<AuthSession, IdentityProviderError>;

    /// Sign in with email and password.
    async fn sign_in_with_password(
        &self,
        credentials: &EmailCredentials,
    ) -> Result<AuthSession, IdentityProviderError>;

    /// Send the address-verification email for the session's user.
    async fn send_email_verification(
        &self,
        session: &AuthSession,
    ) -> Result<(), IdentityProviderError>;

    /// Send a password-reset email.
    async fn send_password_reset(&self, email: &EmailAddress)
    -> Result<(), IdentityProviderError>;

    /// End the session on the provider side, where supported.
    async fn sign_out(&self, session: &AuthSession) -> Result<(), IdentityProviderError>;
}
