//! In-process identity provider.
//!
//! Accounts live in a map keyed by email. Failures can be scripted per
//! operation with provider error codes, so callers see the same rejections a
//! hosted provider would send.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use url::Url;
use uuid::Uuid;

use crate::domain::ports::{FederatedProvider, IdentityProvider, IdentityProviderError};
use crate::domain::{
    AuthSession, AuthUser, EmailAddress, EmailCredentials, RedirectChallenge, SecretToken, UserId,
};

const MIN_PASSWORD_LEN: usize = 6;

/// Operations that can be made to fail on their next call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityOperation {
    /// `start_redirect_sign_in`.
    StartRedirect,
    /// `finish_redirect_sign_in`.
    FinishRedirect,
    /// `sign_in_methods`.
    SignInMethods,
    /// `create_account`.
    CreateAccount,
    /// `sign_in_with_password`.
    SignInWithPassword,
    /// `send_email_verification`.
    SendVerification,
    /// `send_password_reset`.
    SendPasswordReset,
    /// `sign_out`.
    SignOut,
}

#[derive(Debug, Clone)]
struct Account {
    uid: UserId,
    password: String,
    email_verified: bool,
}

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<String, Account>,
    failures: HashMap<IdentityOperation, IdentityProviderError>,
    verification_emails: Vec<UserId>,
    password_resets: Vec<String>,
}

/// Identity provider backed by a map of accounts.
#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    state: Mutex<State>,
}

impl InMemoryIdentityProvider {
    /// Provider with no accounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a verified account directly, bypassing sign-up. Existing
    /// accounts are left untouched.
    pub fn add_account(&self, email: &str, password: &str) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if state.accounts.contains_key(email.trim()) {
            return;
        }
        if let Ok(uid) = new_uid() {
            state.accounts.insert(
                email.trim().to_owned(),
                Account {
                    uid,
                    password: password.to_owned(),
                    email_verified: true,
                },
            );
        }
    }

    /// Builder form of [`InMemoryIdentityProvider::add_account`].
    pub fn with_account(self, email: &str, password: &str) -> Self {
        self.add_account(email, password);
        self
    }

    /// Make the next call to `operation` fail with provider `code`.
    pub fn fail_next(&self, operation: IdentityOperation, code: &str) {
        if let Ok(mut state) = self.state.lock() {
            state
                .failures
                .insert(operation, IdentityProviderError::rejected(code, code));
        }
    }

    /// Whether an account exists for `email`.
    pub fn has_account(&self, email: &str) -> bool {
        self.state
            .lock()
            .is_ok_and(|state| state.accounts.contains_key(email.trim()))
    }

    /// Number of accounts.
    pub fn account_count(&self) -> usize {
        self.state.lock().map_or(0, |state| state.accounts.len())
    }

    /// Users a verification email was sent to, oldest first.
    pub fn verification_emails(&self) -> Vec<UserId> {
        self.state
            .lock()
            .map(|state| state.verification_emails.clone())
            .unwrap_or_default()
    }

    /// Addresses a password reset was sent to, oldest first.
    pub fn password_resets(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|state| state.password_resets.clone())
            .unwrap_or_default()
    }

    fn begin(&self, operation: IdentityOperation) -> Result<MutexGuard<'_, State>, IdentityProviderError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| IdentityProviderError::transport("identity state poisoned"))?;
        if let Some(failure) = state.failures.remove(&operation) {
            return Err(failure);
        }
        Ok(state)
    }
}

fn new_uid() -> Result<UserId, IdentityProviderError> {
    UserId::new(Uuid::new_v4().simple().to_string())
        .map_err(|error| IdentityProviderError::transport(error.to_string()))
}

fn session_for(email: &str, account: &Account) -> AuthSession {
    AuthSession::new(
        AuthUser {
            uid: account.uid.clone(),
            email: Some(email.to_owned()),
            display_name: None,
            photo_url: None,
            email_verified: account.email_verified,
        },
        SecretToken::new(format!("memory-token-{}", Uuid::new_v4().simple())),
        None,
    )
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn start_redirect_sign_in(
        &self,
        provider: FederatedProvider,
        continue_uri: &Url,
    ) -> Result<RedirectChallenge, IdentityProviderError> {
        let _state = self.begin(IdentityOperation::StartRedirect)?;
        let session_id = Uuid::new_v4().simple().to_string();
        let mut auth_uri = continue_uri.clone();
        auth_uri
            .query_pairs_mut()
            .append_pair("providerId", provider.provider_id())
            .append_pair("sessionId", &session_id);
        Ok(RedirectChallenge {
            auth_uri,
            session_id,
            continue_uri: continue_uri.clone(),
        })
    }

    async fn finish_redirect_sign_in(
        &self,
        challenge: &RedirectChallenge,
        callback: &Url,
    ) -> Result<AuthSession, IdentityProviderError> {
        let mut state = self.begin(IdentityOperation::FinishRedirect)?;
        let echoed = callback
            .query_pairs()
            .find(|(key, _)| key == "sessionId")
            .map(|(_, value)| value.into_owned());
        if echoed.as_deref() != Some(challenge.session_id.as_str()) {
            return Err(IdentityProviderError::rejected(
                "INVALID_IDP_RESPONSE",
                "callback does not match the pending sign-in",
            ));
        }
        let email = format!("{}@google.invalid", challenge.session_id);
        if let Some(account) = state.accounts.get(&email) {
            return Ok(session_for(&email, account));
        }
        let account = Account {
            uid: new_uid()?,
            password: String::new(),
            email_verified: true,
        };
        state.accounts.insert(email.clone(), account.clone());
        Ok(session_for(&email, &account))
    }

    async fn sign_in_methods(
        &self,
        email: &EmailAddress,
    ) -> Result<Vec<String>, IdentityProviderError> {
        let state = self.begin(IdentityOperation::SignInMethods)?;
        Ok(state
            .accounts
            .get(email.as_ref())
            .map(|_| vec!["password".to_owned()])
            .unwrap_or_default())
    }

    async fn create_account(
        &self,
        credentials: &EmailCredentials,
    ) -> Result<AuthSession, IdentityProviderError> {
        let mut state = self.begin(IdentityOperation::CreateAccount)?;
        let email = credentials.email().as_ref();
        if !email.contains('@') {
            return Err(IdentityProviderError::rejected("INVALID_EMAIL", "INVALID_EMAIL"));
        }
        if state.accounts.contains_key(email) {
            return Err(IdentityProviderError::rejected("EMAIL_EXISTS", "EMAIL_EXISTS"));
        }
        if credentials.password().chars().count() < MIN_PASSWORD_LEN {
            return Err(IdentityProviderError::rejected(
                "WEAK_PASSWORD : Password should be at least 6 characters",
                "Password should be at least 6 characters",
            ));
        }
        let account = Account {
            uid: new_uid()?,
            password: credentials.password().to_owned(),
            email_verified: false,
        };
        state.accounts.insert(email.to_owned(), account.clone());
        Ok(session_for(email, &account))
    }

    async fn sign_in_with_password(
        &self,
        credentials: &EmailCredentials,
    ) -> Result<AuthSession, IdentityProviderError> {
        let state = self.begin(IdentityOperation::SignInWithPassword)?;
        let email = credentials.email().as_ref();
        match state.accounts.get(email) {
            Some(account) if account.password == credentials.password() => {
                Ok(session_for(email, account))
            }
            _ => Err(IdentityProviderError::rejected(
                "INVALID_LOGIN_CREDENTIALS",
                "INVALID_LOGIN_CREDENTIALS",
            )),
        }
    }

    async fn send_email_verification(
        &self,
        session: &AuthSession,
    ) -> Result<(), IdentityProviderError> {
        let mut state = self.begin(IdentityOperation::SendVerification)?;
        state.verification_emails.push(session.user_id().clone());
        Ok(())
    }

    async fn send_password_reset(
        &self,
        email: &EmailAddress,
    ) -> Result<(), IdentityProviderError> {
        let mut state = self.begin(IdentityOperation::SendPasswordReset)?;
        if !state.accounts.contains_key(email.as_ref()) {
            return Err(IdentityProviderError::rejected("EMAIL_NOT_FOUND", "EMAIL_NOT_FOUND"));
        }
        state.password_resets.push(email.as_ref().to_owned());
        Ok(())
    }

    async fn sign_out(&self, _session: &AuthSession) -> Result<(), IdentityProviderError> {
        let _state = self.begin(IdentityOperation::SignOut)?;
        Ok(())
    }
}
