//! Request and response bodies for Identity Toolkit `accounts:*` calls.

use serde::{Deserialize, Serialize};

use crate::domain::{AuthSession, AuthUser, SecretToken, UserId};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateAuthUriRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) provider_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) identifier: Option<&'a str>,
    pub(super) continue_uri: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateAuthUriResponse {
    pub(super) auth_uri: Option<String>,
    pub(super) session_id: Option<String>,
    #[serde(default)]
    pub(super) signin_methods: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SignInWithIdpRequest<'a> {
    pub(super) request_uri: &'a str,
    pub(super) session_id: &'a str,
    pub(super) return_secure_token: bool,
    pub(super) return_idp_credential: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PasswordRequest<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
    pub(super) return_secure_token: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct OobCodeRequest<'a> {
    pub(super) request_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) id_token: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LookupRequest<'a> {
    pub(super) id_token: &'a str,
}

/// Token-bearing response shared by sign-up and both sign-in flavours.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TokenResponse {
    pub(super) local_id: String,
    pub(super) id_token: String,
    pub(super) refresh_token: Option<String>,
    pub(super) email: Option<String>,
    pub(super) display_name: Option<String>,
    pub(super) photo_url: Option<String>,
    pub(super) email_verified: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LookupResponse {
    #[serde(default)]
    pub(super) users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LookupUser {
    #[serde(default)]
    pub(super) email_verified: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelope {
    pub(super) error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    pub(super) message: String,
}

impl TokenResponse {
    pub(super) fn into_session(self, verified_hint: Option<bool>) -> Result<AuthSession, String> {
        let uid = UserId::new(self.local_id).map_err(|error| error.to_string())?;
        let user = AuthUser {
            uid,
            email: self.email.filter(|email| !email.is_empty()),
            display_name: self.display_name.filter(|name| !name.is_empty()),
            photo_url: self.photo_url.filter(|url| !url.is_empty()),
            email_verified: self.email_verified.or(verified_hint).unwrap_or(false),
        };
        Ok(AuthSession::new(
            user,
            SecretToken::new(self.id_token),
            self.refresh_token.map(SecretToken::new),
        ))
    }
}
