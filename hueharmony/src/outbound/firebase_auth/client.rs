//! Reqwest-backed Identity Toolkit client.
//!
//! Every call is a JSON POST to `<endpoint>/accounts:<method>?key=<api key>`.
//! Provider rejections arrive as `{"error": {"message": "EMAIL_EXISTS"}}` and
//! are surfaced as `Rejected` with the message as the code, so the domain's
//! code table can classify them.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::dto::{
    CreateAuthUriRequest, CreateAuthUriResponse, ErrorEnvelope, LookupRequest, LookupResponse,
    OobCodeRequest, PasswordRequest, SignInWithIdpRequest, TokenResponse,
};
use crate::domain::ports::{FederatedProvider, IdentityProvider, IdentityProviderError};
use crate::domain::{
    AuthSession, EmailAddress, EmailCredentials, RedirectChallenge,
};
use crate::outbound::http_support::{
    FailureClass, body_preview, classify_status, classify_transport, status_message,
};

/// Public Identity Toolkit v1 endpoint.
pub const DEFAULT_IDENTITY_ENDPOINT: &str = "https://identitytoolkit.googleapis.com/v1/";

/// Identity provider adapter for one Firebase project.
pub struct FirebaseAuthClient {
    client: Client,
    endpoint: Url,
    api_key: Zeroizing<String>,
}

impl FirebaseAuthClient {
    /// Build a client with an explicit request timeout.
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

    fn method_url(&self, method: &str) -> Result<Url, IdentityProviderError> {
        let mut url = self
            .endpoint
            .join(&format!("./accounts:{method}"))
            .map_err(|error| IdentityProviderError::transport(format!("bad endpoint: {error}")))?;
        url.query_pairs_mut().append_pair("key", self.api_key.as_str());
        Ok(url)
    }

    async fn call<B, R>(&self, method: &str, body: &B) -> Result<R, IdentityProviderError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method)?)
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, bytes.as_ref()));
        }
        debug!(method, "identity toolkit call succeeded");
        serde_json::from_slice(bytes.as_ref()).map_err(|error| {
            IdentityProviderError::decode(format!("invalid accounts:{method} payload: {error}"))
        })
    }

    async fn email_verified(&self, id_token: &str) -> Option<bool> {
        let lookup: Result<LookupResponse, _> =
            self.call("lookup", &LookupRequest { id_token }).await;
        match lookup {
            Ok(found) => found.users.first().map(|user| user.email_verified),
            Err(error) => {
                warn!(error = %error, "account lookup failed; assuming unverified");
                None
            }
        }
    }

    async fn password_session(
        &self,
        method: &str,
        credentials: &EmailCredentials,
    ) -> Result<AuthSession, IdentityProviderError> {
        let tokens: TokenResponse = self
            .call(
                method,
                &PasswordRequest {
                    email: credentials.email().as_ref(),
                    password: credentials.password(),
                    return_secure_token: true,
                },
            )
            .await?;
        let verified = match tokens.email_verified {
            Some(flag) => Some(flag),
            None => self.email_verified(&tokens.id_token).await,
        };
        tokens
            .into_session(verified)
            .map_err(IdentityProviderError::decode)
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuthClient {
    async fn start_redirect_sign_in(
        &self,
        provider: FederatedProvider,
        continue_uri: &Url,
    ) -> Result<RedirectChallenge, IdentityProviderError> {
        let response: CreateAuthUriResponse = self
            .call(
                "createAuthUri",
                &CreateAuthUriRequest {
                    provider_id: Some(provider.provider_id()),
                    identifier: None,
                    continue_uri: continue_uri.as_str(),
                },
            )
            .await?;
        let (Some(auth_uri), Some(session_id)) = (response.auth_uri, response.session_id) else {
            return Err(IdentityProviderError::decode(
                "createAuthUri response missing authUri or sessionId",
            ));
        };
        let auth_uri = Url::parse(&auth_uri)
            .map_err(|error| IdentityProviderError::decode(format!("invalid authUri: {error}")))?;
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
        let tokens: TokenResponse = self
            .call(
                "signInWithIdp",
                &SignInWithIdpRequest {
                    request_uri: callback.as_str(),
                    session_id: &challenge.session_id,
                    return_secure_token: true,
                    return_idp_credential: true,
                },
            )
            .await?;
        tokens.into_session(None).map_err(IdentityProviderError::decode)
    }

    async fn sign_in_methods(
        &self,
        email: &EmailAddress,
    ) -> Result<Vec<String>, IdentityProviderError> {
        let response: CreateAuthUriResponse = self
            .call(
                "createAuthUri",
                &CreateAuthUriRequest {
                    provider_id: None,
                    identifier: Some(email.as_ref()),
                    continue_uri: "http://localhost",
                },
            )
            .await?;
        Ok(response.signin_methods)
    }

    async fn create_account(
        &self,
        credentials: &EmailCredentials,
    ) -> Result<AuthSession, IdentityProviderError> {
        self.password_session("signUp", credentials).await
    }

    async fn sign_in_with_password(
        &self,
        credentials: &EmailCredentials,
    ) -> Result<AuthSession, IdentityProviderError> {
        self.password_session("signInWithPassword", credentials).await
    }

    async fn send_email_verification(
        &self,
        session: &AuthSession,
    ) -> Result<(), IdentityProviderError> {
        let _: serde_json::Value = self
            .call(
                "sendOobCode",
                &OobCodeRequest {
                    request_type: "VERIFY_EMAIL",
                    email: None,
                    id_token: Some(session.id_token().expose()),
                },
            )
            .await?;
        Ok(())
    }

    async fn send_password_reset(
        &self,
        email: &EmailAddress,
    ) -> Result<(), IdentityProviderError> {
        let _: serde_json::Value = self
            .call(
                "sendOobCode",
                &OobCodeRequest {
                    request_type: "PASSWORD_RESET",
                    email: Some(email.as_ref()),
                    id_token: None,
                },
            )
            .await?;
        Ok(())
    }

    async fn sign_out(&self, session: &AuthSession) -> Result<(), IdentityProviderError> {
        // ID tokens are stateless; dropping them client-side ends the session.
        debug!(user_id = %session.user_id(), "discarding identity tokens");
        Ok(())
    }
}

fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    match classify_transport(&error) {
        FailureClass::Timeout => IdentityProviderError::transport(format!("timeout: {error}")),
        _ => IdentityProviderError::transport(error.to_string()),
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(body) {
        let code = envelope.error.message;
        return IdentityProviderError::rejected(code.clone(), code);
    }
    let message = status_message(status, body);
    match classify_status(status) {
        FailureClass::RateLimited => {
            IdentityProviderError::rejected("TOO_MANY_ATTEMPTS_TRY_LATER", message)
        }
        FailureClass::Unauthorized | FailureClass::InvalidRequest => {
            IdentityProviderError::rejected(format!("HTTP_{}", status.as_u16()), body_preview(body))
        }
        FailureClass::Timeout | FailureClass::Transport => IdentityProviderError::transport(message),
    }
}
