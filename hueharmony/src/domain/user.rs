//! Signed-in user identity as reported by the identity provider.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The identifier was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// The identifier had surrounding whitespace or a path separator.
    #[error("user id must not contain whitespace or '/'")]
    InvalidId,
}

/// Opaque provider-assigned user identifier (`uid`).
///
/// ## Invariants
/// - non-empty, with no whitespace and no `/`, so it can be embedded in a
///   document path such as `users/{uid}/palettes`.
///
/// # Examples
/// ```
/// use hueharmony::domain::UserId;
///
/// let id = UserId::new("u-123").expect("valid uid");
/// assert_eq!(id.as_ref(), "u-123");
/// assert!(UserId::new("users/../x").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Profile of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    /// Provider-assigned identifier.
    pub uid: UserId,
    /// Primary email, absent for some federated accounts.
    pub email: Option<String>,
    /// Display name from the provider profile.
    pub display_name: Option<String>,
    /// Avatar URL from the provider profile.
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    /// Whether the email address has been verified.
    pub email_verified: bool,
}

impl AuthUser {
    /// Name to greet the user by: display name, else email, else uid.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or_else(|| self.uid.as_ref())
    }

    /// Whether the user should be offered "resend verification".
    pub fn needs_verification(&self) -> bool {
        self.email.is_some() && !self.email_verified
    }
}
