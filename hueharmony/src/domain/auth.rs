//! Email sign-in primitives.
//!
//! Keep input parsing outside the domain by exposing constructors that
//! validate raw strings before a panel or command talks to the gateway.
//! Format checks beyond "present" are left to the identity provider, which
//! reports them as [`crate::domain::AuthErrorKind::InvalidEmail`].

use std::fmt;

use zeroize::Zeroizing;

/// Domain error returned when credential values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// A trimmed, non-empty email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Trim and validate an email address.
    pub fn new(raw: &str) -> Result<Self, CredentialsValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CredentialsValidationError::EmptyEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated email/password pair.
///
/// ## Invariants
/// - `email` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use hueharmony::domain::EmailCredentials;
///
/// let creds = EmailCredentials::try_from_parts(" ada@example.com ", "hunter22").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// assert_eq!(creds.password(), "hunter22");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct EmailCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl EmailCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email address used for account lookups.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for EmailCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
