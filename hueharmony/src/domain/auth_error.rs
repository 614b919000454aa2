//! Mapping from identity-provider error codes to user-facing messages.
//!
//! Providers report failures either in SDK form (`auth/email-already-in-use`)
//! or in REST form (`EMAIL_EXISTS`, `WEAK_PASSWORD : Password should be at
//! least 6 characters`). Both spellings resolve to the same kind.

use std::fmt;

/// Authentication failure categories shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// An account already exists for the email.
    EmailInUse,
    /// The email address is malformed.
    InvalidEmail,
    /// The sign-in method is disabled for the project.
    OperationNotAllowed,
    /// The password does not meet the provider's strength rules.
    WeakPassword,
    /// The provider throttled the caller.
    RateLimited,
    /// The account has been disabled.
    AccountDisabled,
    /// Unknown account or wrong password.
    InvalidCredentials,
    /// Anything else; carries the provider's own message.
    Unknown(String),
}

impl AuthErrorKind {
    /// Resolve a provider `code`, falling back to [`AuthErrorKind::Unknown`]
    /// with `message`.
    ///
    /// # Examples
    /// ```
    /// use hueharmony::domain::AuthErrorKind;
    ///
    /// assert_eq!(
    ///     AuthErrorKind::from_provider_code("WEAK_PASSWORD : too short", "ignored"),
    ///     AuthErrorKind::WeakPassword
    /// );
    /// assert_eq!(
    ///     AuthErrorKind::from_provider_code("auth/quota-exceeded", "Quota exceeded."),
    ///     AuthErrorKind::Unknown("Quota exceeded.".to_owned())
    /// );
    /// ```
    pub fn from_provider_code(code: &str, message: &str) -> Self {
        let normalised = code
            .split_once(" : ")
            .map_or(code, |(head, _)| head)
            .trim();
        match normalised {
            "auth/email-already-in-use" | "EMAIL_EXISTS" => Self::EmailInUse,
            "auth/invalid-email" | "INVALID_EMAIL" | "MISSING_EMAIL" => Self::InvalidEmail,
            "auth/operation-not-allowed" | "OPERATION_NOT_ALLOWED" | "PASSWORD_LOGIN_DISABLED" => {
                Self::OperationNotAllowed
            }
            "auth/weak-password" | "WEAK_PASSWORD" => Self::WeakPassword,
            "auth/too-many-requests" | "TOO_MANY_ATTEMPTS_TRY_LATER" => Self::RateLimited,
            "auth/user-disabled" | "USER_DISABLED" => Self::AccountDisabled,
            "auth/user-not-found"
            | "auth/wrong-password"
            | "auth/invalid-credential"
            | "EMAIL_NOT_FOUND"
            | "INVALID_PASSWORD"
            | "INVALID_LOGIN_CREDENTIALS" => Self::InvalidCredentials,
            _ => Self::Unknown(message.to_owned()),
        }
    }

    /// Stable machine-readable reason carried in error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmailInUse => "email_in_use",
            Self::InvalidEmail => "invalid_email",
            Self::OperationNotAllowed => "operation_not_allowed",
            Self::WeakPassword => "weak_password",
            Self::RateLimited => "rate_limited",
            Self::AccountDisabled => "account_disabled",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Unknown(_) => "unknown",
        }
    }

    /// Message displayed in the status area.
    pub fn user_message(&self) -> &str {
        match self {
            Self::EmailInUse => "This email is already registered. Please sign in instead.",
            Self::InvalidEmail => "Please enter a valid email address.",
            Self::OperationNotAllowed => {
                "This sign in method is not enabled. Please contact support."
            }
            Self::WeakPassword => "Please choose a stronger password (at least 6 characters).",
            Self::RateLimited => "Too many attempts. Please try again later.",
            Self::AccountDisabled => "This account has been disabled. Please contact support.",
            Self::InvalidCredentials => "Invalid email or password.",
            Self::Unknown(message) => message.as_str(),
        }
    }
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.user_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("auth/email-already-in-use", AuthErrorKind::EmailInUse)]
    #[case("EMAIL_EXISTS", AuthErrorKind::EmailInUse)]
    #[case("auth/invalid-email", AuthErrorKind::InvalidEmail)]
    #[case("INVALID_EMAIL", AuthErrorKind::InvalidEmail)]
    #[case("OPERATION_NOT_ALLOWED", AuthErrorKind::OperationNotAllowed)]
    #[case(
        "WEAK_PASSWORD : Password should be at least 6 characters",
        AuthErrorKind::WeakPassword
    )]
    #[case("auth/too-many-requests", AuthErrorKind::RateLimited)]
    #[case("TOO_MANY_ATTEMPTS_TRY_LATER", AuthErrorKind::RateLimited)]
    #[case("USER_DISABLED", AuthErrorKind::AccountDisabled)]
    #[case("auth/user-not-found", AuthErrorKind::InvalidCredentials)]
    #[case("auth/wrong-password", AuthErrorKind::InvalidCredentials)]
    #[case("INVALID_LOGIN_CREDENTIALS", AuthErrorKind::InvalidCredentials)]
    fn maps_sdk_and_rest_codes(#[case] code: &str, #[case] expected: AuthErrorKind) {
        assert_eq!(AuthErrorKind::from_provider_code(code, "raw"), expected);
    }

    #[rstest]
    #[case(AuthErrorKind::EmailInUse, "This email is already registered. Please sign in instead.")]
    #[case(AuthErrorKind::InvalidEmail, "Please enter a valid email address.")]
    #[case(
        AuthErrorKind::OperationNotAllowed,
        "This sign in method is not enabled. Please contact support."
    )]
    #[case(
        AuthErrorKind::WeakPassword,
        "Please choose a stronger password (at least 6 characters)."
    )]
    #[case(AuthErrorKind::RateLimited, "Too many attempts. Please try again later.")]
    #[case(
        AuthErrorKind::AccountDisabled,
        "This account has been disabled. Please contact support."
    )]
    #[case(AuthErrorKind::InvalidCredentials, "Invalid email or password.")]
    fn user_messages_match_copy(#[case] kind: AuthErrorKind, #[case] expected: &str) {
        assert_eq!(kind.user_message(), expected);
    }

    #[rstest]
    fn unknown_codes_pass_the_provider_message_through() {
        let kind = AuthErrorKind::from_provider_code("auth/network-request-failed", "Network down");
        assert_eq!(kind.to_string(), "Network down");
    }
}
