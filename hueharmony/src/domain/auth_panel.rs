//! Headless view model for the sign-in panel.
//!
//! Wraps [`AuthGateway`] with the panel's mode switching, loading flag and
//! status notices so any front end can render it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::error;
use url::Url;

use crate::domain::ports::IdentityProvider;
use crate::domain::{
    AuthErrorKind, AuthGateway, AuthSession, CredentialsValidationError, EmailAddress,
    EmailCredentials, Error, Notice, NoticeBoard, SignUpOutcome,
};

/// Notice shown when an action needs an email that was not entered.
pub const MISSING_EMAIL: &str = "Please enter your email first";
/// Notice shown when a password is required but blank.
pub const MISSING_PASSWORD: &str = "Please enter your password";
/// Notice shown after a verification email goes out.
pub const VERIFICATION_SENT: &str = "Verification email sent! Please check your inbox.";
/// Notice shown after a password-reset email goes out.
pub const RESET_SENT: &str = "Password reset email sent! Please check your inbox.";
/// Notice shown when the account exists but verification could not be sent.
pub const VERIFICATION_FAILED: &str = "Account created, but verification email failed to send. Please try resending verification later.";

/// Which form the panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelMode {
    /// Provider buttons.
    #[default]
    Options,
    /// Email sign-up form.
    SignUp,
    /// Email sign-in form.
    SignIn,
}

/// Sign-in panel state.
pub struct AuthPanel<I: ?Sized> {
    gateway: AuthGateway<I>,
    notices: Arc<NoticeBoard>,
    mode: Mutex<PanelMode>,
    loading: AtomicBool,
}

struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn start(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<I> AuthPanel<I>
where
    I: IdentityProvider + ?Sized,
{
    /// Create a panel in [`PanelMode::Options`].
    pub fn new(gateway: AuthGateway<I>, notices: Arc<NoticeBoard>) -> Self {
        Self {
            gateway,
            notices,
            mode: Mutex::new(PanelMode::Options),
            loading: AtomicBool::new(false),
        }
    }

    /// Current form.
    pub fn mode(&self) -> PanelMode {
        *self.mode.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Switch forms.
    pub fn set_mode(&self, mode: PanelMode) {
        *self.mode.lock().unwrap_or_else(PoisonError::into_inner) = mode;
    }

    /// Whether a request is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Visible status notice.
    pub fn notice(&self) -> Option<Notice> {
        self.notices.current()
    }

    /// The wrapped gateway.
    pub fn gateway(&self) -> &AuthGateway<I> {
        &self.gateway
    }

    fn report(&self, context: &str, err: &Error) {
        error!(error = %err, "{context} failed");
        self.notices.error(err.message());
    }

    fn credentials(&self, email: &str, password: &str) -> Option<EmailCredentials> {
        match EmailCredentials::try_from_parts(email, password) {
            Ok(credentials) => Some(credentials),
            Err(CredentialsValidationError::EmptyEmail) => {
                self.notices.error(MISSING_EMAIL);
                None
            }
            Err(CredentialsValidationError::EmptyPassword) => {
                self.notices.error(MISSING_PASSWORD);
                None
            }
        }
    }

    /// Start a Google redirect; returns the URL to open.
    pub async fn sign_in_with_google(&self, continue_uri: &Url) -> Option<Url> {
        self.notices.clear();
        match self.gateway.sign_in_with_google(continue_uri).await {
            Ok(url) => Some(url),
            Err(err) => {
                self.report("google sign-in", &err);
                None
            }
        }
    }

    /// Finish a pending Google redirect with the provider's `callback`.
    ///
    /// Does nothing when no redirect is pending. Failures become notices.
    pub async fn resume_redirect(&self, callback: Option<&Url>) -> Option<AuthSession> {
        let _loading = LoadingGuard::start(&self.loading);
        match self.gateway.resume_redirect(callback).await {
            Ok(session) => session,
            Err(err) => {
                self.report("google sign-in", &err);
                None
            }
        }
    }

    /// Sign up with email and password.
    ///
    /// An already registered email switches the panel to
    /// [`PanelMode::SignIn`], whether the lookup finds the account or the
    /// provider rejects the create.
    pub async fn sign_up(&self, email: &str, password: &str) -> Option<AuthSession> {
        self.notices.clear();
        let credentials = self.credentials(email, password)?;
        let _loading = LoadingGuard::start(&self.loading);
        match self.gateway.sign_up_with_email(&credentials).await {
            Ok(SignUpOutcome::AlreadyRegistered) => {
                self.notices.error(AuthErrorKind::EmailInUse.user_message());
                self.set_mode(PanelMode::SignIn);
                None
            }
            Ok(SignUpOutcome::VerificationSent(session)) => {
                self.notices.success(VERIFICATION_SENT);
                Some(session)
            }
            Ok(SignUpOutcome::VerificationFailed(session)) => {
                self.notices.error(VERIFICATION_FAILED);
                Some(session)
            }
            Err(err) => {
                self.report("sign-up", &err);
                if err.reason() == Some(AuthErrorKind::EmailInUse.code()) {
                    self.set_mode(PanelMode::SignIn);
                }
                None
            }
        }
    }

    /// Sign in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Option<AuthSession> {
        self.notices.clear();
        let credentials = self.credentials(email, password)?;
        let _loading = LoadingGuard::start(&self.loading);
        match self.gateway.sign_in_with_email(&credentials).await {
            Ok(session) => Some(session),
            Err(err) => {
                self.report("sign-in", &err);
                None
            }
        }
    }

    /// Send a password-reset email to `email`.
    pub async fn reset_password(&self, email: &str) -> bool {
        let Ok(address) = EmailAddress::new(email) else {
            self.notices.error(MISSING_EMAIL);
            return false;
        };
        match self.gateway.send_password_reset(&address).await {
            Ok(()) => {
                self.notices.success(RESET_SENT);
                true
            }
            Err(err) => {
                self.report("password reset", &err);
                false
            }
        }
    }

    /// Resend the verification email for the signed-in user.
    pub async fn resend_verification(&self) -> bool {
        match self.gateway.resend_verification().await {
            Ok(()) => {
                self.notices.success(VERIFICATION_SENT);
                true
            }
            Err(err) => {
                self.report("resend verification", &err);
                false
            }
        }
    }

    /// Sign out, clear the notice and return to [`PanelMode::Options`].
    pub async fn sign_out(&self) -> bool {
        let _loading = LoadingGuard::start(&self.loading);
        match self.gateway.sign_out().await {
            Ok(()) => {
                self.notices.clear();
                self.set_mode(PanelMode::Options);
                true
            }
            Err(err) => {
                self.report("sign-out", &err);
                false
            }
        }
    }
}
