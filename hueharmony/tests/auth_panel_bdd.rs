//! Behavioural tests for the sign-in panel against the in-memory provider.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::sync::Arc;
use std::time::Duration;

use hueharmony::domain::{
    AuthGateway, AuthPanel, DEFAULT_NOTICE_DISMISS, NoticeBoard, PanelMode, SessionChannel,
};
use hueharmony::outbound::memory::{IdentityOperation, InMemoryIdentityProvider};
use hueharmony::test_support::MutableClock;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::Runtime;

struct PanelWorld {
    runtime: Runtime,
    clock: Arc<MutableClock>,
    provider: Arc<InMemoryIdentityProvider>,
    channel: SessionChannel,
    panel: AuthPanel<InMemoryIdentityProvider>,
}

impl PanelWorld {
    fn new() -> Self {
        let clock = Arc::new(MutableClock::default());
        let provider = Arc::new(InMemoryIdentityProvider::new());
        let channel = SessionChannel::new();
        let notices = Arc::new(NoticeBoard::new(clock.clone(), DEFAULT_NOTICE_DISMISS));
        Self {
            runtime: Runtime::new().expect("tokio runtime should initialize"),
            panel: AuthPanel::new(AuthGateway::new(provider.clone(), channel.clone()), notices),
            clock,
            provider,
            channel,
        }
    }

    fn notice_message(&self) -> Option<String> {
        self.panel.notice().map(|notice| notice.message)
    }
}

#[fixture]
fn world() -> PanelWorld {
    PanelWorld::new()
}

#[given("an account for \"{email}\"")]
fn an_account_for(world: &PanelWorld, email: String) {
    world.provider.add_account(&email, "hunter22");
}

#[given("no accounts")]
fn no_accounts(world: &PanelWorld) {
    assert_eq!(world.provider.account_count(), 0);
}

#[given("verification emails are failing")]
fn verification_emails_are_failing(world: &PanelWorld) {
    world
        .provider
        .fail_next(IdentityOperation::SendVerification, "TOO_MANY_ATTEMPTS_TRY_LATER");
}

#[when("the user signs up as \"{email}\" with password \"{password}\"")]
fn the_user_signs_up(world: &PanelWorld, email: String, password: String) {
    world.runtime.block_on(world.panel.sign_up(&email, &password));
}

#[when("the user signs in as \"{email}\" with password \"{password}\"")]
fn the_user_signs_in(world: &PanelWorld, email: String, password: String) {
    world
        .runtime
        .block_on(world.panel.sign_in(&email, &password))
        .expect("sign-in should succeed");
}

#[when("the user signs out")]
fn the_user_signs_out(world: &PanelWorld) {
    assert!(world.runtime.block_on(world.panel.sign_out()));
}

#[when("the user asks for a password reset without an email")]
fn the_user_asks_for_a_reset_without_email(world: &PanelWorld) {
    assert!(!world.runtime.block_on(world.panel.reset_password("  ")));
}

#[when("{seconds} seconds pass")]
fn seconds_pass(world: &PanelWorld, seconds: u64) {
    world.clock.advance(Duration::from_secs(seconds));
}

#[then("the panel shows the sign in form")]
fn the_panel_shows_sign_in(world: &PanelWorld) {
    assert_eq!(world.panel.mode(), PanelMode::SignIn);
}

#[then("the panel shows the options")]
fn the_panel_shows_options(world: &PanelWorld) {
    assert_eq!(world.panel.mode(), PanelMode::Options);
}

#[then("the notice reads \"{message}\"")]
fn the_notice_reads(world: &PanelWorld, message: String) {
    assert_eq!(world.notice_message(), Some(message));
}

#[then("no notice is shown")]
fn no_notice_is_shown(world: &PanelWorld) {
    assert_eq!(world.notice_message(), None);
}

#[then("the provider holds {count} account")]
fn the_provider_holds(world: &PanelWorld, count: usize) {
    assert_eq!(world.provider.account_count(), count);
}

#[then("the user is signed in")]
fn the_user_is_signed_in(world: &PanelWorld) {
    assert!(world.channel.current().is_authenticated());
}

#[then("nobody is signed in")]
fn nobody_is_signed_in(world: &PanelWorld) {
    assert!(!world.channel.current().is_authenticated());
}

#[then("{count} verification email was sent")]
fn verification_emails_sent(world: &PanelWorld, count: usize) {
    assert_eq!(world.provider.verification_emails().len(), count);
}

#[scenario(path = "tests/features/auth_panel.feature")]
fn auth_panel_scenarios(world: PanelWorld) {
    drop(world);
}
