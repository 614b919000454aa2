//! HueHarmony: colour palettes, a font picker and per-user saved
//! preferences behind a pluggable identity provider.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod shell;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::HueHarmonySettings;
pub use shell::Shell;
