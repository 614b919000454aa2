//! HueHarmony configuration loaded via OrthoConfig.
//!
//! Values come from `HUEHARMONY_*` environment variables or the config file.
//! Remote adapters are used only when their keys are present and `offline`
//! is false; everything else falls back to in-memory adapters.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::outbound::firebase_auth::DEFAULT_IDENTITY_ENDPOINT;
use crate::outbound::firestore::DEFAULT_FIRESTORE_ENDPOINT;
use crate::outbound::google_fonts::DEFAULT_FONTS_ENDPOINT;

const DEFAULT_CONTINUE_URI: &str = "http://localhost:8080/";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// A URL-valued setting did not parse.
    #[error("setting {field} is not a valid URL: {message}")]
    InvalidUrl {
        /// Setting name.
        field: &'static str,
        /// Parser message.
        message: String,
    },
}

/// Configuration values for the CLI and its adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HUEHARMONY")]
pub struct HueHarmonySettings {
    /// API key for the web fonts catalogue.
    pub fonts_api_key: Option<String>,
    /// Catalogue endpoint override.
    pub fonts_endpoint: Option<String>,
    /// Web API key of the Firebase project.
    pub firebase_api_key: Option<String>,
    /// Firebase project id, used for Firestore paths.
    pub firebase_project_id: Option<String>,
    /// Identity Toolkit endpoint override.
    pub identity_endpoint: Option<String>,
    /// Firestore endpoint override.
    pub firestore_endpoint: Option<String>,
    /// Per-request HTTP timeout in seconds.
    #[ortho_config(default = 10)]
    pub http_timeout_secs: u64,
    /// Seconds before a status notice is dismissed.
    #[ortho_config(default = 3)]
    pub notice_dismiss_secs: u64,
    /// Where redirect sign-ins return to.
    pub continue_uri: Option<String>,
    /// Force in-memory adapters.
    #[ortho_config(default = false)]
    pub offline: bool,
}

/// Firebase project settings, present only when remote auth is usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirebaseSettings {
    /// Web API key.
    pub api_key: String,
    /// Project id.
    pub project_id: String,
    /// Identity Toolkit base URL.
    pub identity_endpoint: Url,
    /// Firestore base URL.
    pub firestore_endpoint: Url,
}

fn parse_url(field: &'static str, raw: Option<&str>, default: &str) -> Result<Url, SettingsError> {
    Url::parse(raw.unwrap_or(default)).map_err(|error| SettingsError::InvalidUrl {
        field,
        message: error.to_string(),
    })
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|text| text.trim()).filter(|text| !text.is_empty())
}

impl HueHarmonySettings {
    /// HTTP timeout shared by every remote adapter.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.max(1))
    }

    /// Notice dismissal delay.
    pub fn notice_dismiss(&self) -> Duration {
        Duration::from_secs(self.notice_dismiss_secs)
    }

    /// Redirect sign-in return address.
    pub fn continue_uri(&self) -> Result<Url, SettingsError> {
        parse_url("continue_uri", self.continue_uri.as_deref(), DEFAULT_CONTINUE_URI)
    }

    /// Catalogue endpoint and key, unless offline or no key is configured.
    pub fn fonts(&self) -> Result<Option<(Url, String)>, SettingsError> {
        if self.offline {
            return Ok(None);
        }
        let Some(key) = non_blank(self.fonts_api_key.as_ref()) else {
            return Ok(None);
        };
        let endpoint = parse_url(
            "fonts_endpoint",
            self.fonts_endpoint.as_deref(),
            DEFAULT_FONTS_ENDPOINT,
        )?;
        Ok(Some((endpoint, key.to_owned())))
    }

    /// Firebase settings, unless offline or incomplete.
    pub fn firebase(&self) -> Result<Option<FirebaseSettings>, SettingsError> {
        if self.offline {
            return Ok(None);
        }
        let (Some(api_key), Some(project_id)) = (
            non_blank(self.firebase_api_key.as_ref()),
            non_blank(self.firebase_project_id.as_ref()),
        ) else {
            return Ok(None);
        };
        Ok(Some(FirebaseSettings {
            api_key: api_key.to_owned(),
            project_id: project_id.to_owned(),
            identity_endpoint: parse_url(
                "identity_endpoint",
                self.identity_endpoint.as_deref(),
                DEFAULT_IDENTITY_ENDPOINT,
            )?,
            firestore_endpoint: parse_url(
                "firestore_endpoint",
                self.firestore_endpoint.as_deref(),
                DEFAULT_FIRESTORE_ENDPOINT,
            )?,
        }))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 10] = [
        "HUEHARMONY_FONTS_API_KEY",
        "HUEHARMONY_FONTS_ENDPOINT",
        "HUEHARMONY_FIREBASE_API_KEY",
        "HUEHARMONY_FIREBASE_PROJECT_ID",
        "HUEHARMONY_IDENTITY_ENDPOINT",
        "HUEHARMONY_FIRESTORE_ENDPOINT",
        "HUEHARMONY_HTTP_TIMEOUT_SECS",
        "HUEHARMONY_NOTICE_DISMISS_SECS",
        "HUEHARMONY_CONTINUE_URI",
        "HUEHARMONY_OFFLINE",
    ];

    fn load_from_empty_args() -> HueHarmonySettings {
        HueHarmonySettings::load_from_iter([OsString::from("hueharmony")])
            .expect("config should load")
    }

    fn env_with(overrides: &[(&str, &str)]) -> [(&'static str, Option<String>); 10] {
        KEYS.map(|key| {
            let value = overrides
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value).to_owned());
            (key, value)
        })
    }

    #[rstest]
    fn defaults_select_offline_adapters() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();

        assert_eq!(settings.http_timeout(), Duration::from_secs(10));
        assert_eq!(settings.notice_dismiss(), Duration::from_secs(3));
        assert!(!settings.offline);
        assert_eq!(settings.fonts(), Ok(None));
        assert_eq!(settings.firebase(), Ok(None));
        assert_eq!(
            settings.continue_uri().map(String::from),
            Ok(DEFAULT_CONTINUE_URI.to_owned())
        );
    }

    #[rstest]
    fn complete_firebase_settings_enable_remote_adapters() {
        let _guard = lock_env(env_with(&[
            ("HUEHARMONY_FIREBASE_API_KEY", "web-key"),
            ("HUEHARMONY_FIREBASE_PROJECT_ID", "hue-harmony"),
            ("HUEHARMONY_HTTP_TIMEOUT_SECS", "4"),
        ]));

        let settings = load_from_empty_args();
        let firebase = settings
            .firebase()
            .expect("urls parse")
            .expect("firebase configured");

        assert_eq!(firebase.project_id, "hue-harmony");
        assert_eq!(firebase.identity_endpoint.as_str(), DEFAULT_IDENTITY_ENDPOINT);
        assert_eq!(settings.http_timeout(), Duration::from_secs(4));
    }

    #[rstest]
    fn offline_overrides_configured_keys() {
        let _guard = lock_env(env_with(&[
            ("HUEHARMONY_FIREBASE_API_KEY", "web-key"),
            ("HUEHARMONY_FIREBASE_PROJECT_ID", "hue-harmony"),
            ("HUEHARMONY_FONTS_API_KEY", "fonts-key"),
            ("HUEHARMONY_OFFLINE", "true"),
        ]));

        let settings = load_from_empty_args();

        assert_eq!(settings.firebase(), Ok(None));
        assert_eq!(settings.fonts(), Ok(None));
    }

    #[rstest]
    fn malformed_endpoints_are_reported() {
        let _guard = lock_env(env_with(&[
            ("HUEHARMONY_FONTS_API_KEY", "fonts-key"),
            ("HUEHARMONY_FONTS_ENDPOINT", "not a url"),
        ]));

        let settings = load_from_empty_args();

        assert!(matches!(
            settings.fonts(),
            Err(SettingsError::InvalidUrl { field: "fonts_endpoint", .. })
        ));
    }
}
