//! Domain primitives, services and ports.
//!
//! Purpose: hold everything HueHarmony decides for itself (palette
//! generation, capacity rules, sign-in sequencing, notice timing) behind
//! ports, so adapters in `outbound` and front ends in `inbound` stay thin.
//!
//! Public surface:
//! - Error, ErrorCode: transport-agnostic failure payload.
//! - PaletteGenerator: "log and return nothing" wrapper over `colour-scheme`.
//! - FontCatalogService, PreferenceService, AuthGateway: driving services.
//! - AuthPanel, NoticeBoard: headless view models.

pub mod auth;
pub mod auth_error;
pub mod auth_panel;
pub mod auth_service;
pub mod error;
pub mod font_catalog;
pub mod fonts;
pub mod notice;
pub mod palette_generator;
pub mod ports;
pub mod preferences;
pub mod preferences_service;
pub mod session;
pub mod user;

pub use self::auth::{CredentialsValidationError, EmailAddress, EmailCredentials};
pub use self::auth_error::AuthErrorKind;
pub use self::auth_panel::{AuthPanel, PanelMode};
pub use self::auth_service::{AuthGateway, SignUpOutcome, map_identity_error};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::font_catalog::FontCatalogService;
pub use self::fonts::{FONT_CATALOG_LIMIT, FontEntry, FontFamily, FontFamilyValidationError};
pub use self::notice::{DEFAULT_NOTICE_DISMISS, Notice, NoticeBoard, NoticeTone};
pub use self::palette_generator::{PaletteGenerator, generate_scheme};
pub use self::preferences::{
    NewFont, NewPalette, RecordId, RecordIdValidationError, SAVED_ITEM_CAPACITY, SavedFont,
    SavedPalette,
};
pub use self::preferences_service::{CAPACITY_EXCEEDED, DUPLICATE_ITEM, PreferenceService};
pub use self::session::{
    AuthSession, AuthState, RedirectChallenge, SecretToken, SessionChannel, SessionSubscription,
};
pub use self::user::{AuthUser, UserId, UserValidationError};

/// Result alias for domain services.
pub type DomainResult<T> = Result<T, Error>;
