//! Command-line front end.
//!
//! Each invocation runs one command against a [`Shell`] and yields status
//! lines. Every failure collapses into a single [`Error`] whose message is
//! what the user sees.

use std::fmt;

use clap::{Parser, Subcommand};
use colour_scheme::{Colour, Palette, Scheme, adjust_lightness, contrast_ratio, meets_contrast};
use url::Url;
use zeroize::Zeroizing;

use crate::domain::{DomainResult, Error, FontFamily, NoticeTone, RecordId, UserId};
use crate::shell::Shell;

/// `hueharmony` command arguments.
#[derive(Parser)]
#[command(
    name = "hueharmony",
    about = "Generate colour palettes, browse fonts and keep your favourites",
    version
)]
pub struct Cli {
    /// Emit logs as JSON.
    #[arg(long, global = true)]
    pub json: bool,
    /// Account used by commands that read or write saved items.
    #[arg(long, global = true, env = "HUEHARMONY_EMAIL", value_name = "email")]
    pub email: Option<String>,
    /// Account password.
    #[arg(
        long,
        global = true,
        env = "HUEHARMONY_PASSWORD",
        hide_env_values = true,
        value_name = "password"
    )]
    pub password: Option<String>,
    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

impl fmt::Debug for Cli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cli")
            .field("json", &self.json)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("command", &self.command)
            .finish()
    }
}

/// Available commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Generate a five-colour palette.
    Palette {
        /// Base colour; random when omitted.
        #[arg(long)]
        seed: Option<String>,
        /// Scheme name; random when omitted.
        #[arg(long)]
        scheme: Option<Scheme>,
    },
    /// Check two colours against the 4.5:1 readability threshold.
    Contrast {
        /// First colour.
        first: String,
        /// Second colour.
        second: String,
    },
    /// Set a colour's HSL lightness.
    Lighten {
        /// Colour to adjust.
        colour: String,
        /// Target lightness between 0 and 1.
        target: f64,
    },
    /// List popular fonts.
    Fonts {
        /// Number of families to print.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Select a font and print its stylesheet link.
    SelectFont {
        /// Family name; a random catalogue font when omitted.
        family: Option<String>,
    },
    /// Start a Google sign-in; prints the page to visit and the session id
    /// that `finish-google-sign-in` needs.
    GoogleSignIn,
    /// Finish a Google sign-in with the address the provider redirected to.
    FinishGoogleSignIn {
        /// Session id printed by `google-sign-in`.
        #[arg(long)]
        session_id: String,
        /// Full redirect URL, including its query.
        callback: String,
    },
    /// Create an account and send a verification email.
    SignUp {
        /// Account email.
        email: String,
    },
    /// Sign in with email and password.
    ///
    /// Without Firebase settings only accounts created earlier in the same
    /// process exist, so this reports invalid credentials.
    SignIn {
        /// Account email.
        email: String,
    },
    /// Send a password-reset email.
    ResetPassword {
        /// Account email.
        email: String,
    },
    /// Save a generated palette.
    SavePalette {
        /// Base colour; random when omitted.
        #[arg(long)]
        seed: Option<String>,
        /// Scheme name; random when omitted.
        #[arg(long)]
        scheme: Option<Scheme>,
    },
    /// List saved palettes.
    ListPalettes,
    /// Delete a saved palette.
    DeletePalette {
        /// Saved palette id.
        id: String,
    },
    /// Save a font family.
    SaveFont {
        /// Family name.
        family: String,
    },
    /// List saved fonts.
    ListFonts,
    /// Delete a saved font.
    DeleteFont {
        /// Saved font id.
        id: String,
    },
}

/// Run `cli` against `shell`, returning the lines to print.
///
/// # Errors
///
/// Returns the domain [`Error`] describing the first failure.
pub async fn run(cli: &Cli, shell: &Shell) -> DomainResult<Vec<String>> {
    let password = Zeroizing::new(cli.password.clone().unwrap_or_default());
    match &cli.command {
        Command::Palette { seed, scheme } => {
            let palette = generate(shell, seed.as_deref(), *scheme)?;
            Ok(render_palette(&palette))
        }
        Command::Contrast { first, second } => contrast(first, second),
        Command::Lighten { colour, target } => adjust_lightness(colour, *target)
            .map(|hex| vec![hex])
            .map_err(|err| Error::invalid_request(err.to_string())),
        Command::Fonts { limit } => {
            let fonts = shell.catalogue().load_fonts().await;
            if fonts.is_empty() {
                return Err(Error::service_unavailable("No fonts available"));
            }
            Ok(fonts
                .into_iter()
                .take(*limit)
                .map(|entry| entry.family.to_string())
                .collect())
        }
        Command::SelectFont { family } => select_font(shell, family.as_deref()).await,
        Command::GoogleSignIn => {
            let url = shell
                .panel()
                .sign_in_with_google(shell.continue_uri())
                .await
                .ok_or_else(|| panel_failure(shell))?;
            let mut lines = vec![url.to_string()];
            lines.extend(
                shell
                    .pending_redirect()
                    .map(|session_id| format!("Session id: {session_id}")),
            );
            Ok(lines)
        }
        Command::FinishGoogleSignIn {
            session_id,
            callback,
        } => {
            if session_id.trim().is_empty() {
                return Err(Error::invalid_request("Session id must not be empty"));
            }
            let callback = Url::parse(callback)
                .map_err(|err| Error::invalid_request(format!("Invalid callback URL: {err}")))?;
            let session = shell
                .finish_google_sign_in(session_id.trim(), &callback)
                .await
                .ok_or_else(|| panel_failure(shell))?;
            Ok(vec![format!("Signed in as {}", session.user().label())])
        }
        Command::SignUp { email } => {
            let outcome = shell.panel().sign_up(email, &password).await;
            panel_status(shell, outcome.is_some())
        }
        Command::SignIn { email } => {
            let session = shell
                .sign_in(email, &password)
                .await
                .ok_or_else(|| panel_failure(shell))?;
            Ok(vec![format!("Signed in as {}", session.user().label())])
        }
        Command::ResetPassword { email } => {
            let sent = shell.panel().reset_password(email).await;
            panel_status(shell, sent)
        }
        Command::SavePalette { seed, scheme } => {
            let palette = generate(shell, seed.as_deref(), *scheme)?;
            let user_id = authenticate(cli, &password, shell).await?;
            let id = shell.preferences().save_palette(&user_id, &palette).await?;
            let mut lines = render_palette(&palette);
            lines.push(format!("Saved palette {id}"));
            Ok(lines)
        }
        Command::ListPalettes => {
            let user_id = authenticate(cli, &password, shell).await?;
            let saved = shell.preferences().list_palettes(&user_id).await?;
            Ok(saved
                .iter()
                .map(|item| {
                    format!(
                        "{} {} {} {}",
                        item.id,
                        item.palette.scheme(),
                        item.palette.hex_colours().join(" "),
                        item.created_at.to_rfc3339()
                    )
                })
                .collect())
        }
        Command::DeletePalette { id } => {
            let id = record_id(id)?;
            let user_id = authenticate(cli, &password, shell).await?;
            shell.preferences().delete_palette(&user_id, &id).await?;
            Ok(vec![format!("Deleted palette {id}")])
        }
        Command::SaveFont { family } => {
            let family = font_family(family)?;
            let user_id = authenticate(cli, &password, shell).await?;
            let id = shell.preferences().save_font(&user_id, &family).await?;
            Ok(vec![format!("Saved font {family} as {id}")])
        }
        Command::ListFonts => {
            let user_id = authenticate(cli, &password, shell).await?;
            let saved = shell.preferences().list_fonts(&user_id).await?;
            Ok(saved
                .iter()
                .map(|item| {
                    format!(
                        "{} {} {}",
                        item.id,
                        item.font_family,
                        item.created_at.to_rfc3339()
                    )
                })
                .collect())
        }
        Command::DeleteFont { id } => {
            let id = record_id(id)?;
            let user_id = authenticate(cli, &password, shell).await?;
            shell.preferences().delete_font(&user_id, &id).await?;
            Ok(vec![format!("Deleted font {id}")])
        }
    }
}

fn generate(shell: &Shell, seed: Option<&str>, scheme: Option<Scheme>) -> DomainResult<Palette> {
    shell.generate_palette(seed, scheme).ok_or_else(|| {
        Error::invalid_request(format!(
            "Could not generate a palette from '{}'",
            seed.unwrap_or_default()
        ))
    })
}

fn render_palette(palette: &Palette) -> Vec<String> {
    let mut lines = vec![format!(
        "{} from {}",
        palette.scheme(),
        palette.base_colour()
    )];
    lines.extend(palette.hex_colours());
    lines
}

fn contrast(first: &str, second: &str) -> DomainResult<Vec<String>> {
    let parse = |raw: &str| {
        raw.parse::<Colour>()
            .map_err(|err| Error::invalid_request(err.to_string()))
    };
    let ratio = contrast_ratio(&parse(first)?, &parse(second)?);
    let verdict = if meets_contrast(ratio) {
        "readable"
    } else {
        "too low"
    };
    Ok(vec![format!("{ratio:.2}:1 {verdict}")])
}

async fn select_font(shell: &Shell, family: Option<&str>) -> DomainResult<Vec<String>> {
    let catalogue = shell.catalogue();
    let chosen = match family {
        Some(raw) => {
            let family = font_family(raw)?;
            catalogue.select_font(&family);
            family
        }
        None => {
            catalogue.load_fonts().await;
            catalogue
                .select_random_font(&mut rand::thread_rng())
                .ok_or_else(|| Error::service_unavailable("No fonts available"))?
        }
    };
    Ok(vec![chosen.to_string(), shell.head().render()])
}

async fn authenticate(cli: &Cli, password: &str, shell: &Shell) -> DomainResult<UserId> {
    let email = cli
        .email
        .as_deref()
        .ok_or_else(|| Error::unauthorized("Please sign in first"))?;
    shell
        .authenticate(email, password)
        .await
        .ok_or_else(|| panel_failure(shell))?;
    shell.user_id()
}

fn panel_status(shell: &Shell, succeeded: bool) -> DomainResult<Vec<String>> {
    match shell.panel().notice() {
        Some(notice) if succeeded || notice.tone == NoticeTone::Success => {
            Ok(vec![notice.message])
        }
        Some(notice) => Err(Error::unauthorized(notice.message)),
        None if succeeded => Ok(Vec::new()),
        None => Err(Error::unauthorized("Authentication failed.")),
    }
}

fn panel_failure(shell: &Shell) -> Error {
    shell
        .panel()
        .notice()
        .map_or_else(
            || Error::unauthorized("Authentication failed."),
            |notice| Error::unauthorized(notice.message),
        )
}

fn record_id(raw: &str) -> DomainResult<RecordId> {
    RecordId::new(raw).map_err(|err| Error::invalid_request(err.to_string()))
}

fn font_family(raw: &str) -> DomainResult<FontFamily> {
    FontFamily::new(raw).map_err(|err| Error::invalid_request(err.to_string()))
}
