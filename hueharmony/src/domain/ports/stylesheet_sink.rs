//! Driven port for loading font stylesheets into the host document.

/// Receives stylesheet links for selected fonts.
///
/// Appending is not idempotent: selecting the same font twice appends two
/// links.
#[cfg_attr(test, mockall::automock)]
pub trait StylesheetSink: Send + Sync {
    /// Append a `<link rel="stylesheet">` for `href`.
    fn append_stylesheet(&self, href: &str);
}
