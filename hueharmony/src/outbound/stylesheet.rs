//! Document head that records injected stylesheet links.

use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::domain::ports::StylesheetSink;

/// Ordered list of `<link rel="stylesheet">` hrefs.
///
/// Links are appended, never replaced, so selecting the same font twice
/// leaves two identical entries.
///
/// # Examples
/// ```
/// use hueharmony::domain::ports::StylesheetSink;
/// use hueharmony::outbound::stylesheet::DocumentHead;
///
/// let head = DocumentHead::new();
/// head.append_stylesheet("https://fonts.googleapis.com/css2?family=Lato&display=swap");
/// assert_eq!(
///     head.render(),
///     "<link rel=\"stylesheet\" href=\"https://fonts.googleapis.com/css2?family=Lato&amp;display=swap\">"
/// );
/// ```
#[derive(Debug, Default)]
pub struct DocumentHead {
    links: Mutex<Vec<String>>,
}

impl DocumentHead {
    /// Empty head.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hrefs in insertion order.
    pub fn links(&self) -> Vec<String> {
        self.links
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// One `<link>` element per line.
    pub fn render(&self) -> String {
        self.links()
            .iter()
            .map(|href| format!("<link rel=\"stylesheet\" href=\"{}\">", escape_attribute(href)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl StylesheetSink for DocumentHead {
    fn append_stylesheet(&self, href: &str) {
        debug!(href, "appending stylesheet link");
        self.links
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(href.to_owned());
    }
}

fn escape_attribute(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FontFamily;

    #[test]
    fn repeated_links_are_kept() {
        let head = DocumentHead::new();
        let href = FontFamily::new("Open Sans")
            .expect("valid family")
            .stylesheet_href();

        head.append_stylesheet(&href);
        head.append_stylesheet(&href);

        assert_eq!(head.links(), vec![href.clone(), href]);
        assert_eq!(head.render().lines().count(), 2);
    }

    #[test]
    fn attributes_are_escaped() {
        assert_eq!(escape_attribute("a\"b<c>&"), "a&quot;b&lt;c&gt;&amp;");
    }
}
