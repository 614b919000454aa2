//! Layer boundary lint for the `hueharmony` crate.
//!
//! `hueharmony` keeps its decisions in `domain` (types, services, ports) and
//! pushes I/O to the edges: `outbound` adapters implement ports, `inbound`
//! front ends drive services through the `shell`. This lint parses every
//! source file under `domain/`, `inbound/` and `outbound/` and reports:
//!
//! - `domain` reaching into adapters, the shell or configuration, or naming
//!   HTTP, CLI or subscriber crates;
//! - `inbound` importing `outbound` adapters or an HTTP client directly;
//! - `outbound` importing `inbound`, the shell or the CLI parser.
//!
//! Run it with `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use syn::visit::Visit;

/// Name the linted crate uses for absolute self-references.
const CRATE_NAME: &str = "hueharmony";

/// One rule broken by one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Path relative to the crate's `src/`.
    pub file: PathBuf,
    /// Which rule was broken.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// Why a lint run did not pass.
#[derive(Debug, thiserror::Error)]
pub enum ArchitectureLintError {
    /// Sources could not be read.
    #[error("I/O error while linting layers: {0}")]
    Io(#[from] io::Error),
    /// A file could not be parsed or placed in a layer.
    #[error("cannot lint {}: {message}", file.display())]
    Parse {
        /// Offending file.
        file: PathBuf,
        /// Parser or layout message.
        message: String,
    },
    /// At least one rule was broken.
    #[error("{}", render_violations(.0))]
    Violations(Vec<Violation>),
}

fn render_violations(violations: &[Violation]) -> String {
    let mut out = String::from("Layer boundary violations:");
    for violation in violations {
        out.push_str("\n- ");
        out.push_str(&violation.to_string());
    }
    out
}

/// Lint the crate rooted at `crate_dir` (the directory holding its
/// `Cargo.toml` and `src/`).
///
/// # Errors
///
/// Returns [`ArchitectureLintError`] on I/O or parse failure, or when any
/// rule is broken.
pub fn lint_crate(crate_dir: &Path) -> Result<(), ArchitectureLintError> {
    let src_dir = crate_dir.join("src");
    let sources = collect_lint_sources(&src_dir)?;
    lint_sources(&sources)
}

/// Lint in-memory sources whose paths are relative to `src/`.
///
/// # Errors
///
/// See [`lint_crate`].
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();

    for source in sources {
        let layer = Layer::of(&source.file).ok_or_else(|| ArchitectureLintError::Parse {
            file: source.file.clone(),
            message: "file is not under domain/, inbound/ or outbound/".to_owned(),
        })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        violations.extend(check(&source.file, layer, &parsed));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

/// A source file to lint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `src/`.
    pub file: PathBuf,
    /// Rust source text.
    pub contents: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Domain,
    Inbound,
    Outbound,
}

impl Layer {
    const ALL: [Self; 3] = [Self::Domain, Self::Inbound, Self::Outbound];

    fn of(relative_path: &Path) -> Option<Self> {
        let first = relative_path.components().next()?.as_os_str().to_str()?;
        Self::ALL.into_iter().find(|layer| layer.dir() == first)
    }

    const fn dir(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    fn forbidden_modules(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &["inbound", "outbound", "shell", "config"],
            Self::Inbound => &["outbound"],
            Self::Outbound => &["inbound", "shell"],
        }
    }

    fn forbidden_crates(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &[
                "clap",
                "color_eyre",
                "ortho_config",
                "reqwest",
                "tracing_subscriber",
            ],
            Self::Inbound => &["reqwest"],
            Self::Outbound => &["clap", "color_eyre"],
        }
    }
}

fn check(file: &Path, layer: Layer, parsed: &syn::File) -> Vec<Violation> {
    let mut collector = PathCollector::default();
    collector.visit_file(parsed);

    let name = layer.dir();
    let mut messages = BTreeSet::new();
    for segments in &collector.paths {
        if let Some(module) = module_root(segments)
            .filter(|root| layer.forbidden_modules().contains(root))
        {
            messages.insert(format!("{name} module must not depend on crate::{module}"));
        }
        if let Some(krate) = external_root(segments)
            .filter(|root| layer.forbidden_crates().contains(root))
        {
            messages.insert(format!(
                "{name} module must not depend on external crate `{krate}`"
            ));
        }
    }

    messages
        .into_iter()
        .map(|message| Violation {
            file: file.to_path_buf(),
            message,
        })
        .collect()
}

fn is_relative(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

/// First crate-internal module named by `segments`, if any.
fn module_root(segments: &[String]) -> Option<&str> {
    let first = segments.first()?.as_str();
    if Layer::ALL.iter().any(|layer| layer.dir() == first) {
        return Some(first);
    }
    let index = if is_relative(first) {
        segments.iter().position(|segment| !is_relative(segment))?
    } else if first == CRATE_NAME {
        1
    } else {
        return None;
    };
    segments.get(index).map(String::as_str)
}

fn external_root(segments: &[String]) -> Option<&str> {
    let root = segments.first()?.as_str();
    if is_relative(root) || root == CRATE_NAME {
        None
    } else {
        Some(root)
    }
}

#[derive(Default)]
struct PathCollector {
    paths: BTreeSet<Vec<String>>,
}

impl PathCollector {
    fn record_use_tree(&mut self, tree: &syn::UseTree, mut prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.record_use_tree(&path.tree, prefix);
            }
            syn::UseTree::Name(name) => {
                prefix.push(name.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Rename(rename) => {
                prefix.push(rename.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Glob(_) => {
                prefix.push("*".to_owned());
                self.paths.insert(prefix);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use_tree(item, prefix.clone());
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for PathCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<String> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        if !segments.is_empty() {
            self.paths.insert(segments);
        }
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.record_use_tree(&node.tree, Vec::new());
    }
}

fn collect_lint_sources(src_dir: &Path) -> Result<Vec<LintSource>, ArchitectureLintError> {
    let mut sources = Vec::new();
    for layer in Layer::ALL {
        let dir = src_dir.join(layer.dir());
        if dir.is_dir() {
            collect_under(src_dir, &dir, &mut sources)?;
        }
    }
    Ok(sources)
}

fn collect_under(
    src_root: &Path,
    current: &Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    for entry in fs::read_dir(current)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_under(src_root, &path, sources)?;
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            let file = path
                .strip_prefix(src_root)
                .map_err(|err| ArchitectureLintError::Parse {
                    file: path.clone(),
                    message: err.to_string(),
                })?
                .to_path_buf();
            let contents = fs::read_to_string(&path)?;
            sources.push(LintSource { file, contents });
        }
    }
    Ok(())
}
