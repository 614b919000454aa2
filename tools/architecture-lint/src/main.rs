//! Runs the layer boundary lint over the `hueharmony` crate.
//!
//! Pass a crate directory to lint something else; otherwise the workspace
//! root is located from `CARGO_WORKSPACE_DIR`, the working directory or this
//! tool's manifest, in that order.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const DEFAULT_CRATE: &str = "hueharmony";

fn main() -> ExitCode {
    let outcome = target_crate()
        .ok_or_else(|| {
            "unable to locate the workspace root (no Cargo.toml declaring [workspace])".to_owned()
        })
        .and_then(|dir| architecture_lint::lint_crate(&dir).map_err(|err| err.to_string()));

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            let _ = writeln!(io::stderr().lock(), "{message}");
            ExitCode::FAILURE
        }
    }
}

fn target_crate() -> Option<PathBuf> {
    if let Some(explicit) = std::env::args_os().nth(1) {
        return Some(PathBuf::from(explicit));
    }
    let candidates = [
        std::env::var_os("CARGO_WORKSPACE_DIR").map(PathBuf::from),
        std::env::current_dir().ok(),
        Some(PathBuf::from(env!("CARGO_MANIFEST_DIR"))),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|start| workspace_root(&start))
        .map(|root| root.join(DEFAULT_CRATE))
}

fn workspace_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| {
            fs::read_to_string(dir.join("Cargo.toml"))
                .is_ok_and(|manifest| manifest.contains("[workspace]"))
        })
        .map(Path::to_path_buf)
}
