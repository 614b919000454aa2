//! Error types for the colour-scheme crate.
//!
//! Parsing is the only fallible step in palette generation; every colour
//! transform after a successful parse is total.

use thiserror::Error;

/// Errors raised while interpreting colour input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColourError {
    /// The input was empty once trimmed.
    #[error("colour input must not be empty")]
    Empty,

    /// The input looked like a hex colour but had the wrong shape.
    #[error("invalid hex colour '{input}'")]
    InvalidHex {
        /// The rejected input.
        input: String,
    },

    /// A functional notation (`rgb()`, `hsl()`) could not be parsed.
    #[error("invalid {notation}() colour '{input}': {message}")]
    InvalidFunction {
        /// The function name, such as `rgb` or `hsl`.
        notation: &'static str,
        /// The rejected input.
        input: String,
        /// Description of the problem.
        message: String,
    },

    /// The input matched no supported notation or colour name.
    #[error("unrecognised colour '{input}'")]
    Unrecognised {
        /// The rejected input.
        input: String,
    },

    /// A scheme name did not match any known scheme.
    #[error("unknown colour scheme '{name}'")]
    UnknownScheme {
        /// The rejected scheme name.
        name: String,
    },
}
