//! Error types for pool loading and generation.

use std::path::PathBuf;

/// Errors surfaced by the generator library.
///
/// Almost everything the synthesizer runs into is handled locally (ineligible
/// candidates are skipped, exhausted searches fall back to safe statements);
/// only genuinely unrecoverable conditions are represented here.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// A type reached the value allocator with neither a literal rule nor a
    /// usable constructor. This means the eligibility filter is broken, so
    /// it is fatal rather than something to paper over with invalid code.
    #[error("type '{0}' has no literal rule and no usable constructor")]
    NoAllocationRule(String),

    /// The universe offered no eligible type while the configured minimum
    /// required at least one.
    #[error("no eligible type available in the universe (required for {0})")]
    EmptyUniverse(&'static str),

    /// The pool hand-off file could not be read.
    #[error("failed to read pool file '{}': {source}", .path.display())]
    PoolRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The pool hand-off file could not be parsed.
    #[error("failed to parse pool file '{}': {source}", .path.display())]
    PoolParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The requested generation profile does not exist.
    #[error("unknown profile '{0}'")]
    UnknownProfile(String),

    /// An embedded or user-supplied profile failed to parse.
    #[error("failed to parse profile '{name}': {message}")]
    ProfileParse { name: String, message: String },
}
