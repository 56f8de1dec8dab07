use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the `netbox2ise-api` crate.
///
/// Covers reading and writing the captured NetBox export and ISE snapshot.
/// `netbox2ise-core` maps these into collaborator-level conditions.
#[derive(Debug, Error)]
pub enum Error {
    // ── Files ───────────────────────────────────────────────────────
    /// The export or snapshot file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// JSON serialization failed while persisting a snapshot.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The `SearchResult` pages ran out before `total` entries were seen.
    #[error("incomplete {collection} pages: total is {total} but only {received} were captured")]
    IncompletePages {
        collection: &'static str,
        total: u64,
        received: u64,
    },

    // ── Writes ──────────────────────────────────────────────────────
    /// A create targeted a name that already exists.
    #[error("{kind} '{name}' already exists")]
    AlreadyExists { kind: &'static str, name: String },

    /// An update targeted an id or name that does not exist.
    #[error("{kind} '{identifier}' not found")]
    NotFound {
        kind: &'static str,
        identifier: String,
    },
}

impl Error {
    /// Returns `true` if the error came from the file layer rather than
    /// from the content of the file.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns `true` if this is a per-entity write rejection.
    pub fn is_write_rejection(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. } | Self::NotFound { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn deserialization(err: &serde_json::Error, body: &str) -> Self {
        let preview: String = body.chars().take(200).collect();
        Self::Deserialization {
            message: format!("{err} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    }
}
