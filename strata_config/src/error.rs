//! Error types produced by the configuration loader.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::coerce::CoerceError;
use crate::field::PathError;

/// Convenience alias for results produced by this crate.
pub type StrataResult<T> = Result<T, StrataError>;

type Source = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while resolving layered configuration.
///
/// None of these are retried: loading runs once at startup and a partially
/// configured process is unsafe to run, so callers are expected to treat any
/// variant as fatal. The engine reports rather than aborts, leaving that
/// policy to the caller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StrataError {
    /// A named document was absent from every search path.
    ///
    /// Non-fatal only inside the defaults layer, where the loader falls back
    /// to the embedded blob; fatal for any explicitly named profile.
    #[error("document '{name}' not found in search paths {searched:?}")]
    DocumentNotFound {
        /// Document base name, e.g. `config_product`.
        name: String,
        /// Directories searched, in order.
        searched: Vec<Utf8PathBuf>,
    },

    /// The compiled-in default document was missing or failed to parse.
    #[error("embedded default document unusable: {source}")]
    EmbeddedFallback {
        /// Underlying parse failure, or the absence of a configured blob.
        #[source]
        source: Source,
    },

    /// A located document could not be read or parsed.
    #[error("invalid document '{origin}': {source}")]
    InvalidDocument {
        /// Path or description of the offending document.
        origin: String,
        /// Underlying I/O or parse failure.
        #[source]
        source: Source,
    },

    /// A registered field path does not resolve on the destination.
    ///
    /// Indicates a registry/destination mismatch: the consumer registered a
    /// binding whose path names a field the destination does not have.
    #[error("config item '{key}': field path '{path}': {source}")]
    PathNotFound {
        /// Configuration key whose binding failed to resolve.
        key: String,
        /// The registered field path.
        path: String,
        /// The failing segment.
        #[source]
        source: PathError,
    },

    /// A raw value could not be coerced to the destination field's type.
    #[error("config item '{key}': {source}")]
    Coercion {
        /// Configuration key whose value failed to coerce.
        key: String,
        /// Underlying parse failure, including the raw value.
        #[source]
        source: CoerceError,
    },

    /// A registered field path lands on a nested structure, not a leaf.
    #[error("config item '{key}': field path '{path}' is a nested structure, not a value")]
    UnsupportedFieldType {
        /// Configuration key whose binding is invalid.
        key: String,
        /// The registered field path.
        path: String,
    },

    /// Working-directory or host discovery failed after merging.
    #[error("runtime probe for {what} failed: {source}")]
    RuntimeProbe {
        /// Which derived field was being probed.
        what: &'static str,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

impl StrataError {
    pub(crate) fn document_not_found(name: impl Into<String>, searched: &[Utf8PathBuf]) -> Self {
        Self::DocumentNotFound {
            name: name.into(),
            searched: searched.to_vec(),
        }
    }

    pub(crate) fn embedded_fallback(source: impl Into<Source>) -> Self {
        Self::EmbeddedFallback {
            source: source.into(),
        }
    }

    pub(crate) fn invalid_document(origin: impl Into<String>, source: impl Into<Source>) -> Self {
        Self::InvalidDocument {
            origin: origin.into(),
            source: source.into(),
        }
    }

    pub(crate) fn path_not_found(
        key: impl Into<String>,
        path: impl Into<String>,
        source: PathError,
    ) -> Self {
        Self::PathNotFound {
            key: key.into(),
            path: path.into(),
            source,
        }
    }

    pub(crate) fn coercion(key: impl Into<String>, source: CoerceError) -> Self {
        Self::Coercion {
            key: key.into(),
            source,
        }
    }

    pub(crate) fn unsupported_field_type(key: impl Into<String>, path: impl Into<String>) -> Self {
        Self::UnsupportedFieldType {
            key: key.into(),
            path: path.into(),
        }
    }

    pub(crate) fn runtime_probe(what: &'static str, source: std::io::Error) -> Self {
        Self::RuntimeProbe { what, source }
    }
}
