//! Loader: registry assembly, profile resolution, layer ordering, and
//! post-merge derivation.

use camino::Utf8PathBuf;

use crate::StrataConfig;
use crate::error::{StrataError, StrataResult};
use crate::merge::{Layer, apply_layer};
use crate::registry::FieldMap;
use crate::runtime::{self, HostProbe};
use crate::store::{DocumentFormat, DocumentStore};

/// Environment variable selecting the active profile.
pub const KEY_ENV: &str = "env";

/// Profile assumed when the `env` variable is unset.
pub const DEFAULT_PROFILE: &str = "product";

/// Profile whose document may fall back to the embedded blob.
const DEFAULT_DOCUMENT: &str = "default";

/// Document base-name convention: `config_<profile>`.
const FILE_STEM: &str = "config";
const NAME_SPLITTER: char = '_';

/// Extra directory searched so suites running from a package root find
/// their fixture documents.
const TEST_SEARCH_PATH: &str = "tests/data";

/// Fill `cfg` from the default layers and search paths.
///
/// Equivalent to `Loader::new().load(cfg)`; this is the only operation most
/// consumers need.
///
/// # Errors
///
/// Propagates any [`StrataError`] from [`Loader::load`].
pub fn fill_config<C: StrataConfig>(cfg: &mut C) -> StrataResult<()> {
    Loader::new().load(cfg)
}

/// Drives one configuration load.
///
/// A loader owns everything a load needs besides the destination: the
/// embedded default document, the document format, the ordered search
/// paths, and the host probe. Each layer constructs its own
/// [`DocumentStore`], so loads are isolated from one another and from any
/// earlier load in the same process.
pub struct Loader {
    embedded_default: Option<String>,
    format: DocumentFormat,
    search_paths: Vec<Utf8PathBuf>,
    host_probe: HostProbe,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader {
    /// Create a loader with the default search paths (the working directory
    /// and the test fixture directory) and no embedded default document.
    #[must_use]
    pub fn new() -> Self {
        Self {
            embedded_default: None,
            format: DocumentFormat::default(),
            search_paths: vec![
                Utf8PathBuf::from("."),
                Utf8PathBuf::from(TEST_SEARCH_PATH),
            ],
            host_probe: runtime::outbound_host,
        }
    }

    /// Set the document used when `config_default` is absent from every
    /// search path.
    #[must_use]
    pub fn with_embedded_default(mut self, document: impl Into<String>) -> Self {
        self.embedded_default = Some(document.into());
        self
    }

    /// Set the document format (and thereby the file extension searched).
    #[must_use]
    pub fn with_document_format(mut self, format: DocumentFormat) -> Self {
        self.format = format;
        self
    }

    /// Append a directory to the ordered document search paths.
    #[must_use]
    pub fn add_search_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.search_paths.push(path.into());
        self
    }

    /// Replace the search paths entirely.
    #[must_use]
    pub fn with_search_paths(mut self, paths: impl IntoIterator<Item = Utf8PathBuf>) -> Self {
        self.search_paths = paths.into_iter().collect();
        self
    }

    /// Replace the host probe used during post-merge derivation.
    ///
    /// Tests inject a fixed address here instead of probing the network.
    #[must_use]
    pub fn with_host_probe(mut self, probe: HostProbe) -> Self {
        self.host_probe = probe;
        self
    }

    /// Resolve the profile, merge the three layers in order, and derive the
    /// runtime fields.
    ///
    /// Layer order is the central correctness property: defaults, then the
    /// profile document, then environment variables, so later sources win
    /// for any key present in both.
    ///
    /// # Errors
    ///
    /// Returns the first [`StrataError`] encountered; a failed load leaves
    /// `cfg` partially written and unusable.
    pub fn load<C: StrataConfig>(&self, cfg: &mut C) -> StrataResult<()> {
        let mut registry = FieldMap::base();
        cfg.append_field_map(&mut registry);

        let profile = active_profile();
        tracing::debug!(%profile, "resolved configuration profile");
        cfg.base_mut().env = profile.clone();

        for layer in [
            Layer::Defaults,
            Layer::Profile(profile),
            Layer::Environment,
        ] {
            let store = self.store_for(&layer)?;
            apply_layer(&registry, &store, cfg)?;
        }

        runtime::derive(cfg.base_mut(), self.host_probe)
    }

    /// Build the store backing `layer`.
    fn store_for(&self, layer: &Layer) -> StrataResult<DocumentStore> {
        match layer {
            Layer::Defaults => self.document_store(DEFAULT_DOCUMENT),
            Layer::Profile(profile) => self.document_store(profile),
            Layer::Environment => {
                let mut store = DocumentStore::new();
                store.bind_environment();
                Ok(store)
            }
        }
    }

    /// Load the document for `profile`, falling back to the embedded blob
    /// for the default profile only. A missing document for any other
    /// profile is an error: a named profile is assumed intentional.
    fn document_store(&self, profile: &str) -> StrataResult<DocumentStore> {
        let mut store = DocumentStore::new();
        store.set_document_name(format!("{FILE_STEM}{NAME_SPLITTER}{profile}"));
        store.set_document_format(self.format);
        for path in &self.search_paths {
            store.add_search_path(path.clone());
        }
        match store.load_active_document() {
            Ok(path) => {
                tracing::debug!(document = %path, profile, "document loaded");
                Ok(store)
            }
            Err(StrataError::DocumentNotFound { .. }) if profile == DEFAULT_DOCUMENT => {
                let Some(blob) = self.embedded_default.as_deref() else {
                    return Err(StrataError::embedded_fallback(std::io::Error::other(
                        "no embedded default document configured",
                    )));
                };
                store
                    .load_from_str(blob)
                    .map_err(StrataError::embedded_fallback)?;
                tracing::debug!(profile, "document loaded from embedded default");
                Ok(store)
            }
            Err(err) => Err(err),
        }
    }
}

/// Resolve the active profile from the environment, before any layer runs.
fn active_profile() -> String {
    let mut env_store = DocumentStore::new();
    env_store.bind_environment();
    env_store
        .get_string(KEY_ENV)
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_PROFILE.to_owned())
}
