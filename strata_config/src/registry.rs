//! The configuration-key → field-path registry.

use std::collections::BTreeMap;

/// Bindings present in every registry, covering the [`crate::BaseConfig`]
/// fields that all consumers share.
const BASE_BINDINGS: [(&str, &str); 5] = [
    ("prj.name", "project_name"),
    ("prj.version", "project_version"),
    ("port", "port"),
    ("release.mode", "release_mode"),
    ("log.root", "log_root"),
];

/// Mapping from dotted configuration keys to dotted destination field paths.
///
/// Keys are case-insensitive: they are normalised to lowercase at insertion
/// and matched uncased against document content. Registering a key twice
/// keeps the last binding. A registry lives for a single load: the loader
/// seeds it with [`FieldMap::base`], lets the consumer extend it, and
/// discards it when the merge completes.
///
/// # Examples
///
/// ```rust
/// use strata_config::FieldMap;
///
/// let mut map = FieldMap::base();
/// map.insert("mysql.conns.maxOpen", "max_open");
/// assert_eq!(map.get("MYSQL.CONNS.MAXOPEN"), Some("max_open"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct FieldMap {
    entries: BTreeMap<String, String>,
}

impl FieldMap {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with the base bindings.
    #[must_use]
    pub fn base() -> Self {
        let mut map = Self::new();
        for (key, path) in BASE_BINDINGS {
            map.insert(key, path);
        }
        map
    }

    /// Bind `key` to `path`, replacing any existing binding for the key.
    pub fn insert(&mut self, key: impl AsRef<str>, path: impl Into<String>) {
        self.entries
            .insert(key.as_ref().to_ascii_lowercase(), path.into());
    }

    /// Look up the field path bound to `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Iterate over `(key, path)` bindings.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, path)| (key.as_str(), path.as_str()))
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
