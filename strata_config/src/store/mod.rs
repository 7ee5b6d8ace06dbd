//! Layer-scoped access to documents and the process environment.
//!
//! A [`DocumentStore`] is an explicit value constructed fresh for every
//! layer, so repeated loads and tests never observe each other's search
//! paths or active document. Documents parse eagerly through figment's
//! providers; malformed content surfaces at load time, not at first lookup.

use camino::Utf8PathBuf;
use figment::Provider;
use figment::providers::{Env, Format, Toml, Yaml};
use figment::value::{Dict, Num, Value};
use uncased::UncasedStr;

use crate::error::{StrataError, StrataResult};

/// Separator used when mapping dotted keys onto environment variables:
/// `mysql.conns.maxOpen` answers from `MYSQL_CONNS_MAXOPEN`.
const ENV_KEY_SPLITTER: &str = "_";

/// Structured-text formats a document may use.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DocumentFormat {
    /// YAML documents (the default, `.yaml`).
    #[default]
    Yaml,
    /// TOML documents (`.toml`).
    Toml,
}

impl DocumentFormat {
    /// File extension used by the document naming convention.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Toml => "toml",
        }
    }

    /// Parse `data` into a key tree, attributing failures to `origin`.
    fn parse(self, origin: &str, data: &str) -> StrataResult<Dict> {
        let provided = match self {
            Self::Yaml => Yaml::string(data).data(),
            Self::Toml => Toml::string(data).data(),
        };
        let profiles = provided.map_err(|e| StrataError::invalid_document(origin, e))?;
        Ok(profiles
            .into_iter()
            .next()
            .map(|(_, dict)| dict)
            .unwrap_or_default())
    }
}

/// One layer's view of configuration values.
///
/// Holds at most one active document plus an optional binding to the
/// process environment, and answers string-valued queries for dotted,
/// case-insensitive keys.
#[derive(Debug, Default)]
pub struct DocumentStore {
    name: String,
    format: DocumentFormat,
    search_paths: Vec<Utf8PathBuf>,
    document: Option<Dict>,
    env_bound: bool,
}

impl DocumentStore {
    /// Create a store with no document, no search paths, and no environment
    /// binding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the active document's base name (without extension), e.g.
    /// `config_product`.
    pub fn set_document_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Set the format used to locate and parse the active document.
    pub fn set_document_format(&mut self, format: DocumentFormat) {
        self.format = format;
    }

    /// Append a directory to the ordered search path list.
    pub fn add_search_path(&mut self, path: impl Into<Utf8PathBuf>) {
        self.search_paths.push(path.into());
    }

    /// Answer lookups from process environment variables.
    ///
    /// Bound environment variables take precedence over the loaded
    /// document for every key.
    pub fn bind_environment(&mut self) {
        self.env_bound = true;
    }

    /// Locate, read, and parse the active document.
    ///
    /// Searches the configured directories in order for
    /// `<name>.<extension>` and loads the first hit, returning its path.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::DocumentNotFound`] when no search path holds
    /// the document, and [`StrataError::InvalidDocument`] when a located
    /// document cannot be read or parsed.
    pub fn load_active_document(&mut self) -> StrataResult<Utf8PathBuf> {
        let file_name = format!("{}.{}", self.name, self.format.extension());
        for dir in &self.search_paths {
            let candidate = dir.join(&file_name);
            if !candidate.is_file() {
                continue;
            }
            let data = std::fs::read_to_string(&candidate)
                .map_err(|e| StrataError::invalid_document(candidate.as_str(), e))?;
            self.document = Some(self.format.parse(candidate.as_str(), &data)?);
            return Ok(candidate);
        }
        Err(StrataError::document_not_found(
            self.name.as_str(),
            &self.search_paths,
        ))
    }

    /// Parse `data` as the active document, replacing any loaded one.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidDocument`] when `data` does not parse.
    pub fn load_from_str(&mut self, data: &str) -> StrataResult<()> {
        self.document = Some(self.format.parse("embedded document", data)?);
        Ok(())
    }

    /// Look up the string form of the value bound to a dotted key.
    ///
    /// Key segments match document keys case-insensitively. Scalars render
    /// to their canonical string form; absent keys and non-scalar values
    /// answer `None`.
    #[must_use]
    pub fn get_string(&self, key: &str) -> Option<String> {
        if self.env_bound {
            if let Some(value) = environment_value(key) {
                return Some(value);
            }
        }
        let document = self.document.as_ref()?;
        find_value(document, key).and_then(value_to_string)
    }
}

/// Look up a dotted key in the process environment.
///
/// Uses figment's raw environment provider with `_` splitting, so the key
/// `a.b.c` answers from the variable `A_B_C` (names are matched
/// case-insensitively, like every other key). Values are returned verbatim.
fn environment_value(key: &str) -> Option<String> {
    Env::raw()
        .split(ENV_KEY_SPLITTER)
        .iter()
        .find(|(name, _)| UncasedStr::new(name.as_str()) == UncasedStr::new(key))
        .map(|(_, value)| value)
}

/// Walk `dict` one dotted segment at a time, matching names uncased.
fn find_value<'v>(dict: &'v Dict, key: &str) -> Option<&'v Value> {
    let (head, rest) = match key.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (key, None),
    };
    let (_, value) = dict
        .iter()
        .find(|(name, _)| UncasedStr::new(name) == UncasedStr::new(head))?;
    match (value, rest) {
        (value, None) => Some(value),
        (Value::Dict(_, inner), Some(rest)) => find_value(inner, rest),
        _ => None,
    }
}

/// Render a scalar value to its canonical string form.
fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(_, s) => Some(s.clone()),
        Value::Char(_, c) => Some(c.to_string()),
        Value::Bool(_, b) => Some(b.to_string()),
        Value::Num(_, num) => Some(num_to_string(*num)),
        Value::Empty(..) | Value::Dict(..) | Value::Array(..) => None,
    }
}

fn num_to_string(num: Num) -> String {
    match num {
        Num::U8(n) => n.to_string(),
        Num::U16(n) => n.to_string(),
        Num::U32(n) => n.to_string(),
        Num::U64(n) => n.to_string(),
        Num::U128(n) => n.to_string(),
        Num::USize(n) => n.to_string(),
        Num::I8(n) => n.to_string(),
        Num::I16(n) => n.to_string(),
        Num::I32(n) => n.to_string(),
        Num::I64(n) => n.to_string(),
        Num::I128(n) => n.to_string(),
        Num::ISize(n) => n.to_string(),
        Num::F32(n) => n.to_string(),
        Num::F64(n) => n.to_string(),
    }
}
