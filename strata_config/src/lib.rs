//! Layered configuration resolution for caller-owned structs.
//!
//! `strata_config` fills a destination struct from three ordered sources:
//!
//! 1. the embedded default document (`config_default.yaml`, falling back to
//!    a compiled-in blob when no file is present),
//! 2. the profile document selected by the `env` environment variable
//!    (`config_<profile>.yaml`),
//! 3. process environment variables.
//!
//! Later sources always win. Which values land where is declared in a
//! [`FieldMap`]: dotted configuration keys (`mysql.conns.maxOpen`) mapped to
//! dotted field paths of the destination (`mysql.max_open`). Raw string
//! values are coerced onto the destination field's exact type, so the same
//! engine serves arbitrary struct shapes without knowing them in advance.
//!
//! Destination structs opt in by implementing two traits:
//!
//! - [`FieldAccess`] exposes fields by name as typed mutable handles, one
//!   `match` per struct;
//! - [`StrataConfig`] wires in the always-present [`BaseConfig`] member and
//!   contributes extra key bindings to the registry.
//!
//! ```rust,no_run
//! use strata_config::{
//!     BaseConfig, FieldAccess, FieldMap, FieldMut, Loader, StrataConfig, StrataResult,
//! };
//!
//! #[derive(Debug, Default)]
//! struct AppConfig {
//!     base: BaseConfig,
//!     max_open: i32,
//! }
//!
//! impl FieldAccess for AppConfig {
//!     fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>> {
//!         match name {
//!             "max_open" => Some(FieldMut::I32(&mut self.max_open)),
//!             // Unknown names fall through to the base fields.
//!             _ => self.base.field_mut(name),
//!         }
//!     }
//! }
//!
//! impl StrataConfig for AppConfig {
//!     fn base(&self) -> &BaseConfig {
//!         &self.base
//!     }
//!
//!     fn base_mut(&mut self) -> &mut BaseConfig {
//!         &mut self.base
//!     }
//!
//!     fn append_field_map(&self, map: &mut FieldMap) {
//!         map.insert("mysql.conns.maxOpen", "max_open");
//!     }
//! }
//!
//! const EMBEDDED_DEFAULT: &str = "prj:\n  name: demo\n  version: v0.1.0\n";
//!
//! fn main() -> StrataResult<()> {
//!     let mut cfg = AppConfig::default();
//!     Loader::new()
//!         .with_embedded_default(EMBEDDED_DEFAULT)
//!         .load(&mut cfg)?;
//!     cfg.print();
//!     Ok(())
//! }
//! ```
//!
//! Loading is a one-shot, single-threaded operation intended for process
//! startup. Any failure is reported as a typed [`StrataError`]; the engine
//! itself never aborts the process.

mod base;
mod coerce;
mod error;
mod field;
mod loader;
mod merge;
mod registry;
mod runtime;
mod store;

pub use base::BaseConfig;
pub use coerce::{CoerceError, assign};
pub use error::{StrataError, StrataResult};
pub use field::{FieldAccess, FieldMut, PathError, resolve_path};
pub use loader::{DEFAULT_PROFILE, KEY_ENV, Loader, fill_config};
pub use merge::Layer;
pub use registry::FieldMap;
pub use runtime::HostProbe;
pub use store::{DocumentFormat, DocumentStore};

/// Trait implemented by structs that receive layered configuration.
///
/// A destination is composed explicitly: it owns a [`BaseConfig`] member for
/// the always-present fields and exposes it through [`Self::base`] and
/// [`Self::base_mut`]. Consumer-specific bindings are contributed through
/// [`Self::append_field_map`], which the loader invokes exactly once before
/// any layer merges.
pub trait StrataConfig: FieldAccess {
    /// Shared base fields of the destination.
    fn base(&self) -> &BaseConfig;

    /// Mutable access to the shared base fields.
    fn base_mut(&mut self) -> &mut BaseConfig;

    /// Contribute additional key → field-path bindings to the registry.
    ///
    /// The default implementation contributes nothing; the base bindings are
    /// always present. Registering a key twice keeps the last binding.
    fn append_field_map(&self, map: &mut FieldMap) {
        let _ = map;
    }

    /// Emit the resolved configuration to the log sink.
    ///
    /// Purely observational. The default implementation prints the base
    /// fields; override to include consumer-specific values.
    fn print(&self) {
        BaseConfig::print(self.base());
    }
}
