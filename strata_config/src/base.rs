//! The always-present base configuration fields.

use camino::Utf8PathBuf;

use crate::StrataConfig;
use crate::field::{FieldAccess, FieldMut};

/// Base destination substructure shared by every consumer.
///
/// Consumers compose it as a named member and route unknown field names to
/// it from their own [`FieldAccess`] implementation, so the base bindings
/// (`prj.name`, `prj.version`, `port`, `release.mode`, `log.root`) resolve
/// through any destination shape. The `host`, `work_path`, and `log_path`
/// fields are derived after merging and are not sourced from any document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BaseConfig {
    /// Project name, sourced from `prj.name`.
    pub project_name: String,
    /// Project version, sourced from `prj.version`.
    pub project_version: String,
    /// Active profile name, resolved from the `env` environment variable.
    pub env: String,
    /// Port the service exposes, sourced from `port`.
    pub port: String,
    /// Whether the service runs in release mode, sourced from `release.mode`.
    pub release_mode: bool,
    /// Root directory for log output, sourced from `log.root`.
    pub log_root: String,
    /// Host address discovered by the outbound probe; derived.
    pub host: String,
    /// Process working directory at load time; derived.
    pub work_path: Utf8PathBuf,
    /// Log output location, `<log_root>/<host>-<project_name>`; derived.
    pub log_path: Utf8PathBuf,
}

impl BaseConfig {
    /// Emit the resolved configuration to the log sink.
    pub fn print(&self) {
        tracing::info!(
            project_name = %self.project_name,
            project_version = %self.project_version,
            release_mode = self.release_mode,
            "project info"
        );
        tracing::info!(
            env = %self.env,
            host = %self.host,
            port = %self.port,
            "endpoint info"
        );
        tracing::info!(
            work_path = %self.work_path,
            log_path = %self.log_path,
            "path info"
        );
    }
}

impl FieldAccess for BaseConfig {
    fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>> {
        match name {
            "project_name" => Some(FieldMut::Str(&mut self.project_name)),
            "project_version" => Some(FieldMut::Str(&mut self.project_version)),
            "env" => Some(FieldMut::Str(&mut self.env)),
            "port" => Some(FieldMut::Str(&mut self.port)),
            "release_mode" => Some(FieldMut::Bool(&mut self.release_mode)),
            "log_root" => Some(FieldMut::Str(&mut self.log_root)),
            _ => None,
        }
    }
}

impl StrataConfig for BaseConfig {
    fn base(&self) -> &Self {
        self
    }

    fn base_mut(&mut self) -> &mut Self {
        self
    }
}
