//! Per-layer merging of registry bindings onto a destination.

use crate::coerce::{self, CoerceError};
use crate::error::{StrataError, StrataResult};
use crate::field::{FieldAccess, resolve_path};
use crate::registry::FieldMap;
use crate::store::DocumentStore;

/// One ordered configuration source.
///
/// The loader applies layers in declaration order; a later layer's value
/// for a key always overwrites an earlier layer's.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Layer {
    /// The `config_default` document, with embedded-blob fallback.
    Defaults,
    /// The document named by the active profile, `config_<profile>`.
    Profile(String),
    /// Process environment variables; no document search is involved.
    Environment,
}

/// Apply one layer: copy every bound value the store can answer onto the
/// destination.
///
/// Keys the store cannot answer (absent, empty, or non-scalar) are skipped,
/// leaving the previous layer's value (or the destination's initial value)
/// in place. Everything else resolves its field path and coerces onto the
/// destination field's declared type.
///
/// # Errors
///
/// Returns [`StrataError::PathNotFound`] for a binding whose path does not
/// resolve, [`StrataError::UnsupportedFieldType`] for a binding landing on
/// a nested structure, and [`StrataError::Coercion`] when a value does not
/// parse as the field's type; all carry the offending configuration key.
pub(crate) fn apply_layer(
    registry: &FieldMap,
    store: &DocumentStore,
    destination: &mut dyn FieldAccess,
) -> StrataResult<()> {
    for (key, path) in registry.iter() {
        let Some(raw) = store.get_string(key).filter(|value| !value.is_empty()) else {
            continue;
        };
        let field = resolve_path(destination, path)
            .map_err(|source| StrataError::path_not_found(key, path, source))?;
        coerce::assign(field, &raw).map_err(|source| match source {
            CoerceError::Nested => StrataError::unsupported_field_type(key, path),
            parse => StrataError::coercion(key, parse),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests;
