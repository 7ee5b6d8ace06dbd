//! Merge semantics: precedence, absence, and failure attribution.

use anyhow::{Result, ensure};

use super::apply_layer;
use crate::error::StrataError;
use crate::field::{FieldAccess, FieldMut};
use crate::registry::FieldMap;
use crate::store::DocumentStore;

#[derive(Debug, Default)]
struct Pool {
    max_open: i32,
    max_idle: i32,
}

impl FieldAccess for Pool {
    fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>> {
        match name {
            "max_open" => Some(FieldMut::I32(&mut self.max_open)),
            "max_idle" => Some(FieldMut::I32(&mut self.max_idle)),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Destination {
    name: String,
    pool: Pool,
}

impl FieldAccess for Destination {
    fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>> {
        match name {
            "name" => Some(FieldMut::Str(&mut self.name)),
            "pool" => Some(FieldMut::Nested(&mut self.pool)),
            _ => None,
        }
    }
}

fn registry() -> FieldMap {
    let mut map = FieldMap::new();
    map.insert("svc.name", "name");
    map.insert("svc.pool.maxOpen", "pool.max_open");
    map.insert("svc.pool.maxIdle", "pool.max_idle");
    map
}

fn store_from(document: &str) -> Result<DocumentStore> {
    let mut store = DocumentStore::new();
    store.load_from_str(document)?;
    Ok(store)
}

#[test]
fn a_later_layer_overwrites_an_earlier_one() -> Result<()> {
    let mut destination = Destination::default();
    let map = registry();

    let first = store_from("svc:\n  name: early\n  pool:\n    maxOpen: 10\n")?;
    apply_layer(&map, &first, &mut destination)?;
    ensure!(destination.name == "early");
    ensure!(destination.pool.max_open == 10);

    let second = store_from("svc:\n  name: late\n")?;
    apply_layer(&map, &second, &mut destination)?;
    ensure!(destination.name == "late", "later layer wins for its keys");
    ensure!(
        destination.pool.max_open == 10,
        "keys absent from the later layer keep the earlier value"
    );
    Ok(())
}

#[test]
fn absent_keys_leave_the_destination_untouched() -> Result<()> {
    let mut destination = Destination::default();
    destination.name = "preset".to_owned();
    destination.pool.max_idle = 2;

    let store = store_from("unrelated: 1\n")?;
    apply_layer(&registry(), &store, &mut destination)?;
    ensure!(destination.name == "preset");
    ensure!(destination.pool.max_idle == 2);
    Ok(())
}

#[test]
fn empty_string_values_are_treated_as_absent() -> Result<()> {
    let mut destination = Destination::default();
    destination.name = "preset".to_owned();

    let store = store_from("svc:\n  name: \"\"\n")?;
    apply_layer(&registry(), &store, &mut destination)?;
    ensure!(destination.name == "preset");
    Ok(())
}

#[test]
fn unresolved_paths_fail_with_the_offending_key() -> Result<()> {
    let mut destination = Destination::default();
    let mut map = FieldMap::new();
    map.insert("svc.name", "nonexistent");

    let store = store_from("svc:\n  name: value\n")?;
    let err = apply_layer(&map, &store, &mut destination);
    match err {
        Err(StrataError::PathNotFound { key, path, source }) => {
            ensure!(key == "svc.name");
            ensure!(path == "nonexistent");
            ensure!(source.segment == "nonexistent");
        }
        other => anyhow::bail!("expected PathNotFound, got {other:?}"),
    }
    Ok(())
}

#[test]
fn bindings_landing_on_structures_are_unsupported() -> Result<()> {
    let mut destination = Destination::default();
    let mut map = FieldMap::new();
    map.insert("svc.pool", "pool");

    let store = store_from("svc:\n  pool: oops\n")?;
    let err = apply_layer(&map, &store, &mut destination);
    match err {
        Err(StrataError::UnsupportedFieldType { key, path }) => {
            ensure!(key == "svc.pool");
            ensure!(path == "pool");
        }
        other => anyhow::bail!("expected UnsupportedFieldType, got {other:?}"),
    }
    Ok(())
}

#[test]
fn coercion_failures_carry_the_configuration_key() -> Result<()> {
    let mut destination = Destination::default();
    let store = store_from("svc:\n  pool:\n    maxOpen: not-a-number\n")?;
    let err = apply_layer(&registry(), &store, &mut destination);
    match err {
        Err(StrataError::Coercion { key, .. }) => ensure!(key == "svc.pool.maxopen"),
        other => anyhow::bail!("expected Coercion, got {other:?}"),
    }
    Ok(())
}
