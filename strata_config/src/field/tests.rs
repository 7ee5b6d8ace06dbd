//! Path-resolution behaviour over nested destinations.

use std::time::Duration;

use rstest::rstest;

use super::{FieldAccess, FieldMut, resolve_path};

#[derive(Debug, Default)]
struct Inner {
    count: i32,
    timeout: Duration,
}

impl FieldAccess for Inner {
    fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>> {
        match name {
            "count" => Some(FieldMut::I32(&mut self.count)),
            "timeout" => Some(FieldMut::Duration(&mut self.timeout)),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Middle {
    inner: Inner,
    label: String,
}

impl FieldAccess for Middle {
    fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>> {
        match name {
            "inner" => Some(FieldMut::Nested(&mut self.inner)),
            "label" => Some(FieldMut::Str(&mut self.label)),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Outer {
    middle: Middle,
    enabled: bool,
}

impl FieldAccess for Outer {
    fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>> {
        match name {
            "middle" => Some(FieldMut::Nested(&mut self.middle)),
            "enabled" => Some(FieldMut::Bool(&mut self.enabled)),
            _ => None,
        }
    }
}

#[test]
fn single_segment_resolves_to_leaf() {
    let mut outer = Outer::default();
    let handle = resolve_path(&mut outer, "enabled");
    assert!(matches!(handle, Ok(FieldMut::Bool(_))));
}

#[test]
fn three_segments_resolve_to_the_structurally_nested_field() {
    let mut outer = Outer::default();
    outer.middle.inner.count = 7;
    match resolve_path(&mut outer, "middle.inner.count") {
        Ok(FieldMut::I32(slot)) => {
            assert_eq!(*slot, 7);
            *slot = 8;
        }
        other => panic!("expected i32 handle, got {:?}", other.map(|f| f.kind())),
    }
    assert_eq!(outer.middle.inner.count, 8);
}

#[rstest]
#[case("missing", "missing")]
#[case("middle.absent", "absent")]
#[case("middle.inner.nope", "nope")]
fn unknown_segment_reports_the_failing_name(#[case] path: &str, #[case] segment: &str) {
    let mut outer = Outer::default();
    let err = match resolve_path(&mut outer, path) {
        Err(err) => err,
        Ok(handle) => panic!("path '{path}' resolved to {}", handle.kind()),
    };
    assert_eq!(err.segment, segment);
}

#[test]
fn path_continuing_past_a_leaf_fails() {
    let mut outer = Outer::default();
    let err = match resolve_path(&mut outer, "enabled.deeper") {
        Err(err) => err,
        Ok(handle) => panic!("expected failure, got {}", handle.kind()),
    };
    assert_eq!(err.segment, "deeper");
}

#[test]
fn intermediate_segment_resolving_to_a_structure_is_a_nested_handle() {
    let mut outer = Outer::default();
    let handle = resolve_path(&mut outer, "middle");
    assert!(matches!(handle, Ok(FieldMut::Nested(_))));
}
