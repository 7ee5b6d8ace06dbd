//! Type-directed coercion of raw strings onto field handles.
//!
//! Every supported target kind has an explicit arm in [`assign`], so adding
//! a variant to [`FieldMut`] forces a decision here at compile time instead
//! of falling through at run time.

use std::time::Duration;

use thiserror::Error;

use crate::field::FieldMut;

type Source = Box<dyn std::error::Error + Send + Sync>;

/// A raw string failed to coerce onto a field handle.
#[derive(Debug, Error)]
pub enum CoerceError {
    /// The raw string does not parse as the field's declared type.
    #[error("cannot parse '{value}' as {target}: {source}")]
    Parse {
        /// Name of the target type.
        target: &'static str,
        /// The offending raw value.
        value: String,
        /// Underlying parse failure.
        #[source]
        source: Source,
    },

    /// The handle addresses a nested structure; only leaves take values.
    #[error("target field is a nested structure, not a scalar")]
    Nested,
}

fn parse_err(target: &'static str, value: &str, source: impl Into<Source>) -> CoerceError {
    CoerceError::Parse {
        target,
        value: value.to_owned(),
        source: source.into(),
    }
}

macro_rules! parse_into {
    ($slot:expr, $raw:expr, $ty:ty) => {{
        *$slot = $raw
            .parse::<$ty>()
            .map_err(|e| parse_err(stringify!($ty), $raw, e))?;
        Ok(())
    }};
}

/// Coerce `raw` to the handle's declared type and write it through.
///
/// Strings are passed through verbatim and always succeed. Booleans accept
/// the literal spellings `true/false`, `t/f`, `1/0`, `yes/no`, and `on/off`
/// (ASCII case-insensitive). Numeric kinds parse via the type's canonical
/// grammar. Durations parse literals such as `250ms`, `5s`, or `1m30s`.
///
/// # Errors
///
/// Returns [`CoerceError::Parse`] when the value does not parse, and
/// [`CoerceError::Nested`] when the handle is not a leaf.
///
/// # Examples
///
/// ```rust
/// use strata_config::{FieldMut, assign};
///
/// let mut max_open: i8 = 0;
/// assign(FieldMut::I8(&mut max_open), "-8")?;
/// assert_eq!(max_open, -8);
/// # Ok::<_, strata_config::CoerceError>(())
/// ```
pub fn assign(field: FieldMut<'_>, raw: &str) -> Result<(), CoerceError> {
    match field {
        FieldMut::Str(slot) => {
            *slot = raw.to_owned();
            Ok(())
        }
        FieldMut::Bool(slot) => {
            *slot = parse_bool(raw)
                .ok_or_else(|| parse_err("bool", raw, "unrecognised boolean literal"))?;
            Ok(())
        }
        FieldMut::I8(slot) => parse_into!(slot, raw, i8),
        FieldMut::I16(slot) => parse_into!(slot, raw, i16),
        FieldMut::I32(slot) => parse_into!(slot, raw, i32),
        FieldMut::I64(slot) => parse_into!(slot, raw, i64),
        FieldMut::U8(slot) => parse_into!(slot, raw, u8),
        FieldMut::U16(slot) => parse_into!(slot, raw, u16),
        FieldMut::U32(slot) => parse_into!(slot, raw, u32),
        FieldMut::U64(slot) => parse_into!(slot, raw, u64),
        FieldMut::F32(slot) => parse_into!(slot, raw, f32),
        FieldMut::F64(slot) => parse_into!(slot, raw, f64),
        FieldMut::Duration(slot) => {
            *slot = parse_duration(raw).map_err(|msg| parse_err("duration", raw, msg))?;
            Ok(())
        }
        FieldMut::Nested(_) => Err(CoerceError::Nested),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "yes" | "on" => Some(true),
        "0" | "f" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Nanoseconds per unit suffix.
const UNITS: [(&str, f64); 7] = [
    ("ns", 1.0),
    ("us", 1e3),
    ("µs", 1e3),
    ("ms", 1e6),
    ("s", 1e9),
    ("m", 60e9),
    ("h", 3600e9),
];

/// Parse a duration literal: one or more `<decimal><unit>` terms.
///
/// Accepted units are `ns`, `us`/`µs`, `ms`, `s`, `m`, and `h`; terms
/// compound, so `1m30s` is ninety seconds. The bare literal `0` is allowed.
fn parse_duration(raw: &str) -> Result<Duration, String> {
    let mut rest = raw.trim();
    if rest.is_empty() {
        return Err("empty duration".to_owned());
    }
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.starts_with('-') {
        return Err("negative durations are not supported".to_owned());
    }
    rest = rest.strip_prefix('+').unwrap_or(rest);

    let mut total_nanos = 0f64;
    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(rest.len());
        let (number, after_number) = rest.split_at(digits);
        let value: f64 = number
            .parse()
            .map_err(|_| format!("missing or malformed number before '{after_number}'"))?;

        let unit_len = after_number
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after_number.len());
        let (unit, after_unit) = after_number.split_at(unit_len);
        let Some((_, scale)) = UNITS.iter().find(|(name, _)| *name == unit) else {
            return Err(format!("unknown unit '{unit}'"));
        };

        total_nanos += value * scale;
        rest = after_unit;
    }

    if !total_nanos.is_finite() || total_nanos > u64::MAX as f64 {
        return Err("duration overflows".to_owned());
    }
    Ok(Duration::from_nanos(total_nanos as u64))
}
