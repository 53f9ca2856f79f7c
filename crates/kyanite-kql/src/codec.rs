//! Conversion layer between [`KValue`] and wire JSON.
//!
//! Two independent wire formats live here and must not be confused:
//!
//! - the **columnar/positional** cell codec used inside
//!   [`DataTable`](crate::DataTable) rows, where a cell carries no type
//!   tag of its own and [`parse_cell_value`] is driven by the declared
//!   column type, and
//! - the **type-tagged envelope** (`{"type": ..., "value": ...}`) used
//!   when a single value is serialized standalone, outside any table.
//!
//! Both formats project values through the same [`WireValue`] adapter,
//! so they cannot drift apart.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde::Deserialize;

use crate::dynamic::from_json_value;
use crate::error::{KqlError, Result};
use crate::timespan::{format_timespan, parse_timespan};
use crate::value::{format_guid, parse_guid, KType, KValue};

// ============================================================================
// Wire projection
// ============================================================================

/// Borrowing serializer that projects a [`KValue`] to its native wire
/// JSON form: raw bool/number/string scalars, RFC 3339 strings for
/// datetimes, plain `[-][d.]hh:mm:ss[.fffffff]` strings for timespans,
/// hyphenated hex for guids, exact decimal strings, recursive maps and
/// sequences for the dynamic shapes, and `null` for any null.
///
/// Bags go through `serialize_map` entry by entry, so insertion order
/// and duplicate keys survive on the wire.
pub(crate) struct WireValue<'a>(pub &'a KValue);

impl Serialize for WireValue<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0 {
            KValue::Null
            | KValue::Bool(None)
            | KValue::Int(None)
            | KValue::Long(None)
            | KValue::Real(None)
            | KValue::String(None)
            | KValue::DateTime(None)
            | KValue::Timespan(None)
            | KValue::Guid(None)
            | KValue::Decimal(None)
            | KValue::Bag(None)
            | KValue::Array(None) => serializer.serialize_unit(),
            KValue::Bool(Some(b)) => serializer.serialize_bool(*b),
            KValue::Int(Some(i)) => serializer.serialize_i32(*i),
            KValue::Long(Some(i)) => serializer.serialize_i64(*i),
            KValue::Real(Some(r)) => serializer.serialize_f64(*r),
            KValue::String(Some(s)) => serializer.serialize_str(s),
            KValue::DateTime(Some(t)) => {
                serializer.serialize_str(&format_datetime(*t))
            }
            KValue::Timespan(Some(d)) => serializer.serialize_str(&format_timespan(*d)),
            KValue::Guid(Some(g)) => serializer.serialize_str(&format_guid(g)),
            KValue::Decimal(Some(d)) => serializer.serialize_str(&d.to_string()),
            KValue::Bag(Some(bag)) => {
                let mut map = serializer.serialize_map(Some(bag.len()))?;
                for (key, value) in bag.pairs() {
                    map.serialize_entry(key, &WireValue(value))?;
                }
                map.end()
            }
            KValue::Array(Some(arr)) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for value in arr.elements() {
                    seq.serialize_element(&WireValue(value))?;
                }
                seq.end()
            }
        }
    }
}

/// Formats an instant in the RFC 3339 wire form, trailing zeros trimmed.
pub(crate) fn format_datetime(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|source| KqlError::InvalidDateTime {
            input: s.to_string(),
            source,
        })
}

fn parse_decimal(raw: &serde_json::Value) -> Result<Decimal> {
    let token = match raw {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        other => {
            return Err(type_mismatch(KType::Decimal, other));
        }
    };
    Decimal::from_str(&token).map_err(|e| KqlError::InvalidDecimal {
        input: token,
        reason: e.to_string(),
    })
}

fn type_mismatch(expected: KType, actual: &serde_json::Value) -> KqlError {
    KqlError::TypeMismatch {
        expected: expected.as_str().to_string(),
        actual: actual.to_string(),
    }
}

// ============================================================================
// Columnar cell codec
// ============================================================================

/// Parses one raw table cell under a declared column type.
///
/// JSON `null` resolves to the generic null regardless of the declared
/// type — never an error. Known types parse strictly and a failure
/// aborts the containing row's decode. `dynamic` and `null` columns fall
/// through to generic dynamic-JSON interpretation, as does an
/// unrecognized type name (a deliberate permissiveness policy for
/// forward-compatible schemas, logged at warn level).
pub fn parse_cell_value(raw: &serde_json::Value, ktype: KType) -> Result<KValue> {
    if raw.is_null() {
        return Ok(KValue::Null);
    }

    match ktype {
        KType::Bool => raw
            .as_bool()
            .map(|b| KValue::Bool(Some(b)))
            .ok_or_else(|| type_mismatch(ktype, raw)),
        KType::Int => {
            let n = raw.as_i64().ok_or_else(|| type_mismatch(ktype, raw))?;
            let i = i32::try_from(n).map_err(|_| type_mismatch(ktype, raw))?;
            Ok(KValue::Int(Some(i)))
        }
        KType::Long => raw
            .as_i64()
            .map(|i| KValue::Long(Some(i)))
            .ok_or_else(|| type_mismatch(ktype, raw)),
        KType::Real => raw
            .as_f64()
            .map(|f| KValue::Real(Some(f)))
            .ok_or_else(|| type_mismatch(ktype, raw)),
        KType::String => raw
            .as_str()
            .map(|s| KValue::String(Some(s.to_string())))
            .ok_or_else(|| type_mismatch(ktype, raw)),
        KType::DateTime => {
            let s = raw.as_str().ok_or_else(|| type_mismatch(ktype, raw))?;
            Ok(KValue::DateTime(Some(parse_datetime(s)?)))
        }
        KType::Timespan => {
            let s = raw.as_str().ok_or_else(|| type_mismatch(ktype, raw))?;
            Ok(KValue::Timespan(Some(parse_timespan(s)?)))
        }
        KType::Guid => {
            let s = raw.as_str().ok_or_else(|| type_mismatch(ktype, raw))?;
            Ok(KValue::Guid(Some(parse_guid(s)?)))
        }
        KType::Decimal => Ok(KValue::Decimal(Some(parse_decimal(raw)?))),
        KType::Null | KType::Dynamic => Ok(from_json_value(raw)),
        KType::Unknown => {
            tracing::warn!("unrecognized column data type, falling back to dynamic parsing");
            Ok(from_json_value(raw))
        }
    }
}

// ============================================================================
// Type-tagged envelope
// ============================================================================

#[derive(serde::Serialize)]
struct EnvelopeRef<'a> {
    #[serde(rename = "type")]
    tag: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<WireValue<'a>>,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    tag: String,
    #[serde(default)]
    value: Option<serde_json::Value>,
}

/// Returns the envelope tag for a non-null value.
///
/// The two dynamic shapes get distinct `bag`/`array` tags (the envelope
/// distinguishes them where the columnar format folds both into
/// `dynamic`).
fn envelope_tag(value: &KValue) -> &'static str {
    match value {
        KValue::Bag(_) => "bag",
        KValue::Array(_) => "array",
        other => other.ktype().as_str(),
    }
}

/// Serializes a value into the standalone `{"type", "value"}` envelope.
///
/// Every null — generic, typed, or null container — collapses to
/// `{"type":"null"}` with no `value` field.
pub fn marshal_kvalue(value: &KValue) -> Result<String> {
    let envelope = if value.is_null() {
        EnvelopeRef {
            tag: "null",
            value: None,
        }
    } else {
        EnvelopeRef {
            tag: envelope_tag(value),
            value: Some(WireValue(value)),
        }
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Deserializes a value from the standalone `{"type", "value"}` envelope.
///
/// Unlike the columnar side, an unrecognized tag here is a hard error:
/// an envelope's tag is authored by this codec, so drift means
/// corruption, not schema evolution.
pub fn unmarshal_kvalue(data: &str) -> Result<KValue> {
    let envelope: Envelope = serde_json::from_str(data)?;
    let value = envelope.value.unwrap_or(serde_json::Value::Null);

    match envelope.tag.as_str() {
        "null" => Ok(KValue::Null),
        "bag" | "array" => Ok(from_json_value(&value)),
        tag => match KType::parse(tag) {
            KType::Unknown | KType::Null | KType::Dynamic => {
                Err(KqlError::UnknownTypeTag(envelope.tag.clone()))
            }
            ktype => parse_cell_value(&value, ktype),
        },
    }
}
