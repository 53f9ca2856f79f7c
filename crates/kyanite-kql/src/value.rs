//! Typed KQL scalar values.

use std::fmt::{self, Display};

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use rust_decimal::Decimal;

use crate::dynamic::{DynamicArray, DynamicBag};
use crate::error::{KqlError, Result};
use crate::timespan::format_timespan;

/// The generic null value, shared wherever a lookup misses.
pub(crate) static NULL_VALUE: KValue = KValue::Null;

// ============================================================================
// Type Tags
// ============================================================================

/// The KQL scalar data types.
///
/// The canonical lowercase names round-trip through [`KType::parse`] and
/// [`KType::as_str`]; unrecognized names parse to [`KType::Unknown`]
/// rather than failing, so that schema drift in a remote result set never
/// aborts ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KType {
    /// Unrecognized type name (decodes through the dynamic fallback).
    #[default]
    Unknown,
    /// Generic null (usually from a JSON `null`).
    Null,
    /// Boolean.
    Bool,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 64-bit floating point (IEEE 754 double precision).
    Real,
    /// UTF-8 string.
    String,
    /// Timezone-aware instant, nanosecond precision.
    DateTime,
    /// Signed duration, 100-nanosecond tick precision on the wire.
    Timespan,
    /// 128-bit identifier (RFC 4122 layout).
    Guid,
    /// Fixed-precision decimal (never float64-degraded).
    Decimal,
    /// Semi-structured container (property bag or array).
    Dynamic,
}

impl KType {
    /// Returns the canonical lowercase type name.
    pub fn as_str(self) -> &'static str {
        match self {
            KType::Unknown => "unknown",
            KType::Null => "null",
            KType::Bool => "bool",
            KType::Int => "int",
            KType::Long => "long",
            KType::Real => "real",
            KType::String => "string",
            KType::DateTime => "datetime",
            KType::Timespan => "timespan",
            KType::Guid => "guid",
            KType::Decimal => "decimal",
            KType::Dynamic => "dynamic",
        }
    }

    /// Maps a type name to its tag.
    ///
    /// Unknown names return [`KType::Unknown`], never an error.
    pub fn parse(s: &str) -> KType {
        match s {
            "null" => KType::Null,
            "bool" => KType::Bool,
            "int" => KType::Int,
            "long" => KType::Long,
            "real" => KType::Real,
            "string" => KType::String,
            "datetime" => KType::DateTime,
            "timespan" => KType::Timespan,
            "guid" => KType::Guid,
            "decimal" => KType::Decimal,
            "dynamic" => KType::Dynamic,
            _ => KType::Unknown,
        }
    }
}

impl Display for KType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Values
// ============================================================================

/// A typed KQL value.
///
/// Two null representations coexist by design:
///
/// - [`KValue::Null`] is the generic, type-erased null (a JSON `null`
///   whose type is not yet known).
/// - A `None` payload in any typed variant is a SQL-style typed null —
///   the column's declared type survives even when the value is absent.
///
/// `Bag(None)` / `Array(None)` are *null* containers, distinct from
/// `Bag(Some(empty))` / `Array(Some(empty))` which are empty but present
/// (`{}` / `[]` on the wire rather than `null`).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum KValue {
    /// Generic, untyped null.
    #[default]
    Null,
    /// Boolean; `None` is a typed null.
    Bool(Option<bool>),
    /// 32-bit integer; `None` is a typed null.
    Int(Option<i32>),
    /// 64-bit integer; `None` is a typed null.
    Long(Option<i64>),
    /// 64-bit float; `None` is a typed null.
    Real(Option<f64>),
    /// UTF-8 string; `None` is a typed null.
    String(Option<String>),
    /// Instant; `None` is a typed null.
    DateTime(Option<DateTime<Utc>>),
    /// Duration; `None` is a typed null.
    Timespan(Option<TimeDelta>),
    /// 128-bit identifier; `None` is a typed null.
    Guid(Option<[u8; 16]>),
    /// Fixed-precision decimal; `None` is a typed null.
    Decimal(Option<Decimal>),
    /// Ordered property bag; `None` is a null bag.
    Bag(Option<DynamicBag>),
    /// Ordered array; `None` is a null array.
    Array(Option<DynamicArray>),
}

impl KValue {
    /// Returns the type tag of this value.
    ///
    /// Both dynamic shapes report [`KType::Dynamic`]; the envelope codec
    /// distinguishes them with its own `bag`/`array` tags.
    pub fn ktype(&self) -> KType {
        match self {
            KValue::Null => KType::Null,
            KValue::Bool(_) => KType::Bool,
            KValue::Int(_) => KType::Int,
            KValue::Long(_) => KType::Long,
            KValue::Real(_) => KType::Real,
            KValue::String(_) => KType::String,
            KValue::DateTime(_) => KType::DateTime,
            KValue::Timespan(_) => KType::Timespan,
            KValue::Guid(_) => KType::Guid,
            KValue::Decimal(_) => KType::Decimal,
            KValue::Bag(_) | KValue::Array(_) => KType::Dynamic,
        }
    }

    /// Returns true for the generic null, any typed null, and null
    /// containers.
    pub fn is_null(&self) -> bool {
        match self {
            KValue::Null => true,
            KValue::Bool(v) => v.is_none(),
            KValue::Int(v) => v.is_none(),
            KValue::Long(v) => v.is_none(),
            KValue::Real(v) => v.is_none(),
            KValue::String(v) => v.is_none(),
            KValue::DateTime(v) => v.is_none(),
            KValue::Timespan(v) => v.is_none(),
            KValue::Guid(v) => v.is_none(),
            KValue::Decimal(v) => v.is_none(),
            KValue::Bag(v) => v.is_none(),
            KValue::Array(v) => v.is_none(),
        }
    }

    /// Creates the typed null for a given type tag.
    ///
    /// `Unknown` and `Null` produce the generic null; `Dynamic` produces
    /// a null bag.
    pub fn null_of(ktype: KType) -> KValue {
        match ktype {
            KType::Unknown | KType::Null => KValue::Null,
            KType::Bool => KValue::Bool(None),
            KType::Int => KValue::Int(None),
            KType::Long => KValue::Long(None),
            KType::Real => KValue::Real(None),
            KType::String => KValue::String(None),
            KType::DateTime => KValue::DateTime(None),
            KType::Timespan => KValue::Timespan(None),
            KType::Guid => KValue::Guid(None),
            KType::Decimal => KValue::Decimal(None),
            KType::Dynamic => KValue::Bag(None),
        }
    }

    /// Returns the value as a bool, if it is a non-null `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            KValue::Bool(v) => *v,
            _ => None,
        }
    }

    /// Returns the value as an i32, if it is a non-null `Int`.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            KValue::Int(v) => *v,
            _ => None,
        }
    }

    /// Returns the value as an i64, if it is a non-null `Long`.
    pub fn as_long(&self) -> Option<i64> {
        match self {
            KValue::Long(v) => *v,
            _ => None,
        }
    }

    /// Returns the value as an f64, if it is a non-null `Real`.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            KValue::Real(v) => *v,
            _ => None,
        }
    }

    /// Returns the value as a string slice, if it is a non-null `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            KValue::String(Some(s)) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an instant, if it is a non-null `DateTime`.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            KValue::DateTime(v) => *v,
            _ => None,
        }
    }

    /// Returns the value as a duration, if it is a non-null `Timespan`.
    pub fn as_timespan(&self) -> Option<TimeDelta> {
        match self {
            KValue::Timespan(v) => *v,
            _ => None,
        }
    }

    /// Returns the value as raw guid bytes, if it is a non-null `Guid`.
    pub fn as_guid(&self) -> Option<&[u8; 16]> {
        match self {
            KValue::Guid(Some(g)) => Some(g),
            _ => None,
        }
    }

    /// Returns the value as a decimal, if it is a non-null `Decimal`.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            KValue::Decimal(v) => *v,
            _ => None,
        }
    }

    /// Returns the value as a property bag, if it is a non-null `Bag`.
    pub fn as_bag(&self) -> Option<&DynamicBag> {
        match self {
            KValue::Bag(Some(b)) => Some(b),
            _ => None,
        }
    }

    /// Returns the value as an array, if it is a non-null `Array`.
    pub fn as_array(&self) -> Option<&DynamicArray> {
        match self {
            KValue::Array(Some(a)) => Some(a),
            _ => None,
        }
    }
}

impl Display for KValue {
    /// Debug/log rendering, not the wire format.
    ///
    /// Typed nulls render as `<type>(null)`; complex scalars carry a
    /// `<type>(...)` wrapper so the type is visible in logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KValue::Null => write!(f, "null"),
            KValue::Bool(None) => write!(f, "bool(null)"),
            KValue::Bool(Some(b)) => write!(f, "{b}"),
            KValue::Int(None) => write!(f, "int(null)"),
            KValue::Int(Some(i)) => write!(f, "{i}"),
            KValue::Long(None) => write!(f, "long(null)"),
            KValue::Long(Some(i)) => write!(f, "{i}"),
            KValue::Real(None) => write!(f, "real(null)"),
            KValue::Real(Some(r)) => write!(f, "{r}"),
            KValue::String(None) => write!(f, "string(null)"),
            KValue::String(Some(s)) => write!(f, "{s:?}"),
            KValue::DateTime(None) => write!(f, "datetime(null)"),
            KValue::DateTime(Some(t)) => {
                write!(f, "datetime({})", t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            KValue::Timespan(None) => write!(f, "timespan(null)"),
            KValue::Timespan(Some(d)) => write!(f, "timespan({})", format_timespan(*d)),
            KValue::Guid(None) => write!(f, "guid(null)"),
            KValue::Guid(Some(g)) => write!(f, "guid({})", format_guid(g)),
            KValue::Decimal(None) => write!(f, "decimal(null)"),
            KValue::Decimal(Some(d)) => write!(f, "decimal({d})"),
            KValue::Bag(None) | KValue::Array(None) => write!(f, "dynamic(null)"),
            KValue::Bag(Some(bag)) => write!(f, "{bag}"),
            KValue::Array(Some(arr)) => write!(f, "{arr}"),
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for KValue {
    fn from(v: bool) -> Self {
        KValue::Bool(Some(v))
    }
}

impl From<i32> for KValue {
    fn from(v: i32) -> Self {
        KValue::Int(Some(v))
    }
}

impl From<i64> for KValue {
    fn from(v: i64) -> Self {
        KValue::Long(Some(v))
    }
}

impl From<f64> for KValue {
    fn from(v: f64) -> Self {
        KValue::Real(Some(v))
    }
}

impl From<String> for KValue {
    fn from(s: String) -> Self {
        KValue::String(Some(s))
    }
}

impl From<&str> for KValue {
    fn from(s: &str) -> Self {
        KValue::String(Some(s.to_string()))
    }
}

impl From<DateTime<Utc>> for KValue {
    fn from(t: DateTime<Utc>) -> Self {
        KValue::DateTime(Some(t))
    }
}

impl From<TimeDelta> for KValue {
    fn from(d: TimeDelta) -> Self {
        KValue::Timespan(Some(d))
    }
}

impl From<[u8; 16]> for KValue {
    fn from(g: [u8; 16]) -> Self {
        KValue::Guid(Some(g))
    }
}

impl From<Decimal> for KValue {
    fn from(d: Decimal) -> Self {
        KValue::Decimal(Some(d))
    }
}

impl From<DynamicBag> for KValue {
    fn from(bag: DynamicBag) -> Self {
        KValue::Bag(Some(bag))
    }
}

impl From<DynamicArray> for KValue {
    fn from(arr: DynamicArray) -> Self {
        KValue::Array(Some(arr))
    }
}

// ============================================================================
// Guid text form
// ============================================================================

/// Formats guid bytes as lowercase 8-4-4-4-12 hex.
pub fn format_guid(bytes: &[u8; 16]) -> String {
    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[0],
        bytes[1],
        bytes[2],
        bytes[3],
        bytes[4],
        bytes[5],
        bytes[6],
        bytes[7],
        bytes[8],
        bytes[9],
        bytes[10],
        bytes[11],
        bytes[12],
        bytes[13],
        bytes[14],
        bytes[15]
    )
}

/// Parses a guid string (hyphenated or raw 32 hex digits).
pub fn parse_guid(s: &str) -> Result<[u8; 16]> {
    let hex: String = s.chars().filter(|c| *c != '-').collect();
    if hex.len() != 32 || !hex.is_ascii() {
        return Err(KqlError::InvalidGuid(s.to_string()));
    }

    let mut bytes = [0u8; 16];
    for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
        let pair = std::str::from_utf8(chunk).map_err(|_| KqlError::InvalidGuid(s.to_string()))?;
        bytes[i] =
            u8::from_str_radix(pair, 16).map_err(|_| KqlError::InvalidGuid(s.to_string()))?;
    }
    Ok(bytes)
}
