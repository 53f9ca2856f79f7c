//! Dynamic container types: the ordered property bag and array.
//!
//! KQL dynamic objects must preserve field insertion order through
//! serialization, so [`DynamicBag`] is a pair sequence, not a map.
//! Duplicate keys are legal; lookup is last-write-wins.

use std::fmt::{self, Display};

use crate::error::Result;
use crate::value::{KValue, NULL_VALUE};

// ============================================================================
// Property Bag
// ============================================================================

/// An ordered KQL property bag (JSON object).
///
/// Backed by a sequence of key/value pairs rather than a map: insertion
/// order survives serialization byte-for-byte, and duplicate keys are
/// kept (the most recently set value for a key is authoritative).
///
/// A `DynamicBag` itself is never null; the null bag is
/// [`KValue::Bag`]`(None)`, which is distinct from an empty bag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DynamicBag {
    pairs: Vec<(String, KValue)>,
}

impl DynamicBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Creates an empty bag with room for `capacity` pairs.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pairs: Vec::with_capacity(capacity),
        }
    }

    /// Appends a key/value pair.
    ///
    /// Always appends, never overwrites in place: setting an existing key
    /// again shadows the earlier entry for lookup while both remain in
    /// the pair sequence.
    pub fn set(&mut self, key: impl Into<String>, value: KValue) {
        self.pairs.push((key.into(), value));
    }

    /// Looks up a key, scanning from the end so the last write wins.
    ///
    /// Missing keys return the generic null, never an error.
    pub fn get(&self, key: &str) -> &KValue {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map_or(&NULL_VALUE, |(_, v)| v)
    }

    /// Returns the pair sequence in insertion order.
    pub fn pairs(&self) -> &[(String, KValue)] {
        &self.pairs
    }

    /// Returns the number of pairs (duplicates counted).
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if the bag holds no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates pairs in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, (String, KValue)> {
        self.pairs.iter()
    }
}

impl<'a> IntoIterator for &'a DynamicBag {
    type Item = &'a (String, KValue);
    type IntoIter = std::slice::Iter<'a, (String, KValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

impl FromIterator<(String, KValue)> for DynamicBag {
    fn from_iter<I: IntoIterator<Item = (String, KValue)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

impl Display for DynamicBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key:?}: {value}")?;
        }
        write!(f, "}}")
    }
}

// ============================================================================
// Array
// ============================================================================

/// An ordered, append-only KQL array.
///
/// The null array is [`KValue::Array`]`(None)`, distinct from an empty
/// array.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DynamicArray {
    elements: Vec<KValue>,
}

impl DynamicArray {
    /// Creates an empty array.
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Creates an empty array with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
        }
    }

    /// Appends an element.
    pub fn push(&mut self, value: KValue) {
        self.elements.push(value);
    }

    /// Returns the element at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&KValue> {
        self.elements.get(index)
    }

    /// Returns the elements in order.
    pub fn elements(&self) -> &[KValue] {
        &self.elements
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterates elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, KValue> {
        self.elements.iter()
    }
}

impl<'a> IntoIterator for &'a DynamicArray {
    type Item = &'a KValue;
    type IntoIter = std::slice::Iter<'a, KValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl From<Vec<KValue>> for DynamicArray {
    fn from(elements: Vec<KValue>) -> Self {
        Self { elements }
    }
}

impl FromIterator<KValue> for DynamicArray {
    fn from_iter<I: IntoIterator<Item = KValue>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl Display for DynamicArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, "]")
    }
}

// ============================================================================
// Generic JSON bridge
// ============================================================================

/// Converts generic decoded JSON into the [`KValue`] tree.
///
/// Objects become bags in source order (serde_json is built with
/// `preserve_order`); arrays become dynamic arrays. Integer-valued
/// numbers become `Long`, everything else representable becomes `Real`,
/// and a number representable as neither is encoded as an *invalid*
/// (null) string rather than raising an error — callers check
/// [`KValue::is_null`].
pub fn from_json_value(value: &serde_json::Value) -> KValue {
    match value {
        serde_json::Value::Null => KValue::Null,
        serde_json::Value::Bool(b) => KValue::Bool(Some(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                KValue::Long(Some(i))
            } else if let Some(f) = n.as_f64() {
                // Integer-valued floats stay exact integers when they fit.
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                    KValue::Long(Some(f as i64))
                } else {
                    KValue::Real(Some(f))
                }
            } else {
                KValue::String(None)
            }
        }
        serde_json::Value::String(s) => KValue::String(Some(s.clone())),
        serde_json::Value::Array(items) => {
            let mut arr = DynamicArray::with_capacity(items.len());
            for item in items {
                arr.push(from_json_value(item));
            }
            KValue::Array(Some(arr))
        }
        serde_json::Value::Object(map) => {
            let mut bag = DynamicBag::with_capacity(map.len());
            for (key, child) in map {
                bag.set(key.clone(), from_json_value(child));
            }
            KValue::Bag(Some(bag))
        }
    }
}

/// Parses a JSON document into the [`KValue`] tree.
pub fn parse_dynamic_json(json: &str) -> Result<KValue> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    Ok(from_json_value(&value))
}
