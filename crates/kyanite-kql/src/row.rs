//! Row storage: a shared immutable schema plus a positional value vector.

use std::collections::HashMap;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::codec::WireValue;
use crate::dynamic::DynamicBag;
use crate::value::{KValue, NULL_VALUE};

// ============================================================================
// Schema (shared across all rows in a batch)
// ============================================================================

/// Immutable column schema: ordered names plus a name-to-index map.
///
/// One `ColumnInfo` is built per query stage and shared by [`Arc`] across
/// every row that stage produces; a row is then just a schema pointer and
/// a value vector. Schema evolution never mutates in place — [`extend`]
/// allocates a new instance, so rows referencing the old schema stay
/// valid.
///
/// [`extend`]: ColumnInfo::extend
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnInfo {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl ColumnInfo {
    /// Creates a schema from ordered column names.
    pub fn new(names: Vec<String>) -> Self {
        let index = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
        Self { names, index }
    }

    /// Returns the ordered column names.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the index of a column name, if present.
    pub fn index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Creates a new schema with additional columns appended.
    ///
    /// The receiver is left untouched; rows built against it keep their
    /// original layout.
    pub fn extend(&self, new_cols: &[String]) -> ColumnInfo {
        let mut names = Vec::with_capacity(self.names.len() + new_cols.len());
        names.extend_from_slice(&self.names);
        names.extend_from_slice(new_cols);
        ColumnInfo::new(names)
    }
}

// ============================================================================
// Row (unique per record)
// ============================================================================

/// One materialized record: a schema pointer and positional values.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    schema: Arc<ColumnInfo>,
    values: Vec<KValue>,
}

impl Row {
    /// Creates a row over a shared schema.
    pub fn new(schema: Arc<ColumnInfo>, values: Vec<KValue>) -> Self {
        Self { schema, values }
    }

    /// Returns the shared schema.
    pub fn schema(&self) -> &Arc<ColumnInfo> {
        &self.schema
    }

    /// Returns the positional values.
    pub fn values(&self) -> &[KValue] {
        &self.values
    }

    /// Returns the value for a column name (O(1) map-assisted lookup).
    ///
    /// Missing names resolve to the generic null, never an error.
    pub fn get(&self, name: &str) -> &KValue {
        match self.schema.index(name) {
            Some(i) => self.get_at(i),
            None => &NULL_VALUE,
        }
    }

    /// Returns the value at a positional index, bounds-checked.
    ///
    /// Out-of-range indices resolve to the generic null, never a panic.
    pub fn get_at(&self, index: usize) -> &KValue {
        self.values.get(index).unwrap_or(&NULL_VALUE)
    }

    /// Packs the row into a property bag in column order.
    pub fn to_bag(&self) -> DynamicBag {
        let mut bag = DynamicBag::with_capacity(self.values.len());
        for (name, value) in self.schema.names().iter().zip(&self.values) {
            bag.set(name.clone(), value.clone());
        }
        bag
    }
}

impl Serialize for Row {
    /// Emits the flat `{"col1": v1, "col2": v2, ...}` object form.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.schema.names().iter().zip(&self.values) {
            map.serialize_entry(name, &WireValue(value))?;
        }
        map.end()
    }
}
