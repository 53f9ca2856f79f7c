//! Serde models for the coordinator/worker search exchange.
//!
//! Workers re-parse the KQL text themselves, so the request carries the
//! query string rather than a serialized plan. Group and facet payloads
//! stay opaque JSON here to keep this crate free of evaluation-layer
//! types.

use serde::{Deserialize, Serialize};

use crate::dataset::DataSet;

/// Sub-search request sent from the coordinator to a worker.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubSearchRequest {
    pub kql: String,
    pub strategy: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range_from: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range_to: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range_found: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub where_op_indices: Vec<i32>,
}

/// Per-worker sub-search result, carrying a partial [`DataSet`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubSearchJobResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_bytes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_rows: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<DataSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_states: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facet_results: Option<serde_json::Value>,
    pub strategy: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schema_names: Vec<String>,
}

/// Final merged search response returned to the client.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub total: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_bytes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<DataSet>,
    #[serde(rename = "range_from", default, skip_serializing_if = "Option::is_none")]
    pub range_from: Option<i64>,
    #[serde(rename = "range_to", default, skip_serializing_if = "Option::is_none")]
    pub range_to: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}
