//! Tests for rows, tables, data sets, and the search API models.

use std::sync::Arc;

use serde_json::json;

use crate::api::{SearchResponse, SubSearchJobResult, SubSearchRequest};
use crate::dataset::DataSet;
use crate::row::{ColumnInfo, Row};
use crate::table::{infer_column_defs, ColumnDef, DataTable};
use crate::value::{KType, KValue};

fn sample_schema() -> Arc<ColumnInfo> {
    Arc::new(ColumnInfo::new(vec!["host".into(), "count".into()]))
}

// ----------------------------------------------------------------------------
// Schema and rows
// ----------------------------------------------------------------------------

#[test]
fn column_lookup_is_stable_and_ordered() {
    let schema = sample_schema();
    assert_eq!(schema.len(), 2);
    assert_eq!(schema.index("host"), Some(0));
    assert_eq!(schema.index("count"), Some(1));
    assert_eq!(schema.index("missing"), None);
    assert_eq!(schema.names(), ["host", "count"]);
}

#[test]
fn extend_allocates_a_new_schema() {
    let base = sample_schema();
    let wider = base.extend(&["level".into()]);

    assert_eq!(base.len(), 2);
    assert_eq!(wider.len(), 3);
    assert_eq!(wider.index("level"), Some(2));
    // Existing columns keep their indices.
    assert_eq!(wider.index("host"), Some(0));
}

#[test]
fn row_lookups_never_fail() {
    let row = Row::new(
        sample_schema(),
        vec![KValue::from("web-1"), KValue::from(42_i64)],
    );

    assert_eq!(row.get("host").as_str(), Some("web-1"));
    assert_eq!(row.get_at(1).as_long(), Some(42));

    // Misses resolve to the generic null, not a panic or error.
    assert!(row.get("missing").is_null());
    assert!(row.get_at(5).is_null());
}

#[test]
fn row_shorter_than_schema_reads_null_past_the_end() {
    let row = Row::new(sample_schema(), vec![KValue::from("web-1")]);
    assert!(row.get("count").is_null());
}

#[test]
fn row_packs_into_a_bag_in_column_order() {
    let row = Row::new(
        sample_schema(),
        vec![KValue::from("web-1"), KValue::from(42_i64)],
    );
    let bag = row.to_bag();
    let keys: Vec<&str> = bag.pairs().iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, ["host", "count"]);
    assert_eq!(bag.get("count").as_long(), Some(42));
}

#[test]
fn row_serializes_as_a_flat_object() {
    let row = Row::new(
        sample_schema(),
        vec![KValue::from("web-1"), KValue::from(42_i64)],
    );
    assert_eq!(
        serde_json::to_value(&row).unwrap(),
        json!({"host": "web-1", "count": 42})
    );
}

// ----------------------------------------------------------------------------
// Column inference
// ----------------------------------------------------------------------------

#[test]
fn infers_the_first_non_null_type_per_column() {
    let schema = sample_schema();
    let rows = vec![
        Row::new(Arc::clone(&schema), vec![KValue::Null, KValue::Null]),
        Row::new(Arc::clone(&schema), vec![KValue::from("web-1"), KValue::Null]),
    ];

    let defs = infer_column_defs(&rows);
    assert_eq!(defs.len(), 2);
    assert_eq!(defs[0], ColumnDef::new("host", KType::String));
    // All-null column defaults to dynamic.
    assert_eq!(defs[1], ColumnDef::new("count", KType::Dynamic));
}

#[test]
fn no_rows_means_no_columns() {
    assert!(infer_column_defs(&[]).is_empty());
}

// ----------------------------------------------------------------------------
// DataTable codec
// ----------------------------------------------------------------------------

#[test]
fn all_rows_share_one_schema_allocation() {
    let table = DataTable::new(
        "T",
        vec![ColumnDef::new("a", KType::Long)],
        vec![vec![KValue::from(1_i64)], vec![KValue::from(2_i64)]],
    );
    assert!(Arc::ptr_eq(table.rows[0].schema(), table.rows[1].schema()));
}

#[test]
fn table_round_trips_with_integer_exactness() {
    let table = DataTable::new(
        "T",
        vec![
            ColumnDef::new("n", KType::Long),
            ColumnDef::new("label", KType::String),
        ],
        vec![
            vec![KValue::from(i64::MAX), KValue::from("max")],
            vec![KValue::from(i64::MIN), KValue::from("min")],
        ],
    );

    let encoded = serde_json::to_string(&table).unwrap();
    let decoded: DataTable = serde_json::from_str(&encoded).unwrap();

    assert_eq!(decoded, table);
    assert_eq!(decoded.rows[0].get("n").as_long(), Some(i64::MAX));
}

#[test]
fn decodes_the_positional_wire_layout() {
    let body = r#"{
        "Tables": [{
            "TableName": "PrimaryResult",
            "Columns": [
                {"ColumnName": "count", "DataType": "long"},
                {"ColumnName": "when", "DataType": "datetime"}
            ],
            "Rows": [
                [42, "2024-05-01T00:00:00Z"],
                [null, null]
            ]
        }]
    }"#;

    let dataset: DataSet = serde_json::from_str(body).unwrap();
    let table = dataset.get_table("PrimaryResult").unwrap();

    assert_eq!(table.columns.len(), 2);
    assert_eq!(table.columns[0].ktype, KType::Long);
    assert_eq!(table.rows[0].get("count").to_string(), "42");
    assert!(table.rows[1].get("count").is_null());
    assert!(table.rows[1].get("when").is_null());

    // Re-encoding reproduces the source document.
    let reencoded = serde_json::to_value(&dataset).unwrap();
    let original: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(reencoded, original);
}

#[test]
fn short_rows_pad_with_nulls() {
    let body = r#"{
        "TableName": "T",
        "Columns": [
            {"ColumnName": "a", "DataType": "long"},
            {"ColumnName": "b", "DataType": "string"}
        ],
        "Rows": [[7]]
    }"#;

    let table: DataTable = serde_json::from_str(body).unwrap();
    assert_eq!(table.rows[0].get("a").as_long(), Some(7));
    assert!(table.rows[0].get("b").is_null());
}

#[test]
fn one_bad_cell_aborts_the_table_decode() {
    let body = r#"{
        "TableName": "T",
        "Columns": [{"ColumnName": "a", "DataType": "long"}],
        "Rows": [[1], ["not a long"]]
    }"#;
    assert!(serde_json::from_str::<DataTable>(body).is_err());
}

#[test]
fn unrecognized_column_type_decodes_through_the_dynamic_fallback() {
    let body = r#"{
        "TableName": "T",
        "Columns": [{"ColumnName": "payload", "DataType": "varchar"}],
        "Rows": [[{"k": 1}]]
    }"#;

    let table: DataTable = serde_json::from_str(body).unwrap();
    assert_eq!(table.columns[0].ktype, KType::Unknown);
    let bag = table.rows[0].get("payload").as_bag().unwrap();
    assert_eq!(bag.get("k").as_long(), Some(1));
}

#[test]
fn from_rows_infers_its_header() {
    let schema = sample_schema();
    let rows = vec![Row::new(
        schema,
        vec![KValue::from("web-1"), KValue::from(3_i64)],
    )];
    let table = DataTable::from_rows("T", rows);
    assert_eq!(table.columns[1], ColumnDef::new("count", KType::Long));
}

// ----------------------------------------------------------------------------
// DataSet
// ----------------------------------------------------------------------------

#[test]
fn table_lookup_is_case_sensitive_first_match() {
    let mut dataset = DataSet::new();
    dataset.add_table(DataTable::new("A", Vec::new(), Vec::new()));
    dataset.add_table(DataTable::new("a", Vec::new(), Vec::new()));

    assert_eq!(dataset.get_table("a").unwrap().name, "a");
    assert!(dataset.get_table("B").is_none());
}

#[test]
fn empty_dataset_round_trips() {
    let encoded = serde_json::to_string(&DataSet::new()).unwrap();
    assert_eq!(encoded, r#"{"Tables":[]}"#);
    let decoded: DataSet = serde_json::from_str("{}").unwrap();
    assert!(decoded.tables.is_empty());
}

// ----------------------------------------------------------------------------
// Search API models
// ----------------------------------------------------------------------------

#[test]
fn request_omits_absent_optional_fields() {
    let request = SubSearchRequest {
        kql: "logs | count".into(),
        strategy: 1,
        ..SubSearchRequest::default()
    };

    let encoded = serde_json::to_value(&request).unwrap();
    assert_eq!(encoded, json!({"kql": "logs | count", "strategy": 1}));

    let decoded: SubSearchRequest = serde_json::from_value(encoded).unwrap();
    assert_eq!(decoded, request);
}

#[test]
fn request_round_trips_with_camel_case_names() {
    let request = SubSearchRequest {
        kql: "logs | take 10".into(),
        strategy: 2,
        time_range_from: Some(1_700_000_000_000),
        time_range_to: Some(1_700_000_060_000),
        time_range_found: Some(true),
        where_op_indices: vec![0, 3],
    };

    let encoded = serde_json::to_value(&request).unwrap();
    assert_eq!(encoded["timeRangeFrom"], json!(1_700_000_000_000_i64));
    assert_eq!(encoded["whereOpIndices"], json!([0, 3]));

    let decoded: SubSearchRequest = serde_json::from_value(encoded).unwrap();
    assert_eq!(decoded, request);
}

#[test]
fn job_result_carries_a_dataset_and_opaque_states() {
    let mut dataset = DataSet::new();
    dataset.add_table(DataTable::new(
        "PrimaryResult",
        vec![ColumnDef::new("count", KType::Long)],
        vec![vec![KValue::from(42_i64)]],
    ));

    let result = SubSearchJobResult {
        total_rows: Some(1),
        data: Some(dataset),
        group_states: Some(json!({"g0": [1, 2]})),
        strategy: 1,
        ..SubSearchJobResult::default()
    };

    let encoded = serde_json::to_string(&result).unwrap();
    let decoded: SubSearchJobResult = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, result);

    let data = decoded.data.unwrap();
    let table = data.get_table("PrimaryResult").unwrap();
    assert_eq!(table.rows[0].get("count").as_long(), Some(42));
}

#[test]
fn response_uses_snake_case_range_names() {
    let response = SearchResponse {
        total: 10,
        range_from: Some(100),
        range_to: Some(200),
        ..SearchResponse::default()
    };

    let encoded = serde_json::to_value(&response).unwrap();
    assert_eq!(
        encoded,
        json!({"total": 10, "range_from": 100, "range_to": 200})
    );
    let decoded: SearchResponse = serde_json::from_value(encoded).unwrap();
    assert_eq!(decoded, response);
}
