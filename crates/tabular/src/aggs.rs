//! Parsers for single-aggregation responses.
//!
//! Every parser takes the `aggregations` object of a search response (or the
//! same object as a JSON string) holding exactly one named aggregation, and
//! returns a [`Table`].

use crate::error::{Result, TableError};
use crate::table::Table;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use validate::TextInput;

const STATS_FIELDS: &[&str] = &["count", "min", "max", "avg", "sum"];
const EXTENDED_STATS_FIELDS: &[&str] = &[
    "count",
    "min",
    "max",
    "avg",
    "sum",
    "sum_of_squares",
    "variance",
    "std_deviation",
];

/// Parse a `terms` aggregation: one row per bucket, `[name, doc_count]`.
///
/// The terms aggregation is the COUNT() ... GROUP BY of the search world.
pub fn terms_agg_to_table(aggs: &Value) -> Result<Table> {
    buckets_to_table(aggs, "key")
}

/// Parse a `date_histogram` aggregation: one row per time window,
/// `[name, doc_count]`, keyed by the bucket's formatted date.
pub fn date_histogram_agg_to_table(aggs: &Value) -> Result<Table> {
    buckets_to_table(aggs, "key_as_string")
}

/// Parse a `stats` aggregation into a single row
pub fn stats_agg_to_table(aggs: &Value) -> Result<Table> {
    summary_to_table(aggs, STATS_FIELDS)
}

/// Parse an `extended_stats` aggregation into a single row
pub fn extended_stats_agg_to_table(aggs: &Value) -> Result<Table> {
    summary_to_table(aggs, EXTENDED_STATS_FIELDS)
}

/// Parse a `percentiles` aggregation into a single row with one column per
/// requested percentile.
pub fn percentiles_agg_to_table(aggs: &Value) -> Result<Table> {
    let (name, body) = single_aggregation(aggs)?;
    let values = body
        .get("values")
        .and_then(Value::as_object)
        .ok_or_else(|| missing(&name, "values"))?;

    let mut percentiles: Vec<(&String, &Value)> = values.iter().collect();
    percentiles.sort_by(|(a, _), (b, _)| percentile_order(a, b));

    let mut columns = vec!["agg_field".to_string()];
    let mut row = vec![Value::String(name)];
    for (percentile, value) in percentiles {
        columns.push(percentile.clone());
        row.push(value.clone());
    }

    let mut table = Table::new(columns);
    table.push_row(row);
    Ok(table)
}

/// Percentile keys are numbers written as text (`"5.0"`); order them by value
fn percentile_order(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        _ => a.cmp(b),
    }
}

fn buckets_to_table(aggs: &Value, key_field: &str) -> Result<Table> {
    let (name, body) = single_aggregation(aggs)?;
    let buckets = body
        .get("buckets")
        .and_then(Value::as_array)
        .ok_or_else(|| missing(&name, "buckets"))?;

    let mut table = Table::new(vec![name.clone(), "doc_count".to_string()]);
    for bucket in buckets {
        let key = bucket.get(key_field).ok_or_else(|| missing(&name, key_field))?;
        let doc_count = bucket
            .get("doc_count")
            .ok_or_else(|| missing(&name, "doc_count"))?;
        table.push_row(vec![key.clone(), doc_count.clone()]);
    }
    Ok(table)
}

fn summary_to_table(aggs: &Value, fields: &[&str]) -> Result<Table> {
    let (name, body) = single_aggregation(aggs)?;

    let mut columns = vec!["agg_field".to_string()];
    let mut row = vec![Value::String(name.clone())];
    for &field in fields {
        let value = body.get(field).ok_or_else(|| missing(&name, field))?;
        columns.push(field.to_string());
        row.push(value.clone());
    }

    let mut table = Table::new(columns);
    table.push_row(row);
    Ok(table)
}

/// Accept an object or a JSON string, and split off its only aggregation
fn single_aggregation(aggs: &Value) -> Result<(String, Map<String, Value>)> {
    let object = match aggs {
        Value::Object(map) => map.clone(),
        Value::String(text) => match serde_json::from_str::<Value>(text)? {
            Value::Object(map) => map,
            other => return Err(TableError::InvalidKind(other.kind_name())),
        },
        other => return Err(TableError::InvalidKind(other.kind_name())),
    };

    if object.len() != 1 {
        return Err(TableError::AggregationCount(object.len()));
    }

    let (name, body) = object.into_iter().next().ok_or(TableError::AggregationCount(0))?;
    match body {
        Value::Object(body) => Ok((name, body)),
        other => Err(TableError::InvalidKind(other.kind_name())),
    }
}

fn missing(agg: &str, field: &str) -> TableError {
    TableError::MissingField {
        agg: agg.to_string(),
        field: field.to_string(),
    }
}
