use serde_json::{Map, Value};
use std::collections::HashMap;

/// Separator between the keys of nested objects in a flattened column name
pub const SEPARATOR: &str = ".";

/// Column used for documents that are not JSON objects
const SCALAR_COLUMN: &str = "value";

/// A rectangular table of JSON values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Flatten documents into a table.
    ///
    /// Nested objects become `parent.child` columns. Arrays and scalars are
    /// kept as cell values. Columns are ordered by first appearance and cells
    /// a document does not have are `null`.
    pub fn from_documents(docs: &[Value]) -> Self {
        let mut table = Table::default();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for doc in docs {
            let mut flat = Vec::new();
            match doc {
                Value::Object(map) => flatten_into(map, "", &mut flat),
                other => flat.push((SCALAR_COLUMN.to_string(), other.clone())),
            }

            let mut row = vec![Value::Null; table.columns.len()];
            for (column, value) in flat {
                let index = *positions.entry(column.clone()).or_insert_with(|| {
                    table.columns.push(column);
                    table.columns.len() - 1
                });
                if index >= row.len() {
                    row.resize(index + 1, Value::Null);
                }
                row[index] = value;
            }
            table.rows.push(row);
        }

        let width = table.columns.len();
        for row in &mut table.rows {
            row.resize(width, Value::Null);
        }
        table
    }

    /// Append a row. Short rows are padded with `null`, long rows truncated.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Look up a single cell
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[index])
    }

    /// All values of one column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[index]).collect())
    }

    /// Rows as `column -> value` objects
    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }

    /// Serialize as a JSON array of records
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.records())
    }

    /// Serialize as newline-delimited JSON, one record per line
    pub fn to_ndjson(&self) -> serde_json::Result<String> {
        let mut out = String::new();
        for record in self.records() {
            out.push_str(&serde_json::to_string(&record)?);
            out.push('\n');
        }
        Ok(out)
    }
}

fn flatten_into(map: &Map<String, Value>, prefix: &str, out: &mut Vec<(String, Value)>) {
    for (key, value) in map {
        let column = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}{}{}", prefix, SEPARATOR, key)
        };
        match value {
            Value::Object(inner) if !inner.is_empty() => flatten_into(inner, &column, out),
            other => out.push((column, other.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_documents() {
        let docs = vec![
            json!({"name": "hamlet", "lines": 4042}),
            json!({"name": "macbeth", "lines": 2529}),
        ];
        let table = Table::from_documents(&docs);
        assert_eq!(table.columns(), &["lines", "name"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1, "name"), Some(&json!("macbeth")));
    }

    #[test]
    fn test_nested_objects_are_flattened() {
        let docs = vec![json!({
            "play": {"name": "hamlet", "act": {"number": 3}},
            "speaker": "HAMLET",
        })];
        let table = Table::from_documents(&docs);
        assert_eq!(
            table.columns(),
            &["play.act.number", "play.name", "speaker"]
        );
        assert_eq!(table.get(0, "play.act.number"), Some(&json!(3)));
    }

    #[test]
    fn test_arrays_are_leaf_values() {
        let docs = vec![json!({"tags": ["a", "b"]})];
        let table = Table::from_documents(&docs);
        assert_eq!(table.get(0, "tags"), Some(&json!(["a", "b"])));
    }

    #[test]
    fn test_missing_cells_are_null() {
        let docs = vec![json!({"a": 1}), json!({"b": 2}), json!({"a": 3, "b": 4})];
        let table = Table::from_documents(&docs);
        assert_eq!(table.columns(), &["a", "b"]);
        assert_eq!(
            table.column("b").unwrap(),
            vec![&Value::Null, &json!(2), &json!(4)]
        );
        assert_eq!(table.get(0, "b"), Some(&Value::Null));
    }

    #[test]
    fn test_scalar_documents() {
        let table = Table::from_documents(&[json!(1), json!("two")]);
        assert_eq!(table.columns(), &[SCALAR_COLUMN]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_empty() {
        let table = Table::from_documents(&[]);
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
        assert_eq!(table.to_ndjson().unwrap(), "");
    }

    #[test]
    fn test_push_row_pads() {
        let mut table = Table::new(vec!["x".into(), "y".into()]);
        table.push_row(vec![json!(1)]);
        assert_eq!(table.rows()[0], vec![json!(1), Value::Null]);
    }

    #[test]
    fn test_ndjson() {
        let docs = vec![json!({"a": {"b": 1}}), json!({"a": {"b": 2}})];
        let out = Table::from_documents(&docs).to_ndjson().unwrap();
        assert_eq!(out, "{\"a.b\":1}\n{\"a.b\":2}\n");
    }
}
