use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// One row of a table. A missing key and an explicit `Value::Null` both mean "absent".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cell for `column` unless it is missing or null.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.data.get(column).filter(|value| !value.is_null())
    }

    /// Textual rendering of a present cell. Numbers use their shortest display form.
    pub fn text(&self, column: &str) -> Option<String> {
        self.get(column).and_then(cell_text)
    }

    /// Trimmed text of a present, non-blank cell.
    pub fn non_blank(&self, column: &str) -> Option<String> {
        self.text(column)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(column.into(), value.into());
    }

    pub fn clear(&mut self, column: &str) {
        self.data.insert(column.to_string(), Value::Null);
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.data.remove(column)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Render a cell as text. `Null` has no textual form.
pub fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(format_number(n)),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Integers print without a fractional part, floats use the shortest round-trip form.
pub fn format_number(number: &serde_json::Number) -> String {
    if let Some(i) = number.as_i64() {
        i.to_string()
    } else if let Some(u) = number.as_u64() {
        u.to_string()
    } else {
        number.as_f64().map(|f| f.to_string()).unwrap_or_default()
    }
}

/// An ordered set of columns plus the rows that populate them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_rows(mut self, rows: Vec<Record>) -> Self {
        self.rows = rows;
        self
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Appends `column` if it is not already part of the table.
    pub fn ensure_column(&mut self, column: &str) {
        if !self.has_column(column) {
            self.columns.push(column.to_string());
        }
    }

    /// Drops `column` from the header and from every row.
    pub fn drop_column(&mut self, column: &str) {
        self.columns.retain(|c| c != column);
        for row in &mut self.rows {
            row.remove(column);
        }
    }

    pub fn push(&mut self, record: Record) {
        self.rows.push(record);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Columns from `required` that the table does not carry, in the order given.
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|column| !self.has_column(column))
            .map(|column| column.to_string())
            .collect()
    }
}

/// Which of the three import pipelines a run targets. Never auto-detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    Products,
    Customers,
    Orders,
}

impl ImportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportKind::Products => "products",
            ImportKind::Customers => "customers",
            ImportKind::Orders => "orders",
        }
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
