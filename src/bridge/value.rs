//! Structured bridge value model and the value-formatting policy.
//!
//! The variable store holds [`Value`]s; tabular detection and presentation
//! become exhaustive matches over its tag instead of runtime type inspection.

use serde_json::{Map, Value as Json};

use super::error::{DispatchError, DispatchResult, TableError};
use crate::protocol::command::{FormattedValue, MIME_JSON, MIME_TABLE_SCHEMA};

/// A value held in the variable store.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Anything expressible as plain JSON: scalars, arrays, objects.
    Scalar(Json),
    /// A table-shaped value: ordered rows of named fields.
    Table(TableValue),
    /// A runtime binding with no JSON representation, carried only so the
    /// enumeration exclusion rule has something to match on.
    Opaque {
        /// Descriptive runtime type label, e.g. `"module"`.
        type_name: String,
    },
}

impl Value {
    /// Descriptive runtime type label for this value.
    pub fn type_name(&self) -> String {
        match self {
            Value::Scalar(json) => match json {
                Json::Null => "null",
                Json::Bool(_) => "boolean",
                Json::Number(_) => "number",
                Json::String(_) => "string",
                Json::Array(_) => "array",
                Json::Object(_) => "object",
            }
            .to_string(),
            Value::Table(_) => "table".to_string(),
            Value::Opaque { type_name } => type_name.clone(),
        }
    }

    /// The value in its natural decoded form: the JSON itself for scalars,
    /// an array of row records for tables.
    pub fn natural(&self) -> DispatchResult<Json> {
        match self {
            Value::Scalar(json) => Ok(json.clone()),
            Value::Table(table) => Ok(table.to_records()),
            Value::Opaque { type_name } => Err(no_json_representation(type_name)),
        }
    }

    /// Compute the presentation encoding for this value.
    ///
    /// Tabular values override the requested mime to table-schema+json and
    /// render a bounded preview. Scalars serialize compactly under
    /// `application/json`; any other requested mime yields "no value
    /// produced" (`value: null`) with the requested tag echoed back.
    pub fn formatted(&self, mime_type: &str, preview_rows: usize) -> DispatchResult<FormattedValue> {
        match self {
            Value::Table(table) => Ok(FormattedValue::new(
                MIME_TABLE_SCHEMA,
                Some(table.preview(preview_rows)),
            )),
            Value::Scalar(json) => {
                if mime_type == MIME_JSON {
                    let text = serde_json::to_string(json)
                        .map_err(|err| DispatchError::Protocol(err.to_string()))?;
                    Ok(FormattedValue::new(MIME_JSON, Some(text)))
                } else if mime_type == MIME_TABLE_SCHEMA {
                    Err(DispatchError::Protocol(format!(
                        "cannot render a non-tabular value as \"{MIME_TABLE_SCHEMA}\""
                    )))
                } else {
                    Ok(FormattedValue::new(mime_type, None))
                }
            }
            Value::Opaque { type_name } => Err(no_json_representation(type_name)),
        }
    }
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        Value::Scalar(json)
    }
}

fn no_json_representation(type_name: &str) -> DispatchError {
    DispatchError::Protocol(format!(
        "value of type \"{type_name}\" has no JSON representation"
    ))
}

/// A table-shaped value: ordered column names plus ordered row records.
#[derive(Debug, Clone, PartialEq)]
pub struct TableValue {
    columns: Vec<String>,
    rows: Vec<Map<String, Json>>,
}

impl TableValue {
    /// Construct a table from a decoded table-schema+json payload.
    ///
    /// Only the `data` field is consulted: an ordered array of row records.
    /// Column order is first-occurrence order across the rows. Rows may omit
    /// columns introduced by other rows; the cell is simply absent.
    pub fn from_payload(payload: &Json) -> Result<Self, TableError> {
        let data = payload
            .as_object()
            .and_then(|object| object.get("data"))
            .ok_or(TableError::PayloadShape)?;
        let records = data.as_array().ok_or(TableError::DataNotArray)?;

        let mut columns: Vec<String> = Vec::new();
        let mut rows = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let row = record
                .as_object()
                .ok_or(TableError::RowNotObject(index))?
                .clone();
            for key in row.keys() {
                if !columns.iter().any(|column| column == key) {
                    columns.push(key.clone());
                }
            }
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    /// Column names in schema order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Row records in table order.
    pub fn rows(&self) -> &[Map<String, Json>] {
        &self.rows
    }

    /// The table as a JSON array of row records.
    pub fn to_records(&self) -> Json {
        Json::Array(self.rows.iter().cloned().map(Json::Object).collect())
    }

    /// Render a bounded textual preview: header row of column names, cells
    /// right-aligned, no row index. At most `max_rows` rows are shown; longer
    /// tables render the leading rows, a `..` marker row, and the trailing
    /// rows.
    pub fn preview(&self, max_rows: usize) -> String {
        let marker = "..";
        let lines: Vec<Vec<String>> = if self.rows.len() > max_rows && max_rows > 0 {
            let head = max_rows / 2;
            let tail = max_rows.saturating_sub(head + 1);
            let mut lines: Vec<Vec<String>> =
                self.rows[..head].iter().map(|row| self.cells(row)).collect();
            lines.push(vec![marker.to_string(); self.columns.len()]);
            lines.extend(
                self.rows[self.rows.len() - tail..]
                    .iter()
                    .map(|row| self.cells(row)),
            );
            lines
        } else {
            self.rows.iter().map(|row| self.cells(row)).collect()
        };

        let mut widths: Vec<usize> = self.columns.iter().map(|column| column.len()).collect();
        for line in &lines {
            for (index, cell) in line.iter().enumerate() {
                widths[index] = widths[index].max(cell.len());
            }
        }

        let mut rendered = Vec::with_capacity(lines.len() + 1);
        rendered.push(render_line(&self.columns, &widths));
        for line in &lines {
            rendered.push(render_line(line, &widths));
        }
        rendered.join("\n")
    }

    fn cells(&self, row: &Map<String, Json>) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| row.get(column).map(cell_text).unwrap_or_default())
            .collect()
    }
}

fn render_line<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:>width$}", cell.as_ref(), width = *width))
        .collect::<Vec<_>>()
        .join("  ")
}

fn cell_text(value: &Json) -> String {
    match value {
        Json::String(text) => text.clone(),
        Json::Null => String::new(),
        other => other.to_string(),
    }
}
