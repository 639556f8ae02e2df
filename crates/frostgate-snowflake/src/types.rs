// SPDX-FileCopyrightText: 2026 Frostgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Snowflake SQL API v2 and the legacy session login
//! endpoint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use frostgate_core::Row;

/// Request body for `POST /api/v2/statements`.
#[derive(Debug, Clone, Serialize)]
pub struct StatementRequest {
    pub statement: String,
    /// Server-side timeout in seconds.
    pub timeout: u64,
    pub database: String,
    pub schema: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Positional bindings keyed `"1"`, `"2"`, ...
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub bindings: BTreeMap<String, Binding>,
}

/// One bound statement parameter. Everything is sent as TEXT; Snowflake
/// coerces on the server side.
#[derive(Debug, Clone, Serialize)]
pub struct Binding {
    #[serde(rename = "type")]
    pub binding_type: &'static str,
    pub value: String,
}

impl Binding {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            binding_type: "TEXT",
            value: value.into(),
        }
    }
}

/// Response body for `POST /api/v2/statements`, for both success and
/// error statuses (errors carry `code` and `message`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementResponse {
    #[serde(default)]
    pub result_set_meta_data: Option<ResultSetMetaData>,
    /// Row-major cell values; the SQL API encodes every cell as a string.
    #[serde(default)]
    pub data: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub statement_handle: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSetMetaData {
    #[serde(default)]
    pub row_type: Vec<ColumnInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
}

impl StatementResponse {
    /// Decode the stringly-typed result set into [`Row`]s, coercing cells
    /// by declared column type so numeric columns come back as numbers.
    pub fn rows(&self) -> Vec<Row> {
        let columns = match &self.result_set_meta_data {
            Some(meta) => &meta.row_type,
            None => return Vec::new(),
        };
        let data = match &self.data {
            Some(data) => data,
            None => return Vec::new(),
        };

        data.iter()
            .map(|cells| {
                let mut row = Row::new();
                for (column, cell) in columns.iter().zip(cells.iter()) {
                    row.insert(column.name.clone(), coerce_cell(&column.column_type, cell));
                }
                row
            })
            .collect()
    }
}

fn coerce_cell(column_type: &str, cell: &Option<String>) -> serde_json::Value {
    let raw = match cell {
        Some(raw) => raw,
        None => return serde_json::Value::Null,
    };
    match column_type.to_ascii_lowercase().as_str() {
        "fixed" => raw
            .parse::<i64>()
            .map(Into::into)
            .or_else(|_| raw.parse::<f64>().map(Into::into))
            .unwrap_or_else(|_| serde_json::Value::String(raw.clone())),
        "real" | "float" | "double" => raw
            .parse::<f64>()
            .map(Into::into)
            .unwrap_or_else(|_| serde_json::Value::String(raw.clone())),
        "boolean" => match raw.as_str() {
            "true" | "TRUE" | "1" => serde_json::Value::Bool(true),
            "false" | "FALSE" | "0" => serde_json::Value::Bool(false),
            _ => serde_json::Value::String(raw.clone()),
        },
        _ => serde_json::Value::String(raw.clone()),
    }
}

/// Request body for the legacy `POST /session/v1/login-request` endpoint.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub data: LoginData,
}

#[derive(Debug, Serialize)]
pub struct LoginData {
    #[serde(rename = "ACCOUNT_NAME")]
    pub account_name: String,
    #[serde(rename = "LOGIN_NAME")]
    pub login_name: String,
    #[serde(rename = "PASSWORD")]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub data: Option<LoginResponseData>,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponseData {
    #[serde(default)]
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_zip_columns_and_coerce_types() {
        let body = serde_json::json!({
            "resultSetMetaData": {
                "rowType": [
                    {"name": "FILE_NAME", "type": "text"},
                    {"name": "FILE_SIZE", "type": "fixed"},
                    {"name": "PAGE_COUNT", "type": "fixed"}
                ]
            },
            "data": [
                ["report.pdf", "52433", null],
                ["notes.txt", "812", "3"]
            ]
        });
        let response: StatementResponse = serde_json::from_value(body).unwrap();
        let rows = response.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["FILE_NAME"], "report.pdf");
        assert_eq!(rows[0]["FILE_SIZE"], 52433);
        assert!(rows[0]["PAGE_COUNT"].is_null());
        assert_eq!(rows[1]["PAGE_COUNT"], 3);
    }

    #[test]
    fn rows_empty_without_metadata() {
        let response: StatementResponse =
            serde_json::from_value(serde_json::json!({"message": "ok"})).unwrap();
        assert!(response.rows().is_empty());
    }

    #[test]
    fn bindings_serialize_as_positional_text_map() {
        let mut bindings = BTreeMap::new();
        bindings.insert("1".to_string(), Binding::text("hello"));
        let request = StatementRequest {
            statement: "SELECT ?".into(),
            timeout: 300,
            database: "DB".into(),
            schema: "S".into(),
            warehouse: None,
            role: None,
            bindings,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["bindings"]["1"]["type"], "TEXT");
        assert_eq!(json["bindings"]["1"]["value"], "hello");
        assert!(json.get("warehouse").is_none());
    }

    #[test]
    fn empty_bindings_are_omitted() {
        let request = StatementRequest {
            statement: "SELECT 1".into(),
            timeout: 300,
            database: "DB".into(),
            schema: "S".into(),
            warehouse: Some("WH".into()),
            role: None,
            bindings: BTreeMap::new(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("bindings").is_none());
        assert_eq!(json["warehouse"], "WH");
    }
}
