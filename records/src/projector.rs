//! FILENAME: records/src/projector.rs
//! PURPOSE: Flattens a record into the display strings of one table row.
//! CONTEXT: Coercion is total. Every `FieldValue` shape has exactly one
//! rule, and shapes that carry nothing displayable degrade to an empty
//! string instead of failing the row.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::column::ColumnSpec;
use crate::number_format::{format_general, parse_numeric};
use crate::value::{FieldValue, Record};

/// Separator placed between list elements.
pub const LIST_SEPARATOR: &str = ", ";

/// Sub-keys of a nested object, in preference order.
pub const DISPLAY_NAME_KEY: &str = "Title";
pub const VALUE_KEY: &str = "Value";

/// One projected cell: display text plus the number it denotes, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedCell {
    pub label: String,
    pub text: String,
    pub number: Option<f64>,
}

impl ProjectedCell {
    pub fn text(label: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        ProjectedCell {
            label: label.into(),
            number: parse_numeric(&text),
            text,
        }
    }
}

/// One row of display strings, in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectedRow {
    pub cells: Vec<ProjectedCell>,
}

impl ProjectedRow {
    pub fn new(cells: Vec<ProjectedCell>) -> Self {
        ProjectedRow { cells }
    }

    /// Display text of the column with `label`.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.text.as_str())
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|c| c.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Coerces a field value to its display string.
pub fn display_string(value: &FieldValue) -> String {
    match value {
        FieldValue::Null => String::new(),
        FieldValue::Text(s) => s.clone(),
        FieldValue::Number(n) => format_general(*n),
        FieldValue::Boolean(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        FieldValue::List(items) => items
            .iter()
            .map(display_string)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR),
        FieldValue::Object(map) => match object_display_value(value) {
            Some(inner) => display_string(inner),
            None => {
                debug!(
                    target: "PROJECT",
                    "object with keys [{}] has no {} or {} key, shown empty",
                    map.keys().map(String::as_str).collect::<Vec<_>>().join(", "),
                    DISPLAY_NAME_KEY,
                    VALUE_KEY
                );
                String::new()
            }
        },
    }
}

/// The number a field value denotes, if it denotes one.
pub fn numeric_value(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Number(n) if n.is_finite() => Some(*n),
        FieldValue::Text(s) => parse_numeric(s),
        FieldValue::Object(_) => object_display_value(value).and_then(numeric_value),
        _ => None,
    }
}

/// Picks the displayable sub-value of a nested object. A present
/// `Title` wins even when it is empty.
fn object_display_value(value: &FieldValue) -> Option<&FieldValue> {
    let FieldValue::Object(map) = value else {
        return None;
    };
    map.get(DISPLAY_NAME_KEY).or_else(|| map.get(VALUE_KEY))
}

/// Projects one record onto a column specification.
pub fn project(record: &Record, columns: &[ColumnSpec]) -> ProjectedRow {
    let cells = columns
        .iter()
        .map(|column| {
            if let Some(fixed) = &column.fixed_value {
                return ProjectedCell::text(column.label.clone(), fixed.clone());
            }

            match record.get(&column.source_field) {
                Some(value) => {
                    let text = display_string(value);
                    let number = numeric_value(value);
                    if column.is_numeric() && number.is_none() && !value.is_empty() {
                        debug!(
                            target: "PROJECT",
                            "record {} field {} is not numeric ({}), kept as text",
                            record.id(),
                            column.source_field,
                            value.kind()
                        );
                    }
                    ProjectedCell {
                        label: column.label.clone(),
                        text,
                        number,
                    }
                }
                None => ProjectedCell {
                    label: column.label.clone(),
                    text: String::new(),
                    number: None,
                },
            }
        })
        .collect();

    ProjectedRow { cells }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{LevelFilter, Log, Metadata};
    use serde_json::json;
    use std::sync::{Mutex, Once};

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("PROVEEDOR", 40.0, "PROVEEDOR"),
            ColumnSpec::new("REMISIÓN", 25.0, "REMISION").centered(),
            ColumnSpec::new("UND", 15.0, "UNIDAD").centered().fixed("M3"),
            ColumnSpec::new("VOLUMEN", 20.0, "VOLUMEN").numeric(2),
            ColumnSpec::new("TAGS", 30.0, "TAGS"),
        ]
    }

    #[test]
    fn test_scalar_coercion() {
        assert_eq!(display_string(&FieldValue::Null), "");
        assert_eq!(display_string(&FieldValue::Text("abc".into())), "abc");
        assert_eq!(display_string(&FieldValue::Number(121762.0)), "121762");
        assert_eq!(display_string(&FieldValue::Number(16.38)), "16.38");
        assert_eq!(display_string(&FieldValue::Boolean(true)), "TRUE");
    }

    #[test]
    fn test_list_coercion() {
        let value = FieldValue::from(json!(["a", 2, null, "", {"Title": "c"}]));
        assert_eq!(display_string(&value), "a, 2, c");
        assert_eq!(display_string(&FieldValue::List(vec![])), "");
    }

    #[test]
    fn test_object_coercion() {
        assert_eq!(display_string(&FieldValue::from(json!({"Title": "ACME", "Value": "x"}))), "ACME");
        assert_eq!(display_string(&FieldValue::from(json!({"Value": 12}))), "12");
        assert_eq!(display_string(&FieldValue::from(json!({"Title": "", "Value": "v"}))), "");
        assert_eq!(display_string(&FieldValue::from(json!({"Title": null, "Value": "v"}))), "");
        assert_eq!(display_string(&FieldValue::from(json!({"Other": "x"}))), "");
    }

    /// Keeps every PROJECT line logged while the test binary runs.
    struct CaptureLogger;

    static CAPTURED: Mutex<Vec<String>> = Mutex::new(Vec::new());
    static INSTALL: Once = Once::new();

    impl Log for CaptureLogger {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            if record.target() == "PROJECT" {
                if let Ok(mut lines) = CAPTURED.lock() {
                    lines.push(record.args().to_string());
                }
            }
        }

        fn flush(&self) {}
    }

    fn capture_logs() {
        INSTALL.call_once(|| {
            let _ = log::set_logger(&CaptureLogger);
            log::set_max_level(LevelFilter::Trace);
        });
    }

    #[test]
    fn test_object_without_display_keys_is_logged() {
        capture_logs();

        assert_eq!(display_string(&FieldValue::from(json!({"Codigo": "x", "Otro": 1}))), "");

        let lines = CAPTURED.lock().unwrap();
        assert!(lines
            .iter()
            .any(|l| l.contains("[Codigo, Otro]") && l.contains("no Title or Value")));
    }

    #[test]
    fn test_numeric_value() {
        assert_eq!(numeric_value(&FieldValue::Number(2.5)), Some(2.5));
        assert_eq!(numeric_value(&FieldValue::Text("16,38".into())), Some(16.38));
        assert_eq!(numeric_value(&FieldValue::from(json!({"Value": "7"}))), Some(7.0));
        assert_eq!(numeric_value(&FieldValue::Boolean(true)), None);
        assert_eq!(numeric_value(&FieldValue::Null), None);
    }

    #[test]
    fn test_project_row() {
        let record = Record::from_json(json!({
            "PROVEEDOR": {"Title": "TRANSPORTES Y MOVIMIENTOS CIVILES ACC.S.A.S"},
            "REMISION": "121762",
            "UNIDAD": "TON",
            "VOLUMEN": 10.5,
            "TAGS": ["x", "y"]
        }));

        let row = project(&record, &columns());
        assert_eq!(row.len(), 5);
        assert_eq!(row.get("PROVEEDOR"), Some("TRANSPORTES Y MOVIMIENTOS CIVILES ACC.S.A.S"));
        assert_eq!(row.get("REMISIÓN"), Some("121762"));
        assert_eq!(row.get("UND"), Some("M3"));
        assert_eq!(row.get("VOLUMEN"), Some("10.5"));
        assert_eq!(row.cells[3].number, Some(10.5));
        assert_eq!(row.get("TAGS"), Some("x, y"));
    }

    #[test]
    fn test_project_missing_and_odd_fields_degrade_to_empty() {
        let record = Record::from_json(json!({
            "VOLUMEN": "n/a",
            "TAGS": {"Unknown": 1}
        }));
        let row = project(&record, &columns());
        let texts: Vec<&str> = row.texts().collect();
        assert_eq!(texts, vec!["", "", "M3", "n/a", ""]);
        assert_eq!(row.cells[3].number, None);
        assert!(!texts.iter().any(|t| *t == "null" || *t == "None"));
    }
}
