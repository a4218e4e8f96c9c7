//! Edit payloads for leaf fields, and decoding them from JSON.
use std::any::Any;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;

use crate::field::{FieldKind, FileRef};
use crate::form::EditError;

/// A new input value for one leaf. The variant must match the leaf kind
/// (`Text` serves both text inputs and text areas).
pub enum Input {
    Bool(bool),
    Number(f64),
    Text(String),
    Time(Option<NaiveDateTime>),
    File(Option<Vec<FileRef>>),
    Choice(Option<String>),
    /// Value for a custom field; must be the field's own value type.
    Custom(Box<dyn Any>),
}

impl Input {
    pub fn describe(&self) -> &'static str {
        match self {
            Input::Bool(_) => "boolean",
            Input::Number(_) => "number",
            Input::Text(_) => "text",
            Input::Time(_) => "time",
            Input::File(_) => "file",
            Input::Choice(_) => "choice",
            Input::Custom(_) => "custom",
        }
    }

    /// Decode a JSON value for a leaf of the given kind.
    pub fn from_json(kind: FieldKind, field: &str, value: &Value) -> Result<Self, EditError> {
        let invalid = |reason: String| EditError::InvalidValue {
            field: field.to_string(),
            reason,
        };
        match kind {
            FieldKind::Boolean => value
                .as_bool()
                .map(Input::Bool)
                .ok_or_else(|| invalid(format!("expected a boolean, got {value}"))),
            FieldKind::Number => value
                .as_f64()
                .map(Input::Number)
                .ok_or_else(|| invalid(format!("expected a number, got {value}"))),
            FieldKind::Text | FieldKind::TextArea => value
                .as_str()
                .map(|s| Input::Text(s.to_string()))
                .ok_or_else(|| invalid(format!("expected a string, got {value}"))),
            FieldKind::Time => match value {
                Value::Null => Ok(Input::Time(None)),
                Value::String(s) => parse_time(s)
                    .map(|t| Input::Time(Some(t)))
                    .ok_or_else(|| invalid(format!("unrecognised date or time `{s}`"))),
                other => Err(invalid(format!("expected a date string or null, got {other}"))),
            },
            FieldKind::File => serde_json::from_value::<Option<Vec<FileRef>>>(value.clone())
                .map(Input::File)
                .map_err(|e| invalid(e.to_string())),
            FieldKind::Choice => match value {
                Value::Null => Ok(Input::Choice(None)),
                Value::String(key) => Ok(Input::Choice(Some(key.clone()))),
                other => Err(invalid(format!("expected a choice key or null, got {other}"))),
            },
            FieldKind::Pure => Err(EditError::ReadOnly),
            FieldKind::Custom => Err(invalid("custom fields are edited through their view".to_string())),
        }
    }
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Input::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Input::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Input::Time(t) => f.debug_tuple("Time").field(t).finish(),
            Input::File(files) => f.debug_tuple("File").field(files).finish(),
            Input::Choice(key) => f.debug_tuple("Choice").field(key).finish(),
            Input::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Accepts the shapes date-ish inputs produce: full date-times, dates,
/// months (first day) and bare times (on 1970-01-01).
fn parse_time(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(t);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    for fmt in ["%H:%M:%S", "%H:%M"] {
        if let Ok(t) = NaiveTime::parse_from_str(s, fmt) {
            return NaiveDate::from_ymd_opt(1970, 1, 1).map(|d| d.and_time(t));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn time(s: &str) -> Option<NaiveDateTime> {
        match Input::from_json(FieldKind::Time, "t", &json!(s)).unwrap() {
            Input::Time(t) => t,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn decodes_scalars_by_kind() {
        assert!(matches!(Input::from_json(FieldKind::Boolean, "b", &json!(true)), Ok(Input::Bool(true))));
        assert!(matches!(Input::from_json(FieldKind::Number, "n", &json!(4)), Ok(Input::Number(n)) if n == 4.0));
        assert!(matches!(Input::from_json(FieldKind::TextArea, "m", &json!("hi")), Ok(Input::Text(s)) if s == "hi"));
        assert!(matches!(Input::from_json(FieldKind::Choice, "c", &json!(null)), Ok(Input::Choice(None))));
    }

    #[test]
    fn decodes_date_shapes() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(time("2024-03-09"), day.and_hms_opt(0, 0, 0));
        assert_eq!(time("2024-03-09T10:30"), day.and_hms_opt(10, 30, 0));
        assert_eq!(time("2024-03"), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0));
        assert_eq!(time("07:15"), NaiveDate::from_ymd_opt(1970, 1, 1).unwrap().and_hms_opt(7, 15, 0));
        assert!(Input::from_json(FieldKind::Time, "t", &json!("yesterday")).is_err());
    }

    #[test]
    fn decodes_file_lists() {
        let v = json!([{"name": "cv.pdf", "size": 1200}]);
        match Input::from_json(FieldKind::File, "f", &v).unwrap() {
            Input::File(Some(files)) => {
                assert_eq!(files.len(), 1);
                assert_eq!(files[0].name, "cv.pdf");
                assert_eq!(files[0].mime, None);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejects_wrong_shapes() {
        let err = Input::from_json(FieldKind::Number, "age", &json!("ten")).unwrap_err();
        assert!(err.to_string().contains("age"));
        assert!(matches!(Input::from_json(FieldKind::Pure, "", &json!(1)), Err(EditError::ReadOnly)));
    }
}
