//! Shared helpers for command handlers.

use std::io::BufRead;
use std::path::Path;

use serde_json::Value;

use crate::error::CliError;

/// Parse a JSON change set from `--data` or `--file`. Must be an object.
pub fn read_json_payload(data: Option<&str>, file: Option<&Path>) -> Result<Value, CliError> {
    let (field, text) = match (data, file) {
        (Some(inline), _) => ("data", inline.to_owned()),
        (None, Some(path)) => ("file", std::fs::read_to_string(path)?),
        (None, None) => {
            return Err(CliError::Validation {
                field: "data".into(),
                reason: "pass --data or --file".into(),
            });
        }
    };
    let value: Value = serde_json::from_str(&text)?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(CliError::Validation {
            field: field.into(),
            reason: "expected a JSON object".into(),
        })
    }
}

/// First line of stdin, trimmed.
pub fn read_line(input: &mut impl BufRead) -> Result<String, CliError> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn inline_object_is_accepted() {
        let value = read_json_payload(Some(r#"{"name": "ap-lobby"}"#), None).unwrap();
        assert_eq!(value["name"], "ap-lobby");
    }

    #[test]
    fn arrays_are_rejected() {
        let err = read_json_payload(Some("[1, 2]"), None).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "data"));
    }

    #[test]
    fn file_payload_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("change.json");
        std::fs::write(&path, r#"{"led_override": "off"}"#).unwrap();
        let value = read_json_payload(None, Some(&path)).unwrap();
        assert_eq!(value["led_override"], "off");
    }

    #[test]
    fn malformed_json_is_a_usage_error() {
        let err = read_json_payload(Some("{name"), None).unwrap_err();
        assert!(matches!(err, CliError::Json(_)));
    }

    #[test]
    fn stdin_line_is_trimmed() {
        let mut input = Cursor::new("  secret-key \n");
        assert_eq!(read_line(&mut input).unwrap(), "secret-key");
    }
}
