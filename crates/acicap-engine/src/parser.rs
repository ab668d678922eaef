//! Export payload parsing.
//!
//! One raw export file becomes a flat list of `(class, attributes)` records.
//! The structured JSON format accepts two entry shapes: an explicit
//! `{"type": ..., "attributes": ...}` object and the native single-key
//! `{"<class>": {"attributes": ...}}` object; anything else is skipped.

use acicap_core::{Attributes, ManagedObject};
use serde_json::Value;

use crate::errors::IngestError;

/// Parse one raw export payload in the declared format.
///
/// Only `json` is supported; any other declared format is a hard error.
pub fn parse_export(content: &str, format: &str) -> Result<Vec<ManagedObject>, IngestError> {
    if !format.eq_ignore_ascii_case("json") {
        return Err(IngestError::UnsupportedFormat(format.to_string()));
    }
    parse_json_export(content)
}

fn parse_json_export(content: &str) -> Result<Vec<ManagedObject>, IngestError> {
    let payload: Value = serde_json::from_str(content)
        .map_err(|err| IngestError::MalformedPayload(err.to_string()))?;

    let entries = match &payload {
        Value::Object(map) => match map.get("imdata") {
            Some(Value::Array(items)) => items.as_slice(),
            Some(other) => {
                return Err(IngestError::MalformedPayload(format!(
                    "imdata must be an array, found {}",
                    value_kind(other)
                )));
            }
            None => &[],
        },
        Value::Array(items) => items.as_slice(),
        other => {
            return Err(IngestError::MalformedPayload(format!(
                "top-level value must be an object or array, found {}",
                value_kind(other)
            )));
        }
    };

    let mut records = Vec::new();
    for entry in entries {
        let Value::Object(map) = entry else {
            continue;
        };

        if let (Some(Value::String(class)), Some(attributes)) =
            (map.get("type"), map.get("attributes"))
        {
            records.push(ManagedObject::new(
                class.clone(),
                coerce_attributes(attributes),
            ));
            continue;
        }

        if map.len() == 1 {
            if let Some((class, body)) = map.iter().next() {
                let attributes = body.get("attributes").unwrap_or(&Value::Null);
                records.push(ManagedObject::new(
                    class.clone(),
                    coerce_attributes(attributes),
                ));
            }
        }
    }

    Ok(records)
}

/// Flatten an attribute object into a string map; scalars are stringified,
/// nested values dropped.
fn coerce_attributes(value: &Value) -> Attributes {
    let mut attributes = Attributes::new();
    if let Value::Object(map) = value {
        for (key, value) in map {
            match value {
                Value::String(text) => {
                    attributes.insert(key.clone(), text.clone());
                }
                Value::Number(number) => {
                    attributes.insert(key.clone(), number.to_string());
                }
                Value::Bool(flag) => {
                    attributes.insert(key.clone(), flag.to_string());
                }
                _ => {}
            }
        }
    }
    attributes
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_both_entry_shapes() {
        let payload = r#"{
            "imdata": [
                {"type": "fvTenant", "attributes": {"dn": "uni/tn-Prod", "name": "Prod"}},
                {"fvBD": {"attributes": {"dn": "uni/tn-Prod/BD-web"}}}
            ]
        }"#;
        let records = parse_export(payload, "json").expect("parse");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].class, "fvTenant");
        assert_eq!(records[1].class, "fvBD");
        assert_eq!(records[1].dn(), Some("uni/tn-Prod/BD-web"));
    }

    #[test]
    fn accepts_bare_arrays_and_skips_odd_shapes() {
        let payload = r#"[
            {"type": "fvTenant", "attributes": {"dn": "uni/tn-A"}},
            {"two": {}, "keys": {}},
            "not an object",
            42
        ]"#;
        let records = parse_export(payload, "JSON").expect("parse");
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn coerces_scalar_attributes() {
        let payload = r#"{"imdata": [
            {"type": "fabricNode", "attributes": {"id": 101, "fabricSt": true, "extra": ["x"]}}
        ]}"#;
        let records = parse_export(payload, "json").expect("parse");
        assert_eq!(records[0].attr("id"), Some("101"));
        assert_eq!(records[0].attr("fabricSt"), Some("true"));
        assert_eq!(records[0].attr("extra"), None);
    }

    #[test]
    fn unsupported_format_is_fatal() {
        let err = parse_export("<objects/>", "xml").expect_err("must fail");
        assert!(matches!(err, IngestError::UnsupportedFormat(_)));
    }

    #[test]
    fn malformed_json_is_fatal() {
        let err = parse_export("{not json", "json").expect_err("must fail");
        assert!(matches!(err, IngestError::MalformedPayload(_)));
    }

    #[test]
    fn object_without_imdata_yields_no_records() {
        let records = parse_export(r#"{"totalCount": "0"}"#, "json").expect("parse");
        assert!(records.is_empty());
    }
}
