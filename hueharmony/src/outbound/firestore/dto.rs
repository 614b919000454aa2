//! Firestore document bodies and typed-value conversion.
//!
//! Firestore wraps every field in a typed value (`{"stringValue": ".."}`,
//! `{"arrayValue": {"values": [..]}}`). Records are converted to and from
//! plain JSON objects here so the domain types keep their own serde shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Fields stored as `timestampValue` rather than `stringValue`.
const TIMESTAMP_FIELDS: &[&str] = &["createdAt"];

#[derive(Debug, Serialize)]
pub(super) struct DocumentWrite {
    pub(super) fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Document {
    pub(super) name: String,
    #[serde(default)]
    pub(super) fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ListDocumentsResponse {
    #[serde(default)]
    pub(super) documents: Vec<Document>,
    pub(super) next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelope {
    pub(super) error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    #[serde(default)]
    pub(super) status: String,
    #[serde(default)]
    pub(super) message: String,
}

impl Document {
    /// Last path segment of `projects/../documents/users/{uid}/palettes/{id}`.
    pub(super) fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }

    /// Decode the typed fields into a plain JSON object with an `id` entry.
    pub(super) fn into_record(self) -> Result<Value, String> {
        let id = self.id().to_owned();
        let mut record = Map::with_capacity(self.fields.len() + 1);
        for (key, typed) in self.fields {
            let plain = decode_value(&typed).map_err(|error| format!("field {key}: {error}"))?;
            record.insert(key, plain);
        }
        record.insert("id".to_owned(), Value::String(id));
        Ok(Value::Object(record))
    }
}

impl DocumentWrite {
    /// Encode a record serialised as a JSON object.
    pub(super) fn from_record(record: &Value) -> Result<Self, String> {
        let Value::Object(object) = record else {
            return Err("record must serialise to a JSON object".to_owned());
        };
        let fields = object
            .iter()
            .map(|(key, value)| {
                let typed = if TIMESTAMP_FIELDS.contains(&key.as_str()) {
                    value
                        .as_str()
                        .map(|stamp| json!({ "timestampValue": stamp }))
                        .ok_or_else(|| format!("field {key} must be an RFC 3339 string"))?
                } else {
                    encode_value(value)
                };
                Ok((key.clone(), typed))
            })
            .collect::<Result<Map<_, _>, String>>()?;
        Ok(Self { fields })
    }
}

fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(flag) => json!({ "booleanValue": flag }),
        Value::Number(number) if number.is_i64() || number.is_u64() => {
            json!({ "integerValue": number.to_string() })
        }
        Value::Number(number) => json!({ "doubleValue": number }),
        Value::String(text) => json!({ "stringValue": text }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(entries) => {
            let fields: Map<String, Value> = entries
                .iter()
                .map(|(key, item)| (key.clone(), encode_value(item)))
                .collect();
            json!({ "mapValue": { "fields": fields } })
        }
    }
}

fn decode_value(typed: &Value) -> Result<Value, String> {
    let Some((kind, inner)) = typed.as_object().and_then(|object| object.iter().next()) else {
        return Err("typed value must be a single-entry object".to_owned());
    };
    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" | "doubleValue" | "stringValue" | "timestampValue" => Ok(inner.clone()),
        "integerValue" => inner
            .as_str()
            .and_then(|digits| digits.parse::<i64>().ok())
            .map(Value::from)
            .ok_or_else(|| "integerValue must be a decimal string".to_owned()),
        "arrayValue" => inner
            .get("values")
            .and_then(Value::as_array)
            .map_or_else(|| Ok(Vec::new()), |values| values.iter().map(decode_value).collect())
            .map(Value::Array),
        "mapValue" => {
            let empty = Map::new();
            let fields = inner
                .get("fields")
                .and_then(Value::as_object)
                .unwrap_or(&empty);
            fields
                .iter()
                .map(|(key, item)| Ok((key.clone(), decode_value(item)?)))
                .collect::<Result<Map<_, _>, String>>()
                .map(Value::Object)
        }
        other => Err(format!("unsupported value type {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_json_snapshot;

    #[test]
    fn palette_records_encode_to_typed_fields() {
        let record = json!({
            "colors": ["#000000", "#ffffff"],
            "metadata": { "baseColor": "#3498db", "scheme": "triadic" },
            "createdAt": "2026-03-01T12:00:00Z"
        });

        let write = DocumentWrite::from_record(&record).expect("encodes");

        assert_json_snapshot!(write, @r###"
        {
          "fields": {
            "colors": {
              "arrayValue": {
                "values": [
                  {
                    "stringValue": "#000000"
                  },
                  {
                    "stringValue": "#ffffff"
                  }
                ]
              }
            },
            "createdAt": {
              "timestampValue": "2026-03-01T12:00:00Z"
            },
            "metadata": {
              "mapValue": {
                "fields": {
                  "baseColor": {
                    "stringValue": "#3498db"
                  },
                  "scheme": {
                    "stringValue": "triadic"
                  }
                }
              }
            }
          }
        }
        "###);
    }

    #[test]
    fn documents_decode_with_their_id() {
        let document: Document = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/users/u1/fonts/abc123",
            "fields": {
                "fontFamily": { "stringValue": "Open Sans" },
                "createdAt": { "timestampValue": "2026-03-01T12:00:00.250Z" }
            },
            "createTime": "2026-03-01T12:00:00.250Z"
        }))
        .expect("document decodes");

        let record = document.into_record().expect("fields decode");

        assert_eq!(
            record,
            json!({
                "id": "abc123",
                "fontFamily": "Open Sans",
                "createdAt": "2026-03-01T12:00:00.250Z"
            })
        );
    }

    #[test]
    fn rejects_unknown_value_types() {
        let error = decode_value(&json!({ "geoPointValue": { "latitude": 1.0 } }))
            .expect_err("unsupported");
        assert!(error.contains("geoPointValue"));
    }

    #[test]
    fn integers_round_trip_as_decimal_strings() {
        let typed = encode_value(&json!(5));
        assert_eq!(typed, json!({ "integerValue": "5" }));
        assert_eq!(decode_value(&typed), Ok(json!(5)));
    }
}
