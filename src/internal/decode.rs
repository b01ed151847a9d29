//! Schema-directed decoding of raw JSON into [`Model`]s.
//!
//! Fields are visited in declaration order, so the first mismatch reported
//! for a given input is always the same one. Decoding never logs and never
//! touches anything but its inputs.

use std::borrow::Cow;

use serde_json::Value as Json;

use super::schema::{FieldType, Model, Record, Schema, Value};
use crate::error::DecodeError;

const ROOT: &str = "$";

/// Decoder with its coercion policy.
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    embedded_json: bool,
}

impl Default for Decoder {
    fn default() -> Self {
        Self {
            embedded_json: true,
        }
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// When enabled, a nested-schema or list field holding a JSON string is
    /// parsed as JSON text before decoding. When disabled that input is a
    /// mismatch.
    pub fn with_embedded_json(mut self, enabled: bool) -> Self {
        self.embedded_json = enabled;
        self
    }

    pub fn embedded_json(&self) -> bool {
        self.embedded_json
    }

    pub fn decode(&self, schema: &'static Schema, raw: &Json) -> Result<Model, DecodeError> {
        self.decode_model(schema, raw, ROOT)
    }

    /// Decodes every element of a JSON array, preserving order.
    pub fn decode_many(
        &self,
        schema: &'static Schema,
        raw: &Json,
    ) -> Result<Vec<Model>, DecodeError> {
        let items = raw
            .as_array()
            .ok_or_else(|| DecodeError::mismatch(ROOT, "list", raw.clone()))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| self.decode_model(schema, item, &format!("{ROOT}[{i}]")))
            .collect()
    }

    pub fn decode_record<T: Record>(&self, raw: &Json) -> Result<T, DecodeError> {
        T::from_model(self.decode(T::schema(), raw)?)
    }

    pub fn decode_records<T: Record>(&self, raw: &Json) -> Result<Vec<T>, DecodeError> {
        self.decode_many(T::schema(), raw)?
            .into_iter()
            .map(T::from_model)
            .collect()
    }

    fn decode_model(
        &self,
        schema: &'static Schema,
        raw: &Json,
        path: &str,
    ) -> Result<Model, DecodeError> {
        let map = raw
            .as_object()
            .ok_or_else(|| DecodeError::mismatch(path, "object", raw.clone()))?;

        let mut values = Vec::with_capacity(schema.fields.len());
        for field in schema.fields {
            let value = match map.get(field.name) {
                None | Some(Json::Null) => Value::Null,
                Some(raw) => {
                    let field_path = format!("{path}.{}", field.name);
                    self.decode_value(&field.field_type(), raw, &field_path)?
                }
            };
            values.push(value);
        }
        Ok(Model::from_parts(schema, values))
    }

    fn decode_value(&self, ty: &FieldType, raw: &Json, path: &str) -> Result<Value, DecodeError> {
        match ty {
            FieldType::List(inner) => {
                let raw = self.unwrap_embedded(raw, path)?;
                let items = raw
                    .as_array()
                    .ok_or_else(|| DecodeError::mismatch(path, "list", raw.clone().into_owned()))?;
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.decode_value(inner, item, &format!("{path}[{i}]")))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::List)
            }
            FieldType::Nested(schema) => {
                let raw = self.unwrap_embedded(raw, path)?;
                self.decode_model(*schema, &raw, path).map(Value::Model)
            }
            primitive => coerce(primitive, raw, path),
        }
    }

    fn unwrap_embedded<'a>(
        &self,
        raw: &'a Json,
        path: &str,
    ) -> Result<Cow<'a, Json>, DecodeError> {
        match raw {
            Json::String(text) if self.embedded_json => serde_json::from_str(text)
                .map(Cow::Owned)
                .map_err(|source| DecodeError::EmbeddedJson {
                    path: path.to_string(),
                    source,
                }),
            _ => Ok(Cow::Borrowed(raw)),
        }
    }
}

/// Primitive assignment. Strings accept numbers (stringified); nothing else
/// is converted.
fn coerce(ty: &FieldType, raw: &Json, path: &str) -> Result<Value, DecodeError> {
    let value = match (ty, raw) {
        (FieldType::String, Json::String(s)) => Some(Value::String(s.clone())),
        (FieldType::String, Json::Number(n)) => Some(Value::String(n.to_string())),
        (FieldType::Integer, Json::Number(n)) => n.as_i64().map(Value::Integer),
        (FieldType::Float, Json::Number(n)) => n.as_f64().map(Value::Float),
        (FieldType::Boolean, Json::Bool(b)) => Some(Value::Boolean(*b)),
        _ => None,
    };
    value.ok_or_else(|| DecodeError::mismatch(path, ty.describe(), raw.clone()))
}

/// Decodes with the default policy.
pub fn decode(schema: &'static Schema, raw: &Json) -> Result<Model, DecodeError> {
    Decoder::default().decode(schema, raw)
}

/// Decodes a JSON array with the default policy.
pub fn decode_many(schema: &'static Schema, raw: &Json) -> Result<Vec<Model>, DecodeError> {
    Decoder::default().decode_many(schema, raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::schema::{Field, FieldKind};
    use serde_json::json;

    static TAG: Schema = Schema {
        name: "Tag",
        fields: &[Field {
            name: "name",
            kind: <String as FieldKind>::field_type,
        }],
    };

    fn tag_type() -> FieldType {
        FieldType::Nested(&TAG)
    }

    fn tag_list_type() -> FieldType {
        FieldType::List(Box::new(tag_type()))
    }

    static ITEM: Schema = Schema {
        name: "Item",
        fields: &[
            Field {
                name: "id",
                kind: <i64 as FieldKind>::field_type,
            },
            Field {
                name: "title",
                kind: <String as FieldKind>::field_type,
            },
            Field {
                name: "score",
                kind: <f64 as FieldKind>::field_type,
            },
            Field {
                name: "open",
                kind: <bool as FieldKind>::field_type,
            },
            Field {
                name: "kids",
                kind: <Vec<i64> as FieldKind>::field_type,
            },
            Field {
                name: "tag",
                kind: tag_type,
            },
            Field {
                name: "tags",
                kind: tag_list_type,
            },
        ],
    };

    fn full_item() -> Json {
        json!({
            "id": 7,
            "title": "hello",
            "score": 1.5,
            "open": true,
            "kids": [1, 2],
            "tag": {"name": "rust"},
            "tags": [{"name": "a"}, {"name": "b"}],
        })
    }

    #[test]
    fn decodes_every_declared_field() {
        let model = decode(&ITEM, &full_item()).unwrap();
        assert_eq!(model.get("id"), Some(&Value::Integer(7)));
        assert_eq!(model.get("score"), Some(&Value::Float(1.5)));
        assert_eq!(
            model.get("kids"),
            Some(&Value::List(vec![Value::Integer(1), Value::Integer(2)]))
        );
        match model.get("tags") {
            Some(Value::List(tags)) => assert_eq!(tags.len(), 2),
            other => panic!("unexpected tags value: {other:?}"),
        }
    }

    #[test]
    fn missing_and_null_keys_are_empty() {
        let model = decode(&ITEM, &json!({"id": 1, "title": null})).unwrap();
        assert_eq!(model.get("title"), Some(&Value::Null));
        assert_eq!(model.get("tag"), Some(&Value::Null));
        assert_eq!(model.get("kids"), Some(&Value::Null));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut raw = full_item();
        raw["extra"] = json!({"anything": [1, 2, 3]});
        assert_eq!(decode(&ITEM, &raw).unwrap(), decode(&ITEM, &full_item()).unwrap());
    }

    #[test]
    fn numbers_stringify_into_string_fields() {
        let model = decode(&ITEM, &json!({"title": 42})).unwrap();
        assert_eq!(model.get("title"), Some(&Value::String("42".to_string())));
    }

    #[test]
    fn integer_field_rejects_numeric_string() {
        let err = decode(&ITEM, &json!({"id": "12"})).unwrap_err();
        assert_eq!(err.path(), Some("$.id"));
        assert!(matches!(err, DecodeError::Mismatch { expected: "integer", .. }));
    }

    #[test]
    fn integer_field_rejects_fraction() {
        assert!(decode(&ITEM, &json!({"id": 1.25})).is_err());
    }

    #[test]
    fn float_field_accepts_integer_literal() {
        let model = decode(&ITEM, &json!({"score": 3})).unwrap();
        assert_eq!(model.get("score"), Some(&Value::Float(3.0)));
    }

    #[test]
    fn list_element_failure_names_index() {
        let err = decode(&ITEM, &json!({"kids": [1, "two", 3]})).unwrap_err();
        match err {
            DecodeError::Mismatch { path, found, .. } => {
                assert_eq!(path, "$.kids[1]");
                assert_eq!(found, json!("two"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn nested_failure_names_full_path() {
        let err = decode(&ITEM, &json!({"tags": [{"name": "a"}, {"name": true}]})).unwrap_err();
        assert_eq!(err.path(), Some("$.tags[1].name"));
    }

    #[test]
    fn non_list_for_list_field_is_error() {
        let err = decode(&ITEM, &json!({"tags": {"name": "a"}})).unwrap_err();
        assert_eq!(err.path(), Some("$.tags"));
    }

    #[test]
    fn non_object_for_nested_field_is_error() {
        let err = decode(&ITEM, &json!({"tag": 5})).unwrap_err();
        assert!(matches!(err, DecodeError::Mismatch { expected: "object", .. }));
    }

    #[test]
    fn first_error_in_declaration_order_wins() {
        let raw = json!({"tags": 1, "open": "yes", "id": "x"});
        assert_eq!(decode(&ITEM, &raw).unwrap_err().path(), Some("$.id"));
    }

    #[test]
    fn embedded_json_string_is_parsed_by_default() {
        let raw = json!({"tag": r#"{"name": "inline"}"#, "kids": "[4, 5]"});
        let model = decode(&ITEM, &raw).unwrap();
        assert_eq!(
            model.get("kids"),
            Some(&Value::List(vec![Value::Integer(4), Value::Integer(5)]))
        );
        match model.get("tag") {
            Some(Value::Model(tag)) => {
                assert_eq!(tag.get("name"), Some(&Value::String("inline".to_string())))
            }
            other => panic!("unexpected tag value: {other:?}"),
        }
    }

    #[test]
    fn embedded_json_disabled_rejects_strings() {
        let raw = json!({"tag": r#"{"name": "inline"}"#});
        let err = Decoder::new()
            .with_embedded_json(false)
            .decode(&ITEM, &raw)
            .unwrap_err();
        assert!(matches!(err, DecodeError::Mismatch { expected: "object", .. }));
    }

    #[test]
    fn malformed_embedded_json_is_error() {
        let err = decode(&ITEM, &json!({"tag": "{not json"})).unwrap_err();
        assert!(matches!(err, DecodeError::EmbeddedJson { .. }));
        assert_eq!(err.path(), Some("$.tag"));
    }

    #[test]
    fn decode_many_preserves_order() {
        let raw = json!([{"id": 3}, {"id": 1}, {"id": 2}]);
        let ids: Vec<_> = decode_many(&ITEM, &raw)
            .unwrap()
            .iter()
            .map(|m| m.get("id").cloned())
            .collect();
        assert_eq!(
            ids,
            vec![
                Some(Value::Integer(3)),
                Some(Value::Integer(1)),
                Some(Value::Integer(2))
            ]
        );
    }

    #[test]
    fn decode_many_empty_and_non_list() {
        assert!(decode_many(&ITEM, &json!([])).unwrap().is_empty());
        assert!(decode_many(&ITEM, &json!({"id": 1})).is_err());
        assert_eq!(
            decode_many(&ITEM, &json!([{"id": 1}, 2])).unwrap_err().path(),
            Some("$[1]")
        );
    }

    #[test]
    fn top_level_must_be_object() {
        let err = decode(&ITEM, &json!([1, 2])).unwrap_err();
        assert_eq!(err.path(), Some("$"));
    }

    #[test]
    fn serialize_round_trip() {
        let model = decode(&ITEM, &full_item()).unwrap();
        assert_eq!(model.to_json(), full_item());
        assert_eq!(decode(&ITEM, &model.to_json()).unwrap(), model);
    }
}
