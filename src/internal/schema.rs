//! Static schema descriptions and the dynamic values they decode into.
//!
//! A [`Schema`] is an ordered list of `(field name, field type)` pairs that
//! lives in a `static`. The decoder walks a schema against raw JSON and
//! produces a [`Model`]: one [`Value`] per declared field, in declaration
//! order. Typed records (see `record!`) convert to and from models through
//! [`Record`] and [`FieldKind`].

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value as Json;

use crate::error::DecodeError;

/// Declared semantic type of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    String,
    Integer,
    Boolean,
    Float,
    Nested(&'static Schema),
    List(Box<FieldType>),
}

impl FieldType {
    /// Short name used in decode error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Float => "float",
            Self::Nested(_) => "object",
            Self::List(_) => "list",
        }
    }
}

/// One field declaration. The type is produced lazily through a function
/// pointer so schemas can refer to each other from `static` items.
#[derive(Debug)]
pub struct Field {
    pub name: &'static str,
    pub(crate) kind: fn() -> FieldType,
}

impl Field {
    pub fn field_type(&self) -> FieldType {
        (self.kind)()
    }
}

#[derive(Debug)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }
}

// Schemas are statics; identity is the address, with the name as a fallback
// for copies built in tests.
impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || self.name == other.name
    }
}

/// A decoded field value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    String(String),
    Integer(i64),
    Boolean(bool),
    Float(f64),
    Model(Model),
    List(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Plain JSON form, recursively unwrapping models and lists.
    pub fn to_json(&self) -> Json {
        match self {
            Self::Null => Json::Null,
            Self::String(s) => Json::String(s.clone()),
            Self::Integer(i) => Json::from(*i),
            Self::Boolean(b) => Json::Bool(*b),
            Self::Float(f) => serde_json::Number::from_f64(*f).map_or(Json::Null, Json::Number),
            Self::Model(m) => m.to_json(),
            Self::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::String(s) => serializer.serialize_str(s),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Model(m) => m.serialize(serializer),
            Self::List(items) => serializer.collect_seq(items),
        }
    }
}

/// An immutable record holding one value per field of its schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    schema: &'static Schema,
    values: Vec<Value>,
}

impl Model {
    /// `values` must line up with `schema.fields`; only the decoder and
    /// generated record conversions build models.
    pub(crate) fn from_parts(schema: &'static Schema, values: Vec<Value>) -> Self {
        debug_assert_eq!(schema.fields.len(), values.len());
        Self { schema, values }
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Value of a declared field; `None` only when the schema has no such field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema
            .fields
            .iter()
            .position(|f| f.name == name)
            .and_then(|i| self.values.get(i))
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
        self.schema.field_names().zip(self.values.iter())
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Plain mapping of field name to plain value.
    pub fn to_json(&self) -> Json {
        Json::Object(
            self.fields()
                .map(|(name, value)| (name.to_string(), value.to_json()))
                .collect(),
        )
    }
}

impl Serialize for Model {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.fields() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Rust types that can sit in a record field.
pub trait FieldKind: Sized {
    fn field_type() -> FieldType;

    /// Converts an already type-checked value. `Null` maps to `None`.
    fn from_value(value: Value, path: &str) -> Result<Option<Self>, DecodeError>;

    fn to_value(&self) -> Value;
}

/// A typed view over a schema, generated by `record!`.
pub trait Record: Sized {
    fn schema() -> &'static Schema;

    fn from_model(model: Model) -> Result<Self, DecodeError>;

    fn to_model(&self) -> Model;
}

macro_rules! primitive_kind {
    ($ty:ty, $variant:ident) => {
        impl FieldKind for $ty {
            fn field_type() -> FieldType {
                FieldType::$variant
            }

            fn from_value(value: Value, path: &str) -> Result<Option<Self>, DecodeError> {
                match value {
                    Value::Null => Ok(None),
                    Value::$variant(v) => Ok(Some(v)),
                    other => Err(DecodeError::mismatch(
                        path,
                        FieldType::$variant.describe(),
                        other.to_json(),
                    )),
                }
            }

            fn to_value(&self) -> Value {
                Value::$variant(self.clone())
            }
        }
    };
}

primitive_kind!(String, String);
primitive_kind!(i64, Integer);
primitive_kind!(bool, Boolean);
primitive_kind!(f64, Float);

impl<T: FieldKind> FieldKind for Vec<T> {
    fn field_type() -> FieldType {
        FieldType::List(Box::new(T::field_type()))
    }

    fn from_value(value: Value, path: &str) -> Result<Option<Self>, DecodeError> {
        let items = match value {
            Value::Null => return Ok(None),
            Value::List(items) => items,
            other => return Err(DecodeError::mismatch(path, "list", other.to_json())),
        };
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                let item_path = format!("{path}[{i}]");
                T::from_value(item, &item_path)?.ok_or_else(|| {
                    DecodeError::mismatch(item_path, T::field_type().describe(), Json::Null)
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(FieldKind::to_value).collect())
    }
}
