/// Declares a typed record and its static [`Schema`](crate::internal::schema::Schema)
/// from a single field list.
///
/// ```ignore
/// record! {
///     /// A forum member.
///     pub struct User as USER {
///         id: i64,
///         username: String,
///         is_mobile: bool => "isMobile",
///     }
/// }
/// ```
///
/// Every field becomes `pub Option<T>`; `=> "key"` overrides the JSON key,
/// which otherwise is the field name. The macro emits the struct, the schema
/// `static`, and impls of `Record`, `FieldKind` and `serde::Serialize`.
macro_rules! record {
    (@key $field:ident $key:literal) => {
        $key
    };
    (@key $field:ident) => {
        stringify!($field)
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident as $schema:ident {
            $(
                $(#[$fmeta:meta])*
                $field:ident : $ty:ty $(=> $key:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Default)]
        $vis struct $name {
            $(
                $(#[$fmeta])*
                pub $field: Option<$ty>,
            )*
        }

        $vis static $schema: $crate::internal::schema::Schema = $crate::internal::schema::Schema {
            name: stringify!($name),
            fields: &[
                $(
                    $crate::internal::schema::Field {
                        name: record!(@key $field $($key)?),
                        kind: <$ty as $crate::internal::schema::FieldKind>::field_type,
                    },
                )*
            ],
        };

        impl $crate::internal::schema::Record for $name {
            fn schema() -> &'static $crate::internal::schema::Schema {
                &$schema
            }

            fn from_model(
                model: $crate::internal::schema::Model,
            ) -> Result<Self, $crate::error::DecodeError> {
                if model.schema() != &$schema {
                    return Err($crate::error::DecodeError::mismatch(
                        "$",
                        stringify!($name),
                        model.to_json(),
                    ));
                }
                let mut values = model.into_values().into_iter();
                Ok(Self {
                    $(
                        $field: <$ty as $crate::internal::schema::FieldKind>::from_value(
                            values.next().unwrap_or_default(),
                            record!(@key $field $($key)?),
                        )?,
                    )*
                })
            }

            fn to_model(&self) -> $crate::internal::schema::Model {
                $crate::internal::schema::Model::from_parts(
                    &$schema,
                    vec![
                        $(
                            self.$field.as_ref().map_or(
                                $crate::internal::schema::Value::Null,
                                $crate::internal::schema::FieldKind::to_value,
                            ),
                        )*
                    ],
                )
            }
        }

        impl $crate::internal::schema::FieldKind for $name {
            fn field_type() -> $crate::internal::schema::FieldType {
                $crate::internal::schema::FieldType::Nested(&$schema)
            }

            fn from_value(
                value: $crate::internal::schema::Value,
                path: &str,
            ) -> Result<Option<Self>, $crate::error::DecodeError> {
                match value {
                    $crate::internal::schema::Value::Null => Ok(None),
                    $crate::internal::schema::Value::Model(model) => {
                        <Self as $crate::internal::schema::Record>::from_model(model).map(Some)
                    }
                    other => Err($crate::error::DecodeError::mismatch(
                        path,
                        "object",
                        other.to_json(),
                    )),
                }
            }

            fn to_value(&self) -> $crate::internal::schema::Value {
                $crate::internal::schema::Value::Model(
                    <Self as $crate::internal::schema::Record>::to_model(self),
                )
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serde::Serialize::serialize(
                    &<Self as $crate::internal::schema::Record>::to_model(self),
                    serializer,
                )
            }
        }
    };
}
