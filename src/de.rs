//! Decoding JSON values into typed records.
//!
//! Records list their fields with `from_json!`, naming the key each field is
//! read from and how an absent key is treated.  Nested records, sequences and
//! enums all go through [`FromJson`], so decoding recurses into whatever shape
//! the field declares.

use std::str::FromStr;

use anyhow::Context;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum DecodeError {
    #[error("Missing field {field:?} in {record}")]
    MissingField {
        record: &'static str,
        field: &'static str,
    },
    #[error("Invalid value for {kind}: {value}")]
    InvalidEnumValue { kind: &'static str, value: String },
    #[error("Expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

pub trait FromJson: Sized {
    fn from_json(value: &Value) -> Result<Self, DecodeError>;

    /// The value a present-but-null key stands for, if the type has an empty form.
    fn from_null() -> Option<Self> {
        None
    }
}

pub fn decode<T: FromJson>(value: &Value) -> Result<T, DecodeError> {
    T::from_json(value)
}

pub fn decode_str<T: FromJson>(s: &str) -> anyhow::Result<T> {
    let value: Value = serde_json::from_str(s).context("The input is not valid JSON")?;
    decode(&value).with_context(|| format!("While decoding as {}", std::any::type_name::<T>()))
}

/// The fields of one JSON object, read on behalf of the record `record`.
pub struct Fields<'a> {
    record: &'static str,
    object: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn new(record: &'static str, value: &'a Value) -> Result<Self, DecodeError> {
        match value {
            Value::Object(object) => Ok(Self { record, object }),
            _ => Err(mismatch("object", value)),
        }
    }

    /// Absent keys are an error.  A null counts as absent unless `T` has an empty form.
    pub fn required<T: FromJson>(&self, key: &'static str) -> Result<T, DecodeError> {
        let missing = || DecodeError::MissingField {
            record: self.record,
            field: key,
        };
        match self.object.get(key) {
            None => Err(missing()),
            Some(Value::Null) => T::from_null().ok_or_else(missing),
            Some(value) => T::from_json(value),
        }
    }

    pub fn optional<T: FromJson>(&self, key: &'static str) -> Result<Option<T>, DecodeError> {
        match self.object.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::from_json(value).map(Some),
        }
    }

    pub fn or_default<T: FromJson + Default>(&self, key: &'static str) -> Result<T, DecodeError> {
        Ok(self.optional(key)?.unwrap_or_default())
    }
}

pub fn parse_enum<E: FromStr>(kind: &'static str, value: &Value) -> Result<E, DecodeError> {
    match value {
        Value::String(s) => parse_enum_str(kind, s),
        _ => Err(DecodeError::InvalidEnumValue {
            kind,
            value: value.to_string(),
        }),
    }
}

pub fn parse_enum_str<E: FromStr>(kind: &'static str, s: &str) -> Result<E, DecodeError> {
    s.parse().map_err(|_| DecodeError::InvalidEnumValue {
        kind,
        value: format!("{s:?}"),
    })
}

pub(crate) fn mismatch(expected: &'static str, found: &Value) -> DecodeError {
    let found = match found {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    DecodeError::TypeMismatch { expected, found }
}

impl FromJson for String {
    fn from_json(value: &Value) -> Result<Self, DecodeError> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| mismatch("string", value))
    }
}

impl FromJson for bool {
    fn from_json(value: &Value) -> Result<Self, DecodeError> {
        value.as_bool().ok_or_else(|| mismatch("boolean", value))
    }
}

impl FromJson for f64 {
    fn from_json(value: &Value) -> Result<Self, DecodeError> {
        value.as_f64().ok_or_else(|| mismatch("number", value))
    }
}

macro_rules! integer_from_json {
    ($($t: ty),*) => {
        $(
            impl FromJson for $t {
                fn from_json(value: &Value) -> Result<Self, DecodeError> {
                    value
                        .as_i64()
                        .and_then(|v| <$t>::try_from(v).ok())
                        .or_else(|| value.as_u64().and_then(|v| <$t>::try_from(v).ok()))
                        .ok_or_else(|| mismatch(stringify!($t), value))
                }
            }
        )*
    };
}
integer_from_json!(u8, u16, u32, u64, i32, i64);

impl<T: FromJson> FromJson for Vec<T> {
    fn from_json(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Array(items) => items.iter().map(T::from_json).collect(),
            _ => Err(mismatch("array", value)),
        }
    }

    fn from_null() -> Option<Self> {
        Some(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use strum::EnumString;

    use super::{decode, decode_str, DecodeError, FromJson};

    #[derive(Clone, Copy, PartialEq, Eq, Debug, EnumString)]
    #[strum(serialize_all = "snake_case")]
    enum Color {
        Red,
        Green,
    }
    json_enum!(Color);

    #[derive(PartialEq, Debug)]
    struct Leaf {
        name: String,
        weight: u32,
    }
    from_json!(Leaf {
        name: required("name"),
        weight: required("weight"),
    });

    #[derive(PartialEq, Debug)]
    struct Tree {
        id: u32,
        kind: String,
        color: Option<Color>,
        colors: Vec<Color>,
        root: Option<Leaf>,
        leaves: Vec<Leaf>,
        note: Option<String>,
        hidden: bool,
    }
    from_json!(Tree {
        id: required("id"),
        kind: required("type"),
        color: optional("color"),
        colors: or_default("colors"),
        root: optional("root"),
        leaves: required("leaves"),
        note: optional("note"),
        hidden: or_default("hidden"),
    });

    #[test]
    fn nested_records_and_sequences() {
        let tree: Tree = decode(&json!({
            "id": 3,
            "type": "oak",
            "color": "green",
            "colors": ["red", "green", "red"],
            "root": { "name": "r", "weight": 10 },
            "leaves": [
                { "name": "a", "weight": 1 },
                { "name": "b", "weight": 2 },
            ],
            "note": "tall",
            "hidden": true,
        }))
        .unwrap();
        assert_eq!(tree.id, 3);
        assert_eq!(tree.kind, "oak");
        assert_eq!(tree.color, Some(Color::Green));
        assert_eq!(tree.colors, [Color::Red, Color::Green, Color::Red]);
        assert_eq!(
            tree.root,
            Some(Leaf {
                name: "r".to_owned(),
                weight: 10
            })
        );
        assert_eq!(
            tree.leaves.iter().map(|x| x.name.as_str()).collect::<Vec<_>>(),
            ["a", "b"]
        );
        assert_eq!(tree.note.as_deref(), Some("tall"));
        assert!(tree.hidden);
    }

    #[test]
    fn null_is_absent_for_every_shape() {
        let tree: Tree = decode(&json!({
            "id": 3,
            "type": "oak",
            "color": null,
            "colors": null,
            "root": null,
            "leaves": null,
            "note": null,
            "hidden": null,
        }))
        .unwrap();
        assert_eq!(tree.color, None);
        assert!(tree.colors.is_empty());
        assert_eq!(tree.root, None);
        assert!(tree.leaves.is_empty());
        assert_eq!(tree.note, None);
        assert!(!tree.hidden);
    }

    #[test]
    fn absent_keys_use_defaults() {
        let tree: Tree = decode(&json!({ "id": 1, "type": "elm", "leaves": [] })).unwrap();
        assert_eq!(tree.color, None);
        assert!(tree.colors.is_empty());
        assert_eq!(tree.note, None);
        assert!(!tree.hidden);
    }

    #[test]
    fn missing_required_field_fails() {
        let res = decode::<Tree>(&json!({ "id": 1, "leaves": [] }));
        assert_eq!(
            res,
            Err(DecodeError::MissingField {
                record: "Tree",
                field: "type"
            })
        );

        // Null on a scalar without an empty form counts as missing
        let res = decode::<Leaf>(&json!({ "name": null, "weight": 1 }));
        assert_eq!(
            res,
            Err(DecodeError::MissingField {
                record: "Leaf",
                field: "name"
            })
        );

        // The error surfaces from nested records too
        let res = decode::<Tree>(&json!({
            "id": 1,
            "type": "elm",
            "leaves": [{ "name": "a", "weight": 1 }, { "name": "b" }],
        }));
        assert_eq!(
            res,
            Err(DecodeError::MissingField {
                record: "Leaf",
                field: "weight"
            })
        );
    }

    #[test]
    fn invalid_enum_value_fails() {
        let res = decode::<Tree>(&json!({
            "id": 1,
            "type": "elm",
            "color": "blue",
            "leaves": [],
        }));
        assert_eq!(
            res,
            Err(DecodeError::InvalidEnumValue {
                kind: "Color",
                value: "\"blue\"".to_owned()
            })
        );
        assert!(matches!(
            decode::<Vec<Color>>(&json!(["red", 1])),
            Err(DecodeError::InvalidEnumValue { kind: "Color", .. })
        ));
    }

    #[test]
    fn scalars_are_type_checked() {
        assert_eq!(
            decode::<Leaf>(&json!({ "name": "a", "weight": "heavy" })),
            Err(DecodeError::TypeMismatch {
                expected: "u32",
                found: "string"
            })
        );
        assert_eq!(
            decode::<Leaf>(&json!({ "name": "a", "weight": -1 })),
            Err(DecodeError::TypeMismatch {
                expected: "u32",
                found: "number"
            })
        );
        assert_eq!(
            decode::<Leaf>(&json!(["a", 1])),
            Err(DecodeError::TypeMismatch {
                expected: "object",
                found: "array"
            })
        );
        assert_eq!(decode::<f64>(&json!(13)), Ok(13.0));
        assert_eq!(decode::<i32>(&json!(-5)), Ok(-5));
    }

    #[test]
    fn sequence_keeps_length_and_order() {
        let value = json!((0..50)
            .map(|i| json!({ "name": format!("leaf{i}"), "weight": i }))
            .collect::<Vec<_>>());
        let leaves: Vec<Leaf> = decode(&value).unwrap();
        assert_eq!(leaves.len(), 50);
        for (i, leaf) in leaves.iter().enumerate() {
            assert_eq!(leaf.weight, i as u32);
            assert_eq!(leaf.name, format!("leaf{i}"));
        }
        assert_eq!(decode::<Vec<Leaf>>(&json!([])), Ok(vec![]));
        assert_eq!(Vec::<Leaf>::from_null(), Some(vec![]));
    }

    #[test]
    fn decode_from_text() {
        let leaf: Leaf = decode_str(r#"{"name": "x", "weight": 7}"#).unwrap();
        assert_eq!(leaf.weight, 7);
        assert!(decode_str::<Leaf>("{").is_err());
        assert!(decode_str::<Leaf>(r#"{"name": "x"}"#).is_err());
    }
}
