/// Implements [`FromJson`](crate::de::FromJson) for a record from a field table.
///
/// Each entry reads `field: rule("key")`, where `rule` is one of the
/// [`Fields`](crate::de::Fields) accessors (`required`, `optional`, `or_default`)
/// and `key` is the JSON key, which may differ from the field name.
macro_rules! from_json {
    ($name: ident { $($field: ident: $rule: ident($key: literal)),* $(,)? }) => {
        impl $crate::de::FromJson for $name {
            fn from_json(
                value: &::serde_json::Value,
            ) -> ::std::result::Result<Self, $crate::de::DecodeError> {
                let fields = $crate::de::Fields::new(stringify!($name), value)?;
                Ok(Self {
                    $($field: fields.$rule($key)?,)*
                })
            }
        }
    };
}

/// Implements [`FromJson`](crate::de::FromJson) for an enum through its `FromStr`.
macro_rules! json_enum {
    ($($name: ident),* $(,)?) => {
        $(
            impl $crate::de::FromJson for $name {
                fn from_json(
                    value: &::serde_json::Value,
                ) -> ::std::result::Result<Self, $crate::de::DecodeError> {
                    $crate::de::parse_enum(stringify!($name), value)
                }
            }
        )*
    };
}
