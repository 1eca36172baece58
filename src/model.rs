//! The typed document model this crate builds before serializing to ARM JSON.
//!
//! `Element` is the parser's unit of output; `Value` is the coerced scalar/
//! composite tree every element's payload is made of.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// A coerced Bicep value. Mirrors the teacher's `BicepValue` shape, but keeps
/// objects in `indexmap::IndexMap` rather than `HashMap` so serialized output
/// preserves source order.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    String(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

// Hand-written rather than derived: `serde_json`'s derive for an enum like
// this would tag variants (`{"String": "..."}`) instead of inlining them as
// plain JSON scalars/composites, the same reason the teacher hand-writes
// `Serialize for BicepValue`.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => items.serialize(serializer),
            Value::Object(map) => map.serialize(serializer),
        }
    }
}

/// A property bag, i.e. the body of a Resource or a nested object value.
pub type PropertyMap = IndexMap<String, Value>;

/// The set of decorator names this crate recognizes (§3). Anything else is
/// dropped by the lexer before it ever reaches a `DecoratorSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecoratorName {
    Secure,
    Description,
    Allowed,
    MaxLength,
    MinLength,
    MaxValue,
    MinValue,
}

impl DecoratorName {
    /// Resolves a decorator's bare name (with any `sys.` prefix already
    /// stripped by the lexer) to a recognized kind.
    pub fn recognize(name: &str) -> Option<Self> {
        match name {
            "secure" => Some(Self::Secure),
            "description" => Some(Self::Description),
            "allowed" => Some(Self::Allowed),
            "maxLength" => Some(Self::MaxLength),
            "minLength" => Some(Self::MinLength),
            "maxValue" => Some(Self::MaxValue),
            "minValue" => Some(Self::MinValue),
            _ => None,
        }
    }
}

/// Decorator state accumulated above a declaration, consumed (and reset) the
/// moment that declaration attaches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecoratorSet {
    pub secure: bool,
    pub description: Option<String>,
    pub allowed: Option<Vec<Value>>,
    pub max_length: Option<String>,
    pub min_length: Option<String>,
    pub max_value: Option<String>,
    pub min_value: Option<String>,
}

impl DecoratorSet {
    pub fn is_empty(&self) -> bool {
        *self == DecoratorSet::default()
    }
}

/// One top-level Bicep declaration, as produced by the block parser and
/// consumed by the ARM serializer.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    TargetScope {
        value: String,
    },
    Metadata {
        name: String,
        description: String,
    },
    Param {
        name: String,
        type_name: String,
        default_value: Value,
        decorators: DecoratorSet,
    },
    Variable {
        name: String,
        is_array: bool,
        value: Option<Value>,
        properties: Option<PropertyMap>,
    },
    Resource {
        type_name: String,
        api_version: String,
        properties: PropertyMap,
        decorators: DecoratorSet,
    },
    Output {
        name: String,
        type_name: String,
        value: Value,
        decorators: DecoratorSet,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_object_preserves_insertion_order() {
        let mut map = IndexMap::new();
        map.insert("b".to_string(), Value::Int(1));
        map.insert("a".to_string(), Value::Int(2));
        let value = Value::Object(map);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"b":1,"a":2}"#);
    }

    #[test]
    fn decorator_name_recognizes_sys_stripped_names() {
        assert_eq!(DecoratorName::recognize("secure"), Some(DecoratorName::Secure));
        assert_eq!(DecoratorName::recognize("minValue"), Some(DecoratorName::MinValue));
        assert_eq!(DecoratorName::recognize("export"), None);
    }

    #[test]
    fn decorator_set_default_is_empty() {
        assert!(DecoratorSet::default().is_empty());
    }
}
