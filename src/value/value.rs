//! Dynamic document values.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeMap;

use crate::introspect::{Diffable, Lineage, Shape};

/// Value represents a JSON/YAML value that can be any of the supported types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(Map),
}

/// Map represents a key-value map where keys are strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Map {
    pub fields: BTreeMap<String, Value>,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Short name of the variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

impl Map {
    pub fn new() -> Self {
        Map {
            fields: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

impl FromIterator<(String, Value)> for Map {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Map {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Scalars classify as their inner Rust type, so `Value::Int(3)` and `3_i64`
/// compare equal; lists and maps are walked like any other container.
impl Diffable for Value {
    fn shape(&self) -> Shape<'_> {
        match self {
            Value::Null => Shape::Absent,
            Value::Bool(b) => Shape::Terminal(b),
            Value::Int(i) => Shape::Terminal(i),
            Value::Float(f) => Shape::Terminal(f),
            Value::String(s) => Shape::Terminal(s),
            Value::List(items) => {
                Shape::Sequence(items.iter().map(|v| v as &dyn Diffable).collect())
            }
            Value::Map(map) => Shape::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), v as &dyn Diffable))
                    .collect(),
            ),
        }
    }

    fn as_any(&self) -> &dyn Any {
        match self {
            Value::Bool(b) => b,
            Value::Int(i) => i,
            Value::Float(f) => f,
            Value::String(s) => s,
            Value::Null | Value::List(_) | Value::Map(_) => self,
        }
    }

    fn lineage(&self) -> Lineage {
        match self {
            Value::Null => Lineage::unknown(),
            Value::Bool(_) => Lineage::of::<bool>(),
            Value::Int(_) => Lineage::of::<i64>(),
            Value::Float(_) => Lineage::of::<f64>(),
            Value::String(_) => Lineage::of::<String>(),
            Value::List(_) | Value::Map(_) => Lineage::of::<Value>(),
        }
    }

    fn describe(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            other => to_json(other).unwrap_or_else(|_| format!("{:?}", other)),
        }
    }
}

/// Parse a value from JSON.
pub fn from_json(json: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(json)
}

/// Serialize a value to JSON.
pub fn to_json(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// Parse a value from YAML. JSON documents are accepted too.
pub fn from_yaml(yaml: &str) -> Result<Value, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

/// Serialize a value to YAML.
pub fn to_yaml(value: &Value) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_equality() {
        assert_eq!(Value::Null, Value::Null);
        assert_eq!(Value::Bool(true), Value::Bool(true));
        assert_ne!(Value::Bool(true), Value::Bool(false));
        assert_eq!(Value::Int(42), Value::Int(42));
        assert_eq!(Value::String("hello".into()), Value::String("hello".into()));
    }

    #[test]
    fn test_map_operations() {
        let mut map = Map::new();
        assert!(map.is_empty());

        map.set("key", Value::String("value".into()));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("key"), Some(&Value::String("value".into())));
    }

    #[test]
    fn test_json_and_yaml_parse_alike() {
        let json = from_json(r#"{"name":"test","count":42,"tags":["a","b"]}"#).unwrap();
        let yaml = from_yaml("name: test\ncount: 42\ntags: [a, b]\n").unwrap();
        assert_eq!(json, yaml);
        assert_eq!(json.as_map().unwrap().get("count").and_then(Value::as_int), Some(42));
    }

    #[test]
    fn test_value_shapes() {
        assert!(Value::Null.shape().is_absent());
        assert!(matches!(Value::Int(1).shape(), Shape::Terminal(_)));
        assert!(matches!(Value::List(vec![]).shape(), Shape::Sequence(_)));
        assert!(matches!(Value::Map(Map::new()).shape(), Shape::Map(_)));
    }

    #[test]
    fn test_scalars_expose_inner_type() {
        let v = Value::Int(7);
        assert_eq!(v.as_any().downcast_ref::<i64>(), Some(&7));
        assert_eq!(v.lineage(), Lineage::of::<i64>());
        assert_eq!(Value::List(vec![]).lineage(), Lineage::of::<Value>());
    }

    #[test]
    fn test_describe() {
        assert_eq!(Value::String("AAA".into()).describe(), "AAA");
        assert_eq!(Value::Int(3).describe(), "3");
        let list = from_json("[1,2]").unwrap();
        assert_eq!(list.describe(), "[1,2]");
    }
}
