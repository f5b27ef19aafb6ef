//! Schema accumulation over the records seen during a read.

use crate::protocol::RecordMessage;
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub const SCHEMA_DIALECT: &str = "http://json-schema.org/schema#";

/// Collects record shapes while a read runs and reports a schema per stream.
pub trait SchemaAccumulator {
    fn accumulate(&mut self, record: &RecordMessage);

    fn stream_schema(&self, stream: &str) -> Option<Value>;
}

/// Structural JSON schema inference.
///
/// Types observed for the same location are unioned. `integer` folds into
/// `number` once both have been seen.
#[derive(Debug, Default)]
pub struct SchemaInferrer {
    streams: HashMap<String, SchemaNode>,
}

impl SchemaAccumulator for SchemaInferrer {
    fn accumulate(&mut self, record: &RecordMessage) {
        self.streams
            .entry(record.stream.clone())
            .or_default()
            .observe_object(&record.data);
    }

    fn stream_schema(&self, stream: &str) -> Option<Value> {
        let mut schema = self.streams.get(stream)?.to_schema();
        if let Value::Object(map) = &mut schema {
            map.insert("$schema".to_string(), json!(SCHEMA_DIALECT));
        }
        Some(schema)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum JsonType {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl JsonType {
    fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

#[derive(Debug, Default)]
struct SchemaNode {
    types: BTreeSet<JsonType>,
    properties: BTreeMap<String, SchemaNode>,
    items: Option<Box<SchemaNode>>,
}

impl SchemaNode {
    fn observe(&mut self, value: &Value) {
        match value {
            Value::Null => {
                self.types.insert(JsonType::Null);
            }
            Value::Bool(_) => {
                self.types.insert(JsonType::Boolean);
            }
            Value::Number(n) if n.is_i64() || n.is_u64() => {
                self.types.insert(JsonType::Integer);
            }
            Value::Number(_) => {
                self.types.insert(JsonType::Number);
            }
            Value::String(_) => {
                self.types.insert(JsonType::String);
            }
            Value::Array(items) => {
                self.types.insert(JsonType::Array);
                if !items.is_empty() {
                    let node = self.items.get_or_insert_with(Box::default);
                    for item in items {
                        node.observe(item);
                    }
                }
            }
            Value::Object(map) => self.observe_object(map),
        }
    }

    fn observe_object(&mut self, map: &Map<String, Value>) {
        self.types.insert(JsonType::Object);
        for (key, value) in map {
            self.properties.entry(key.clone()).or_default().observe(value);
        }
    }

    fn to_schema(&self) -> Value {
        let mut types: Vec<&str> = self
            .types
            .iter()
            .filter(|t| !(**t == JsonType::Integer && self.types.contains(&JsonType::Number)))
            .map(|t| t.as_str())
            .collect();

        let mut schema = Map::new();
        match types.len() {
            1 => {
                schema.insert("type".to_string(), json!(types.remove(0)));
            }
            _ => {
                schema.insert("type".to_string(), json!(types));
            }
        }

        if self.types.contains(&JsonType::Object) {
            let properties: Map<String, Value> = self
                .properties
                .iter()
                .map(|(key, node)| (key.clone(), node.to_schema()))
                .collect();
            schema.insert("properties".to_string(), Value::Object(properties));
        }

        if let Some(items) = &self.items {
            schema.insert("items".to_string(), items.to_schema());
        }

        Value::Object(schema)
    }
}
