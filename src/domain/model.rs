use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub type BinaryMap = BTreeMap<String, BinaryEntry>;

/// A byte blob stored as base64 text, labelled with its mime type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryPayload {
    pub data: String,
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Extra descriptive fields (file extension, size, ...) carried as-is.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl BinaryPayload {
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
            file_name: None,
            metadata: Map::new(),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

/// Binary entries nest by path segment; a payload is always a leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BinaryEntry {
    Payload(BinaryPayload),
    Group(BinaryMap),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "json", alias = "structured", default = "empty_object")]
    pub structured: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<BinaryMap>,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl Record {
    pub fn new(structured: Value) -> Self {
        Self {
            structured,
            binary: None,
        }
    }

    pub fn with_binary(mut self, key: impl Into<String>, payload: BinaryPayload) -> Self {
        self.binary
            .get_or_insert_with(BinaryMap::new)
            .insert(key.into(), BinaryEntry::Payload(payload));
        self
    }
}
