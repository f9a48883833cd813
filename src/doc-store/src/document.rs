// Copyright 2023 Greptime Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of a document within a collection.
///
/// Counter and array-pool documents are keyed by name, lease documents by the
/// integer they guard.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocId {
    Int(i64),
    Str(String),
}

impl Default for DocId {
    fn default() -> Self {
        DocId::Int(0)
    }
}

impl From<i64> for DocId {
    fn from(id: i64) -> Self {
        DocId::Int(id)
    }
}

impl From<&str> for DocId {
    fn from(id: &str) -> Self {
        DocId::Str(id.to_string())
    }
}

impl From<String> for DocId {
    fn from(id: String) -> Self {
        DocId::Str(id)
    }
}

impl Display for DocId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DocId::Int(id) => write!(f, "{id}"),
            DocId::Str(id) => write!(f, "{id}"),
        }
    }
}

/// A document body: a flat JSON object, not including its [`DocId`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.0.get(field).and_then(Value::as_i64)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) {
        self.0.insert(field.to_string(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }
}

impl From<Map<String, Value>> for Document {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_id_conversions() {
        assert_eq!(DocId::Int(42), DocId::from(42));
        assert_eq!(DocId::Str("pool".to_string()), DocId::from("pool"));
        assert_eq!("42", DocId::from(42).to_string());
        assert_eq!("pool", DocId::from("pool").to_string());
    }

    #[test]
    fn test_doc_id_serde_untagged() {
        let id: DocId = serde_json::from_str("7").unwrap();
        assert_eq!(DocId::Int(7), id);
        let id: DocId = serde_json::from_str("\"counter\"").unwrap();
        assert_eq!(DocId::Str("counter".to_string()), id);
    }

    #[test]
    fn test_document_fields() {
        let mut doc = Document::new()
            .with_field("count", 3)
            .with_field("owner", "host-0");
        assert_eq!(Some(3), doc.get_i64("count"));
        assert_eq!(Some("host-0"), doc.get_str("owner"));
        assert_eq!(None, doc.get_i64("owner"));
        assert_eq!(None, doc.get("missing"));

        doc.set("count", 4);
        assert_eq!(Some(4), doc.get_i64("count"));
    }
}
