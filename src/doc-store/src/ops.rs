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

//! Request and response payloads of the [`DocStore`](crate::store::DocStore)
//! operations. Every operation acts on exactly one document.

use crate::document::{DocId, Document};

/// Atomically adds `step` to one numeric field of one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncrementRequest {
    pub collection: String,
    pub id: DocId,
    pub field: String,
    pub step: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncrementResponse {
    /// The post-increment value, or `None` when no such document exists.
    /// The caller decides whether absence is an error.
    pub value: Option<i64>,
}

/// Inserts a document only if its key is not taken yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertRequest {
    pub collection: String,
    pub id: DocId,
    pub document: Document,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertResponse {
    /// `false` reports a unique-key conflict: some other writer holds the key.
    pub inserted: bool,
    /// The already-present document on conflict.
    pub prev: Option<Document>,
}

/// Deletes one document, optionally only when its `owner` field matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteRequest {
    pub collection: String,
    pub id: DocId,
    pub owner: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteResponse {
    pub deleted: u64,
}

/// Atomically removes the last element of one array field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListPopRequest {
    pub collection: String,
    pub id: DocId,
    pub field: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListPopResponse {
    /// Whether the document exists at all.
    pub exists: bool,
    /// The popped element; `None` when the list is missing or empty.
    pub value: Option<i64>,
}

/// Atomically appends one element to one array field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListPushRequest {
    pub collection: String,
    pub id: DocId,
    pub field: String,
    pub value: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListPushResponse {
    /// `false` when no document matched the key.
    pub matched: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOneRequest {
    pub collection: String,
    pub id: DocId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOneResponse {
    pub document: Option<Document>,
}
