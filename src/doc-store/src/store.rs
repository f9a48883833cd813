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

pub mod memory;
#[cfg(any(test, feature = "testing"))]
pub mod test;
pub mod timeout;

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::ops::{
    DeleteRequest, DeleteResponse, FindOneRequest, FindOneResponse, IncrementRequest,
    IncrementResponse, InsertRequest, InsertResponse, ListPopRequest, ListPopResponse,
    ListPushRequest, ListPushResponse,
};

pub type DocStoreRef = Arc<dyn DocStore>;

/// The document store boundary.
///
/// Each operation is executed by the store as a single atomic unit against
/// one document; no operation spans two documents. That per-document
/// atomicity is the only synchronization primitive the allocation protocols
/// above this trait rely on.
#[async_trait]
pub trait DocStore: Send + Sync {
    fn name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;

    /// Atomic read-modify-write of one numeric field. Returns the
    /// post-increment value, or `None` when the document does not exist.
    async fn increment(&self, req: IncrementRequest) -> Result<IncrementResponse>;

    /// Atomic insert-if-absent keyed on the document id. A conflict is
    /// reported in the response, never through the error channel.
    async fn insert_if_absent(&self, req: InsertRequest) -> Result<InsertResponse>;

    /// Single-document delete; when `owner` is set the document is removed
    /// only if its `owner` field matches.
    async fn delete(&self, req: DeleteRequest) -> Result<DeleteResponse>;

    /// Atomically removes and returns the last element of an array field.
    async fn list_pop(&self, req: ListPopRequest) -> Result<ListPopResponse>;

    /// Atomically appends an element to an array field.
    async fn list_push(&self, req: ListPushRequest) -> Result<ListPushResponse>;

    /// Point read of one document.
    async fn find_one(&self, req: FindOneRequest) -> Result<FindOneResponse>;

    /// Names of all collections holding at least one document. Used only as
    /// the array-pool initialization existence probe.
    async fn collection_names(&self) -> Result<Vec<String>>;
}
