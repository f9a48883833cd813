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

use std::any::Any;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, TimeoutSnafu};
use crate::ops::{
    DeleteRequest, DeleteResponse, FindOneRequest, FindOneResponse, IncrementRequest,
    IncrementResponse, InsertRequest, InsertResponse, ListPopRequest, ListPopResponse,
    ListPushRequest, ListPushResponse,
};
use crate::store::DocStore;

/// Round-trip deadlines for store operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutOptions {
    /// Deadline for single-document reads and writes.
    #[serde(with = "humantime_serde")]
    pub rpc_timeout: Duration,
    /// Deadline for multi-document probes (collection listing).
    #[serde(with = "humantime_serde")]
    pub scan_timeout: Duration,
}

impl Default for TimeoutOptions {
    fn default() -> Self {
        Self {
            rpc_timeout: Duration::from_secs(3),
            scan_timeout: Duration::from_secs(10),
        }
    }
}

/// Bounds every operation of the wrapped store with a deadline, surfacing
/// elapsed timers as [`Error::Timeout`] so a slow store is never mistaken
/// for an absent document or a lost insert race.
///
/// [`Error::Timeout`]: crate::error::Error::Timeout
pub struct TimedStore<S> {
    inner: S,
    options: TimeoutOptions,
}

impl<S> TimedStore<S> {
    pub fn new(inner: S, options: TimeoutOptions) -> Self {
        Self { inner, options }
    }

    async fn bound<T>(
        &self,
        limit: Duration,
        operation: &str,
        fut: impl Future<Output = Result<T>> + Send,
    ) -> Result<T> {
        match tokio::time::timeout(limit, fut).await {
            Ok(res) => res,
            Err(_) => {
                warn!("Store operation {operation} timed out after {limit:?}");
                TimeoutSnafu {
                    operation,
                    elapsed: limit,
                }
                .fail()
            }
        }
    }
}

#[async_trait]
impl<S: DocStore + 'static> DocStore for TimedStore<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    async fn increment(&self, req: IncrementRequest) -> Result<IncrementResponse> {
        self.bound(self.options.rpc_timeout, "increment", self.inner.increment(req))
            .await
    }

    async fn insert_if_absent(&self, req: InsertRequest) -> Result<InsertResponse> {
        self.bound(
            self.options.rpc_timeout,
            "insert_if_absent",
            self.inner.insert_if_absent(req),
        )
        .await
    }

    async fn delete(&self, req: DeleteRequest) -> Result<DeleteResponse> {
        self.bound(self.options.rpc_timeout, "delete", self.inner.delete(req))
            .await
    }

    async fn list_pop(&self, req: ListPopRequest) -> Result<ListPopResponse> {
        self.bound(self.options.rpc_timeout, "list_pop", self.inner.list_pop(req))
            .await
    }

    async fn list_push(&self, req: ListPushRequest) -> Result<ListPushResponse> {
        self.bound(
            self.options.rpc_timeout,
            "list_push",
            self.inner.list_push(req),
        )
        .await
    }

    async fn find_one(&self, req: FindOneRequest) -> Result<FindOneResponse> {
        self.bound(self.options.rpc_timeout, "find_one", self.inner.find_one(req))
            .await
    }

    async fn collection_names(&self) -> Result<Vec<String>> {
        self.bound(
            self.options.scan_timeout,
            "collection_names",
            self.inner.collection_names(),
        )
        .await
    }
}
