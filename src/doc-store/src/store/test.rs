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

//! Contract tests every [`DocStore`] implementation must pass, plus test
//! doubles for failure injection.

use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::document::{DocId, Document};
use crate::error::{Result, TransportSnafu};
use crate::ops::{
    DeleteRequest, DeleteResponse, FindOneRequest, FindOneResponse, IncrementRequest,
    IncrementResponse, InsertRequest, InsertResponse, ListPopRequest, ListPopResponse,
    ListPushRequest, ListPushResponse,
};
use crate::store::DocStore;

pub async fn test_store_increment(store: &impl DocStore) {
    // Increment never conjures the document into existence.
    let resp = store
        .increment(IncrementRequest {
            collection: "counter".to_string(),
            id: DocId::from("seq"),
            field: "count".to_string(),
            step: 1,
        })
        .await
        .unwrap();
    assert_eq!(None, resp.value);

    let resp = store
        .insert_if_absent(InsertRequest {
            collection: "counter".to_string(),
            id: DocId::from("seq"),
            document: Document::new().with_field("count", 5),
        })
        .await
        .unwrap();
    assert!(resp.inserted);

    let resp = store
        .increment(IncrementRequest {
            collection: "counter".to_string(),
            id: DocId::from("seq"),
            field: "count".to_string(),
            step: 1,
        })
        .await
        .unwrap();
    assert_eq!(Some(6), resp.value);

    let resp = store
        .increment(IncrementRequest {
            collection: "counter".to_string(),
            id: DocId::from("seq"),
            field: "count".to_string(),
            step: 3,
        })
        .await
        .unwrap();
    assert_eq!(Some(9), resp.value);
}

pub async fn test_store_insert_if_absent(store: &impl DocStore) {
    let first = Document::new().with_field("owner", "host-0");
    let resp = store
        .insert_if_absent(InsertRequest {
            collection: "leases".to_string(),
            id: DocId::from(3),
            document: first.clone(),
        })
        .await
        .unwrap();
    assert!(resp.inserted);
    assert_eq!(None, resp.prev);

    // The loser of the race observes the winner's document.
    let resp = store
        .insert_if_absent(InsertRequest {
            collection: "leases".to_string(),
            id: DocId::from(3),
            document: Document::new().with_field("owner", "host-1"),
        })
        .await
        .unwrap();
    assert!(!resp.inserted);
    assert_eq!(Some(first), resp.prev);

    // A different key is unaffected.
    let resp = store
        .insert_if_absent(InsertRequest {
            collection: "leases".to_string(),
            id: DocId::from(4),
            document: Document::new(),
        })
        .await
        .unwrap();
    assert!(resp.inserted);
}

pub async fn test_store_delete(store: &impl DocStore) {
    let _ = store
        .insert_if_absent(InsertRequest {
            collection: "leases".to_string(),
            id: DocId::from(3),
            document: Document::new().with_field("owner", "host-0"),
        })
        .await
        .unwrap();

    // Owner-conditional delete by a non-owner leaves the document intact.
    let resp = store
        .delete(DeleteRequest {
            collection: "leases".to_string(),
            id: DocId::from(3),
            owner: Some("host-1".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(0, resp.deleted);
    let resp = store
        .find_one(FindOneRequest {
            collection: "leases".to_string(),
            id: DocId::from(3),
        })
        .await
        .unwrap();
    assert!(resp.document.is_some());

    let resp = store
        .delete(DeleteRequest {
            collection: "leases".to_string(),
            id: DocId::from(3),
            owner: Some("host-0".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(1, resp.deleted);

    // Deleting an absent document is not an error.
    let resp = store
        .delete(DeleteRequest {
            collection: "leases".to_string(),
            id: DocId::from(3),
            owner: None,
        })
        .await
        .unwrap();
    assert_eq!(0, resp.deleted);

    // Unconditional delete ignores ownership.
    let _ = store
        .insert_if_absent(InsertRequest {
            collection: "leases".to_string(),
            id: DocId::from(5),
            document: Document::new().with_field("owner", "host-0"),
        })
        .await
        .unwrap();
    let resp = store
        .delete(DeleteRequest {
            collection: "leases".to_string(),
            id: DocId::from(5),
            owner: None,
        })
        .await
        .unwrap();
    assert_eq!(1, resp.deleted);
}

pub async fn test_store_list_pop_push(store: &impl DocStore) {
    // Popping from an absent document is distinguishable from an empty list.
    let resp = store
        .list_pop(ListPopRequest {
            collection: "pool".to_string(),
            id: DocId::from("pool"),
            field: "ids".to_string(),
        })
        .await
        .unwrap();
    assert!(!resp.exists);
    assert_eq!(None, resp.value);

    let resp = store
        .list_push(ListPushRequest {
            collection: "pool".to_string(),
            id: DocId::from("pool"),
            field: "ids".to_string(),
            value: 1,
        })
        .await
        .unwrap();
    assert!(!resp.matched);

    let _ = store
        .insert_if_absent(InsertRequest {
            collection: "pool".to_string(),
            id: DocId::from("pool"),
            document: Document::new().with_field("ids", vec![10, 11]),
        })
        .await
        .unwrap();

    // Pop takes from the end; push appends to the end.
    let resp = store
        .list_push(ListPushRequest {
            collection: "pool".to_string(),
            id: DocId::from("pool"),
            field: "ids".to_string(),
            value: 12,
        })
        .await
        .unwrap();
    assert!(resp.matched);

    for expected in [12, 11, 10] {
        let resp = store
            .list_pop(ListPopRequest {
                collection: "pool".to_string(),
                id: DocId::from("pool"),
                field: "ids".to_string(),
            })
            .await
            .unwrap();
        assert!(resp.exists);
        assert_eq!(Some(expected), resp.value);
    }

    let resp = store
        .list_pop(ListPopRequest {
            collection: "pool".to_string(),
            id: DocId::from("pool"),
            field: "ids".to_string(),
        })
        .await
        .unwrap();
    assert!(resp.exists);
    assert_eq!(None, resp.value);
}

pub async fn test_store_find_one(store: &impl DocStore) {
    let resp = store
        .find_one(FindOneRequest {
            collection: "counter".to_string(),
            id: DocId::from("seq"),
        })
        .await
        .unwrap();
    assert_eq!(None, resp.document);

    let doc = Document::new().with_field("count", 1);
    let _ = store
        .insert_if_absent(InsertRequest {
            collection: "counter".to_string(),
            id: DocId::from("seq"),
            document: doc.clone(),
        })
        .await
        .unwrap();

    let resp = store
        .find_one(FindOneRequest {
            collection: "counter".to_string(),
            id: DocId::from("seq"),
        })
        .await
        .unwrap();
    assert_eq!(Some(doc), resp.document);
}

pub async fn test_store_collection_names(store: &impl DocStore) {
    assert!(store.collection_names().await.unwrap().is_empty());

    for collection in ["b_pool", "a_pool"] {
        let _ = store
            .insert_if_absent(InsertRequest {
                collection: collection.to_string(),
                id: DocId::from(collection),
                document: Document::new(),
            })
            .await
            .unwrap();
    }

    assert_eq!(
        vec!["a_pool".to_string(), "b_pool".to_string()],
        store.collection_names().await.unwrap()
    );
}

/// A store whose every operation fails with [`Error::Transport`], counting
/// the calls it receives.
///
/// [`Error::Transport`]: crate::error::Error::Transport
#[derive(Default)]
pub struct FailingStore {
    calls: AtomicUsize,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn fail<T>(&self, operation: &str) -> Result<T> {
        let _ = self.calls.fetch_add(1, Ordering::Relaxed);
        TransportSnafu {
            reason: format!("injected failure in {operation}"),
        }
        .fail()
    }
}

#[async_trait]
impl DocStore for FailingStore {
    fn name(&self) -> &str {
        "Failing"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    async fn increment(&self, _req: IncrementRequest) -> Result<IncrementResponse> {
        self.fail("increment")
    }

    async fn insert_if_absent(&self, _req: InsertRequest) -> Result<InsertResponse> {
        self.fail("insert_if_absent")
    }

    async fn delete(&self, _req: DeleteRequest) -> Result<DeleteResponse> {
        self.fail("delete")
    }

    async fn list_pop(&self, _req: ListPopRequest) -> Result<ListPopResponse> {
        self.fail("list_pop")
    }

    async fn list_push(&self, _req: ListPushRequest) -> Result<ListPushResponse> {
        self.fail("list_push")
    }

    async fn find_one(&self, _req: FindOneRequest) -> Result<FindOneResponse> {
        self.fail("find_one")
    }

    async fn collection_names(&self) -> Result<Vec<String>> {
        self.fail("collection_names")
    }
}

/// A store whose every operation sleeps far past any sane timeout, for
/// exercising [`TimedStore`](crate::store::timeout::TimedStore).
pub struct StallingStore;

impl StallingStore {
    async fn stall<T: Default>(&self) -> Result<T> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(T::default())
    }
}

#[async_trait]
impl DocStore for StallingStore {
    fn name(&self) -> &str {
        "Stalling"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    async fn increment(&self, _req: IncrementRequest) -> Result<IncrementResponse> {
        self.stall().await
    }

    async fn insert_if_absent(&self, _req: InsertRequest) -> Result<InsertResponse> {
        self.stall().await
    }

    async fn delete(&self, _req: DeleteRequest) -> Result<DeleteResponse> {
        self.stall().await
    }

    async fn list_pop(&self, _req: ListPopRequest) -> Result<ListPopResponse> {
        self.stall().await
    }

    async fn list_push(&self, _req: ListPushRequest) -> Result<ListPushResponse> {
        self.stall().await
    }

    async fn find_one(&self, _req: FindOneRequest) -> Result<FindOneResponse> {
        self.stall().await
    }

    async fn collection_names(&self) -> Result<Vec<String>> {
        self.stall().await
    }
}
