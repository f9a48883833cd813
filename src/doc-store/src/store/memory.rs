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
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;
use snafu::OptionExt;

use crate::document::{DocId, Document};
use crate::error::{Result, UnexpectedDocumentSnafu};
use crate::metrics::METRIC_DOC_STORE_OP_ELAPSED;
use crate::ops::{
    DeleteRequest, DeleteResponse, FindOneRequest, FindOneResponse, IncrementRequest,
    IncrementResponse, InsertRequest, InsertResponse, ListPopRequest, ListPopResponse,
    ListPushRequest, ListPushResponse,
};
use crate::store::DocStore;

/// In-memory reference implementation of [`DocStore`].
///
/// Every operation takes the store lock for its whole duration, which is a
/// strictly stronger guarantee than the per-document atomicity the trait
/// demands. Collections come into existence with their first document,
/// mirroring the lazy collection creation of the real store.
pub struct MemoryDocStore {
    collections: RwLock<HashMap<String, BTreeMap<DocId, Document>>>,
}

impl Display for MemoryDocStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let collections = self.collections.read().unwrap();
        for (name, docs) in collections.iter() {
            for (id, doc) in docs.iter() {
                writeln!(
                    f,
                    "{name}/{id} -> {}",
                    serde_json::to_string(doc).unwrap_or_default()
                )?;
            }
        }
        Ok(())
    }
}

impl Default for MemoryDocStore {
    fn default() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }
}

impl MemoryDocStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&self) {
        let mut collections = self.collections.write().unwrap();
        collections.clear();
    }
}

#[async_trait]
impl DocStore for MemoryDocStore {
    fn name(&self) -> &str {
        "Memory"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    async fn increment(&self, req: IncrementRequest) -> Result<IncrementResponse> {
        let _timer = METRIC_DOC_STORE_OP_ELAPSED
            .with_label_values(&["memory", "increment"])
            .start_timer();

        let IncrementRequest {
            collection,
            id,
            field,
            step,
        } = req;

        let mut collections = self.collections.write().unwrap();
        let Some(doc) = collections
            .get_mut(&collection)
            .and_then(|docs| docs.get_mut(&id))
        else {
            return Ok(IncrementResponse { value: None });
        };

        let value = match doc.get(&field) {
            // A missing field counts from zero, like the real store's `$inc`.
            None => step,
            Some(current) => {
                let current = current.as_i64().context(UnexpectedDocumentSnafu {
                    err_msg: format!("field {field} of {collection}/{id} is not an integer"),
                })?;
                current + step
            }
        };
        doc.set(&field, value);

        Ok(IncrementResponse { value: Some(value) })
    }

    async fn insert_if_absent(&self, req: InsertRequest) -> Result<InsertResponse> {
        let _timer = METRIC_DOC_STORE_OP_ELAPSED
            .with_label_values(&["memory", "insert_if_absent"])
            .start_timer();

        let InsertRequest {
            collection,
            id,
            document,
        } = req;

        let mut collections = self.collections.write().unwrap();
        let docs = collections.entry(collection).or_default();

        let (inserted, prev) = match docs.entry(id) {
            Entry::Vacant(e) => {
                let _ = e.insert(document);
                (true, None)
            }
            Entry::Occupied(e) => (false, Some(e.get().clone())),
        };

        Ok(InsertResponse { inserted, prev })
    }

    async fn delete(&self, req: DeleteRequest) -> Result<DeleteResponse> {
        let _timer = METRIC_DOC_STORE_OP_ELAPSED
            .with_label_values(&["memory", "delete"])
            .start_timer();

        let DeleteRequest {
            collection,
            id,
            owner,
        } = req;

        let mut collections = self.collections.write().unwrap();
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(DeleteResponse { deleted: 0 });
        };

        let matches = match (docs.get(&id), &owner) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(doc), Some(owner)) => doc.get_str("owner") == Some(owner.as_str()),
        };
        if matches {
            let _ = docs.remove(&id);
        }

        Ok(DeleteResponse {
            deleted: matches as u64,
        })
    }

    async fn list_pop(&self, req: ListPopRequest) -> Result<ListPopResponse> {
        let _timer = METRIC_DOC_STORE_OP_ELAPSED
            .with_label_values(&["memory", "list_pop"])
            .start_timer();

        let ListPopRequest {
            collection,
            id,
            field,
        } = req;

        let mut collections = self.collections.write().unwrap();
        let Some(doc) = collections
            .get_mut(&collection)
            .and_then(|docs| docs.get_mut(&id))
        else {
            return Ok(ListPopResponse {
                exists: false,
                value: None,
            });
        };

        let Some(list) = doc.fields_mut().get_mut(&field) else {
            return Ok(ListPopResponse {
                exists: true,
                value: None,
            });
        };
        let list = list.as_array_mut().context(UnexpectedDocumentSnafu {
            err_msg: format!("field {field} of {collection}/{id} is not an array"),
        })?;

        let value = match list.pop() {
            None => None,
            Some(element) => Some(element.as_i64().context(UnexpectedDocumentSnafu {
                err_msg: format!("field {field} of {collection}/{id} holds a non-integer element"),
            })?),
        };

        Ok(ListPopResponse {
            exists: true,
            value,
        })
    }

    async fn list_push(&self, req: ListPushRequest) -> Result<ListPushResponse> {
        let _timer = METRIC_DOC_STORE_OP_ELAPSED
            .with_label_values(&["memory", "list_push"])
            .start_timer();

        let ListPushRequest {
            collection,
            id,
            field,
            value,
        } = req;

        let mut collections = self.collections.write().unwrap();
        let Some(doc) = collections
            .get_mut(&collection)
            .and_then(|docs| docs.get_mut(&id))
        else {
            return Ok(ListPushResponse { matched: false });
        };

        match doc.fields_mut().entry(field.clone()) {
            // A missing field becomes a fresh array, like the real store's `$push`.
            serde_json::map::Entry::Vacant(e) => {
                let _ = e.insert(Value::from(vec![value]));
            }
            serde_json::map::Entry::Occupied(mut e) => {
                let list = e.get_mut().as_array_mut().context(UnexpectedDocumentSnafu {
                    err_msg: format!("field {field} of {collection}/{id} is not an array"),
                })?;
                list.push(Value::from(value));
            }
        }

        Ok(ListPushResponse { matched: true })
    }

    async fn find_one(&self, req: FindOneRequest) -> Result<FindOneResponse> {
        let _timer = METRIC_DOC_STORE_OP_ELAPSED
            .with_label_values(&["memory", "find_one"])
            .start_timer();

        let FindOneRequest { collection, id } = req;

        let collections = self.collections.read().unwrap();
        let document = collections
            .get(&collection)
            .and_then(|docs| docs.get(&id))
            .cloned();

        Ok(FindOneResponse { document })
    }

    async fn collection_names(&self) -> Result<Vec<String>> {
        let _timer = METRIC_DOC_STORE_OP_ELAPSED
            .with_label_values(&["memory", "collection_names"])
            .start_timer();

        let collections = self.collections.read().unwrap();
        let mut names = collections.keys().cloned().collect::<Vec<_>>();
        names.sort();

        Ok(names)
    }
}
