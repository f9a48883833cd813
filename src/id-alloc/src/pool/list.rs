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

use doc_store::document::{DocId, Document};
use doc_store::ops::{InsertRequest, ListPopRequest, ListPushRequest};
use doc_store::store::DocStoreRef;
use snafu::{ensure, ResultExt};
use tracing::debug;

use crate::error::{self, Result};
use crate::metrics::{METRIC_ID_ALLOC_ACQUIRE_ELAPSED, METRIC_ID_ALLOC_EXHAUSTED};
use crate::pool::IDS_FIELD;

/// A pool backed by one document holding the free list.
///
/// Acquire pops from the end of the list, release pushes to the end, so
/// reuse is LIFO: the most recently released id is the next one handed
/// out. The store does not deduplicate the list; releasing an id that was
/// never acquired (or releasing one twice) corrupts the pool and is on the
/// caller.
pub struct ListPool {
    store: DocStoreRef,
    name: String,
}

impl ListPool {
    pub fn new(store: DocStoreRef, name: impl Into<String>) -> Self {
        Self {
            store,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creates the free-list document holding every id in `[min, max)`,
    /// unless the pool already exists.
    ///
    /// The existence probe and the create are two separate round trips;
    /// concurrent initializers racing on a brand-new pool are settled by the
    /// store's insert-if-absent, and losing that race is benign.
    pub async fn initialize(&self, min: i64, max: i64) -> Result<()> {
        crate::pool::ensure_bounds(&self.name, min, max)?;

        let names = self
            .store
            .collection_names()
            .await
            .context(error::StoreSnafu)?;
        if names.contains(&self.name) {
            debug!("Pool {} already exists", self.name);
            return Ok(());
        }

        let ids = (min..max).collect::<Vec<_>>();
        let resp = self
            .store
            .insert_if_absent(InsertRequest {
                collection: self.name.clone(),
                id: DocId::from(self.name.as_str()),
                document: Document::new().with_field(IDS_FIELD, ids),
            })
            .await
            .context(error::StoreSnafu)?;
        if resp.inserted {
            debug!("Created pool {} with ids [{min}, {max})", self.name);
        } else {
            debug!("Lost the creation race of pool {}", self.name);
        }

        Ok(())
    }

    /// Pops one id off the free list.
    pub async fn acquire(&self) -> Result<i64> {
        let _timer = METRIC_ID_ALLOC_ACQUIRE_ELAPSED
            .with_label_values(&[&self.name, "list"])
            .start_timer();

        let resp = self
            .store
            .list_pop(ListPopRequest {
                collection: self.name.clone(),
                id: DocId::from(self.name.as_str()),
                field: IDS_FIELD.to_string(),
            })
            .await
            .context(error::StoreSnafu)?;
        ensure!(
            resp.exists,
            error::PoolNotFoundSnafu {
                pool: self.name.clone(),
            }
        );

        let Some(id) = resp.value else {
            METRIC_ID_ALLOC_EXHAUSTED
                .with_label_values(&[&self.name])
                .inc();
            return error::PoolEmptySnafu {
                pool: self.name.clone(),
            }
            .fail();
        };
        debug!("Assigned id {id} of pool {}", self.name);
        Ok(id)
    }

    /// Pushes an id back onto the free list.
    pub async fn release(&self, id: i64) -> Result<()> {
        let resp = self
            .store
            .list_push(ListPushRequest {
                collection: self.name.clone(),
                id: DocId::from(self.name.as_str()),
                field: IDS_FIELD.to_string(),
                value: id,
            })
            .await
            .context(error::StoreSnafu)?;
        ensure!(
            resp.matched,
            error::PoolNotFoundSnafu {
                pool: self.name.clone(),
            }
        );
        debug!("Returned id {id} to pool {}", self.name);
        Ok(())
    }
}
