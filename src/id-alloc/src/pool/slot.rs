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
use doc_store::ops::{DeleteRequest, InsertRequest};
use doc_store::store::DocStoreRef;
use snafu::ResultExt;
use tracing::debug;

use crate::error::{self, Result};
use crate::metrics::{
    METRIC_ID_ALLOC_ACQUIRE_ELAPSED, METRIC_ID_ALLOC_EXHAUSTED, METRIC_ID_ALLOC_LEASE_CONFLICT,
};
use crate::probe::ProbePlan;

/// Shape of a slot pool: the flat id space `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPoolConfig {
    pub min: i64,
    pub max: i64,
    /// Probe budget per acquisition.
    pub retries: u32,
}

/// Leases single ids out of a flat space.
///
/// Same probing protocol as [`ChunkPool`](crate::pool::chunk::ChunkPool),
/// but the lease document is bare: no ownership tag, so any process may
/// release any id. Pools whose releases must be fenced belong in a chunk
/// pool instead.
pub struct SlotPool {
    store: DocStoreRef,
    name: String,
    config: SlotPoolConfig,
}

impl std::fmt::Debug for SlotPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotPool")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SlotPool {
    pub fn new(store: DocStoreRef, name: impl Into<String>, config: SlotPoolConfig) -> Result<Self> {
        let name = name.into();
        crate::pool::ensure_bounds(&name, config.min, config.max)?;
        Ok(Self {
            store,
            name,
            config,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &SlotPoolConfig {
        &self.config
    }

    /// Leases one free id, probing at most `retries` random candidates.
    ///
    /// A conflict triggers the next probe; any store failure is surfaced
    /// immediately, never retried.
    pub async fn acquire(&self) -> Result<i64> {
        let _timer = METRIC_ID_ALLOC_ACQUIRE_ELAPSED
            .with_label_values(&[&self.name, "slot"])
            .start_timer();

        let space = (self.config.max - self.config.min) as u64;
        let candidates = {
            let mut rng = rand::rng();
            ProbePlan::new(space, self.config.retries)
                .candidates(&mut rng)
                .collect::<Vec<_>>()
        };

        for candidate in candidates {
            let id = self.config.min + candidate as i64;
            let resp = self
                .store
                .insert_if_absent(InsertRequest {
                    collection: self.name.clone(),
                    id: DocId::from(id),
                    document: Document::new(),
                })
                .await
                .context(error::StoreSnafu)?;

            if resp.inserted {
                debug!("Leased id {id} of pool {}", self.name);
                return Ok(id);
            }

            METRIC_ID_ALLOC_LEASE_CONFLICT
                .with_label_values(&[&self.name])
                .inc();
            debug!("Id {id} of pool {} is already leased", self.name);
        }

        METRIC_ID_ALLOC_EXHAUSTED
            .with_label_values(&[&self.name])
            .inc();
        error::ExhaustedSnafu {
            pool: self.name.clone(),
            attempts: self.config.retries,
        }
        .fail()
    }

    /// Releases an id back to the pool. Any caller may release any id;
    /// releasing a free id is a no-op.
    pub async fn release(&self, id: i64) -> Result<()> {
        let _ = self
            .store
            .delete(DeleteRequest {
                collection: self.name.clone(),
                id: DocId::from(id),
                owner: None,
            })
            .await
            .context(error::StoreSnafu)?;
        debug!("Released id {id} of pool {}", self.name);
        Ok(())
    }
}
