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
use doc_store::ops::{DeleteRequest, FindOneRequest, InsertRequest};
use doc_store::store::DocStoreRef;
use snafu::{ensure, ResultExt};
use tracing::{debug, warn};

use crate::error::{self, Result};
use crate::identity::ProcessIdentity;
use crate::metrics::{
    METRIC_ID_ALLOC_ACQUIRE_ELAPSED, METRIC_ID_ALLOC_EXHAUSTED, METRIC_ID_ALLOC_LEASE_CONFLICT,
};
use crate::pool::{LOWER_FIELD, OWNER_FIELD, UPPER_FIELD};
use crate::probe::ProbePlan;

/// Shape of a chunk pool: the address space `[min, max)` cut into
/// `(max - min) / chunk_size` fixed-size chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPoolConfig {
    pub min: i64,
    pub max: i64,
    /// Probe budget per acquisition.
    pub retries: u32,
    pub chunk_size: i64,
}

/// A leased chunk: the contiguous id range `[lower, upper)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLease {
    pub chunk: i64,
    pub lower: i64,
    pub upper: i64,
}

/// Leases fixed-size chunks of an integer address space.
///
/// A chunk is leased iff its lease document exists; acquisition probes
/// random chunk indexes and lets the store's insert-if-absent pick the
/// winner. Leases are tagged with the owning process's identity and only
/// the owner can release them, so one misbehaving process cannot free a
/// range another process is still handing out.
pub struct ChunkPool {
    store: DocStoreRef,
    name: String,
    identity: ProcessIdentity,
    config: ChunkPoolConfig,
    total_chunks: i64,
}

impl std::fmt::Debug for ChunkPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkPool")
            .field("name", &self.name)
            .field("identity", &self.identity)
            .field("config", &self.config)
            .field("total_chunks", &self.total_chunks)
            .finish_non_exhaustive()
    }
}

impl ChunkPool {
    pub fn new(
        store: DocStoreRef,
        name: impl Into<String>,
        identity: ProcessIdentity,
        config: ChunkPoolConfig,
    ) -> Result<Self> {
        let name = name.into();
        crate::pool::ensure_bounds(&name, config.min, config.max)?;
        ensure!(
            config.chunk_size > 0,
            error::InvalidBoundsSnafu {
                name: name.clone(),
                reason: format!("chunk size {} must be positive", config.chunk_size),
            }
        );
        ensure!(
            (config.max - config.min) % config.chunk_size == 0,
            error::InvalidBoundsSnafu {
                name: name.clone(),
                reason: format!(
                    "chunk size {} does not divide the span [{}, {})",
                    config.chunk_size, config.min, config.max
                ),
            }
        );

        let total_chunks = (config.max - config.min) / config.chunk_size;
        Ok(Self {
            store,
            name,
            identity,
            config,
            total_chunks,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ChunkPoolConfig {
        &self.config
    }

    /// Leases one free chunk, probing at most `retries` random candidates.
    pub async fn acquire(&self) -> Result<ChunkLease> {
        let _timer = METRIC_ID_ALLOC_ACQUIRE_ELAPSED
            .with_label_values(&[&self.name, "chunk"])
            .start_timer();

        let candidates = {
            let mut rng = rand::rng();
            ProbePlan::new(self.total_chunks as u64, self.config.retries)
                .candidates(&mut rng)
                .collect::<Vec<_>>()
        };

        let mut remaining = self.config.retries;
        for candidate in candidates {
            remaining -= 1;
            let chunk = candidate as i64;
            let lower = self.config.min + chunk * self.config.chunk_size;
            let upper = lower + self.config.chunk_size;

            let lease = Document::new()
                .with_field(LOWER_FIELD, lower)
                .with_field(UPPER_FIELD, upper)
                .with_field(OWNER_FIELD, self.identity.as_str());
            let resp = self
                .store
                .insert_if_absent(InsertRequest {
                    collection: self.name.clone(),
                    id: DocId::from(chunk),
                    document: lease,
                })
                .await
                .context(error::StoreSnafu)?;

            if resp.inserted {
                debug!("Leased chunk {chunk} [{lower}, {upper}) of pool {}", self.name);
                return Ok(ChunkLease {
                    chunk,
                    lower,
                    upper,
                });
            }

            METRIC_ID_ALLOC_LEASE_CONFLICT
                .with_label_values(&[&self.name])
                .inc();
            debug!(
                "Chunk {chunk} of pool {} is already leased, {remaining} retries left",
                self.name
            );
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

    /// Releases a chunk leased by this process.
    ///
    /// Releasing a chunk that is not leased at all is a no-op; releasing a
    /// chunk leased by some other process fails with
    /// [`Error::OwnershipMismatch`] and leaves the lease in place.
    ///
    /// [`Error::OwnershipMismatch`]: crate::error::Error::OwnershipMismatch
    pub async fn release(&self, chunk: i64) -> Result<()> {
        let resp = self
            .store
            .delete(DeleteRequest {
                collection: self.name.clone(),
                id: DocId::from(chunk),
                owner: Some(self.identity.to_string()),
            })
            .await
            .context(error::StoreSnafu)?;
        if resp.deleted > 0 {
            debug!("Released chunk {chunk} of pool {}", self.name);
            return Ok(());
        }

        let resp = self
            .store
            .find_one(FindOneRequest {
                collection: self.name.clone(),
                id: DocId::from(chunk),
            })
            .await
            .context(error::StoreSnafu)?;
        match resp.document {
            Some(_) => {
                warn!(
                    "Refused to release chunk {chunk} of pool {}: not leased by {}",
                    self.name, self.identity
                );
                error::OwnershipMismatchSnafu {
                    pool: self.name.clone(),
                    id: chunk,
                    owner: self.identity.to_string(),
                }
                .fail()
            }
            None => Ok(()),
        }
    }
}
