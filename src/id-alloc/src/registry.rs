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

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use doc_store::store::DocStoreRef;
use snafu::OptionExt;
use tracing::info;

use crate::counter::{Counter, RangedCounter};
use crate::error::{self, Result};
use crate::identity::ProcessIdentity;
use crate::pool::chunk::{ChunkLease, ChunkPool, ChunkPoolConfig};
use crate::pool::list::ListPool;
use crate::pool::slot::{SlotPool, SlotPoolConfig};

/// Process-local directory of the pools this process allocates from.
///
/// Pool configurations live only here, in memory: every process must
/// initialize the pools it uses, and each pool's configuration is frozen
/// into its handle at initialization. Registering a name again replaces the
/// handle; the registry does not detect processes disagreeing about a
/// pool's shape, and re-initializing a pool while allocations against it
/// are in flight is undefined.
pub struct PoolRegistry {
    store: DocStoreRef,
    identity: ProcessIdentity,
    chunk_pools: RwLock<HashMap<String, Arc<ChunkPool>>>,
    slot_pools: RwLock<HashMap<String, Arc<SlotPool>>>,
    list_pools: RwLock<HashMap<String, Arc<ListPool>>>,
}

impl PoolRegistry {
    pub fn new(store: DocStoreRef, identity: ProcessIdentity) -> Self {
        Self {
            store,
            identity,
            chunk_pools: RwLock::new(HashMap::new()),
            slot_pools: RwLock::new(HashMap::new()),
            list_pools: RwLock::new(HashMap::new()),
        }
    }

    pub fn identity(&self) -> &ProcessIdentity {
        &self.identity
    }

    /// A counter handle; counters need no registration.
    pub fn counter(&self, name: &str) -> Counter {
        Counter::new(self.store.clone(), name)
    }

    /// A ranged counter handle; counters need no registration.
    pub fn ranged_counter(&self, name: &str, min: i64, max: i64) -> Result<RangedCounter> {
        RangedCounter::new(self.store.clone(), name, min, max)
    }

    /// Registers a chunk pool. Purely local: the store is not touched.
    pub fn initialize_chunk_pool(
        &self,
        name: &str,
        min: i64,
        max: i64,
        retries: u32,
        chunk_size: i64,
    ) -> Result<()> {
        let pool = ChunkPool::new(
            self.store.clone(),
            name,
            self.identity.clone(),
            ChunkPoolConfig {
                min,
                max,
                retries,
                chunk_size,
            },
        )?;
        info!("Initialized chunk pool {name}: [{min}, {max}), chunk size {chunk_size}");
        let _ = self
            .chunk_pools
            .write()
            .unwrap()
            .insert(name.to_string(), Arc::new(pool));
        Ok(())
    }

    /// Registers a slot pool. Purely local: the store is not touched.
    pub fn initialize_slot_pool(&self, name: &str, min: i64, max: i64, retries: u32) -> Result<()> {
        let pool = SlotPool::new(
            self.store.clone(),
            name,
            SlotPoolConfig { min, max, retries },
        )?;
        info!("Initialized slot pool {name}: [{min}, {max})");
        let _ = self
            .slot_pools
            .write()
            .unwrap()
            .insert(name.to_string(), Arc::new(pool));
        Ok(())
    }

    /// Registers a list pool and creates its free-list document in the store
    /// when no initializer got there first.
    pub async fn initialize_list_pool(&self, name: &str, min: i64, max: i64) -> Result<()> {
        let pool = ListPool::new(self.store.clone(), name);
        pool.initialize(min, max).await?;
        info!("Initialized list pool {name}: [{min}, {max})");
        let _ = self
            .list_pools
            .write()
            .unwrap()
            .insert(name.to_string(), Arc::new(pool));
        Ok(())
    }

    pub fn chunk_pool(&self, name: &str) -> Result<Arc<ChunkPool>> {
        self.chunk_pools
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .context(error::NotInitializedSnafu { pool: name })
    }

    pub fn slot_pool(&self, name: &str) -> Result<Arc<SlotPool>> {
        self.slot_pools
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .context(error::NotInitializedSnafu { pool: name })
    }

    pub fn list_pool(&self, name: &str) -> Result<Arc<ListPool>> {
        self.list_pools
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .context(error::NotInitializedSnafu { pool: name })
    }

    pub async fn acquire_chunk(&self, name: &str) -> Result<ChunkLease> {
        self.chunk_pool(name)?.acquire().await
    }

    pub async fn release_chunk(&self, name: &str, chunk: i64) -> Result<()> {
        self.chunk_pool(name)?.release(chunk).await
    }

    pub async fn acquire_slot(&self, name: &str) -> Result<i64> {
        self.slot_pool(name)?.acquire().await
    }

    pub async fn release_slot(&self, name: &str, id: i64) -> Result<()> {
        self.slot_pool(name)?.release(id).await
    }

    pub async fn acquire_id(&self, name: &str) -> Result<i64> {
        self.list_pool(name)?.acquire().await
    }

    pub async fn release_id(&self, name: &str, id: i64) -> Result<()> {
        self.list_pool(name)?.release(id).await
    }
}
