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
use doc_store::ops::{IncrementRequest, InsertRequest};
use doc_store::store::DocStoreRef;
use snafu::{ensure, ResultExt};
use tracing::debug;

use crate::error::{self, Result};

/// Collection of the unbounded counters.
pub const COUNTER_COLLECTION: &str = "counter";
/// Collection of the range-bounded counters.
pub const RANGE_COLLECTION: &str = "range";

const COUNT_FIELD: &str = "count";

/// Bound on the lazy-creation loop. Every iteration means both the increment
/// and the seeding insert came back empty-handed, which a healthy store can
/// only do transiently.
const MAX_CREATE_ATTEMPTS: u32 = 8;

/// A named, monotonically increasing counter shared by all processes
/// reaching the same store.
///
/// The counter document is created lazily on first use; values are strictly
/// increasing per name and each value is observed by exactly one caller.
pub struct Counter {
    store: DocStoreRef,
    name: String,
}

impl Counter {
    pub fn new(store: DocStoreRef, name: impl Into<String>) -> Self {
        Self {
            store,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the next counter value.
    pub async fn next(&self) -> Result<i64> {
        next_value(&self.store, COUNTER_COLLECTION, &self.name, 1).await
    }
}

/// A named counter confined to `(min, max)`.
///
/// The shared document is seeded at `min`; the first handed-out value is
/// `min + 1`. Exhaustion is monotonic: once the counter reaches `max` the
/// document keeps advancing and every later call keeps failing — range
/// counters are not reusable.
pub struct RangedCounter {
    store: DocStoreRef,
    name: String,
    min: i64,
    max: i64,
}

impl std::fmt::Debug for RangedCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RangedCounter")
            .field("name", &self.name)
            .field("min", &self.min)
            .field("max", &self.max)
            .finish_non_exhaustive()
    }
}

impl RangedCounter {
    pub fn new(store: DocStoreRef, name: impl Into<String>, min: i64, max: i64) -> Result<Self> {
        let name = name.into();
        ensure!(
            min < max,
            error::InvalidBoundsSnafu {
                name: name.clone(),
                reason: format!("min {min} must be below max {max}"),
            }
        );
        Ok(Self {
            store,
            name,
            min,
            max,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the next value in `(min, max)`, or [`Error::OutOfRange`] once
    /// the range is spent.
    ///
    /// The bound check runs only after the shared document has already been
    /// incremented, so a failing call still advances the counter.
    ///
    /// [`Error::OutOfRange`]: crate::error::Error::OutOfRange
    pub async fn next(&self) -> Result<i64> {
        let value = next_value(&self.store, RANGE_COLLECTION, &self.name, self.min).await?;
        ensure!(
            value > self.min && value < self.max,
            error::OutOfRangeSnafu {
                counter: self.name.clone(),
                value,
                min: self.min,
                max: self.max,
            }
        );
        Ok(value)
    }
}

async fn next_value(store: &DocStoreRef, collection: &str, name: &str, seed: i64) -> Result<i64> {
    for _ in 0..MAX_CREATE_ATTEMPTS {
        let resp = store
            .increment(IncrementRequest {
                collection: collection.to_string(),
                id: DocId::from(name),
                field: COUNT_FIELD.to_string(),
                step: 1,
            })
            .await
            .context(error::StoreSnafu)?;
        if let Some(value) = resp.value {
            return Ok(value);
        }

        // No counter document yet. Seed it; losing this insert race is fine,
        // the winner's document feeds the retried increment.
        let resp = store
            .insert_if_absent(InsertRequest {
                collection: collection.to_string(),
                id: DocId::from(name),
                document: Document::new().with_field(COUNT_FIELD, seed),
            })
            .await
            .context(error::StoreSnafu)?;
        if resp.inserted {
            debug!("Seeded counter {collection}/{name} at {seed}");
        }
    }

    error::CounterUnavailableSnafu {
        counter: name,
        attempts: MAX_CREATE_ATTEMPTS,
    }
    .fail()
}
