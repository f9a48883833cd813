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

use snafu::{Location, Snafu};

/// Allocation failures.
///
/// A lost insert race is not represented here: the lease allocators absorb
/// conflicts into their retry loops and only report `Exhausted` once the
/// budget is spent. Store failures pass through as `Store` and are never
/// downgraded to exhaustion.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Pool {} has not been initialized yet", pool))]
    NotInitialized {
        pool: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("No free id found in pool {} after {} attempts", pool, attempts))]
    Exhausted {
        pool: String,
        attempts: u32,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Counter {} unavailable after {} creation attempts", counter, attempts))]
    CounterUnavailable {
        counter: String,
        attempts: u32,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display(
        "Counter {} value {} is outside of range ({}, {})",
        counter,
        value,
        min,
        max
    ))]
    OutOfRange {
        counter: String,
        value: i64,
        min: i64,
        max: i64,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Id {} of pool {} is not leased by {}", id, pool, owner))]
    OwnershipMismatch {
        pool: String,
        id: i64,
        owner: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Pool {} has no available ids", pool))]
    PoolEmpty {
        pool: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Pool document of {} does not exist in the store", pool))]
    PoolNotFound {
        pool: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Invalid bounds for {}: {}", name, reason))]
    InvalidBounds {
        name: String,
        reason: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Document store operation failed"))]
    Store {
        source: doc_store::error::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
