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

//! Pools of reusable ids. Three flavors over one shared store:
//!
//! - [`chunk::ChunkPool`]: leases fixed-size contiguous ranges, releases are
//!   owner-checked.
//! - [`slot::SlotPool`]: leases single ids, releases are unchecked.
//! - [`list::ListPool`]: pops/pushes single ids on one free-list document.

pub mod chunk;
pub mod list;
pub mod slot;

use crate::error::{self, Result};

pub(crate) const OWNER_FIELD: &str = "owner";
pub(crate) const LOWER_FIELD: &str = "lower";
pub(crate) const UPPER_FIELD: &str = "upper";
pub(crate) const IDS_FIELD: &str = "ids";

pub(crate) fn ensure_bounds(name: &str, min: i64, max: i64) -> Result<()> {
    snafu::ensure!(
        min < max,
        error::InvalidBoundsSnafu {
            name,
            reason: format!("min {min} must be below max {max}"),
        }
    );
    Ok(())
}
