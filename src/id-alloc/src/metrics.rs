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

use lazy_static::lazy_static;
use prometheus::*;

lazy_static! {
    pub static ref METRIC_ID_ALLOC_ACQUIRE_ELAPSED: HistogramVec = register_histogram_vec!(
        "id_alloc_acquire_elapsed",
        "id alloc acquire elapsed",
        &["pool", "kind"]
    )
    .unwrap();
    pub static ref METRIC_ID_ALLOC_LEASE_CONFLICT: IntCounterVec = register_int_counter_vec!(
        "id_alloc_lease_conflict",
        "id alloc lease conflicts",
        &["pool"]
    )
    .unwrap();
    pub static ref METRIC_ID_ALLOC_EXHAUSTED: IntCounterVec = register_int_counter_vec!(
        "id_alloc_exhausted",
        "id alloc exhausted acquisitions",
        &["pool"]
    )
    .unwrap();
}
