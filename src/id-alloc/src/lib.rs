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

//! Allocation of unique integers and integer ranges to uncoordinated
//! processes sharing one document store, using single-document atomic
//! operations as the only synchronization primitive.

pub mod counter;
pub mod error;
pub mod identity;
pub mod metrics;
pub mod pool;
pub mod probe;
pub mod registry;
