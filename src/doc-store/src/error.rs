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

use std::time::Duration;

use snafu::{Location, Snafu};

/// Failures of the document store boundary.
///
/// Absence of a document and unique-key conflicts are not errors here: they
/// are reported in the response structs so callers can drive their own retry
/// policies. Only failures of the store itself use this channel.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Store operation {} timed out after {:?}", operation, elapsed))]
    Timeout {
        operation: String,
        elapsed: Duration,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Failed to reach document store: {}", reason))]
    Transport {
        reason: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Unexpected document content: {}", err_msg))]
    UnexpectedDocument {
        err_msg: String,
        #[snafu(implicit)]
        location: Location,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
