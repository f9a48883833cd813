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

use std::env;
use std::fmt::{self, Display, Formatter};

/// Identity a process stamps on the leases it owns.
///
/// Chunk-lease release is refused unless the releasing process presents the
/// identity recorded at acquisition. The deployment must guarantee the
/// identity is unique among processes sharing a pool; this library only
/// records and compares the tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessIdentity(String);

impl ProcessIdentity {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    /// Reads the identity from the `HOSTNAME` environment variable, the
    /// per-pod name in containerized deployments.
    pub fn from_env() -> Self {
        Self(env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProcessIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
