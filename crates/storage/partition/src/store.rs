// Copyright 2025 The Relay Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The message store surface consumed by routers and connectors.

use crate::{FetchRequest, MessagePartition, Result};

/// Ordered, id-addressed message persistence.
///
/// This is the sole contract the delivery side depends on; holding the store
/// as `Arc<dyn MessageStore>` keeps it swappable in tests.
pub trait MessageStore: Send + Sync {
    /// Persist a message under the given id.
    fn store(&self, id: u64, payload: &[u8]) -> Result<()>;

    /// Resolve a fetch request and stream results over its channels.
    fn fetch(&self, request: FetchRequest) -> Result<()>;

    /// The largest id ever stored.
    fn max_message_id(&self) -> Result<u64>;

    /// Generate the next cluster-wide message id for `node_id`, returning
    /// the id and its embedded millisecond timestamp.
    fn generate_next_msg_id(&self, node_id: u16) -> Result<(u64, i64)>;

    /// Flush state to disk and release all file handles.
    fn close(&self) -> Result<()>;
}

impl MessageStore for MessagePartition {
    fn store(&self, id: u64, payload: &[u8]) -> Result<()> {
        Self::store(self, id, payload)
    }

    fn fetch(&self, request: FetchRequest) -> Result<()> {
        Self::fetch(self, request)
    }

    fn max_message_id(&self) -> Result<u64> {
        Self::max_message_id(self)
    }

    fn generate_next_msg_id(&self, node_id: u16) -> Result<(u64, i64)> {
        Self::generate_next_msg_id(self, node_id)
    }

    fn close(&self) -> Result<()> {
        Self::close(self)
    }
}
