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

//! File-backed partitioned message log.
//!
//! Features:
//! - Monotonic cluster-wide message ids embedding timestamp and node
//! - Rolling fixed-capacity data files with companion index files
//! - Out-of-order writes, id-ordered reads
//! - Ordered range fetches spanning file boundaries, streamed over channels
//! - Crash recovery by rescanning the tail data file

mod allocator;
mod cache;
mod format;

pub mod config;
pub mod error;
pub mod fetch;
pub mod file;
pub mod index;
pub mod partition;
pub mod path;
pub mod store;

pub use allocator::MsgIdAllocator;
pub use config::{DEFAULT_MESSAGES_PER_FILE, PartitionBuilder, PartitionConfig};
pub use error::{Error, Result};
pub use fetch::{FetchDirection, FetchReceivers, FetchRequest, MessageAndId};
pub use index::{IndexEntry, SortedIndexList, read_min_max_from_index_file};
pub use partition::MessagePartition;
pub use store::MessageStore;
