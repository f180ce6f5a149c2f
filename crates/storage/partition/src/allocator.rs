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

//! Cluster-wide message id allocation.
//!
//! A message id packs a millisecond timestamp and the originating node:
//!
//! ```text
//! ┌──────────────────────────────┬───────────────┐
//! │ timestamp, milliseconds (48) │ node id (16)  │
//! └──────────────────────────────┴───────────────┘
//! ```
//!
//! The timestamp occupies the high bits, so ids order by time across nodes:
//! two nodes generating at least one millisecond apart produce ids that
//! compare in timestamp order. Within one allocator the clock value is bumped
//! whenever the wall clock has not advanced, making the sequence strictly
//! monotonic even under bursts faster than the clock resolution.

use chrono::Utc;

/// Number of low bits holding the node id.
pub const NODE_ID_BITS: u32 = 16;

/// Mask for the 48-bit millisecond timestamp.
const TIMESTAMP_MASK: u64 = (1 << 48) - 1;

/// Generator of monotonic, time-ordered message ids.
///
/// Not synchronized; the owning partition serializes calls under its write
/// lock. Allocators of different partitions are independent.
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgIdAllocator {
    last_timestamp_ms: u64,
}

impl MsgIdAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an allocator that will only issue ids greater than `id`.
    ///
    /// Used on partition open to resume above the largest stored id, so that
    /// ids keep increasing across restarts.
    #[must_use]
    pub const fn resume_after(id: u64) -> Self {
        Self {
            last_timestamp_ms: id >> NODE_ID_BITS,
        }
    }

    /// Generate the next id for `node_id`.
    ///
    /// Returns the id and the millisecond timestamp embedded in it.
    pub fn next(&mut self, node_id: u16) -> (u64, i64) {
        let now_ms = Utc::now().timestamp_millis().max(0) as u64 & TIMESTAMP_MASK;

        let timestamp_ms = if now_ms <= self.last_timestamp_ms {
            self.last_timestamp_ms + 1
        } else {
            now_ms
        };
        self.last_timestamp_ms = timestamp_ms;

        let id = (timestamp_ms << NODE_ID_BITS) | u64::from(node_id);
        (id, timestamp_ms as i64)
    }
}

#[cfg(test)]
mod tests {
    use std::{thread, time::Duration};

    use super::*;

    #[test]
    fn test_ids_are_strictly_monotonic() {
        let mut allocator = MsgIdAllocator::new();
        let mut last_id = 0u64;

        for _ in 0..1000 {
            let (id, _) = allocator.next(1);
            assert!(id > last_id, "ids should be monotonic");
            last_id = id;
        }
    }

    #[test]
    fn test_node_id_occupies_low_bits() {
        let mut allocator = MsgIdAllocator::new();
        let (id, timestamp_ms) = allocator.next(42);

        assert_eq!(id & 0xFFFF, 42);
        assert_eq!((id >> NODE_ID_BITS) as i64, timestamp_ms);
    }

    #[test]
    fn test_cross_node_ordering() {
        let mut node1 = MsgIdAllocator::new();
        let mut node2 = MsgIdAllocator::new();
        let mut last_id = 0u64;

        for _ in 0..20 {
            let (id1, _) = node1.next(1);
            let (id2, _) = node2.next(2);

            assert!(id2 > id1);
            assert!(id1 > last_id);
            assert!(id2 > last_id);
            last_id = id2;

            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_resume_issues_greater_ids() {
        let mut allocator = MsgIdAllocator::new();
        let (id, _) = allocator.next(u16::MAX);

        let mut resumed = MsgIdAllocator::resume_after(id);
        let (next_id, _) = resumed.next(0);
        assert!(next_id > id);
    }
}
