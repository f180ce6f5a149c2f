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

//! Message-id index for a single data file.
//!
//! ## Purpose
//!
//! Records land in a data file in write order, which for externally supplied
//! ids is arbitrary. The index restores id order: the tail file's index lives
//! in memory as a [`SortedIndexList`] and is flushed to a companion `.idx`
//! file when the data file closes; closed files' indexes are read back on
//! demand.
//!
//! ## Index File Format
//!
//! ```text
//! ┌─────────────────┬──────────────┬───────────┐
//! │ message id (8B) │ offset (8B)  │ size (4B) │
//! ├─────────────────┼──────────────┼───────────┤
//! │ message id (8B) │ offset (8B)  │ size (4B) │
//! └─────────────────┴──────────────┴───────────┘
//! ```
//!
//! Little-endian, no header, sorted ascending by message id. The first and
//! last records therefore carry the file's min and max id. The owning file is
//! implicit in the filename.

use std::{
    fs::{File, OpenOptions},
    io::{Read, Seek, SeekFrom, Write},
    path::Path,
};

use snafu::ensure;

use crate::error::{CorruptIndexSnafu, Result};

/// Size of each index record in bytes (message id: 8 + offset: 8 + size: 4).
pub const INDEX_ENTRY_SIZE: u64 = 20;

/// A single index entry locating one message payload.
///
/// `offset` is the absolute byte position of the payload in the data file,
/// past the record framing header. `file_id` is the zero-based file index
/// within the partition; it is not stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub message_id: u64,
    pub offset:     u64,
    pub size:       u32,
    pub file_id:    u32,
}

/// A list of index entries kept sorted by message id.
///
/// Ids are unique within a partition, so inserting an entry with an id that
/// is already present replaces it. Insertion uses a binary search followed by
/// a shift, which is adequate for lists bounded by `messages_per_file`.
#[derive(Debug, Clone, Default)]
pub struct SortedIndexList {
    entries: Vec<IndexEntry>,
}

impl SortedIndexList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert an entry, keeping the list sorted by message id.
    pub fn insert(&mut self, entry: IndexEntry) {
        match self
            .entries
            .binary_search_by_key(&entry.message_id, |e| e.message_id)
        {
            Ok(pos) => self.entries[pos] = entry,
            Err(pos) => self.entries.insert(pos, entry),
        }
    }

    /// Find the entry with exactly the given id.
    #[must_use]
    pub fn lookup(&self, message_id: u64) -> Option<&IndexEntry> {
        self.entries
            .binary_search_by_key(&message_id, |e| e.message_id)
            .ok()
            .map(|pos| &self.entries[pos])
    }

    #[must_use]
    pub fn first(&self) -> Option<&IndexEntry> {
        self.entries.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&IndexEntry> {
        self.entries.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IndexEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Keep only the `count` smallest ids.
    pub fn keep_first(&mut self, count: usize) {
        self.entries.truncate(count);
    }

    /// Keep only the `count` largest ids, preserving ascending order.
    pub fn keep_last(&mut self, count: usize) {
        if self.entries.len() > count {
            self.entries.drain(..self.entries.len() - count);
        }
    }
}

impl IntoIterator for SortedIndexList {
    type IntoIter = std::vec::IntoIter<IndexEntry>;
    type Item = IndexEntry;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a SortedIndexList {
    type IntoIter = std::slice::Iter<'a, IndexEntry>;
    type Item = &'a IndexEntry;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Write an index file for a closed data file.
///
/// Entries are serialized in their sorted order and the file is synced before
/// returning. An existing index file is replaced.
pub(crate) fn write_index_file(path: &Path, entries: &SortedIndexList) -> Result<()> {
    let mut buf = Vec::with_capacity(entries.len() * INDEX_ENTRY_SIZE as usize);
    for entry in entries {
        buf.extend_from_slice(&entry.message_id.to_le_bytes());
        buf.extend_from_slice(&entry.offset.to_le_bytes());
        buf.extend_from_slice(&entry.size.to_le_bytes());
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.write_all(&buf)?;
    file.sync_all()?;
    Ok(())
}

/// Read a whole index file back into a sorted list.
///
/// `file_id` is attached to every entry so fetch results can be attributed to
/// their data file.
pub(crate) fn read_index_file(path: &Path, file_id: u32) -> Result<SortedIndexList> {
    let bytes = std::fs::read(path)?;
    ensure!(
        bytes.len() as u64 % INDEX_ENTRY_SIZE == 0,
        CorruptIndexSnafu {
            path,
            reason: format!("length {} is not a multiple of the record size", bytes.len()),
        }
    );

    let mut entries = SortedIndexList::with_capacity(bytes.len() / INDEX_ENTRY_SIZE as usize);
    for record in bytes.chunks_exact(INDEX_ENTRY_SIZE as usize) {
        entries.insert(IndexEntry {
            message_id: u64::from_le_bytes(record[0..8].try_into().expect("8-byte slice")),
            offset: u64::from_le_bytes(record[8..16].try_into().expect("8-byte slice")),
            size: u32::from_le_bytes(record[16..20].try_into().expect("4-byte slice")),
            file_id,
        });
    }
    Ok(entries)
}

/// Read the min and max message id of an index file.
///
/// The records are sorted, so only the first and last ids are read.
pub fn read_min_max_from_index_file<P: AsRef<Path>>(path: P) -> Result<(u64, u64)> {
    let path = path.as_ref();
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();

    ensure!(
        len >= INDEX_ENTRY_SIZE && len % INDEX_ENTRY_SIZE == 0,
        CorruptIndexSnafu {
            path,
            reason: format!("length {len} does not hold complete records"),
        }
    );

    let mut buf = [0u8; 8];
    file.read_exact(&mut buf)?;
    let min = u64::from_le_bytes(buf);

    file.seek(SeekFrom::Start(len - INDEX_ENTRY_SIZE))?;
    file.read_exact(&mut buf)?;
    let max = u64::from_le_bytes(buf);

    Ok((min, max))
}
