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

//! The partition: a named, directory-scoped message log.
//!
//! A partition coordinates the id allocator, the tail file pair, the file
//! cache and the in-memory tail index. Writes append to the tail data file
//! and roll over to the next file pair once `messages_per_file` records have
//! accumulated; reads resolve a [`FetchRequest`] into an id-ordered entry
//! list across files and stream the payloads on a background thread.
//!
//! ## Usage
//!
//! ```ignore
//! let store = MessagePartition::builder("/var/lib/relay", "events").open()?;
//!
//! let (id, _timestamp) = store.generate_next_msg_id(1)?;
//! store.store(id, b"payload")?;
//!
//! let (request, receivers) = FetchRequest::new("events", id, FetchDirection::Exact, 1);
//! store.fetch(request)?;
//! let expected = receivers.start.recv()?;
//! for message in receivers.messages.iter() { /* ... */ }
//!
//! store.close()?;
//! ```
//!
//! A partition is safe to share between threads. `store` serializes writers
//! behind a write lock; fetches only hold the read lock while they snapshot
//! the entries they need, never during payload I/O.

use std::{
    collections::{HashMap, hash_map},
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
    thread,
};

use bytes::Bytes;
use snafu::ensure;
use tracing::{debug, info, warn};

use crate::{
    Result,
    allocator::MsgIdAllocator,
    cache::{FileCache, FileCacheEntry},
    config::{PartitionBuilder, PartitionConfig},
    error::{
        EmptyDataFileSnafu, FileSequenceMismatchSnafu, InternalSnafu, InvalidConfigSnafu,
        InvalidFetchCountSnafu, PartitionClosedSnafu, PayloadTooLargeSnafu, TruncatedRecordSnafu,
    },
    fetch::{FetchDirection, FetchRequest, MessageAndId},
    file::{AppendFile, ReadOnlyDataFile},
    format::{self, RECORD_HEADER_SIZE, record_header},
    index::{self, IndexEntry, SortedIndexList},
    path,
};

/// A file-backed partitioned message log.
///
/// Stores messages under monotonic 64-bit ids in a rolling set of
/// fixed-capacity data files with companion index files, and serves ordered
/// range fetches that may span file boundaries.
pub struct MessagePartition {
    config: PartitionConfig,
    state:  RwLock<PartitionState>,
}

impl std::fmt::Debug for MessagePartition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagePartition").finish_non_exhaustive()
    }
}

/// Mutable partition state behind the lock.
struct PartitionState {
    closed:         bool,
    tail:           Option<TailFile>,
    cache:          FileCache,
    max_message_id: u64,
    allocator:      MsgIdAllocator,
}

/// The currently open file pair receiving writes.
struct TailFile {
    file_id: u32,
    data:    AppendFile,
    index:   SortedIndexList,
}

impl MessagePartition {
    /// Start building a partition rooted at `basedir` with the given name.
    pub fn builder<P: Into<PathBuf>, S: Into<String>>(basedir: P, name: S) -> PartitionBuilder {
        PartitionBuilder::new(basedir, name)
    }

    /// Open the partition, creating `basedir` if needed and recovering all
    /// state already on disk.
    pub fn open(config: PartitionConfig) -> Result<Self> {
        ensure!(
            config.messages_per_file > 0,
            InvalidConfigSnafu {
                message: "messages_per_file must be at least 1",
            }
        );

        std::fs::create_dir_all(&config.basedir)?;
        let state = Self::recover(&config)?;

        info!(
            partition = %config.name,
            basedir = ?config.basedir,
            files = state.cache.len(),
            max_message_id = state.max_message_id,
            "partition opened"
        );

        Ok(Self {
            config,
            state: RwLock::new(state),
        })
    }

    /// Store a message under the given id.
    ///
    /// Ids may arrive in any order; physical append order and id order are
    /// decoupled by the index. The caller guarantees that externally supplied
    /// ids are unique within the partition.
    pub fn store(&self, id: u64, payload: &[u8]) -> Result<()> {
        ensure!(
            u32::try_from(payload.len()).is_ok(),
            PayloadTooLargeSnafu {
                size: payload.len(),
            }
        );

        let mut guard = self.write_state();
        let state = &mut *guard;
        ensure!(!state.closed, PartitionClosedSnafu);

        let tail_full = match state.tail.as_ref() {
            None => {
                state.tail = Some(Self::create_tail(&self.config, 0)?);
                false
            }
            Some(tail) => tail.index.len() as u64 >= self.config.messages_per_file,
        };
        if tail_full {
            Self::rollover(&self.config, state)?;
        }

        let Some(tail) = state.tail.as_mut() else {
            return InternalSnafu {
                message: "tail file unavailable after rollover",
            }
            .fail();
        };

        let size = payload.len() as u32;
        let mut frame = Vec::with_capacity(RECORD_HEADER_SIZE as usize + payload.len());
        frame.extend_from_slice(&record_header(id, size));
        frame.extend_from_slice(payload);

        // The index entry must only exist once the data write succeeded.
        let record_offset = tail.data.append(&frame)?;
        if self.config.sync_writes {
            tail.data.sync()?;
        }

        tail.index.insert(IndexEntry {
            message_id: id,
            offset: record_offset + RECORD_HEADER_SIZE,
            size,
            file_id: tail.file_id,
        });
        state.cache.note_write(tail.file_id, id);
        if id > state.max_message_id {
            state.max_message_id = id;
        }

        debug!(id, offset = record_offset, size, "stored message");
        Ok(())
    }

    /// Resolve a fetch request and stream its results.
    ///
    /// The entry list is computed synchronously; payloads are then delivered
    /// on a background thread over the request's channels. See
    /// [`FetchRequest`] for the channel protocol.
    pub fn fetch(&self, request: FetchRequest) -> Result<()> {
        let list = self.calculate_fetch_list(&request)?;

        debug!(
            partition = %self.config.name,
            start_id = request.start_id,
            matches = list.len(),
            "starting fetch stream"
        );

        let config = self.config.clone();
        thread::Builder::new()
            .name("partition-fetch".into())
            .spawn(move || stream_fetch_list(&config, list, &request))?;

        Ok(())
    }

    /// The largest id ever stored in this partition.
    pub fn max_message_id(&self) -> Result<u64> {
        let guard = self.read_state();
        ensure!(!guard.closed, PartitionClosedSnafu);
        Ok(guard.max_message_id)
    }

    /// Generate the next cluster-wide message id for `node_id`.
    ///
    /// Returns the id and the millisecond timestamp embedded in it. Ids keep
    /// increasing across restarts because the allocator resumes above the
    /// largest stored id.
    pub fn generate_next_msg_id(&self, node_id: u16) -> Result<(u64, i64)> {
        let mut guard = self.write_state();
        ensure!(!guard.closed, PartitionClosedSnafu);
        Ok(guard.allocator.next(node_id))
    }

    /// Flush the tail index to its `.idx` file and close all handles.
    ///
    /// Further operations fail with [`Error::PartitionClosed`]; closing an
    /// already closed partition is a no-op.
    ///
    /// [`Error::PartitionClosed`]: crate::Error::PartitionClosed
    pub fn close(&self) -> Result<()> {
        let mut guard = self.write_state();
        let state = &mut *guard;
        if state.closed {
            return Ok(());
        }

        if let Some(tail) = state.tail.take() {
            let value = u64::from(tail.file_id) * self.config.messages_per_file;
            let idx_path = path::index_filename(&self.config.basedir, &self.config.name, value);
            index::write_index_file(&idx_path, &tail.index)?;
            tail.data.sync()?;
        }

        state.closed = true;
        info!(partition = %self.config.name, "partition closed");
        Ok(())
    }

    /// Compute the id-ordered entry list for a request.
    ///
    /// Candidate files come from the file cache; only their indexes are
    /// consulted (the tail index from memory, closed files from disk). The
    /// result is ascending by id for every direction.
    pub(crate) fn calculate_fetch_list(&self, request: &FetchRequest) -> Result<SortedIndexList> {
        ensure!(request.count > 0, InvalidFetchCountSnafu);

        let guard = self.read_state();
        let state = &*guard;
        ensure!(!state.closed, PartitionClosedSnafu);

        let mut list = SortedIndexList::new();
        match request.direction {
            FetchDirection::Exact => {
                for file_id in state.cache.files_for_id(request.start_id) {
                    let entries = Self::file_entries(&self.config, state, file_id)?;
                    if let Some(entry) = entries.lookup(request.start_id) {
                        list.insert(*entry);
                        break;
                    }
                }
            }
            FetchDirection::Forward => {
                for file_id in state.cache.files_for_range(request.start_id, u64::MAX) {
                    let entries = Self::file_entries(&self.config, state, file_id)?;
                    for entry in entries.iter().filter(|e| e.message_id >= request.start_id) {
                        list.insert(*entry);
                    }
                }
                list.keep_first(request.count);
            }
            FetchDirection::Backward => {
                for file_id in state.cache.files_for_range(0, request.start_id) {
                    let entries = Self::file_entries(&self.config, state, file_id)?;
                    for entry in entries.iter().filter(|e| e.message_id <= request.start_id) {
                        list.insert(*entry);
                    }
                }
                list.keep_last(request.count);
            }
        }

        Ok(list)
    }

    /// All index entries of one file: the in-memory index for the tail, the
    /// `.idx` file for closed files. A missing `.idx` falls back to scanning
    /// the data file.
    fn file_entries(
        config: &PartitionConfig,
        state: &PartitionState,
        file_id: u32,
    ) -> Result<SortedIndexList> {
        if let Some(tail) = state.tail.as_ref()
            && tail.file_id == file_id
        {
            return Ok(tail.index.clone());
        }

        let value = u64::from(file_id) * config.messages_per_file;
        let idx_path = path::index_filename(&config.basedir, &config.name, value);
        if idx_path.exists() {
            return index::read_index_file(&idx_path, file_id);
        }

        let data_path = path::data_filename(&config.basedir, &config.name, value);
        warn!(path = ?idx_path, "index file missing for closed data file, rescanning");
        let scan = format::scan_data_file(&data_path)?;
        ensure!(
            !scan.truncated,
            TruncatedRecordSnafu {
                path:   data_path,
                offset: scan.write_position,
            }
        );

        let mut entries = SortedIndexList::with_capacity(scan.records.len());
        for record in &scan.records {
            entries.insert(IndexEntry {
                message_id: record.message_id,
                offset: record.offset,
                size: record.size,
                file_id,
            });
        }
        Ok(entries)
    }

    /// Rebuild the in-memory state from the files on disk.
    fn recover(config: &PartitionConfig) -> Result<PartitionState> {
        let files = path::scan_data_files(&config.basedir, &config.name)?;

        let mut cache = FileCache::new();
        let mut max_message_id = 0u64;
        let mut tail = None;

        for (i, (value, data_path)) in files.iter().enumerate() {
            let expected = i as u64 * config.messages_per_file;
            ensure!(
                *value == expected,
                FileSequenceMismatchSnafu {
                    path: data_path,
                    expected,
                }
            );
            let file_id = i as u32;

            if i + 1 == files.len() {
                let tail_file = Self::recover_tail(config, file_id, data_path)?;
                if let (Some(first), Some(last)) = (tail_file.index.first(), tail_file.index.last())
                {
                    cache.push(FileCacheEntry {
                        min_id: first.message_id,
                        max_id: last.message_id,
                    });
                    max_message_id = max_message_id.max(last.message_id);
                }
                tail = Some(tail_file);
            } else {
                let (min_id, max_id) = Self::recover_closed_file(config, file_id, data_path)?;
                cache.push(FileCacheEntry { min_id, max_id });
                max_message_id = max_message_id.max(max_id);
            }
        }

        Ok(PartitionState {
            closed: false,
            tail,
            cache,
            max_message_id,
            allocator: MsgIdAllocator::resume_after(max_message_id),
        })
    }

    /// Recover the id range of a closed file from its `.idx`, rescanning the
    /// data file and re-emitting the index when it is missing.
    fn recover_closed_file(
        config: &PartitionConfig,
        file_id: u32,
        data_path: &Path,
    ) -> Result<(u64, u64)> {
        let value = u64::from(file_id) * config.messages_per_file;
        let idx_path = path::index_filename(&config.basedir, &config.name, value);

        if idx_path.exists() {
            return index::read_min_max_from_index_file(&idx_path);
        }

        warn!(path = ?idx_path, "index file missing for closed data file, rebuilding");
        let scan = format::scan_data_file(data_path)?;
        ensure!(
            !scan.truncated,
            TruncatedRecordSnafu {
                path:   data_path,
                offset: scan.write_position,
            }
        );

        let mut entries = SortedIndexList::with_capacity(scan.records.len());
        for record in &scan.records {
            entries.insert(IndexEntry {
                message_id: record.message_id,
                offset: record.offset,
                size: record.size,
                file_id,
            });
        }

        let (Some(first), Some(last)) = (entries.first(), entries.last()) else {
            return EmptyDataFileSnafu { path: data_path }.fail();
        };
        let range = (first.message_id, last.message_id);

        index::write_index_file(&idx_path, &entries)?;
        Ok(range)
    }

    /// Recover the tail: the data file is always rescanned, its `.idx` is
    /// not trusted.
    fn recover_tail(config: &PartitionConfig, file_id: u32, data_path: &Path) -> Result<TailFile> {
        if std::fs::metadata(data_path)?.len() == 0 {
            warn!(path = ?data_path, "empty tail data file, rewriting header");
            return Ok(TailFile {
                file_id,
                data: AppendFile::create(data_path)?,
                index: SortedIndexList::new(),
            });
        }

        let scan = format::scan_data_file(data_path)?;
        if scan.truncated {
            warn!(
                path = ?data_path,
                position = scan.write_position,
                "tail ends in a partial record, resuming after the last complete record"
            );
        }

        let mut tail_index = SortedIndexList::with_capacity(scan.records.len());
        for record in &scan.records {
            tail_index.insert(IndexEntry {
                message_id: record.message_id,
                offset: record.offset,
                size: record.size,
                file_id,
            });
        }

        let data = AppendFile::open(data_path, scan.write_position)?;
        debug!(path = ?data_path, records = tail_index.len(), "recovered tail file");

        Ok(TailFile {
            file_id,
            data,
            index: tail_index,
        })
    }

    /// Open the file pair for `file_id` as the new tail.
    fn create_tail(config: &PartitionConfig, file_id: u32) -> Result<TailFile> {
        let value = u64::from(file_id) * config.messages_per_file;
        let data_path = path::data_filename(&config.basedir, &config.name, value);
        let data = AppendFile::create(&data_path)?;
        debug!(path = ?data_path, "created data file");

        Ok(TailFile {
            file_id,
            data,
            index: SortedIndexList::new(),
        })
    }

    /// Flush the full tail to its `.idx` and switch writes to the next file
    /// pair. The old tail handle is only released once the new one exists.
    fn rollover(config: &PartitionConfig, state: &mut PartitionState) -> Result<()> {
        let Some(tail) = state.tail.as_mut() else {
            return Ok(());
        };

        let value = u64::from(tail.file_id) * config.messages_per_file;
        let idx_path = path::index_filename(&config.basedir, &config.name, value);
        index::write_index_file(&idx_path, &tail.index)?;
        tail.data.sync()?;

        let next_id = tail.file_id + 1;
        state.tail = Some(Self::create_tail(config, next_id)?);

        info!(partition = %config.name, file = next_id, "rolled over to next data file");
        Ok(())
    }

    fn read_state(&self) -> RwLockReadGuard<'_, PartitionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, PartitionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Deliver a computed fetch list over the request's channels.
///
/// Runs without any partition lock: the entries' offsets and sizes are
/// immutable once assigned. Data files are opened read-only on demand and
/// kept for the duration of the stream. Any failed send means the consumer
/// is gone and stops the stream.
fn stream_fetch_list(config: &PartitionConfig, list: SortedIndexList, request: &FetchRequest) {
    if request.start_tx.send(list.len()).is_err() {
        return;
    }

    let mut files: HashMap<u32, ReadOnlyDataFile> = HashMap::new();

    for entry in list {
        let file = match files.entry(entry.file_id) {
            hash_map::Entry::Occupied(slot) => slot.into_mut(),
            hash_map::Entry::Vacant(slot) => {
                let value = u64::from(entry.file_id) * config.messages_per_file;
                let data_path = path::data_filename(&config.basedir, &config.name, value);
                match ReadOnlyDataFile::open(&data_path) {
                    Ok(file) => slot.insert(file),
                    Err(err) => {
                        let _ = request.error_tx.send(err);
                        return;
                    }
                }
            }
        };

        let mut payload = vec![0u8; entry.size as usize];
        if let Err(err) = file.read_at(entry.offset, &mut payload) {
            let _ = request.error_tx.send(err);
            return;
        }

        let message = MessageAndId {
            id:      entry.message_id,
            message: Bytes::from(payload),
        };
        if request.message_tx.send(message).is_err() {
            debug!("fetch consumer disconnected, aborting stream");
            return;
        }
    }

    // Dropping the request closes the message channel, ending the stream.
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::Error;

    const MSG_DATA: &[u8] = b"aaaaaaaaaa";

    /// Ids stored by the golden fixture, in write order. With five messages
    /// per file they land in three files:
    /// file 0 = [3, 4, 10, 9, 5], file 1 = [8, 15, 13, 22, 23],
    /// file 2 = [24, 26, 30].
    const GOLDEN_IDS: [u64; 13] = [3, 4, 10, 9, 5, 8, 15, 13, 22, 23, 24, 26, 30];

    fn golden_store(dir: &std::path::Path) -> MessagePartition {
        let store = MessagePartition::builder(dir, "myMessages")
            .messages_per_file(5)
            .open()
            .unwrap();
        for id in GOLDEN_IDS {
            store.store(id, MSG_DATA).unwrap();
        }
        store
    }

    fn entries_of(list: &SortedIndexList) -> Vec<(u64, u64, u32, u32)> {
        list.iter()
            .map(|e| (e.message_id, e.offset, e.size, e.file_id))
            .collect()
    }

    #[test]
    fn test_calculate_fetch_list() {
        let temp_dir = TempDir::new().unwrap();
        let store = golden_store(temp_dir.path());

        // (description, start_id, direction, count, expected entries as
        // (message_id, offset, size, file_id))
        let cases: Vec<(&str, u64, FetchDirection, usize, Vec<(u64, u64, u32, u32)>)> = vec![
            (
                "direct match",
                3,
                FetchDirection::Exact,
                1,
                vec![(3, 21, 10, 0)],
            ),
            (
                "direct match in second file",
                8,
                FetchDirection::Exact,
                1,
                vec![(8, 21, 10, 1)],
            ),
            (
                "direct match in second file, not first position",
                13,
                FetchDirection::Exact,
                1,
                vec![(13, 65, 10, 1)],
            ),
            (
                "entry before matches",
                5,
                FetchDirection::Backward,
                2,
                vec![(4, 43, 10, 0), (5, 109, 10, 0)],
            ),
            ("backward, no match", 1, FetchDirection::Backward, 1, vec![]),
            (
                "forward, no match (out of files)",
                99_999_999_999,
                FetchDirection::Forward,
                1,
                vec![],
            ),
            (
                "forward, no match (after last id in last file)",
                31,
                FetchDirection::Forward,
                1,
                vec![],
            ),
            (
                "forward, overlapping files",
                9,
                FetchDirection::Forward,
                3,
                vec![(9, 87, 10, 0), (10, 65, 10, 0), (13, 65, 10, 1)],
            ),
            (
                "backward, overlapping files",
                26,
                FetchDirection::Backward,
                4,
                vec![
                    (22, 87, 10, 1),
                    (23, 109, 10, 1),
                    (24, 21, 10, 2),
                    (26, 43, 10, 2),
                ],
            ),
            (
                "forward, over more than two files",
                5,
                FetchDirection::Forward,
                10,
                vec![
                    (5, 109, 10, 0),
                    (8, 21, 10, 1),
                    (9, 87, 10, 0),
                    (10, 65, 10, 0),
                    (13, 65, 10, 1),
                    (15, 43, 10, 1),
                    (22, 87, 10, 1),
                    (23, 109, 10, 1),
                    (24, 21, 10, 2),
                    (26, 43, 10, 2),
                ],
            ),
        ];

        for (description, start_id, direction, count, expected) in cases {
            let (request, _receivers) =
                FetchRequest::new("myMessages", start_id, direction, count);
            let list = store.calculate_fetch_list(&request).unwrap();
            assert_eq!(entries_of(&list), expected, "testcase: {description}");
        }

        store.close().unwrap();
    }

    #[test]
    fn test_rollover_file_counts() {
        let temp_dir = TempDir::new().unwrap();
        let store = golden_store(temp_dir.path());
        store.close().unwrap();

        let files = path::scan_data_files(temp_dir.path(), "myMessages").unwrap();
        let values: Vec<u64> = files.iter().map(|(value, _)| *value).collect();
        assert_eq!(values, vec![0, 5, 10]);

        for (_, data_path) in &files {
            let scan = format::scan_data_file(data_path).unwrap();
            assert!(scan.records.len() <= 5);
            assert!(!scan.truncated);
        }
    }

    #[test]
    fn test_zero_count_fetch_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = golden_store(temp_dir.path());

        let (request, _receivers) = FetchRequest::new("myMessages", 3, FetchDirection::Exact, 0);
        assert!(matches!(
            store.calculate_fetch_list(&request).unwrap_err(),
            Error::InvalidFetchCount { .. }
        ));

        store.close().unwrap();
    }

    #[test]
    fn test_closed_partition_rejects_operations() {
        let temp_dir = TempDir::new().unwrap();
        let store = MessagePartition::builder(temp_dir.path(), "myMessages")
            .open()
            .unwrap();

        store.store(1, MSG_DATA).unwrap();
        store.close().unwrap();
        // Closing twice is fine.
        store.close().unwrap();

        assert!(matches!(
            store.store(2, MSG_DATA).unwrap_err(),
            Error::PartitionClosed { .. }
        ));
        assert!(matches!(
            store.max_message_id().unwrap_err(),
            Error::PartitionClosed { .. }
        ));
        assert!(matches!(
            store.generate_next_msg_id(1).unwrap_err(),
            Error::PartitionClosed { .. }
        ));

        let (request, _receivers) = FetchRequest::new("myMessages", 1, FetchDirection::Exact, 1);
        assert!(matches!(
            store.fetch(request).unwrap_err(),
            Error::PartitionClosed { .. }
        ));
    }

    #[test]
    fn test_max_message_id_tracks_stores() {
        let temp_dir = TempDir::new().unwrap();
        let store = MessagePartition::builder(temp_dir.path(), "myMessages")
            .open()
            .unwrap();

        assert_eq!(store.max_message_id().unwrap(), 0);
        store.store(7, MSG_DATA).unwrap();
        store.store(3, MSG_DATA).unwrap();
        assert_eq!(store.max_message_id().unwrap(), 7);

        store.close().unwrap();
    }

    #[test]
    fn test_missing_index_is_rebuilt_on_open() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = golden_store(temp_dir.path());
            store.close().unwrap();
        }

        let idx_path = path::index_filename(temp_dir.path(), "myMessages", 0);
        std::fs::remove_file(&idx_path).unwrap();

        let store = MessagePartition::builder(temp_dir.path(), "myMessages")
            .messages_per_file(5)
            .open()
            .unwrap();

        assert!(idx_path.exists());
        let (min, max) = index::read_min_max_from_index_file(&idx_path).unwrap();
        assert_eq!((min, max), (3, 10));

        store.close().unwrap();
    }

    #[test]
    fn test_mismatched_messages_per_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = golden_store(temp_dir.path());
            store.close().unwrap();
        }

        let err = MessagePartition::builder(temp_dir.path(), "myMessages")
            .messages_per_file(100)
            .open()
            .unwrap_err();
        assert!(matches!(err, Error::FileSequenceMismatch { .. }));
    }

    #[test]
    fn test_sync_writes_mode() {
        let temp_dir = TempDir::new().unwrap();
        let store = MessagePartition::builder(temp_dir.path(), "myMessages")
            .sync_writes(true)
            .open()
            .unwrap();

        store.store(1, MSG_DATA).unwrap();
        store.close().unwrap();
    }
}
