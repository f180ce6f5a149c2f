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

//! In-memory summary of every file pair's id range.
//!
//! The cache holds one `(min_id, max_id)` entry per data file, positioned by
//! file index. Fetches consult it to pick candidate files without opening a
//! single index file; files whose range cannot contain the requested ids are
//! skipped entirely. The tail entry widens as writes arrive; entries of
//! closed files are immutable.

/// Id range of one data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileCacheEntry {
    pub min_id: u64,
    pub max_id: u64,
}

impl FileCacheEntry {
    /// Whether `id` falls inside the closed interval `[min_id, max_id]`.
    #[must_use]
    pub const fn contains(&self, id: u64) -> bool {
        self.min_id <= id && id <= self.max_id
    }

    /// Whether the entry's range intersects the closed interval `[from, to]`.
    #[must_use]
    pub const fn intersects(&self, from: u64, to: u64) -> bool {
        self.min_id <= to && from <= self.max_id
    }
}

/// Ordered id-range summaries for all file pairs of a partition.
#[derive(Debug, Default)]
pub struct FileCache {
    entries: Vec<FileCacheEntry>,
}

impl FileCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, file_id: u32) -> Option<FileCacheEntry> {
        self.entries.get(file_id as usize).copied()
    }

    /// Append the summary of the next file, returning its file id.
    pub fn push(&mut self, entry: FileCacheEntry) -> u32 {
        self.entries.push(entry);
        (self.entries.len() - 1) as u32
    }

    /// Record a write of `id` into the file `file_id`.
    ///
    /// Widens the existing entry, or creates one when this is the first
    /// message of a fresh tail file. Only the tail may gain a new entry, so
    /// `file_id` is expected to be at most the current length.
    pub fn note_write(&mut self, file_id: u32, id: u64) {
        debug_assert!(file_id as usize <= self.entries.len());

        if let Some(entry) = self.entries.get_mut(file_id as usize) {
            entry.min_id = entry.min_id.min(id);
            entry.max_id = entry.max_id.max(id);
        } else {
            self.entries.push(FileCacheEntry {
                min_id: id,
                max_id: id,
            });
        }
    }

    /// Every file whose id range includes `id`.
    #[must_use]
    pub fn files_for_id(&self, id: u64) -> Vec<u32> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.contains(id))
            .map(|(file_id, _)| file_id as u32)
            .collect()
    }

    /// Every file whose id range intersects the closed interval `[from, to]`.
    #[must_use]
    pub fn files_for_range(&self, from: u64, to: u64) -> Vec<u32> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.intersects(from, to))
            .map(|(file_id, _)| file_id as u32)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_of(ranges: &[(u64, u64)]) -> FileCache {
        let mut cache = FileCache::new();
        for (min_id, max_id) in ranges {
            cache.push(FileCacheEntry {
                min_id: *min_id,
                max_id: *max_id,
            });
        }
        cache
    }

    #[test]
    fn test_files_for_id_overlapping_ranges() {
        let cache = cache_of(&[(3, 10), (8, 23), (24, 30)]);

        assert_eq!(cache.files_for_id(9), vec![0, 1]);
        assert_eq!(cache.files_for_id(24), vec![2]);
        assert!(cache.files_for_id(1).is_empty());
        assert!(cache.files_for_id(31).is_empty());
    }

    #[test]
    fn test_files_for_range() {
        let cache = cache_of(&[(3, 10), (8, 23), (24, 30)]);

        assert_eq!(cache.files_for_range(9, u64::MAX), vec![0, 1, 2]);
        assert_eq!(cache.files_for_range(0, 5), vec![0]);
        assert_eq!(cache.files_for_range(11, 23), vec![1]);
        assert!(cache.files_for_range(31, u64::MAX).is_empty());
    }

    #[test]
    fn test_note_write_widens_tail() {
        let mut cache = FileCache::new();

        cache.note_write(0, 7);
        assert_eq!(
            cache.get(0).unwrap(),
            FileCacheEntry {
                min_id: 7,
                max_id: 7
            }
        );

        cache.note_write(0, 3);
        cache.note_write(0, 12);
        assert_eq!(
            cache.get(0).unwrap(),
            FileCacheEntry {
                min_id: 3,
                max_id: 12
            }
        );

        // First write into a rolled-over tail creates the next entry.
        cache.note_write(1, 20);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.files_for_id(20), vec![1]);
    }
}
