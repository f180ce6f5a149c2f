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

//! Filename composition and directory scanning for partition file pairs.
//!
//! A file pair shares a base slot value: for the pair with file index `k`,
//! the value is `k * messages_per_file`, rendered as a 20-digit zero-padded
//! decimal. The first pair of partition `myMessages` is therefore
//! `myMessages-00000000000000000000.msg` / `.idx`.

use std::path::{Path, PathBuf};

use crate::Result;

/// Extension of data files.
pub const DATA_FILE_EXT: &str = "msg";

/// Extension of index files.
pub const INDEX_FILE_EXT: &str = "idx";

/// Generates a data file name: `<name>-<value:020>.msg`.
pub fn data_filename<P: AsRef<Path>>(basedir: P, name: &str, value: u64) -> PathBuf {
    basedir
        .as_ref()
        .join(format!("{name}-{value:020}.{DATA_FILE_EXT}"))
}

/// Generates an index file name: `<name>-<value:020>.idx`.
pub fn index_filename<P: AsRef<Path>>(basedir: P, name: &str, value: u64) -> PathBuf {
    basedir
        .as_ref()
        .join(format!("{name}-{value:020}.{INDEX_FILE_EXT}"))
}

/// Scans a partition directory for data files belonging to `name`.
///
/// Returns `(slot value, path)` pairs sorted by slot value. Files of other
/// partitions sharing the directory and files that do not follow the naming
/// scheme are ignored.
pub(crate) fn scan_data_files<P: AsRef<Path>>(
    basedir: P,
    name: &str,
) -> Result<Vec<(u64, PathBuf)>> {
    let mut files = Vec::new();
    let prefix = format!("{name}-");

    for entry in std::fs::read_dir(basedir.as_ref())? {
        let path = entry?.path();

        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some(DATA_FILE_EXT) {
            continue;
        }

        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(value) = stem.strip_prefix(&prefix) else {
            continue;
        };
        if let Ok(value) = value.parse::<u64>() {
            files.push((value, path));
        }
    }

    files.sort_unstable_by_key(|(value, _)| *value);
    Ok(files)
}
