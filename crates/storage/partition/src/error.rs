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

use std::path::PathBuf;

use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by the partition store.
///
/// Corruption variants are fatal to the operation that hit them; `Io` errors
/// during a fetch stream are delivered on the request's error channel instead
/// of a return value.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(context(false))]
    #[snafu(display("I/O error: {source}"))]
    Io {
        source: std::io::Error,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("Mmap operation failed: {message}"))]
    Mmap {
        message: String,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("{} is not a partition data file", path.display()))]
    CorruptHeader {
        path: PathBuf,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("Unsupported data file version {version} in {}", path.display()))]
    UnsupportedVersion {
        path: PathBuf,
        version: u8,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("Truncated record at offset {offset} in {}", path.display()))]
    TruncatedRecord {
        path: PathBuf,
        offset: u64,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("Index file {} is corrupt: {reason}", path.display()))]
    CorruptIndex {
        path: PathBuf,
        reason: String,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("Data file {} contains no records", path.display()))]
    EmptyDataFile {
        path: PathBuf,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display(
        "Data file {} does not belong to slot {expected} of this partition", path.display()
    ))]
    FileSequenceMismatch {
        path: PathBuf,
        expected: u64,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("Payload of {size} bytes exceeds the record size limit"))]
    PayloadTooLarge {
        size: usize,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("Fetch count must be greater than zero"))]
    InvalidFetchCount {
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("Invalid partition configuration: {message}"))]
    InvalidConfig {
        message: String,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("Partition is closed"))]
    PartitionClosed {
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("Internal error: {message}"))]
    Internal {
        message: String,
        #[snafu(implicit)]
        location: snafu::Location,
    },
}
