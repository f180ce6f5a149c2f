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

//! On-disk format of partition data files.
//!
//! ## Data File Format
//!
//! Each `.msg` file starts with a fixed header followed by a sequence of
//! framed records:
//!
//! ```text
//! ┌──────────────────┬──────────────┐
//! │ magic (8B)       │ version (1B) │          file header, 9 bytes
//! ├──────────────────┼──────────────┼─────────────────────┐
//! │ message id (8B)  │ size (4B)    │ payload (size bytes)│  record
//! ├──────────────────┼──────────────┼─────────────────────┤
//! │ message id (8B)  │ size (4B)    │ payload (size bytes)│  record
//! └──────────────────┴──────────────┴─────────────────────┘
//! ```
//!
//! All integers are little-endian. Records appear in write order, which is
//! independent of message-id order; the companion index file restores id
//! order. The first payload of a fresh file sits at byte 21.

use std::{
    fs::File,
    io::{BufReader, Read, Seek, SeekFrom},
    path::Path,
};

use snafu::ensure;

use crate::error::{CorruptHeaderSnafu, Result, UnsupportedVersionSnafu};

/// Magic bytes identifying a partition data file.
pub const MAGIC_NUMBER: [u8; 8] = *b"RELAYMSG";

/// Current data file format version.
pub const FORMAT_VERSION: u8 = 1;

/// Size of the data file header (magic + version).
pub const FILE_HEADER_SIZE: u64 = 9;

/// Size of the per-record framing header (message id + payload size).
pub const RECORD_HEADER_SIZE: u64 = 12;

/// Serialize the file header into a fixed buffer.
pub(crate) fn file_header() -> [u8; FILE_HEADER_SIZE as usize] {
    let mut header = [0u8; FILE_HEADER_SIZE as usize];
    header[0..8].copy_from_slice(&MAGIC_NUMBER);
    header[8] = FORMAT_VERSION;
    header
}

/// Serialize a record framing header for the given id and payload size.
pub(crate) fn record_header(message_id: u64, size: u32) -> [u8; RECORD_HEADER_SIZE as usize] {
    let mut header = [0u8; RECORD_HEADER_SIZE as usize];
    header[0..8].copy_from_slice(&message_id.to_le_bytes());
    header[8..12].copy_from_slice(&size.to_le_bytes());
    header
}

/// A record located while scanning a data file.
///
/// `offset` is the absolute byte position of the payload, past the framing
/// header.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScannedRecord {
    pub message_id: u64,
    pub offset:     u64,
    pub size:       u32,
}

/// Result of walking all records of a data file.
#[derive(Debug)]
pub(crate) struct DataFileScan {
    /// Records in physical (write) order.
    pub records:        Vec<ScannedRecord>,
    /// Byte position right after the last complete record.
    pub write_position: u64,
    /// Whether the file ends in a partial record.
    pub truncated:      bool,
}

/// Walk a data file record by record.
///
/// Verifies the file header, then follows the framing chain. A partial record
/// at the end of the file stops the scan and is reported via `truncated`; the
/// caller decides whether that is tolerable (crashed tail) or fatal (closed
/// file).
pub(crate) fn scan_data_file(path: &Path) -> Result<DataFileScan> {
    let file = File::open(path)?;
    let file_size = file.metadata()?.len();
    let mut reader = BufReader::new(file);

    ensure!(file_size >= FILE_HEADER_SIZE, CorruptHeaderSnafu { path });

    let mut header = [0u8; FILE_HEADER_SIZE as usize];
    reader.read_exact(&mut header)?;
    ensure!(header[0..8] == MAGIC_NUMBER, CorruptHeaderSnafu { path });
    ensure!(
        header[8] == FORMAT_VERSION,
        UnsupportedVersionSnafu {
            path,
            version: header[8],
        }
    );

    let mut records = Vec::new();
    let mut position = FILE_HEADER_SIZE;
    let mut truncated = false;

    loop {
        if position == file_size {
            break;
        }
        if position + RECORD_HEADER_SIZE > file_size {
            truncated = true;
            break;
        }

        let mut frame = [0u8; RECORD_HEADER_SIZE as usize];
        reader.read_exact(&mut frame)?;
        let message_id = u64::from_le_bytes(frame[0..8].try_into().expect("8-byte slice"));
        let size = u32::from_le_bytes(frame[8..12].try_into().expect("4-byte slice"));

        if position + RECORD_HEADER_SIZE + u64::from(size) > file_size {
            truncated = true;
            break;
        }

        records.push(ScannedRecord {
            message_id,
            offset: position + RECORD_HEADER_SIZE,
            size,
        });

        reader.seek(SeekFrom::Current(i64::from(size)))?;
        position += RECORD_HEADER_SIZE + u64::from(size);
    }

    Ok(DataFileScan {
        records,
        write_position: position,
        truncated,
    })
}
