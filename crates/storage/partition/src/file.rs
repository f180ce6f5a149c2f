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

//! Data file handles: a positional append writer for the tail and a
//! memory-mapped read-only view for payload fetches.

use std::{
    fs::{File, OpenOptions},
    io::{Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use mmap_io::MemoryMappedFile;

use crate::{
    Result,
    error::MmapSnafu,
    format::{FILE_HEADER_SIZE, file_header},
};

/// Append handle for the tail data file.
///
/// Tracks the write position explicitly: a failed append leaves the position
/// untouched, so the next append overwrites the partial bytes instead of
/// leaving a hole in the framing chain.
pub struct AppendFile {
    file:           File,
    path:           PathBuf,
    write_position: u64,
}

impl AppendFile {
    /// Create a fresh data file and write the magic/version header.
    ///
    /// Truncates any existing file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        file.write_all(&file_header())?;

        Ok(Self {
            file,
            path,
            write_position: FILE_HEADER_SIZE,
        })
    }

    /// Open an existing data file for appending at `write_position`.
    ///
    /// The caller is expected to have validated the header and determined the
    /// position of the last complete record, typically by scanning the file
    /// during recovery.
    pub fn open<P: AsRef<Path>>(path: P, write_position: u64) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().write(true).open(&path)?;

        Ok(Self {
            file,
            path,
            write_position,
        })
    }

    /// Append `buf` at the current write position.
    ///
    /// Returns the byte offset at which the buffer was placed. The position
    /// only advances when the whole buffer was written.
    pub fn append(&mut self, buf: &[u8]) -> Result<u64> {
        let offset = self.write_position;
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(buf)?;
        self.write_position = offset + buf.len() as u64;
        Ok(offset)
    }

    /// Byte offset of the next append.
    #[must_use]
    pub const fn write_position(&self) -> u64 {
        self.write_position
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush file contents to disk.
    pub fn sync(&self) -> Result<()> {
        self.file.sync_data()?;
        Ok(())
    }
}

/// Read-only memory-mapped data file.
///
/// Payload reads during a fetch go through this view; offsets and sizes come
/// from the index and are immutable once assigned, so no locking is needed.
pub struct ReadOnlyDataFile {
    mmap: MemoryMappedFile,
    size: u64,
}

impl ReadOnlyDataFile {
    /// Open an existing data file in read-only mode.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mmap = MemoryMappedFile::open_ro(path.as_ref()).map_err(|e| {
            MmapSnafu {
                message: e.to_string(),
            }
            .build()
        })?;

        let size = mmap.len();

        Ok(Self { mmap, size })
    }

    /// Read data from the specified offset into the provided buffer.
    #[inline]
    pub fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        self.mmap.read_into(offset, buf).map_err(|e| {
            MmapSnafu {
                message: e.to_string(),
            }
            .build()
        })
    }

    /// Get file size.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::format::{MAGIC_NUMBER, record_header};

    #[test]
    fn test_create_writes_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("p-0.msg");

        let file = AppendFile::create(&path).unwrap();
        assert_eq!(file.write_position(), FILE_HEADER_SIZE);

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len() as u64, FILE_HEADER_SIZE);
        assert_eq!(&bytes[0..8], MAGIC_NUMBER.as_slice());
    }

    #[test]
    fn test_append_positions_follow_framing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("p-0.msg");

        let mut file = AppendFile::create(&path).unwrap();

        let payload = b"aaaaaaaaaa";
        let mut frame = record_header(3, payload.len() as u32).to_vec();
        frame.extend_from_slice(payload);
        let first = file.append(&frame).unwrap();
        assert_eq!(first, 9);
        assert_eq!(file.write_position(), 31);

        let second = file.append(&frame).unwrap();
        assert_eq!(second, 31);
        assert_eq!(file.write_position(), 53);
    }

    #[test]
    fn test_read_back_through_mmap() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("p-0.msg");

        let mut file = AppendFile::create(&path).unwrap();
        let payload = b"hello world";
        let mut frame = record_header(1, payload.len() as u32).to_vec();
        frame.extend_from_slice(payload);
        let offset = file.append(&frame).unwrap();
        file.sync().unwrap();

        let reader = ReadOnlyDataFile::open(&path).unwrap();
        assert_eq!(reader.size(), file.write_position());

        let mut buf = vec![0u8; payload.len()];
        reader.read_at(offset + 12, &mut buf).unwrap();
        assert_eq!(&buf, payload);
    }

    #[test]
    fn test_open_resumes_at_position() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("p-0.msg");

        {
            let mut file = AppendFile::create(&path).unwrap();
            file.append(b"0123456789").unwrap();
        }

        let file = AppendFile::open(&path, 19).unwrap();
        assert_eq!(file.write_position(), 19);
    }
}
