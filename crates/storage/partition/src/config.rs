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

use crate::{MessagePartition, Result};

/// Default number of messages per data file.
pub const DEFAULT_MESSAGES_PER_FILE: u64 = 10_000;

/// Partition configuration, fixed at open time.
///
/// `messages_per_file` determines the rollover point and the filename slot
/// values of every file pair; changing it for an existing directory makes the
/// on-disk layout unreadable, so it cannot be mutated after open.
#[derive(Debug, Clone)]
pub struct PartitionConfig {
    /// Directory holding the partition's file pairs.
    pub basedir: PathBuf,
    /// Partition name, used as the filename prefix.
    pub name: String,
    /// Number of messages after which the tail file rolls over.
    pub messages_per_file: u64,
    /// Fsync the data file after every append. Rollover and close always
    /// sync regardless.
    pub sync_writes: bool,
}

impl PartitionConfig {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(basedir: P, name: S) -> Self {
        Self {
            basedir: basedir.into(),
            name: name.into(),
            messages_per_file: DEFAULT_MESSAGES_PER_FILE,
            sync_writes: false,
        }
    }
}

/// Builder for opening a [`MessagePartition`].
pub struct PartitionBuilder {
    config: PartitionConfig,
}

impl PartitionBuilder {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(basedir: P, name: S) -> Self {
        Self {
            config: PartitionConfig::new(basedir, name),
        }
    }

    #[must_use]
    pub const fn messages_per_file(mut self, messages_per_file: u64) -> Self {
        self.config.messages_per_file = messages_per_file;
        self
    }

    #[must_use]
    pub const fn sync_writes(mut self, sync_writes: bool) -> Self {
        self.config.sync_writes = sync_writes;
        self
    }

    /// Open the partition, recovering any state already on disk.
    pub fn open(self) -> Result<MessagePartition> {
        MessagePartition::open(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_default_config() {
        let builder = PartitionBuilder::new("/tmp/test_partition", "events");
        assert_eq!(
            builder.config.basedir,
            PathBuf::from("/tmp/test_partition")
        );
        assert_eq!(builder.config.name, "events");
        assert_eq!(builder.config.messages_per_file, DEFAULT_MESSAGES_PER_FILE);
        assert!(!builder.config.sync_writes);
    }

    #[test]
    fn test_builder_custom_config() {
        let builder = PartitionBuilder::new("/tmp/test_partition", "events")
            .messages_per_file(5)
            .sync_writes(true);

        assert_eq!(builder.config.messages_per_file, 5);
        assert!(builder.config.sync_writes);
    }
}
