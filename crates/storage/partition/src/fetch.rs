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

//! Fetch requests and the streaming result protocol.
//!
//! A fetch delivers its results over three channels:
//!
//! 1. `start` carries the number of matched messages, exactly once, before
//!    any payload.
//! 2. `messages` carries the payloads in ascending id order and closes when
//!    the stream is complete.
//! 3. `errors` carries at most one error; an error terminates the stream.
//!
//! Consumers read `start` first, then drain `messages` until it closes while
//! watching `errors`. The channels are rendezvous channels: an abandoned
//! consumer makes the next send fail, which stops the producer instead of
//! blocking it.

use bytes::Bytes;
use crossbeam::channel::{Receiver, Sender, bounded};

use crate::Error;

/// Search mode of a fetch relative to its start id.
///
/// Results are delivered in ascending id order for every direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchDirection {
    /// Messages with ids at most the start id, keeping the largest ones.
    Backward,
    /// Only a message with exactly the start id.
    #[default]
    Exact,
    /// Messages with ids at least the start id, keeping the smallest ones.
    Forward,
}

/// A fetched message with its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAndId {
    pub id: u64,
    pub message: Bytes,
}

/// A range fetch against a partition, streaming results over channels.
pub struct FetchRequest {
    /// Name of the partition the request addresses. Routing happens outside
    /// the store; the partition itself does not interpret it.
    pub partition: String,
    /// Message id the search starts from.
    pub start_id: u64,
    /// Search mode relative to `start_id`.
    pub direction: FetchDirection,
    /// Maximum number of messages to return.
    pub count: usize,

    pub(crate) start_tx: Sender<usize>,
    pub(crate) message_tx: Sender<MessageAndId>,
    pub(crate) error_tx: Sender<Error>,
}

/// Consumer half of a fetch: the three protocol channels.
pub struct FetchReceivers {
    pub start: Receiver<usize>,
    pub messages: Receiver<MessageAndId>,
    pub errors: Receiver<Error>,
}

impl FetchRequest {
    /// Create a request and the receivers for its results.
    pub fn new<S: Into<String>>(
        partition: S,
        start_id: u64,
        direction: FetchDirection,
        count: usize,
    ) -> (Self, FetchReceivers) {
        let (start_tx, start_rx) = bounded(0);
        let (message_tx, message_rx) = bounded(0);
        let (error_tx, error_rx) = bounded(0);

        (
            Self {
                partition: partition.into(),
                start_id,
                direction,
                count,
                start_tx,
                message_tx,
                error_tx,
            },
            FetchReceivers {
                start: start_rx,
                messages: message_rx,
                errors: error_rx,
            },
        )
    }
}
