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

//! Benchmarks for the partition store.
//!
//! Measures:
//! - Store latency and throughput at different payload sizes
//! - Fetch throughput for ranges spanning several files

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use partition::{FetchDirection, FetchRequest, MessagePartition};
use tempfile::TempDir;

/// Payload sizes to benchmark (bytes).
const PAYLOAD_SIZES: &[usize] = &[11, 1024, 64 * 1024];

fn open_partition(temp_dir: &TempDir) -> MessagePartition {
    MessagePartition::builder(temp_dir.path(), "bench")
        .messages_per_file(10_000)
        .open()
        .unwrap()
}

fn bench_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("store");

    for &size in PAYLOAD_SIZES {
        let payload = vec![b'a'; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &payload, |b, payload| {
            let temp_dir = TempDir::new().unwrap();
            let store = open_partition(&temp_dir);
            let mut id = 0u64;

            b.iter(|| {
                id += 1;
                store.store(id, payload).unwrap();
            });

            store.close().unwrap();
        });
    }

    group.finish();
}

fn bench_fetch(c: &mut Criterion) {
    const MESSAGES: u64 = 20_000;
    const FETCH_COUNT: usize = 1_000;

    let temp_dir = TempDir::new().unwrap();
    let store = open_partition(&temp_dir);
    let payload = vec![b'a'; 1024];
    for id in 1..=MESSAGES {
        store.store(id, &payload).unwrap();
    }

    let mut group = c.benchmark_group("fetch");
    group.throughput(Throughput::Elements(FETCH_COUNT as u64));
    group.bench_function("forward_1k_of_20k", |b| {
        b.iter(|| {
            let (request, receivers) =
                FetchRequest::new("bench", MESSAGES / 2, FetchDirection::Forward, FETCH_COUNT);
            store.fetch(request).unwrap();

            let count = receivers.start.recv().unwrap();
            assert_eq!(count, FETCH_COUNT);
            assert_eq!(receivers.messages.iter().count(), FETCH_COUNT);
        });
    });
    group.finish();

    store.close().unwrap();
}

criterion_group!(benches, bench_store, bench_fetch);
criterion_main!(benches);
