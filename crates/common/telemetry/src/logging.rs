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

//! Global logging setup built on `tracing-subscriber`.
//!
//! Binaries call [`init_global_logging`] once at startup; tests call
//! [`init_default_ut_logging`], which is safe to invoke from any number of
//! test functions.

use std::{
    env,
    sync::{Mutex, Once},
};

use once_cell::sync::Lazy;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default log level filter when neither [`LoggingOptions::level`] nor the
/// `RUST_LOG` environment variable is set.
const DEFAULT_LOG_TARGETS: &str = "info";

/// Configuration options for the logging system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingOptions {
    /// Directory path for storing log files. When non-empty, log files are
    /// created there with hourly rotation; when empty, only stdout logging
    /// is used.
    pub dir: String,

    /// Log level filter string, e.g. "info" or "debug,hyper=warn". Falls
    /// back to `RUST_LOG`, then "info".
    pub level: Option<String>,

    /// Whether to log to stdout in addition to files.
    pub append_stdout: bool,

    /// Maximum number of rotated log files to retain.
    pub max_log_files: usize,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            dir:           String::new(),
            level:         None,
            append_stdout: true,
            max_log_files: 720,
        }
    }
}

/// Global storage for unit test logging worker guards, kept alive for the
/// duration of the test run.
static GLOBAL_UT_LOG_GUARD: Lazy<Mutex<Option<Vec<WorkerGuard>>>> =
    Lazy::new(|| Mutex::new(None));

/// Initialize the global tracing subscriber.
///
/// Returns worker guards that must be kept alive for the lifetime of the
/// application; dropping them stops the background writer threads. Only the
/// first call installs the subscriber, later calls are no-ops.
///
/// # Panics
///
/// Panics when the log directory cannot be prepared or the filter string is
/// invalid, so observability problems surface at startup instead of running
/// silent.
pub fn init_global_logging(app_name: &str, opts: &LoggingOptions) -> Vec<WorkerGuard> {
    static START: Once = Once::new();

    let mut guards = Vec::new();

    START.call_once(|| {
        let filter = opts.level.as_deref().map_or_else(
            || {
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_TARGETS))
            },
            EnvFilter::new,
        );

        let stdout_layer = if opts.append_stdout {
            let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
            guards.push(guard);
            Some(tracing_subscriber::fmt::layer().with_writer(writer))
        } else {
            None
        };

        let file_layer = if opts.dir.is_empty() {
            None
        } else {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::HOURLY)
                .filename_prefix(app_name)
                .max_log_files(opts.max_log_files)
                .build(&opts.dir)
                .expect("initializing rolling file appender failed");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            guards.push(guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false),
            )
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(stdout_layer)
            .with(file_layer)
            .init();
    });

    guards
}

/// Initialize logging for unit tests.
///
/// Writes to files under `UNITTEST_LOG_DIR` (default `/tmp/__unittest_logs`)
/// at the level given by `UNITTEST_LOG_LEVEL` (default `debug`). Safe to call
/// from multiple tests concurrently; only the first call initializes, the
/// guards are parked in a global so the writers survive until the process
/// exits.
pub fn init_default_ut_logging() {
    static START: Once = Once::new();

    START.call_once(|| {
        let mut guard = GLOBAL_UT_LOG_GUARD.lock().unwrap();

        let dir =
            env::var("UNITTEST_LOG_DIR").unwrap_or_else(|_| "/tmp/__unittest_logs".to_string());
        let level = env::var("UNITTEST_LOG_LEVEL").unwrap_or_else(|_| "debug".to_string());

        let opts = LoggingOptions {
            dir: dir.clone(),
            level: Some(level),
            append_stdout: false,
            ..Default::default()
        };
        *guard = Some(init_global_logging("unittest", &opts));

        tracing::info!("logs dir = {dir}");
    });
}
