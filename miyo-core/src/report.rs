//! Structured error reporting
//!
//! Failing storage operations hand an [`ErrorRecord`] to an [`ErrorSink`]
//! before returning the error to the caller.

use crate::error::StorageError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

/// Default capacity of [`MemoryErrorSink`]
pub const DEFAULT_MAX_RECORDS: usize = 1000;

/// A single reported failure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorRecord {
    pub timestamp: DateTime<Utc>,
    pub code: String,
    pub message: String,
    pub user_message: String,
    pub operation: String,
    pub context: BTreeMap<String, String>,
}

impl ErrorRecord {
    /// Build a record for a failed operation
    pub fn from_error(operation: &str, error: &StorageError) -> Self {
        let mut context = BTreeMap::new();
        if let Some(path) = error.path() {
            context.insert("path".to_string(), path.display().to_string());
        }

        Self {
            timestamp: Utc::now(),
            code: error.code().to_string(),
            message: error.to_string(),
            user_message: error.user_message(),
            operation: operation.to_string(),
            context,
        }
    }

    /// Attach an extra context entry
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

/// Receiver of structured error records
pub trait ErrorSink: Send + Sync {
    fn record(&self, record: ErrorRecord);
}

/// Emits every record as a `tracing` error event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn record(&self, record: ErrorRecord) {
        tracing::error!(
            code = %record.code,
            operation = %record.operation,
            context = ?record.context,
            "{}",
            record.message
        );
    }
}

/// Keeps the most recent records in memory
pub struct MemoryErrorSink {
    records: Mutex<VecDeque<ErrorRecord>>,
    max_records: usize,
}

impl Default for MemoryErrorSink {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_RECORDS)
    }
}

impl MemoryErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(max_records: usize) -> Self {
        Self {
            records: Mutex::new(VecDeque::new()),
            max_records: max_records.max(1),
        }
    }

    /// Snapshot of the retained records, oldest first
    pub fn records(&self) -> Vec<ErrorRecord> {
        self.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Retained records as pretty-printed JSON
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.records())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<ErrorRecord>> {
        // A poisoned log is still a usable log
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ErrorSink for MemoryErrorSink {
    fn record(&self, record: ErrorRecord) {
        let mut records = self.lock();
        records.push_back(record);
        while records.len() > self.max_records {
            records.pop_front();
        }
    }
}
