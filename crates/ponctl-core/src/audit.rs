// ── Audit log ──
//
// Append-only record of every dispatched operation. The dispatcher writes
// exactly one entry per dispatch; nothing in the dispatch path reads back.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, RwLock};
use tracing::warn;

use crate::error::CoreError;
use crate::model::{AuditLogEntry, ElementId};

/// Filter for [`AuditLog::query`]. Results are newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditQuery {
    pub element_id: Option<ElementId>,
    pub since: Option<DateTime<Utc>>,
    pub limit: usize,
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self {
            element_id: None,
            since: None,
            limit: 100,
        }
    }
}

impl AuditQuery {
    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        self.element_id
            .as_ref()
            .is_none_or(|id| *id == entry.element_id)
            && self.since.is_none_or(|since| entry.timestamp >= since)
    }

    /// Newest-first selection from entries in append order.
    fn select<'a, I>(&self, entries: I) -> Vec<AuditLogEntry>
    where
        I: DoubleEndedIterator<Item = &'a AuditLogEntry>,
    {
        entries
            .rev()
            .filter(|e| self.matches(e))
            .take(self.limit)
            .cloned()
            .collect()
    }
}

/// Durable, append-only sink for dispatch records.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn record(&self, entry: AuditLogEntry) -> Result<(), CoreError>;

    async fn query(&self, query: &AuditQuery) -> Result<Vec<AuditLogEntry>, CoreError>;
}

// ── In-memory ───────────────────────────────────────────────────────

/// Process-local log, used for tests and one-shot CLI runs.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: RwLock<Vec<AuditLogEntry>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, oldest first.
    pub async fn entries(&self) -> Vec<AuditLogEntry> {
        self.entries.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl AuditLog for MemoryAuditLog {
    async fn record(&self, entry: AuditLogEntry) -> Result<(), CoreError> {
        self.entries.write().await.push(entry);
        Ok(())
    }

    async fn query(&self, query: &AuditQuery) -> Result<Vec<AuditLogEntry>, CoreError> {
        Ok(query.select(self.entries.read().await.iter()))
    }
}

// ── JSON lines file ─────────────────────────────────────────────────

/// One JSON object per line, appended and flushed per record.
#[derive(Debug)]
pub struct JsonlAuditLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> CoreError {
        CoreError::AuditIo {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl AuditLog for JsonlAuditLog {
    async fn record(&self, entry: AuditLogEntry) -> Result<(), CoreError> {
        let mut line = serde_json::to_vec(&entry)?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        file.write_all(&line).await.map_err(|e| self.io_error(e))?;
        file.sync_data().await.map_err(|e| self.io_error(e))?;
        Ok(())
    }

    async fn query(&self, query: &AuditQuery) -> Result<Vec<AuditLogEntry>, CoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        let mut entries = Vec::new();
        for (lineno, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<AuditLogEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(
                    path = %self.path.display(),
                    line = lineno + 1,
                    error = %e,
                    "skipping unreadable audit line"
                ),
            }
        }
        Ok(query.select(entries.iter()))
    }
}
