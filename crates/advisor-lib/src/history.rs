//! Bounded per-cluster analysis history
//!
//! Each cluster keeps its most recent analyses in append order. Appending past
//! the retention limit evicts the oldest records first.

use crate::analyzer::AnalysisRecord;
use crate::config::DEFAULT_HISTORY_LIMIT;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

/// Stored analyses keyed by cluster identifier, oldest first
pub type HistoryMap = BTreeMap<String, Vec<AnalysisRecord>>;

/// Errors raised by a history store
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("History I/O failed on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("History serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("History lock poisoned")]
    LockPoisoned,
}

/// Append-and-truncate store of completed analyses
pub trait HistoryStore: Send + Sync {
    /// Append a record, dropping the oldest beyond the retention limit
    fn append(&self, cluster_id: &str, record: AnalysisRecord) -> Result<(), HistoryError>;

    /// Most recent record for a cluster
    fn latest(&self, cluster_id: &str) -> Result<Option<AnalysisRecord>, HistoryError>;

    /// Whole history, or only `cluster_id` (empty when unknown)
    fn all(&self, cluster_id: Option<&str>) -> Result<HistoryMap, HistoryError>;
}

fn push_bounded(history: &mut HistoryMap, cluster_id: &str, record: AnalysisRecord, limit: usize) {
    let records = history.entry(cluster_id.to_string()).or_default();
    records.push(record);
    let limit = limit.max(1);
    if records.len() > limit {
        let excess = records.len() - limit;
        records.drain(..excess);
    }
}

fn select(mut history: HistoryMap, cluster_id: Option<&str>) -> HistoryMap {
    match cluster_id {
        Some(id) => {
            let records = history.remove(id).unwrap_or_default();
            BTreeMap::from([(id.to_string(), records)])
        }
        None => history,
    }
}

/// History persisted as one pretty-printed JSON document
///
/// The whole read-modify-write cycle runs under a mutex, and the document is
/// replaced through a temp file and rename.
#[derive(Debug)]
pub struct JsonFileHistoryStore {
    path: PathBuf,
    limit: usize,
    guard: Mutex<()>,
}

impl JsonFileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_limit(path, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(path: impl Into<PathBuf>, limit: usize) -> Self {
        Self {
            path: path.into(),
            limit,
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> HistoryError {
        HistoryError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn load(&self) -> Result<HistoryMap, HistoryError> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HistoryMap::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(HistoryMap::new());
        }

        let mut history: HistoryMap = serde_json::from_slice(&raw)?;
        history
            .values_mut()
            .flatten()
            .for_each(AnalysisRecord::restore_spec_identifiers);

        Ok(history)
    }

    fn save(&self, history: &HistoryMap) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let json = serde_json::to_vec_pretty(history)?;

        let temp_path = self.path.with_extension("tmp");
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| self.io_error(e))?;

        file.write_all(&json).map_err(|e| self.io_error(e))?;
        file.sync_all().map_err(|e| self.io_error(e))?;

        std::fs::rename(&temp_path, &self.path).map_err(|e| self.io_error(e))?;

        Ok(())
    }
}

impl HistoryStore for JsonFileHistoryStore {
    fn append(&self, cluster_id: &str, record: AnalysisRecord) -> Result<(), HistoryError> {
        let _lock = self.guard.lock().map_err(|_| HistoryError::LockPoisoned)?;

        let mut history = self.load()?;
        push_bounded(&mut history, cluster_id, record, self.limit);
        self.save(&history)?;

        debug!(
            path = %self.path.display(),
            cluster_id = cluster_id,
            retained = history.get(cluster_id).map_or(0, Vec::len),
            "Analysis appended to history"
        );

        Ok(())
    }

    fn latest(&self, cluster_id: &str) -> Result<Option<AnalysisRecord>, HistoryError> {
        let _lock = self.guard.lock().map_err(|_| HistoryError::LockPoisoned)?;
        let mut history = self.load()?;
        Ok(history.remove(cluster_id).and_then(|mut records| records.pop()))
    }

    fn all(&self, cluster_id: Option<&str>) -> Result<HistoryMap, HistoryError> {
        let _lock = self.guard.lock().map_err(|_| HistoryError::LockPoisoned)?;
        Ok(select(self.load()?, cluster_id))
    }
}

/// Process-local history, lost on restart
#[derive(Debug)]
pub struct InMemoryHistoryStore {
    history: Mutex<HistoryMap>,
    limit: usize,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            history: Mutex::new(HistoryMap::new()),
            limit,
        }
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn append(&self, cluster_id: &str, record: AnalysisRecord) -> Result<(), HistoryError> {
        let mut history = self.history.lock().map_err(|_| HistoryError::LockPoisoned)?;
        push_bounded(&mut history, cluster_id, record, self.limit);
        Ok(())
    }

    fn latest(&self, cluster_id: &str) -> Result<Option<AnalysisRecord>, HistoryError> {
        let history = self.history.lock().map_err(|_| HistoryError::LockPoisoned)?;
        Ok(history.get(cluster_id).and_then(|records| records.last().cloned()))
    }

    fn all(&self, cluster_id: Option<&str>) -> Result<HistoryMap, HistoryError> {
        let history = self.history.lock().map_err(|_| HistoryError::LockPoisoned)?;
        Ok(select(history.clone(), cluster_id))
    }
}
