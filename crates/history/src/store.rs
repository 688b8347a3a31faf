// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! History store implementation.

use crate::entry::HistoryEntry;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Maximum number of prompts kept in memory after loading.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Errors raised by the history store
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Failed to access history file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode history entry: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Prompt history backed by an optional JSONL file
pub struct HistoryStore {
    entries: Arc<Mutex<Vec<HistoryEntry>>>,
    file_writer: Option<Arc<Mutex<BufWriter<File>>>>,
    path: Option<PathBuf>,
    max_entries: usize,
}

impl HistoryStore {
    /// Create a store that only lives in memory
    pub fn in_memory() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            file_writer: None,
            path: None,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }

    /// Open (or create) a history file and load its entries.
    ///
    /// Lines that fail to parse are skipped with a warning.
    pub fn open(path: &Path) -> Result<Self, HistoryError> {
        Self::open_with_limit(path, DEFAULT_MAX_ENTRIES)
    }

    /// Open a history file keeping at most `max_entries` of the newest prompts.
    pub fn open_with_limit(path: &Path, max_entries: usize) -> Result<Self, HistoryError> {
        let io_err = |source| HistoryError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let mut entries = Vec::new();
        if path.exists() {
            let file = File::open(path).map_err(io_err)?;
            for (lineno, line) in BufReader::new(file).lines().enumerate() {
                let line = line.map_err(io_err)?;
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<HistoryEntry>(&line) {
                    Ok(entry) => entries.push(entry),
                    Err(e) => tracing::warn!(
                        path = %path.display(),
                        line = lineno + 1,
                        error = %e,
                        "skipping malformed history line"
                    ),
                }
            }
        }
        if entries.len() > max_entries {
            let excess = entries.len() - max_entries;
            entries.drain(..excess);
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(io_err)?;

        Ok(Self {
            entries: Arc::new(Mutex::new(entries)),
            file_writer: Some(Arc::new(Mutex::new(BufWriter::new(file)))),
            path: Some(path.to_path_buf()),
            max_entries,
        })
    }

    /// Path of the backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Prompts ordered newest first
    pub fn newest_first(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .rev()
            .map(|e| e.prompt.clone())
            .collect()
    }

    /// Append a prompt.
    ///
    /// Blank prompts and immediate repeats of the newest prompt are ignored.
    pub fn record(&self, prompt: &str) -> Result<(), HistoryError> {
        if prompt.trim().is_empty() {
            return Ok(());
        }

        let entry = {
            let mut entries = self.entries.lock();
            if entries.last().is_some_and(|e| e.prompt == prompt) {
                return Ok(());
            }
            let seq = entries.last().map(|e| e.seq + 1).unwrap_or(0);
            let entry = HistoryEntry::new(seq, prompt);
            entries.push(entry.clone());
            if entries.len() > self.max_entries {
                entries.remove(0);
            }
            entry
        };

        if let Some(ref writer) = self.file_writer {
            let json = serde_json::to_string(&entry)?;
            let mut w = writer.lock();
            let io_err = |source| HistoryError::Io {
                path: self.path.clone().unwrap_or_default(),
                source,
            };
            writeln!(w, "{}", json).map_err(io_err)?;
            w.flush().map_err(io_err)?;
        }
        Ok(())
    }

    /// Number of prompts held
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the store holds no prompts
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl Clone for HistoryStore {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            file_writer: self.file_writer.as_ref().map(Arc::clone),
            path: self.path.clone(),
            max_entries: self.max_entries,
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
