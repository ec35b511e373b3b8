//! # State Snapshots
//!
//! The committed [`ProtocolState`] is written as a single bincode file.
//! Writes go to a sibling temporary file first and are renamed into place,
//! so a crash mid-write leaves the previous snapshot intact.
//!
//! The in-memory adapters hold state the protocol depends on (token custody,
//! registered verdicts). It is saved beside the state snapshot as an
//! [`AdapterSnapshot`] under the `.adapters` extension.

use crate::adapters::LedgerBalances;
use crate::state::ProtocolState;
use serde::{Deserialize, Serialize};
use shared_types::{CaseId, Verdict};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Snapshot encoding failed: {0}")]
    Encoding(#[from] bincode::Error),
}

/// Contents of the in-memory ledger and arbiter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterSnapshot {
    pub balances: LedgerBalances,
    pub decisions: HashMap<CaseId, Verdict>,
}

/// Where the adapter snapshot lives for a given state snapshot.
pub fn adapters_path(snapshot_path: &Path) -> PathBuf {
    snapshot_path.with_extension("adapters")
}

pub fn save_snapshot(state: &ProtocolState, path: &Path) -> Result<(), SnapshotError> {
    let bytes = bincode::serialize(state)?;
    write_atomic(path, &bytes)?;

    info!(
        path = %path.display(),
        step = state.step,
        bytes = bytes.len(),
        "Snapshot saved"
    );
    Ok(())
}

pub fn load_snapshot(path: &Path) -> Result<ProtocolState, SnapshotError> {
    let bytes = fs::read(path).map_err(|source| io_error(path, source))?;
    let state: ProtocolState = bincode::deserialize(&bytes)?;
    info!(path = %path.display(), step = state.step, "Snapshot loaded");
    Ok(state)
}

pub fn save_adapters(adapters: &AdapterSnapshot, path: &Path) -> Result<(), SnapshotError> {
    let bytes = bincode::serialize(adapters)?;
    write_atomic(path, &bytes)?;
    info!(
        path = %path.display(),
        custody = adapters.balances.custody,
        decisions = adapters.decisions.len(),
        "Adapter snapshot saved"
    );
    Ok(())
}

pub fn load_adapters(path: &Path) -> Result<AdapterSnapshot, SnapshotError> {
    let bytes = fs::read(path).map_err(|source| io_error(path, source))?;
    let adapters: AdapterSnapshot = bincode::deserialize(&bytes)?;
    info!(path = %path.display(), custody = adapters.balances.custody, "Adapter snapshot loaded");
    Ok(adapters)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
    }

    let staging = path.with_extension("tmp");
    fs::write(&staging, bytes).map_err(|source| io_error(&staging, source))?;
    fs::rename(&staging, path).map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: io::Error) -> SnapshotError {
    SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    }
}
