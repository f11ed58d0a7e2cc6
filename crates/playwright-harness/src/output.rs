// Copyright 2026 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// Output-directory lifecycle and the artifact staging area.
//
// The root output directory is wiped once per test run so stale
// artifacts from a previous run never mix with fresh ones; later
// sessions of the same run (one per engine) leave it alone. Not-yet-promoted
// artifacts live in a per-session temporary staging directory, so the
// final output tree only ever contains files that were explicitly kept.

use crate::error::Result;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tempfile::TempDir;

/// Output directories already wiped by this process.
static WIPED_DIRS: OnceLock<parking_lot::Mutex<HashSet<PathBuf>>> = OnceLock::new();

/// Wipes the root artifact directory at most once per process per
/// directory.
///
/// A test run starts one session per engine in the configured matrix,
/// all pointed at the same output root; only the first of them may wipe,
/// or the firefox leg would destroy the chromium leg's promoted
/// artifacts. Sessions with distinct output roots are independent.
pub fn prepare_output_dir(output_dir: &Path) -> Result<()> {
    let wiped = WIPED_DIRS.get_or_init(|| parking_lot::Mutex::new(HashSet::new()));
    if !wiped.lock().insert(output_dir.to_path_buf()) {
        return Ok(());
    }
    wipe_output_dir(output_dir)
}

/// Removes the root artifact directory, tolerating concurrent sessions
/// and awkward mounts.
///
/// Already-gone and permission failures are ignored (another worker may
/// have won the race). A busy directory, typically the directory itself
/// being a container bind mount, degrades to removing its immediate
/// children entry by entry, best-effort. Idempotent.
pub fn wipe_output_dir(output_dir: &Path) -> Result<()> {
    if !output_dir.exists() {
        return Ok(());
    }
    match std::fs::remove_dir_all(output_dir) {
        Ok(()) => Ok(()),
        Err(err)
            if matches!(
                err.kind(),
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied
            ) =>
        {
            tracing::debug!(dir = %output_dir.display(), error = %err, "output wipe raced or lacked permission; continuing");
            Ok(())
        }
        Err(err) if is_busy(&err) => {
            tracing::debug!(dir = %output_dir.display(), "output dir is busy (bind mount?); removing children instead");
            remove_children(output_dir);
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn remove_children(dir: &Path) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let removed = if path.is_dir() {
            std::fs::remove_dir_all(&path)
        } else {
            std::fs::remove_file(&path)
        };
        if let Err(err) = removed {
            tracing::debug!(entry = %path.display(), error = %err, "failed to remove output entry");
        }
    }
}

#[cfg(unix)]
fn is_busy(err: &std::io::Error) -> bool {
    err.raw_os_error() == Some(libc::EBUSY)
}

#[cfg(not(unix))]
fn is_busy(_err: &std::io::Error) -> bool {
    false
}

/// Per-session temporary holding area for not-yet-promoted artifacts.
///
/// Dropped wholesale at session end; the recorder moves individual files
/// out of it only after the keep decision is made.
#[derive(Debug)]
pub struct StagingArea {
    dir: TempDir,
    counter: AtomicU64,
}

impl StagingArea {
    /// Creates a fresh staging directory under the system temp dir.
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("playwright-harness-")
            .tempdir()?;
        Ok(Self {
            dir,
            counter: AtomicU64::new(0),
        })
    }

    /// Root of the staging directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A fresh unique path inside the staging area. The name is a SHA-256
    /// GUID so concurrent test units in other worker processes can share
    /// the same parent tree without colliding.
    pub fn unique_path(&self) -> PathBuf {
        let nonce = self.counter.fetch_add(1, Ordering::Relaxed);
        let mut hasher = Sha256::new();
        hasher.update(std::process::id().to_le_bytes());
        hasher.update(nonce.to_le_bytes());
        hasher.update(
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.subsec_nanos())
                .unwrap_or(0)
                .to_le_bytes(),
        );
        let digest = hasher.finalize();
        let name: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        self.dir.path().join(name)
    }
}
