use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use glob::{glob, Pattern};
use tracing::debug;

use super::RecordStore;

/// Snapshot strategy applied after a successful persist.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackupPolicy {
    /// No snapshots.
    #[default]
    None,
    /// One side file tracking the latest persisted state.
    Mirror,
    /// One snapshot per calendar day; later saves on the same day overwrite.
    Daily,
    /// A fresh snapshot for every save.
    Timestamped,
}

impl BackupPolicy {
    pub fn as_str(&self) -> &str {
        match self {
            BackupPolicy::None => "none",
            BackupPolicy::Mirror => "mirror",
            BackupPolicy::Daily => "daily",
            BackupPolicy::Timestamped => "timestamped",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" => Some(BackupPolicy::None),
            "mirror" => Some(BackupPolicy::Mirror),
            "daily" => Some(BackupPolicy::Daily),
            "timestamped" => Some(BackupPolicy::Timestamped),
            _ => None,
        }
    }
}

/// File name the policy would write at `now`, if any.
fn snapshot_name(policy: BackupPolicy, stem: &str, ext: &str, now: NaiveDateTime) -> Option<String> {
    match policy {
        BackupPolicy::None => None,
        BackupPolicy::Mirror => Some(format!("{}_backup.{}", stem, ext)),
        BackupPolicy::Daily => Some(format!("{}_{}.{}", stem, now.format("%Y-%m-%d"), ext)),
        BackupPolicy::Timestamped => {
            Some(format!("{}_{}.{}", stem, now.format("%Y%m%d-%H%M%S"), ext))
        }
    }
}

/// Write the snapshot `policy` calls for under `dir`, returning the path
/// written. `Ok(None)` means the policy wanted nothing.
pub fn write_snapshot(
    store: &RecordStore,
    policy: BackupPolicy,
    dir: &Path,
    now: NaiveDateTime,
) -> Result<Option<PathBuf>> {
    let Some(name) = snapshot_name(policy, store.file_stem(), store.file_ext(), now) else {
        return Ok(None);
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("creating backup directory {}", dir.display()))?;
    let dest = dir.join(name);
    let bytes = store.to_csv_bytes()?;
    fs::write(&dest, bytes).with_context(|| format!("writing backup {}", dest.display()))?;
    debug!(path = %dest.display(), policy = policy.as_str(), "wrote backup snapshot");
    Ok(Some(dest))
}

/// Existing snapshots for `stem` under `dir`, newest name first.
pub fn list_snapshots(dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
    // escape so `[`, `*` and `?` in the store path stay literal
    let pattern = format!(
        "{}/{}_*",
        Pattern::escape(&dir.display().to_string()),
        Pattern::escape(stem)
    );
    let mut paths: Vec<PathBuf> = glob(&pattern)
        .with_context(|| format!("scanning {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .collect();
    paths.sort();
    paths.reverse();
    Ok(paths)
}
