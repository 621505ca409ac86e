//! Password-gated snapshot export: a ZIP holding the CSV payload and a
//! small JSON manifest, optionally AES-locked.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use zip::write::FileOptions;
use zip::{AesMode, CompressionMethod, ZipWriter};

use crate::store::RecordStore;

/// Outcome of checking a candidate secret against the configured one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied,
}

/// Exact, case-sensitive comparison. The gate keeps honest operators out of
/// the export path rather than defending against attackers, so a plain
/// comparison is enough. A denial reveals nothing about the configured
/// secret.
pub fn authorize(candidate: &str, configured: &str) -> Access {
    if candidate == configured {
        Access::Granted
    } else {
        Access::Denied
    }
}

/// What `export_snapshot` produced.
#[derive(Clone, Debug)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub rows: usize,
    pub locked: bool,
}

#[derive(Serialize)]
struct Manifest<'a> {
    exported_at: String,
    source: String,
    rows: usize,
    columns: &'a [String],
}

/// Write a ZIP snapshot of the store to `out_path`.
///
/// The archive holds the CSV payload under the backing file's name, byte
/// identical to what `persist` writes, plus a `manifest.json` describing the
/// export. With a passphrase both entries are AES-256 encrypted.
pub fn export_snapshot(
    store: &RecordStore,
    out_path: impl Into<PathBuf>,
    passphrase: Option<&str>,
) -> Result<ExportSummary> {
    let out_path = out_path.into();
    let csv_bytes = store.to_csv_bytes()?;
    let manifest = Manifest {
        exported_at: Utc::now().to_rfc3339(),
        source: store.file_name().to_string(),
        rows: store.len(),
        columns: store.columns(),
    };
    let manifest_bytes =
        serde_json::to_vec_pretty(&manifest).context("serializing export manifest")?;

    let file = File::create(&out_path)
        .with_context(|| format!("creating {}", out_path.display()))?;
    let mut archive = ZipWriter::new(file);
    let base: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);
    let options = match passphrase {
        Some(pass) => base.with_aes_encryption(AesMode::Aes256, pass),
        None => base,
    };

    archive
        .start_file(store.file_name(), options.clone())
        .context("starting csv entry")?;
    archive.write_all(&csv_bytes).context("writing csv entry")?;
    archive
        .start_file("manifest.json", options)
        .context("starting manifest entry")?;
    archive
        .write_all(&manifest_bytes)
        .context("writing manifest entry")?;
    archive
        .finish()
        .with_context(|| format!("finalizing {}", out_path.display()))?;

    info!(
        path = %out_path.display(),
        rows = store.len(),
        locked = passphrase.is_some(),
        "exported snapshot"
    );
    Ok(ExportSummary {
        path: out_path,
        rows: store.len(),
        locked: passphrase.is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MissingFilePolicy;
    use std::fs;
    use std::io::Read;
    use tempfile::{tempdir, TempDir};
    use zip::ZipArchive;

    fn sample_store() -> (TempDir, RecordStore) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tracking.csv");
        fs::write(
            &path,
            "LINE NO,BOLT TORQUING NUMBER,STATUS\nL-1,J1,OK\nL-1,J2,PENDING\n",
        )
        .unwrap();
        let store = RecordStore::load(&path, MissingFilePolicy::Fail).unwrap();
        (dir, store)
    }

    #[test]
    fn authorization_is_exact_and_case_sensitive() {
        assert_eq!(authorize("KGP2025", "KGP2025"), Access::Granted);
        assert_eq!(authorize("kgp2025", "KGP2025"), Access::Denied);
        assert_eq!(authorize("", "KGP2025"), Access::Denied);
        assert_eq!(authorize("KGP2025 ", "KGP2025"), Access::Denied);
    }

    #[test]
    fn denial_leaves_the_backing_file_untouched() {
        let (_dir, store) = sample_store();
        let before = fs::read(store.path()).unwrap();
        assert_eq!(authorize("wrong", "KGP2025"), Access::Denied);
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn plain_export_carries_csv_and_manifest() {
        let (dir, store) = sample_store();
        let out = dir.path().join("export.zip");

        let summary = export_snapshot(&store, &out, None).unwrap();
        assert_eq!(summary.rows, 2);
        assert!(!summary.locked);

        let mut archive = ZipArchive::new(fs::File::open(&out).unwrap()).unwrap();

        let mut csv = String::new();
        archive
            .by_name("tracking.csv")
            .unwrap()
            .read_to_string(&mut csv)
            .unwrap();
        assert_eq!(csv.as_bytes(), &store.to_csv_bytes().unwrap()[..]);

        let mut manifest = String::new();
        archive
            .by_name("manifest.json")
            .unwrap()
            .read_to_string(&mut manifest)
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&manifest).unwrap();
        assert_eq!(parsed["rows"], 2);
        assert_eq!(parsed["source"], "tracking.csv");
        assert_eq!(parsed["columns"][0], "LINE NO");
        assert!(parsed["exported_at"].as_str().unwrap().contains("T"));
    }

    #[test]
    fn locked_export_opens_only_with_the_passphrase() {
        let (dir, store) = sample_store();
        let out = dir.path().join("export.zip");

        let summary = export_snapshot(&store, &out, Some("torque-pw")).unwrap();
        assert!(summary.locked);

        let mut archive = ZipArchive::new(fs::File::open(&out).unwrap()).unwrap();
        assert!(archive.by_name("tracking.csv").is_err());
        assert!(archive
            .by_name_decrypt("tracking.csv", b"wrong-pw")
            .is_err());

        let mut csv = Vec::new();
        archive
            .by_name_decrypt("tracking.csv", b"torque-pw")
            .unwrap()
            .read_to_end(&mut csv)
            .unwrap();
        assert_eq!(csv, store.to_csv_bytes().unwrap());
    }
}
