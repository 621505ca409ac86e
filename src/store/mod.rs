//! The CSV-backed record store: load, normalize, append, persist, filter.

mod backup;
mod load;

pub use backup::{list_snapshots, write_snapshot, BackupPolicy};

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Local;
use tracing::{info, warn};

use crate::record::{Field, Record};
use crate::schema::{self, Layout};

/// What `load` does when the backing file does not exist.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingFilePolicy {
    /// Start an empty store with the default header.
    #[default]
    Create,
    /// Refuse to load.
    Fail,
}

impl MissingFilePolicy {
    pub fn as_str(&self) -> &str {
        match self {
            MissingFilePolicy::Create => "create",
            MissingFilePolicy::Fail => "fail",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "create" => Some(MissingFilePolicy::Create),
            "fail" => Some(MissingFilePolicy::Fail),
            _ => None,
        }
    }
}

/// In-memory image of the tracking file. Columns keep file order, rows keep
/// insertion order; headers and cells are normalized on the way in.
#[derive(Clone, Debug)]
pub struct RecordStore {
    path: PathBuf,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    layout: Layout,
}

impl RecordStore {
    /// Load the tracking file at `path`, or start an empty store when it is
    /// absent and the policy allows that.
    pub fn load(path: impl Into<PathBuf>, missing: MissingFilePolicy) -> Result<Self> {
        let path = path.into();
        let loaded = if path.exists() {
            load::read_tracking_file(&path)?
        } else {
            match missing {
                MissingFilePolicy::Create => {
                    info!(path = %path.display(), "tracking file not found, starting empty");
                    load::LoadedFile {
                        columns: schema::default_columns(),
                        rows: Vec::new(),
                    }
                }
                MissingFilePolicy::Fail => {
                    bail!("tracking file {} does not exist", path.display())
                }
            }
        };
        let layout = Layout::resolve(&loaded.columns);
        Ok(RecordStore {
            path,
            columns: loaded.columns,
            rows: loaded.rows,
            layout,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fields with no backing column in this file.
    pub fn missing_fields(&self) -> Vec<Field> {
        self.layout.missing()
    }

    pub(crate) fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("tracking.csv")
    }

    pub(crate) fn file_stem(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("tracking")
    }

    pub(crate) fn file_ext(&self) -> &str {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("csv")
    }

    /// Value of `field` in row `row`; empty when either is absent.
    pub fn get(&self, row: usize, field: Field) -> &str {
        let Some(idx) = self.layout.index(field) else {
            return "";
        };
        self.rows
            .get(row)
            .and_then(|cells| cells.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Logical view of row `row`.
    pub fn record(&self, row: usize) -> Record {
        let mut record = Record::default();
        for field in Field::ALL {
            record.set(field, self.get(row, field));
        }
        record
    }

    /// All rows as logical records, file order.
    pub fn records(&self) -> Vec<Record> {
        (0..self.rows.len()).map(|row| self.record(row)).collect()
    }

    /// All rows, newest insertion first. This is the history display order.
    pub fn rows_latest_first(&self) -> Vec<Record> {
        let mut records = self.records();
        records.reverse();
        records
    }

    /// Subset of rows whose `field` equals `value`, case-insensitively on
    /// the trimmed value. An unmapped field yields an empty subset.
    pub fn filter_by(&self, field: Field, value: &str) -> RecordStore {
        let wanted = value.trim();
        let rows = match self.layout.index(field) {
            Some(idx) => self
                .rows
                .iter()
                .filter(|cells| {
                    cells
                        .get(idx)
                        .map(String::as_str)
                        .unwrap_or("")
                        .eq_ignore_ascii_case(wanted)
                })
                .cloned()
                .collect(),
            None => Vec::new(),
        };
        RecordStore {
            path: self.path.clone(),
            columns: self.columns.clone(),
            rows,
            layout: self.layout.clone(),
        }
    }

    /// Append one row per record, in order.
    ///
    /// Every logical field is given a column first: an existing alias column
    /// is reused, otherwise a new column is created under the canonical name
    /// and earlier rows are backfilled with empty cells. Cells under columns
    /// owned by no logical field stay empty. Returns the number of rows
    /// appended; an empty batch is a no-op.
    pub fn append(&mut self, records: &[Record]) -> usize {
        if records.is_empty() {
            return 0;
        }
        for field in Field::ALL {
            if self.layout.index(field).is_none() {
                self.columns.push(field.canonical().to_string());
                for row in &mut self.rows {
                    row.push(String::new());
                }
                self.layout = Layout::resolve(&self.columns);
            }
        }
        for record in records {
            let mut row = vec![String::new(); self.columns.len()];
            for field in Field::ALL {
                if let Some(idx) = self.layout.index(field) {
                    row[idx] = record.get(field).trim().to_string();
                }
            }
            self.rows.push(row);
        }
        records.len()
    }

    /// Serialize the store exactly as `persist` writes it.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        {
            let mut writer = csv::WriterBuilder::new().from_writer(&mut buf);
            writer
                .write_record(&self.columns)
                .context("serializing header row")?;
            for row in &self.rows {
                writer.write_record(row).context("serializing record row")?;
            }
            writer.flush().context("flushing serialized records")?;
        }
        Ok(buf)
    }

    /// Full rewrite of the backing file through a temporary file and rename,
    /// so a failed write leaves the previous contents in place.
    pub fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let bytes = self.to_csv_bytes()?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &bytes).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        info!(path = %self.path.display(), rows = self.rows.len(), "persisted store");
        Ok(())
    }

    /// Persist, then write the configured backup snapshot. The snapshot is
    /// best-effort: a failure is logged and never fails the primary write.
    pub fn persist_and_backup(&self, policy: BackupPolicy, dir: &Path) -> Result<()> {
        self.persist()?;
        if let Err(err) = backup::write_snapshot(self, policy, dir, Local::now().naive_local()) {
            warn!(error = %err, "backup snapshot failed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{BoltDomain, OptionResolver};
    use tempfile::tempdir;

    fn write_fixture(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("tracking.csv");
        fs::write(&path, content).unwrap();
        path
    }

    fn sample_record(line: &str, pack: &str, bolt: &str, status: &str) -> Record {
        let mut record = Record::default();
        record.set(Field::LineNo, line);
        record.set(Field::TestPackNo, pack);
        record.set(Field::BoltNo, bolt);
        record.set(Field::Status, status);
        record
    }

    #[test]
    fn missing_file_starts_empty_with_default_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tracking.csv");
        let store = RecordStore::load(&path, MissingFilePolicy::Create).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.columns().len(), Field::ALL.len());
        assert_eq!(store.columns()[0], "LINE NO");
        assert!(store.missing_fields().is_empty());
    }

    #[test]
    fn missing_file_is_fatal_under_fail_policy() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        let err = RecordStore::load(&path, MissingFilePolicy::Fail).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn reloading_a_persisted_store_changes_nothing() {
        let dir = tempdir().unwrap();
        let path = write_fixture(dir.path(), " line no ,Status\n L-1 , ok \nL-2,PENDING\n");

        let first = RecordStore::load(&path, MissingFilePolicy::Fail).unwrap();
        first.persist().unwrap();
        let bytes_after_first = fs::read(&path).unwrap();

        let second = RecordStore::load(&path, MissingFilePolicy::Fail).unwrap();
        assert_eq!(second.columns(), first.columns());
        assert_eq!(second.records(), first.records());
        second.persist().unwrap();
        assert_eq!(fs::read(&path).unwrap(), bytes_after_first);
    }

    #[test]
    fn append_extends_history_across_reloads() {
        let dir = tempdir().unwrap();
        let path = write_fixture(
            dir.path(),
            "LINE NO,TEST PACK NO,BOLT TORQUING NUMBER,STATUS\nL1,TP-1,J1,OK\n",
        );

        let mut store = RecordStore::load(&path, MissingFilePolicy::Fail).unwrap();
        let before = store.records();
        let added = store.append(&[
            sample_record("L1", "TP-1", "J2", "OK"),
            sample_record("L2", "TP-9", "J1", "PENDING"),
        ]);
        assert_eq!(added, 2);
        store.persist().unwrap();

        let reloaded = RecordStore::load(&path, MissingFilePolicy::Fail).unwrap();
        assert_eq!(reloaded.len(), before.len() + 2);
        assert_eq!(&reloaded.records()[..before.len()], &before[..]);
        assert_eq!(reloaded.get(1, Field::BoltNo), "J2");
        assert_eq!(reloaded.get(2, Field::Status), "PENDING");
    }

    #[test]
    fn append_of_nothing_is_a_noop() {
        let dir = tempdir().unwrap();
        let path = write_fixture(dir.path(), "LINE NO,STATUS\nL-1,OK\n");
        let mut store = RecordStore::load(&path, MissingFilePolicy::Fail).unwrap();
        assert_eq!(store.append(&[]), 0);
        assert_eq!(store.len(), 1);
        assert_eq!(store.columns().len(), 2);
    }

    #[test]
    fn append_creates_missing_columns_and_backfills() {
        let dir = tempdir().unwrap();
        let path = write_fixture(dir.path(), "LINE NO,STATUS\nL-1,OK\n");
        let mut store = RecordStore::load(&path, MissingFilePolicy::Fail).unwrap();

        let mut record = sample_record("L-2", "TP-1", "J4", "PENDING");
        record.set(Field::Remarks, "re-torqued");
        store.append(&[record]);

        assert_eq!(store.columns().len(), Field::ALL.len());
        assert!(store.missing_fields().is_empty());
        // historical row reads as empty under the new columns
        assert_eq!(store.get(0, Field::Remarks), "");
        assert_eq!(store.get(1, Field::Remarks), "re-torqued");
        assert_eq!(store.get(1, Field::BoltNo), "J4");
    }

    #[test]
    fn alias_column_is_reused_not_duplicated() {
        let dir = tempdir().unwrap();
        let path = write_fixture(dir.path(), "LINE NO,BOLT NO,STATUS\nL-1,J1,OK\n");
        let mut store = RecordStore::load(&path, MissingFilePolicy::Fail).unwrap();

        store.append(&[sample_record("L-1", "TP-1", "J2", "OK")]);

        let bolt_columns = store
            .columns()
            .iter()
            .filter(|column| Field::BoltNo.aliases().contains(&column.as_str()))
            .count();
        assert_eq!(bolt_columns, 1);
        assert_eq!(store.get(1, Field::BoltNo), "J2");
    }

    #[test]
    fn filter_by_matches_case_insensitively() {
        let dir = tempdir().unwrap();
        let path = write_fixture(
            dir.path(),
            "LINE NO,STATUS\nL-100,OK\nl-100,PENDING\nL-2,OK\n",
        );
        let store = RecordStore::load(&path, MissingFilePolicy::Fail).unwrap();

        let subset = store.filter_by(Field::LineNo, " l-100 ");
        assert_eq!(subset.len(), 2);
        assert_eq!(subset.columns(), store.columns());

        let unmapped = store.filter_by(Field::Supervisor, "anyone");
        assert!(unmapped.is_empty());
    }

    #[test]
    fn latest_first_reverses_insertion_order() {
        let dir = tempdir().unwrap();
        let path = write_fixture(dir.path(), "LINE NO,STATUS\nL-1,OK\nL-2,PENDING\n");
        let store = RecordStore::load(&path, MissingFilePolicy::Fail).unwrap();
        let latest = store.rows_latest_first();
        assert_eq!(latest[0].line_no, "L-2");
        assert_eq!(latest[1].line_no, "L-1");
    }

    #[test]
    fn persist_creates_the_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("tracking.csv");
        let store = RecordStore::load(&path, MissingFilePolicy::Create).unwrap();
        store.persist().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn backup_failure_never_fails_the_primary_write() {
        let dir = tempdir().unwrap();
        let path = write_fixture(dir.path(), "LINE NO,STATUS\nL-1,OK\n");
        let mut store = RecordStore::load(&path, MissingFilePolicy::Fail).unwrap();
        store.append(&[sample_record("L-2", "", "", "OK")]);

        // occupy the backup directory path with a plain file
        let blocked = dir.path().join("blocked");
        fs::write(&blocked, "not a directory").unwrap();

        store
            .persist_and_backup(BackupPolicy::Daily, &blocked)
            .unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("L-2"));
    }

    #[test]
    fn three_bolts_on_one_line_read_back_in_natural_order() {
        let dir = tempdir().unwrap();
        let path = write_fixture(
            dir.path(),
            "LINE NO,TEST PACK NO,BOLT TORQUING NUMBER,STATUS\nL1,TP-1,J1,\n",
        );

        let mut store = RecordStore::load(&path, MissingFilePolicy::Fail).unwrap();
        store.append(&[
            sample_record("L1", "TP-1", "J2", "OK"),
            sample_record("L1", "TP-1", "J3", "OK"),
        ]);
        store.persist().unwrap();

        let reloaded = RecordStore::load(&path, MissingFilePolicy::Fail).unwrap();
        assert_eq!(reloaded.len(), 3);
        let resolver = OptionResolver::new(BoltDomain::Derived);
        let bolts = resolver.options_for(&reloaded, Field::BoltNo, Some((Field::LineNo, "L1")));
        assert_eq!(bolts, vec!["J1", "J2", "J3"]);
    }
}
