use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use crate::schema::{default_columns, normalize_header};

/// Raw parse result: normalized header plus trimmed cell rows, before any
/// layout resolution.
#[derive(Debug)]
pub(super) struct LoadedFile {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read and parse a tracking file.
///
/// Strict comma parse first. If that fails the file gets one tolerant retry:
/// the delimiter is sniffed from the header line and record lengths are
/// allowed to vary, with short rows padded and long rows truncated to the
/// header width afterwards. A second failure is fatal.
pub(super) fn read_tracking_file(path: &Path) -> Result<LoadedFile> {
    let raw = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let bytes = strip_bom(&raw);

    // a present-but-empty file behaves like a fresh store
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(LoadedFile {
            columns: default_columns(),
            rows: Vec::new(),
        });
    }

    let mut loaded = match parse(bytes, b',', false) {
        Ok(loaded) => loaded,
        Err(err) => {
            let delimiter = sniff_delimiter(bytes);
            warn!(
                path = %path.display(),
                error = %err,
                delimiter = %(delimiter as char),
                "strict parse failed, retrying with sniffed delimiter"
            );
            parse(bytes, delimiter, true).with_context(|| format!("parsing {}", path.display()))?
        }
    };

    let width = loaded.columns.len();
    for row in &mut loaded.rows {
        row.resize(width, String::new());
    }
    Ok(loaded)
}

fn parse(bytes: &[u8], delimiter: u8, flexible: bool) -> csv::Result<LoadedFile> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .flexible(flexible)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut columns: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        if i == 0 {
            columns = record.iter().map(normalize_header).collect();
        } else {
            rows.push(record.iter().map(str::to_string).collect());
        }
    }
    Ok(LoadedFile { columns, rows })
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes)
}

/// Pick the delimiter that dominates the header line. Comma unless `;`, tab
/// or `|` occurs strictly more often.
pub(super) fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let header = bytes.split(|&b| b == b'\n').next().unwrap_or(&[]);
    let mut best = b',';
    let mut best_count = header.iter().filter(|&&b| b == b',').count();
    for candidate in [b';', b'\t', b'|'] {
        let count = header.iter().filter(|&&b| b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}
