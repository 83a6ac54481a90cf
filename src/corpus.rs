//! Reading the page corpus and writing the record stream.
//!
//! Corpora come either as JSON lines (`{"url": ..., "html": ...}` per line) or
//! as a SQLite table with `url` and `html` columns, read in `rowid` order.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};

use crate::error::CorpusError;
use crate::record::{Page, Record};

pub const DEFAULT_TABLE: &str = "pages";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    JsonLines,
    Sqlite,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self, CorpusError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("jsonl" | "ndjson") => Ok(Format::JsonLines),
            Some("sqlite" | "sqlite3" | "db") => Ok(Format::Sqlite),
            _ => Err(CorpusError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

pub fn load(path: &Path, table: &str) -> Result<Vec<Page>, CorpusError> {
    match Format::from_path(path)? {
        Format::JsonLines => load_jsonl(path),
        Format::Sqlite => load_sqlite(path, table),
    }
}

pub fn load_jsonl(path: &Path) -> Result<Vec<Page>, CorpusError> {
    let file = File::open(path).map_err(|source| io_error(path, source))?;
    let mut pages = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|source| io_error(path, source))?;
        if line.trim().is_empty() {
            continue;
        }
        let page: Page = serde_json::from_str(&line).map_err(|source| CorpusError::Line {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        pages.push(page);
    }
    Ok(pages)
}

pub fn load_sqlite(path: &Path, table: &str) -> Result<Vec<Page>, CorpusError> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    let sql = format!(
        "SELECT url, html FROM \"{}\" WHERE html IS NOT NULL ORDER BY rowid",
        table.replace('"', "\"\"")
    );
    let mut stmt = conn.prepare(&sql)?;
    let pages = stmt
        .query_map([], |row| {
            Ok(Page {
                url: row.get(0)?,
                html: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(pages)
}

/// One JSON object per line, in the order given.
pub fn write_records(path: &Path, records: &[Record]) -> Result<(), CorpusError> {
    let file = File::create(path).map_err(|source| io_error(path, source))?;
    let mut out = BufWriter::new(file);
    write_records_to(&mut out, records).map_err(|source| io_error(path, source))?;
    out.flush().map_err(|source| io_error(path, source))
}

pub fn write_records_to<W: Write>(out: &mut W, records: &[Record]) -> std::io::Result<()> {
    for record in records {
        serde_json::to_writer(&mut *out, record)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

pub fn read_records(path: &Path) -> Result<Vec<Record>, CorpusError> {
    let file = File::open(path).map_err(|source| io_error(path, source))?;
    let mut records = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|source| io_error(path, source))?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line).map_err(|source| CorpusError::Line {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?);
    }
    Ok(records)
}

fn io_error(path: &Path, source: std::io::Error) -> CorpusError {
    CorpusError::Io {
        path: PathBuf::from(path),
        source,
    }
}
