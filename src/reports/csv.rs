//! CSV serialization for generated reports
//!
//! Reports use a fixed layout rather than strict RFC 4180: fields after the
//! leading one are separated by `", "`. Fields are only quoted when they
//! contain a comma, quote or line break.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::warn;

use crate::utils::errors::{Result, TrackerError};
use crate::utils::helpers::report_file_name;
use crate::utils::logging::log_report_written;

/// Line terminator used by every report
pub const LINE_ENDING: &str = "\n";

const MAX_NAME_ATTEMPTS: usize = 1000;

/// A row type with a fixed header and line layout
pub trait CsvRecord {
    fn header() -> &'static str;

    fn to_line(&self) -> String;
}

/// Quote a field if it would otherwise break the row layout
pub fn escape_field(field: &str) -> String {
    if field.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Split one report line back into fields.
///
/// A single space after each separator is part of the layout and is
/// dropped; quoted fields are unescaped.
pub fn split_line(line: &str, line_number: usize) -> Result<Vec<String>> {
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        if !fields.is_empty() && chars.peek() == Some(&' ') {
            chars.next();
        }

        let mut field = String::new();
        if chars.peek() == Some(&'"') {
            chars.next();
            loop {
                match chars.next() {
                    Some('"') if chars.peek() == Some(&'"') => {
                        chars.next();
                        field.push('"');
                    }
                    Some('"') => break,
                    Some(c) => field.push(c),
                    None => {
                        return Err(TrackerError::ReportParse {
                            line: line_number,
                            message: "unterminated quoted field".to_string(),
                        })
                    }
                }
            }
            match chars.next() {
                None => {
                    fields.push(field);
                    return Ok(fields);
                }
                Some(',') => fields.push(field),
                Some(c) => {
                    return Err(TrackerError::ReportParse {
                        line: line_number,
                        message: format!("unexpected '{}' after quoted field", c),
                    })
                }
            }
        } else {
            loop {
                match chars.next() {
                    Some(',') => break,
                    Some(c) => field.push(c),
                    None => {
                        fields.push(field);
                        return Ok(fields);
                    }
                }
            }
            fields.push(field);
        }
    }
}

/// Buffered writer producing one report
pub struct CsvWriter<W: Write> {
    inner: BufWriter<W>,
    rows: usize,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: BufWriter::new(writer),
            rows: 0,
        }
    }

    pub fn write_header<R: CsvRecord>(&mut self) -> io::Result<()> {
        self.inner.write_all(R::header().as_bytes())?;
        self.inner.write_all(LINE_ENDING.as_bytes())
    }

    pub fn write_record<R: CsvRecord>(&mut self, record: &R) -> io::Result<()> {
        self.inner.write_all(record.to_line().as_bytes())?;
        self.inner.write_all(LINE_ENDING.as_bytes())?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush buffered output and hand back the underlying writer
    pub fn finish(self) -> io::Result<W> {
        self.inner.into_inner().map_err(|e| e.into_error())
    }
}

/// Serialize a header plus every record into `writer`
pub fn write_records<W: Write, R: CsvRecord>(writer: W, records: &[R]) -> io::Result<W> {
    let mut csv = CsvWriter::new(writer);
    csv.write_header::<R>()?;
    for record in records {
        csv.write_record(record)?;
    }
    csv.finish()
}

/// Render records into an in-memory string
pub fn render<R: CsvRecord>(records: &[R]) -> String {
    let mut out = String::from(R::header());
    out.push_str(LINE_ENDING);
    for record in records {
        out.push_str(&record.to_line());
        out.push_str(LINE_ENDING);
    }
    out
}

/// Create `base.csv`, or `base-1.csv`, `base-2.csv`, ... if taken
fn create_unique(dir: &Path, file_name: &str) -> io::Result<(File, PathBuf)> {
    let stem = file_name.strip_suffix(".csv").unwrap_or(file_name);

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let candidate = if attempt == 0 {
            dir.join(format!("{}.csv", stem))
        } else {
            dir.join(format!("{}-{}.csv", stem, attempt))
        };

        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(file) => return Ok((file, candidate)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::new(
        ErrorKind::AlreadyExists,
        format!("no free file name for {} in {}", stem, dir.display()),
    ))
}

fn write_file_blocking<R: CsvRecord>(dir: &Path, file_name: &str, records: &[R]) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|source| TrackerError::FileWrite {
        path: dir.to_path_buf(),
        source,
    })?;

    let (file, path) = create_unique(dir, file_name).map_err(|source| TrackerError::FileWrite {
        path: dir.join(file_name),
        source,
    })?;

    // The file handle is dropped, and therefore closed, before this returns
    // on every path.
    let written = write_records(file, records).and_then(|file| file.sync_all());
    if let Err(source) = written {
        if let Err(e) = fs::remove_file(&path) {
            warn!(path = %path.display(), error = %e, "Failed to remove partial report");
        }
        return Err(TrackerError::FileWrite { path, source });
    }

    Ok(path)
}

/// Write a timestamp-named report into `dir` without blocking the runtime
pub async fn write_report_file<R>(dir: PathBuf, prefix: &str, records: Vec<R>) -> Result<PathBuf>
where
    R: CsvRecord + Send + 'static,
{
    let file_name = report_file_name(prefix, Local::now());
    let kind = prefix.to_string();

    let path = tokio::task::spawn_blocking(move || {
        write_file_blocking(&dir, &file_name, &records).map(|path| (path, records.len()))
    })
    .await
    .map_err(|e| TrackerError::TaskFailed(e.to_string()))?
    .map(|(path, rows)| {
        log_report_written(&kind, &path, rows);
        path
    })?;

    Ok(path)
}
