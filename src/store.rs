// Append-only record store: one JSON object per line, one file per record kind
//
// Writes go through a single `write_all` on a file opened in append mode, so a
// line from one writer is never split by another. Reads are full scans that skip
// lines which do not parse; a truncated or corrupt line never aborts a scan.

use crate::config::StoreConfig;
use crate::error::Result;
use crate::records::{FacultyRecord, VendorRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Lines, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Vendor,
    Faculty,
}

impl RecordKind {
    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::Vendor => "vendor",
            RecordKind::Faculty => "faculty",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            RecordKind::Vendor => "vendors.jsonl",
            RecordKind::Faculty => "faculty.jsonl",
        }
    }
}

/// A record type with its own store file
pub trait Record: Serialize + DeserializeOwned {
    const KIND: RecordKind;
}

impl Record for VendorRecord {
    const KIND: RecordKind = RecordKind::Vendor;
}

impl Record for FacultyRecord {
    const KIND: RecordKind = RecordKind::Faculty;
}

#[derive(Debug, Clone)]
pub struct RecordStore {
    data_dir: PathBuf,
}

impl RecordStore {
    pub fn new(config: &StoreConfig) -> Self {
        RecordStore {
            data_dir: config.data_dir.clone(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, kind: RecordKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }

    /// Append one record as a single line, creating the directory and file on first use
    pub fn append<R: Record>(&self, record: &R) -> Result<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        fs::create_dir_all(&self.data_dir)?;
        let path = self.path_for(R::KIND);
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(&line)?;

        debug!(kind = R::KIND.name(), path = %path.display(), "appended record");
        Ok(())
    }

    /// Lazily scan every record of kind `R` in insertion order.
    /// A store that was never written reads as empty.
    pub fn read_all<R: Record>(&self) -> Result<RecordIter<R>> {
        let path = self.path_for(R::KIND);
        let lines = match File::open(&path) {
            Ok(file) => Some(BufReader::new(file).lines()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        Ok(RecordIter {
            kind: R::KIND,
            lines,
            line_number: 0,
            skipped: 0,
            reported: false,
            _record: PhantomData,
        })
    }

    /// Collect a full scan, returning the records and the number of skipped lines
    pub fn load_all<R: Record>(&self) -> Result<(Vec<R>, usize)> {
        let mut iter = self.read_all::<R>()?;
        let records: Vec<R> = iter.by_ref().collect();
        Ok((records, iter.skipped()))
    }
}

/// Iterator over the parseable records of one store file
pub struct RecordIter<R> {
    kind: RecordKind,
    lines: Option<Lines<BufReader<File>>>,
    line_number: usize,
    skipped: usize,
    reported: bool,
    _record: PhantomData<R>,
}

impl<R> RecordIter<R> {
    /// Lines dropped so far because they were unreadable or did not parse
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn finish(&mut self) {
        if !self.reported && self.skipped > 0 {
            warn!(
                kind = self.kind.name(),
                skipped = self.skipped,
                "skipped unparseable lines during scan"
            );
        }
        self.reported = true;
    }
}

impl<R: Record> Iterator for RecordIter<R> {
    type Item = R;

    fn next(&mut self) -> Option<R> {
        loop {
            let Some(lines) = self.lines.as_mut() else {
                self.finish();
                return None;
            };

            let line = match lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) if e.kind() == std::io::ErrorKind::InvalidData => {
                    self.line_number += 1;
                    self.skipped += 1;
                    debug!(kind = self.kind.name(), line = self.line_number, error = %e, "unreadable line");
                    continue;
                }
                // Read errors other than bad UTF-8 repeat on every call; stop the scan
                Some(Err(e)) => {
                    warn!(kind = self.kind.name(), line = self.line_number + 1, error = %e, "store read failed, ending scan");
                    self.lines = None;
                    continue;
                }
                None => {
                    self.lines = None;
                    continue;
                }
            };
            self.line_number += 1;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<R>(&line) {
                Ok(record) => return Some(record),
                Err(e) => {
                    self.skipped += 1;
                    debug!(kind = self.kind.name(), line = self.line_number, error = %e, "skipping corrupt line");
                }
            }
        }
    }
}
