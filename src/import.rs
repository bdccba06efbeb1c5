//! Loading a mapping file into the store.

use crate::errors::MapError;
use crate::mapping::{parse_line, Namespace};
use crate::store::Store;
use crate::Result;
use slog::Logger;
use std::fs;
use std::io::Write;
use std::path::Path;

/// What to do with a line that isn't exactly two tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Log it and carry on with the next line.
    Skip,
    /// Stop the import. Lines already written stay written.
    Abort,
}

impl Default for MalformedPolicy {
    fn default() -> Self {
        MalformedPolicy::Skip
    }
}

/// Counts from a finished import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Store writes performed
    pub written: usize,
    /// Blank and comment lines
    pub ignored: usize,
    /// Lines skipped as malformed
    pub malformed: usize,
}

/// Writes every entry of a mapping file into the store under a namespace.
#[derive(Debug)]
pub struct Importer {
    log: Logger,
    namespace: Namespace,
    policy: MalformedPolicy,
}

impl Importer {
    #[allow(missing_docs)]
    pub fn new(log: Logger, namespace: Namespace, policy: MalformedPolicy) -> Importer {
        Importer {
            log,
            namespace,
            policy,
        }
    }

    /// Import the mapping file at `path`.
    pub fn import_file<S, W>(&self, path: &Path, store: &mut S, progress: &mut W) -> Result<ImportReport>
    where
        S: Store,
        W: Write,
    {
        let text = read_mapping_file(path)?;
        info!(self.log, "Importing mapping file"; "path" => %path.display(), "namespace" => &self.namespace);
        self.import(&text, store, progress)
    }

    /// Import mapping text line by line.
    ///
    /// One `source: .. target: ..` line is written to `progress` after each
    /// successful store write.
    pub fn import<S, W>(&self, text: &str, store: &mut S, progress: &mut W) -> Result<ImportReport>
    where
        S: Store,
        W: Write,
    {
        let mut report = ImportReport::default();

        for (i, line) in text.lines().enumerate() {
            let line_number = i + 1;
            let entry = match parse_line(line_number, line) {
                Ok(Some(entry)) => entry,
                Ok(None) => {
                    report.ignored += 1;
                    continue;
                }
                Err(e) => match self.policy {
                    MalformedPolicy::Skip => {
                        warn!(self.log, "Skipping malformed line"; "line" => line_number, "error" => %e);
                        report.malformed += 1;
                        continue;
                    }
                    MalformedPolicy::Abort => return Err(e.into()),
                },
            };

            store.set(self.namespace.key(&entry.source), entry.target.clone())?;
            writeln!(progress, "{}", entry)?;
            report.written += 1;
        }

        progress.flush()?;
        info!(self.log, "Import finished";
            "written" => report.written,
            "ignored" => report.ignored,
            "malformed" => report.malformed);
        Ok(report)
    }
}

/// Read a whole mapping file, insisting on UTF-8.
pub fn read_mapping_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    String::from_utf8(bytes).map_err(|_| {
        MapError::InvalidEncoding {
            path: path.display().to_string(),
        }
        .into()
    })
}
