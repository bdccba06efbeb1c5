//! Answering key lookups read from an input stream, one line at a time.

use crate::errors::{is_recoverable, MapError};
use crate::mapping::Namespace;
use crate::store::Store;
use crate::Result;
use slog::Logger;
use std::io::{BufRead, Write};
use std::str;

/// Printed when a key has no value, the answer a rewrite-map program gives
/// for "no mapping".
pub const DEFAULT_MISS_MARKER: &str = "NULL";

/// Where the lookup loop is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupState {
    /// Waiting for the next input line
    AwaitingLine,
    /// Fetching the value for this (stripped, not yet namespaced) key
    Querying(String),
    /// About to print a value, or the miss marker for `None`
    Emitting(Option<String>),
    /// End of input
    Terminated,
}

/// Counts from a finished lookup run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupReport {
    /// Input lines answered
    pub lines: usize,
    /// Lines answered with a stored value
    pub hits: usize,
    /// Lines answered with the miss marker
    pub misses: usize,
}

/// Reads keys, fetches their namespaced values and prints them.
#[derive(Debug)]
pub struct Lookup {
    log: Logger,
    namespace: Namespace,
    miss_marker: String,
}

impl Lookup {
    #[allow(missing_docs)]
    pub fn new(log: Logger, namespace: Namespace, miss_marker: impl Into<String>) -> Lookup {
        Lookup {
            log,
            namespace,
            miss_marker: miss_marker.into(),
        }
    }

    /// Answer every line of `input` on `output` until end of input.
    ///
    /// Exactly one line is written, and flushed, per input line. A key with no
    /// value, or one the store refuses, is answered with the miss marker.
    /// Errors that leave the store unusable end the run.
    pub fn run<R, W, S>(&self, input: &mut R, output: &mut W, store: &mut S) -> Result<LookupReport>
    where
        R: BufRead,
        W: Write,
        S: Store,
    {
        let mut report = LookupReport::default();
        let mut state = LookupState::AwaitingLine;
        let mut buf = Vec::new();

        loop {
            state = match state {
                LookupState::AwaitingLine => {
                    buf.clear();
                    if input.read_until(b'\n', &mut buf)? == 0 {
                        LookupState::Terminated
                    } else {
                        match str::from_utf8(&buf) {
                            Ok(line) if !line.trim().is_empty() => {
                                LookupState::Querying(line.trim().to_owned())
                            }
                            Ok(_) => LookupState::Emitting(None),
                            Err(_) => {
                                warn!(self.log, "Input line is not valid UTF-8");
                                LookupState::Emitting(None)
                            }
                        }
                    }
                }
                LookupState::Querying(key) => match store
                    .get(self.namespace.key(&key))
                    .and_then(single_line)
                {
                    Ok(value) => {
                        if value.is_none() {
                            debug!(self.log, "No value"; "key" => &key);
                        }
                        LookupState::Emitting(value)
                    }
                    Err(e) => {
                        if !is_recoverable(&e) {
                            return Err(e);
                        }
                        warn!(self.log, "Lookup failed"; "key" => &key, "error" => %e);
                        LookupState::Emitting(None)
                    }
                },
                LookupState::Emitting(value) => {
                    report.lines += 1;
                    match value {
                        Some(value) => {
                            report.hits += 1;
                            writeln!(output, "{}", value)?;
                        }
                        None => {
                            report.misses += 1;
                            writeln!(output, "{}", self.miss_marker)?;
                        }
                    }
                    output.flush()?;
                    LookupState::AwaitingLine
                }
                LookupState::Terminated => break,
            };
        }

        debug!(self.log, "End of input";
            "lines" => report.lines,
            "hits" => report.hits,
            "misses" => report.misses);
        Ok(report)
    }
}

/// Refuse values that would not fit on one answer line.
fn single_line(value: Option<String>) -> Result<Option<String>> {
    match value {
        Some(ref v) if v.contains(|c: char| c == '\n' || c == '\r') => Err(MapError::StoreOperation {
            message: "value contains a line break".to_owned(),
        }
        .into()),
        value => Ok(value),
    }
}
