//! Just enough of the Redis serialization protocol (RESP2) to talk to a store.
//!
//! Commands go out as arrays of bulk strings. Replies come back as one of the
//! five frame types below.

use crate::errors::MapError;
use crate::Result;
use std::io::{BufRead, Read, Write};

const CRLF: &[u8] = b"\r\n";

/// Largest bulk string a Redis server accepts (`proto-max-bulk-len`).
const MAX_BULK_LEN: i64 = 512 * 1024 * 1024;
/// Largest array we are willing to read.
const MAX_ARRAY_LEN: i64 = 1024 * 1024;
/// Deepest array nesting we are willing to read.
const MAX_DEPTH: usize = 32;

/// A single RESP value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// `+OK`
    Simple(String),
    /// `-ERR message`
    Error(String),
    /// `:42`
    Integer(i64),
    /// `$3\r\nfoo`, or `$-1` for a missing value
    Bulk(Option<Vec<u8>>),
    /// `*2\r\n...`, or `*-1`
    Array(Option<Vec<Frame>>),
}

impl Frame {
    /// Build a command frame from its words, e.g. `["GET", "key"]`.
    pub fn command<S: AsRef<str>>(words: &[S]) -> Frame {
        Frame::Array(Some(
            words
                .iter()
                .map(|w| Frame::Bulk(Some(w.as_ref().as_bytes().to_vec())))
                .collect(),
        ))
    }

    /// The words of a command frame, if this is one.
    pub fn into_command(self) -> Option<Vec<String>> {
        match self {
            Frame::Array(Some(items)) => items
                .into_iter()
                .map(|item| match item {
                    Frame::Bulk(Some(bytes)) => String::from_utf8(bytes).ok(),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }
}

/// Write a frame. Does not flush.
pub fn write_frame<W: Write>(writer: &mut W, frame: &Frame) -> Result<()> {
    match frame {
        Frame::Simple(s) => write!(writer, "+{}\r\n", s)?,
        Frame::Error(s) => write!(writer, "-{}\r\n", s)?,
        Frame::Integer(n) => write!(writer, ":{}\r\n", n)?,
        Frame::Bulk(None) => writer.write_all(b"$-1\r\n")?,
        Frame::Bulk(Some(bytes)) => {
            write!(writer, "${}\r\n", bytes.len())?;
            writer.write_all(bytes)?;
            writer.write_all(CRLF)?;
        }
        Frame::Array(None) => writer.write_all(b"*-1\r\n")?,
        Frame::Array(Some(items)) => {
            write!(writer, "*{}\r\n", items.len())?;
            for item in items {
                write_frame(writer, item)?;
            }
        }
    }
    Ok(())
}

/// Read one complete frame, blocking until it has arrived.
///
/// End of stream before the first byte is [`MapError::ConnectionClosed`].
pub fn read_frame<R: BufRead>(reader: &mut R) -> Result<Frame> {
    read_nested(reader, 0)
}

fn read_nested<R: BufRead>(reader: &mut R, depth: usize) -> Result<Frame> {
    if depth > MAX_DEPTH {
        return Err(protocol_error("arrays nested too deeply"));
    }

    let line = read_line(reader)?;
    let (kind, rest) = match line.split_first() {
        Some((kind, rest)) => (*kind, rest),
        None => return Err(protocol_error("empty frame header")),
    };

    match kind {
        b'+' => Ok(Frame::Simple(text(rest)?)),
        b'-' => Ok(Frame::Error(text(rest)?)),
        b':' => Ok(Frame::Integer(number(rest)?)),
        b'$' => {
            let len = number(rest)?;
            if len < 0 {
                return Ok(Frame::Bulk(None));
            }
            let total = match (len as usize).checked_add(CRLF.len()) {
                Some(total) if len <= MAX_BULK_LEN => total,
                _ => return Err(protocol_error("bulk length out of range")),
            };
            let mut buf = vec![0; total];
            reader.read_exact(&mut buf)?;
            if !buf.ends_with(CRLF) {
                return Err(protocol_error("bulk string not terminated by CRLF"));
            }
            buf.truncate(len as usize);
            Ok(Frame::Bulk(Some(buf)))
        }
        b'*' => {
            let len = number(rest)?;
            if len < 0 {
                return Ok(Frame::Array(None));
            }
            if len > MAX_ARRAY_LEN {
                return Err(protocol_error("array length out of range"));
            }
            let items = (0..len)
                .map(|_| read_nested(reader, depth + 1))
                .collect::<Result<Vec<Frame>>>()?;
            Ok(Frame::Array(Some(items)))
        }
        other => Err(protocol_error(&format!(
            "unknown frame type {:?}",
            other as char
        ))),
    }
}

/// Read a CRLF-terminated header line, without the terminator.
fn read_line<R: BufRead>(reader: &mut R) -> Result<Vec<u8>> {
    let mut line = Vec::new();
    if reader.read_until(b'\n', &mut line)? == 0 {
        return Err(MapError::ConnectionClosed.into());
    }
    if !line.ends_with(CRLF) {
        return Err(protocol_error("header not terminated by CRLF"));
    }
    line.truncate(line.len() - CRLF.len());
    Ok(line)
}

fn text(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|_| protocol_error("header is not UTF-8"))
}

fn number(bytes: &[u8]) -> Result<i64> {
    text(bytes)?
        .parse::<i64>()
        .map_err(|_| protocol_error("invalid integer"))
}

fn protocol_error(message: &str) -> failure::Error {
    MapError::Protocol {
        message: message.to_owned(),
    }
    .into()
}
