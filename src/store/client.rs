use super::resp::{read_frame, write_frame, Frame};
use super::Store;
use crate::errors::MapError;
use crate::Result;
use slog::Logger;
use std::io::{BufReader, BufWriter, Write};
use std::net::TcpStream;

/// Host used when none is given on the command line.
pub const DEFAULT_HOST: &str = "localhost";
/// The standard store port.
pub const DEFAULT_PORT: u16 = 6379;

/// Where to find the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    #[allow(missing_docs)]
    pub host: String,
    #[allow(missing_docs)]
    pub port: u16,
    /// Database index, selected right after connecting when non-zero
    pub db: u32,
}

impl StoreConfig {
    /// `host:port`, as used in log and error messages.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            db: 0,
        }
    }
}

/// Client for a key-value store speaking RESP over a single TCP connection.
///
/// Every command blocks until its reply has been read.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug)]
pub struct StoreClient {
    log: Logger,
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl StoreClient {
    /// Connect to the store, selecting the configured database.
    pub fn connect(config: &StoreConfig, log: Logger) -> Result<StoreClient> {
        let addr = config.addr();
        let stream = TcpStream::connect((config.host.as_str(), config.port)).map_err(|e| {
            MapError::StoreConnection {
                addr: addr.clone(),
                cause: e.to_string(),
            }
        })?;
        stream.set_nodelay(true)?;

        let mut client = StoreClient {
            log: log.new(o!("store" => addr)),
            reader: BufReader::new(stream.try_clone()?),
            writer: BufWriter::new(stream),
        };
        debug!(client.log, "Connected");

        if config.db != 0 {
            let db = config.db.to_string();
            client.expect_ok(&["SELECT", db.as_str()])?;
            debug!(client.log, "Selected database"; "db" => config.db);
        }

        Ok(client)
    }

    /// Send one command and wait for its reply.
    ///
    /// Error replies are turned into [`MapError::StoreOperation`].
    pub fn call(&mut self, words: &[&str]) -> Result<Frame> {
        write_frame(&mut self.writer, &Frame::command(words))?;
        self.writer.flush()?;

        match read_frame(&mut self.reader)? {
            Frame::Error(message) => Err(MapError::StoreOperation { message }.into()),
            reply => Ok(reply),
        }
    }

    fn expect_ok(&mut self, words: &[&str]) -> Result<()> {
        match self.call(words)? {
            Frame::Simple(ref s) if s == "OK" => Ok(()),
            reply => Err(unexpected(&reply)),
        }
    }
}

impl Store for StoreClient {
    fn set(&mut self, key: String, value: String) -> Result<()> {
        trace!(self.log, "SET"; "key" => &key);
        self.expect_ok(&["SET", key.as_str(), value.as_str()])
    }

    fn get(&mut self, key: String) -> Result<Option<String>> {
        trace!(self.log, "GET"; "key" => &key);
        match self.call(&["GET", key.as_str()])? {
            Frame::Bulk(None) => Ok(None),
            Frame::Bulk(Some(bytes)) => match String::from_utf8(bytes) {
                Ok(value) => Ok(Some(value)),
                Err(_) => Err(MapError::StoreOperation {
                    message: format!("value for {} is not valid UTF-8", key),
                }
                .into()),
            },
            reply => Err(unexpected(&reply)),
        }
    }
}

fn unexpected(reply: &Frame) -> failure::Error {
    MapError::UnexpectedReply {
        reply: format!("{:?}", reply),
    }
    .into()
}
