//! A tiny RESP server backed by a `HashMap`, standing in for the real store.

#![allow(dead_code)]

use kvmap::store::resp::{read_frame, write_frame, Frame};
use std::collections::HashMap;
use std::io::{BufReader, BufWriter, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

type Data = Arc<Mutex<HashMap<(u32, String), String>>>;

pub struct FakeStore {
    addr: SocketAddr,
    data: Data,
    log: Arc<Mutex<Vec<Vec<String>>>>,
}

impl FakeStore {
    /// Start listening on a free local port. The server runs until the test process exits.
    pub fn start() -> FakeStore {
        let listener = TcpListener::bind("127.0.0.1:0").expect("unable to bind fake store");
        let addr = listener.local_addr().unwrap();
        let data = Data::default();
        let log = Arc::new(Mutex::new(Vec::new()));

        let (d, l) = (data.clone(), log.clone());
        thread::spawn(move || {
            for stream in listener.incoming() {
                let stream = match stream {
                    Ok(stream) => stream,
                    Err(_) => continue,
                };
                let (d, l) = (d.clone(), l.clone());
                thread::spawn(move || serve(stream, d, l));
            }
        });

        FakeStore { addr, data, log }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn config(&self) -> kvmap::StoreConfig {
        kvmap::StoreConfig {
            host: "127.0.0.1".to_owned(),
            port: self.port(),
            db: 0,
        }
    }

    pub fn get(&self, db: u32, key: &str) -> Option<String> {
        self.data
            .lock()
            .unwrap()
            .get(&(db, key.to_owned()))
            .cloned()
    }

    pub fn insert(&self, db: u32, key: &str, value: &str) {
        self.data
            .lock()
            .unwrap()
            .insert((db, key.to_owned()), value.to_owned());
    }

    /// Every command received so far, in order.
    pub fn commands(&self) -> Vec<Vec<String>> {
        self.log.lock().unwrap().clone()
    }
}

fn serve(stream: TcpStream, data: Data, log: Arc<Mutex<Vec<Vec<String>>>>) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut writer = BufWriter::new(stream);
    let mut db = 0;

    while let Ok(frame) = read_frame(&mut reader) {
        let words = match frame.into_command() {
            Some(words) => words,
            None => break,
        };
        log.lock().unwrap().push(words.clone());

        let reply = match words
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .as_slice()
        {
            ["SELECT", index] => match index.parse() {
                Ok(index) => {
                    db = index;
                    Frame::Simple("OK".to_owned())
                }
                Err(_) => Frame::Error("ERR invalid DB index".to_owned()),
            },
            ["SET", key, value] => {
                data.lock()
                    .unwrap()
                    .insert((db, (*key).to_owned()), (*value).to_owned());
                Frame::Simple("OK".to_owned())
            }
            ["GET", key] if key.starts_with("wrongtype:") => Frame::Error(
                "WRONGTYPE Operation against a key holding the wrong kind of value".to_owned(),
            ),
            ["GET", key] if key.ends_with("/hangup") => break,
            ["GET", key] => Frame::Bulk(
                data.lock()
                    .unwrap()
                    .get(&(db, (*key).to_owned()))
                    .map(|v| v.clone().into_bytes()),
            ),
            _ => Frame::Error("ERR unknown command".to_owned()),
        };

        if write_frame(&mut writer, &reply).is_err() || writer.flush().is_err() {
            break;
        }
    }
}
