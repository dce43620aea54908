//! Shared helpers for integration tests.
//!
//! [`MockTileServer`] speaks just enough HTTP/1.1 to serve tiles over
//! keep-alive connections: it reads request heads, looks the tile path up in
//! its table and answers with a length-prefixed body or a 404.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use tilewire::coord::TileCoord;
use tilewire::fetcher::{FetcherConfig, TileFetcher};
use tilewire::tags::{TagDictionary, TAG_LIMIT};
use tilewire::wire::{ElementBuilder, TileEncoder};

pub const URL_PREFIX: &str = "/osci/oscim/";

#[derive(Default)]
struct ServerState {
    tiles: HashMap<String, Vec<u8>>,
    requests: Vec<String>,
}

/// Local tile server counting connections and requests.
pub struct MockTileServer {
    addr: SocketAddr,
    state: Arc<Mutex<ServerState>>,
    connections: Arc<AtomicUsize>,
}

impl MockTileServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(Mutex::new(ServerState::default()));
        let connections = Arc::new(AtomicUsize::new(0));

        let shared = state.clone();
        let counter = connections.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                counter.fetch_add(1, Ordering::SeqCst);
                let state = shared.clone();
                thread::spawn(move || handle_connection(stream, state));
            }
        });

        Self {
            addr,
            state,
            connections,
        }
    }

    /// Serves `body` for `tile` from now on.
    pub fn insert(&self, tile: &TileCoord, body: Vec<u8>) {
        self.state.lock().unwrap().tiles.insert(tile_path(tile), body);
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Connections accepted so far.
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// Request paths in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Fetcher configuration pointing at this server, without cache.
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig::new()
            .with_server(self.addr.ip().to_string(), self.addr.port())
            .without_cache()
    }

    pub fn fetcher(&self) -> TileFetcher {
        TileFetcher::new(self.fetcher_config())
    }
}

fn tile_path(tile: &TileCoord) -> String {
    format!("{}{}/{}/{}.osmtile", URL_PREFIX, tile.zoom, tile.x, tile.y)
}

fn handle_connection(stream: TcpStream, state: Arc<Mutex<ServerState>>) {
    let Ok(read_half) = stream.try_clone() else { return };
    let mut reader = BufReader::new(read_half);
    let mut writer = stream;
    let mut path = None;

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }

        if let Some(rest) = line.strip_prefix("GET ") {
            path = rest.split_whitespace().next().map(str::to_string);
            continue;
        }
        if line != "\r\n" {
            continue;
        }

        let Some(requested) = path.take() else { return };
        let response = {
            let mut state = state.lock().unwrap();
            state.requests.push(requested.clone());
            match state.tiles.get(&requested) {
                Some(body) => ok_response(body),
                None => b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n".to_vec(),
            }
        };
        if writer.write_all(&response).is_err() {
            return;
        }
    }
}

/// Server that answers the first request with `partial` and then goes
/// silent, keeping the socket open until the client hangs up.
pub fn stalling_server(partial: &'static [u8]) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        let Ok((stream, _)) = listener.accept() else { return };
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut writer = stream;
        let mut answered = false;
        loop {
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) | Err(_) => return,
                Ok(_) if line == "\r\n" && !answered => {
                    answered = true;
                    if writer.write_all(partial).is_err() {
                        return;
                    }
                }
                Ok(_) => {}
            }
        }
    });

    addr
}

/// Status line, headers, 4-byte big-endian length and body.
pub fn ok_response(body: &[u8]) -> Vec<u8> {
    let mut response =
        b"HTTP/1.1 200 OK\r\nContent-Type: application/osmtile\r\nConnection: Keep-Alive\r\n\r\n"
            .to_vec();
    response.extend_from_slice(&(body.len() as u32).to_be_bytes());
    response.extend_from_slice(body);
    response
}

pub fn key(name: &str) -> u32 {
    TagDictionary::global().key_id(name).unwrap()
}

pub fn dictionary_tag(key: &str, value: &str) -> u32 {
    TagDictionary::global().tag_id(key, value).unwrap()
}

/// The Bremen tile: variable tags name=Foo and highway=primary and one
/// three-node line on layer 3 using both.
pub fn bremen_tile() -> Vec<u8> {
    let mut tile = TileEncoder::new();
    tile.variable_tags(&[(key("name"), "Foo"), (key("highway"), "primary")])
        .element(
            &ElementBuilder::line()
                .tags(&[TAG_LIMIT, TAG_LIMIT + 1])
                .path(&[(0, 0), (1024, 512), (2048, 4096)])
                .layer(3),
        )
        .end();
    tile.into_bytes()
}

pub fn bremen() -> TileCoord {
    TileCoord::new(14, 8800, 5373).unwrap()
}
