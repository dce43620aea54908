//! Tile query orchestration.
//!
//! [`TileFetcher`] ties the pieces together: it looks a tile up in the disk
//! cache, otherwise requests it over the persistent connection and decodes
//! the body straight from the socket while mirroring it into the cache.
//! Every accepted element is handed to a [`TileSink`].
//!
//! # Example
//!
//! ```no_run
//! use tilewire::coord::TileCoord;
//! use tilewire::fetcher::{ElementCollector, FetcherConfig, QueryResult, TileFetcher};
//!
//! let mut fetcher = TileFetcher::new(FetcherConfig::default());
//! let mut sink = ElementCollector::new();
//!
//! let tile = TileCoord::new(14, 8800, 5373).unwrap();
//! if fetcher.execute_query(&tile, &mut sink) == QueryResult::Success {
//!     println!("{} elements", sink.elements.len());
//! }
//! ```

mod config;
mod error;
mod map_info;
mod sink;

pub use config::FetcherConfig;
pub use error::FetchError;
pub use map_info::{BoundingBox, MapInfo};
pub use sink::{Element, ElementCollector, ElementKind, TileSink};

use crate::cache::{CacheStats, CacheWriter, DiskCache};
use crate::connection::{NetworkError, TileConnection};
use crate::coord::TileCoord;
use crate::wire::{ByteStream, DecodeSummary, FormatError, WireDecoder};
use std::cell::Cell;
use std::marker::PhantomData;
use tracing::{debug, warn};

/// Coarse outcome of [`TileFetcher::execute_query`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryResult {
    Success,
    Failed,
}

impl QueryResult {
    pub fn is_success(self) -> bool {
        self == QueryResult::Success
    }
}

/// Where a tile body came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileSource {
    Cache,
    Network,
}

/// Details of a successful query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuerySummary {
    pub source: TileSource,
    pub decode: DecodeSummary,
}

/// Fetches and decodes tiles for one worker.
///
/// Owns a connection, a decoder with its scratch buffers and optionally a
/// disk cache. It is meant to live as long as its worker thread and is not
/// shareable between threads; give every worker its own fetcher.
pub struct TileFetcher {
    config: FetcherConfig,
    connection: TileConnection,
    decoder: WireDecoder,
    cache: Option<DiskCache>,
    map_info: MapInfo,
    is_open: bool,
    _not_sync: PhantomData<Cell<()>>,
}

impl TileFetcher {
    /// Creates a closed fetcher. No I/O happens until [`open`](Self::open)
    /// or the first query.
    pub fn new(config: FetcherConfig) -> Self {
        Self {
            connection: TileConnection::new(config.connection().clone()),
            decoder: WireDecoder::new(config.scale()),
            cache: None,
            map_info: MapInfo::default(),
            is_open: false,
            config,
            _not_sync: PhantomData,
        }
    }

    /// Prepares the cache directory when caching is configured.
    pub fn open(&mut self) -> Result<(), FetchError> {
        if self.is_open {
            return Ok(());
        }
        if let Some(dir) = self.config.cache_dir() {
            self.cache = Some(DiskCache::open(dir)?);
        }
        self.is_open = true;
        debug!(
            server = %self.config.connection().address(),
            cache = self.cache.is_some(),
            "Tile fetcher opened"
        );
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Closes the socket and releases the cache. The fetcher can be reopened.
    pub fn close(&mut self) {
        self.connection.close();
        self.cache = None;
        self.is_open = false;
    }

    pub fn map_info(&self) -> &MapInfo {
        &self.map_info
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// The underlying connection, for inspecting reuse.
    pub fn connection(&self) -> &TileConnection {
        &self.connection
    }

    /// Cache counters, if caching is active.
    pub fn cache_stats(&self) -> Option<&CacheStats> {
        self.cache.as_ref().map(DiskCache::stats)
    }

    /// Fetches `tile` and passes its elements to `sink`.
    ///
    /// Never panics on bad input or I/O failure; causes are logged and
    /// reported as [`QueryResult::Failed`]. Use [`try_query`](Self::try_query)
    /// to get the cause.
    pub fn execute_query(&mut self, tile: &TileCoord, sink: &mut dyn TileSink) -> QueryResult {
        match self.try_query(tile, sink) {
            Ok(summary) => {
                debug!(
                    tile = %tile,
                    source = ?summary.source,
                    emitted = summary.decode.emitted,
                    dropped = summary.decode.dropped,
                    bytes = summary.decode.bytes,
                    "Tile query complete"
                );
                QueryResult::Success
            }
            Err(e) => {
                warn!(tile = %tile, error = %e, "Tile query failed");
                QueryResult::Failed
            }
        }
    }

    /// Fetches `tile` and passes its elements to `sink`, returning the cause
    /// on failure.
    ///
    /// A cached copy is used when present. If it fails to decode it is
    /// deleted and the tile is fetched from the server; elements emitted
    /// before the failure are not retracted.
    pub fn try_query(
        &mut self,
        tile: &TileCoord,
        sink: &mut dyn TileSink,
    ) -> Result<QuerySummary, FetchError> {
        self.open()?;
        self.decoder.reset();

        if let Some(summary) = self.query_cache(tile, sink) {
            return Ok(summary);
        }

        match self.query_network(tile, sink) {
            Ok(summary) => {
                self.connection.mark_idle();
                Ok(summary)
            }
            Err(e) => {
                // Stream position is unknown after a failure
                self.connection.close();
                Err(e)
            }
        }
    }

    fn query_cache(&mut self, tile: &TileCoord, sink: &mut dyn TileSink) -> Option<QuerySummary> {
        let cache = self.cache.as_mut()?;
        let mut hit = cache.lookup(tile)?;
        let Ok(len) = usize::try_from(hit.len) else {
            return None;
        };

        self.decoder.buffer_mut().begin_content(len);
        let mut stream = ByteStream::new(&mut hit.file);

        match self.decoder.decode(&mut stream, sink) {
            Ok(decode) => Some(QuerySummary {
                source: TileSource::Cache,
                decode,
            }),
            Err(FormatError::Read(e)) => {
                warn!(tile = %tile, error = %e, "Failed to read cached tile, fetching from server");
                self.decoder.reset();
                None
            }
            Err(e) => {
                warn!(tile = %tile, error = %e, "Cached tile is corrupt, fetching from server");
                drop(hit);
                cache.evict(tile);
                self.decoder.reset();
                None
            }
        }
    }

    fn query_network(
        &mut self,
        tile: &TileCoord,
        sink: &mut dyn TileSink,
    ) -> Result<QuerySummary, FetchError> {
        self.connection.send_request(tile)?;
        let length = self.connection.read_header(self.decoder.buffer_mut())?;
        debug!(tile = %tile, bytes = length, "Receiving tile");

        let mut writer = self.begin_cache_write(tile);
        let socket = self
            .connection
            .stream_mut()
            .ok_or(NetworkError::NotConnected)?;

        let mut stream = ByteStream::new(socket);
        if let Some(writer) = writer.as_mut() {
            stream = stream.with_mirror(writer);
        }
        let result = self.decoder.decode(&mut stream, sink);
        let mirror_failed = stream.mirror_failed();

        match result {
            Ok(decode) => {
                self.finish_cache_write(writer, !mirror_failed);
                Ok(QuerySummary {
                    source: TileSource::Network,
                    decode,
                })
            }
            Err(e) => {
                self.finish_cache_write(writer, false);
                Err(FetchError::from_socket_decode(e))
            }
        }
    }

    fn begin_cache_write(&self, tile: &TileCoord) -> Option<CacheWriter> {
        let cache = self.cache.as_ref()?;
        match cache.begin(tile) {
            Ok(writer) => Some(writer),
            Err(e) => {
                warn!(tile = %tile, error = %e, "Cannot cache tile");
                None
            }
        }
    }

    fn finish_cache_write(&mut self, writer: Option<CacheWriter>, keep: bool) {
        let (Some(writer), Some(cache)) = (writer, self.cache.as_mut()) else {
            return;
        };
        if !keep {
            cache.abort(writer);
            return;
        }
        if let Err(e) = cache.commit(writer) {
            warn!(error = %e, "Failed to commit cached tile");
        }
    }
}
