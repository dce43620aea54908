//! tilewire - streaming vector map tile client
//!
//! Fetches map tiles in a compact varint/zigzag wire format from a tile
//! server over a reused keep-alive socket, decodes them while they stream in
//! and hands lines, polygons and points with resolved tags to a caller
//! supplied [`TileSink`](fetcher::TileSink). Fetched tiles can be mirrored
//! into a flat disk cache.
//!
//! # High-Level API
//!
//! ```no_run
//! use tilewire::config::ConfigFile;
//! use tilewire::coord::TileCoord;
//! use tilewire::fetcher::{ElementCollector, FetcherConfig, TileFetcher};
//!
//! let config = ConfigFile::load()?;
//! let mut fetcher = TileFetcher::new(FetcherConfig::from(&config));
//! let mut sink = ElementCollector::new();
//!
//! let summary = fetcher.try_query(&TileCoord::new(14, 8800, 5373)?, &mut sink)?;
//! println!("{} elements from {:?}", summary.decode.emitted, summary.source);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cache;
pub mod config;
pub mod connection;
pub mod coord;
pub mod fetcher;
pub mod logging;
pub mod tags;
pub mod wire;

pub use coord::TileCoord;
pub use fetcher::{FetchError, QueryResult, TileFetcher, TileSink};
pub use tags::Tag;

/// Version of the tilewire library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
