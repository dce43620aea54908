//! Fetch command - query one tile and print its elements.

use clap::Args;
use std::io::{self, Write};
use std::path::PathBuf;
use tilewire::config::ConfigFile;
use tilewire::coord::TileCoord;
use tilewire::fetcher::{FetcherConfig, QuerySummary, TileFetcher, TileSink, TileSource};
use tilewire::logging::init_logging;
use tilewire::Tag;
use tracing::info;

use crate::error::CliError;

/// Arguments for the fetch command.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Zoom level
    #[arg(long, short)]
    pub zoom: u8,

    /// Tile column
    #[arg(long, short)]
    pub x: u32,

    /// Tile row
    #[arg(long, short)]
    pub y: u32,

    /// Config file to use instead of ~/.tilewire/config.ini
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Always fetch from the server and do not write the cache
    #[arg(long, conflicts_with = "cache_dir")]
    pub no_cache: bool,

    /// Cache directory (enables caching)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,
}

/// Run the fetch command.
pub fn run(args: FetchArgs) -> Result<(), CliError> {
    let tile = TileCoord::new(args.zoom, args.x, args.y)?;

    let mut config = match &args.config {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    apply_overrides(&mut config, &args);

    let _logging_guard = init_logging(&config.logging.file, &config.logging.level)
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

    info!(
        tile = %tile,
        server = %format!("{}:{}", config.server.host, config.server.port),
        cache = config.cache.enabled,
        "Fetching tile"
    );

    let mut fetcher = TileFetcher::new(FetcherConfig::from(&config));
    let stdout = io::stdout();
    let mut printer = ElementPrinter::new(stdout.lock());

    let result = fetcher.try_query(&tile, &mut printer);
    fetcher.close();
    let summary = result?;

    printer.finish(&tile, &summary)?;
    Ok(())
}

/// Applies command-line cache switches on top of the loaded config.
fn apply_overrides(config: &mut ConfigFile, args: &FetchArgs) {
    if args.no_cache {
        config.cache.enabled = false;
    }
    if let Some(dir) = &args.cache_dir {
        config.cache.enabled = true;
        config.cache.directory = dir.clone();
    }
}

/// Sink that prints one line per element.
///
/// Write errors are held until [`finish`](Self::finish) since the sink
/// callbacks cannot fail.
struct ElementPrinter<W: Write> {
    out: W,
    error: Option<io::Error>,
    ways: usize,
    polygons: usize,
    points: usize,
}

impl<W: Write> ElementPrinter<W> {
    fn new(out: W) -> Self {
        Self {
            out,
            error: None,
            ways: 0,
            polygons: 0,
            points: 0,
        }
    }

    fn write_line(&mut self, line: String) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = writeln!(self.out, "{}", line) {
            self.error = Some(e);
        }
    }

    /// Prints the summary, or returns the first write error.
    fn finish(mut self, tile: &TileCoord, summary: &QuerySummary) -> io::Result<()> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }

        let source = match summary.source {
            TileSource::Cache => "cache",
            TileSource::Network => "network",
        };
        writeln!(self.out)?;
        writeln!(
            self.out,
            "Tile {} from {}: {} element(s) ({} way, {} poly, {} poi), {} dropped, {} bytes",
            tile,
            source,
            summary.decode.emitted,
            self.ways,
            self.polygons,
            self.points,
            summary.decode.dropped,
            summary.decode.bytes
        )?;
        if !summary.decode.complete {
            writeln!(self.out, "Decoding stopped early at an unknown tile field")?;
        }
        self.out.flush()
    }
}

impl<W: Write> TileSink for ElementPrinter<W> {
    fn render_way(
        &mut self,
        layer: u8,
        tags: &[Tag],
        coords: &[f32],
        subpath_lengths: &[i32],
        is_polygon: bool,
    ) {
        if is_polygon {
            self.polygons += 1;
        } else {
            self.ways += 1;
        }
        let kind = if is_polygon { "poly" } else { "way" };
        self.write_line(format!(
            "{:<4} layer={} coords={} subpaths={} {}",
            kind,
            layer,
            coords.len(),
            subpath_lengths.len(),
            format_tags(tags)
        ));
    }

    fn render_point_of_interest(&mut self, layer: u8, tags: &[Tag], lat: f32, lon: f32) {
        self.points += 1;
        self.write_line(format!(
            "{:<4} layer={} at=({:.1}, {:.1}) {}",
            "poi",
            layer,
            lon,
            lat,
            format_tags(tags)
        ));
    }
}

fn format_tags(tags: &[Tag]) -> String {
    let joined: Vec<String> = tags.iter().map(Tag::to_string).collect();
    format!("[{}]", joined.join(", "))
}
