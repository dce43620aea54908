//! Flat on-disk tile cache with write-then-rename commits.

use crate::cache::path::{cache_path, temp_path};
use crate::cache::stats::CacheStats;
use crate::cache::types::CacheError;
use crate::coord::TileCoord;
use std::fs::{self, File};
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A cache hit: the open tile file and its length.
#[derive(Debug)]
pub struct CachedTile {
    pub file: File,
    pub len: u64,
    pub path: PathBuf,
}

/// Disk cache storing one file per tile.
///
/// Files hold the exact tile body received from the server. A tile becomes
/// visible only after its [`CacheWriter`] is committed, so readers never see
/// partial files.
#[derive(Debug)]
pub struct DiskCache {
    /// Cache directory root
    cache_dir: PathBuf,
    /// Statistics
    stats: CacheStats,
}

impl DiskCache {
    /// Opens a cache rooted at `cache_dir`, creating the directory if needed.
    pub fn open(cache_dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let cache_dir = cache_dir.into();

        match fs::metadata(&cache_dir) {
            Ok(meta) if !meta.is_dir() => return Err(CacheError::NotADirectory(cache_dir)),
            Ok(meta) if meta.permissions().readonly() => {
                return Err(CacheError::ReadOnly(cache_dir))
            }
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => fs::create_dir_all(&cache_dir)?,
            Err(e) => return Err(e.into()),
        }

        debug!(path = %cache_dir.display(), "Opened tile cache");
        Ok(Self {
            cache_dir,
            stats: CacheStats::new(),
        })
    }

    /// Cache directory root.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Get cache statistics.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Check if a committed file exists for `tile`.
    pub fn contains(&self, tile: &TileCoord) -> bool {
        cache_path(&self.cache_dir, tile).is_file()
    }

    /// Opens the cached file for `tile`.
    ///
    /// Empty files are treated as corrupt and removed. Read errors are
    /// logged and reported as a miss.
    pub fn lookup(&mut self, tile: &TileCoord) -> Option<CachedTile> {
        let path = cache_path(&self.cache_dir, tile);

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    warn!(tile = %tile, error = %e, "Failed to open cached tile");
                }
                self.stats.record_miss();
                return None;
            }
        };

        let len = match file.metadata() {
            Ok(meta) => meta.len(),
            Err(e) => {
                warn!(tile = %tile, error = %e, "Failed to stat cached tile");
                self.stats.record_miss();
                return None;
            }
        };

        if len == 0 {
            drop(file);
            self.evict(tile);
            self.stats.record_miss();
            return None;
        }

        debug!(tile = %tile, bytes = len, "Cache hit");
        self.stats.record_hit();
        Some(CachedTile { file, len, path })
    }

    /// Starts writing `tile` to a temporary file.
    pub fn begin(&self, tile: &TileCoord) -> Result<CacheWriter, CacheError> {
        let temp = temp_path(&self.cache_dir, tile);
        let file = File::create(&temp)?;

        Ok(CacheWriter {
            file: Some(BufWriter::new(file)),
            temp,
            path: cache_path(&self.cache_dir, tile),
            written: 0,
            committed: false,
        })
    }

    /// Commits `writer` and records the write.
    pub fn commit(&mut self, writer: CacheWriter) -> Result<u64, CacheError> {
        match writer.commit() {
            Ok(bytes) => {
                self.stats.record_write(bytes);
                Ok(bytes)
            }
            Err(e) => {
                self.stats.record_write_failure();
                Err(e)
            }
        }
    }

    /// Discards `writer` and records the failed write.
    pub fn abort(&mut self, writer: CacheWriter) {
        writer.abort();
        self.stats.record_write_failure();
    }

    /// Deletes the committed file for `tile`. Returns true if a file was removed.
    pub fn evict(&mut self, tile: &TileCoord) -> bool {
        let path = cache_path(&self.cache_dir, tile);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(tile = %tile, "Evicted cached tile");
                self.stats.record_eviction();
                true
            }
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                warn!(tile = %tile, error = %e, "Failed to evict cached tile");
                false
            }
        }
    }
}

/// Buffered writer for one tile.
///
/// Dropping an uncommitted writer deletes its temporary file.
#[derive(Debug)]
pub struct CacheWriter {
    file: Option<BufWriter<File>>,
    temp: PathBuf,
    path: PathBuf,
    written: u64,
    committed: bool,
}

impl CacheWriter {
    /// Bytes written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flushes the file and renames it into place. Returns the file size.
    pub fn commit(mut self) -> Result<u64, CacheError> {
        let file = self
            .file
            .take()
            .ok_or_else(|| io::Error::new(ErrorKind::Other, "cache writer already closed"))?;
        let file = file.into_inner().map_err(|e| e.into_error())?;
        drop(file);

        fs::rename(&self.temp, &self.path)?;
        self.committed = true;

        debug!(path = %self.path.display(), bytes = self.written, "Cached tile");
        Ok(self.written)
    }

    /// Deletes the temporary file.
    pub fn abort(self) {
        drop(self);
    }

    fn discard(&mut self) {
        self.file.take();
        if let Err(e) = fs::remove_file(&self.temp) {
            if e.kind() != ErrorKind::NotFound {
                warn!(path = %self.temp.display(), error = %e, "Failed to remove partial cache file");
            }
        }
    }
}

impl Write for CacheWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(ErrorKind::Other, "cache writer closed"))?;
        let n = file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for CacheWriter {
    fn drop(&mut self) {
        if !self.committed {
            self.discard();
        }
    }
}
