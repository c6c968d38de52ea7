//! Single-slot TMY cache.
//!
//! Only the most recent fetch is kept. A record is a hit only when both the
//! stored query key and the coordinate columns inside the frame equal the
//! requested pair exactly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::TmyFrame;
use crate::error::Result;

/// The last fetched frame with the coordinates it was requested for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub lat: f64,
    pub lon: f64,
    pub frame: TmyFrame,
}

impl CacheRecord {
    pub fn new(lat: f64, lon: f64, frame: TmyFrame) -> Self {
        Self { lat, lon, frame }
    }

    /// Exact match, no rounding. The frame's own `lat`/`lon` columns decide,
    /// so a truncated or foreign record is always a miss.
    pub fn is_hit(&self, lat: f64, lon: f64) -> bool {
        self.lat == lat && self.lon == lon && self.frame.coordinates_match(lat, lon)
    }
}

/// Storage for the single cache slot
pub trait TmyCache {
    fn load(&self) -> Result<Option<CacheRecord>>;

    /// Overwrites whatever the slot held.
    fn store(&mut self, record: CacheRecord) -> Result<()>;
}

/// Slot held in memory for the lifetime of the value
#[derive(Debug, Default, Clone)]
pub struct MemoryCache {
    slot: Option<CacheRecord>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: CacheRecord) -> Self {
        Self { slot: Some(record) }
    }
}

impl TmyCache for MemoryCache {
    fn load(&self) -> Result<Option<CacheRecord>> {
        Ok(self.slot.clone())
    }

    fn store(&mut self, record: CacheRecord) -> Result<()> {
        self.slot = Some(record);
        Ok(())
    }
}

/// Slot persisted as a bincode file
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TmyCache for FileCache {
    fn load(&self) -> Result<Option<CacheRecord>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no cache file");
            return Ok(None);
        }
        let bytes = std::fs::read(&self.path)?;
        match bincode::deserialize::<CacheRecord>(&bytes) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable cache file ignored");
                Ok(None)
            }
        }
    }

    fn store(&mut self, record: CacheRecord) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = bincode::serialize(&record)?;
        std::fs::write(&self.path, bytes)?;
        debug!(path = %self.path.display(), lat = record.lat, lon = record.lon, "cache file written");
        Ok(())
    }
}
