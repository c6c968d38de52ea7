use tracing::info;

use super::cache::{CacheRecord, TmyCache};
use super::pvgis::TmySource;
use crate::domain::TmyDataset;
use crate::error::Result;

/// Serves TMY datasets from the cache slot, falling back to the remote source.
///
/// The slot is not synchronized; callers process locations one at a time.
pub struct TmyRepository<S, C> {
    source: S,
    cache: C,
}

impl<S: TmySource, C: TmyCache> TmyRepository<S, C> {
    pub fn new(source: S, cache: C) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Returns the TMY for `(lat, lon)` with its metadata attached.
    ///
    /// A cache hit returns the stored frame unchanged; a miss fetches from the
    /// source and overwrites the slot before annotating.
    pub async fn fetch_or_cached(&mut self, lat: f64, lon: f64) -> Result<TmyDataset> {
        let cached = self
            .cache
            .load()?
            .filter(|record| record.is_hit(lat, lon));

        let frame = match cached {
            Some(record) => {
                info!(lat, lon, "TMY request matches cached record");
                record.frame
            }
            None => {
                info!(lat, lon, "TMY not cached");
                let frame = self.source.fetch(lat, lon).await?;
                self.cache
                    .store(CacheRecord::new(lat, lon, frame.clone()))?;
                frame
            }
        };

        TmyDataset::annotate(frame, lat, lon)
    }
}
