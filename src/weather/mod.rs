//! # TMY Acquisition
//!
//! Remote PVGIS access, the single-slot cache and the fetch-or-cached flow
//! that hands annotated [`TmyDataset`](crate::domain::TmyDataset)s to the
//! yield models.

pub mod cache;
pub mod pvgis;
pub mod repository;

pub use cache::{CacheRecord, FileCache, MemoryCache, TmyCache};
pub use pvgis::{parse_timestamp, PvgisClient, TmySource};
pub use repository::TmyRepository;
