//! Dataset layer: raw db.json schema + validated in-memory records.
//!
//! This module is intentionally separate from aggregation and rendering.
//! It owns:
//! - the serde shapes mirroring db.json
//! - the validated `Record` model everything downstream consumes

pub mod raw;
pub mod record;

pub use raw::{load_records, records_from_json, validate_and_build};
pub use record::{DiskActivity, EventCounts, IoStats, MemoryConfig, Record, Variant};

#[cfg(test)]
pub mod testutil;
