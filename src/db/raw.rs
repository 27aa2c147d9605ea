//! Raw db.json shapes + validation into `Record`s.
//!
//! db.json is a top-level array of run observations:
//!
//! [
//!   {
//!     "id": "53a6...",
//!     "type": "with_fix",                       // optimum | with_fix | without_fix
//!     "memory": { "total": 2048, "cgroup_limit": 386 },
//!     "test": {
//!       "name": "apache_test",
//!       "results": { "success": 1, "duration": 41.27 }
//!     },
//!     "disk_activity": {
//!       "guest": {
//!         "swap":   { "read": 0, "write": 118 },
//!         "rootfs": { "read": 6010, "write": 288 },
//!         "rf":     { "read": null, "write": null }  // family not exercised
//!       },
//!       "host": { "swap": { "read": 120, "write": 4031 } }
//!     },
//!     "events": { "total": 512, "noirq": 43 }    // null on optimum runs
//!   },
//!   ...
//! ]
//!
//! We keep two representations: the serde-friendly raw shapes below (every
//! field optional, so a broken record produces our error message instead of
//! a serde one), and the flattened `Record` the rest of the crate consumes.
//! Validation fails fast on a missing field, naming the record and the
//! field path, rather than letting a null leak into the averages.

use crate::Result;
use crate::db::record::{
    DiskActivity, EventCounts, IoStats, MemoryConfig, Record, Variant,
};
use crate::diagnostics;

use anyhow::{Context, anyhow, bail};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default, rename = "type")]
    pub variant: Option<String>,

    #[serde(default)]
    pub memory: Option<RawMemory>,

    #[serde(default)]
    pub test: Option<RawTest>,

    #[serde(default)]
    pub disk_activity: Option<RawDiskActivity>,

    #[serde(default)]
    pub events: Option<RawEvents>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMemory {
    #[serde(default)]
    pub total: Option<u64>,

    #[serde(default)]
    pub cgroup_limit: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub results: Option<RawTestResults>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTestResults {
    #[serde(default)]
    pub success: Option<RawSuccess>,

    #[serde(default)]
    pub duration: Option<f64>,
}

/// Test success as it appears in db.json.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum RawSuccess {
    // New shape: success: true
    Flag(bool),
    // Older exports store the runner's code; 1 means success there.
    Code(i64),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDiskActivity {
    #[serde(default)]
    pub guest: Option<RawGuestDisk>,

    #[serde(default)]
    pub host: Option<RawHostDisk>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGuestDisk {
    #[serde(default)]
    pub swap: Option<RawIo>,

    #[serde(default)]
    pub rootfs: Option<RawIo>,

    #[serde(default)]
    pub rf: Option<RawIo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHostDisk {
    #[serde(default)]
    pub swap: Option<RawIo>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawIo {
    #[serde(default)]
    pub read: Option<u64>,

    #[serde(default)]
    pub write: Option<u64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawEvents {
    #[serde(default)]
    pub total: Option<u64>,

    #[serde(default)]
    pub noirq: Option<u64>,
}

/// Read and validate a dataset file.
pub fn load_records(path: &str) -> Result<Vec<Record>> {
    let text = fs::read_to_string(path)
        .with_context(|| diagnostics::error_message(format!("read dataset {}", path)))?;
    records_from_json(&text)
        .with_context(|| diagnostics::error_message(format!("dataset {}", path)))
}

/// Parse a db.json document and validate every record.
pub fn records_from_json(text: &str) -> Result<Vec<Record>> {
    let raws: Vec<RawRecord> = serde_json::from_str(text)
        .with_context(|| diagnostics::error_message("dataset is not a JSON record array".into()))?;
    validate_and_build(raws)
}

/// Flatten all raw records, ensure unique ids.
pub fn validate_and_build(raws: Vec<RawRecord>) -> Result<Vec<Record>> {
    if raws.is_empty() {
        bail!("{}", diagnostics::error_message("dataset contained no records".into()));
    }

    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut out = Vec::with_capacity(raws.len());

    for (idx, raw) in raws.into_iter().enumerate() {
        let rec = build_record(raw)
            .with_context(|| diagnostics::error_message(format!("record at index {}", idx)))?;

        if let Some(prev) = seen.insert(rec.id.clone(), idx) {
            bail!(
                "{}",
                diagnostics::error_message(format!(
                    "duplicate record id {:?} at indices {} and {}",
                    rec.id, prev, idx
                ))
            );
        }

        out.push(rec);
    }

    Ok(out)
}

fn build_record(raw: RawRecord) -> Result<Record> {
    let id = require(raw.id, "id")?;

    let variant_str = require(raw.variant, "type")?;
    let variant = Variant::parse(&variant_str).ok_or_else(|| {
        anyhow!(diagnostics::error_message(format!(
            "record {}: unknown variant {:?}",
            id, variant_str
        )))
    })?;

    let memory = require(raw.memory, "memory")?;
    let total = require(memory.total, "memory.total")?;
    if variant != Variant::Optimum && memory.cgroup_limit.is_none() {
        bail!(
            "{}",
            diagnostics::error_message(format!(
                "record {}: variant {} requires memory.cgroup_limit",
                id,
                variant.as_str()
            ))
        );
    }

    let test = require(raw.test, "test")?;
    let test_name = require(test.name, "test.name")?;
    let results = require(test.results, "test.results")?;
    let duration = require(results.duration, "test.results.duration")?;
    let success = match require(results.success, "test.results.success")? {
        RawSuccess::Flag(b) => b,
        RawSuccess::Code(c) => c == 1,
    };

    let disk = require(raw.disk_activity, "disk_activity")?;
    let guest = require(disk.guest, "disk_activity.guest")?;
    let host = require(disk.host, "disk_activity.host")?;
    let disk_activity = DiskActivity {
        guest_swap: io_family(&id, guest.swap, "disk_activity.guest.swap")?,
        guest_rootfs: io_family(&id, guest.rootfs, "disk_activity.guest.rootfs")?,
        guest_rand_files: io_family(&id, guest.rf, "disk_activity.guest.rf")?,
        host_swap: io_family(&id, host.swap, "disk_activity.host.swap")?,
    };

    let events = event_counts(&id, raw.events)?;

    Ok(Record {
        id,
        test_name,
        variant,
        memory: MemoryConfig {
            total,
            cgroup_limit: memory.cgroup_limit,
        },
        success,
        duration,
        disk_activity,
        events,
    })
}

fn require<T>(field: Option<T>, path: &str) -> Result<T> {
    field.ok_or_else(|| anyhow!(diagnostics::error_message(format!("missing field {}", path))))
}

/// A counter family is either fully present or fully absent; one-sided nulls
/// mean a corrupt export.
fn io_family(id: &str, raw: Option<RawIo>, path: &str) -> Result<Option<IoStats>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    match (raw.read, raw.write) {
        (Some(read), Some(write)) => Ok(Some(IoStats { read, write })),
        (None, None) => Ok(None),
        _ => bail!(
            "{}",
            diagnostics::error_message(format!(
                "record {}: half-present counter family {}",
                id, path
            ))
        ),
    }
}

fn event_counts(id: &str, raw: Option<RawEvents>) -> Result<Option<EventCounts>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    match (raw.total, raw.noirq) {
        (Some(total), Some(noirq)) => Ok(Some(EventCounts { total, noirq })),
        (None, None) => Ok(None),
        _ => bail!(
            "{}",
            diagnostics::error_message(format!("record {}: half-present events counts", id))
        ),
    }
}
