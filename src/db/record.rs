//! Validated benchmark records.
//!
//! One `Record` is a single benchmark run observation: which test ran, under
//! which experimental condition, with which memory configuration, and what
//! came out of it. Records are built by `raw::validate_and_build` and never
//! mutated afterwards; every downstream layer filters borrowed slices.

use serde::Serialize;

/// Experimental condition of a run. db.json calls this `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Optimum,
    WithFix,
    WithoutFix,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Optimum, Variant::WithFix, Variant::WithoutFix];

    pub fn parse(s: &str) -> Option<Variant> {
        match s {
            "optimum" => Some(Variant::Optimum),
            "with_fix" => Some(Variant::WithFix),
            "without_fix" => Some(Variant::WithoutFix),
            _ => None,
        }
    }

    /// Wire name, as it appears in db.json.
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Optimum => "optimum",
            Variant::WithFix => "with_fix",
            Variant::WithoutFix => "without_fix",
        }
    }
}

/// Raw memory configuration of the run, in MB.
///
/// `cgroup_limit` is absent on optimum runs (they are sized by `total`
/// alone); validation enforces it is present on the other two variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryConfig {
    pub total: u64,
    pub cgroup_limit: Option<u64>,
}

/// Read/write counters for one block device or file set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IoStats {
    pub read: u64,
    pub write: u64,
}

/// Disk counters sampled around the run. A family is `None` when the test
/// never exercised it (the exporter writes all-null counters for those).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiskActivity {
    pub guest_swap: Option<IoStats>,
    pub guest_rootfs: Option<IoStats>,
    pub guest_rand_files: Option<IoStats>,
    pub host_swap: Option<IoStats>,
}

/// Guest halt events observed during the run: all of them, and those raised
/// outside interrupt context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EventCounts {
    pub total: u64,
    pub noirq: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: String,
    pub test_name: String,
    pub variant: Variant,
    pub memory: MemoryConfig,
    pub success: bool,
    /// Run duration in seconds.
    pub duration: f64,
    pub disk_activity: DiskActivity,
    /// None when the run carried no perf sample (optimum runs).
    pub events: Option<EventCounts>,
}

impl Record {
    /// Grouping key used everywhere: total memory for optimum runs, the
    /// cgroup limit otherwise.
    pub fn effective_memory(&self) -> u64 {
        match (self.variant, self.memory.cgroup_limit) {
            (Variant::Optimum, _) | (_, None) => self.memory.total,
            (_, Some(limit)) => limit,
        }
    }
}
