//! Record builders shared by the module tests.

use crate::db::record::{
    DiskActivity, EventCounts, IoStats, MemoryConfig, Record, Variant,
};

/// A fully-populated record: optimum runs get `mem` as total memory and no
/// events, the other variants get `mem` as cgroup limit.
pub fn record(id: &str, variant: Variant, mem: u64, duration: f64) -> Record {
    let memory = match variant {
        Variant::Optimum => MemoryConfig {
            total: mem,
            cgroup_limit: None,
        },
        _ => MemoryConfig {
            total: 2048,
            cgroup_limit: Some(mem),
        },
    };

    let events = match variant {
        Variant::Optimum => None,
        _ => Some(EventCounts { total: 5, noirq: 2 }),
    };

    Record {
        id: id.to_string(),
        test_name: "apache_test".to_string(),
        variant,
        memory,
        success: true,
        duration,
        disk_activity: DiskActivity {
            guest_swap: Some(IoStats { read: 10, write: 20 }),
            guest_rootfs: Some(IoStats { read: 30, write: 40 }),
            guest_rand_files: Some(IoStats { read: 50, write: 60 }),
            host_swap: Some(IoStats { read: 70, write: 80 }),
        },
        events,
    }
}

pub fn with_events(mut rec: Record, total: u64, noirq: u64) -> Record {
    rec.events = Some(EventCounts { total, noirq });
    rec
}

pub fn with_test(mut rec: Record, test_name: &str) -> Record {
    rec.test_name = test_name.to_string();
    rec
}
