//! Scatter-series configuration: map one record onto one plottable row.
//!
//! A `SeriesSpec` describes one chart family. The first cell of every
//! projected row is the record's duration (the shared x axis); each further
//! column pairs a variant with a metric and is populated only for records of
//! that variant, `None` otherwise, so each variant plots as its own series
//! over the same axis.

use crate::Result;
use crate::db::{Record, Variant};
use crate::diagnostics;

use anyhow::bail;

/// A plottable measurement taken from a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    GuestRandFilesRead,
    GuestRandFilesWrite,
    HostSwapRead,
    HostSwapWrite,
    EventsTotal,
    EventsNoirq,
}

impl Metric {
    fn is_event(self) -> bool {
        matches!(self, Metric::EventsTotal | Metric::EventsNoirq)
    }

    /// Field path used in diagnostics.
    fn field_path(self) -> &'static str {
        match self {
            Metric::GuestRandFilesRead => "disk_activity.guest.rf.read",
            Metric::GuestRandFilesWrite => "disk_activity.guest.rf.write",
            Metric::HostSwapRead => "disk_activity.host.swap.read",
            Metric::HostSwapWrite => "disk_activity.host.swap.write",
            Metric::EventsTotal => "events.total",
            Metric::EventsNoirq => "events.noirq",
        }
    }

    fn value(self, r: &Record) -> Option<f64> {
        match self {
            Metric::GuestRandFilesRead => {
                r.disk_activity.guest_rand_files.map(|io| io.read as f64)
            }
            Metric::GuestRandFilesWrite => {
                r.disk_activity.guest_rand_files.map(|io| io.write as f64)
            }
            Metric::HostSwapRead => r.disk_activity.host_swap.map(|io| io.read as f64),
            Metric::HostSwapWrite => r.disk_activity.host_swap.map(|io| io.write as f64),
            Metric::EventsTotal => r.events.map(|ev| ev.total as f64),
            Metric::EventsNoirq => r.events.map(|ev| ev.noirq as f64),
        }
    }
}

/// One y column of a chart family: a metric gated on a variant.
#[derive(Debug, Clone, Copy)]
pub struct SeriesColumn {
    pub label: &'static str,
    pub variant: Variant,
    pub metric: Metric,
}

/// One chart family: a title and the variant-to-column mapping.
#[derive(Debug, Clone)]
pub struct SeriesSpec {
    pub title: &'static str,
    pub x_label: &'static str,
    pub columns: Vec<SeriesColumn>,
}

impl SeriesSpec {
    /// Legend row: the shared x-axis label followed by one label per column.
    pub fn legend(&self) -> Vec<&'static str> {
        std::iter::once(self.x_label)
            .chain(self.columns.iter().map(|c| c.label))
            .collect()
    }

    /// Reject a malformed variant-to-column mapping.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            bail!(
                "{}",
                diagnostics::error_message(format!("series {:?} has no columns", self.title))
            );
        }

        for (i, a) in self.columns.iter().enumerate() {
            if a.metric.is_event() && a.variant == Variant::Optimum {
                bail!(
                    "{}",
                    diagnostics::error_message(format!(
                        "series {:?}: optimum runs carry no halt-event counts",
                        self.title
                    ))
                );
            }
            for b in &self.columns[i + 1..] {
                if a.variant == b.variant && a.metric == b.metric {
                    bail!(
                        "{}",
                        diagnostics::error_message(format!(
                            "series {:?}: duplicate column for variant {} and {}",
                            self.title,
                            a.variant.as_str(),
                            a.metric.field_path()
                        ))
                    );
                }
            }
        }

        Ok(())
    }

    /// Project one record onto this family. Row length is always
    /// `columns.len() + 1`; a column whose variant does not match the record
    /// stays `None`.
    pub fn project(&self, r: &Record) -> Result<Vec<Option<f64>>> {
        let mut row = Vec::with_capacity(self.columns.len() + 1);
        row.push(Some(r.duration));

        for col in &self.columns {
            if r.variant != col.variant {
                row.push(None);
                continue;
            }
            match col.metric.value(r) {
                Some(v) => row.push(Some(v)),
                None => bail!(
                    "{}",
                    diagnostics::error_message(format!(
                        "record {}: missing {}",
                        r.id,
                        col.metric.field_path()
                    ))
                ),
            }
        }

        Ok(row)
    }

    /// True when every record carries the fields its matching columns plot.
    pub fn applicable(&self, results: &[&Record]) -> bool {
        results.iter().all(|r| {
            self.columns
                .iter()
                .all(|c| r.variant != c.variant || c.metric.value(r).is_some())
        })
    }
}

/// Guest random-file I/O against run duration, all three variants.
pub fn rand_files() -> SeriesSpec {
    SeriesSpec {
        title: "Rand-files IO / Time",
        x_label: "Time taken",
        columns: vec![
            SeriesColumn {
                label: "Reads, optimum",
                variant: Variant::Optimum,
                metric: Metric::GuestRandFilesRead,
            },
            SeriesColumn {
                label: "Writes, optimum",
                variant: Variant::Optimum,
                metric: Metric::GuestRandFilesWrite,
            },
            SeriesColumn {
                label: "Reads, with fix",
                variant: Variant::WithFix,
                metric: Metric::GuestRandFilesRead,
            },
            SeriesColumn {
                label: "Writes, with fix",
                variant: Variant::WithFix,
                metric: Metric::GuestRandFilesWrite,
            },
            SeriesColumn {
                label: "Reads, without fix",
                variant: Variant::WithoutFix,
                metric: Metric::GuestRandFilesRead,
            },
            SeriesColumn {
                label: "Writes, without fix",
                variant: Variant::WithoutFix,
                metric: Metric::GuestRandFilesWrite,
            },
        ],
    }
}

/// Host swap I/O against run duration. Optimum runs never touch host swap,
/// so they get no columns here.
pub fn host_swap() -> SeriesSpec {
    SeriesSpec {
        title: "Host swap IO / Time",
        x_label: "Time taken",
        columns: vec![
            SeriesColumn {
                label: "Reads, with fix",
                variant: Variant::WithFix,
                metric: Metric::HostSwapRead,
            },
            SeriesColumn {
                label: "Writes, with fix",
                variant: Variant::WithFix,
                metric: Metric::HostSwapWrite,
            },
            SeriesColumn {
                label: "Reads, without fix",
                variant: Variant::WithoutFix,
                metric: Metric::HostSwapRead,
            },
            SeriesColumn {
                label: "Writes, without fix",
                variant: Variant::WithoutFix,
                metric: Metric::HostSwapWrite,
            },
        ],
    }
}

/// Halt events against run duration, total and outside-IRQ counts.
pub fn halt_events() -> SeriesSpec {
    SeriesSpec {
        title: "Events / Time",
        x_label: "Duration",
        columns: vec![
            SeriesColumn {
                label: "Event, with fix",
                variant: Variant::WithFix,
                metric: Metric::EventsTotal,
            },
            SeriesColumn {
                label: "Event (noIRQ), with fix",
                variant: Variant::WithFix,
                metric: Metric::EventsNoirq,
            },
            SeriesColumn {
                label: "Event, without fix",
                variant: Variant::WithoutFix,
                metric: Metric::EventsTotal,
            },
            SeriesColumn {
                label: "Event (noIRQ), without fix",
                variant: Variant::WithoutFix,
                metric: Metric::EventsNoirq,
            },
        ],
    }
}

/// The chart families the report knows how to draw.
pub fn stock_series() -> Vec<SeriesSpec> {
    vec![rand_files(), host_swap(), halt_events()]
}
