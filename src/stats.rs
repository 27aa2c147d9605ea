//! Scalar aggregation over record groups.
//!
//! The mean of an empty group is undefined, so `mean` returns an explicit
//! error and the grouped aggregations annotate it with the memory size and
//! variant of the offending group.

use crate::Result;
use crate::db::{Record, Variant};
use crate::diagnostics;
use crate::select::{by_effective_memory, by_variant, distinct_memory_sizes};

use anyhow::{Context, bail};
use serde::Serialize;

/// Arithmetic mean, rounded to 4 decimal places. Empty input is an error.
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        bail!("{}", diagnostics::error_message("mean of empty input".into()));
    }
    let sum: f64 = values.iter().sum();
    Ok(round4(sum / values.len() as f64))
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Mean run duration of the group.
pub fn mean_duration(results: &[&Record]) -> Result<f64> {
    let durations: Vec<f64> = results.iter().map(|r| r.duration).collect();
    mean(&durations)
}

/// Mean total halt-event count of the group. Every record must carry event
/// counts; a record without them cannot contribute to this average.
pub fn mean_event_count(results: &[&Record]) -> Result<f64> {
    let mut totals = Vec::with_capacity(results.len());
    for r in results {
        match r.events {
            Some(ev) => totals.push(ev.total as f64),
            None => bail!(
                "{}",
                diagnostics::error_message(format!("record {} has no halt-event counts", r.id))
            ),
        }
    }
    mean(&totals)
}

/// One summary-table row: a memory size and the per-variant averages.
///
/// `optimum_events` is always zero: optimum runs have no comparable
/// halt-event metric in this dataset, but the table keeps the column so all
/// three variants read as duration/events pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub memory: u64,
    pub optimum_duration: f64,
    pub optimum_events: f64,
    pub with_fix_duration: f64,
    pub with_fix_events: f64,
    pub without_fix_duration: f64,
    pub without_fix_events: f64,
}

impl SummaryRow {
    /// The fixed 7-column shape consumed by the summary table.
    pub fn as_row(&self) -> [f64; 7] {
        [
            self.memory as f64,
            self.optimum_duration,
            self.optimum_events,
            self.with_fix_duration,
            self.with_fix_events,
            self.without_fix_duration,
            self.without_fix_events,
        ]
    }
}

/// Summarize one effective-memory group. All records in `results` must share
/// one effective memory size; the row takes it from the first record.
pub fn summary_row(results: &[&Record]) -> Result<SummaryRow> {
    let Some(first) = results.first() else {
        bail!("{}", diagnostics::error_message("summary row over an empty group".into()));
    };
    let memory = first.effective_memory();

    let optimum = by_variant(Variant::Optimum, results);
    let with_fix = by_variant(Variant::WithFix, results);
    let without_fix = by_variant(Variant::WithoutFix, results);

    Ok(SummaryRow {
        memory,
        optimum_duration: mean_duration(&optimum)
            .with_context(|| group_context(memory, Variant::Optimum))?,
        optimum_events: 0.0,
        with_fix_duration: mean_duration(&with_fix)
            .with_context(|| group_context(memory, Variant::WithFix))?,
        with_fix_events: mean_event_count(&with_fix)
            .with_context(|| group_context(memory, Variant::WithFix))?,
        without_fix_duration: mean_duration(&without_fix)
            .with_context(|| group_context(memory, Variant::WithoutFix))?,
        without_fix_events: mean_event_count(&without_fix)
            .with_context(|| group_context(memory, Variant::WithoutFix))?,
    })
}

fn group_context(memory: u64, variant: Variant) -> String {
    format!("memory size {} MB, variant {}", memory, variant.as_str())
}

/// One summary row per distinct effective memory size, ascending.
pub fn summary_table(results: &[&Record]) -> Result<Vec<SummaryRow>> {
    distinct_memory_sizes(results)
        .into_iter()
        .map(|mem| summary_row(&by_effective_memory(mem, results)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testutil::{record, with_events};
    use pretty_assertions::assert_eq;

    #[test]
    fn mean_of_small_inputs() {
        assert_eq!(mean(&[4.0, 6.0]).unwrap(), 5.0);
        assert_eq!(mean(&[1.0]).unwrap(), 1.0);
    }

    #[test]
    fn mean_rounds_to_four_decimals() {
        assert_eq!(mean(&[1.0, 2.0, 2.0]).unwrap(), 1.6667);
        assert_eq!(mean(&[0.1, 0.2]).unwrap(), 0.15);
    }

    #[test]
    fn mean_of_empty_input_is_an_error() {
        let err = mean(&[]).unwrap_err();
        assert!(format!("{:#}", err).contains("mean of empty input"));
    }

    #[test]
    fn mean_is_idempotent() {
        let values = [3.0, 9.5, 12.25];
        assert_eq!(mean(&values).unwrap(), mean(&values).unwrap());
    }

    #[test]
    fn mean_event_count_requires_events() {
        let opt = record("a", Variant::Optimum, 512, 10.0);
        let err = mean_event_count(&[&opt]).unwrap_err();
        assert!(format!("{:#}", err).contains("record a has no halt-event counts"));
    }

    #[test]
    fn summary_row_has_seven_columns_with_zero_optimum_events() {
        let opt = record("a", Variant::Optimum, 256, 10.0);
        let with_fix = with_events(record("b", Variant::WithFix, 256, 20.0), 5, 2);
        let without = with_events(record("c", Variant::WithoutFix, 256, 30.0), 8, 3);

        let row = summary_row(&[&opt, &with_fix, &without]).unwrap();
        let cols = row.as_row();
        assert_eq!(cols.len(), 7);
        assert_eq!(cols, [256.0, 10.0, 0.0, 20.0, 5.0, 30.0, 8.0]);
    }

    #[test]
    fn summary_row_over_empty_group_is_an_error() {
        let err = summary_row(&[]).unwrap_err();
        assert!(format!("{:#}", err).contains("empty group"));
    }

    #[test]
    fn summary_row_names_the_missing_variant() {
        let with_fix = with_events(record("b", Variant::WithFix, 256, 20.0), 5, 2);
        let without = with_events(record("c", Variant::WithoutFix, 256, 30.0), 8, 3);

        let err = summary_row(&[&with_fix, &without]).unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("memory size 256 MB, variant optimum"));
        assert!(msg.contains("mean of empty input"));
    }

    #[test]
    fn summary_table_orders_rows_by_memory_size() {
        let mut records = Vec::new();
        for &mem in &[1024u64, 256] {
            records.push(record(&format!("opt-{}", mem), Variant::Optimum, mem, 10.0));
            records.push(with_events(
                record(&format!("wf-{}", mem), Variant::WithFix, mem, 20.0),
                5,
                2,
            ));
            records.push(with_events(
                record(&format!("wo-{}", mem), Variant::WithoutFix, mem, 30.0),
                8,
                3,
            ));
        }
        let refs: Vec<&Record> = records.iter().collect();

        let table = summary_table(&refs).unwrap();
        assert_eq!(
            table.iter().map(|r| r.memory).collect::<Vec<_>>(),
            vec![256, 1024]
        );
    }

    #[test]
    fn summary_averages_each_variant_separately() {
        let records = vec![
            record("a1", Variant::Optimum, 512, 10.0),
            record("a2", Variant::Optimum, 512, 14.0),
            with_events(record("b1", Variant::WithFix, 512, 20.0), 4, 1),
            with_events(record("b2", Variant::WithFix, 512, 22.0), 6, 2),
            with_events(record("c1", Variant::WithoutFix, 512, 31.0), 8, 3),
        ];
        let refs: Vec<&Record> = records.iter().collect();

        let row = summary_row(&refs).unwrap();
        assert_eq!(row.memory, 512);
        assert_eq!(row.optimum_duration, 12.0);
        assert_eq!(row.with_fix_duration, 21.0);
        assert_eq!(row.with_fix_events, 5.0);
        assert_eq!(row.without_fix_duration, 31.0);
        assert_eq!(row.without_fix_events, 8.0);
    }
}
