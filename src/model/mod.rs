//! Aggregation model: reshape validated records into per-test report tabs.

use crate::Result;
use crate::db::{Record, Variant};
use crate::diagnostics;
use crate::select::{
    by_effective_memory, by_test, by_variant, distinct_memory_sizes, distinct_test_names,
};
use crate::series::{self, SeriesSpec};
use crate::stats::{SummaryRow, summary_table};

use anyhow::Context;
use serde::Serialize;

/// One record of the all-results table. 16 fixed columns; counter families
/// the test never exercised stay null, absent event counts render as 0.
#[derive(Debug, Clone, Serialize)]
pub struct DetailRowView {
    pub variant: &'static str,
    pub total_memory: u64,
    pub effective_memory: u64,
    pub success: bool,
    pub duration: f64,
    pub guest_swap_read: Option<u64>,
    pub guest_swap_write: Option<u64>,
    pub guest_rootfs_read: Option<u64>,
    pub guest_rootfs_write: Option<u64>,
    pub guest_rand_files_read: Option<u64>,
    pub guest_rand_files_write: Option<u64>,
    pub host_swap_read: Option<u64>,
    pub host_swap_write: Option<u64>,
    pub events_total: u64,
    pub events_noirq: u64,
    pub id: String,
}

/// Scatter rows for one memory size: one projected row per record.
#[derive(Debug, Clone, Serialize)]
pub struct ScatterPlotView {
    pub memory: u64,
    pub rows: Vec<Vec<Option<f64>>>,
}

/// One chart family of a tab, plotted once per memory size.
#[derive(Debug, Clone, Serialize)]
pub struct ScatterFamilyView {
    pub title: String,
    pub legend: Vec<String>,
    pub plots: Vec<ScatterPlotView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TabView {
    pub test_name: String,
    pub mem_sizes: Vec<u64>,
    pub summary: Vec<SummaryRow>,
    pub scatters: Vec<ScatterFamilyView>,
    pub details: Vec<DetailRowView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TotalsView {
    pub records: usize,
    pub tests: usize,
    pub memory_sizes: usize,
    pub optimum_runs: usize,
    pub with_fix_runs: usize,
    pub without_fix_runs: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub tabs: Vec<TabView>,
    pub totals: TotalsView,
}

/// Build report data: one tab per test name (dataset order), each carrying
/// the summary rows, the applicable scatter families, and the detail table.
pub fn build_report_data(records: &[Record]) -> Result<ReportData> {
    let all: Vec<&Record> = records.iter().collect();

    let specs = series::stock_series();
    for spec in &specs {
        spec.validate()?;
    }

    let mut tabs = Vec::new();
    for test_name in distinct_test_names(&all) {
        let subset = by_test(&test_name, &all);
        let tab = build_tab(&test_name, &subset, &specs)
            .with_context(|| diagnostics::error_message(format!("test {}", test_name)))?;
        tabs.push(tab);
    }

    Ok(ReportData {
        totals: TotalsView {
            records: all.len(),
            tests: tabs.len(),
            memory_sizes: distinct_memory_sizes(&all).len(),
            optimum_runs: by_variant(Variant::Optimum, &all).len(),
            with_fix_runs: by_variant(Variant::WithFix, &all).len(),
            without_fix_runs: by_variant(Variant::WithoutFix, &all).len(),
        },
        tabs,
    })
}

fn build_tab(test_name: &str, results: &[&Record], specs: &[SeriesSpec]) -> Result<TabView> {
    let mem_sizes = distinct_memory_sizes(results);
    let summary = summary_table(results)?;

    let mut scatters = Vec::new();
    for spec in specs {
        if !spec.applicable(results) {
            diagnostics::warn(format!(
                "test {}: skipping series {:?}: records lack the plotted fields",
                test_name, spec.title
            ));
            continue;
        }

        let mut plots = Vec::with_capacity(mem_sizes.len());
        for &mem in &mem_sizes {
            let group = by_effective_memory(mem, results);
            let rows = group
                .iter()
                .map(|r| spec.project(r))
                .collect::<Result<Vec<_>>>()?;
            plots.push(ScatterPlotView { memory: mem, rows });
        }

        scatters.push(ScatterFamilyView {
            title: spec.title.to_string(),
            legend: spec.legend().iter().map(|s| s.to_string()).collect(),
            plots,
        });
    }

    Ok(TabView {
        test_name: test_name.to_string(),
        mem_sizes,
        summary,
        scatters,
        details: results.iter().map(|r| detail_row(r)).collect(),
    })
}

fn detail_row(r: &Record) -> DetailRowView {
    DetailRowView {
        variant: r.variant.as_str(),
        total_memory: r.memory.total,
        effective_memory: r.effective_memory(),
        success: r.success,
        duration: r.duration,
        guest_swap_read: r.disk_activity.guest_swap.map(|io| io.read),
        guest_swap_write: r.disk_activity.guest_swap.map(|io| io.write),
        guest_rootfs_read: r.disk_activity.guest_rootfs.map(|io| io.read),
        guest_rootfs_write: r.disk_activity.guest_rootfs.map(|io| io.write),
        guest_rand_files_read: r.disk_activity.guest_rand_files.map(|io| io.read),
        guest_rand_files_write: r.disk_activity.guest_rand_files.map(|io| io.write),
        host_swap_read: r.disk_activity.host_swap.map(|io| io.read),
        host_swap_write: r.disk_activity.host_swap.map(|io| io.write),
        events_total: r.events.map(|ev| ev.total).unwrap_or(0),
        events_noirq: r.events.map(|ev| ev.noirq).unwrap_or(0),
        id: r.id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testutil::{record, with_events, with_test};
    use pretty_assertions::assert_eq;

    fn triple(test_name: &str, mem: u64) -> Vec<Record> {
        vec![
            with_test(
                record(&format!("{}-opt-{}", test_name, mem), Variant::Optimum, mem, 10.0),
                test_name,
            ),
            with_test(
                with_events(
                    record(&format!("{}-wf-{}", test_name, mem), Variant::WithFix, mem, 20.0),
                    5,
                    2,
                ),
                test_name,
            ),
            with_test(
                with_events(
                    record(&format!("{}-wo-{}", test_name, mem), Variant::WithoutFix, mem, 30.0),
                    8,
                    3,
                ),
                test_name,
            ),
        ]
    }

    #[test]
    fn tabs_follow_dataset_order() {
        let mut records = triple("node_test", 512);
        records.extend(triple("apache_test", 512));

        let data = build_report_data(&records).unwrap();
        assert_eq!(
            data.tabs.iter().map(|t| t.test_name.as_str()).collect::<Vec<_>>(),
            vec!["node_test", "apache_test"]
        );
        assert_eq!(data.totals.records, 6);
        assert_eq!(data.totals.tests, 2);
        assert_eq!(data.totals.memory_sizes, 1);
        assert_eq!(data.totals.optimum_runs, 2);
        assert_eq!(data.totals.with_fix_runs, 2);
        assert_eq!(data.totals.without_fix_runs, 2);
    }

    #[test]
    fn tab_carries_summary_and_all_stock_series() {
        let records = triple("apache_test", 256);

        let data = build_report_data(&records).unwrap();
        let tab = &data.tabs[0];
        assert_eq!(tab.mem_sizes, vec![256]);
        assert_eq!(tab.summary.len(), 1);
        assert_eq!(
            tab.summary[0].as_row(),
            [256.0, 10.0, 0.0, 20.0, 5.0, 30.0, 8.0]
        );
        assert_eq!(
            tab.scatters.iter().map(|s| s.title.as_str()).collect::<Vec<_>>(),
            vec!["Rand-files IO / Time", "Host swap IO / Time", "Events / Time"]
        );
        assert_eq!(tab.details.len(), 3);
    }

    #[test]
    fn series_without_backing_fields_is_skipped() {
        let mut records = triple("memcached_test_mini", 512);
        for rec in &mut records {
            rec.disk_activity.guest_rand_files = None;
        }

        let data = build_report_data(&records).unwrap();
        let tab = &data.tabs[0];
        assert_eq!(
            tab.scatters.iter().map(|s| s.title.as_str()).collect::<Vec<_>>(),
            vec!["Host swap IO / Time", "Events / Time"]
        );
    }

    #[test]
    fn scatter_plots_are_grouped_by_memory_size() {
        let mut records = triple("apache_test", 1024);
        records.extend(triple("apache_test", 256));

        let data = build_report_data(&records).unwrap();
        let family = &data.tabs[0].scatters[0];
        assert_eq!(
            family.plots.iter().map(|p| p.memory).collect::<Vec<_>>(),
            vec![256, 1024]
        );
        for plot in &family.plots {
            assert_eq!(plot.rows.len(), 3);
            for row in &plot.rows {
                assert_eq!(row.len(), family.legend.len());
            }
        }
    }

    #[test]
    fn detail_row_coerces_absent_events_to_zero() {
        let opt = record("a", Variant::Optimum, 512, 10.0);
        let row = detail_row(&opt);
        assert_eq!(row.events_total, 0);
        assert_eq!(row.events_noirq, 0);
        assert_eq!(row.variant, "optimum");
        assert_eq!(row.total_memory, 512);
        assert_eq!(row.effective_memory, 512);
    }

    #[test]
    fn detail_row_keeps_absent_families_null() {
        let mut rec = with_events(record("b", Variant::WithFix, 386, 20.0), 5, 2);
        rec.disk_activity.guest_rand_files = None;

        let row = detail_row(&rec);
        assert_eq!(row.guest_rand_files_read, None);
        assert_eq!(row.guest_rand_files_write, None);
        assert_eq!(row.host_swap_read, Some(70));
        assert_eq!(row.effective_memory, 386);
        assert_eq!(row.total_memory, 2048);
    }

    #[test]
    fn missing_variant_aborts_the_report() {
        let records = vec![with_test(
            with_events(record("wf", Variant::WithFix, 512, 20.0), 5, 2),
            "apache_test",
        )];

        let err = build_report_data(&records).unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("test apache_test"));
        assert!(msg.contains("variant optimum"));
    }
}
