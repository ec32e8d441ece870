//! Tests to verify JSON fixtures parse correctly

use perfx_api::{JsonPerf, JsonProject, TabItems, Visibility};
use perfx_app::{ExplorerParams, FilterOp, ParameterSet, TabEntries};
use perfx_core::{ResourceId, Tab};

fn id(s: &str) -> ResourceId {
    ResourceId::new(s).unwrap()
}

#[test]
fn test_project_fixture_parses() {
    let json = include_str!("fixtures/api_responses/project.json");
    let project: JsonProject = serde_json::from_str(json).expect("project fixture");

    assert_eq!(project.slug, "demo");
    assert_eq!(project.visibility, Visibility::Public);
    assert_eq!(project.url.as_deref(), Some("https://github.com/example/demo"));
}

#[test]
fn test_perf_fixture_parses() {
    let json = include_str!("fixtures/api_responses/perf.json");
    let perf: JsonPerf = serde_json::from_str(json).expect("perf fixture");

    assert_eq!(perf.results.len(), 1);
    assert_eq!(perf.metric_count(), 2);

    let series = &perf.results[0];
    assert_eq!(series.measure.units, "nanoseconds (ns)");

    // Optional bounds and version hash may be absent
    let first = &series.metrics[0];
    assert_eq!(first.version.hash.as_deref(), Some("a1b2c3d"));
    assert_eq!(first.metric.upper_value, Some(1560.25));
    let second = &series.metrics[1];
    assert!(second.metric.lower_value.is_none());
    assert!(second.boundary.is_none());
}

#[test]
fn test_reports_fixture_parses() {
    let json = include_str!("fixtures/api_responses/reports.json");
    let items = TabItems::from_json(Tab::Reports, json).expect("reports fixture");
    assert_eq!(items.tab(), Tab::Reports);
    assert_eq!(items.len(), 1);

    let TabItems::Reports(reports) = items else {
        panic!("expected reports");
    };
    let report = &reports[0];
    let measures = report.measures();
    let measures: Vec<&str> = measures.iter().map(|m| m.as_str()).collect();
    assert_eq!(measures, vec!["latency", "throughput"]);

    let benchmarks = report.benchmarks_for(&id("latency"));
    let benchmarks: Vec<&str> = benchmarks.iter().map(|b| b.as_str()).collect();
    assert_eq!(benchmarks, vec!["parse-json", "parse-toml"]);
}

#[test]
fn test_plots_fixture_parses() {
    let json = include_str!("fixtures/api_responses/plots.json");
    let items = TabItems::from_json(Tab::Plots, json).expect("plots fixture");

    let TabItems::Plots(plots) = items else {
        panic!("expected plots");
    };
    assert_eq!(plots[0].title.as_deref(), Some("Parser latency"));
    assert_eq!(plots[0].benchmarks.len(), 2);
    assert!(plots[0].upper_boundary);
    assert!(!plots[0].lower_value);
}

#[test]
fn test_wrong_tab_shape_is_rejected() {
    let json = include_str!("fixtures/api_responses/plots.json");
    assert!(TabItems::from_json(Tab::Reports, json).is_err());
}

#[test]
fn test_selecting_fixture_report_rewrites_query() {
    let json = include_str!("fixtures/api_responses/reports.json");
    let TabItems::Reports(reports) = TabItems::from_json(Tab::Reports, json).unwrap() else {
        panic!("expected reports");
    };

    let next = FilterOp::SelectReport {
        report: Box::new(reports[0].clone()),
        measure: Some(id("throughput")),
    }
    .apply(&ExplorerParams::default());

    assert_eq!(
        perfx_app::params::encode(&next, &ParameterSet::QUERY),
        "branches=main&heads=main-head&testbeds=ci-linux&benchmarks=render&measures=throughput"
    );

    let items = TabItems::Reports(reports);
    let entries = TabEntries::project(&items, &next);
    let checked: Vec<&str> = entries.checked_ids().into_iter().map(|id| id.as_str()).collect();
    assert_eq!(checked, vec!["r-101"]);
}

#[test]
fn test_selecting_fixture_plot_is_plot_ready() {
    let json = include_str!("fixtures/api_responses/plots.json");
    let TabItems::Plots(plots) = TabItems::from_json(Tab::Plots, json).unwrap() else {
        panic!("expected plots");
    };

    let next = FilterOp::SelectPlot(Box::new(plots[0].clone())).apply(&ExplorerParams::default());
    assert_eq!(next.display.selected_plot, Some(id("p-1")));
    assert!(perfx_app::executor::missing_dimensions(&next.filter).is_empty());
}
