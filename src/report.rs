use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::Path;

use crate::common::{CostModel, SearchOutcome};
use crate::error::{Error, Result};
use crate::solver::{BatchReport, CaseReport};
use crate::stat::Stats;

fn format_cost(value: f64, model: CostModel) -> String {
    match model {
        CostModel::Integer => format!("{value:.0}"),
        CostModel::Geodesic => format!("{value:.2}"),
    }
}

fn distance_unit(model: CostModel) -> &'static str {
    match model {
        CostModel::Integer => "",
        CostModel::Geodesic => " km",
    }
}

pub fn render_case(case: &CaseReport, model: CostModel) -> String {
    let mut out = String::new();
    let unit = distance_unit(model);

    let _ = writeln!(out, "Processing test case: {} to {}", case.start, case.goal);
    match &case.outcome {
        SearchOutcome::Found(result) => {
            let _ = writeln!(out, "Optimal Cost: {}", format_cost(result.cost, model));
            let _ = writeln!(out, "Max Frontier Size: {}", result.max_frontier_size);
            let _ = writeln!(out, "Nodes Expanded: {}", result.nodes_expanded);
            let _ = writeln!(out, "Path: {}", result.path.join(" -> "));
            let _ = writeln!(out, "Permits Acquired:");
            if result.permits_acquired.is_empty() {
                let _ = writeln!(out, "  None");
            }
            for acquisition in &result.permits_acquired {
                let _ = writeln!(out, "  {acquisition}");
            }
            let _ = writeln!(
                out,
                "Total Distance: {}{unit}",
                format_cost(result.travel_distance(), model)
            );
            let _ = writeln!(
                out,
                "Total Permit Costs: {}",
                format_cost(result.permit_spend, model)
            );
            let _ = writeln!(out, "Total Cost: {}{unit}", format_cost(result.cost, model));
        }
        SearchOutcome::NoSolution { .. } => {
            let _ = writeln!(out, "No solution between {} and {}", case.start, case.goal);
        }
        SearchOutcome::CityNotFound { name } => {
            let _ = writeln!(out, "City not found: {name}");
        }
    }
    out
}

pub fn render_summary(stats: &Stats) -> String {
    let mut out = String::new();

    match (
        stats.average_cost(),
        stats.average_max_frontier_size(),
        stats.average_nodes_expanded(),
    ) {
        (Some(cost), Some(frontier), Some(expanded)) => {
            let _ = writeln!(out, "Average Optimal Cost: {cost:.2}");
            let _ = writeln!(out, "Average Max Frontier Size: {frontier:.2}");
            let _ = writeln!(out, "Average Nodes Expanded: {expanded:.2}");
        }
        _ => {
            let _ = writeln!(out, "No successful test cases.");
        }
    }

    if stats.failed() > 0 {
        let _ = writeln!(
            out,
            "Failed test cases: {} (no solution: {}, city not found: {})",
            stats.failed(),
            stats.no_solution,
            stats.not_found
        );
    }
    out
}

pub fn render_batch(report: &BatchReport, model: CostModel, summary_only: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Results with {}:", report.label);
    if !summary_only {
        for case in &report.cases {
            out.push_str(&render_case(case, model));
            out.push('\n');
        }
    }
    out.push_str(&render_summary(&report.stats));
    out
}

/// Writes all batch reports as pretty-printed JSON.
pub fn write_json(path: impl AsRef<Path>, reports: &[BatchReport]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|err| Error::io(path, err))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, reports).map_err(|source| Error::Report {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|err| Error::io(path, err))
}
