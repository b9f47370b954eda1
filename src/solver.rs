use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

use crate::algorithm::permit_a_star_search;
use crate::common::{SearchOutcome, TestCase};
use crate::graph::Graph;
use crate::heuristic::Heuristic;
use crate::stat::Stats;

#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub start: String,
    pub goal: String,
    pub outcome: SearchOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub label: String,
    pub cases: Vec<CaseReport>,
    pub stats: Stats,
}

/// Runs searches against one loaded graph. Every call builds its own
/// frontier, the runner only borrows the graph.
pub struct BatchRunner<'a> {
    graph: &'a Graph,
    permit_cost: f64,
}

impl<'a> BatchRunner<'a> {
    pub fn new(graph: &'a Graph, permit_cost: f64) -> Self {
        BatchRunner { graph, permit_cost }
    }

    pub fn route<H: Heuristic + ?Sized>(&self, start: &str, goal: &str, heuristic: &H) -> SearchOutcome {
        permit_a_star_search(self.graph, heuristic, start, goal, self.permit_cost)
    }

    pub fn run<H: Heuristic + ?Sized>(
        &self,
        label: &str,
        test_cases: &[TestCase],
        heuristic: &H,
    ) -> BatchReport {
        info!("Running {} test cases: {label}", test_cases.len());
        let batch_start_time = Instant::now();
        let mut stats = Stats::default();

        let cases = test_cases
            .iter()
            .map(|case| {
                debug!("processing test case: {} to {}", case.start, case.goal);
                let outcome = self.route(&case.start, &case.goal, heuristic);
                stats.record(&outcome);
                CaseReport {
                    start: case.start.clone(),
                    goal: case.goal.clone(),
                    outcome,
                }
            })
            .collect();

        stats.time_us = batch_start_time.elapsed().as_micros() as u64;
        stats.print();

        BatchReport {
            label: label.to_string(),
            cases,
            stats,
        }
    }
}
