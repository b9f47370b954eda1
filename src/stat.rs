use serde::Serialize;
use tracing::info;

use crate::common::SearchOutcome;

/// Aggregates over one batch of searches. Averages only cover searches that
/// found a route.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stats {
    pub successful: usize,
    pub no_solution: usize,
    pub not_found: usize,
    pub total_cost: f64,
    pub total_max_frontier_size: usize,
    pub total_nodes_expanded: usize,
    pub time_us: u64,
}

impl Stats {
    pub fn record(&mut self, outcome: &SearchOutcome) {
        match outcome {
            SearchOutcome::Found(result) => {
                self.successful += 1;
                self.total_cost += result.cost;
                self.total_max_frontier_size += result.max_frontier_size;
                self.total_nodes_expanded += result.nodes_expanded;
            }
            SearchOutcome::NoSolution { .. } => self.no_solution += 1,
            SearchOutcome::CityNotFound { .. } => self.not_found += 1,
        }
    }

    pub fn failed(&self) -> usize {
        self.no_solution + self.not_found
    }

    pub fn average_cost(&self) -> Option<f64> {
        self.average(self.total_cost)
    }

    pub fn average_max_frontier_size(&self) -> Option<f64> {
        self.average(self.total_max_frontier_size as f64)
    }

    pub fn average_nodes_expanded(&self) -> Option<f64> {
        self.average(self.total_nodes_expanded as f64)
    }

    fn average(&self, total: f64) -> Option<f64> {
        (self.successful > 0).then(|| total / self.successful as f64)
    }

    pub(crate) fn print(&self) {
        info!(
            "Successful {:?} No solution {:?} Not found {:?} Time(microseconds) {:?} Average cost {:?} Average max frontier {:?} Average expanded {:?}",
            self.successful,
            self.no_solution,
            self.not_found,
            self.time_us,
            self.average_cost(),
            self.average_max_frontier_size(),
            self.average_nodes_expanded()
        );
    }
}
