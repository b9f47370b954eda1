pub mod algorithm;
pub mod common;
pub mod config;
pub mod error;
pub mod graph;
pub mod heuristic;
pub mod report;
pub mod scenario;
pub mod solver;
pub mod stat;

pub use algorithm::permit_a_star_search;
pub use common::{
    City, Connection, CostModel, PermitAcquisition, PermitSet, Position, SearchOutcome,
    SearchResult, TestCase,
};
pub use error::{Error, Result};
pub use graph::Graph;
pub use heuristic::{DirectHeuristic, GeodesicHeuristic, Heuristic};
pub use solver::{BatchReport, BatchRunner, CaseReport};
