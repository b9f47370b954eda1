use std::path::Path;

use tracing::{debug, info};

use crate::common::TestCase;
use crate::error::Result;
use crate::graph::read_rows;

/// Loads `start;goal` pairs, one per line. Unlike the graph files there is
/// no header; rows without exactly two fields are dropped.
pub fn load_test_cases(path: impl AsRef<Path>) -> Result<Vec<TestCase>> {
    let rows = read_rows(path.as_ref(), false)?;

    let test_cases: Vec<TestCase> = rows
        .iter()
        .filter_map(|row| {
            let parts: Vec<&str> = row.split(';').map(str::trim).collect();
            if parts.len() != 2 || parts.iter().any(|part| part.is_empty()) {
                debug!("skip malformed test case: {row:?}");
                return None;
            }
            Some(TestCase {
                start: parts[0].to_string(),
                goal: parts[1].to_string(),
            })
        })
        .collect();

    info!("Loaded {} test cases", test_cases.len());
    Ok(test_cases)
}
