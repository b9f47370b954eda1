use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Permits held along a partial path. Ordered, so two sets with the same
/// members compare and hash equal regardless of acquisition order.
pub type PermitSet = BTreeSet<String>;

/// Token used by the input files for "no permit".
pub(crate) const NO_PERMIT: &str = "NONE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CostModel {
    /// Integer distances, heuristic precomputed per city.
    Integer,
    /// Real-valued distances, heuristic from city coordinates.
    Geodesic,
}

impl fmt::Display for CostModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostModel::Integer => f.write_str("integer"),
            CostModel::Geodesic => f.write_str("geodesic"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Position {
    Heuristic(u64),
    Coordinates { latitude: f64, longitude: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct City {
    pub name: String,
    pub position: Position,
    pub permit: Option<String>, // Permit obtainable in this city, if any
}

impl City {
    pub fn with_heuristic(name: &str, heuristic: u64, permit: Option<&str>) -> Self {
        City {
            name: name.to_string(),
            position: Position::Heuristic(heuristic),
            permit: permit.map(str::to_string),
        }
    }

    pub fn with_coordinates(name: &str, latitude: f64, longitude: f64, permit: Option<&str>) -> Self {
        City {
            name: name.to_string(),
            position: Position::Coordinates {
                latitude,
                longitude,
            },
            permit: permit.map(str::to_string),
        }
    }
}

/// Directed adjacency entry. The graph stores one per direction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
    pub distance: f64,
    pub required_permit: Option<String>,
}

impl Connection {
    pub fn new(from: &str, to: &str, distance: f64, required_permit: Option<&str>) -> Self {
        Connection {
            from: from.to_string(),
            to: to.to_string(),
            distance,
            required_permit: required_permit.map(str::to_string),
        }
    }

    pub fn reversed(&self) -> Self {
        Connection {
            from: self.to.clone(),
            to: self.from.clone(),
            distance: self.distance,
            required_permit: self.required_permit.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCase {
    pub start: String,
    pub goal: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermitAcquisition {
    pub permit: String,
    pub city: String,
}

impl fmt::Display for PermitAcquisition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Acquired permit {} at {}", self.permit, self.city)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub cost: f64,
    pub max_frontier_size: usize,
    pub nodes_expanded: usize,
    pub path: Vec<String>,
    pub permit_spend: f64,
    pub permits_acquired: Vec<PermitAcquisition>,
}

impl SearchResult {
    /// Cost of the route without the permit fees.
    pub fn travel_distance(&self) -> f64 {
        self.cost - self.permit_spend
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    Found(SearchResult),
    NoSolution {
        max_frontier_size: usize,
        nodes_expanded: usize,
    },
    CityNotFound {
        name: String,
    },
}

impl SearchOutcome {
    pub fn result(&self) -> Option<&SearchResult> {
        match self {
            SearchOutcome::Found(result) => Some(result),
            _ => None,
        }
    }

    pub fn into_result(self) -> Option<SearchResult> {
        match self {
            SearchOutcome::Found(result) => Some(result),
            _ => None,
        }
    }
}

/// Parses a permit field, mapping the `NONE` token and empty fields to `None`.
pub(crate) fn parse_permit(field: &str) -> Option<&str> {
    let field = field.trim();
    if field.is_empty() || field == NO_PERMIT {
        None
    } else {
        Some(field)
    }
}
