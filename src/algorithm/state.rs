use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::common::{PermitAcquisition, PermitSet, SearchResult};

/// Identity of a search state: the city together with the permits held.
/// Cost and path are deliberately left out so cheaper arrivals can replace
/// an existing entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct StateKey {
    pub(crate) city: String,
    pub(crate) permits: PermitSet,
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let permits: Vec<&str> = self.permits.iter().map(String::as_str).collect();
        write!(f, "{}|{}", self.city, permits.join(","))
    }
}

/// Immutable snapshot of one partial route. Children copy what they need
/// from the parent instead of sharing it.
#[derive(Debug, Clone)]
pub(crate) struct SearchState {
    pub(crate) key: StateKey,
    pub(crate) g_cost: f64,
    pub(crate) f_cost: f64,
    pub(crate) path: Vec<String>,
    pub(crate) permit_spend: f64,
    pub(crate) permits_acquired: Vec<PermitAcquisition>,
}

impl SearchState {
    pub(crate) fn seed(city: &str, h_cost: f64) -> Self {
        SearchState {
            key: StateKey {
                city: city.to_string(),
                permits: PermitSet::new(),
            },
            g_cost: 0.0,
            f_cost: h_cost,
            path: vec![city.to_string()],
            permit_spend: 0.0,
            permits_acquired: Vec::new(),
        }
    }

    /// Moves to `city` along an edge of weight `distance`.
    pub(crate) fn travel(&self, city: &str, distance: f64, h_cost: f64) -> Self {
        let g_cost = self.g_cost + distance;
        let mut path = self.path.clone();
        path.push(city.to_string());

        SearchState {
            key: StateKey {
                city: city.to_string(),
                permits: self.key.permits.clone(),
            },
            g_cost,
            f_cost: g_cost + h_cost,
            path,
            permit_spend: self.permit_spend,
            permits_acquired: self.permits_acquired.clone(),
        }
    }

    /// Buys `permit` in the current city. Returns `None` if it is already held.
    pub(crate) fn purchase(&self, permit: &str, permit_cost: f64) -> Option<Self> {
        if self.key.permits.contains(permit) {
            return None;
        }

        let mut permits = self.key.permits.clone();
        permits.insert(permit.to_string());
        let mut permits_acquired = self.permits_acquired.clone();
        permits_acquired.push(PermitAcquisition {
            permit: permit.to_string(),
            city: self.key.city.clone(),
        });

        Some(SearchState {
            key: StateKey {
                city: self.key.city.clone(),
                permits,
            },
            g_cost: self.g_cost + permit_cost,
            f_cost: self.f_cost + permit_cost,
            path: self.path.clone(),
            permit_spend: self.permit_spend + permit_cost,
            permits_acquired,
        })
    }

    pub(crate) fn holds(&self, permit: &str) -> bool {
        self.key.permits.contains(permit)
    }

    pub(crate) fn into_result(
        self: Rc<Self>,
        max_frontier_size: usize,
        nodes_expanded: usize,
    ) -> SearchResult {
        let state = Rc::unwrap_or_clone(self);
        SearchResult {
            cost: state.g_cost,
            max_frontier_size,
            nodes_expanded,
            path: state.path,
            permit_spend: state.permit_spend,
            permits_acquired: state.permits_acquired,
        }
    }
}

/// Frontier entry. Each key has at most one open entry, so ordering on
/// (f, g, key) is total and the entry of a superseded state can be found
/// again from its reached-map record.
#[derive(Debug, Clone)]
pub(crate) struct OpenNode {
    pub(crate) f_cost: f64,
    pub(crate) g_cost: f64,
    pub(crate) key: StateKey,
}

impl OpenNode {
    pub(crate) fn from_state(state: &SearchState) -> Self {
        OpenNode {
            f_cost: state.f_cost,
            g_cost: state.g_cost,
            key: state.key.clone(),
        }
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_cost
            .total_cmp(&other.f_cost)
            // Higher g cost has higher priority
            .then_with(|| other.g_cost.total_cmp(&self.g_cost))
            .then_with(|| self.key.cmp(&other.key))
    }
}
