use super::state::{OpenNode, SearchState, StateKey};
use crate::common::SearchOutcome;
use crate::graph::Graph;
use crate::heuristic::Heuristic;

use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;
use tracing::{debug, instrument, trace};

/// Open list plus the best known state for every key.
struct Frontier {
    open_list: BTreeSet<OpenNode>,
    reached: HashMap<StateKey, Rc<SearchState>>,
}

impl Frontier {
    fn new() -> Self {
        Frontier {
            open_list: BTreeSet::new(),
            reached: HashMap::new(),
        }
    }

    /// Inserts `state` unless a state with the same key and no greater cost
    /// is already known. A superseded entry is removed from the open list
    /// before the cheaper one is added.
    fn insert_or_relax(&mut self, state: SearchState) {
        if let Some(existing) = self.reached.get(&state.key) {
            if existing.g_cost <= state.g_cost {
                trace!("discard {} at cost {}", state.key, state.g_cost);
                return;
            }
            trace!(
                "relax {} from {} to {}",
                state.key,
                existing.g_cost,
                state.g_cost
            );
            self.open_list.remove(&OpenNode::from_state(existing));
        }

        self.open_list.insert(OpenNode::from_state(&state));
        self.reached.insert(state.key.clone(), Rc::new(state));
    }

    fn pop(&mut self) -> Option<Rc<SearchState>> {
        let node = self.open_list.pop_first()?;
        self.reached.get(&node.key).cloned()
    }

    fn len(&self) -> usize {
        self.open_list.len()
    }
}

/// A* over (city, permit set) states.
///
/// Permits can be bought for `permit_cost` on arrival at a city offering
/// one, or at the start city before departing. Edges that require a permit
/// are only traversable once it is held.
#[instrument(skip_all, name = "permit_a_star", fields(start = start, goal = goal), level = "debug")]
pub fn permit_a_star_search<H: Heuristic + ?Sized>(
    graph: &Graph,
    heuristic: &H,
    start: &str,
    goal: &str,
    permit_cost: f64,
) -> SearchOutcome {
    let Some(start_city) = graph.city(start) else {
        debug!("start city not found");
        return SearchOutcome::CityNotFound {
            name: start.to_string(),
        };
    };
    let Some(goal_city) = graph.city(goal) else {
        debug!("goal city not found");
        return SearchOutcome::CityNotFound {
            name: goal.to_string(),
        };
    };

    let mut frontier = Frontier::new();
    let mut max_frontier_size = 0;
    let mut nodes_expanded = 0;

    let seed = SearchState::seed(start, heuristic.estimate(start_city, goal_city));
    if let Some(permit) = &start_city.permit {
        if let Some(seed_with_permit) = seed.purchase(permit, permit_cost) {
            frontier.insert_or_relax(seed_with_permit);
        }
    }
    frontier.insert_or_relax(seed);

    loop {
        max_frontier_size = max_frontier_size.max(frontier.len());
        let Some(current) = frontier.pop() else {
            break;
        };
        nodes_expanded += 1;
        trace!("expand {} g={} f={}", current.key, current.g_cost, current.f_cost);

        if current.key.city == goal {
            debug!(
                "found route with cost {} after {nodes_expanded} expansions",
                current.g_cost
            );
            return SearchOutcome::Found(current.into_result(max_frontier_size, nodes_expanded));
        }

        for connection in graph.neighbors(&current.key.city) {
            let Some(next_city) = graph.city(&connection.to) else {
                continue;
            };

            if let Some(required) = &connection.required_permit {
                if !current.holds(required) {
                    continue;
                }
            }

            let h_cost = heuristic.estimate(next_city, goal_city);
            let child = current.travel(&next_city.name, connection.distance, h_cost);

            // Second child buys the permit offered on arrival.
            let child_with_permit = next_city
                .permit
                .as_deref()
                .and_then(|permit| child.purchase(permit, permit_cost));

            frontier.insert_or_relax(child);
            if let Some(child_with_permit) = child_with_permit {
                frontier.insert_or_relax(child_with_permit);
            }
        }
    }

    debug!("cannot find solution");
    SearchOutcome::NoSolution {
        max_frontier_size,
        nodes_expanded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{City, Connection, PermitSet, SearchResult};
    use crate::heuristic::{DirectHeuristic, GeodesicHeuristic};

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    const PERMIT_COST: f64 = 10.0;

    // Helper function to setup tracing
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    }

    fn build_graph(cities: Vec<City>, connections: Vec<Connection>) -> Graph {
        let mut graph = Graph::new();
        graph.load_cities(cities);
        graph.load_connections(connections);
        graph
    }

    // A(h 0) --10-- B(h 5, offers P1) --1 [P1]-- C(h 0)
    fn permit_graph(required: &str) -> Graph {
        build_graph(
            vec![
                City::with_heuristic("A", 0, None),
                City::with_heuristic("B", 5, Some("P1")),
                City::with_heuristic("C", 0, None),
            ],
            vec![
                Connection::new("A", "B", 10.0, None),
                Connection::new("B", "C", 1.0, Some(required)),
            ],
        )
    }

    fn found(outcome: SearchOutcome) -> SearchResult {
        match outcome {
            SearchOutcome::Found(result) => result,
            other => panic!("expected a route, got {other:?}"),
        }
    }

    #[test]
    fn test_buys_permit_on_the_way() {
        init_tracing();
        let graph = permit_graph("P1");
        let result = found(permit_a_star_search(&graph, &DirectHeuristic, "A", "C", PERMIT_COST));

        assert_eq!(result.cost, 21.0);
        assert_eq!(result.path, vec!["A", "B", "C"]);
        assert_eq!(result.permit_spend, 10.0);
        assert_eq!(result.travel_distance(), 11.0);
        assert_eq!(result.permits_acquired.len(), 1);
        assert_eq!(result.permits_acquired[0].permit, "P1");
        assert_eq!(result.permits_acquired[0].city, "B");
    }

    #[test]
    fn test_unobtainable_permit_has_no_solution() {
        init_tracing();
        let graph = permit_graph("P2");
        let outcome = permit_a_star_search(&graph, &DirectHeuristic, "A", "C", PERMIT_COST);

        match outcome {
            SearchOutcome::NoSolution {
                max_frontier_size,
                nodes_expanded,
            } => {
                // A, B, B|P1 and A|P1 are expanded before the frontier empties.
                assert_eq!(nodes_expanded, 4);
                assert_eq!(max_frontier_size, 2);
            }
            other => panic!("expected no solution, got {other:?}"),
        }
    }

    #[test]
    fn test_disconnected_goal() {
        init_tracing();
        let graph = build_graph(
            vec![
                City::with_heuristic("A", 0, None),
                City::with_heuristic("B", 0, None),
                City::with_heuristic("Island", 0, None),
            ],
            vec![Connection::new("A", "B", 1.0, None)],
        );
        let outcome = permit_a_star_search(&graph, &DirectHeuristic, "A", "Island", PERMIT_COST);
        assert_eq!(
            outcome,
            SearchOutcome::NoSolution {
                max_frontier_size: 1,
                nodes_expanded: 2,
            }
        );
    }

    #[test]
    fn test_unknown_cities() {
        let graph = permit_graph("P1");
        assert_eq!(
            permit_a_star_search(&graph, &DirectHeuristic, "X", "C", PERMIT_COST),
            SearchOutcome::CityNotFound { name: "X".to_string() }
        );
        assert_eq!(
            permit_a_star_search(&graph, &DirectHeuristic, "A", "Y", PERMIT_COST),
            SearchOutcome::CityNotFound { name: "Y".to_string() }
        );
    }

    #[test]
    fn test_start_is_goal() {
        let graph = permit_graph("P1");
        let result = found(permit_a_star_search(&graph, &DirectHeuristic, "B", "B", PERMIT_COST));

        assert_eq!(result.cost, 0.0);
        assert_eq!(result.path, vec!["B"]);
        assert!(result.permits_acquired.is_empty());
        assert_eq!(result.nodes_expanded, 1);
        assert_eq!(result.max_frontier_size, 2);
    }

    #[test]
    fn test_start_city_permit_is_bought_before_departing() {
        init_tracing();
        let graph = permit_graph("P1");
        let result = found(permit_a_star_search(&graph, &DirectHeuristic, "B", "C", PERMIT_COST));

        assert_eq!(result.cost, 11.0);
        assert_eq!(result.path, vec!["B", "C"]);
        assert_eq!(result.permits_acquired[0].city, "B");
    }

    #[test]
    fn test_edge_to_unknown_city_is_skipped() {
        let graph = build_graph(
            vec![
                City::with_heuristic("A", 0, None),
                City::with_heuristic("B", 0, None),
            ],
            vec![
                Connection::new("A", "Ghost", 1.0, None),
                Connection::new("A", "B", 3.0, None),
            ],
        );
        let result = found(permit_a_star_search(&graph, &DirectHeuristic, "A", "B", PERMIT_COST));
        assert_eq!(result.cost, 3.0);
        assert_eq!(result.path, vec!["A", "B"]);
    }

    #[test]
    fn test_cheaper_arrival_relaxes_existing_state() {
        init_tracing();
        // The direct edge to C is discovered first but the detour through B
        // is cheaper; C must be relaxed before the goal is reached.
        let graph = build_graph(
            vec![
                City::with_heuristic("A", 0, None),
                City::with_heuristic("B", 0, None),
                City::with_heuristic("C", 0, None),
                City::with_heuristic("D", 0, None),
            ],
            vec![
                Connection::new("A", "C", 10.0, None),
                Connection::new("A", "B", 1.0, None),
                Connection::new("B", "C", 1.0, None),
                Connection::new("C", "D", 1.0, None),
            ],
        );
        let result = found(permit_a_star_search(&graph, &DirectHeuristic, "A", "D", PERMIT_COST));
        assert_eq!(result.cost, 3.0);
        assert_eq!(result.path, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_returns_to_buy_permit() {
        init_tracing();
        // The permit for the only road to G is sold at a dead end.
        let graph = build_graph(
            vec![
                City::with_heuristic("S", 0, None),
                City::with_heuristic("Shop", 0, Some("P")),
                City::with_heuristic("G", 0, None),
            ],
            vec![
                Connection::new("S", "Shop", 2.0, None),
                Connection::new("S", "G", 5.0, Some("P")),
            ],
        );
        let result = found(permit_a_star_search(&graph, &DirectHeuristic, "S", "G", PERMIT_COST));
        assert_eq!(result.cost, 2.0 + 10.0 + 2.0 + 5.0);
        assert_eq!(result.path, vec!["S", "Shop", "S", "G"]);
        assert_eq!(result.permit_spend, 10.0);
    }

    #[test]
    fn test_scaled_heuristic_still_finds_route() {
        let graph = build_graph(
            vec![
                City::with_coordinates("Berlin", 52.52, 13.405, None),
                City::with_coordinates("Frankfurt", 50.1109, 8.6821, None),
                City::with_coordinates("Munich", 48.1351, 11.582, None),
            ],
            vec![
                Connection::new("Berlin", "Frankfurt", 545.0, None),
                Connection::new("Frankfurt", "Munich", 392.0, None),
            ],
        );
        for factor in [0.0, 1.0, 1.4515] {
            let heuristic = GeodesicHeuristic::new(factor);
            let result = found(permit_a_star_search(&graph, &heuristic, "Berlin", "Munich", PERMIT_COST));
            assert_eq!(result.cost, 937.0);
        }
    }

    // Exhaustive search over simple paths of the (city, permit set) graph with
    // the same arrival-only purchase rules.
    fn brute_force(
        graph: &Graph,
        city: &str,
        permits: &PermitSet,
        cost: f64,
        goal: &str,
        visited: &mut HashSet<(String, PermitSet)>,
        best: &mut Option<f64>,
    ) {
        if city == goal {
            if best.map_or(true, |b| cost < b) {
                *best = Some(cost);
            }
            return;
        }

        for connection in graph.neighbors(city) {
            let Some(next) = graph.city(&connection.to) else {
                continue;
            };
            if let Some(required) = &connection.required_permit {
                if !permits.contains(required) {
                    continue;
                }
            }

            let mut options = vec![(permits.clone(), cost + connection.distance)];
            if let Some(permit) = &next.permit {
                if !permits.contains(permit) {
                    let mut with_permit = permits.clone();
                    with_permit.insert(permit.clone());
                    options.push((with_permit, cost + connection.distance + PERMIT_COST));
                }
            }

            for (next_permits, next_cost) in options {
                let key = (next.name.clone(), next_permits.clone());
                if visited.insert(key.clone()) {
                    brute_force(graph, &next.name, &next_permits, next_cost, goal, visited, best);
                    visited.remove(&key);
                }
            }
        }
    }

    fn brute_force_cost(graph: &Graph, start: &str, goal: &str) -> Option<f64> {
        let mut best = None;
        let mut seeds = vec![(PermitSet::new(), 0.0)];
        if let Some(permit) = &graph.city(start).unwrap().permit {
            seeds.push((PermitSet::from([permit.clone()]), PERMIT_COST));
        }
        for (permits, cost) in seeds {
            let mut visited = HashSet::from([(start.to_string(), permits.clone())]);
            brute_force(graph, start, &permits, cost, goal, &mut visited, &mut best);
        }
        best
    }

    fn random_graph(rng: &mut StdRng) -> Graph {
        let names = ["A", "B", "C", "D", "E"];
        let permits = ["P", "Q"];

        let cities = names
            .iter()
            .map(|name| {
                let permit = if rng.gen_bool(0.3) {
                    Some(permits[rng.gen_range(0..permits.len())])
                } else {
                    None
                };
                City::with_heuristic(name, 0, permit)
            })
            .collect::<Vec<_>>();

        let mut connections = Vec::new();
        for i in 0..names.len() {
            for j in (i + 1)..names.len() {
                if rng.gen_bool(0.5) {
                    let required = if rng.gen_bool(0.3) {
                        Some(permits[rng.gen_range(0..permits.len())])
                    } else {
                        None
                    };
                    let distance = rng.gen_range(1..20) as f64;
                    connections.push(Connection::new(names[i], names[j], distance, required));
                }
            }
        }
        build_graph(cities, connections)
    }

    // Shortest distances to `goal` ignoring permits; consistent for the
    // permit problem since permits only add cost and remove edges.
    fn relaxed_heuristic(graph: &Graph, goal: &str) -> Graph {
        let names: Vec<String> = ["A", "B", "C", "D", "E"].iter().map(|n| n.to_string()).collect();
        let mut distance: HashMap<String, f64> = HashMap::from([(goal.to_string(), 0.0)]);
        // Bellman-Ford, the graph is tiny.
        for _ in 0..names.len() {
            for name in &names {
                for connection in graph.neighbors(name) {
                    if let Some(&d) = distance.get(&connection.to) {
                        let candidate = d + connection.distance;
                        if distance.get(name).map_or(true, |current| candidate < *current) {
                            distance.insert(name.clone(), candidate);
                        }
                    }
                }
            }
        }

        let cities = names
            .iter()
            .map(|name| {
                let city = graph.city(name).unwrap();
                let h = distance.get(name).copied().unwrap_or(0.0) as u64;
                City::with_heuristic(name, h, city.permit.as_deref())
            })
            .collect::<Vec<_>>();
        let connections = names
            .iter()
            .flat_map(|name| graph.neighbors(name).iter())
            .filter(|connection| connection.from < connection.to)
            .cloned()
            .collect::<Vec<_>>();
        build_graph(cities, connections)
    }

    #[test]
    fn test_matches_brute_force_on_random_graphs() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let graph = random_graph(&mut rng);
            let start = ["A", "B", "C", "D", "E"][rng.gen_range(0..5)];
            let goal = ["A", "B", "C", "D", "E"][rng.gen_range(0..5)];

            let expected = brute_force_cost(&graph, start, goal);
            let actual = permit_a_star_search(&graph, &DirectHeuristic, start, goal, PERMIT_COST);
            assert_eq!(actual.result().map(|r| r.cost), expected, "{start} -> {goal}: {graph:?}");

            let informed = relaxed_heuristic(&graph, goal);
            let actual = permit_a_star_search(&informed, &DirectHeuristic, start, goal, PERMIT_COST);
            assert_eq!(actual.result().map(|r| r.cost), expected, "{start} -> {goal}: {graph:?}");
        }
    }

    #[test]
    fn test_permit_spend_matches_distinct_acquisitions() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let graph = random_graph(&mut rng);
            let start = ["A", "B", "C", "D", "E"][rng.gen_range(0..5)];
            let goal = ["A", "B", "C", "D", "E"][rng.gen_range(0..5)];

            if let SearchOutcome::Found(result) =
                permit_a_star_search(&graph, &DirectHeuristic, start, goal, PERMIT_COST)
            {
                let distinct: HashSet<&str> = result
                    .permits_acquired
                    .iter()
                    .map(|acquisition| acquisition.permit.as_str())
                    .collect();
                assert_eq!(distinct.len(), result.permits_acquired.len());
                assert_eq!(result.permit_spend, distinct.len() as f64 * PERMIT_COST);
                assert_eq!(result.path.first().map(String::as_str), Some(start));
                assert_eq!(result.path.last().map(String::as_str), Some(goal));
            }
        }
    }
}
