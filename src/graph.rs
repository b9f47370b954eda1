use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::common::{parse_permit, City, Connection, CostModel};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    cities: HashMap<String, City>,
    adjacency: HashMap<String, Vec<Connection>>, // Outgoing edges in file order
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_files(
        cities_path: impl AsRef<Path>,
        connections_path: impl AsRef<Path>,
        model: CostModel,
    ) -> Result<Self> {
        let mut graph = Graph::new();
        graph.load_cities(read_cities(cities_path, model)?);
        graph.load_connections(read_connections(connections_path, model)?);
        info!(
            "Loaded {} cities and {} directed connections ({model} model)",
            graph.city_count(),
            graph.connection_count()
        );
        Ok(graph)
    }

    /// Replaces all cities held by the store.
    pub fn load_cities(&mut self, cities: impl IntoIterator<Item = City>) {
        self.cities.clear();
        for city in cities {
            self.cities.insert(city.name.clone(), city);
        }
    }

    /// Replaces all connections held by the store. Every record is
    /// traversable in both directions.
    pub fn load_connections(&mut self, connections: impl IntoIterator<Item = Connection>) {
        self.adjacency.clear();
        for connection in connections {
            let reversed = connection.reversed();
            self.adjacency
                .entry(connection.from.clone())
                .or_default()
                .push(connection);
            self.adjacency
                .entry(reversed.from.clone())
                .or_default()
                .push(reversed);
        }
    }

    pub fn city(&self, name: &str) -> Option<&City> {
        self.cities.get(name)
    }

    pub fn neighbors(&self, name: &str) -> &[Connection] {
        self.adjacency
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    pub fn connection_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }
}

/// Reads a cities file. The first line is a header; blank and malformed
/// rows are dropped.
pub fn read_cities(path: impl AsRef<Path>, model: CostModel) -> Result<Vec<City>> {
    let rows = read_rows(path.as_ref(), true)?;
    Ok(rows
        .iter()
        .filter_map(|row| {
            let city = parse_city(row, model);
            if city.is_none() {
                debug!("skip malformed city row: {row:?}");
            }
            city
        })
        .collect())
}

/// Reads a connections file. Same row rules as [`read_cities`].
pub fn read_connections(path: impl AsRef<Path>, model: CostModel) -> Result<Vec<Connection>> {
    let rows = read_rows(path.as_ref(), true)?;
    Ok(rows
        .iter()
        .filter_map(|row| {
            let connection = parse_connection(row, model);
            if connection.is_none() {
                debug!("skip malformed connection row: {row:?}");
            }
            connection
        })
        .collect())
}

/// Returns the trimmed, non-empty lines of a file.
pub(crate) fn read_rows(path: &Path, skip_header: bool) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|err| Error::io(path, err))?;
    let reader = BufReader::new(file);

    let mut rows = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|err| Error::io(path, err))?;
        if skip_header && index == 0 {
            continue;
        }
        let line = line.trim();
        if !line.is_empty() {
            rows.push(line.to_string());
        }
    }
    Ok(rows)
}

fn parse_city(row: &str, model: CostModel) -> Option<City> {
    let parts: Vec<&str> = row.split(';').map(str::trim).collect();
    match model {
        CostModel::Integer => {
            if parts.len() < 3 {
                return None;
            }
            let heuristic = parts[1].parse::<u64>().ok()?;
            Some(City::with_heuristic(
                parts[0],
                heuristic,
                parse_permit(parts[2]),
            ))
        }
        CostModel::Geodesic => {
            if parts.len() < 4 {
                return None;
            }
            let latitude = parse_finite(parts[1])?;
            let longitude = parse_finite(parts[2])?;
            Some(City::with_coordinates(
                parts[0],
                latitude,
                longitude,
                parse_permit(parts[3]),
            ))
        }
    }
}

fn parse_connection(row: &str, model: CostModel) -> Option<Connection> {
    let parts: Vec<&str> = row.split(';').map(str::trim).collect();
    if parts.len() < 4 {
        return None;
    }
    let distance = match model {
        CostModel::Integer => parts[2].parse::<u64>().ok()? as f64,
        CostModel::Geodesic => parse_finite(parts[2]).filter(|d| *d >= 0.0)?,
    };
    Some(Connection::new(
        parts[0],
        parts[1],
        distance,
        parse_permit(parts[3]),
    ))
}

fn parse_finite(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|value| value.is_finite())
}
