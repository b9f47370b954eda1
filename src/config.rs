use anyhow::{anyhow, Context};
use clap::Parser;
use serde::Deserialize;

use crate::common::CostModel;

#[derive(Parser, Debug)]
#[command(
    name = "Permit Route",
    about = "Least-cost routes over city graphs with purchasable road permits.",
    version = "0.1"
)]
pub struct Cli {
    #[arg(long, help = "Path to a YAML config file, overridden by command-line flags")]
    pub config: Option<String>,

    #[arg(long, help = "Path to the cities file")]
    pub cities_path: Option<String>,

    #[arg(long, help = "Path to the connections file")]
    pub connections_path: Option<String>,

    #[arg(long, help = "Path to the test cases file (start;goal per line)")]
    pub test_cases_path: Option<String>,

    #[arg(long, value_enum, help = "Cost model of the input files")]
    pub cost_model: Option<CostModel>,

    #[arg(long, help = "Start city for a single query")]
    pub start: Option<String>,

    #[arg(long, help = "Goal city for a single query")]
    pub goal: Option<String>,

    #[arg(long, help = "Cost of acquiring one permit")]
    pub permit_cost: Option<f64>,

    #[arg(
        long,
        help = "Geodesic heuristic scaling factors, one batch pass each",
        value_delimiter = ','
    )]
    pub scaling_factors: Vec<f64>,

    #[arg(long, help = "Only print aggregate statistics", default_value_t = false)]
    pub summary_only: bool,

    #[arg(long, help = "Path to write a JSON report to")]
    pub output_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub cities_path: String,
    pub connections_path: String,
    pub test_cases_path: Option<String>,
    pub cost_model: CostModel,
    pub start: Option<String>,
    pub goal: Option<String>,
    pub permit_cost: f64,
    pub scaling_factors: Vec<f64>,
    pub summary_only: bool,
    pub output_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cities_path: "graph_file/test/cities.txt".to_string(),
            connections_path: "graph_file/test/connections.txt".to_string(),
            test_cases_path: None,
            cost_model: CostModel::Integer,
            start: None,
            goal: None,
            permit_cost: 10.0,
            scaling_factors: vec![1.0],
            summary_only: false,
            output_path: None,
        }
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(yaml).context("invalid config")
    }

    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if let Some(cities_path) = &cli.cities_path {
            self.cities_path = cities_path.clone();
        }
        if let Some(connections_path) = &cli.connections_path {
            self.connections_path = connections_path.clone();
        }
        if let Some(test_cases_path) = &cli.test_cases_path {
            self.test_cases_path = Some(test_cases_path.clone());
        }
        if let Some(cost_model) = cli.cost_model {
            self.cost_model = cost_model;
        }
        if let Some(start) = &cli.start {
            self.start = Some(start.clone());
        }
        if let Some(goal) = &cli.goal {
            self.goal = Some(goal.clone());
        }
        if let Some(permit_cost) = cli.permit_cost {
            self.permit_cost = permit_cost;
        }
        if !cli.scaling_factors.is_empty() {
            self.scaling_factors = cli.scaling_factors.clone();
        }
        if cli.summary_only {
            self.summary_only = true;
        }
        if let Some(output_path) = &cli.output_path {
            self.output_path = Some(output_path.clone());
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.permit_cost.is_finite() || self.permit_cost <= 0.0 {
            return Err(anyhow!(
                "Permit cost must be a positive number, got {}",
                self.permit_cost
            ));
        }

        if self.scaling_factors.is_empty() {
            return Err(anyhow!("At least one scaling factor is required"));
        }
        if let Some(factor) = self
            .scaling_factors
            .iter()
            .find(|factor| !factor.is_finite() || **factor < 0.0)
        {
            return Err(anyhow!(
                "Scaling factors must be non-negative numbers, got {}",
                factor
            ));
        }

        match (&self.start, &self.goal) {
            (Some(_), None) | (None, Some(_)) => {
                return Err(anyhow!("--start and --goal must be given together"));
            }
            (None, None) if self.test_cases_path.is_none() => {
                return Err(anyhow!(
                    "Nothing to do: give --test-cases-path or --start and --goal"
                ));
            }
            _ => {}
        }
        Ok(())
    }
}
