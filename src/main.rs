use permit_route::common::{CostModel, TestCase};
use permit_route::config::{Cli, Config};
use permit_route::graph::Graph;
use permit_route::heuristic::{DirectHeuristic, GeodesicHeuristic, Heuristic};
use permit_route::report::{render_batch, write_json};
use permit_route::scenario::load_test_cases;
use permit_route::solver::BatchRunner;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn heuristics(config: &Config) -> Vec<(String, Box<dyn Heuristic>)> {
    match config.cost_model {
        CostModel::Integer => {
            if config.scaling_factors != [1.0] {
                warn!("Scaling factors are ignored by the integer cost model");
            }
            vec![(
                "Direct Heuristic".to_string(),
                Box::new(DirectHeuristic) as Box<dyn Heuristic>,
            )]
        }
        CostModel::Geodesic => config
            .scaling_factors
            .iter()
            .map(|&factor| {
                let label = format!("Scaled Heuristic (Scaling Factor = {factor})");
                (label, Box::new(GeodesicHeuristic::new(factor)) as Box<dyn Heuristic>)
            })
            .collect(),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        let config_str = std::fs::read_to_string(config_file)
            .with_context(|| format!("error reading config file: {config_file}"))?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {config_file}"))?
    } else {
        info!("No config file specified, using default config");
        Config::default()
    }
    .override_from_command_line(&cli)?;

    let graph = Graph::from_files(
        &config.cities_path,
        &config.connections_path,
        config.cost_model,
    )
    .context("error loading graph")?;

    let mut test_cases = match &config.test_cases_path {
        Some(path) => load_test_cases(path).context("error loading test cases")?,
        None => Vec::new(),
    };
    if let (Some(start), Some(goal)) = (&config.start, &config.goal) {
        test_cases.push(TestCase {
            start: start.clone(),
            goal: goal.clone(),
        });
    }

    let runner = BatchRunner::new(&graph, config.permit_cost);
    let reports: Vec<_> = heuristics(&config)
        .iter()
        .map(|(label, heuristic)| runner.run(label, &test_cases, heuristic.as_ref()))
        .collect();

    for report in &reports {
        println!(
            "{}",
            render_batch(report, config.cost_model, config.summary_only)
        );
    }

    if let Some(output_path) = &config.output_path {
        write_json(output_path, &reports)
            .with_context(|| format!("error writing report: {output_path}"))?;
        info!("Report written to {output_path}");
    }

    Ok(())
}
