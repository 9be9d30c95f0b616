//! Runs the full processing chain for a dataset: spread graphs, fireplains, then output files.
use crate::burn::BurnSummary;
use crate::fireplain::build_fireplains;
use crate::input::Dataset;
use crate::output::DataWriter;
use crate::spread::{ErrorPolicy, SpreadSummary, build_scenarios, build_spread_graphs};
use anyhow::Result;
use log::info;
use serde::Serialize;
use std::path::Path;

/// Counts describing what a run produced
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Number of fireplains written
    pub fireplains: usize,
    /// Number of spread graphs written
    pub spread_graphs: usize,
    /// Statistics for the raw burn records
    pub burns: BurnSummary,
    /// What happened while building the spread graphs
    pub spread: SpreadSummary,
}

/// Build the spread graphs and fireplains for a dataset and write them to `output_path`.
///
/// # Arguments
///
/// * `dataset` - The loaded input dataset
/// * `output_path` - Folder where output files will be saved
/// * `policy` - What to do if an iteration's spread graph can't be built
pub fn run(dataset: &Dataset, output_path: &Path, policy: ErrorPolicy) -> Result<RunSummary> {
    let scenarios = build_scenarios(&dataset.burned, &dataset.ignitions);
    info!("Building spread graphs for {} iterations", scenarios.len());

    let spread_graphs = build_spread_graphs(
        &scenarios,
        &dataset.network,
        dataset.parameters.tie_tolerance,
        policy,
    )?;
    let spread = spread_graphs.summary();
    info!(
        "Built {} spread graphs with {} edges ({} empty, {} failed)",
        spread_graphs.len(),
        spread.edges,
        spread.empty,
        spread.failed
    );

    let fireplains = build_fireplains(&spread_graphs);
    info!("Built {} fireplains", fireplains.len());

    let mut writer = DataWriter::create(output_path)?;
    writer.write_spread_graphs(&spread_graphs)?;
    writer.write_fireplains(&fireplains)?;
    writer.flush()?;

    Ok(RunSummary {
        fireplains: fireplains.len(),
        spread_graphs: spread_graphs.len(),
        burns: dataset.burn_summary.clone(),
        spread: spread.clone(),
    })
}
