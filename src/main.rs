// LteBed: LTE testbed scenarios on a discrete-event substrate
// Copyright (C) 2023 Tibor Schneider <sctibor@ethz.ch>
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

use std::{
    fs::create_dir_all,
    path::{Path, PathBuf},
};

use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;

use ltebed::{
    experiment::{generate_folder, RunRecord},
    replay::read_measurements,
    scenario::{Preset, ScenarioConfig},
    Testbed, TestbedError,
};

/// Build and run LTE testbed scenarios.
#[derive(Debug, Parser)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Where the scenario comes from.
#[derive(Debug, Args)]
struct Source {
    /// Predefined scenario
    #[clap(short, long, conflicts_with = "config", required_unless_present = "config")]
    preset: Option<Preset>,
    /// Scenario file, previously generated with `prepare`.
    #[clap(short, long)]
    config: Option<PathBuf>,
}

impl Source {
    fn load(&self) -> Result<ScenarioConfig, Box<dyn std::error::Error>> {
        match (&self.preset, &self.config) {
            (Some(preset), _) => Ok(preset.config()),
            (None, Some(file)) => Ok(ScenarioConfig::load(file)?),
            (None, None) => Err("Either a preset or a scenario file is required".into()),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Store a predefined scenario to file.
    Prepare {
        /// The predefined scenario
        preset: Preset,
        /// File to store the scenario
        output: PathBuf,
    },

    /// Run a single scenario and write all traces.
    Run {
        #[command(flatten)]
        source: Source,
        /// Seed of the random source, overriding the one of the scenario.
        #[clap(short, long)]
        seed: Option<u64>,
        /// Duration of the simulation in seconds, overriding the one of the scenario.
        #[clap(long)]
        horizon: Option<f64>,
        /// Output folder. If omitted, a new folder `ltebed_{NAME}_{DATE}` is created.
        #[clap(short, long)]
        output: Option<PathBuf>,
        /// Recorded measurements to replay (`time cell rnti rsrp sinr` per line).
        #[clap(short, long)]
        measurements: Option<PathBuf>,
        /// Folder containing the fading traces.
        #[clap(long)]
        fading_dir: Option<PathBuf>,
    },

    /// Run a scenario with many different seeds in parallel.
    Sweep {
        #[command(flatten)]
        source: Source,
        /// Number of seeds. Run `i` uses the seed of the scenario plus `i`.
        #[clap(long, default_value = "10")]
        seeds: u64,
        /// Number of workers to use in parallel. If not specified, it will use all available
        /// workers.
        #[clap(short, long)]
        threads: Option<usize>,
        /// Output folder. Each run writes into the sub-folder `seed_{SEED}`.
        #[clap(short, long)]
        output: PathBuf,
        /// Folder containing the fading traces.
        #[clap(long)]
        fading_dir: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_timed();

    let cli = Cli::parse();

    match cli.command {
        Command::Prepare { preset, output } => {
            preset.config().save(&output)?;
            log::info!("Stored scenario {preset} in {}", output.display());
        }
        Command::Run {
            source,
            seed,
            horizon,
            output,
            measurements,
            fading_dir,
        } => {
            let mut config = source.load()?;
            if let Some(seed) = seed {
                config.seed = seed;
            }
            if let Some(horizon) = horizon {
                config.horizon = horizon;
            }
            let output = match output {
                Some(dir) => {
                    create_dir_all(&dir)?;
                    dir
                }
                None => generate_folder(".", &config.name)?,
            };
            let replay = measurements.map(|p| read_measurements(&p)).transpose()?;
            let record = run_once(&config, &output, fading_dir.as_deref(), replay)?;
            println!(
                "{}: {} events fired, {} trace files written to {}",
                config.name,
                record.fired,
                record.written.len(),
                output.display()
            );
        }
        Command::Sweep {
            source,
            seeds,
            threads,
            output,
            fading_dir,
        } => {
            let config = source.load()?;
            let threads = threads.unwrap_or_else(num_cpus::get);
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()?;
            create_dir_all(&output)?;

            let results: Vec<Result<RunRecord, TestbedError>> = (0..seeds)
                .into_par_iter()
                .map(|i| {
                    let mut config = config.clone();
                    config.seed = config.seed.wrapping_add(i);
                    let dir = output.join(format!("seed_{}", config.seed));
                    if let Err(e) = create_dir_all(&dir) {
                        log::error!("Cannot create {}: {e}", dir.display());
                    }
                    run_once(&config, &dir, fading_dir.as_deref(), None)
                })
                .collect();

            let records = results.into_iter().collect::<Result<Vec<_>, _>>()?;
            let failed: usize = records.iter().map(|r| r.failed.len()).sum();
            println!(
                "{}: {} runs finished, {failed} trace files failed",
                config.name,
                records.len()
            );
        }
    }

    Ok(())
}

/// Build, run, and flush a single testbed. The record of the run is stored in
/// `{output}/summary.json`.
fn run_once(
    config: &ScenarioConfig,
    output: &Path,
    fading_dir: Option<&Path>,
    replay: Option<Vec<ltebed::replay::Recorded>>,
) -> Result<RunRecord, TestbedError> {
    let (mut testbed, mut sim) = Testbed::build(config)?;
    let fading = testbed.fading_trace(fading_dir);
    if let Some(records) = replay {
        testbed.schedule_replay(&mut sim, records)?;
    }

    let summary = sim.run(&mut testbed);
    log::info!(
        "Scenario {} (seed {}) finished at {}s after {} events",
        config.name,
        config.seed,
        summary.end_time,
        summary.fired
    );

    let record = RunRecord::new(config, &testbed, fading, &summary);
    let report = testbed.finish(output, summary.end_time);
    let record = record.with_flush(&report);
    if let Err(e) = record.write_json(output.join("summary.json")) {
        log::error!("Cannot write the summary: {e}");
    }
    Ok(record)
}
