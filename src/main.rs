mod config;
mod error;

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use redux::Report;
use tracing::{debug, error, info};

use crate::{
    config::{Config, Job, Overrides},
    error::Error,
};

/// Reduces the palette of a plain PPM image to `k` colors using k-means clustering.
#[derive(Parser)]
#[clap(version)]
struct Args {
    /// Path to the TOML config file. Defaults to `ppmredux.toml` if it exists.
    #[clap(long)]
    config: Option<PathBuf>,

    #[clap(flatten)]
    overrides: Overrides,
}

fn reduce(job: &Job) -> Result<Report, redux::Error> {
    let mut image = redux::load(&job.input)?;
    info!(
        width = image.width,
        height = image.height,
        "loaded {:?}",
        job.input
    );

    let report = image.cluster(job.k, job.options.clone())?;
    for (i, color) in report.palette.iter().enumerate() {
        debug!("palette color #{i}: {color}");
    }

    image.export_reduced(&job.output)?;
    Ok(report)
}

fn run(args: Args) -> Result<(), Error> {
    let mut config = Config::load(args.config.as_deref())?;
    config.apply(args.overrides);
    let job = config.job()?;
    debug!(?job, "resolved job");

    let report = reduce(&job)?;
    info!(
        iterations = report.iterations(),
        converged = report.converged(),
        "wrote {} colors to {:?}",
        report.palette.len(),
        job.output
    );

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
