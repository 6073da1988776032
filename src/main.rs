use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use flysim::{simulate, SimulationConfig};

const DEFAULT_OUTPUT: &str = "flysim_output.json";

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let Some(config_path) = args.next().map(PathBuf::from) else {
        eprintln!("usage: flysim <config.yaml> [output.json]");
        return ExitCode::from(2);
    };
    let output_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    match execute(&config_path, &output_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Simulation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(config_path: &Path, output_path: &Path) -> flysim::Result<()> {
    let config = SimulationConfig::from_file(config_path)?;
    let output = simulate(&config)?;
    output.write_json(output_path)?;
    info!(
        "Wrote {} samples to {}",
        output.record.states.len(),
        output_path.display()
    );
    Ok(())
}
