//! `mimo-build`: build the MIMO patch array and dry-run its solve.

mod cli;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use array_builder::{run, BuildError, ParameterSet, SolveSettings};
use file_format::{load_parameters, save_model, save_parameters, LoadError, SaveError};
use sim_engine::MockEngine;
use test_harness::ModelReport;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, Options, USAGE};

#[derive(Debug, thiserror::Error)]
enum DriverError {
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    #[error("invalid solve settings in {}: {source}", .path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error("build failed ({kind} at {entity}): {source}", kind = .source.kind(), entity = .source.entity())]
    Build {
        #[from]
        source: BuildError,
    },

    #[error("failed to serialize journal: {0}")]
    Journal(#[source] serde_json::Error),
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn read(path: &Path) -> Result<String, DriverError> {
    fs::read_to_string(path).map_err(|source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, contents: &str) -> Result<(), DriverError> {
    fs::write(path, contents).map_err(|source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "written");
    Ok(())
}

fn execute(opts: &Options) -> Result<(), DriverError> {
    let (params, loaded) = match &opts.params {
        Some(path) => {
            let (params, metadata) =
                load_parameters(&read(path)?).map_err(|source| DriverError::Load {
                    path: path.clone(),
                    source,
                })?;
            (params, Some(metadata))
        }
        None => (ParameterSet::default(), None),
    };
    let mut metadata = opts.metadata(loaded);
    metadata.touch();

    if let Some(path) = &opts.write_params {
        return write(path, &save_parameters(&params, &metadata)?);
    }

    let settings = match &opts.settings {
        Some(path) => {
            serde_json::from_str(&read(path)?).map_err(|source| DriverError::Settings {
                path: path.clone(),
                source,
            })?
        }
        None => SolveSettings::default(),
    };

    let mut engine = MockEngine::new();
    let outcome = run(&params, &settings, &mut engine)?;
    info!(
        project = %metadata.name,
        design = %metadata.design,
        commands = engine.journal().len(),
        "dry run complete"
    );

    if opts.report {
        println!("{}", ModelReport::from_model(&outcome.model, Some(&outcome.solve)));
    }
    if let Some(path) = &opts.journal {
        let json = serde_json::to_string_pretty(engine.journal()).map_err(DriverError::Journal)?;
        write(path, &json)?;
    }
    if let Some(path) = &opts.model {
        write(path, &save_model(&outcome.model, &outcome.solve, &metadata)?)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let opts = match cli::parse(std::env::args().skip(1)) {
        Ok(Command::Run(opts)) => opts,
        Ok(Command::Help) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(msg) => {
            eprintln!("mimo-build: {msg}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    init_logging();
    match execute(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
