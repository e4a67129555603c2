//! Binary entry point for the paws CLI.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::process;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use clap::Parser;
use serde::Serialize;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use paws::memory::Registration;
use paws::{
    ConfigError, EngineConfig, MemoryEngine, MemoryEngineError, OutputError, ResourceOptions, Vpc,
    VpcConfig, VpcError,
};

mod cli;

use cli::{Cli, PlanCommand};

const STDOUT_LABEL: &str = "<stdout>";

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("plan failed: {0}")]
    Plan(#[from] VpcError<MemoryEngineError>),
    #[error("output {name} did not resolve: {source}")]
    Output {
        name: &'static str,
        #[source]
        source: OutputError,
    },
    #[error("failed to render plan: {0}")]
    Render(#[from] serde_json::Error),
    #[error("failed to write {path}: {message}")]
    Write { path: Utf8PathBuf, message: String },
}

#[derive(Debug, Serialize)]
struct PlanDocument {
    registrations: Vec<Registration>,
    outputs: BTreeMap<&'static str, String>,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let exit_code = match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .ok();
}

async fn dispatch(cli: Cli) -> Result<(), CliError> {
    match cli {
        Cli::Plan(command) => plan(command).await,
    }
}

async fn plan(command: PlanCommand) -> Result<(), CliError> {
    let vpc_config = VpcConfig::load_without_cli_args()?;
    let engine_config = EngineConfig::load_without_cli_args()?;
    let args = vpc_config.as_args()?;
    let engine = MemoryEngine::new(engine_config.as_deployment()?);

    let vpc = Vpc::new(&engine, &vpc_config.name, Some(&args), &ResourceOptions::new()).await?;
    engine.apply();

    let mut outputs = BTreeMap::new();
    for (name, output) in vpc.outputs() {
        let value = output
            .value()
            .await
            .map_err(|source| CliError::Output { name, source })?;
        outputs.insert(name, value);
    }

    let document = PlanDocument {
        registrations: engine.registrations(),
        outputs,
    };
    let rendered = serde_json::to_string_pretty(&document)?;
    match command.output {
        Some(path) => write_plan(Utf8Path::new(&path), &rendered),
        None => writeln!(io::stdout(), "{rendered}").map_err(|err| CliError::Write {
            path: Utf8PathBuf::from(STDOUT_LABEL),
            message: err.to_string(),
        }),
    }
}

fn write_plan(path: &Utf8Path, rendered: &str) -> Result<(), CliError> {
    let failure = |message: String| CliError::Write {
        path: path.to_path_buf(),
        message,
    };
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| failure(String::from("path is missing a file name")))?;

    Dir::open_ambient_dir(parent, ambient_authority())
        .and_then(|dir| dir.write(file_name, format!("{rendered}\n")))
        .map_err(|err| failure(err.to_string()))
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}
