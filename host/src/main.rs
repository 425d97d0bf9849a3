//! Witness input generator
//!
//! Encodes raw readings as BN254 field elements and optionally appends the
//! Merkle root committing to them, printing one line of decimal tokens.
//! Usage: witness --input 0 4294967295 0 --merkle

mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use witness_core::{HashKind, ValueBound, WitnessConfig, WitnessError, WitnessSerializer};

use crate::config::ProfileOverrides;

#[derive(Parser, Debug)]
#[command(name = "witness", version, about = "Generate circuit witness input", long_about = None)]
struct Args {
    /// Raw values, in order
    #[arg(short, long, num_args = 1.., value_name = "VALUE")]
    input: Vec<u64>,

    /// Append the Merkle root of the values
    #[arg(short, long)]
    merkle: bool,

    /// Largest accepted raw value (default 4294967295)
    #[arg(long)]
    bound: Option<u64>,

    /// Merkle hash primitive: poseidon or sha256
    #[arg(long)]
    hash: Option<HashKind>,

    /// JSON circuit profile, e.g. {"bound": 4294967295, "hash": "poseidon"}
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ProfileOverrides {
        ProfileOverrides {
            bound: self.bound.map(ValueBound::new),
            hash: self.hash,
        }
    }

    fn request(&self) -> WitnessConfig {
        WitnessConfig {
            raw_values: self.input.clone(),
            include_root: self.merkle,
        }
    }
}

fn build_serializer(args: &Args) -> Result<WitnessSerializer> {
    let mut layers = vec![ProfileOverrides::from_env()?];
    if let Some(path) = &args.config {
        layers.push(ProfileOverrides::from_file(path)?);
    }
    layers.push(args.overrides());
    Ok(WitnessSerializer::new(config::resolve(&layers)))
}

fn report(err: &WitnessError) {
    match err {
        WitnessError::OutOfRange {
            index,
            value,
            bound,
        } => eprintln!(
            "error: input value {} at index {} is out of range (maximum allowed is {})",
            value, index, bound
        ),
        WitnessError::EmptyInput => {
            eprintln!("error: a Merkle root was requested but the input was empty")
        }
        WitnessError::Hash(_) => eprintln!("error: {}", err),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let serializer = match build_serializer(&args) {
        Ok(serializer) => serializer,
        Err(err) => {
            eprintln!("error: {:#}", err);
            return ExitCode::FAILURE;
        }
    };

    let request = args.request();
    info!(
        count = request.raw_values.len(),
        merkle = request.include_root,
        bound = serializer.encoder().bound().max(),
        "serializing witness"
    );

    match serializer.serialize_config(&request) {
        Ok(stream) => {
            println!("{}", stream);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "witness serialization failed");
            report(&err);
            ExitCode::from(err.exit_code())
        }
    }
}
