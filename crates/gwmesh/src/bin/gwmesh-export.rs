//! Runs the pipeline from a JSON options file and writes the scene as JSON.
//!
//! Without an output path the scene goes to stdout.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use gwmesh::{GwMeshError, Pipeline, PipelineOptions, Result};

/// Export groundwater-model mesh layers as renderer-ready JSON
#[derive(Parser, Debug)]
#[command(name = "gwmesh-export")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Builds render layers from a VTK snapshot", long_about = None)]
struct Args {
    /// Pipeline options file (JSON)
    options: PathBuf,

    /// Where to write the scene; stdout when omitted
    output: Option<PathBuf>,
}

fn run(options_path: &Path, output: Option<&Path>) -> Result<()> {
    let options = PipelineOptions::from_json_file(options_path)?;
    let scene = Pipeline::new(options).run()?;
    let json = scene.to_json_string_pretty()?;

    match output {
        Some(path) => {
            std::fs::write(path, json).map_err(|source| GwMeshError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            log::info!("wrote {} layers to {}", scene.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    gwmesh::init_logging();

    match run(&args.options, args.output.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error ({:?}): {err}", err.kind());
            ExitCode::FAILURE
        }
    }
}
