//! Collider generation tool
//!
//! Loads a scene snapshot, runs the collider pipeline over it and writes the
//! result to a new snapshot.
//!
//! Usage: generate_colliders <input.ron|toml> <output.ron|toml> [config.toml|ron]
//!
//! Without a configuration file the garden defaults are used. `RUST_LOG`
//! overrides the configured log level.

use std::env;
use std::path::PathBuf;
use std::process;

use collider_forge::foundation::logging;
use collider_forge::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
enum AppError {
    #[error("Usage: {0} <input scene> <output scene> [pipeline config]")]
    Usage(String),

    #[error("Configuration or scene file error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scene is inconsistent: {0}")]
    Scene(#[from] SceneError),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),
}

struct Args {
    input: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
}

impl Args {
    fn parse() -> Result<Self, AppError> {
        let mut args = env::args();
        let program = args.next().unwrap_or_else(|| "generate_colliders".to_string());
        let rest: Vec<String> = args.collect();
        match rest.as_slice() {
            [input, output] => Ok(Self {
                input: input.into(),
                output: output.into(),
                config: None,
            }),
            [input, output, config] => Ok(Self {
                input: input.into(),
                output: output.into(),
                config: Some(config.into()),
            }),
            _ => Err(AppError::Usage(program)),
        }
    }
}

fn run(args: &Args) -> Result<PipelineReport, AppError> {
    let config = match &args.config {
        Some(path) => PipelineConfig::load_from_file(path)?,
        None => PipelineConfig::default(),
    };
    logging::init_with_level(&config.log_level);

    let pipeline = ColliderPipeline::new(config)?;

    log::info!("Loading scene from {}", args.input.display());
    let mut scene = Scene::from_file(&SceneFile::load_from_file(&args.input)?)?;

    let report = pipeline.run(&mut scene);
    for failure in report.failures() {
        log::warn!("{}: {}", failure.object, failure.error);
    }

    scene.to_file().save_to_file(&args.output)?;
    log::info!("Wrote {}", args.output.display());
    Ok(report)
}

fn main() {
    let result = Args::parse().and_then(|args| run(&args));
    match result {
        Ok(report) => {
            println!("{}", report);
        }
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}
