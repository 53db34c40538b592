use std::{error::Error, fs, path::Path};

use clap::Parser;
use log::info;
use triangulate_pipeline::{
    create_triangulator, ConfigBlock, Configurable, SceneInput, TriangulateLandmarks,
};

/// Landmark triangulation over a JSON scene.
#[derive(Debug, Parser)]
#[command(author, version, about = "Multi-view landmark triangulation")]
struct Args {
    /// Path to a JSON scene with `cameras`, `tracks` and `landmarks`.
    #[arg(long)]
    input: String,

    /// Optional JSON object of configuration entries for the algorithm.
    #[arg(long)]
    config: Option<String>,

    /// Triangulation implementation.
    #[arg(long, default_value = "multiview")]
    algorithm: String,

    /// Write the result here instead of stdout.
    #[arg(long)]
    output: Option<String>,

    /// Emit `{ landmarks, report }` instead of the landmarks alone.
    #[arg(long)]
    report: bool,
}

fn load_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Box<dyn Error>> {
    let data = fs::read_to_string(path)?;
    let value = serde_json::from_str(&data)?;
    Ok(value)
}

fn run_from_files(
    input_path: &str,
    config_path: Option<&str>,
    algorithm: &str,
    with_report: bool,
) -> Result<String, Box<dyn Error>> {
    let input = SceneInput::from_json_file(input_path)?;

    let mut algo = create_triangulator(algorithm)?;
    if let Some(cfg_path) = config_path {
        let block = ConfigBlock::from_json(load_json_file(Path::new(cfg_path))?)?;
        algo.set_configuration(&block)?;
    }

    let outcome = input.triangulate_with(algo.as_ref())?;
    info!(
        "{}: {} of {} landmarks triangulated",
        algo.impl_name(),
        outcome.report.triangulated,
        outcome.report.input_landmarks
    );

    let json = if with_report {
        serde_json::to_string_pretty(&outcome)?
    } else {
        serde_json::to_string_pretty(&outcome.landmarks)?
    };
    Ok(json)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = try_main() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let json = run_from_files(
        &args.input,
        args.config.as_deref(),
        &args.algorithm,
        args.report,
    )?;
    match args.output {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}
