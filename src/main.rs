//! CLI entry point for clean-audio

use clap::Parser;
use clean_audio::config::{DEFAULT_OUTPUT_DIR, DEFAULT_PRESET};
use clean_audio::{Config, Error, Result, pipeline, utils};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Upload an audio file to Auphonic for processing and download the results
#[derive(Parser, Debug)]
#[command(name = "clean-audio", author, version)]
struct Args {
    /// Path to the audio file to process (supports a leading ~)
    file_path: String,

    /// Preset name to use
    #[arg(short, long, default_value = DEFAULT_PRESET)]
    preset: String,

    /// Output directory for processed files
    #[arg(short, long = "output-dir", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: String,
}

fn init_tracing() {
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_default();
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer())
        .init();
}

async fn run(args: Args) -> Result<()> {
    let config = Config::from_env()?;

    let input = utils::expand_tilde(&args.file_path);
    let output_dir = utils::expand_tilde(&args.output_dir);
    utils::validate_input_file(&input)?;
    utils::ensure_output_dir(&output_dir)?;

    let written = pipeline::run(&config, &input, &args.preset, &output_dir).await?;

    info!("processing completed successfully");
    if !written.is_empty() {
        println!("Downloaded files:");
        for path in &written {
            println!("- {}", path.display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    let args = Args::parse();

    if let Err(err) = run(args).await {
        // The preset listing goes to the operator verbatim, one name per
        // line, so they can pick an existing one.
        if let Error::PresetNotFound { name, available } = &err {
            eprintln!("Preset {name:?} not found. Available presets:");
            for preset_name in available {
                eprintln!("- {preset_name}");
            }
        }
        error!(error = %err, "run failed");
        std::process::exit(1);
    }
}
