mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use icsgen_core::config::IcsgenConfig;
use icsgen_core::pipeline::CatalogPaths;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "icsgen")]
#[command(version, about = "Validate an event catalog and generate one .ics file per event")]
struct Cli {
    /// Events file (rewritten with the generated icsURL values)
    #[arg(long, default_value = "events.json")]
    events: PathBuf,

    /// Speaker index file
    #[arg(long, default_value = "speaker-index.json")]
    speakers: PathBuf,

    /// Categories file
    #[arg(long, default_value = "categories.json")]
    categories: PathBuf,

    /// Directory for the generated .ics files (overrides the config file)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Path to the TOML configuration file (defaults to ./icsgen.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only validate the catalog; write nothing
    #[arg(long)]
    check: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = CatalogPaths {
        events: cli.events,
        speakers: cli.speakers,
        categories: cli.categories,
    };

    if cli.check {
        return commands::check::run(&paths);
    }

    let mut config = IcsgenConfig::load(cli.config.as_deref())?;
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }

    commands::generate::run(&paths, &config)
}
