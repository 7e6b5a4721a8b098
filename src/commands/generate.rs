use anyhow::{Context, Result};
use chrono::Utc;
use icsgen_core::config::IcsgenConfig;
use icsgen_core::pipeline::{self, CatalogPaths};
use owo_colors::OwoColorize;

pub fn run(paths: &CatalogPaths, config: &IcsgenConfig) -> Result<()> {
    let summary = pipeline::run(paths, config, Utc::now())
        .with_context(|| format!("Failed to generate calendars for {}", paths.events.display()))?;

    for path in &summary.artifacts {
        println!("  {}", path.display().dimmed());
    }

    println!(
        "{}",
        format!(
            "Generated {} calendar files in {}",
            summary.artifacts.len(),
            config.output_dir.display()
        )
        .green()
    );

    Ok(())
}
