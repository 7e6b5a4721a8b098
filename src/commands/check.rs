use anyhow::Result;
use icsgen_core::pipeline::{Catalog, CatalogPaths};
use owo_colors::OwoColorize;

pub fn run(paths: &CatalogPaths) -> Result<()> {
    let catalog = Catalog::load(paths)?;

    println!(
        "{}",
        format!(
            "Catalog is valid: {} events, {} speakers, {} categories",
            catalog.events.len(),
            catalog.speakers.len(),
            catalog.categories.len()
        )
        .green()
    );

    Ok(())
}
