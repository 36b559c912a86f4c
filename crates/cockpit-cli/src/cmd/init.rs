use anyhow::Context;
use cockpit_core::{config::Config, io, paths, snapshot::PortfolioSnapshot};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let project_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cockpit".to_string());

    println!("Initializing cockpit in: {}", root.display());

    let dir = paths::cockpit_dir(root);
    io::ensure_dir(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    if !paths::config_path(root).exists() {
        Config::new(&project_name)
            .save(root)
            .context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
    }

    if !paths::portfolio_path(root).exists() {
        PortfolioSnapshot::default()
            .save(root)
            .context("failed to write portfolio.yaml")?;
        println!("  created: {}", paths::PORTFOLIO_FILE);
    } else {
        println!("  exists:  {}", paths::PORTFOLIO_FILE);
    }

    tracing::info!(root = %root.display(), "cockpit initialized");
    Ok(())
}
