use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use cockpit_core::{
    config::{Config, WarnLevel},
    registry::BUILTIN_RUN_TYPE_IDS,
};
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective portfolio policy and run type coverage
    Show,

    /// Validate the config for common mistakes
    Validate,
}

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    match subcmd {
        ConfigSubcommand::Show => show(&config, json),
        ConfigSubcommand::Validate => validate(&config, json),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(config: &Config, json: bool) -> anyhow::Result<()> {
    let registry = config.registry().context("invalid run_types in config")?;
    let mirror = registry.mirror_report(BUILTIN_RUN_TYPE_IDS.iter().copied());

    if json {
        let value = serde_json::json!({
            "project": config.project,
            "portfolio": config.portfolio,
            "run_types": registry.len(),
            "builtin_run_types": config.run_types.is_empty(),
            "mirror": mirror,
        });
        return print_json(&value);
    }

    let policy = &config.portfolio;
    println!("Project:              {}", config.project.name);
    println!("Max active projects:  {}", policy.max_active_projects);
    println!("Escalation window:    {} day(s)", policy.escalation_warn_days);
    println!(
        "Burnout thresholds:   sleep tolerance {:.1}h, work end cutoff {:.1}h",
        policy.burnout.sleep_tolerance_hours, policy.burnout.work_end_cutoff_hour
    );
    let source = if config.run_types.is_empty() {
        "built-in"
    } else {
        "config"
    };
    println!("Run types:            {} ({source})", registry.len());
    if !mirror.is_mirror() {
        for id in &mirror.missing {
            println!("  missing:  {id}");
        }
        for id in &mirror.orphaned {
            println!("  orphaned: {id}");
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(config: &Config, json: bool) -> anyhow::Result<()> {
    let warnings = config.validate();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}
