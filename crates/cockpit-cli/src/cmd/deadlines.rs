use crate::output::{print_json, print_table};
use anyhow::Context;
use cockpit_core::{
    config::Config,
    portfolio::{deadline_escalation, PortfolioRuleEngine},
    snapshot::PortfolioSnapshot,
};
use std::path::Path;

pub fn run(root: &Path, limit: usize, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let snapshot = PortfolioSnapshot::load(root).context("failed to load portfolio")?;
    let engine = PortfolioRuleEngine::new(config.portfolio);

    let upcoming = engine.next_deadlines(&snapshot.projects, limit);
    if json {
        return print_json(&upcoming);
    }
    if upcoming.is_empty() {
        println!("No open checkpoints on active projects.");
        return Ok(());
    }

    let today = chrono::Local::now().date_naive();
    let warn_days = engine.policy().escalation_warn_days;
    print_table(
        &["DATE", "PROJECT", "CHECKPOINT", "STATUS", "ESCALATION"],
        upcoming
            .iter()
            .map(|d| {
                let checkpoint = cockpit_core::project::Checkpoint {
                    target_date: d.target_date,
                    status: d.status,
                };
                vec![
                    d.target_date.to_string(),
                    d.project_name.clone(),
                    d.label.to_string(),
                    d.status.to_string(),
                    deadline_escalation(&checkpoint, today, warn_days).to_string(),
                ]
            })
            .collect(),
    );
    Ok(())
}
