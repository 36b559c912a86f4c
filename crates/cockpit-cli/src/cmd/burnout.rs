use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use cockpit_core::{
    burnout::BurnoutMetrics, config::Config, portfolio::PortfolioRuleEngine,
    snapshot::PortfolioSnapshot,
};
use std::path::Path;

#[derive(Subcommand)]
pub enum BurnoutSubcommand {
    /// Show the latest metrics and whether they raise a red flag
    Show,
    /// Record today's metrics (replaces the previous entry)
    Log {
        /// Hour work ended, e.g. 19.5 for 19:30
        #[arg(long)]
        work_end: f64,
        /// Hours slept
        #[arg(long)]
        sleep: f64,
        /// Target hours of sleep
        #[arg(long, default_value = "8")]
        target: f64,
    },
}

pub fn run(root: &Path, subcmd: BurnoutSubcommand, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let mut snapshot = PortfolioSnapshot::load(root).context("failed to load portfolio")?;
    let engine = PortfolioRuleEngine::new(config.portfolio);

    if let BurnoutSubcommand::Log {
        work_end,
        sleep,
        target,
    } = subcmd
    {
        snapshot.burnout = Some(BurnoutMetrics {
            work_end_hour: work_end,
            sleep_hours: sleep,
            sleep_target_hours: target,
        });
        snapshot.save(root).context("failed to write portfolio")?;
    }

    let Some(metrics) = snapshot.burnout else {
        if json {
            return print_json(&serde_json::Value::Null);
        }
        println!("No burnout metrics recorded. Run: cockpit burnout log --work-end <h> --sleep <h>");
        return Ok(());
    };

    let red_flag = engine.compute_burnout_red_flag(&metrics);
    let assessment = engine.policy().burnout.assess(&metrics);
    if red_flag {
        tracing::warn!(
            sleep_deficit = assessment.sleep_deficit,
            overwork = assessment.overwork,
            "burnout red flag"
        );
    }

    if json {
        let value = serde_json::json!({
            "metrics": metrics,
            "assessment": assessment,
        });
        return print_json(&value);
    }
    println!("Work ended:  {:.1}h", metrics.work_end_hour);
    println!(
        "Sleep:       {:.1}h (target {:.1}h)",
        metrics.sleep_hours, metrics.sleep_target_hours
    );
    println!(
        "Red flag:    {}",
        if red_flag { "YES" } else { "no" }
    );
    if assessment.sleep_deficit {
        println!("  sleep deficit of {:.1}h", assessment.sleep_deficit_hours);
    }
    if assessment.overwork {
        println!(
            "  work ended after {:.1}h",
            engine.policy().burnout.work_end_cutoff_hour
        );
    }
    Ok(())
}
