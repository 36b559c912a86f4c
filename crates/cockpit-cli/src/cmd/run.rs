use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use cockpit_core::{
    config::Config,
    registry::RunTypeRegistry,
    run_policy::{RunPolicyEngine, RunRequest, RunVerdict},
    types::{Requester, RiskLevel},
};
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand tree
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum RunSubcommand {
    /// List every registered run type
    List,

    /// Show the definition of a run type (fails for unknown ids)
    Classify { id: String },

    /// Show the approval and autopilot gates for a run type
    Check {
        id: String,
        /// Risk level to use instead of the registered one: low | medium | high | critical
        #[arg(long)]
        risk: Option<String>,
        /// Evaluate as if autopilot were enabled
        #[arg(long)]
        autopilot: bool,
    },

    /// Decide whether a run request may be dispatched
    Evaluate {
        id: String,
        /// Who is asking: human | automation
        #[arg(long = "by", default_value = "human")]
        requested_by: String,
        /// Autopilot is currently enabled
        #[arg(long)]
        autopilot: bool,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcommand: RunSubcommand, json: bool) -> anyhow::Result<()> {
    let registry = load_registry(root)?;
    let engine = RunPolicyEngine::new(&registry);

    match subcommand {
        RunSubcommand::List => list(&engine, json),
        RunSubcommand::Classify { id } => classify(&engine, &id, json),
        RunSubcommand::Check {
            id,
            risk,
            autopilot,
        } => check(&engine, &id, risk.as_deref(), autopilot, json),
        RunSubcommand::Evaluate {
            id,
            requested_by,
            autopilot,
        } => evaluate(&engine, id, &requested_by, autopilot, json),
    }
}

fn load_registry(root: &Path) -> anyhow::Result<RunTypeRegistry> {
    let config = Config::load(root).context("failed to load config")?;
    config.registry().context("invalid run_types in config")
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

fn list(engine: &RunPolicyEngine, json: bool) -> anyhow::Result<()> {
    let registry = engine.registry();
    if json {
        let defs: Vec<_> = registry.iter().collect();
        return print_json(&defs);
    }
    print_table(
        &["ID", "RISK", "TITLE", "SCHEDULE"],
        registry
            .iter()
            .map(|d| {
                vec![
                    d.id.clone(),
                    d.risk_level.to_string(),
                    d.title.clone(),
                    d.schedule_label().unwrap_or_else(|| "-".to_string()),
                ]
            })
            .collect(),
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// classify
// ---------------------------------------------------------------------------

fn classify(engine: &RunPolicyEngine, id: &str, json: bool) -> anyhow::Result<()> {
    let def = engine.classify(id)?;
    if json {
        let value = serde_json::json!({
            "definition": def,
            "presentation": def.risk_level.presentation(),
            "schedule_label": def.schedule_label(),
        });
        return print_json(&value);
    }
    println!("ID:       {}", def.id);
    println!("Title:    {}", def.title);
    println!("Risk:     {} ({})", def.risk_level, def.risk_level.badge());
    println!("Steps:    {}", def.steps.join(" -> "));
    if let Some(label) = def.schedule_label() {
        println!("Schedule: {label}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

fn check(
    engine: &RunPolicyEngine,
    id: &str,
    risk: Option<&str>,
    autopilot: bool,
    json: bool,
) -> anyhow::Result<()> {
    let override_risk = risk.map(str::parse::<RiskLevel>).transpose()?;
    let requires_approval = engine.should_require_approval(id, override_risk);
    let can_auto_execute = engine.can_auto_execute(id, autopilot);
    let known = engine.registry().contains(id);

    if json {
        let value = serde_json::json!({
            "run_type_id": id,
            "title": engine.format_run_type(id),
            "known": known,
            "requires_approval": requires_approval,
            "can_auto_execute": can_auto_execute,
        });
        return print_json(&value);
    }
    println!("Run type:          {}", engine.format_run_type(id));
    if !known {
        println!("Registered:        no (fails closed)");
    }
    println!("Requires approval: {}", yes_no(requires_approval));
    println!("Can auto-execute:  {}", yes_no(can_auto_execute));
    Ok(())
}

// ---------------------------------------------------------------------------
// evaluate
// ---------------------------------------------------------------------------

fn evaluate(
    engine: &RunPolicyEngine,
    id: String,
    requested_by: &str,
    autopilot: bool,
    json: bool,
) -> anyhow::Result<()> {
    let requested_by: Requester = requested_by.parse()?;
    let request = RunRequest {
        run_type_id: id,
        requested_by,
        autopilot_enabled: autopilot,
    };
    let decision = engine.evaluate(&request);
    tracing::info!(
        run_type = %decision.run_type_id,
        verdict = %decision.verdict,
        "run request evaluated"
    );

    if json {
        return print_json(&decision);
    }
    println!("Run type: {}", decision.title);
    if let Some(risk) = decision.risk_level {
        println!("Risk:     {risk}");
    }
    let verdict = match decision.verdict {
        RunVerdict::AutoApprove => "auto-approve",
        RunVerdict::RequireApproval => "require approval",
        RunVerdict::Block => "block",
    };
    println!("Verdict:  {verdict}");
    println!("Reason:   {}", decision.reason);
    Ok(())
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}
