use crate::output::{print_json, print_table};
use anyhow::Context;
use chrono::NaiveDate;
use clap::Subcommand;
use cockpit_core::{
    config::Config,
    paths,
    portfolio::{deadline_escalation, PortfolioAction, PortfolioRuleEngine},
    project::Project,
    snapshot::PortfolioSnapshot,
    types::{CheckpointLabel, CheckpointStatus, ProjectStatus},
};
use std::path::Path;

#[derive(Subcommand)]
pub enum ProjectSubcommand {
    /// List tracked projects
    List,
    /// Show a project with its checkpoints
    Show { id: String },
    /// Start tracking a project
    Add {
        id: String,
        /// Display name
        #[arg(long)]
        name: String,
        /// Start date (YYYY-MM-DD); checkpoints fall 3/7/14/30 days after it [default: today]
        #[arg(long)]
        start: Option<String>,
        /// Create the project paused instead of active
        #[arg(long)]
        paused: bool,
        /// Make this the cash-first project
        #[arg(long)]
        cash_first: bool,
    },
    /// Change a project's status: active | paused | scope_cut | done
    Status { id: String, status: String },
    /// Make a project the single cash-first project
    CashFirst { id: String },
    /// Set a checkpoint status: pending | at_risk | done | scope_cut
    Deadline {
        id: String,
        /// Checkpoint: d3 | d7 | d14 | d30
        checkpoint: String,
        status: String,
    },
    /// Mark pending checkpoints that are overdue or due soon as at_risk
    Escalate {
        /// Reference date (YYYY-MM-DD) [default: today]
        #[arg(long)]
        today: Option<String>,
    },
}

pub fn run(root: &Path, subcmd: ProjectSubcommand, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let engine = PortfolioRuleEngine::new(config.portfolio.clone());
    let snapshot = PortfolioSnapshot::load(root).context("failed to load portfolio")?;

    match subcmd {
        ProjectSubcommand::List => list(&engine, &snapshot, json),
        ProjectSubcommand::Show { id } => show(&engine, &snapshot, &id, json),
        ProjectSubcommand::Add {
            id,
            name,
            start,
            paused,
            cash_first,
        } => {
            paths::validate_project_id(&id)?;
            let start = parse_date_or_today(start.as_deref())?;
            let status = if paused {
                ProjectStatus::Paused
            } else {
                ProjectStatus::Active
            };
            let mut project = Project::new(&id, name, status, start)?;
            project.is_cash_first = cash_first;
            commit(
                root,
                &engine,
                snapshot,
                PortfolioAction::AddProject { project },
                json,
            )?;
            if !json {
                println!("added project '{id}' ({status})");
            }
            Ok(())
        }
        ProjectSubcommand::Status { id, status } => {
            let status: ProjectStatus = status.parse()?;
            commit(
                root,
                &engine,
                snapshot,
                PortfolioAction::SetStatus {
                    id: id.clone(),
                    status,
                },
                json,
            )?;
            if !json {
                println!("project '{id}' is now {status}");
            }
            Ok(())
        }
        ProjectSubcommand::CashFirst { id } => {
            commit(
                root,
                &engine,
                snapshot,
                PortfolioAction::SetCashFirst { id: id.clone() },
                json,
            )?;
            if !json {
                println!("project '{id}' is now cash-first");
            }
            Ok(())
        }
        ProjectSubcommand::Deadline {
            id,
            checkpoint,
            status,
        } => {
            let checkpoint: CheckpointLabel = checkpoint.parse()?;
            let status: CheckpointStatus = status.parse()?;
            commit(
                root,
                &engine,
                snapshot,
                PortfolioAction::SetDeadlineStatus {
                    id: id.clone(),
                    checkpoint,
                    status,
                },
                json,
            )?;
            if !json {
                println!("project '{id}' checkpoint {checkpoint} is now {status}");
            }
            Ok(())
        }
        ProjectSubcommand::Escalate { today } => {
            let today = parse_date_or_today(today.as_deref())?;
            let before = snapshot.projects.clone();
            let after = commit(
                root,
                &engine,
                snapshot,
                PortfolioAction::EscalateDeadlines { today },
                json,
            )?;
            if !json {
                let changed = count_escalated(&before, &after);
                println!("{changed} checkpoint(s) escalated to at_risk");
            }
            Ok(())
        }
    }
}

/// Apply `action`, persist the new snapshot, and return its projects. A rule
/// violation aborts before anything is written.
fn commit(
    root: &Path,
    engine: &PortfolioRuleEngine,
    mut snapshot: PortfolioSnapshot,
    action: PortfolioAction,
    json: bool,
) -> anyhow::Result<Vec<Project>> {
    let projects = engine.apply(&snapshot.projects, action)?;
    snapshot.projects = projects.clone();
    snapshot.save(root).context("failed to write portfolio")?;
    if json {
        print_json(&projects)?;
    }
    Ok(projects)
}

fn count_escalated(before: &[Project], after: &[Project]) -> usize {
    before
        .iter()
        .zip(after)
        .flat_map(|(b, a)| b.deadlines.iter().zip(a.deadlines.iter()))
        .filter(|((_, b), (_, a))| b.status != a.status)
        .count()
}

fn parse_date_or_today(value: Option<&str>) -> anyhow::Result<NaiveDate> {
    match value {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{s}': expected YYYY-MM-DD")),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

// ---------------------------------------------------------------------------
// list / show
// ---------------------------------------------------------------------------

fn list(
    engine: &PortfolioRuleEngine,
    snapshot: &PortfolioSnapshot,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        return print_json(&snapshot.projects);
    }
    if snapshot.projects.is_empty() {
        println!("No projects. Run: cockpit project add <id> --name <name>");
        return Ok(());
    }
    print_table(
        &["ID", "STATUS", "CASH", "NAME"],
        snapshot
            .projects
            .iter()
            .map(|p| {
                vec![
                    p.id.clone(),
                    p.status.to_string(),
                    if p.is_cash_first { "*".to_string() } else { String::new() },
                    p.name.clone(),
                ]
            })
            .collect(),
    );
    println!();
    println!(
        "active: {}/{}",
        PortfolioRuleEngine::active_count(&snapshot.projects),
        engine.policy().max_active_projects
    );
    Ok(())
}

fn show(
    engine: &PortfolioRuleEngine,
    snapshot: &PortfolioSnapshot,
    id: &str,
    json: bool,
) -> anyhow::Result<()> {
    let project = snapshot
        .project(id)
        .with_context(|| format!("project '{id}' not found"))?;
    if json {
        return print_json(project);
    }
    let today = chrono::Local::now().date_naive();
    let warn_days = engine.policy().escalation_warn_days;

    println!("ID:         {}", project.id);
    println!("Name:       {}", project.name);
    println!("Status:     {}", project.status);
    println!("Cash-first: {}", if project.is_cash_first { "yes" } else { "no" });
    println!();
    print_table(
        &["CHECKPOINT", "DATE", "STATUS", "ESCALATION"],
        project
            .deadlines
            .iter()
            .map(|(label, c)| {
                vec![
                    label.to_string(),
                    c.target_date.to_string(),
                    c.status.to_string(),
                    deadline_escalation(c, today, warn_days).to_string(),
                ]
            })
            .collect(),
    );
    Ok(())
}
