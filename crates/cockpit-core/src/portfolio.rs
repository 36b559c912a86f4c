//! Portfolio rules: WIP ceiling, the single cash-first project, the project
//! status graph and deadline escalation.
//!
//! Every operation takes the caller's snapshot by reference and returns a
//! fresh `Vec<Project>` (or a [`RuleViolation`]). Nothing here holds state
//! between calls or reads the clock; "today" is always passed in.

use crate::burnout::{BurnoutMetrics, BurnoutThresholds};
use crate::error::RuleViolation;
use crate::project::{Checkpoint, Project};
use crate::types::{CheckpointLabel, CheckpointStatus, ProjectStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_ACTIVE_PROJECTS: usize = 3;

pub type Outcome = std::result::Result<Vec<Project>, RuleViolation>;

// ---------------------------------------------------------------------------
// PortfolioPolicy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioPolicy {
    #[serde(default = "default_max_active")]
    pub max_active_projects: usize,
    /// Pending checkpoints due within this many days are escalated.
    #[serde(default = "default_warn_days")]
    pub escalation_warn_days: u32,
    #[serde(default)]
    pub burnout: BurnoutThresholds,
}

fn default_max_active() -> usize {
    MAX_ACTIVE_PROJECTS
}

fn default_warn_days() -> u32 {
    2
}

impl Default for PortfolioPolicy {
    fn default() -> Self {
        Self {
            max_active_projects: default_max_active(),
            escalation_warn_days: default_warn_days(),
            burnout: BurnoutThresholds::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Deadline views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingDeadline {
    pub project_id: String,
    pub project_name: String,
    pub label: CheckpointLabel,
    pub target_date: NaiveDate,
    pub status: CheckpointStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Escalation {
    OnTrack,
    DueSoon,
    Overdue,
    Closed,
}

impl fmt::Display for Escalation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Escalation::OnTrack => "on_track",
            Escalation::DueSoon => "due_soon",
            Escalation::Overdue => "overdue",
            Escalation::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Where a checkpoint stands relative to `today`.
pub fn deadline_escalation(checkpoint: &Checkpoint, today: NaiveDate, warn_days: u32) -> Escalation {
    if checkpoint.status.is_closed() {
        return Escalation::Closed;
    }
    let remaining = (checkpoint.target_date - today).num_days();
    if remaining < 0 {
        Escalation::Overdue
    } else if remaining <= i64::from(warn_days) {
        Escalation::DueSoon
    } else {
        Escalation::OnTrack
    }
}

// ---------------------------------------------------------------------------
// PortfolioAction
// ---------------------------------------------------------------------------

/// Every mutation the UI can request, for callers that prefer a single
/// `(snapshot, action) -> snapshot` reducer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PortfolioAction {
    AddProject {
        project: Project,
    },
    SetStatus {
        id: String,
        status: ProjectStatus,
    },
    SetCashFirst {
        id: String,
    },
    SetDeadlineStatus {
        id: String,
        checkpoint: CheckpointLabel,
        status: CheckpointStatus,
    },
    EscalateDeadlines {
        today: NaiveDate,
    },
}

// ---------------------------------------------------------------------------
// PortfolioRuleEngine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct PortfolioRuleEngine {
    policy: PortfolioPolicy,
}

impl PortfolioRuleEngine {
    pub fn new(policy: PortfolioPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PortfolioPolicy {
        &self.policy
    }

    pub fn active_count(projects: &[Project]) -> usize {
        projects.iter().filter(|p| p.is_active()).count()
    }

    /// True when `set_status(.., Active)` would succeed: the candidate is
    /// paused and a slot is free. Terminal projects never qualify.
    pub fn can_activate(&self, projects: &[Project], candidate_id: &str) -> bool {
        let Some(candidate) = projects.iter().find(|p| p.id == candidate_id) else {
            return false;
        };
        candidate.status.can_transition_to(ProjectStatus::Active)
            && Self::active_count(projects) < self.policy.max_active_projects
    }

    pub fn set_status(&self, projects: &[Project], id: &str, new_status: ProjectStatus) -> Outcome {
        let idx = position(projects, id)?;
        let current = projects[idx].status;

        if current.is_terminal() {
            return Err(violation(RuleViolation::TerminalStateTransition {
                project: id.to_string(),
                from: current,
                to: new_status,
            }));
        }
        if current == new_status {
            return Ok(projects.to_vec());
        }
        if !current.can_transition_to(new_status) {
            return Err(violation(RuleViolation::InvalidTransition {
                project: id.to_string(),
                from: current,
                to: new_status,
            }));
        }
        if new_status == ProjectStatus::Active {
            self.check_wip(projects, id)?;
        }

        let mut next = projects.to_vec();
        next[idx].status = new_status;
        tracing::debug!(project = id, from = %current, to = %new_status, "project status changed");
        Ok(next)
    }

    /// Flag `id` as the cash-first project and clear the flag everywhere else
    /// in the same step.
    pub fn set_cash_first(&self, projects: &[Project], id: &str) -> Outcome {
        position(projects, id)?;
        Ok(projects
            .iter()
            .map(|p| Project {
                is_cash_first: p.id == id,
                ..p.clone()
            })
            .collect())
    }

    /// Open checkpoints of active projects, earliest first, at most `limit`.
    /// Ties keep portfolio order, then d3 < d7 < d14 < d30.
    pub fn next_deadlines(&self, projects: &[Project], limit: usize) -> Vec<UpcomingDeadline> {
        let mut upcoming: Vec<UpcomingDeadline> = projects
            .iter()
            .filter(|p| p.is_active())
            .flat_map(|p| {
                p.deadlines
                    .iter()
                    .filter(|(_, c)| !c.status.is_closed())
                    .map(move |(label, c)| UpcomingDeadline {
                        project_id: p.id.clone(),
                        project_name: p.name.clone(),
                        label,
                        target_date: c.target_date,
                        status: c.status,
                    })
            })
            .collect();
        upcoming.sort_by_key(|d| d.target_date);
        upcoming.truncate(limit);
        upcoming
    }

    pub fn compute_burnout_red_flag(&self, metrics: &BurnoutMetrics) -> bool {
        self.policy.burnout.red_flag(metrics)
    }

    pub fn add_project(&self, projects: &[Project], project: Project) -> Outcome {
        if projects.iter().any(|p| p.id == project.id) {
            return Err(violation(RuleViolation::DuplicateProject {
                project: project.id,
            }));
        }
        if project.is_active() {
            self.check_wip(projects, &project.id)?;
        }
        let mut next: Vec<Project> = if project.is_cash_first {
            projects
                .iter()
                .map(|p| Project {
                    is_cash_first: false,
                    ..p.clone()
                })
                .collect()
        } else {
            projects.to_vec()
        };
        next.push(project);
        Ok(next)
    }

    pub fn set_deadline_status(
        &self,
        projects: &[Project],
        id: &str,
        checkpoint: CheckpointLabel,
        status: CheckpointStatus,
    ) -> Outcome {
        let idx = position(projects, id)?;
        let current = projects[idx].status;
        if current.is_terminal() {
            return Err(violation(RuleViolation::ProjectClosed {
                project: id.to_string(),
                status: current,
            }));
        }
        let mut next = projects.to_vec();
        next[idx].deadlines.get_mut(checkpoint).status = status;
        Ok(next)
    }

    /// Mark pending checkpoints of active projects `at_risk` once they are
    /// overdue or inside the warning window.
    pub fn escalate_deadlines(&self, projects: &[Project], today: NaiveDate) -> Vec<Project> {
        let warn_days = self.policy.escalation_warn_days;
        let mut next = projects.to_vec();
        for project in next.iter_mut().filter(|p| p.is_active()) {
            for &label in CheckpointLabel::all() {
                let checkpoint = project.deadlines.get_mut(label);
                if checkpoint.status != CheckpointStatus::Pending {
                    continue;
                }
                if matches!(
                    deadline_escalation(checkpoint, today, warn_days),
                    Escalation::DueSoon | Escalation::Overdue
                ) {
                    checkpoint.status = CheckpointStatus::AtRisk;
                    tracing::debug!(project = %project.id, checkpoint = %label, "checkpoint at risk");
                }
            }
        }
        next
    }

    pub fn apply(&self, projects: &[Project], action: PortfolioAction) -> Outcome {
        match action {
            PortfolioAction::AddProject { project } => self.add_project(projects, project),
            PortfolioAction::SetStatus { id, status } => self.set_status(projects, &id, status),
            PortfolioAction::SetCashFirst { id } => self.set_cash_first(projects, &id),
            PortfolioAction::SetDeadlineStatus {
                id,
                checkpoint,
                status,
            } => self.set_deadline_status(projects, &id, checkpoint, status),
            PortfolioAction::EscalateDeadlines { today } => {
                Ok(self.escalate_deadlines(projects, today))
            }
        }
    }

    fn check_wip(&self, projects: &[Project], id: &str) -> Result<(), RuleViolation> {
        let active = Self::active_count(projects);
        let limit = self.policy.max_active_projects;
        if active >= limit {
            return Err(violation(RuleViolation::WipLimitExceeded {
                project: id.to_string(),
                active,
                limit,
            }));
        }
        Ok(())
    }
}

fn position(projects: &[Project], id: &str) -> Result<usize, RuleViolation> {
    projects.iter().position(|p| p.id == id).ok_or_else(|| {
        violation(RuleViolation::ProjectNotFound {
            project: id.to_string(),
        })
    })
}

fn violation(v: RuleViolation) -> RuleViolation {
    tracing::debug!(project = v.project(), "rule violation: {v}");
    v
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
