use crate::types::ProjectStatus;
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CockpitError {
    #[error("not initialized: run 'cockpit init'")]
    NotInitialized,

    #[error("run type not found: {0}")]
    RunTypeNotFound(String),

    #[error("duplicate run type: {0}")]
    DuplicateRunType(String),

    #[error("run type '{0}' has no steps")]
    EmptySteps(String),

    #[error("invalid run type id '{0}': must be uppercase alphanumeric with underscores")]
    InvalidRunTypeId(String),

    #[error("invalid project id '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidProjectId(String),

    #[error("invalid risk level: {0}")]
    InvalidRiskLevel(String),

    #[error("invalid project status: {0}")]
    InvalidStatus(String),

    #[error("invalid checkpoint: {0}")]
    InvalidCheckpoint(String),

    #[error("invalid requester '{0}': must be human or automation")]
    InvalidRequester(String),

    #[error("start date {0} leaves no room for the 30-day checkpoint")]
    StartDateOutOfRange(NaiveDate),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CockpitError>;

// ---------------------------------------------------------------------------
// RuleViolation
// ---------------------------------------------------------------------------

/// A portfolio invariant the requested change would break. The snapshot the
/// caller passed in is left untouched whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleViolation {
    #[error("cannot activate '{project}': {active} of {limit} active slots already used")]
    WipLimitExceeded {
        project: String,
        active: usize,
        limit: usize,
    },

    #[error("project '{project}' is {from}; no transition to {to} is allowed")]
    TerminalStateTransition {
        project: String,
        from: ProjectStatus,
        to: ProjectStatus,
    },

    #[error("project '{project}' cannot move from {from} to {to}")]
    InvalidTransition {
        project: String,
        from: ProjectStatus,
        to: ProjectStatus,
    },

    #[error("project not found: {project}")]
    ProjectNotFound { project: String },

    #[error("project already exists: {project}")]
    DuplicateProject { project: String },

    #[error("project '{project}' is {status}; its checkpoints can no longer change")]
    ProjectClosed {
        project: String,
        status: ProjectStatus,
    },
}

impl RuleViolation {
    /// The project the violation refers to.
    pub fn project(&self) -> &str {
        match self {
            RuleViolation::WipLimitExceeded { project, .. }
            | RuleViolation::TerminalStateTransition { project, .. }
            | RuleViolation::InvalidTransition { project, .. }
            | RuleViolation::ProjectNotFound { project }
            | RuleViolation::DuplicateProject { project }
            | RuleViolation::ProjectClosed { project, .. } => project,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wip_violation_message_names_project_and_limit() {
        let v = RuleViolation::WipLimitExceeded {
            project: "p4".to_string(),
            active: 3,
            limit: 3,
        };
        let msg = v.to_string();
        assert!(msg.contains("p4"));
        assert!(msg.contains("3 of 3"));
        assert_eq!(v.project(), "p4");
    }

    #[test]
    fn violation_json_is_tagged() {
        let v = RuleViolation::TerminalStateTransition {
            project: "p1".to_string(),
            from: ProjectStatus::Done,
            to: ProjectStatus::Active,
        };
        let json = serde_json::to_string(&v).unwrap();
        assert!(json.contains("\"kind\":\"terminal_state_transition\""));
        assert!(json.contains("\"from\":\"done\""));
    }
}
