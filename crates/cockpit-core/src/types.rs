use crate::error::CockpitError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// RiskLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// Display tokens the dashboard uses for a risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskPresentation {
    pub color: &'static str,
    pub badge: &'static str,
}

impl RiskLevel {
    pub fn all() -> &'static [RiskLevel] {
        &[
            RiskLevel::Low,
            RiskLevel::Medium,
            RiskLevel::High,
            RiskLevel::Critical,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    /// High and critical runs always wait for a human.
    pub fn requires_approval(self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Critical)
    }

    pub fn color(self) -> &'static str {
        match self {
            RiskLevel::Low => "green",
            RiskLevel::Medium => "amber",
            RiskLevel::High => "orange",
            RiskLevel::Critical => "red",
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            RiskLevel::Low => "secondary",
            RiskLevel::Medium => "outline",
            RiskLevel::High => "warning",
            RiskLevel::Critical => "destructive",
        }
    }

    pub fn presentation(self) -> RiskPresentation {
        RiskPresentation {
            color: self.color(),
            badge: self.badge(),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = CockpitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            "critical" => Ok(RiskLevel::Critical),
            _ => Err(CockpitError::InvalidRiskLevel(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Requester
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requester {
    Human,
    Automation,
}

impl fmt::Display for Requester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requester::Human => f.write_str("human"),
            Requester::Automation => f.write_str("automation"),
        }
    }
}

impl std::str::FromStr for Requester {
    type Err = CockpitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "human" => Ok(Requester::Human),
            "automation" => Ok(Requester::Automation),
            _ => Err(CockpitError::InvalidRequester(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ProjectStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Paused,
    ScopeCut,
    Done,
}

impl ProjectStatus {
    pub fn all() -> &'static [ProjectStatus] {
        &[
            ProjectStatus::Active,
            ProjectStatus::Paused,
            ProjectStatus::ScopeCut,
            ProjectStatus::Done,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Paused => "paused",
            ProjectStatus::ScopeCut => "scope_cut",
            ProjectStatus::Done => "done",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ProjectStatus::Done | ProjectStatus::ScopeCut)
    }

    /// Edges of the status graph. Same-status moves are not edges.
    pub fn can_transition_to(self, to: ProjectStatus) -> bool {
        use ProjectStatus::*;
        matches!(
            (self, to),
            (Active, Paused) | (Active, ScopeCut) | (Active, Done) | (Paused, Active) | (Paused, ScopeCut)
        )
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = CockpitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ProjectStatus::Active),
            "paused" => Ok(ProjectStatus::Paused),
            "scope_cut" | "scope-cut" => Ok(ProjectStatus::ScopeCut),
            "done" => Ok(ProjectStatus::Done),
            _ => Err(CockpitError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// CheckpointStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointStatus {
    Pending,
    AtRisk,
    Done,
    ScopeCut,
}

impl CheckpointStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckpointStatus::Pending => "pending",
            CheckpointStatus::AtRisk => "at_risk",
            CheckpointStatus::Done => "done",
            CheckpointStatus::ScopeCut => "scope_cut",
        }
    }

    /// Closed checkpoints no longer count toward upcoming deadlines.
    pub fn is_closed(self) -> bool {
        matches!(self, CheckpointStatus::Done | CheckpointStatus::ScopeCut)
    }
}

impl fmt::Display for CheckpointStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CheckpointStatus {
    type Err = CockpitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(CheckpointStatus::Pending),
            "at_risk" | "at-risk" => Ok(CheckpointStatus::AtRisk),
            "done" => Ok(CheckpointStatus::Done),
            "scope_cut" | "scope-cut" => Ok(CheckpointStatus::ScopeCut),
            _ => Err(CockpitError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// CheckpointLabel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointLabel {
    D3,
    D7,
    D14,
    D30,
}

impl CheckpointLabel {
    pub fn all() -> &'static [CheckpointLabel] {
        &[
            CheckpointLabel::D3,
            CheckpointLabel::D7,
            CheckpointLabel::D14,
            CheckpointLabel::D30,
        ]
    }

    /// Offset from the project start date.
    pub fn days(self) -> u64 {
        match self {
            CheckpointLabel::D3 => 3,
            CheckpointLabel::D7 => 7,
            CheckpointLabel::D14 => 14,
            CheckpointLabel::D30 => 30,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CheckpointLabel::D3 => "d3",
            CheckpointLabel::D7 => "d7",
            CheckpointLabel::D14 => "d14",
            CheckpointLabel::D30 => "d30",
        }
    }
}

impl fmt::Display for CheckpointLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CheckpointLabel {
    type Err = CockpitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "d3" => Ok(CheckpointLabel::D3),
            "d7" => Ok(CheckpointLabel::D7),
            "d14" => Ok(CheckpointLabel::D14),
            "d30" => Ok(CheckpointLabel::D30),
            _ => Err(CockpitError::InvalidCheckpoint(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::str::FromStr;

    #[test]
    fn risk_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }

    #[test]
    fn risk_roundtrip() {
        for level in RiskLevel::all() {
            assert_eq!(RiskLevel::from_str(level.as_str()).unwrap(), *level);
        }
        assert!(RiskLevel::from_str("extreme").is_err());
    }

    #[test]
    fn every_risk_level_has_distinct_presentation() {
        let colors: HashSet<_> = RiskLevel::all().iter().map(|r| r.color()).collect();
        let badges: HashSet<_> = RiskLevel::all().iter().map(|r| r.badge()).collect();
        assert_eq!(colors.len(), 4);
        assert_eq!(badges.len(), 4);
        assert_eq!(RiskLevel::Critical.presentation().color, "red");
    }

    #[test]
    fn approval_levels() {
        assert!(!RiskLevel::Low.requires_approval());
        assert!(!RiskLevel::Medium.requires_approval());
        assert!(RiskLevel::High.requires_approval());
        assert!(RiskLevel::Critical.requires_approval());
    }

    #[test]
    fn terminal_statuses_have_no_outgoing_edges() {
        for from in [ProjectStatus::Done, ProjectStatus::ScopeCut] {
            assert!(from.is_terminal());
            for to in ProjectStatus::all() {
                assert!(!from.can_transition_to(*to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn paused_cannot_jump_to_done() {
        assert!(ProjectStatus::Paused.can_transition_to(ProjectStatus::Active));
        assert!(ProjectStatus::Paused.can_transition_to(ProjectStatus::ScopeCut));
        assert!(!ProjectStatus::Paused.can_transition_to(ProjectStatus::Done));
    }

    #[test]
    fn status_parse_accepts_dashes() {
        assert_eq!(
            ProjectStatus::from_str("scope-cut").unwrap(),
            ProjectStatus::ScopeCut
        );
        assert_eq!(
            CheckpointStatus::from_str("at-risk").unwrap(),
            CheckpointStatus::AtRisk
        );
        assert_eq!(CheckpointLabel::from_str("D14").unwrap(), CheckpointLabel::D14);
    }

    #[test]
    fn checkpoint_offsets() {
        let days: Vec<u64> = CheckpointLabel::all().iter().map(|c| c.days()).collect();
        assert_eq!(days, vec![3, 7, 14, 30]);
    }
}
