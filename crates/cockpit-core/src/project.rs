use crate::error::{CockpitError, Result};
use crate::types::{CheckpointLabel, CheckpointStatus, ProjectStatus};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Checkpoint
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub target_date: NaiveDate,
    pub status: CheckpointStatus,
}

impl Checkpoint {
    pub fn pending(target_date: NaiveDate) -> Self {
        Self {
            target_date,
            status: CheckpointStatus::Pending,
        }
    }
}

// ---------------------------------------------------------------------------
// Deadlines
// ---------------------------------------------------------------------------

/// The four fixed checkpoints every project carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadlines {
    pub d3: Checkpoint,
    pub d7: Checkpoint,
    pub d14: Checkpoint,
    pub d30: Checkpoint,
}

impl Deadlines {
    /// Checkpoints at 3, 7, 14 and 30 days after `start`. Fails when the
    /// last checkpoint would fall past the end of the calendar.
    pub fn from_start(start: NaiveDate) -> Result<Self> {
        let at = |label: CheckpointLabel| {
            start
                .checked_add_days(Days::new(label.days()))
                .map(Checkpoint::pending)
                .ok_or(CockpitError::StartDateOutOfRange(start))
        };
        Ok(Self {
            d3: at(CheckpointLabel::D3)?,
            d7: at(CheckpointLabel::D7)?,
            d14: at(CheckpointLabel::D14)?,
            d30: at(CheckpointLabel::D30)?,
        })
    }

    pub fn get(&self, label: CheckpointLabel) -> &Checkpoint {
        match label {
            CheckpointLabel::D3 => &self.d3,
            CheckpointLabel::D7 => &self.d7,
            CheckpointLabel::D14 => &self.d14,
            CheckpointLabel::D30 => &self.d30,
        }
    }

    pub fn get_mut(&mut self, label: CheckpointLabel) -> &mut Checkpoint {
        match label {
            CheckpointLabel::D3 => &mut self.d3,
            CheckpointLabel::D7 => &mut self.d7,
            CheckpointLabel::D14 => &mut self.d14,
            CheckpointLabel::D30 => &mut self.d30,
        }
    }

    /// Checkpoints in label order (d3, d7, d14, d30).
    pub fn iter(&self) -> impl Iterator<Item = (CheckpointLabel, &Checkpoint)> {
        CheckpointLabel::all().iter().map(move |&l| (l, self.get(l)))
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub status: ProjectStatus,
    #[serde(default)]
    pub is_cash_first: bool,
    pub deadlines: Deadlines,
}

impl Project {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        status: ProjectStatus,
        start: NaiveDate,
    ) -> Result<Self> {
        Ok(Self {
            id: id.into(),
            name: name.into(),
            status,
            is_cash_first: false,
            deadlines: Deadlines::from_start(start)?,
        })
    }

    pub fn cash_first(mut self) -> Self {
        self.is_cash_first = true;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == ProjectStatus::Active
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn deadlines_offset_from_start() {
        let d = Deadlines::from_start(date("2025-01-30")).unwrap();
        assert_eq!(d.d3.target_date, date("2025-02-02"));
        assert_eq!(d.d7.target_date, date("2025-02-06"));
        assert_eq!(d.d14.target_date, date("2025-02-13"));
        assert_eq!(d.d30.target_date, date("2025-03-01"));
        assert!(d.iter().all(|(_, c)| c.status == CheckpointStatus::Pending));
    }

    #[test]
    fn iter_is_in_label_order() {
        let d = Deadlines::from_start(date("2025-06-01")).unwrap();
        let labels: Vec<_> = d.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, CheckpointLabel::all().to_vec());
    }

    #[test]
    fn start_near_calendar_end_is_rejected() {
        let start = NaiveDate::MAX - Days::new(5);
        let err = Project::new("late", "Late", ProjectStatus::Active, start).unwrap_err();
        assert!(matches!(err, CockpitError::StartDateOutOfRange(d) if d == start));

        // d30 is the last checkpoint, so exactly 30 days of headroom is enough.
        let edge = NaiveDate::MAX - Days::new(30);
        let d = Deadlines::from_start(edge).unwrap();
        assert_eq!(d.d30.target_date, NaiveDate::MAX);
        assert!(Deadlines::from_start(edge + Days::new(1)).is_err());
    }

    #[test]
    fn project_yaml_roundtrip() {
        let p = Project::new("saas-billing", "SaaS billing", ProjectStatus::Active, date("2025-06-01"))
            .unwrap()
            .cash_first();
        let yaml = serde_yaml::to_string(&p).unwrap();
        assert!(yaml.contains("status: active"));
        assert!(yaml.contains("target_date: 2025-06-04"));
        let parsed: Project = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, p);
    }

    #[test]
    fn cash_first_defaults_to_false() {
        let yaml = r#"
id: p1
name: P1
status: paused
deadlines:
  d3: { target_date: 2025-01-04, status: done }
  d7: { target_date: 2025-01-08, status: at_risk }
  d14: { target_date: 2025-01-15, status: pending }
  d30: { target_date: 2025-01-31, status: scope_cut }
"#;
        let p: Project = serde_yaml::from_str(yaml).unwrap();
        assert!(!p.is_cash_first);
        assert_eq!(p.deadlines.get(CheckpointLabel::D7).status, CheckpointStatus::AtRisk);
    }
}
