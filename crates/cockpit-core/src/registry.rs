//! The closed set of run types the cockpit knows how to dispatch.
//!
//! A [`RunTypeRegistry`] is built once at startup (from the config file or
//! from [`RunTypeRegistry::builtin`]) and handed to the policy engine by
//! reference. It never changes afterwards.

use crate::error::{CockpitError, Result};
use crate::paths;
use crate::schedule;
use crate::types::RiskLevel;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

// ---------------------------------------------------------------------------
// RunTypeDefinition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunTypeDefinition {
    pub id: String,
    pub title: String,
    pub risk_level: RiskLevel,
    pub steps: Vec<String>,
    /// Five-field CRON expression for timer-driven runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
}

impl RunTypeDefinition {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        risk_level: RiskLevel,
        steps: &[&str],
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            risk_level,
            steps: steps.iter().map(|s| s.to_string()).collect(),
            schedule: None,
        }
    }

    pub fn with_schedule(mut self, cron: impl Into<String>) -> Self {
        self.schedule = Some(cron.into());
        self
    }

    pub fn schedule_label(&self) -> Option<String> {
        self.schedule.as_deref().map(schedule::describe_cron)
    }
}

// ---------------------------------------------------------------------------
// Built-in run types
// ---------------------------------------------------------------------------

/// Canonical ids the surrounding application dispatches.
pub const BUILTIN_RUN_TYPE_IDS: &[&str] = &[
    "DAILY_EXECUTIVE_BRIEF",
    "WEEKLY_PORTFOLIO_REVIEW",
    "KPI_SNAPSHOT",
    "GITHUB_STATS_SYNC",
    "MONTHLY_CLOSE_REPORT",
    "MARKETING_CONTENT_DRAFT",
    "CUSTOMER_FOLLOWUP_BATCH",
    "RELEASE_GATE_CHECK",
    "PRICING_UPDATE",
    "DEPLOY_TO_PRODUCTION",
    "DATABASE_MIGRATION",
];

pub fn builtin_definitions() -> Vec<RunTypeDefinition> {
    use RiskLevel::*;
    vec![
        RunTypeDefinition::new(
            "DAILY_EXECUTIVE_BRIEF",
            "Daily executive brief",
            Low,
            &["collect_kpis", "summarize", "publish"],
        )
        .with_schedule("0 8 * * 1-5"),
        RunTypeDefinition::new(
            "WEEKLY_PORTFOLIO_REVIEW",
            "Weekly portfolio review",
            Low,
            &["load_projects", "score_deadlines", "draft_review"],
        )
        .with_schedule("0 9 * * 1"),
        RunTypeDefinition::new(
            "KPI_SNAPSHOT",
            "KPI snapshot",
            Low,
            &["fetch_revenue", "fetch_usage", "store_snapshot"],
        )
        .with_schedule("0 */6 * * *"),
        RunTypeDefinition::new(
            "GITHUB_STATS_SYNC",
            "GitHub stats sync",
            Low,
            &["fetch_repositories", "aggregate", "store_snapshot"],
        )
        .with_schedule("*/30 * * * *"),
        RunTypeDefinition::new(
            "MONTHLY_CLOSE_REPORT",
            "Monthly close report",
            Low,
            &["reconcile", "build_report", "publish"],
        )
        .with_schedule("0 6 1 * *"),
        RunTypeDefinition::new(
            "MARKETING_CONTENT_DRAFT",
            "Marketing content draft",
            Medium,
            &["gather_brief", "draft", "queue_for_review"],
        ),
        RunTypeDefinition::new(
            "CUSTOMER_FOLLOWUP_BATCH",
            "Customer follow-up batch",
            Medium,
            &["select_customers", "render_messages", "send"],
        ),
        RunTypeDefinition::new(
            "RELEASE_GATE_CHECK",
            "Release gate check",
            High,
            &["run_checks", "collect_signoffs", "record_verdict"],
        ),
        RunTypeDefinition::new(
            "PRICING_UPDATE",
            "Pricing update",
            High,
            &["prepare_price_table", "diff_against_live", "apply"],
        ),
        RunTypeDefinition::new(
            "DEPLOY_TO_PRODUCTION",
            "Deploy to production",
            Critical,
            &["build", "release_gate", "deploy", "verify"],
        ),
        RunTypeDefinition::new(
            "DATABASE_MIGRATION",
            "Database migration",
            Critical,
            &["backup", "migrate", "verify"],
        ),
    ]
}

// ---------------------------------------------------------------------------
// MirrorReport
// ---------------------------------------------------------------------------

/// Drift between a registry and a canonical id list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MirrorReport {
    /// Canonical ids with no definition.
    pub missing: Vec<String>,
    /// Defined ids the canonical list does not know.
    pub orphaned: Vec<String>,
}

impl MirrorReport {
    pub fn is_mirror(&self) -> bool {
        self.missing.is_empty() && self.orphaned.is_empty()
    }
}

// ---------------------------------------------------------------------------
// RunTypeRegistry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RunTypeRegistry {
    definitions: Vec<RunTypeDefinition>,
    index: HashMap<String, usize>,
}

impl RunTypeRegistry {
    /// Build a registry, rejecting malformed ids, duplicates and empty step lists.
    pub fn from_definitions(definitions: Vec<RunTypeDefinition>) -> Result<Self> {
        let mut index = HashMap::with_capacity(definitions.len());
        for (i, def) in definitions.iter().enumerate() {
            paths::validate_run_type_id(&def.id)?;
            if def.steps.is_empty() {
                return Err(CockpitError::EmptySteps(def.id.clone()));
            }
            if index.insert(def.id.clone(), i).is_some() {
                return Err(CockpitError::DuplicateRunType(def.id.clone()));
            }
        }
        tracing::debug!(run_types = definitions.len(), "run type registry loaded");
        Ok(Self { definitions, index })
    }

    pub fn builtin() -> Self {
        let definitions = builtin_definitions();
        let index = definitions
            .iter()
            .enumerate()
            .map(|(i, d)| (d.id.clone(), i))
            .collect();
        Self { definitions, index }
    }

    pub fn get(&self, id: &str) -> Option<&RunTypeDefinition> {
        self.index.get(id).map(|&i| &self.definitions[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Definitions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &RunTypeDefinition> {
        self.definitions.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Compare the registry against `canonical`, in both directions.
    pub fn mirror_report<'a>(&self, canonical: impl IntoIterator<Item = &'a str>) -> MirrorReport {
        let canonical: BTreeSet<&str> = canonical.into_iter().collect();
        let defined: BTreeSet<&str> = self.ids().collect();
        MirrorReport {
            missing: canonical
                .difference(&defined)
                .map(|s| s.to_string())
                .collect(),
            orphaned: defined
                .difference(&canonical)
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Default for RunTypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
