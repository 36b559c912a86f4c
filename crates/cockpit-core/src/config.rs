use crate::error::{CockpitError, Result};
use crate::paths;
use crate::portfolio::PortfolioPolicy;
use crate::registry::{RunTypeDefinition, RunTypeRegistry, BUILTIN_RUN_TYPE_IDS};
use crate::schedule;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

impl ConfigWarning {
    fn warning(message: String) -> Self {
        Self {
            level: WarnLevel::Warning,
            message,
        }
    }

    fn error(message: String) -> Self {
        Self {
            level: WarnLevel::Error,
            message,
        }
    }
}

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: ProjectConfig,
    /// Custom run-type registry. Empty means the built-in set.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub run_types: Vec<RunTypeDefinition>,
    #[serde(default)]
    pub portfolio: PortfolioPolicy,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            project: ProjectConfig {
                name: project_name.into(),
                description: None,
            },
            run_types: Vec::new(),
            portfolio: PortfolioPolicy::default(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(CockpitError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// The registry the policy engine should run against.
    pub fn registry(&self) -> Result<RunTypeRegistry> {
        if self.run_types.is_empty() {
            return Ok(RunTypeRegistry::builtin());
        }
        RunTypeRegistry::from_definitions(self.run_types.clone())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        // 1. Portfolio ceiling
        if self.portfolio.max_active_projects == 0 {
            warnings.push(ConfigWarning::error(
                "portfolio.max_active_projects is 0: no project can ever be active".to_string(),
            ));
        }

        // 2. Burnout thresholds outside a day
        let cutoff = self.portfolio.burnout.work_end_cutoff_hour;
        if !(0.0..=24.0).contains(&cutoff) {
            warnings.push(ConfigWarning::warning(format!(
                "portfolio.burnout.work_end_cutoff_hour={cutoff} is outside 0-24"
            )));
        }
        let tolerance = self.portfolio.burnout.sleep_tolerance_hours;
        if tolerance < 0.0 || tolerance.is_nan() {
            warnings.push(ConfigWarning::warning(format!(
                "portfolio.burnout.sleep_tolerance_hours={tolerance} must be 0 or more"
            )));
        }

        if self.run_types.is_empty() {
            return warnings;
        }

        // 3. Per-definition checks
        let mut seen = HashSet::new();
        for def in &self.run_types {
            if paths::validate_run_type_id(&def.id).is_err() {
                warnings.push(ConfigWarning::error(format!(
                    "run type '{}' is not an uppercase token",
                    def.id
                )));
            }
            if !seen.insert(def.id.as_str()) {
                warnings.push(ConfigWarning::error(format!(
                    "run type '{}' is declared more than once",
                    def.id
                )));
            }
            if def.steps.is_empty() {
                warnings.push(ConfigWarning::error(format!(
                    "run type '{}' has no steps",
                    def.id
                )));
            }
            if def.title.trim().is_empty() {
                warnings.push(ConfigWarning::warning(format!(
                    "run type '{}' has no title; the id will be shown instead",
                    def.id
                )));
            }
            if let Some(cron) = &def.schedule {
                if schedule::describe_cron(cron) == cron.trim() {
                    warnings.push(ConfigWarning::warning(format!(
                        "run type '{}' has a schedule '{}' that cannot be described",
                        def.id, cron
                    )));
                }
            }
        }

        // 4. Drift against the ids the application dispatches
        let declared: HashSet<&str> = self.run_types.iter().map(|d| d.id.as_str()).collect();
        for id in BUILTIN_RUN_TYPE_IDS {
            if !declared.contains(id) {
                warnings.push(ConfigWarning::warning(format!(
                    "run type '{id}' is dispatched by the cockpit but missing from run_types; it will require approval"
                )));
            }
        }
        for def in &self.run_types {
            if !BUILTIN_RUN_TYPE_IDS.contains(&def.id.as_str()) {
                warnings.push(ConfigWarning::warning(format!(
                    "run type '{}' is not dispatched by the cockpit",
                    def.id
                )));
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
