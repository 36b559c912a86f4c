//! On-disk portfolio snapshot (`.cockpit/portfolio.yaml`).
//!
//! The engines never see this file. The CLI loads a snapshot, hands the
//! projects to the engine, and writes back whatever the engine returns.

use crate::burnout::BurnoutMetrics;
use crate::error::Result;
use crate::io;
use crate::paths;
use crate::project::Project;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burnout: Option<BurnoutMetrics>,
}

impl PortfolioSnapshot {
    /// A missing or empty file is an empty portfolio.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::portfolio_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::portfolio_path(root);
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&path, data.as_bytes())
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }
}
