use crate::error::{CockpitError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const COCKPIT_DIR: &str = ".cockpit";
pub const CONFIG_FILE: &str = ".cockpit/config.yaml";
pub const PORTFOLIO_FILE: &str = ".cockpit/portfolio.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn cockpit_dir(root: &Path) -> PathBuf {
    root.join(COCKPIT_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn portfolio_path(root: &Path) -> PathBuf {
    root.join(PORTFOLIO_FILE)
}

// ---------------------------------------------------------------------------
// Identifier validation
// ---------------------------------------------------------------------------

static PROJECT_ID_RE: OnceLock<Regex> = OnceLock::new();
static RUN_TYPE_ID_RE: OnceLock<Regex> = OnceLock::new();

fn project_id_re() -> &'static Regex {
    PROJECT_ID_RE
        .get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

fn run_type_id_re() -> &'static Regex {
    RUN_TYPE_ID_RE.get_or_init(|| Regex::new(r"^[A-Z][A-Z0-9_]*[A-Z0-9]$|^[A-Z]$").unwrap())
}

pub fn validate_project_id(id: &str) -> Result<()> {
    if id.is_empty() || id.len() > 64 || !project_id_re().is_match(id) {
        return Err(CockpitError::InvalidProjectId(id.to_string()));
    }
    Ok(())
}

pub fn validate_run_type_id(id: &str) -> Result<()> {
    if id.is_empty() || id.len() > 64 || !run_type_id_re().is_match(id) {
        return Err(CockpitError::InvalidRunTypeId(id.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_project_ids() {
        for id in ["saas-billing", "a", "launch-2025", "x1"] {
            validate_project_id(id).unwrap_or_else(|_| panic!("expected valid: {id}"));
        }
    }

    #[test]
    fn invalid_project_ids() {
        for id in ["", "-lead", "trail-", "has spaces", "UPPER", "a_b"] {
            assert!(validate_project_id(id).is_err(), "expected invalid: {id}");
        }
    }

    #[test]
    fn run_type_ids() {
        for id in ["DAILY_EXECUTIVE_BRIEF", "KPI_SNAPSHOT", "X", "DEPLOY2"] {
            validate_run_type_id(id).unwrap_or_else(|_| panic!("expected valid: {id}"));
        }
        for id in ["", "daily_brief", "_LEADING", "TRAILING_", "HAS SPACE", "9START"] {
            assert!(validate_run_type_id(id).is_err(), "expected invalid: {id}");
        }
    }

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/holding");
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/holding/.cockpit/config.yaml")
        );
        assert_eq!(
            portfolio_path(root),
            PathBuf::from("/tmp/holding/.cockpit/portfolio.yaml")
        );
    }
}
