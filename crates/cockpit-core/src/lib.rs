pub mod burnout;
pub mod config;
pub mod error;
pub mod io;
pub mod paths;
pub mod portfolio;
pub mod project;
pub mod registry;
pub mod run_policy;
pub mod schedule;
pub mod snapshot;
pub mod types;

pub use error::{CockpitError, Result, RuleViolation};
pub use portfolio::{PortfolioRuleEngine, MAX_ACTIVE_PROJECTS};
pub use run_policy::RunPolicyEngine;
