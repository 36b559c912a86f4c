use crate::error::{CockpitError, Result};
use crate::registry::{RunTypeDefinition, RunTypeRegistry};
use crate::types::{Requester, RiskLevel};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// RunRequest / RunDecision
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
    pub run_type_id: String,
    pub requested_by: Requester,
    #[serde(default)]
    pub autopilot_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunVerdict {
    AutoApprove,
    RequireApproval,
    Block,
}

impl fmt::Display for RunVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunVerdict::AutoApprove => "auto_approve",
            RunVerdict::RequireApproval => "require_approval",
            RunVerdict::Block => "block",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunDecision {
    pub run_type_id: String,
    pub title: String,
    /// `None` when the run type is not registered.
    pub risk_level: Option<RiskLevel>,
    pub verdict: RunVerdict,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// RunPolicyEngine
// ---------------------------------------------------------------------------

/// Stateless classifier over an immutable registry. Unknown run types fail
/// closed: they always need approval and never auto-execute.
pub struct RunPolicyEngine<'r> {
    registry: &'r RunTypeRegistry,
}

impl<'r> RunPolicyEngine<'r> {
    pub fn new(registry: &'r RunTypeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r RunTypeRegistry {
        self.registry
    }

    pub fn classify(&self, run_type_id: &str) -> Result<&'r RunTypeDefinition> {
        self.registry
            .get(run_type_id)
            .ok_or_else(|| CockpitError::RunTypeNotFound(run_type_id.to_string()))
    }

    pub fn should_require_approval(
        &self,
        run_type_id: &str,
        override_risk: Option<RiskLevel>,
    ) -> bool {
        let Ok(def) = self.classify(run_type_id) else {
            tracing::debug!(run_type = run_type_id, "unknown run type requires approval");
            return true;
        };
        override_risk.unwrap_or(def.risk_level).requires_approval()
    }

    pub fn can_auto_execute(&self, run_type_id: &str, autopilot_enabled: bool) -> bool {
        if !autopilot_enabled {
            return false;
        }
        match self.classify(run_type_id) {
            Ok(def) => matches!(def.risk_level, RiskLevel::Low | RiskLevel::Medium),
            Err(_) => false,
        }
    }

    /// Display label for a run type. Never fails: unregistered ids get their
    /// underscores replaced by spaces.
    pub fn format_run_type(&self, run_type_id: &str) -> String {
        match self.registry.get(run_type_id) {
            Some(def) if !def.title.is_empty() => def.title.clone(),
            _ => run_type_id.replace('_', " "),
        }
    }

    /// Gate a concrete request before dispatch.
    ///
    /// High and critical runs always go to a human, whoever asked and whatever
    /// the autopilot state. Low and medium runs started by a human go straight
    /// through; started by automation they need autopilot.
    pub fn evaluate(&self, request: &RunRequest) -> RunDecision {
        let id = request.run_type_id.as_str();
        let title = self.format_run_type(id);

        let def = match self.classify(id) {
            Ok(def) => def,
            Err(e) => {
                tracing::warn!(run_type = id, "blocking unregistered run type");
                return RunDecision {
                    run_type_id: id.to_string(),
                    title,
                    risk_level: None,
                    verdict: RunVerdict::Block,
                    reason: e.to_string(),
                };
            }
        };

        let (verdict, reason) = if self.should_require_approval(id, None) {
            (
                RunVerdict::RequireApproval,
                format!("{} risk runs need human approval", def.risk_level),
            )
        } else {
            match request.requested_by {
                Requester::Human => (
                    RunVerdict::AutoApprove,
                    format!("{} risk run started by a human", def.risk_level),
                ),
                Requester::Automation
                    if self.can_auto_execute(id, request.autopilot_enabled) =>
                {
                    (
                        RunVerdict::AutoApprove,
                        format!("{} risk run allowed on autopilot", def.risk_level),
                    )
                }
                Requester::Automation => (
                    RunVerdict::Block,
                    "autopilot is disabled for automated runs".to_string(),
                ),
            }
        };

        RunDecision {
            run_type_id: id.to_string(),
            title,
            risk_level: Some(def.risk_level),
            verdict,
            reason,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_registry() -> RunTypeRegistry {
        RunTypeRegistry::from_definitions(vec![
            RunTypeDefinition::new(
                "DAILY_EXECUTIVE_BRIEF",
                "Daily executive brief",
                RiskLevel::Low,
                &["collect", "publish"],
            ),
            RunTypeDefinition::new(
                "CUSTOMER_FOLLOWUP_BATCH",
                "Customer follow-up batch",
                RiskLevel::Medium,
                &["send"],
            ),
            RunTypeDefinition::new(
                "RELEASE_GATE_CHECK",
                "Release gate check",
                RiskLevel::High,
                &["check"],
            ),
            RunTypeDefinition::new(
                "DEPLOY_TO_PRODUCTION",
                "Deploy to production",
                RiskLevel::Critical,
                &["deploy"],
            ),
        ])
        .unwrap()
    }

    const UNKNOWN: &[&str] = &["", "NOPE", "daily_executive_brief", "DAILY_EXECUTIVE_BRIEF "];

    #[test]
    fn concrete_scenario() {
        let registry = scenario_registry();
        let engine = RunPolicyEngine::new(&registry);
        assert!(!engine.should_require_approval("DAILY_EXECUTIVE_BRIEF", None));
        assert!(engine.should_require_approval("RELEASE_GATE_CHECK", None));
        assert!(!engine.can_auto_execute("DEPLOY_TO_PRODUCTION", true));
        assert!(engine.can_auto_execute("DAILY_EXECUTIVE_BRIEF", true));
        assert!(!engine.can_auto_execute("DAILY_EXECUTIVE_BRIEF", false));
    }

    #[test]
    fn classify_unknown_is_not_found() {
        let registry = scenario_registry();
        let engine = RunPolicyEngine::new(&registry);
        let err = engine.classify("NOPE").unwrap_err();
        assert!(matches!(err, CockpitError::RunTypeNotFound(id) if id == "NOPE"));
        assert_eq!(
            engine.classify("RELEASE_GATE_CHECK").unwrap().risk_level,
            RiskLevel::High
        );
    }

    #[test]
    fn approval_follows_risk_for_every_registered_type() {
        let registry = RunTypeRegistry::builtin();
        let engine = RunPolicyEngine::new(&registry);
        for def in registry.iter() {
            let expected = matches!(def.risk_level, RiskLevel::High | RiskLevel::Critical);
            assert_eq!(engine.should_require_approval(&def.id, None), expected, "{}", def.id);
        }
    }

    #[test]
    fn override_risk_takes_precedence() {
        let registry = scenario_registry();
        let engine = RunPolicyEngine::new(&registry);
        assert!(engine.should_require_approval("DAILY_EXECUTIVE_BRIEF", Some(RiskLevel::Critical)));
        assert!(!engine.should_require_approval("RELEASE_GATE_CHECK", Some(RiskLevel::Low)));
    }

    #[test]
    fn unknown_ids_fail_closed() {
        let registry = scenario_registry();
        let engine = RunPolicyEngine::new(&registry);
        for id in UNKNOWN {
            assert!(engine.should_require_approval(id, None));
            assert!(engine.should_require_approval(id, Some(RiskLevel::Low)));
            for autopilot in [true, false] {
                assert!(!engine.can_auto_execute(id, autopilot));
            }
        }
    }

    #[test]
    fn autopilot_off_never_auto_executes() {
        let registry = RunTypeRegistry::builtin();
        let engine = RunPolicyEngine::new(&registry);
        for id in registry.ids() {
            assert!(!engine.can_auto_execute(id, false), "{id}");
        }
        for id in UNKNOWN {
            assert!(!engine.can_auto_execute(id, false), "{id}");
        }
    }

    #[test]
    fn only_low_and_medium_auto_execute() {
        let registry = RunTypeRegistry::builtin();
        let engine = RunPolicyEngine::new(&registry);
        for def in registry.iter() {
            let expected = matches!(def.risk_level, RiskLevel::Low | RiskLevel::Medium);
            assert_eq!(engine.can_auto_execute(&def.id, true), expected, "{}", def.id);
            if def.risk_level == RiskLevel::Critical {
                assert!(!engine.can_auto_execute(&def.id, true));
            }
        }
    }

    #[test]
    fn format_run_type_uses_title_or_fallback() {
        let registry = scenario_registry();
        let engine = RunPolicyEngine::new(&registry);
        assert_eq!(
            engine.format_run_type("RELEASE_GATE_CHECK"),
            "Release gate check"
        );
        assert_eq!(engine.format_run_type("SOME_NEW_Thing"), "SOME NEW Thing");
        assert_eq!(engine.format_run_type("_"), " ");
        for id in UNKNOWN.iter().filter(|s| !s.is_empty()) {
            assert!(!engine.format_run_type(id).is_empty());
        }
    }

    #[test]
    fn evaluate_routes_by_risk_and_requester() {
        let registry = scenario_registry();
        let engine = RunPolicyEngine::new(&registry);
        let req = |id: &str, by: Requester, autopilot: bool| RunRequest {
            run_type_id: id.to_string(),
            requested_by: by,
            autopilot_enabled: autopilot,
        };

        let d = engine.evaluate(&req("DAILY_EXECUTIVE_BRIEF", Requester::Automation, true));
        assert_eq!(d.verdict, RunVerdict::AutoApprove);
        assert_eq!(d.risk_level, Some(RiskLevel::Low));

        let d = engine.evaluate(&req("CUSTOMER_FOLLOWUP_BATCH", Requester::Automation, false));
        assert_eq!(d.verdict, RunVerdict::Block);

        let d = engine.evaluate(&req("CUSTOMER_FOLLOWUP_BATCH", Requester::Human, false));
        assert_eq!(d.verdict, RunVerdict::AutoApprove);

        let d = engine.evaluate(&req("RELEASE_GATE_CHECK", Requester::Automation, true));
        assert_eq!(d.verdict, RunVerdict::RequireApproval);

        let d = engine.evaluate(&req("DEPLOY_TO_PRODUCTION", Requester::Human, true));
        assert_eq!(d.verdict, RunVerdict::RequireApproval);
        assert_eq!(d.title, "Deploy to production");
    }

    #[test]
    fn evaluate_blocks_unknown() {
        let registry = scenario_registry();
        let engine = RunPolicyEngine::new(&registry);
        let d = engine.evaluate(&RunRequest {
            run_type_id: "WIPE_EVERYTHING".to_string(),
            requested_by: Requester::Human,
            autopilot_enabled: true,
        });
        assert_eq!(d.verdict, RunVerdict::Block);
        assert_eq!(d.risk_level, None);
        assert_eq!(d.title, "WIPE EVERYTHING");
        assert!(d.reason.contains("WIPE_EVERYTHING"));
    }
}
