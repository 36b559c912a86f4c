use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// BurnoutMetrics
// ---------------------------------------------------------------------------

/// The operator's latest daily entry. The red flag is not stored; it is
/// derived from these fields on every read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurnoutMetrics {
    /// Hour of day work stopped (0.0..24.0, fractions allowed).
    pub work_end_hour: f64,
    pub sleep_hours: f64,
    pub sleep_target_hours: f64,
}

// ---------------------------------------------------------------------------
// BurnoutThresholds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurnoutThresholds {
    /// Sleep shortfall tolerated before it counts as a deficit.
    #[serde(default = "default_sleep_tolerance")]
    pub sleep_tolerance_hours: f64,
    /// Finishing work after this hour counts as overwork.
    #[serde(default = "default_work_end_cutoff")]
    pub work_end_cutoff_hour: f64,
}

fn default_sleep_tolerance() -> f64 {
    1.0
}

fn default_work_end_cutoff() -> f64 {
    21.0
}

impl Default for BurnoutThresholds {
    fn default() -> Self {
        Self {
            sleep_tolerance_hours: default_sleep_tolerance(),
            work_end_cutoff_hour: default_work_end_cutoff(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BurnoutAssessment {
    pub sleep_deficit_hours: f64,
    pub sleep_deficit: bool,
    pub overwork: bool,
    pub red_flag: bool,
}

impl BurnoutThresholds {
    /// Total over every input: NaN comparisons are false, so garbage
    /// metrics never raise a flag and never panic.
    pub fn assess(&self, metrics: &BurnoutMetrics) -> BurnoutAssessment {
        let deficit = metrics.sleep_target_hours - metrics.sleep_hours;
        let sleep_deficit = deficit > self.sleep_tolerance_hours;
        let overwork = metrics.work_end_hour > self.work_end_cutoff_hour;
        BurnoutAssessment {
            sleep_deficit_hours: deficit,
            sleep_deficit,
            overwork,
            red_flag: sleep_deficit || overwork,
        }
    }

    pub fn red_flag(&self, metrics: &BurnoutMetrics) -> bool {
        self.assess(metrics).red_flag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(work_end: f64, sleep: f64, target: f64) -> BurnoutMetrics {
        BurnoutMetrics {
            work_end_hour: work_end,
            sleep_hours: sleep,
            sleep_target_hours: target,
        }
    }

    #[test]
    fn healthy_day_is_not_flagged() {
        let t = BurnoutThresholds::default();
        assert!(!t.red_flag(&metrics(18.0, 7.5, 8.0)));
        // exactly at tolerance is still fine
        assert!(!t.red_flag(&metrics(21.0, 7.0, 8.0)));
    }

    #[test]
    fn sleep_deficit_flags() {
        let t = BurnoutThresholds::default();
        let a = t.assess(&metrics(18.0, 5.5, 8.0));
        assert!(a.sleep_deficit);
        assert!(!a.overwork);
        assert!(a.red_flag);
        assert_eq!(a.sleep_deficit_hours, 2.5);
    }

    #[test]
    fn late_work_flags() {
        let t = BurnoutThresholds::default();
        let a = t.assess(&metrics(23.5, 8.0, 8.0));
        assert!(a.overwork);
        assert!(a.red_flag);
    }

    #[test]
    fn total_over_odd_inputs() {
        let t = BurnoutThresholds::default();
        assert!(!t.red_flag(&metrics(0.0, 0.0, 0.0)));
        assert!(t.red_flag(&metrics(-1.0, -5.0, 8.0)));
        assert!(!t.red_flag(&metrics(f64::NAN, f64::NAN, f64::NAN)));
        assert!(t.red_flag(&metrics(f64::INFINITY, 8.0, 8.0)));
    }

    #[test]
    fn thresholds_are_configurable() {
        let strict = BurnoutThresholds {
            sleep_tolerance_hours: 0.0,
            work_end_cutoff_hour: 19.0,
        };
        assert!(strict.red_flag(&metrics(18.0, 7.5, 8.0)));
        assert!(strict.red_flag(&metrics(19.5, 8.0, 8.0)));
    }

    #[test]
    fn thresholds_default_from_empty_yaml() {
        let t: BurnoutThresholds = serde_yaml::from_str("{}").unwrap();
        assert_eq!(t, BurnoutThresholds::default());
    }
}
