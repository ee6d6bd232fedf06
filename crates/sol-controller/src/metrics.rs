//! Installation metrics
//!
//! Labels carry only the outcome and install mode, never device ids or prefixes.

use metrics::{counter, gauge, histogram};
use std::time::Duration;

use crate::config::InstallMode;

pub const OUTCOME_INSTALLED: &str = "installed";
pub const OUTCOME_REJECTED: &str = "rejected";
pub const OUTCOME_TRANSPORT_ERROR: &str = "transport_error";

pub fn mode_label(mode: InstallMode) -> &'static str {
    match mode {
        InstallMode::Sequential => "sequential",
        InstallMode::Concurrent => "concurrent",
    }
}

pub fn record_flow_install(outcome: &'static str, duration: Duration) {
    counter!("sol_flow_installs_total", "outcome" => outcome).increment(1);
    histogram!("sol_flow_install_duration_seconds", "outcome" => outcome)
        .record(duration.as_secs_f64());
}

pub fn record_install_start() {
    gauge!("sol_flow_installs_in_flight").increment(1.0);
}

pub fn record_install_end() {
    gauge!("sol_flow_installs_in_flight").decrement(1.0);
}

pub fn record_run(mode: InstallMode, rules: usize, duration: Duration) {
    counter!("sol_install_runs_total", "mode" => mode_label(mode)).increment(1);
    histogram!("sol_install_run_rules", "mode" => mode_label(mode)).record(rules as f64);
    histogram!("sol_install_run_duration_seconds", "mode" => mode_label(mode))
        .record(duration.as_secs_f64());
}
