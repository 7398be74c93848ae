//! Metrics for the frame loop.
//!
//! Counters are no-ops until the host installs a `metrics` recorder.

use metrics::counter;

use crate::controller::TickOutcome;

/// Metric names as constants for consistency.
pub mod names {
    pub const TICKS_TOTAL: &str = "mouthcue_ticks_total";
    pub const PROVIDER_LOADS_TOTAL: &str = "mouthcue_provider_loads_total";
}

/// Record one executed tick by outcome.
pub fn record_tick(outcome: &TickOutcome) {
    counter!(names::TICKS_TOTAL, "outcome" => outcome.label()).increment(1);
}

/// Record a provider load attempt.
pub fn record_provider_load(success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(names::PROVIDER_LOADS_TOTAL, "status" => status).increment(1);
}
