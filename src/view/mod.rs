//! Rendering collaborators
//!
//! The orchestrator only talks to these traits; `ConsoleView` renders to a terminal.

mod console;

pub use console::ConsoleView;

use crate::backend::{FinalReport, NormalizedMetrics};
use crate::error::SessionError;
use crate::session::SessionToken;

/// Label of the metrics chart's value axis
pub const CHART_LABEL: &str = "Observed Level (0–3)";

/// Shown wherever a value is missing or malformed
pub const UNAVAILABLE: &str = "unavailable";

/// Surface of the practice page
pub trait PracticeView: Send + Sync {
    /// Display prompt `index` (zero-based) of `total`
    fn show_prompt(&self, index: usize, total: usize, sentence: &str);

    /// Replace the live transcript text
    fn show_transcript(&self, text: &str);

    /// Recording indicator on the start control
    fn set_recording(&self, active: bool);

    /// Whether the start control accepts input
    fn set_recording_enabled(&self, enabled: bool);

    fn show_status(&self, message: &str);

    fn show_error(&self, error: &SessionError);

    /// Bar chart of per-dimension levels
    fn show_metrics(&self, metrics: &NormalizedMetrics);

    /// Make the "proceed to final report" action available
    fn offer_final_report(&self, session_id: &SessionToken);
}

/// Surface of the final report page
pub trait ReportView: Send + Sync {
    fn show_report(&self, report: &FinalReport);

    fn show_error(&self, error: &SessionError);
}
