use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{PracticeView, ReportView, CHART_LABEL, UNAVAILABLE};
use crate::backend::{FinalReport, NormalizedMetrics, Severity};
use crate::error::SessionError;
use crate::session::SessionToken;

/// Terminal rendering of both pages
#[derive(Debug)]
pub struct ConsoleView {
    recording: AtomicBool,
    enabled: AtomicBool,
}

impl ConsoleView {
    pub fn new() -> Self {
        Self {
            recording: AtomicBool::new(false),
            enabled: AtomicBool::new(true),
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording.load(Ordering::SeqCst)
    }

    pub fn is_recording_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// One chart row, e.g. `Pace          ■■□  Medium`
    pub fn bar(name: &str, level: Option<Severity>) -> String {
        match level {
            Some(level) => {
                let filled = level.level() as usize;
                let empty = Severity::MAX as usize - filled;
                format!(
                    "{:<14}{}{}  {}",
                    name,
                    "■".repeat(filled),
                    "□".repeat(empty),
                    level.label()
                )
            }
            None => format!("{:<14}{}  {}", name, "·".repeat(Severity::MAX as usize), UNAVAILABLE),
        }
    }

    /// Report lines in display order
    pub fn report_lines(report: &FinalReport) -> Vec<String> {
        let or_unavailable = |value: Option<&str>| value.unwrap_or(UNAVAILABLE).to_string();

        let score = report
            .fluency_score
            .map(|score| format!("{}", score))
            .unwrap_or_else(|| UNAVAILABLE.to_string());

        let mut lines = vec![
            format!("Fluency score: {}", score),
            format!("Verdict:       {}", or_unavailable(report.verdict.as_deref())),
            format!(
                "Weak area:     {}",
                or_unavailable(report.training_plan.weak_area.as_deref())
            ),
            format!(
                "Exercise:      {}",
                or_unavailable(report.training_plan.exercise.as_deref())
            ),
            "Feedback:".to_string(),
        ];

        if report.feedback.is_empty() {
            lines.push(format!("• {}", UNAVAILABLE));
        }
        for (_, sentence) in &report.feedback {
            lines.push(format!("• {}", or_unavailable(sentence.as_deref())));
        }

        lines
    }
}

impl Default for ConsoleView {
    fn default() -> Self {
        Self::new()
    }
}

impl PracticeView for ConsoleView {
    fn show_prompt(&self, index: usize, total: usize, sentence: &str) {
        println!("\n[{}/{}] {}", index + 1, total, sentence);
    }

    fn show_transcript(&self, text: &str) {
        // Overwrite the live line in place
        print!("\r\x1b[2K  {}", text);
        std::io::stdout().flush().ok();
    }

    fn set_recording(&self, active: bool) {
        let was = self.recording.swap(active, Ordering::SeqCst);
        if active && !was {
            println!("● recording (empty line to finish)");
        } else if !active && was {
            println!();
        }
    }

    fn set_recording_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    fn show_status(&self, message: &str) {
        println!("{}", message);
    }

    fn show_error(&self, error: &SessionError) {
        println!("✗ {}", error);
    }

    fn show_metrics(&self, metrics: &NormalizedMetrics) {
        println!("\n{}", CHART_LABEL);
        for entry in metrics.entries() {
            println!("  {}", Self::bar(&entry.name, entry.level));
        }
    }

    fn offer_final_report(&self, session_id: &SessionToken) {
        println!(
            "\nSee your final report: speech-coach final {}  ({})",
            session_id,
            session_id.final_report_path()
        );
    }
}

impl ReportView for ConsoleView {
    fn show_report(&self, report: &FinalReport) {
        for line in Self::report_lines(report) {
            println!("{}", line);
        }
    }

    fn show_error(&self, error: &SessionError) {
        println!("✗ {}", error);
    }
}
