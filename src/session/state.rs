use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::attempt::RecordingWindow;
use crate::error::{BackendError, SessionError, SessionResult};

/// Where the practice session is in its prompt cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No active recognition; the start control is actionable
    Idle,
    /// Recognition live, buffer accumulating
    Recording,
    /// Recognition ended, attempt in flight
    Submitting,
    /// Every prompt submitted
    Complete,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Submitting => "submitting",
            Self::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Result of resolving an in-flight submission
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// Back to `Idle` at the given (next) prompt
    NextPrompt(usize),
    /// Last prompt accepted; session is `Complete`
    Finished,
    /// Submission failed; back to `Idle` at the same prompt
    Failed { index: usize, error: BackendError },
}

/// Transition rules of a practice session
///
/// Pure bookkeeping: no I/O, timestamps are passed in.
#[derive(Debug, Clone)]
pub struct SessionStateMachine {
    phase: SessionPhase,
    index: usize,
    prompt_count: usize,
    recording_started_at: Option<DateTime<Utc>>,
}

impl SessionStateMachine {
    pub fn new(prompt_count: usize) -> Self {
        Self {
            phase: SessionPhase::Idle,
            index: 0,
            prompt_count,
            recording_started_at: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Zero-based index of the current prompt
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn prompt_count(&self) -> usize {
        self.prompt_count
    }

    pub fn recording_started_at(&self) -> Option<DateTime<Utc>> {
        self.recording_started_at
    }

    fn is_last_prompt(&self) -> bool {
        self.index + 1 >= self.prompt_count
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        warn!("Rejected '{}' while {}", action, self.phase);
        match self.phase {
            SessionPhase::Complete => SessionError::SessionComplete,
            phase => SessionError::InvalidTransition { action, phase },
        }
    }

    /// `Idle -> Recording`
    pub fn begin_recording(&mut self, now: DateTime<Utc>) -> SessionResult<()> {
        if self.phase != SessionPhase::Idle {
            return Err(self.invalid("start recording"));
        }

        self.phase = SessionPhase::Recording;
        self.recording_started_at = Some(now);
        debug!("Prompt {}: recording", self.index);

        Ok(())
    }

    /// `Recording -> Submitting`, yielding the recording's time window
    pub fn end_recording(&mut self, now: DateTime<Utc>) -> SessionResult<RecordingWindow> {
        let started_at = match (self.phase, self.recording_started_at) {
            (SessionPhase::Recording, Some(started_at)) => started_at,
            _ => return Err(self.invalid("end recording")),
        };

        self.phase = SessionPhase::Submitting;
        self.recording_started_at = None;
        debug!("Prompt {}: submitting", self.index);

        Ok(RecordingWindow {
            prompt_index: self.index,
            started_at,
            ended_at: now,
        })
    }

    /// `Recording -> Idle` without a submission (recognition failure)
    pub fn abort_recording(&mut self) -> SessionResult<()> {
        if self.phase != SessionPhase::Recording {
            return Err(self.invalid("abort recording"));
        }

        self.phase = SessionPhase::Idle;
        self.recording_started_at = None;
        info!("Prompt {}: recording aborted", self.index);

        Ok(())
    }

    /// Leave `Submitting` according to the backend's answer
    pub fn resolve_submission(&mut self, result: Result<(), BackendError>) -> SessionResult<SubmissionOutcome> {
        if self.phase != SessionPhase::Submitting {
            return Err(self.invalid("resolve submission"));
        }

        let outcome = match result {
            Err(error) => {
                self.phase = SessionPhase::Idle;
                SubmissionOutcome::Failed {
                    index: self.index,
                    error,
                }
            }
            Ok(()) if self.is_last_prompt() => {
                self.phase = SessionPhase::Complete;
                SubmissionOutcome::Finished
            }
            Ok(()) => {
                self.index += 1;
                self.phase = SessionPhase::Idle;
                SubmissionOutcome::NextPrompt(self.index)
            }
        };

        debug!("Submission resolved: {:?} (now {} at {})", outcome, self.phase, self.index);
        Ok(outcome)
    }
}
