use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::token::SessionToken;
use crate::backend::AnalyzeRequest;

/// Wall-clock bounds of one recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingWindow {
    pub prompt_index: usize,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl RecordingWindow {
    /// Elapsed seconds; zero if the clock stepped backwards
    pub fn duration_secs(&self) -> f64 {
        let elapsed = self.ended_at.signed_duration_since(self.started_at);
        elapsed.num_milliseconds().max(0) as f64 / 1000.0
    }
}

/// One recorded reading of a prompt, ready for submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    /// Trimmed transcript; may be empty
    pub speech: String,
    pub prompt_index: usize,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub session_id: SessionToken,
}

impl Attempt {
    pub fn new(speech: impl Into<String>, window: RecordingWindow, session_id: SessionToken) -> Self {
        Self {
            speech: speech.into(),
            prompt_index: window.prompt_index,
            started_at: window.started_at,
            ended_at: window.ended_at,
            duration_secs: window.duration_secs(),
            session_id,
        }
    }

    pub fn to_request(&self) -> AnalyzeRequest {
        AnalyzeRequest {
            speech: self.speech.clone(),
            index: self.prompt_index,
            duration: self.duration_secs,
            session_id: self.session_id.as_str().to_string(),
        }
    }
}
