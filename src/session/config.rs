use crate::recognition::RecognitionSettings;

use super::token::SessionToken;

/// Status line shown once the last prompt has been accepted
pub const COMPLETION_MESSAGE: &str = "Session complete. Preparing results...";

/// Configuration for a practice session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Token sent with every request of this session
    pub session_id: SessionToken,

    /// Settings handed to the recognizer on every start
    pub recognition: RecognitionSettings,
}

impl SessionConfig {
    pub fn new(recognition: RecognitionSettings) -> Self {
        Self {
            session_id: SessionToken::generate(),
            recognition,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(RecognitionSettings::default())
    }
}
