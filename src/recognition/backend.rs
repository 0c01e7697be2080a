use std::path::PathBuf;

use tokio::sync::mpsc;

use super::console::{ConsoleRecognizer, SharedLines};
use super::scripted::ScriptedRecognizer;
use crate::config::RecognitionConfig;
use crate::error::RecognitionError;

/// One event from a recognition capability
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    /// Transcript fragment. Interim fragments are superseded by later events
    /// for the same utterance; final fragments are never revised.
    Transcript { text: String, is_final: bool },
    /// Capability failure; terminates the recording
    Error(RecognitionError),
    /// End of utterance (silence, explicit stop, or engine decision)
    End,
}

impl RecognitionEvent {
    pub fn interim(text: impl Into<String>) -> Self {
        Self::Transcript {
            text: text.into(),
            is_final: false,
        }
    }

    pub fn final_text(text: impl Into<String>) -> Self {
        Self::Transcript {
            text: text.into(),
            is_final: true,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Error(_) | Self::End)
    }
}

/// Settings handed to the capability at start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionSettings {
    /// BCP 47 locale, e.g. "en-US"
    pub locale: String,
    /// Deliver interim (non-final) fragments
    pub interim_results: bool,
    /// Keep listening across utterances; practice sessions use single-utterance mode
    pub continuous: bool,
}

impl Default for RecognitionSettings {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            interim_results: true,
            continuous: false,
        }
    }
}

/// Speech-to-text capability trait
///
/// Implementations:
/// - Console: typed lines on stdin stand in for speech
/// - Scripted: replays a fixed list of events (tests, demos)
#[async_trait::async_trait]
pub trait RecognitionBackend: Send + Sync {
    /// Begin capture
    ///
    /// Returns a channel receiver carrying transcript events. The stream ends
    /// with exactly one `End` or `Error` event.
    async fn start(
        &mut self,
        settings: &RecognitionSettings,
    ) -> Result<mpsc::Receiver<RecognitionEvent>, RecognitionError>;

    /// Ask the capability to stop; the `End` event still arrives on the stream
    async fn stop(&mut self) -> Result<(), RecognitionError>;

    /// Check if the capability is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Recognizer source type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizerSource {
    /// Lines typed on stdin
    Console,
    /// Events replayed from a JSON script
    Scripted(PathBuf),
}

impl RecognizerSource {
    /// Resolve the configured recognizer kind
    pub fn from_config(config: &RecognitionConfig) -> Result<Self, RecognitionError> {
        match config.kind.as_str() {
            "console" => Ok(Self::Console),
            "scripted" => {
                let path = config.script.clone().ok_or_else(|| {
                    RecognitionError::Unsupported(
                        "scripted recognizer needs recognition.script".to_string(),
                    )
                })?;
                Ok(Self::Scripted(PathBuf::from(path)))
            }
            other => Err(RecognitionError::Unsupported(format!(
                "unknown recognizer kind '{}'",
                other
            ))),
        }
    }
}

/// Recognition backend factory
pub struct RecognizerFactory;

impl RecognizerFactory {
    /// Create a recognizer; `console` is the stdin reader the CLI also prompts from
    pub fn create(
        source: RecognizerSource,
        console: SharedLines,
    ) -> Result<Box<dyn RecognitionBackend>, RecognitionError> {
        match source {
            RecognizerSource::Console => Ok(Box::new(ConsoleRecognizer::new(console))),
            RecognizerSource::Scripted(path) => {
                let recognizer = ScriptedRecognizer::from_file(&path)?;
                Ok(Box::new(recognizer))
            }
        }
    }
}
