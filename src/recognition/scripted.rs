//! Replays prepared recognition events
//!
//! Each `start()` plays the next take of the script. A take is a list of steps;
//! the stream ends with `End` after the last step unless a step fails first.
//!
//! Script file format:
//!
//! ```json
//! { "takes": [
//!     [ {"interim": "I want"}, {"pause": 250}, {"final": "I want to explain my idea"} ],
//!     [ {"fail": "no_speech"} ]
//! ] }
//! ```

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use super::backend::{RecognitionBackend, RecognitionEvent, RecognitionSettings};
use crate::error::RecognitionError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptFailure {
    NoSpeech,
    PermissionDenied,
    Capture,
}

impl From<&ScriptFailure> for RecognitionError {
    fn from(failure: &ScriptFailure) -> Self {
        match failure {
            ScriptFailure::NoSpeech => RecognitionError::NoSpeech,
            ScriptFailure::PermissionDenied => RecognitionError::PermissionDenied,
            ScriptFailure::Capture => RecognitionError::Capture("scripted failure".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    Interim(String),
    Final(String),
    /// Milliseconds of silence
    Pause(u64),
    Fail(ScriptFailure),
}

#[derive(Debug, Deserialize)]
struct ScriptFile {
    takes: Vec<Vec<ScriptStep>>,
}

pub struct ScriptedRecognizer {
    takes: VecDeque<Vec<ScriptStep>>,
    capturing: Arc<AtomicBool>,
    stop_tx: Option<watch::Sender<bool>>,
}

impl ScriptedRecognizer {
    pub fn new(takes: Vec<Vec<ScriptStep>>) -> Self {
        Self {
            takes: takes.into(),
            capturing: Arc::new(AtomicBool::new(false)),
            stop_tx: None,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, RecognitionError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            RecognitionError::Unsupported(format!("cannot read script {}: {}", path.display(), e))
        })?;
        let script: ScriptFile = serde_json::from_str(&raw).map_err(|e| {
            RecognitionError::Unsupported(format!("invalid script {}: {}", path.display(), e))
        })?;

        info!("Loaded recognition script with {} takes", script.takes.len());
        Ok(Self::new(script.takes))
    }

    pub fn remaining_takes(&self) -> usize {
        self.takes.len()
    }

    async fn play(
        take: Vec<ScriptStep>,
        interim_results: bool,
        tx: &mpsc::Sender<RecognitionEvent>,
        mut stop_rx: watch::Receiver<bool>,
    ) -> Option<RecognitionEvent> {
        for step in take {
            if *stop_rx.borrow() {
                break;
            }

            let event = match step {
                ScriptStep::Interim(text) if interim_results => RecognitionEvent::interim(text),
                ScriptStep::Interim(_) => continue,
                ScriptStep::Final(text) => RecognitionEvent::final_text(text),
                ScriptStep::Pause(ms) => {
                    tokio::select! {
                        _ = tokio::time::sleep(Duration::from_millis(ms)) => {}
                        _ = stop_rx.changed() => break,
                    }
                    continue;
                }
                ScriptStep::Fail(failure) => return Some(RecognitionEvent::Error((&failure).into())),
            };

            if tx.send(event).await.is_err() {
                return None;
            }
        }

        Some(RecognitionEvent::End)
    }
}

#[async_trait::async_trait]
impl RecognitionBackend for ScriptedRecognizer {
    async fn start(
        &mut self,
        settings: &RecognitionSettings,
    ) -> Result<mpsc::Receiver<RecognitionEvent>, RecognitionError> {
        if self.capturing.load(Ordering::SeqCst) {
            return Err(RecognitionError::AlreadyActive);
        }

        let take = self
            .takes
            .pop_front()
            .ok_or_else(|| RecognitionError::Capture("recognition script exhausted".to_string()))?;

        debug!("Playing scripted take ({} steps)", take.len());

        let (tx, rx) = mpsc::channel(32);
        let (stop_tx, stop_rx) = watch::channel(false);
        let capturing = Arc::clone(&self.capturing);
        let interim_results = settings.interim_results;

        capturing.store(true, Ordering::SeqCst);
        tokio::spawn(async move {
            let terminal = Self::play(take, interim_results, &tx, stop_rx).await;
            // Capture is over before the terminal event is observable
            capturing.store(false, Ordering::SeqCst);
            if let Some(event) = terminal {
                let _ = tx.send(event).await;
            }
        });

        self.stop_tx = Some(stop_tx);
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), RecognitionError> {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
        }
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
