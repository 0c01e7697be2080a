use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use super::backend::{RecognitionBackend, RecognitionEvent, RecognitionSettings};
use crate::error::RecognitionError;
use crate::view::PracticeView;

/// Lifecycle guard around a recognition capability
///
/// - refuses to start while a recording is live
/// - turns the recording indicator on at start and off at termination
/// - delivers exactly one terminal event (`End` or `Error`) per recording,
///   including when the capability drops its stream without one
pub struct RecognitionAdapter {
    backend: Box<dyn RecognitionBackend>,
    settings: RecognitionSettings,
    indicator: Arc<dyn PracticeView>,
    events: Option<mpsc::Receiver<RecognitionEvent>>,
}

impl RecognitionAdapter {
    pub fn new(
        backend: Box<dyn RecognitionBackend>,
        settings: RecognitionSettings,
        indicator: Arc<dyn PracticeView>,
    ) -> Self {
        Self {
            backend,
            settings,
            indicator,
            events: None,
        }
    }

    /// Whether a recording is live (started and not yet terminated)
    pub fn is_active(&self) -> bool {
        self.events.is_some()
    }

    pub fn settings(&self) -> &RecognitionSettings {
        &self.settings
    }

    pub async fn start(&mut self) -> Result<(), RecognitionError> {
        if self.is_active() {
            warn!("Recognition already active on {}", self.backend.name());
            return Err(RecognitionError::AlreadyActive);
        }

        info!(
            "Starting {} recognition ({}, interim={})",
            self.backend.name(),
            self.settings.locale,
            self.settings.interim_results
        );

        let rx = self.backend.start(&self.settings).await?;
        self.events = Some(rx);
        self.indicator.set_recording(true);

        Ok(())
    }

    /// Request an early stop. The terminal `End` still comes through `next_event`.
    pub async fn stop(&mut self) -> Result<(), RecognitionError> {
        if !self.is_active() {
            return Ok(());
        }

        info!("Stopping {} recognition", self.backend.name());
        self.backend.stop().await
    }

    /// Next event of the live recording, or `None` once it has terminated
    pub async fn next_event(&mut self) -> Option<RecognitionEvent> {
        let rx = self.events.as_mut()?;

        match rx.recv().await {
            Some(event) if event.is_terminal() => {
                self.terminate().await;
                Some(event)
            }
            Some(event) => Some(event),
            None => {
                warn!("{} closed its stream without an end signal", self.backend.name());
                self.terminate().await;
                Some(RecognitionEvent::End)
            }
        }
    }

    async fn terminate(&mut self) {
        self.events = None;
        self.indicator.set_recording(false);

        if self.backend.is_capturing() {
            if let Err(e) = self.backend.stop().await {
                warn!("Failed to stop {} recognition: {}", self.backend.name(), e);
            }
        }
    }
}
