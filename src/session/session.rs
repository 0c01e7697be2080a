use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use super::attempt::Attempt;
use super::buffer::UtteranceBuffer;
use super::config::{SessionConfig, COMPLETION_MESSAGE};
use super::prompts::PromptSequence;
use super::state::{SessionPhase, SessionStateMachine, SubmissionOutcome};
use super::token::SessionToken;
use crate::backend::{NormalizedMetrics, ScoringBackend};
use crate::error::{SessionError, SessionResult};
use crate::recognition::{RecognitionAdapter, RecognitionBackend, RecognitionEvent};
use crate::report::ResultsAggregator;
use crate::store::SessionStore;
use crate::view::PracticeView;

/// What a finished attempt led to
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    /// Accepted; the session moved on to `next_index`
    Advanced { attempt: Attempt, next_index: usize },
    /// Last prompt accepted and results loaded
    Completed {
        attempt: Attempt,
        metrics: NormalizedMetrics,
    },
}

/// A guided practice session over a fixed prompt sequence
///
/// Owns all mutable session state. Every transition happens through `&mut self`,
/// so there is a single writer and at most one submission in flight.
pub struct PracticeSession {
    config: SessionConfig,
    prompts: PromptSequence,
    machine: SessionStateMachine,
    buffer: UtteranceBuffer,
    recognizer: RecognitionAdapter,
    backend: Arc<dyn ScoringBackend>,
    view: Arc<dyn PracticeView>,
    aggregator: ResultsAggregator,
    metrics: Option<NormalizedMetrics>,
}

impl PracticeSession {
    pub fn new(
        config: SessionConfig,
        prompts: PromptSequence,
        recognizer: Box<dyn RecognitionBackend>,
        backend: Arc<dyn ScoringBackend>,
        view: Arc<dyn PracticeView>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        info!(
            "Creating practice session {} ({} prompts)",
            config.session_id,
            prompts.len()
        );

        let recognizer =
            RecognitionAdapter::new(recognizer, config.recognition.clone(), Arc::clone(&view));
        let aggregator =
            ResultsAggregator::new(Arc::clone(&backend), Arc::clone(&view), store);

        Self {
            machine: SessionStateMachine::new(prompts.len()),
            config,
            prompts,
            buffer: UtteranceBuffer::new(),
            recognizer,
            backend,
            view,
            aggregator,
            metrics: None,
        }
    }

    /// Render the initial page state
    pub fn open(&self) {
        self.show_current_prompt();
        self.view.set_recording_enabled(true);
    }

    pub fn session_id(&self) -> &SessionToken {
        &self.config.session_id
    }

    pub fn phase(&self) -> SessionPhase {
        self.machine.phase()
    }

    pub fn prompt_index(&self) -> usize {
        self.machine.index()
    }

    pub fn current_prompt(&self) -> Option<&str> {
        self.prompts.get(self.machine.index())
    }

    pub fn prompts(&self) -> &PromptSequence {
        &self.prompts
    }

    /// Metrics loaded at completion, if any
    pub fn metrics(&self) -> Option<&NormalizedMetrics> {
        self.metrics.as_ref()
    }

    /// The start action: `Idle -> Recording`
    pub async fn start_recording(&mut self) -> SessionResult<()> {
        self.machine
            .begin_recording(Utc::now())
            .map_err(|e| self.fail(e))?;

        self.buffer.clear();
        self.view.show_transcript("");

        if let Err(e) = self.recognizer.start().await {
            self.machine.abort_recording()?;
            return Err(self.fail(e.into()));
        }

        info!(
            "Session {}: recording prompt {}",
            self.config.session_id,
            self.machine.index()
        );
        Ok(())
    }

    /// Ask recognition to end early; the attempt is still submitted when it ends
    pub async fn stop_recording(&mut self) -> SessionResult<()> {
        if self.machine.phase() != SessionPhase::Recording {
            return Err(self.fail(SessionError::InvalidTransition {
                action: "stop recording",
                phase: self.machine.phase(),
            }));
        }

        self.recognizer.stop().await.map_err(|e| self.fail(e.into()))
    }

    /// Apply one recognition event.
    ///
    /// Returns `Some` once the recording has ended and its attempt was resolved.
    pub async fn process_next_event(&mut self) -> SessionResult<Option<AttemptOutcome>> {
        if self.machine.phase() != SessionPhase::Recording {
            return Err(self.fail(SessionError::InvalidTransition {
                action: "process recognition events",
                phase: self.machine.phase(),
            }));
        }

        match self.recognizer.next_event().await {
            Some(RecognitionEvent::Transcript {
                text,
                is_final: true,
            }) => {
                self.buffer.push_final(&text);
                self.view.show_transcript(&self.buffer.display(None));
                Ok(None)
            }
            Some(RecognitionEvent::Transcript {
                text,
                is_final: false,
            }) => {
                self.view.show_transcript(&self.buffer.display(Some(&text)));
                Ok(None)
            }
            Some(RecognitionEvent::Error(e)) => {
                warn!("Recognition failed on prompt {}: {}", self.machine.index(), e);
                self.buffer.clear();
                self.view.show_transcript("");
                self.machine.abort_recording()?;
                Err(self.fail(e.into()))
            }
            Some(RecognitionEvent::End) | None => self.submit_attempt().await.map(Some),
        }
    }

    /// Apply events until the current recording ends and its attempt is resolved
    pub async fn finish_attempt(&mut self) -> SessionResult<AttemptOutcome> {
        loop {
            if let Some(outcome) = self.process_next_event().await? {
                return Ok(outcome);
            }
        }
    }

    /// Start a recording and see it through
    pub async fn record_attempt(&mut self) -> SessionResult<AttemptOutcome> {
        self.start_recording().await?;
        self.finish_attempt().await
    }

    /// Reload results after a failed fetch at completion
    pub async fn fetch_results(&mut self) -> SessionResult<NormalizedMetrics> {
        if self.machine.phase() != SessionPhase::Complete {
            return Err(self.fail(SessionError::InvalidTransition {
                action: "fetch results",
                phase: self.machine.phase(),
            }));
        }

        let metrics = self.aggregator.fetch_results(&self.config.session_id).await?;
        self.metrics = Some(metrics.clone());
        Ok(metrics)
    }

    /// `Recording -> Submitting -> Idle | Complete`
    async fn submit_attempt(&mut self) -> SessionResult<AttemptOutcome> {
        let window = self.machine.end_recording(Utc::now())?;
        let attempt = Attempt::new(
            self.buffer.trimmed(),
            window,
            self.config.session_id.clone(),
        );
        self.view.show_transcript("");

        info!(
            "Session {}: submitting prompt {} ({:.2}s, {} words)",
            attempt.session_id,
            attempt.prompt_index,
            attempt.duration_secs,
            attempt.speech.split_whitespace().count()
        );

        let result = self.backend.analyze(&attempt.to_request()).await;

        match self.machine.resolve_submission(result)? {
            SubmissionOutcome::NextPrompt(next_index) => {
                self.buffer.clear();
                self.show_current_prompt();
                Ok(AttemptOutcome::Advanced {
                    attempt,
                    next_index,
                })
            }
            SubmissionOutcome::Finished => {
                self.buffer.clear();
                info!("Session {}: all prompts submitted", attempt.session_id);
                self.view.show_status(COMPLETION_MESSAGE);
                self.view.set_recording_enabled(false);

                let metrics = self.fetch_results().await?;
                Ok(AttemptOutcome::Completed { attempt, metrics })
            }
            SubmissionOutcome::Failed { index, error } => {
                error!("Submission of prompt {} failed: {}", index, error);
                Err(self.fail(error.into()))
            }
        }
    }

    fn show_current_prompt(&self) {
        if let Some(sentence) = self.prompts.get(self.machine.index()) {
            self.view
                .show_prompt(self.machine.index(), self.prompts.len(), sentence);
        }
    }

    fn fail(&self, error: SessionError) -> SessionError {
        self.view.show_error(&error);
        error
    }
}
