// Shared fakes for integration tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use speech_coach::backend::{
    AnalyzeRequest, FinalReport, FinalResultsRequest, NormalizedMetrics, ScoringBackend,
};
use speech_coach::recognition::{ScriptStep, ScriptedRecognizer};
use speech_coach::{
    BackendError, MemoryStore, PracticeSession, PracticeView, PromptSequence, ReportView,
    SessionConfig, SessionError, SessionToken,
};

/// Everything a view was asked to show, in order
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Prompt(usize, String),
    Transcript(String),
    Recording(bool),
    RecordingEnabled(bool),
    Status(String),
    Error(String),
    Metrics(NormalizedMetrics),
    OfferFinalReport(String),
    Report(FinalReport),
}

#[derive(Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, event: ViewEvent) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Error(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn offers(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::OfferFinalReport(token) => Some(token),
                _ => None,
            })
            .collect()
    }

    pub fn transcripts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Transcript(text) => Some(text),
                _ => None,
            })
            .collect()
    }
}

impl PracticeView for RecordingView {
    fn show_prompt(&self, index: usize, _total: usize, sentence: &str) {
        self.push(ViewEvent::Prompt(index, sentence.to_string()));
    }

    fn show_transcript(&self, text: &str) {
        self.push(ViewEvent::Transcript(text.to_string()));
    }

    fn set_recording(&self, active: bool) {
        self.push(ViewEvent::Recording(active));
    }

    fn set_recording_enabled(&self, enabled: bool) {
        self.push(ViewEvent::RecordingEnabled(enabled));
    }

    fn show_status(&self, message: &str) {
        self.push(ViewEvent::Status(message.to_string()));
    }

    fn show_error(&self, error: &SessionError) {
        self.push(ViewEvent::Error(error.to_string()));
    }

    fn show_metrics(&self, metrics: &NormalizedMetrics) {
        self.push(ViewEvent::Metrics(metrics.clone()));
    }

    fn offer_final_report(&self, session_id: &SessionToken) {
        self.push(ViewEvent::OfferFinalReport(session_id.to_string()));
    }
}

impl ReportView for RecordingView {
    fn show_report(&self, report: &FinalReport) {
        self.push(ViewEvent::Report(report.clone()));
    }

    fn show_error(&self, error: &SessionError) {
        self.push(ViewEvent::Error(error.to_string()));
    }
}

/// Calls seen by `FakeBackend`
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Analyze(AnalyzeRequest),
    Results(String),
    FinalResults(FinalResultsRequest),
}

/// In-memory scoring service
///
/// `results` answers only for sessions that have submitted at least one attempt.
pub struct FakeBackend {
    calls: Mutex<Vec<BackendCall>>,
    analyze_failures: Mutex<VecDeque<bool>>,
    fail_results: Mutex<bool>,
    metrics: Value,
    report: Value,
}

pub fn sample_metrics() -> Value {
    json!({"Stuttering": 1, "Hesitation": 0, "Pace": 2, "Clarity": 3, "Articulation": 1})
}

pub fn sample_report() -> Value {
    json!({
        "fluency_score": 63,
        "verdict": "Needs Improvement",
        "feedback": {
            "stuttering": "Minor repetitions.",
            "hesitation": "No hesitation or fillers.",
            "pace": "Uneven pacing; try speaking in steady chunks.",
            "clarity": "Many unclear words; slow down.",
            "articulation": "Minor unclear sounds."
        },
        "training_plan": {"weak_area": "clarity", "exercise": "Over-articulate each word once."}
    })
}

fn unavailable(endpoint: &str) -> BackendError {
    BackendError::Status {
        endpoint: endpoint.to_string(),
        status: 503,
        body: "service unavailable".to_string(),
    }
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Self::with_metrics(sample_metrics())
    }

    pub fn with_metrics(metrics: Value) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            analyze_failures: Mutex::new(VecDeque::new()),
            fail_results: Mutex::new(false),
            metrics,
            report: sample_report(),
        })
    }

    /// Script upcoming analyze calls: `true` fails that call
    pub fn script_analyze(&self, failures: &[bool]) {
        self.analyze_failures.lock().unwrap().extend(failures.iter().copied());
    }

    pub fn set_fail_results(&self, fail: bool) {
        *self.fail_results.lock().unwrap() = fail;
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn analyze_calls(&self) -> Vec<AnalyzeRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BackendCall::Analyze(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    pub fn results_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BackendCall::Results(session_id) => Some(session_id),
                _ => None,
            })
            .collect()
    }

    pub fn final_calls(&self) -> Vec<FinalResultsRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BackendCall::FinalResults(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn knows(&self, session_id: &str) -> bool {
        self.analyze_calls().iter().any(|r| r.session_id == session_id)
    }
}

#[async_trait]
impl ScoringBackend for FakeBackend {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<(), BackendError> {
        let fail = self.analyze_failures.lock().unwrap().pop_front().unwrap_or(false);
        if fail {
            return Err(unavailable("/analyze"));
        }
        self.calls.lock().unwrap().push(BackendCall::Analyze(request.clone()));
        Ok(())
    }

    async fn results(&self, session_id: &str) -> Result<NormalizedMetrics, BackendError> {
        self.calls.lock().unwrap().push(BackendCall::Results(session_id.to_string()));

        if *self.fail_results.lock().unwrap() {
            return Err(unavailable("/results"));
        }
        if !self.knows(session_id) {
            return Err(BackendError::Status {
                endpoint: format!("/results/{}", session_id),
                status: 404,
                body: "unknown session".to_string(),
            });
        }

        NormalizedMetrics::from_value(&self.metrics).ok_or_else(|| BackendError::Decode {
            endpoint: "/results".to_string(),
            reason: "not an object".to_string(),
        })
    }

    async fn final_results(&self, request: &FinalResultsRequest) -> Result<FinalReport, BackendError> {
        self.calls.lock().unwrap().push(BackendCall::FinalResults(*request));
        Ok(FinalReport::from_value(&self.report))
    }
}

/// One take that says `text` after a short pause
pub fn spoken(text: &str) -> Vec<ScriptStep> {
    vec![ScriptStep::Pause(15), ScriptStep::Final(text.to_string())]
}

pub struct Harness {
    pub session: PracticeSession,
    pub backend: Arc<FakeBackend>,
    pub view: Arc<RecordingView>,
    pub store: Arc<MemoryStore>,
}

pub fn harness(prompts: PromptSequence, takes: Vec<Vec<ScriptStep>>, backend: Arc<FakeBackend>) -> Harness {
    let view = RecordingView::new();
    let store = Arc::new(MemoryStore::new());

    let session = PracticeSession::new(
        SessionConfig::default(),
        prompts,
        Box::new(ScriptedRecognizer::new(takes)),
        backend.clone(),
        view.clone(),
        store.clone(),
    );
    session.open();

    Harness {
        session,
        backend,
        view,
        store,
    }
}
