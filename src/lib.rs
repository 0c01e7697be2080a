pub mod backend;
pub mod config;
pub mod error;
pub mod recognition;
pub mod report;
pub mod session;
pub mod store;
pub mod view;

pub use backend::{
    AnalyzeRequest, FinalReport, FinalResultsRequest, HttpBackend, NormalizedMetrics,
    ScoringBackend, Severity,
};
pub use config::Config;
pub use error::{BackendError, RecognitionError, SessionError, SessionResult};
pub use recognition::{
    RecognitionAdapter, RecognitionBackend, RecognitionEvent, RecognitionSettings,
    RecognizerFactory, RecognizerSource,
};
pub use report::{FinalReportRequester, ResultsAggregator};
pub use session::{
    Attempt, AttemptOutcome, PracticeSession, PromptSequence, SessionConfig, SessionPhase,
    SessionToken,
};
pub use store::{FileStore, MemoryStore, SessionStore};
pub use view::{ConsoleView, PracticeView, ReportView};
