//! Practice session management
//!
//! This module provides the `PracticeSession` orchestrator that manages:
//! - Prompt sequencing and the Idle/Recording/Submitting/Complete cycle
//! - Recognition lifecycle and transcript accumulation
//! - Attempt timing and submission to the scoring backend
//! - Handing the finished session to the results aggregator

mod attempt;
mod buffer;
mod config;
mod prompts;
mod session;
mod state;
mod token;

pub use attempt::{Attempt, RecordingWindow};
pub use buffer::UtteranceBuffer;
pub use config::{SessionConfig, COMPLETION_MESSAGE};
pub use prompts::{PromptSequence, DEFAULT_PROMPTS};
pub use session::{AttemptOutcome, PracticeSession};
pub use state::{SessionPhase, SessionStateMachine, SubmissionOutcome};
pub use token::SessionToken;
