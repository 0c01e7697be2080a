pub mod adapter;
pub mod backend;
pub mod console;
pub mod scripted;

pub use adapter::RecognitionAdapter;
pub use backend::{
    RecognitionBackend, RecognitionEvent, RecognitionSettings, RecognizerFactory, RecognizerSource,
};
pub use console::{shared_lines, stdin_lines, ConsoleRecognizer, LineSource, SharedLines};
pub use scripted::{ScriptFailure, ScriptStep, ScriptedRecognizer};
