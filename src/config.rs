use anyhow::Result;
use serde::Deserialize;

use crate::recognition::RecognitionSettings;
use crate::session::PromptSequence;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub backend: BackendConfig,
    pub recognition: RecognitionConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub prompts: PromptsConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    /// Scoring service root, e.g. `http://127.0.0.1:8000`
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecognitionConfig {
    /// `console` or `scripted`
    pub kind: String,
    pub locale: String,
    pub interim_results: bool,
    /// JSON script for the `scripted` recognizer
    pub script: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    pub path: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PromptsConfig {
    pub sentences: Option<Vec<String>>,
}

impl RecognitionConfig {
    pub fn settings(&self) -> RecognitionSettings {
        RecognitionSettings {
            locale: self.locale.clone(),
            interim_results: self.interim_results,
            continuous: false,
        }
    }
}

impl Config {
    /// Defaults, then the optional file at `path`, then `SPEECH_COACH__*` variables
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("service.name", "speech-coach")?
            .set_default("backend.base_url", "http://127.0.0.1:8000")?
            .set_default("recognition.kind", "console")?
            .set_default("recognition.locale", "en-US")?
            .set_default("recognition.interim_results", true)?
            .set_default("storage.path", ".speech-coach/storage.json")?
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("SPEECH_COACH").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Configured prompts, or the default sequence
    pub fn prompt_sequence(&self) -> Result<PromptSequence> {
        match &self.prompts.sentences {
            Some(sentences) => PromptSequence::new(sentences.clone()),
            None => Ok(PromptSequence::default()),
        }
    }
}
