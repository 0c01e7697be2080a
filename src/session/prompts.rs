use std::sync::Arc;

use anyhow::{bail, Result};

/// Sentences read aloud in a default practice session
pub const DEFAULT_PROMPTS: [&str; 5] = [
    "I want to explain my idea clearly and confidently today.",
    "Today I am going to describe my favorite hobby in detail.",
    "Please read this sentence at a steady and comfortable speed.",
    "The students completed their assignments before the deadline.",
    "Sally sees seven shiny seashells by the seashore.",
];

/// Fixed, ordered list of prompt sentences
///
/// Cheap to clone; every clone shares the same sentences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSequence {
    sentences: Arc<[String]>,
}

impl PromptSequence {
    pub fn new(sentences: Vec<String>) -> Result<Self> {
        if sentences.is_empty() {
            bail!("prompt sequence must contain at least one sentence");
        }
        if let Some(pos) = sentences.iter().position(|s| s.trim().is_empty()) {
            bail!("prompt {} is blank", pos);
        }

        Ok(Self {
            sentences: sentences.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.sentences.get(index).map(String::as_str)
    }

    pub fn is_last(&self, index: usize) -> bool {
        index + 1 == self.sentences.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.sentences.iter().map(String::as_str)
    }
}

impl Default for PromptSequence {
    fn default() -> Self {
        Self {
            sentences: DEFAULT_PROMPTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}
