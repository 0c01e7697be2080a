use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{SessionError, SessionResult};

/// Body of `POST /analyze`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Trimmed transcript, empty when nothing was recognised
    pub speech: String,
    /// Zero-based prompt index
    pub index: usize,
    /// Elapsed recording time in seconds
    pub duration: f64,
    pub session_id: String,
}

/// Ordinal severity reported for one metric dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Severity {
    None = 0,
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Severity {
    pub const MAX: u8 = 3;

    pub fn from_level(level: i64) -> Option<Self> {
        match level {
            0 => Some(Self::None),
            1 => Some(Self::Low),
            2 => Some(Self::Medium),
            3 => Some(Self::High),
            _ => None,
        }
    }

    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> Self {
        severity.level()
    }
}

impl TryFrom<u8> for Severity {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::from_level(level as i64).ok_or_else(|| format!("severity {} is outside 0..=3", level))
    }
}

/// One bar of the metrics chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricEntry {
    pub name: String,
    /// `None` when the backend sent something that is not a level in 0..=3
    pub level: Option<Severity>,
}

/// Per-dimension severities returned by `GET /results/{session_id}`
///
/// Entries keep the order the backend sent them in. Unknown keys are kept
/// and rendered generically.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedMetrics {
    entries: Vec<MetricEntry>,
}

/// The five dimensions forwarded to `POST /final_results`
pub const STUTTERING: &str = "Stuttering";
pub const HESITATION: &str = "Hesitation";
pub const PACE: &str = "Pace";
pub const CLARITY: &str = "Clarity";
pub const ARTICULATION: &str = "Articulation";

impl NormalizedMetrics {
    pub fn new(entries: Vec<MetricEntry>) -> Self {
        Self { entries }
    }

    /// Build from a decoded JSON body. Returns `None` unless the body is an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let entries = object
            .iter()
            .map(|(name, raw)| MetricEntry {
                name: name.clone(),
                level: raw.as_i64().and_then(Severity::from_level),
            })
            .collect();
        Some(Self { entries })
    }

    pub fn entries(&self) -> &[MetricEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<Severity> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .and_then(|entry| entry.level)
    }
}

/// Body of `POST /final_results`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalResultsRequest {
    pub stuttering: Severity,
    pub hesitation: Severity,
    pub pace: Severity,
    pub clarity: Severity,
    pub articulation: Severity,
}

impl FinalResultsRequest {
    /// Pick exactly the five recognised dimensions out of the metrics.
    ///
    /// Every dimension must be present with a valid level; extra keys are ignored.
    pub fn from_metrics(metrics: &NormalizedMetrics) -> SessionResult<Self> {
        let pick = |name: &'static str| {
            metrics
                .get(name)
                .ok_or(SessionError::MissingMetric { name })
        };

        Ok(Self {
            stuttering: pick(STUTTERING)?,
            hesitation: pick(HESITATION)?,
            pace: pick(PACE)?,
            clarity: pick(CLARITY)?,
            articulation: pick(ARTICULATION)?,
        })
    }
}

/// Weakest dimension and the exercise suggested for it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrainingPlan {
    pub weak_area: Option<String>,
    pub exercise: Option<String>,
}

/// Composite report returned by `POST /final_results`
///
/// Every field is optional: a malformed or partial response still renders,
/// with the missing parts shown as unavailable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FinalReport {
    pub fluency_score: Option<f64>,
    pub verdict: Option<String>,
    pub training_plan: TrainingPlan,
    /// Feedback key to sentence, in backend order
    pub feedback: Vec<(String, Option<String>)>,
}

impl FinalReport {
    pub fn from_value(value: &Value) -> Self {
        let text = |v: Option<&Value>| v.and_then(Value::as_str).map(str::to_string);

        let plan = value.get("training_plan");
        let feedback = value
            .get("feedback")
            .and_then(Value::as_object)
            .map(|object| {
                object
                    .iter()
                    .map(|(key, sentence)| (key.clone(), sentence.as_str().map(str::to_string)))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            fluency_score: value.get("fluency_score").and_then(Value::as_f64),
            verdict: text(value.get("verdict")),
            training_plan: TrainingPlan {
                weak_area: text(plan.and_then(|p| p.get("weak_area"))),
                exercise: text(plan.and_then(|p| p.get("exercise"))),
            },
            feedback,
        }
    }
}
