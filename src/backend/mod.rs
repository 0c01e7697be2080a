//! Scoring backend contract
//!
//! - POST /analyze - submit one attempt
//! - GET /results/:session_id - normalized per-dimension metrics
//! - POST /final_results - composite fluency report

pub mod client;
pub mod messages;

pub use client::{HttpBackend, ScoringBackend};
pub use messages::{
    AnalyzeRequest, FinalReport, FinalResultsRequest, MetricEntry, NormalizedMetrics, Severity,
    TrainingPlan,
};
