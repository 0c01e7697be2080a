//! Two-phase result pipeline
//!
//! - `ResultsAggregator`: normalized metrics at the end of a practice session
//! - `FinalReportRequester`: composite report for a session token

mod aggregator;
mod final_report;

pub use aggregator::ResultsAggregator;
pub use final_report::FinalReportRequester;
