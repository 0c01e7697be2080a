use std::sync::Arc;

use tracing::{error, info};

use crate::backend::{FinalReport, FinalResultsRequest, ScoringBackend};
use crate::error::{SessionError, SessionResult};
use crate::session::SessionToken;
use crate::store::{SessionStore, SESSION_KEY};
use crate::view::ReportView;

/// Drives the final report page for one session token
pub struct FinalReportRequester {
    backend: Arc<dyn ScoringBackend>,
    view: Arc<dyn ReportView>,
    store: Arc<dyn SessionStore>,
}

impl FinalReportRequester {
    pub fn new(
        backend: Arc<dyn ScoringBackend>,
        view: Arc<dyn ReportView>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            backend,
            view,
            store,
        }
    }

    /// Use the given token, or fall back to the one stored by the last practice session
    pub async fn resolve_token(&self, explicit: Option<&str>) -> SessionResult<SessionToken> {
        let raw = match explicit {
            Some(raw) => raw.to_string(),
            None => self
                .store
                .get(SESSION_KEY)
                .await
                .map_err(|e| self.fail(SessionError::Storage(format!("{:#}", e))))?
                .ok_or_else(|| self.fail(SessionError::NoStoredSession))?,
        };

        SessionToken::parse(&raw).ok_or_else(|| self.fail(SessionError::InvalidToken(raw)))
    }

    /// Metrics, then the composite report, then render it
    pub async fn run(&self, session_id: &SessionToken) -> SessionResult<FinalReport> {
        info!("Building final report for session {}", session_id);

        let metrics = self
            .backend
            .results(session_id.as_str())
            .await
            .map_err(|e| self.fail(e.into()))?;

        if metrics.is_empty() {
            return Err(self.fail(SessionError::MetricsUnavailable(session_id.to_string())));
        }

        let request = FinalResultsRequest::from_metrics(&metrics).map_err(|e| self.fail(e))?;

        let report = self
            .backend
            .final_results(&request)
            .await
            .map_err(|e| self.fail(e.into()))?;

        info!(
            "Final report for {}: score={:?} verdict={:?}",
            session_id, report.fluency_score, report.verdict
        );
        self.view.show_report(&report);

        Ok(report)
    }

    fn fail(&self, error: SessionError) -> SessionError {
        error!("Final report failed: {}", error);
        self.view.show_error(&error);
        error
    }
}
