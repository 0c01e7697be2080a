use std::sync::Arc;

use tracing::{error, info, warn};

use crate::backend::{NormalizedMetrics, ScoringBackend};
use crate::error::{SessionError, SessionResult};
use crate::session::SessionToken;
use crate::store::{SessionStore, SESSION_KEY};
use crate::view::PracticeView;

/// Fetches a finished session's metrics and publishes them to the practice page
pub struct ResultsAggregator {
    backend: Arc<dyn ScoringBackend>,
    view: Arc<dyn PracticeView>,
    store: Arc<dyn SessionStore>,
}

impl ResultsAggregator {
    pub fn new(
        backend: Arc<dyn ScoringBackend>,
        view: Arc<dyn PracticeView>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            backend,
            view,
            store,
        }
    }

    /// Load metrics, draw them, persist the token and offer the final report.
    ///
    /// On failure nothing is drawn, the proceed action stays unavailable,
    /// and the error is shown and returned.
    pub async fn fetch_results(&self, session_id: &SessionToken) -> SessionResult<NormalizedMetrics> {
        let metrics = match self.backend.results(session_id.as_str()).await {
            Ok(metrics) if metrics.is_empty() => {
                Err(SessionError::MetricsUnavailable(session_id.to_string()))
            }
            Ok(metrics) => Ok(metrics),
            Err(e) => Err(SessionError::Backend(e)),
        };

        let metrics = match metrics {
            Ok(metrics) => metrics,
            Err(e) => {
                error!("Failed to load results for session {}: {}", session_id, e);
                self.view.show_error(&e);
                return Err(e);
            }
        };

        info!(
            "Session {} results: {} metrics",
            session_id,
            metrics.entries().len()
        );
        self.view.show_metrics(&metrics);

        // The stored token only enables deep-linking; the results stand without it
        if let Err(e) = self.store.set(SESSION_KEY, session_id.as_str()).await {
            warn!("Failed to persist session token: {:#}", e);
            self.view.show_error(&SessionError::Storage(format!("{:#}", e)));
        }

        self.view.offer_final_report(session_id);
        Ok(metrics)
    }
}
