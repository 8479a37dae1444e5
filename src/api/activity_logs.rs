use std::sync::Arc;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{ActivityLog, FilterParams};

/// `/activity-logs/` — the server-generated audit feed. Read-only; entries
/// appear as a side effect of other mutations.
pub struct ActivityLogs {
    http: Arc<HttpClient>,
}

impl ActivityLogs {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(&self, filter: &FilterParams) -> Result<Vec<ActivityLog>, ApiError> {
        self.http.get_list("/activity-logs/", filter).await
    }
}
