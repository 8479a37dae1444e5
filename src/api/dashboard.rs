use std::sync::Arc;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{DashboardData, DashboardStats};

/// `/dashboard/` — rollups for the home screen.
pub struct Dashboard {
    http: Arc<HttpClient>,
}

impl Dashboard {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Stats plus recent and upcoming records, in one round trip.
    pub async fn data(&self) -> Result<DashboardData, ApiError> {
        self.http.get("/dashboard/").await
    }

    pub async fn stats(&self) -> Result<DashboardStats, ApiError> {
        self.http.get("/dashboard/stats/").await
    }
}
