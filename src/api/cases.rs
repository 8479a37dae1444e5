use std::sync::Arc;

use serde_json::json;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{CaseForm, CaseRecord, FilterParams};

/// `/cases/` — support cases.
pub struct Cases {
    http: Arc<HttpClient>,
}

impl Cases {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(&self, filter: &FilterParams) -> Result<Vec<CaseRecord>, ApiError> {
        self.http.get_list("/cases/", filter).await
    }

    pub async fn get(&self, id: i64) -> Result<CaseRecord, ApiError> {
        self.http.get(&format!("/cases/{}/", id)).await
    }

    pub async fn create(&self, form: &CaseForm) -> Result<CaseRecord, ApiError> {
        self.http.post("/cases/", form).await
    }

    pub async fn update(&self, id: i64, form: &CaseForm) -> Result<CaseRecord, ApiError> {
        self.http.patch(&format!("/cases/{}/", id), form).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.http.delete(&format!("/cases/{}/", id)).await
    }

    /// Close with a resolution summary.
    pub async fn close(&self, id: i64, resolution: &str) -> Result<CaseRecord, ApiError> {
        self.http
            .post(
                &format!("/cases/{}/close/", id),
                &json!({ "resolution": resolution }),
            )
            .await
    }
}
