use std::sync::Arc;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{FilterParams, Webhook, WebhookForm, WebhookTestResult};

/// `/webhooks/` — outbound event subscriptions.
pub struct Webhooks {
    http: Arc<HttpClient>,
}

impl Webhooks {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(&self, filter: &FilterParams) -> Result<Vec<Webhook>, ApiError> {
        self.http.get_list("/webhooks/", filter).await
    }

    pub async fn get(&self, id: i64) -> Result<Webhook, ApiError> {
        self.http.get(&format!("/webhooks/{}/", id)).await
    }

    pub async fn create(&self, form: &WebhookForm) -> Result<Webhook, ApiError> {
        self.http.post("/webhooks/", form).await
    }

    pub async fn update(&self, id: i64, form: &WebhookForm) -> Result<Webhook, ApiError> {
        self.http.patch(&format!("/webhooks/{}/", id), form).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.http.delete(&format!("/webhooks/{}/", id)).await
    }

    /// Fire a test delivery at the configured URL.
    pub async fn test(&self, id: i64) -> Result<WebhookTestResult, ApiError> {
        self.http
            .post_empty(&format!("/webhooks/{}/test/", id))
            .await
    }
}
