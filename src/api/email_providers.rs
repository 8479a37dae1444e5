use std::sync::Arc;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{EmailProvider, EmailProviderForm, EmailProviderStats, FilterParams};

/// `/email-providers/` — outbound mail configuration. Provider secrets are
/// write-only; the server never echoes them back.
pub struct EmailProviders {
    http: Arc<HttpClient>,
}

impl EmailProviders {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(&self, filter: &FilterParams) -> Result<Vec<EmailProvider>, ApiError> {
        self.http.get_list("/email-providers/", filter).await
    }

    pub async fn get(&self, id: i64) -> Result<EmailProvider, ApiError> {
        self.http.get(&format!("/email-providers/{}/", id)).await
    }

    pub async fn create(&self, form: &EmailProviderForm) -> Result<EmailProvider, ApiError> {
        self.http.post("/email-providers/", form).await
    }

    pub async fn update(&self, id: i64, form: &EmailProviderForm) -> Result<EmailProvider, ApiError> {
        self.http
            .patch(&format!("/email-providers/{}/", id), form)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.http.delete(&format!("/email-providers/{}/", id)).await
    }

    /// Ask the server to check the stored credentials against the provider.
    pub async fn verify(&self, id: i64) -> Result<EmailProvider, ApiError> {
        self.http
            .post_empty(&format!("/email-providers/{}/verify/", id))
            .await
    }

    pub async fn test_send(&self, id: i64, to: &str) -> Result<serde_json::Value, ApiError> {
        self.http
            .post(
                &format!("/email-providers/{}/test_send/", id),
                &serde_json::json!({ "to": to }),
            )
            .await
    }

    pub async fn toggle_active(&self, id: i64) -> Result<EmailProvider, ApiError> {
        self.http
            .post_empty(&format!("/email-providers/{}/toggle_active/", id))
            .await
    }

    pub async fn stats(&self, id: i64) -> Result<EmailProviderStats, ApiError> {
        self.http
            .get(&format!("/email-providers/{}/stats/", id))
            .await
    }
}
