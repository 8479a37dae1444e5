use std::sync::Arc;

use serde_json::json;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{
    AiAnswer, AiInsight, AiMessage, AiQuery, AiSuggestion, FilterParams, ListResponse,
};

/// AI endpoints, versioned separately from the core collections
/// (`/v1/ai-agent/`, `/v1/ai-insights/`).
pub struct Ai {
    http: Arc<HttpClient>,
}

impl Ai {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Free-text question against the agent. Runs with the long deadline;
    /// agent answers routinely exceed the standard request timeout.
    pub async fn query(
        &self,
        query: &str,
        history: Option<Vec<AiMessage>>,
    ) -> Result<AiAnswer, ApiError> {
        let body = AiQuery {
            query: query.to_string(),
            conversation_history: history,
        };
        self.http.post_slow("/v1/ai-agent/query/", &body).await
    }

    /// Canned starter prompts for an empty conversation. A POST on the
    /// backend despite being a read.
    pub async fn suggestions(&self) -> Result<Vec<AiSuggestion>, ApiError> {
        let list: ListResponse<AiSuggestion> =
            self.http.post_empty("/v1/ai-agent/suggestions/").await?;
        Ok(list.into_vec())
    }

    pub async fn insights(&self, filter: &FilterParams) -> Result<Vec<AiInsight>, ApiError> {
        self.http.get_list("/v1/ai-insights/", filter).await
    }

    pub async fn mark_read(&self, id: i64) -> Result<AiInsight, ApiError> {
        self.http
            .post_empty(&format!("/v1/ai-insights/{}/mark_read/", id))
            .await
    }

    pub async fn generate_lead_score(&self, lead_id: i64) -> Result<AiInsight, ApiError> {
        self.http
            .post(
                "/v1/ai-insights/generate_lead_score/",
                &json!({ "lead_id": lead_id }),
            )
            .await
    }

    pub async fn generate_deal_prediction(
        &self,
        opportunity_id: i64,
    ) -> Result<AiInsight, ApiError> {
        self.http
            .post(
                "/v1/ai-insights/generate_deal_prediction/",
                &json!({ "opportunity_id": opportunity_id }),
            )
            .await
    }
}
