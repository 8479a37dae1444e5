use std::sync::Arc;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{FilterParams, Opportunity, OpportunityForm, PipelineStage};

/// `/opportunities/` — deals moving through the pipeline.
pub struct Opportunities {
    http: Arc<HttpClient>,
}

impl Opportunities {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(&self, filter: &FilterParams) -> Result<Vec<Opportunity>, ApiError> {
        self.http.get_list("/opportunities/", filter).await
    }

    pub async fn get(&self, id: i64) -> Result<Opportunity, ApiError> {
        self.http.get(&format!("/opportunities/{}/", id)).await
    }

    pub async fn create(&self, form: &OpportunityForm) -> Result<Opportunity, ApiError> {
        self.http.post("/opportunities/", form).await
    }

    pub async fn update(&self, id: i64, form: &OpportunityForm) -> Result<Opportunity, ApiError> {
        self.http.patch(&format!("/opportunities/{}/", id), form).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.http.delete(&format!("/opportunities/{}/", id)).await
    }

    /// Stage definitions, ordered by pipeline position.
    pub async fn pipeline_stages(&self) -> Result<Vec<PipelineStage>, ApiError> {
        self.http
            .get_list("/pipeline-stages/", &FilterParams::default())
            .await
    }
}
