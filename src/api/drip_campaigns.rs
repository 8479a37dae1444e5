use std::sync::Arc;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{DripCampaign, DripCampaignForm, FilterParams};

/// `/drip-campaigns/` — automated email sequences. The client only manages
/// definitions and lifecycle; execution runs server-side.
pub struct DripCampaigns {
    http: Arc<HttpClient>,
}

impl DripCampaigns {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(&self, filter: &FilterParams) -> Result<Vec<DripCampaign>, ApiError> {
        self.http.get_list("/drip-campaigns/", filter).await
    }

    pub async fn get(&self, id: i64) -> Result<DripCampaign, ApiError> {
        self.http.get(&format!("/drip-campaigns/{}/", id)).await
    }

    pub async fn create(&self, form: &DripCampaignForm) -> Result<DripCampaign, ApiError> {
        self.http.post("/drip-campaigns/", form).await
    }

    pub async fn update(&self, id: i64, form: &DripCampaignForm) -> Result<DripCampaign, ApiError> {
        self.http
            .patch(&format!("/drip-campaigns/{}/", id), form)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.http.delete(&format!("/drip-campaigns/{}/", id)).await
    }

    pub async fn activate(&self, id: i64) -> Result<DripCampaign, ApiError> {
        self.http
            .post_empty(&format!("/drip-campaigns/{}/activate/", id))
            .await
    }

    pub async fn pause(&self, id: i64) -> Result<DripCampaign, ApiError> {
        self.http
            .post_empty(&format!("/drip-campaigns/{}/pause/", id))
            .await
    }
}
