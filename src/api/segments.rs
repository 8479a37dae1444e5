use std::sync::Arc;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{FilterParams, Segment, SegmentForm, SegmentSize};

/// `/segments/` — saved contact filters for targeting.
pub struct Segments {
    http: Arc<HttpClient>,
}

impl Segments {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(&self, filter: &FilterParams) -> Result<Vec<Segment>, ApiError> {
        self.http.get_list("/segments/", filter).await
    }

    pub async fn get(&self, id: i64) -> Result<Segment, ApiError> {
        self.http.get(&format!("/segments/{}/", id)).await
    }

    pub async fn create(&self, form: &SegmentForm) -> Result<Segment, ApiError> {
        self.http.post("/segments/", form).await
    }

    pub async fn update(&self, id: i64, form: &SegmentForm) -> Result<Segment, ApiError> {
        self.http.patch(&format!("/segments/{}/", id), form).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.http.delete(&format!("/segments/{}/", id)).await
    }

    /// Recount members against the current filter conditions.
    pub async fn calculate_size(&self, id: i64) -> Result<SegmentSize, ApiError> {
        self.http
            .post_empty(&format!("/segments/{}/calculate_size/", id))
            .await
    }
}
