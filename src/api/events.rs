use std::sync::Arc;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{EventForm, EventRecord, FilterParams};

/// `/events/` — calendar entries with attendees.
pub struct Events {
    http: Arc<HttpClient>,
}

impl Events {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(&self, filter: &FilterParams) -> Result<Vec<EventRecord>, ApiError> {
        self.http.get_list("/events/", filter).await
    }

    pub async fn get(&self, id: i64) -> Result<EventRecord, ApiError> {
        self.http.get(&format!("/events/{}/", id)).await
    }

    pub async fn create(&self, form: &EventForm) -> Result<EventRecord, ApiError> {
        self.http.post("/events/", form).await
    }

    pub async fn update(&self, id: i64, form: &EventForm) -> Result<EventRecord, ApiError> {
        self.http.patch(&format!("/events/{}/", id), form).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.http.delete(&format!("/events/{}/", id)).await
    }
}
