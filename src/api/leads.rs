use std::sync::Arc;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{ConversionOutcome, FilterParams, Lead, LeadForm};

/// `/leads/` — inbound prospects, convertible into contacts.
pub struct Leads {
    http: Arc<HttpClient>,
}

impl Leads {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(&self, filter: &FilterParams) -> Result<Vec<Lead>, ApiError> {
        self.http.get_list("/leads/", filter).await
    }

    pub async fn get(&self, id: i64) -> Result<Lead, ApiError> {
        self.http.get(&format!("/leads/{}/", id)).await
    }

    pub async fn create(&self, form: &LeadForm) -> Result<Lead, ApiError> {
        self.http.post("/leads/", form).await
    }

    pub async fn update(&self, id: i64, form: &LeadForm) -> Result<Lead, ApiError> {
        self.http.patch(&format!("/leads/{}/", id), form).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.http.delete(&format!("/leads/{}/", id)).await
    }

    /// Promote a lead to a contact. The server creates the contact and marks
    /// the lead converted; `contact_id` is set when the backend reports it.
    pub async fn convert(&self, id: i64) -> Result<ConversionOutcome, ApiError> {
        self.http.post_empty(&format!("/leads/{}/convert/", id)).await
    }
}
