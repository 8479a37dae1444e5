use std::sync::Arc;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{FilterParams, Note, NoteForm};

/// `/notes/` — timeline notes on a lead, contact, or deal. List calls are
/// expected to carry a parent filter (`FilterParams::for_lead` and friends).
pub struct Notes {
    http: Arc<HttpClient>,
}

impl Notes {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(&self, filter: &FilterParams) -> Result<Vec<Note>, ApiError> {
        self.http.get_list("/notes/", filter).await
    }

    pub async fn create(&self, form: &NoteForm) -> Result<Note, ApiError> {
        self.http.post("/notes/", form).await
    }

    pub async fn update(&self, id: i64, form: &NoteForm) -> Result<Note, ApiError> {
        self.http.patch(&format!("/notes/{}/", id), form).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.http.delete(&format!("/notes/{}/", id)).await
    }
}
