use std::sync::Arc;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{Contact, ContactForm, ConversionOutcome, FilterParams};

/// `/contacts/` — people, optionally linked to an account.
pub struct Contacts {
    http: Arc<HttpClient>,
}

impl Contacts {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(&self, filter: &FilterParams) -> Result<Vec<Contact>, ApiError> {
        self.http.get_list("/contacts/", filter).await
    }

    pub async fn get(&self, id: i64) -> Result<Contact, ApiError> {
        self.http.get(&format!("/contacts/{}/", id)).await
    }

    pub async fn create(&self, form: &ContactForm) -> Result<Contact, ApiError> {
        self.http.post("/contacts/", form).await
    }

    pub async fn update(&self, id: i64, form: &ContactForm) -> Result<Contact, ApiError> {
        self.http.patch(&format!("/contacts/{}/", id), form).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.http.delete(&format!("/contacts/{}/", id)).await
    }

    /// Create a contact from an unconverted lead. Contacts-side twin of
    /// [`crate::api::leads::Leads::convert`], for flows that start from the
    /// contact list; both invalidate leads and contacts alike.
    pub async fn convert_from_lead(&self, lead_id: i64) -> Result<ConversionOutcome, ApiError> {
        self.http
            .post(
                "/contacts/convert_from_lead/",
                &serde_json::json!({ "lead_id": lead_id }),
            )
            .await
    }
}
