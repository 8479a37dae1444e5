use std::sync::Arc;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{FilterParams, Invoice, InvoiceForm};

/// `/invoices/` — billing documents with line items.
pub struct Invoices {
    http: Arc<HttpClient>,
}

impl Invoices {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(&self, filter: &FilterParams) -> Result<Vec<Invoice>, ApiError> {
        self.http.get_list("/invoices/", filter).await
    }

    pub async fn get(&self, id: i64) -> Result<Invoice, ApiError> {
        self.http.get(&format!("/invoices/{}/", id)).await
    }

    pub async fn create(&self, form: &InvoiceForm) -> Result<Invoice, ApiError> {
        self.http.post("/invoices/", form).await
    }

    pub async fn update(&self, id: i64, form: &InvoiceForm) -> Result<Invoice, ApiError> {
        self.http.patch(&format!("/invoices/{}/", id), form).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.http.delete(&format!("/invoices/{}/", id)).await
    }

    pub async fn mark_sent(&self, id: i64) -> Result<Invoice, ApiError> {
        self.http
            .post_empty(&format!("/invoices/{}/mark_sent/", id))
            .await
    }

    pub async fn mark_paid(&self, id: i64) -> Result<Invoice, ApiError> {
        self.http
            .post_empty(&format!("/invoices/{}/mark_paid/", id))
            .await
    }
}
