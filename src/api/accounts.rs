use std::sync::Arc;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{Account, AccountForm, FilterParams};

/// `/accounts/` — companies.
pub struct Accounts {
    http: Arc<HttpClient>,
}

impl Accounts {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(&self, filter: &FilterParams) -> Result<Vec<Account>, ApiError> {
        self.http.get_list("/accounts/", filter).await
    }

    pub async fn get(&self, id: i64) -> Result<Account, ApiError> {
        self.http.get(&format!("/accounts/{}/", id)).await
    }

    pub async fn create(&self, form: &AccountForm) -> Result<Account, ApiError> {
        self.http.post("/accounts/", form).await
    }

    pub async fn update(&self, id: i64, form: &AccountForm) -> Result<Account, ApiError> {
        self.http.patch(&format!("/accounts/{}/", id), form).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.http.delete(&format!("/accounts/{}/", id)).await
    }
}
