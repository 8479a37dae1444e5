use std::sync::Arc;

use serde_json::json;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{FilterParams, Team, TeamForm};

/// `/teams/` — user groups with explicit membership.
pub struct Teams {
    http: Arc<HttpClient>,
}

impl Teams {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(&self, filter: &FilterParams) -> Result<Vec<Team>, ApiError> {
        self.http.get_list("/teams/", filter).await
    }

    pub async fn get(&self, id: i64) -> Result<Team, ApiError> {
        self.http.get(&format!("/teams/{}/", id)).await
    }

    pub async fn create(&self, form: &TeamForm) -> Result<Team, ApiError> {
        self.http.post("/teams/", form).await
    }

    pub async fn update(&self, id: i64, form: &TeamForm) -> Result<Team, ApiError> {
        self.http.patch(&format!("/teams/{}/", id), form).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.http.delete(&format!("/teams/{}/", id)).await
    }

    pub async fn add_member(&self, id: i64, user_id: i64) -> Result<Team, ApiError> {
        self.http
            .post(
                &format!("/teams/{}/add_member/", id),
                &json!({ "user_id": user_id }),
            )
            .await
    }

    pub async fn remove_member(&self, id: i64, user_id: i64) -> Result<Team, ApiError> {
        self.http
            .post(
                &format!("/teams/{}/remove_member/", id),
                &json!({ "user_id": user_id }),
            )
            .await
    }
}
