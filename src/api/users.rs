use std::sync::Arc;

use serde::Serialize;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{FilterParams, User};

/// Partial profile update; unspecified fields keep their server values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// `/users/` — teammates; read-mostly, plus own-profile updates.
pub struct Users {
    http: Arc<HttpClient>,
}

impl Users {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(&self, filter: &FilterParams) -> Result<Vec<User>, ApiError> {
        self.http.get_list("/users/", filter).await
    }

    pub async fn get(&self, id: i64) -> Result<User, ApiError> {
        self.http.get(&format!("/users/{}/", id)).await
    }

    /// The signed-in user's profile.
    pub async fn me(&self) -> Result<User, ApiError> {
        self.http.get("/users/profile/").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.http.patch("/users/profile/", update).await
    }
}
