use std::sync::Arc;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{FilterParams, Task, TaskForm};

/// `/tasks/` — to-dos attached to leads, contacts, or deals.
pub struct Tasks {
    http: Arc<HttpClient>,
}

impl Tasks {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(&self, filter: &FilterParams) -> Result<Vec<Task>, ApiError> {
        self.http.get_list("/tasks/", filter).await
    }

    pub async fn get(&self, id: i64) -> Result<Task, ApiError> {
        self.http.get(&format!("/tasks/{}/", id)).await
    }

    pub async fn create(&self, form: &TaskForm) -> Result<Task, ApiError> {
        self.http.post("/tasks/", form).await
    }

    pub async fn update(&self, id: i64, form: &TaskForm) -> Result<Task, ApiError> {
        self.http.patch(&format!("/tasks/{}/", id), form).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.http.delete(&format!("/tasks/{}/", id)).await
    }

    pub async fn complete(&self, id: i64) -> Result<Task, ApiError> {
        self.http.post_empty(&format!("/tasks/{}/complete/", id)).await
    }
}
