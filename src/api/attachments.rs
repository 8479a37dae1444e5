use std::sync::Arc;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{Attachment, FilterParams};

/// File ready for upload, with at most one parent reference set.
#[derive(Debug, Clone, Default)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub lead: Option<i64>,
    pub contact: Option<i64>,
    pub deal: Option<i64>,
}

/// `/attachments/` — files on a record's timeline. Upload is multipart;
/// everything else is plain JSON.
pub struct Attachments {
    http: Arc<HttpClient>,
}

impl Attachments {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(&self, filter: &FilterParams) -> Result<Vec<Attachment>, ApiError> {
        self.http.get_list("/attachments/", filter).await
    }

    pub async fn upload(&self, upload: AttachmentUpload) -> Result<Attachment, ApiError> {
        let part = reqwest::multipart::Part::bytes(upload.bytes).file_name(upload.file_name);
        let mut form = reqwest::multipart::Form::new().part("file", part);
        if let Some(id) = upload.lead {
            form = form.text("lead", id.to_string());
        }
        if let Some(id) = upload.contact {
            form = form.text("contact", id.to_string());
        }
        if let Some(id) = upload.deal {
            form = form.text("deal", id.to_string());
        }
        self.http.post_multipart("/attachments/", form).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.http.delete(&format!("/attachments/{}/", id)).await
    }
}
