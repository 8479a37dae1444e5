//! Configured HTTP client: the single point of outbound request setup.
//!
//! Every request reads the persisted token and attaches it as
//! `Authorization: Token <value>`. A 401 on any response clears the persisted
//! session, fires the registered teardown hook once, and surfaces
//! `ApiError::Unauthorized`; every other error propagates to the caller
//! unmodified. Idempotent GETs go through a bounded retry policy; mutations
//! are never retried.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::store::SessionStore;
use crate::types::{FilterParams, ListResponse};

/// Callback fired when a 401 tears the session down (the SPA equivalent of
/// the redirect-to-login). Registered by the session layer.
pub type UnauthorizedHook = Box<dyn Fn() + Send + Sync>;

/// Retry policy for idempotent reads. Exponential backoff with jitter,
/// honoring `Retry-After` when the server sends one.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 250,
            max_backoff_ms: 2_000,
        }
    }
}

fn retry_delay(attempt: u32, policy: &RetryPolicy, retry_after: Option<&reqwest::header::HeaderValue>) -> Duration {
    if let Some(value) = retry_after.and_then(|v| v.to_str().ok()) {
        if let Ok(secs) = value.parse::<u64>() {
            return Duration::from_secs(secs.min(30));
        }
    }

    let exponent = 2u64.saturating_pow(attempt.saturating_sub(1));
    let base = policy
        .initial_backoff_ms
        .saturating_mul(exponent)
        .min(policy.max_backoff_ms);
    let jitter = (std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64)
        .unwrap_or(0))
        % 150;
    Duration::from_millis(base.saturating_add(jitter))
}

pub struct HttpClient {
    inner: reqwest::Client,
    config: ApiConfig,
    store: SessionStore,
    retry: RetryPolicy,
    on_unauthorized: parking_lot::RwLock<Option<UnauthorizedHook>>,
}

impl HttpClient {
    /// Build the client. Fails only when the TLS backend cannot be
    /// initialized; that error is surfaced rather than papered over.
    pub fn new(config: ApiConfig, store: SessionStore) -> Result<Self, ApiError> {
        let inner = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(ApiError::from)?;
        Ok(Self {
            inner,
            config,
            store,
            retry: RetryPolicy::default(),
            on_unauthorized: parking_lot::RwLock::new(None),
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Register the session-teardown hook fired on 401.
    pub fn set_unauthorized_hook(&self, hook: UnauthorizedHook) {
        *self.on_unauthorized.write() = Some(hook);
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.store.token() {
            Some(token) => request.header("Authorization", format!("Token {}", token)),
            None => request,
        }
    }

    /// 401 teardown. Fires the hook only when a token was actually cleared,
    /// so overlapping 401s from concurrent requests tear down exactly once.
    fn handle_unauthorized(&self) {
        if self.store.token().is_none() {
            return;
        }
        log::warn!("Received 401; clearing persisted session");
        self.store.clear();
        if let Some(hook) = self.on_unauthorized.read().as_ref() {
            hook();
        }
    }

    async fn read_error(&self, response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_response_parts(status, &body);
        if matches!(err, ApiError::Unauthorized) {
            self.handle_unauthorized();
        }
        err
    }

    async fn decode<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T, ApiError> {
        if !response.status().is_success() {
            return Err(self.read_error(response).await);
        }
        let body = response.text().await.map_err(ApiError::from)?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(format!("{}: {}", e, truncated(&body))))
    }

    /// Send an idempotent request with the retry policy. Mutations never
    /// come through here.
    async fn send_idempotent(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let attempts = self.retry.max_attempts.max(1);
        for attempt in 1..=attempts {
            let Some(cloned) = request.try_clone() else {
                return request.send().await.map_err(ApiError::from);
            };

            match cloned.send().await {
                Ok(response) => {
                    let status = response.status();
                    let retryable = status.as_u16() >= 500
                        || status == reqwest::StatusCode::TOO_MANY_REQUESTS
                        || status == reqwest::StatusCode::REQUEST_TIMEOUT;
                    if retryable && attempt < attempts {
                        let delay = retry_delay(
                            attempt,
                            &self.retry,
                            response.headers().get(reqwest::header::RETRY_AFTER),
                        );
                        log::warn!(
                            "retry {}/{} after status {} (sleep {:?})",
                            attempt,
                            attempts,
                            status,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Ok(response);
                }
                Err(err) => {
                    let retryable_transport = err.is_timeout() || err.is_connect();
                    if retryable_transport && attempt < attempts {
                        let delay = retry_delay(attempt, &self.retry, None);
                        log::warn!(
                            "retry {}/{} after transport error: {} (sleep {:?})",
                            attempt,
                            attempts,
                            err,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(ApiError::from(err));
                }
            }
        }
        Err(ApiError::Transport("request exhausted retries".to_string()))
    }

    // ------------------------------------------------------------------
    // Verbs
    // ------------------------------------------------------------------

    /// GET a single resource.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.apply_auth(self.inner.get(self.config.endpoint(path)));
        let response = self.send_idempotent(request).await?;
        self.decode(response).await
    }

    /// GET a single resource with query parameters (reporting windows,
    /// detail filters).
    pub async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        filter: &FilterParams,
    ) -> Result<T, ApiError> {
        let mut request = self.inner.get(self.config.endpoint(path));
        let query = filter.to_query();
        if !query.is_empty() {
            request = request.query(&query);
        }
        let request = self.apply_auth(request);
        let response = self.send_idempotent(request).await?;
        self.decode(response).await
    }

    /// GET a collection, normalizing bare-array and paginated shapes.
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        filter: &FilterParams,
    ) -> Result<Vec<T>, ApiError> {
        let mut request = self.inner.get(self.config.endpoint(path));
        let query = filter.to_query();
        if !query.is_empty() {
            request = request.query(&query);
        }
        let request = self.apply_auth(request);
        let response = self.send_idempotent(request).await?;
        let list: ListResponse<T> = self.decode(response).await?;
        Ok(list.into_vec())
    }

    /// POST a JSON body; returns the created/affected record.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self
            .apply_auth(self.inner.post(self.config.endpoint(path)))
            .json(body);
        let response = request.send().await.map_err(ApiError::from)?;
        self.decode(response).await
    }

    /// POST with an empty body — action endpoints (`complete`, `activate`…).
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.apply_auth(self.inner.post(self.config.endpoint(path)));
        let response = request.send().await.map_err(ApiError::from)?;
        self.decode(response).await
    }

    /// POST with a longer deadline, for AI agent queries.
    pub async fn post_slow<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self
            .apply_auth(self.inner.post(self.config.endpoint(path)))
            .timeout(self.config.ai_timeout)
            .json(body);
        let response = request.send().await.map_err(ApiError::from)?;
        self.decode(response).await
    }

    /// PATCH partial update; unspecified fields are preserved server-side.
    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self
            .apply_auth(self.inner.patch(self.config.endpoint(path)))
            .json(body);
        let response = request.send().await.map_err(ApiError::from)?;
        self.decode(response).await
    }

    /// DELETE; success bodies (200 or 204) are discarded.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self.apply_auth(self.inner.delete(self.config.endpoint(path)));
        let response = request.send().await.map_err(ApiError::from)?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.read_error(response).await)
        }
    }

    /// Multipart POST for attachment upload.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        let request = self
            .apply_auth(self.inner.post(self.config.endpoint(path)))
            .multipart(form);
        let response = request.send().await.map_err(ApiError::from)?;
        self.decode(response).await
    }
}

fn truncated(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PersistedSession;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn client_with_store(dir: &std::path::Path) -> HttpClient {
        HttpClient::new(
            ApiConfig::with_base_url("http://localhost:1"),
            SessionStore::with_dir(dir),
        )
        .unwrap()
    }

    #[test]
    fn unauthorized_teardown_fires_hook_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let client = client_with_store(dir.path());
        client
            .store()
            .save(&PersistedSession {
                auth_token: "tok".into(),
                user: None,
            })
            .unwrap();

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        client.set_unauthorized_hook(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        // Two 401s in a row, as overlapping requests would produce.
        client.handle_unauthorized();
        client.handle_unauthorized();

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(client.store().token().is_none());
    }

    #[test]
    fn teardown_without_token_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let client = client_with_store(dir.path());

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        client.set_unauthorized_hook(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        client.handle_unauthorized();
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn retry_delay_honors_retry_after_header() {
        let policy = RetryPolicy::default();
        let header = reqwest::header::HeaderValue::from_static("3");
        let delay = retry_delay(1, &policy, Some(&header));
        assert_eq!(delay, Duration::from_secs(3));
    }

    #[test]
    fn retry_delay_backs_off_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 5,
            initial_backoff_ms: 100,
            max_backoff_ms: 400,
        };
        let first = retry_delay(1, &policy, None);
        let third = retry_delay(3, &policy, None);
        assert!(first >= Duration::from_millis(100));
        // Cap plus at most 150ms of jitter.
        assert!(third <= Duration::from_millis(400 + 150));
    }
}
