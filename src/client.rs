//! The client context: one object tying config, transport, cache, and
//! session together. Constructed once per signed-in session; tests build
//! many independent ones.

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api;
use crate::cache::{QueryCache, QueryKey};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::HttpClient;
use crate::invalidation::Mutation;
use crate::session::{HttpAuthTransport, Session};
use crate::store::SessionStore;
use crate::types::FilterParams;

pub struct CrmClient {
    http: Arc<HttpClient>,
    cache: Arc<QueryCache>,
    session: Arc<Session>,
}

impl CrmClient {
    /// Client rooted at the default state directory.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        Self::with_store(config, SessionStore::new())
    }

    /// Client with an explicit session store, used by tests to isolate
    /// state directories.
    pub fn with_store(config: ApiConfig, store: SessionStore) -> Result<Self, ApiError> {
        let http = Arc::new(HttpClient::new(config, store.clone())?);
        let cache = Arc::new(QueryCache::new());
        let session = Arc::new(Session::new(
            store,
            Arc::new(HttpAuthTransport::new(http.clone())),
        ));

        // A 401 anywhere tears down the session and empties the cache;
        // the persisted token is already gone by the time the hook fires.
        {
            let session = session.clone();
            let cache = cache.clone();
            http.set_unauthorized_hook(Box::new(move || {
                session.handle_unauthorized();
                cache.clear();
            }));
        }

        Ok(Self {
            http,
            cache,
            session,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        self.http.config()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Cached list fetch. The resource name doubles as the collection path
    /// segment, so `query("leads", f)` reads `/leads/` under the key
    /// `leads?<canonical filter>`.
    pub async fn query<T>(
        &self,
        resource: &'static str,
        filter: &FilterParams,
    ) -> Result<Vec<T>, ApiError>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
    {
        let key = QueryKey::new(resource, filter);
        let http = self.http.clone();
        let path = format!("/{}/", resource);
        let filter = filter.clone();
        self.cache
            .fetch(key, move || async move { http.get_list(&path, &filter).await })
            .await
    }

    /// The single write path: run the operation, then invalidate every
    /// resource in the mutation's declared affects-set. Queries issued after
    /// a successful mutation therefore always refetch.
    pub async fn mutate<T, Fut>(&self, mutation: Mutation, op: Fut) -> Result<T, ApiError>
    where
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let out = op.await?;
        for resource in mutation.affects() {
            self.cache.invalidate(resource);
        }
        Ok(out)
    }

    /// Sign out and drop everything cached under the old session.
    pub async fn logout(&self) {
        self.session.logout().await;
        self.cache.clear();
    }

    // Typed resource endpoints. Handles are cheap (one Arc clone).

    pub fn leads(&self) -> api::leads::Leads {
        api::leads::Leads::new(self.http.clone())
    }

    pub fn contacts(&self) -> api::contacts::Contacts {
        api::contacts::Contacts::new(self.http.clone())
    }

    pub fn accounts(&self) -> api::accounts::Accounts {
        api::accounts::Accounts::new(self.http.clone())
    }

    pub fn opportunities(&self) -> api::opportunities::Opportunities {
        api::opportunities::Opportunities::new(self.http.clone())
    }

    pub fn tasks(&self) -> api::tasks::Tasks {
        api::tasks::Tasks::new(self.http.clone())
    }

    pub fn cases(&self) -> api::cases::Cases {
        api::cases::Cases::new(self.http.clone())
    }

    pub fn invoices(&self) -> api::invoices::Invoices {
        api::invoices::Invoices::new(self.http.clone())
    }

    pub fn events(&self) -> api::events::Events {
        api::events::Events::new(self.http.clone())
    }

    pub fn users(&self) -> api::users::Users {
        api::users::Users::new(self.http.clone())
    }

    pub fn teams(&self) -> api::teams::Teams {
        api::teams::Teams::new(self.http.clone())
    }

    pub fn notes(&self) -> api::notes::Notes {
        api::notes::Notes::new(self.http.clone())
    }

    pub fn attachments(&self) -> api::attachments::Attachments {
        api::attachments::Attachments::new(self.http.clone())
    }

    pub fn activity_logs(&self) -> api::activity_logs::ActivityLogs {
        api::activity_logs::ActivityLogs::new(self.http.clone())
    }

    pub fn dashboard(&self) -> api::dashboard::Dashboard {
        api::dashboard::Dashboard::new(self.http.clone())
    }

    pub fn email_providers(&self) -> api::email_providers::EmailProviders {
        api::email_providers::EmailProviders::new(self.http.clone())
    }

    pub fn email_analytics(&self) -> api::email_analytics::EmailAnalytics {
        api::email_analytics::EmailAnalytics::new(self.http.clone())
    }

    pub fn drip_campaigns(&self) -> api::drip_campaigns::DripCampaigns {
        api::drip_campaigns::DripCampaigns::new(self.http.clone())
    }

    pub fn segments(&self) -> api::segments::Segments {
        api::segments::Segments::new(self.http.clone())
    }

    pub fn webhooks(&self) -> api::webhooks::Webhooks {
        api::webhooks::Webhooks::new(self.http.clone())
    }

    pub fn ai(&self) -> api::ai::Ai {
        api::ai::Ai::new(self.http.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invalidation::resource;
    use crate::types::Lead;
    use tempfile::TempDir;

    fn client_in(dir: &TempDir) -> CrmClient {
        CrmClient::with_store(
            ApiConfig::with_base_url("http://localhost:8000/api"),
            SessionStore::with_dir(dir.path()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn mutation_invalidates_cached_queries() {
        let dir = TempDir::new().unwrap();
        let client = client_in(&dir);

        // Seed the cache through the key convention without a server.
        let key = QueryKey::new(resource::LEADS, &FilterParams::default());
        client
            .cache
            .fetch::<Vec<Lead>, _, _>(key.clone(), || {
                Box::pin(async { Ok(Vec::new()) })
                    as std::pin::Pin<
                        Box<dyn Future<Output = Result<Vec<Lead>, ApiError>> + Send>,
                    >
            })
            .await
            .unwrap();
        assert!(client.cache.peek::<Vec<Lead>>(&key).is_some());

        client
            .mutate(Mutation::Lead, async { Ok(()) })
            .await
            .unwrap();
        assert!(client.cache.peek::<Vec<Lead>>(&key).is_none());
    }

    #[tokio::test]
    async fn failed_mutation_leaves_the_cache_alone() {
        let dir = TempDir::new().unwrap();
        let client = client_in(&dir);

        let key = QueryKey::bare(resource::TASKS);
        client
            .cache
            .fetch::<Vec<i64>, _, _>(key.clone(), || {
                Box::pin(async { Ok(vec![1i64]) })
                    as std::pin::Pin<Box<dyn Future<Output = Result<Vec<i64>, ApiError>> + Send>>
            })
            .await
            .unwrap();

        let result: Result<(), _> = client
            .mutate(Mutation::Task, async {
                Err(ApiError::Server {
                    status: 500,
                    message: "boom".into(),
                })
            })
            .await;
        assert!(result.is_err());
        assert_eq!(client.cache.peek::<Vec<i64>>(&key), Some(vec![1]));
    }
}
