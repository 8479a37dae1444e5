//! crmkit — typed client data layer for the CRM REST backend.
//!
//! Three layers, bottom up:
//! - `http`: one configured request client; attaches `Authorization: Token`
//!   to every call and tears the session down on 401.
//! - `api`: typed wrappers, one module per backend resource.
//! - `cache` + `client`: keyed query cache (dedup, stale-while-revalidate,
//!   generation counters) and the `CrmClient` context object that routes
//!   every mutation through the declared invalidation relation.
//!
//! Session state (token + profile persisted under `~/.crmkit/`) lives in
//! `store` and `session`. There are no module-level singletons: everything
//! hangs off an explicit `CrmClient`, so independent sessions (tests, tools)
//! never collide.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod invalidation;
pub mod session;
pub mod store;
pub mod types;

pub use client::CrmClient;
pub use config::ApiConfig;
pub use error::ApiError;
pub use session::{AuthState, Session};
pub use store::SessionStore;
