//! Typed resource endpoints, one module per backend collection.
//!
//! Every module follows the same contract: `list(filter)` returns a
//! normalized `Vec`, `get`/`create`/`update`/`delete` operate by id with
//! PATCH semantics for updates, and resource-specific verbs target action
//! sub-paths (`/leads/{id}/convert/`, `/tasks/{id}/complete/`, ...). All
//! paths carry the backend's trailing slash. Auth endpoints live with the
//! session state machine in [`crate::session`], not here.

pub mod accounts;
pub mod activity_logs;
pub mod ai;
pub mod attachments;
pub mod cases;
pub mod contacts;
pub mod dashboard;
pub mod drip_campaigns;
pub mod email_analytics;
pub mod email_providers;
pub mod events;
pub mod invoices;
pub mod leads;
pub mod notes;
pub mod opportunities;
pub mod segments;
pub mod tasks;
pub mod teams;
pub mod users;
pub mod webhooks;
