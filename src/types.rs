//! Shared typed contracts mirrored from the backend.
//!
//! Entities are backend-owned records; the client never invents fields. All
//! wire names are snake_case (Django REST), so field names map directly.
//! Optional backend fields carry `#[serde(default)]` so a slimmer payload
//! from an older server version still deserializes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Users & auth
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub team: Option<i64>,
}

/// Login payload. The backend authenticates on `username`; callers who
/// collect an email address pass it through as the username.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login response: both fields are required; a response missing
/// either is treated as a failed login.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// ============================================================================
// Leads
// ============================================================================

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Lost,
    Converted,
    Unknown,
}

impl<'de> Deserialize<'de> for LeadStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "new" => LeadStatus::New,
            "contacted" => LeadStatus::Contacted,
            "qualified" => LeadStatus::Qualified,
            // Some servers label the same terminal state "unqualified".
            "lost" | "unqualified" => LeadStatus::Lost,
            "converted" => LeadStatus::Converted,
            _ => LeadStatus::Unknown,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lead {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assigned_to: Vec<User>,
    #[serde(default)]
    pub created_by: Option<User>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Create/update payload for a lead. `None` fields are omitted from the
/// body, so PATCH preserves unspecified fields server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LeadForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Confirmation payload from lead conversion. The new contact id is used for
/// client-side navigation when present.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversionOutcome {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub contact_id: Option<i64>,
}

// ============================================================================
// Contacts & accounts
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub account: Option<Box<Account>>,
    /// Back-reference to the lead this contact was converted from.
    #[serde(default)]
    pub converted_from_lead: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assigned_to: Vec<User>,
    #[serde(default)]
    pub created_by: Option<User>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ContactForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Account id the contact belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub annual_revenue: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assigned_to: Vec<User>,
    #[serde(default)]
    pub created_by: Option<User>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AccountForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_revenue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

// ============================================================================
// Opportunities / deals
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub account: Option<Account>,
    #[serde(default)]
    pub contact: Option<Contact>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    /// Pipeline stage name; stages are server-configured, not a fixed enum.
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub probability: Option<u8>,
    #[serde(default)]
    pub expected_close_date: Option<String>,
    #[serde(default)]
    pub closed_on: Option<String>,
    #[serde(default)]
    pub lead_source: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assigned_to: Vec<User>,
    #[serde(default)]
    pub created_by: Option<User>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OpportunityForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_close_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// A server-configured pipeline stage, used for stage pickers and badges.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineStage {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub probability: Option<u8>,
}

// ============================================================================
// Tasks
// ============================================================================

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
    Cancelled,
    Unknown,
}

impl TaskStatus {
    pub fn is_open(self) -> bool {
        matches!(self, TaskStatus::Todo | TaskStatus::InProgress)
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            // Some servers report not-yet-started as "pending".
            "todo" | "pending" => TaskStatus::Todo,
            "in_progress" => TaskStatus::InProgress,
            "completed" => TaskStatus::Completed,
            "cancelled" => TaskStatus::Cancelled,
            _ => TaskStatus::Unknown,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<User>,
    #[serde(default)]
    pub created_by: Option<User>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Parent record attachment: at most one of lead/contact/deal.
    #[serde(default)]
    pub lead: Option<i64>,
    #[serde(default)]
    pub contact: Option<i64>,
    #[serde(default)]
    pub deal: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal: Option<i64>,
}

// ============================================================================
// Cases, invoices, events, teams
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseRecord {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(rename = "type", default)]
    pub case_type: Option<String>,
    #[serde(default)]
    pub account: Option<Account>,
    #[serde(default)]
    pub contact: Option<Contact>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CaseForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub case_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceItem {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub amount: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    #[serde(default)]
    pub invoice_number: String,
    #[serde(default)]
    pub account: Option<Account>,
    #[serde(default)]
    pub contact: Option<Contact>,
    #[serde(default)]
    pub invoice_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub tax: Option<f64>,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<InvoiceItem>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InvoiceForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<InvoiceItem>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub attendees: Vec<User>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EventForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_day: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub members: Vec<User>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TeamForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<i64>>,
}

// ============================================================================
// Notes, attachments, activity logs
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_by: Option<User>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub lead: Option<i64>,
    #[serde(default)]
    pub contact: Option<i64>,
    #[serde(default)]
    pub deal: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NoteForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub uploaded_by: Option<User>,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub lead: Option<i64>,
    #[serde(default)]
    pub contact: Option<i64>,
    #[serde(default)]
    pub deal: Option<i64>,
}

/// Server-generated audit entry; the client only reads these.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: i64,
    #[serde(default)]
    pub action_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub performed_by_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub lead: Option<i64>,
    #[serde(default)]
    pub contact: Option<i64>,
    #[serde(default)]
    pub deal: Option<i64>,
}

// ============================================================================
// Email providers, drip campaigns, segments, webhooks
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailProvider {
    pub id: i64,
    #[serde(default)]
    pub provider_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sender_email: String,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub daily_limit: Option<u64>,
    #[serde(default)]
    pub monthly_limit: Option<u64>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub config: serde_json::Value,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EmailProviderForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Secrets are write-only: sent on create/update, never echoed back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

/// Delivery statistics for one provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailProviderStats {
    #[serde(default)]
    pub sent_today: u64,
    #[serde(default)]
    pub sent_this_month: u64,
    #[serde(default)]
    pub bounce_rate: Option<f64>,
    #[serde(default)]
    pub open_rate: Option<f64>,
}

/// A sent email campaign, listed on the analytics dashboard. Campaigns are
/// created server-side (drip execution, one-off sends); the client only
/// reads them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailCampaign {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub total_recipients: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Account-wide sending metrics over a reporting window. Rates are
/// fractions (0.0–1.0); `*_change` fields compare against the previous
/// window of the same length.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailGlobalStats {
    #[serde(default)]
    pub total_sent: u64,
    #[serde(default)]
    pub avg_open_rate: f64,
    #[serde(default)]
    pub avg_click_rate: f64,
    #[serde(default)]
    pub delivery_rate: f64,
    #[serde(default)]
    pub bounce_rate: f64,
    #[serde(default)]
    pub unsubscribe_rate: f64,
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub sent_vs_previous: Option<f64>,
    #[serde(default)]
    pub open_rate_change: Option<f64>,
    #[serde(default)]
    pub click_rate_change: Option<f64>,
    #[serde(default)]
    pub revenue_change: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceBreakdown {
    #[serde(default)]
    pub desktop: f64,
    #[serde(default)]
    pub mobile: f64,
    #[serde(default)]
    pub tablet: f64,
}

/// Per-campaign performance rollup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignOverview {
    #[serde(default)]
    pub total_sent: u64,
    #[serde(default)]
    pub unique_opens: u64,
    #[serde(default)]
    pub unique_clicks: u64,
    #[serde(default)]
    pub conversions: u64,
    #[serde(default)]
    pub open_rate: f64,
    #[serde(default)]
    pub click_rate: f64,
    #[serde(default)]
    pub conversion_rate: f64,
    #[serde(default)]
    pub delivery_rate: f64,
    #[serde(default)]
    pub click_to_open_rate: f64,
    #[serde(default)]
    pub bounce_rate: f64,
    #[serde(default)]
    pub unsubscribe_rate: f64,
    #[serde(default)]
    pub device_breakdown: Option<DeviceBreakdown>,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub roi: f64,
}

/// One row of the provider comparison table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderPerformance {
    #[serde(default)]
    pub provider_name: String,
    #[serde(default)]
    pub total_sent: u64,
    #[serde(default)]
    pub total_delivered: u64,
    #[serde(default)]
    pub open_rate: f64,
    #[serde(default)]
    pub click_rate: f64,
    #[serde(default)]
    pub bounce_rate: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DripCampaign {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub trigger_type: String,
    #[serde(default)]
    pub trigger_config: serde_json::Value,
    #[serde(default)]
    pub enrollment_rules: serde_json::Value,
    #[serde(default)]
    pub exit_conditions: serde_json::Value,
    #[serde(default)]
    pub skip_weekends: bool,
    #[serde(default)]
    pub skip_holidays: bool,
    #[serde(default)]
    pub send_time_hour: u8,
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub enrolled_count: u64,
    #[serde(default)]
    pub completed_count: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DripCampaignForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_config: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_rules: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_conditions: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_weekends: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_holidays: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_time_hour: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Segment {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub segment_type: String,
    #[serde(default)]
    pub filter_conditions: serde_json::Value,
    #[serde(default)]
    pub auto_update: bool,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub contact_count: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SegmentForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_conditions: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_update: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Result of a segment size recalculation.
#[derive(Debug, Clone, Deserialize)]
pub struct SegmentSize {
    #[serde(default)]
    pub contact_count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Webhook {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub event_types: Vec<String>,
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub headers: serde_json::Value,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub last_triggered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WebhookForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Confirmation payload from a webhook test send.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookTestResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
}

// ============================================================================
// Dashboard
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RevenueSummary {
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub pending_revenue: f64,
    #[serde(default)]
    pub overdue_revenue: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_leads: u64,
    #[serde(default)]
    pub total_contacts: u64,
    #[serde(default)]
    pub total_accounts: u64,
    #[serde(default)]
    pub total_opportunities: u64,
    #[serde(default)]
    pub total_tasks: u64,
    #[serde(default)]
    pub total_cases: u64,
    #[serde(default)]
    pub total_invoices: u64,
    #[serde(default)]
    pub total_events: u64,
    #[serde(default)]
    pub leads_by_status: BTreeMap<String, u64>,
    #[serde(default)]
    pub opportunities_by_stage: BTreeMap<String, u64>,
    #[serde(default)]
    pub tasks_by_status: BTreeMap<String, u64>,
    #[serde(default)]
    pub revenue_summary: Option<RevenueSummary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardData {
    #[serde(default)]
    pub stats: DashboardStats,
    #[serde(default)]
    pub recent_leads: Vec<Lead>,
    #[serde(default)]
    pub recent_opportunities: Vec<Opportunity>,
    #[serde(default)]
    pub upcoming_tasks: Vec<Task>,
    #[serde(default)]
    pub upcoming_events: Vec<EventRecord>,
}

// ============================================================================
// AI agent & insights
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiMessage {
    pub role: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AiQuery {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_history: Option<Vec<AiMessage>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiFunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiAnswer {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub function_calls: Vec<AiFunctionCall>,
    #[serde(default)]
    pub conversation_history: Vec<AiMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiSuggestion {
    pub text: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiInsight {
    pub id: i64,
    #[serde(default)]
    pub insight_type: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub metadata: serde_json::Value,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub lead: Option<Lead>,
    #[serde(default)]
    pub contact: Option<Contact>,
    #[serde(default)]
    pub opportunity: Option<Opportunity>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Collection-shape normalization
// ============================================================================

/// Every list endpoint may return a bare array or a paginated envelope.
/// Both shapes normalize through `into_vec` at the resource boundary, so the
/// unwrap logic is never repeated downstream.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Plain(Vec<T>),
    Paginated {
        #[serde(default)]
        count: u64,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
        results: Vec<T>,
    },
}

impl<T> ListResponse<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListResponse::Plain(items) => items,
            ListResponse::Paginated { results, .. } => results,
        }
    }
}

// ============================================================================
// Filter parameters
// ============================================================================

/// Query filters shared by every list endpoint.
///
/// Serializes through `to_query` into pairs sorted by key, so structurally
/// equal filters always produce the same cache key and the same request URL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub assigned_to: Option<i64>,
    pub created_by: Option<i64>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    /// Parent-record filters for notes, tasks, attachments, activity logs.
    pub lead: Option<i64>,
    pub contact: Option<i64>,
    pub deal: Option<i64>,
    /// Resource-specific extras (e.g. `days` for analytics windows).
    pub extra: BTreeMap<String, String>,
}

impl FilterParams {
    /// Stable-ordered query pairs. BTreeMap ordering makes equivalent
    /// filters structurally comparable.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut map = self.extra.clone();
        let mut put = |k: &str, v: Option<String>| {
            if let Some(v) = v {
                map.insert(k.to_string(), v);
            }
        };
        put("search", self.search.clone());
        put("status", self.status.clone());
        put("assigned_to", self.assigned_to.map(|v| v.to_string()));
        put("created_by", self.created_by.map(|v| v.to_string()));
        put("ordering", self.ordering.clone());
        put("page", self.page.map(|v| v.to_string()));
        put("page_size", self.page_size.map(|v| v.to_string()));
        put("lead", self.lead.map(|v| v.to_string()));
        put("contact", self.contact.map(|v| v.to_string()));
        put("deal", self.deal.map(|v| v.to_string()));
        map.into_iter().collect()
    }

    /// Canonical string form, used in cache keys.
    pub fn cache_suffix(&self) -> String {
        let pairs = self.to_query();
        if pairs.is_empty() {
            return String::new();
        }
        pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn for_lead(id: i64) -> Self {
        Self {
            lead: Some(id),
            ..Self::default()
        }
    }

    pub fn for_contact(id: i64) -> Self {
        Self {
            contact: Some(id),
            ..Self::default()
        }
    }

    pub fn for_deal(id: i64) -> Self {
        Self {
            deal: Some(id),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_response_normalizes_both_shapes_identically() {
        let bare: ListResponse<Lead> =
            serde_json::from_str(r#"[{"id": 1}, {"id": 2}]"#).unwrap();
        let enveloped: ListResponse<Lead> = serde_json::from_str(
            r#"{"count": 2, "next": null, "previous": null, "results": [{"id": 1}, {"id": 2}]}"#,
        )
        .unwrap();

        let a: Vec<i64> = bare.into_vec().iter().map(|l| l.id).collect();
        let b: Vec<i64> = enveloped.into_vec().iter().map(|l| l.id).collect();
        assert_eq!(a, b);
        assert_eq!(a, vec![1, 2]);
    }

    #[test]
    fn lead_status_aliases_and_unknowns() {
        let lost: LeadStatus = serde_json::from_str(r#""lost""#).unwrap();
        assert_eq!(lost, LeadStatus::Lost);
        let unqualified: LeadStatus = serde_json::from_str(r#""unqualified""#).unwrap();
        assert_eq!(unqualified, LeadStatus::Lost);

        let converted: LeadStatus = serde_json::from_str(r#""converted""#).unwrap();
        assert_eq!(converted, LeadStatus::Converted);

        let surprise: LeadStatus = serde_json::from_str(r#""nurturing""#).unwrap();
        assert_eq!(surprise, LeadStatus::Unknown);
    }

    #[test]
    fn task_status_accepts_alternate_names() {
        let todo: TaskStatus = serde_json::from_str(r#""pending""#).unwrap();
        assert_eq!(todo, TaskStatus::Todo);
        assert!(todo.is_open());
        let in_progress: TaskStatus = serde_json::from_str(r#""in_progress""#).unwrap();
        assert_eq!(in_progress, TaskStatus::InProgress);
        let done: TaskStatus = serde_json::from_str(r#""completed""#).unwrap();
        assert_eq!(done, TaskStatus::Completed);
        assert!(!done.is_open());
        let surprise: TaskStatus = serde_json::from_str(r#""blocked""#).unwrap();
        assert_eq!(surprise, TaskStatus::Unknown);
    }

    #[test]
    fn form_patch_body_contains_only_specified_fields() {
        let form = LeadForm {
            status: Some(LeadStatus::Qualified),
            ..LeadForm::default()
        };
        let body = serde_json::to_value(&form).unwrap();
        let obj = body.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["status"], "qualified");
    }

    #[test]
    fn filter_params_query_is_stably_ordered() {
        let mut a = FilterParams::default();
        a.status = Some("new".into());
        a.search = Some("acme".into());
        a.page = Some(2);

        // Same logical filter built in a different order.
        let mut b = FilterParams::default();
        b.page = Some(2);
        b.search = Some("acme".into());
        b.status = Some("new".into());

        assert_eq!(a.to_query(), b.to_query());
        assert_eq!(a.cache_suffix(), b.cache_suffix());
        assert_eq!(a.cache_suffix(), "page=2&search=acme&status=new");
    }

    #[test]
    fn parent_filters_land_in_query() {
        let params = FilterParams::for_lead(5);
        assert_eq!(params.to_query(), vec![("lead".to_string(), "5".to_string())]);
    }

    #[test]
    fn lead_deserializes_from_full_payload() {
        let json = r#"{
            "id": 7,
            "first_name": "Grace",
            "last_name": "Hopper",
            "email": "grace@example.com",
            "company": "Navy",
            "status": "qualified",
            "source": "referral",
            "assigned_to": [{"id": 1, "username": "admin", "email": "a@b.c",
                             "first_name": "A", "last_name": "B", "is_active": true}],
            "created_at": "2026-01-15T10:00:00Z",
            "tags": ["vip"]
        }"#;
        let lead: Lead = serde_json::from_str(json).unwrap();
        assert_eq!(lead.status, LeadStatus::Qualified);
        assert_eq!(lead.assigned_to.len(), 1);
        assert_eq!(lead.tags, vec!["vip"]);
    }

    #[test]
    fn auth_response_requires_token_and_user() {
        let ok: Result<AuthResponse, _> =
            serde_json::from_str(r#"{"token": "abc", "user": {"id": 1}}"#);
        assert!(ok.is_ok());

        let missing_user: Result<AuthResponse, _> = serde_json::from_str(r#"{"token": "abc"}"#);
        assert!(missing_user.is_err());
    }
}
