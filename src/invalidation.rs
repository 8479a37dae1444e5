//! Declared mapping from mutations to the cached resources they affect.
//!
//! Invalidation is data, not convention: every mutation the client can issue
//! has an entry here, and the cache layer consults it instead of each call
//! site hand-picking keys. A mutation always invalidates its own collection;
//! some also fan out — timeline writes touch the activity feed, and anything
//! that moves money or workload touches the dashboard rollups.

/// Canonical cache resource names. Also used as the first component of every
/// [`crate::cache::QueryKey`].
pub mod resource {
    pub const LEADS: &str = "leads";
    pub const CONTACTS: &str = "contacts";
    pub const ACCOUNTS: &str = "accounts";
    pub const OPPORTUNITIES: &str = "opportunities";
    pub const TASKS: &str = "tasks";
    pub const CASES: &str = "cases";
    pub const INVOICES: &str = "invoices";
    pub const EVENTS: &str = "events";
    pub const TEAMS: &str = "teams";
    pub const USERS: &str = "users";
    pub const NOTES: &str = "notes";
    pub const ATTACHMENTS: &str = "attachments";
    pub const ACTIVITY_LOGS: &str = "activity-logs";
    pub const DASHBOARD: &str = "dashboard";
    pub const EMAIL_PROVIDERS: &str = "email-providers";
    /// Read-only on the client; listed for the cache-key convention.
    pub const EMAIL_CAMPAIGNS: &str = "email-campaigns";
    pub const DRIP_CAMPAIGNS: &str = "drip-campaigns";
    pub const SEGMENTS: &str = "segments";
    pub const WEBHOOKS: &str = "webhooks";
    pub const AI_INSIGHTS: &str = "ai-insights";
    pub const PIPELINE_STAGES: &str = "pipeline-stages";
}

use resource::*;

/// Every write the client can issue, at the granularity invalidation cares
/// about. Plain create/update/delete on a resource share one variant; verbs
/// with wider blast radius (lead conversion) get their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Lead,
    /// Conversion creates a contact from a lead, so both collections move.
    LeadConvert,
    Contact,
    Account,
    Opportunity,
    Task,
    Case,
    Invoice,
    Event,
    Team,
    User,
    Note,
    Attachment,
    EmailProvider,
    DripCampaign,
    Segment,
    Webhook,
    AiInsight,
}

impl Mutation {
    /// Resources whose cached queries are no longer trustworthy after this
    /// mutation. The mutation's own collection is always first.
    pub fn affects(self) -> &'static [&'static str] {
        match self {
            Mutation::Lead => &[LEADS, DASHBOARD],
            Mutation::LeadConvert => &[LEADS, CONTACTS, ACTIVITY_LOGS, DASHBOARD],
            Mutation::Contact => &[CONTACTS],
            Mutation::Account => &[ACCOUNTS],
            Mutation::Opportunity => &[OPPORTUNITIES, DASHBOARD],
            Mutation::Task => &[TASKS, ACTIVITY_LOGS, DASHBOARD],
            Mutation::Case => &[CASES, DASHBOARD],
            Mutation::Invoice => &[INVOICES, DASHBOARD],
            Mutation::Event => &[EVENTS],
            Mutation::Team => &[TEAMS],
            Mutation::User => &[USERS],
            Mutation::Note => &[NOTES, ACTIVITY_LOGS],
            Mutation::Attachment => &[ATTACHMENTS, ACTIVITY_LOGS],
            Mutation::EmailProvider => &[EMAIL_PROVIDERS],
            Mutation::DripCampaign => &[DRIP_CAMPAIGNS],
            Mutation::Segment => &[SEGMENTS],
            Mutation::Webhook => &[WEBHOOKS],
            Mutation::AiInsight => &[AI_INSIGHTS],
        }
    }

    /// The mutation's own collection.
    pub fn own_resource(self) -> &'static str {
        self.affects()[0]
    }

    pub const ALL: &'static [Mutation] = &[
        Mutation::Lead,
        Mutation::LeadConvert,
        Mutation::Contact,
        Mutation::Account,
        Mutation::Opportunity,
        Mutation::Task,
        Mutation::Case,
        Mutation::Invoice,
        Mutation::Event,
        Mutation::Team,
        Mutation::User,
        Mutation::Note,
        Mutation::Attachment,
        Mutation::EmailProvider,
        Mutation::DripCampaign,
        Mutation::Segment,
        Mutation::Webhook,
        Mutation::AiInsight,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mutation_invalidates_its_own_collection_first() {
        for m in Mutation::ALL {
            assert!(
                !m.affects().is_empty(),
                "{:?} has an empty invalidation set",
                m
            );
            assert_eq!(m.affects()[0], m.own_resource());
        }
    }

    #[test]
    fn timeline_writes_invalidate_the_activity_feed() {
        for m in [Mutation::Note, Mutation::Task, Mutation::Attachment] {
            assert!(
                m.affects().contains(&ACTIVITY_LOGS),
                "{:?} should refresh the activity feed",
                m
            );
        }
    }

    #[test]
    fn lead_conversion_touches_both_collections() {
        let affected = Mutation::LeadConvert.affects();
        assert!(affected.contains(&LEADS));
        assert!(affected.contains(&CONTACTS));
    }

    #[test]
    fn workload_and_revenue_writes_refresh_the_dashboard() {
        for m in [
            Mutation::Lead,
            Mutation::Opportunity,
            Mutation::Task,
            Mutation::Case,
            Mutation::Invoice,
        ] {
            assert!(
                m.affects().contains(&DASHBOARD),
                "{:?} should refresh dashboard rollups",
                m
            );
        }
    }

    #[test]
    fn no_invalidation_set_contains_duplicates() {
        for m in Mutation::ALL {
            let mut seen = std::collections::HashSet::new();
            for r in m.affects() {
                assert!(seen.insert(r), "{:?} lists {} twice", m, r);
            }
        }
    }
}
