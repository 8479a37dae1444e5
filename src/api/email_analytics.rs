use std::sync::Arc;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{
    CampaignOverview, EmailCampaign, EmailGlobalStats, FilterParams, ProviderPerformance,
};

/// `/email-campaigns/` and `/email-analytics/` — sending performance,
/// read-only. Reporting windows are expressed in days and default to 30
/// server-side.
pub struct EmailAnalytics {
    http: Arc<HttpClient>,
}

impl EmailAnalytics {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn campaigns(&self, filter: &FilterParams) -> Result<Vec<EmailCampaign>, ApiError> {
        self.http.get_list("/email-campaigns/", filter).await
    }

    /// Account-wide metrics over the last `days` days.
    pub async fn global_stats(&self, days: u32) -> Result<EmailGlobalStats, ApiError> {
        self.http
            .get_with("/email-analytics/global_stats/", &window(days))
            .await
    }

    /// Per-provider delivery comparison over the last `days` days.
    pub async fn provider_performance(
        &self,
        days: u32,
    ) -> Result<Vec<ProviderPerformance>, ApiError> {
        self.http
            .get_list("/email-analytics/provider_performance/", &window(days))
            .await
    }

    /// Full performance rollup for one campaign.
    pub async fn campaign_overview(&self, campaign_id: i64) -> Result<CampaignOverview, ApiError> {
        self.http
            .get(&format!("/email-campaigns/{}/analytics/", campaign_id))
            .await
    }
}

fn window(days: u32) -> FilterParams {
    let mut filter = FilterParams::default();
    filter.extra.insert("days".to_string(), days.to_string());
    filter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_filter_carries_the_day_count() {
        let filter = window(90);
        assert_eq!(
            filter.to_query(),
            vec![("days".to_string(), "90".to_string())]
        );
    }

    #[test]
    fn overview_decodes_rates_and_optional_breakdown() {
        let overview: CampaignOverview = serde_json::from_value(serde_json::json!({
            "total_sent": 1200,
            "unique_opens": 480,
            "unique_clicks": 96,
            "conversions": 12,
            "open_rate": 0.4,
            "click_rate": 0.08,
            "conversion_rate": 0.01,
            "delivery_rate": 0.98,
            "click_to_open_rate": 0.2,
            "bounce_rate": 0.02,
            "unsubscribe_rate": 0.001,
            "revenue": 3400.0,
            "roi": 2.1
        }))
        .unwrap();
        assert_eq!(overview.total_sent, 1200);
        assert_eq!(overview.unique_opens, 480);
        assert!(overview.device_breakdown.is_none());
        assert!((overview.open_rate - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn global_stats_tolerate_missing_trend_fields() {
        let stats: EmailGlobalStats = serde_json::from_value(serde_json::json!({
            "total_sent": 50000,
            "avg_open_rate": 0.35,
            "avg_click_rate": 0.05,
            "delivery_rate": 0.97,
            "bounce_rate": 0.03,
            "unsubscribe_rate": 0.002,
            "total_revenue": 12500.0
        }))
        .unwrap();
        assert_eq!(stats.total_sent, 50000);
        assert!(stats.sent_vs_previous.is_none());
        assert!(stats.revenue_change.is_none());
    }
}
