//! Statistics report source
//!
//! `ReportSource` is the seam between the sync engine and the provider:
//! the engine builds a `StatsQuery` per day and gets back the CSV body.
//! `CriteoClient` implements it over HTTP with an owned `AuthSession`.

use crate::auth::{AuthSession, ClientCredentials};
use crate::endpoints::ReportType;
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

/// Path of the statistics endpoint, relative to the API base URL
pub const STATISTICS_PATH: &str = "/v1/statistics";

/// Report body format requested from the provider
const REPORT_FORMAT: &str = "Csv";

/// Timezone report days are computed in
const REPORT_TIMEZONE: &str = "GMT";

/// Body of a statistics request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    /// Report type name
    pub report_type: String,
    /// Dimension field names
    pub dimensions: Vec<String>,
    /// Metric field names
    pub metrics: Vec<String>,
    /// First day, `YYYY-MM-DD`
    pub start_date: String,
    /// Last day, `YYYY-MM-DD`
    pub end_date: String,
    /// Report currency
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Body format
    pub format: String,
    /// Timezone
    pub timezone: String,
    /// Comma-separated advertiser filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advertiser_ids: Option<String>,
    /// Cross-device flag; `Some(None)` is sent as an explicit null
    #[serde(rename = "ignoreXDevice", skip_serializing_if = "Option::is_none")]
    pub ignore_x_device: Option<Option<bool>>,
}

impl StatsQuery {
    /// Query for a single day of a report
    pub fn for_day(
        report: ReportType,
        day: NaiveDate,
        dimensions: Vec<String>,
        metrics: Vec<String>,
    ) -> Self {
        let day = day.format("%Y-%m-%d").to_string();
        Self {
            report_type: report.as_str().to_string(),
            dimensions,
            metrics,
            start_date: day.clone(),
            end_date: day,
            currency: None,
            format: REPORT_FORMAT.to_string(),
            timezone: REPORT_TIMEZONE.to_string(),
            advertiser_ids: None,
            ignore_x_device: None,
        }
    }

    /// Set the report currency
    #[must_use]
    pub fn with_currency(mut self, currency: Option<&str>) -> Self {
        self.currency = currency.map(str::to_string);
        self
    }

    /// Filter by advertiser ids
    #[must_use]
    pub fn with_advertiser_ids(mut self, advertiser_ids: Option<&str>) -> Self {
        self.advertiser_ids = advertiser_ids.map(str::to_string);
        self
    }

    /// Set the cross-device flag
    #[must_use]
    pub fn with_ignore_x_device(mut self, ignore_x_device: Option<Option<bool>>) -> Self {
        self.ignore_x_device = ignore_x_device;
        self
    }
}

/// Source of statistics report bodies
#[async_trait]
pub trait ReportSource: Send {
    /// Fetch one report as CSV text
    async fn fetch_report(&mut self, query: &StatsQuery) -> Result<String>;
}

/// HTTP client for the Criteo Marketing API
#[derive(Debug)]
pub struct CriteoClient {
    http: HttpClient,
    auth: AuthSession,
}

impl CriteoClient {
    /// Create a client; `http` resolves relative paths against the API base URL
    pub fn new(http: HttpClient, token_url: impl Into<String>, credentials: ClientCredentials) -> Self {
        let auth = AuthSession::new(token_url, credentials, http.clone());
        Self { http, auth }
    }

    /// Auth session of this client
    pub fn auth(&self) -> &AuthSession {
        &self.auth
    }
}

#[async_trait]
impl ReportSource for CriteoClient {
    async fn fetch_report(&mut self, query: &StatsQuery) -> Result<String> {
        let bearer = self.auth.bearer_token().await?;
        debug!(
            report_type = %query.report_type,
            day = %query.start_date,
            "Requesting statistics report"
        );

        let request = RequestConfig::new()
            .header("Authorization", bearer)
            .header("Accept", "text/plain")
            .json(serde_json::to_value(query)?);

        self.http.post_text(STATISTICS_PATH, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpClientConfig;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_stats_query_wire_shape() {
        let query = StatsQuery::for_day(
            ReportType::CampaignPerformance,
            day("2024-01-02"),
            vec!["Day".to_string()],
            vec!["Clicks".to_string()],
        )
        .with_currency(Some("EUR"))
        .with_advertiser_ids(Some("111,222"))
        .with_ignore_x_device(Some(Some(false)));

        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({
                "reportType": "CampaignPerformance",
                "dimensions": ["Day"],
                "metrics": ["Clicks"],
                "startDate": "2024-01-02",
                "endDate": "2024-01-02",
                "currency": "EUR",
                "format": "Csv",
                "timezone": "GMT",
                "advertiserIds": "111,222",
                "ignoreXDevice": false
            })
        );
    }

    #[test]
    fn test_stats_query_cross_device_null_vs_absent() {
        let base = StatsQuery::for_day(
            ReportType::TransactionId,
            day("2024-01-02"),
            vec![],
            vec!["Clicks".to_string()],
        );

        let absent = serde_json::to_value(&base).unwrap();
        assert!(absent.get("ignoreXDevice").is_none());
        assert!(absent.get("advertiserIds").is_none());

        let null = serde_json::to_value(base.with_ignore_x_device(Some(None))).unwrap();
        assert_eq!(null.get("ignoreXDevice"), Some(&json!(null)));
    }

    #[tokio::test]
    async fn test_criteo_client_fetches_with_bearer() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "abc",
                "token_type": "Bearer",
                "expires_in": 300
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let query = StatsQuery::for_day(
            ReportType::FacebookDpa,
            day("2024-01-02"),
            vec![],
            vec!["Clicks".to_string()],
        );

        Mock::given(method("POST"))
            .and(path("/v1/statistics"))
            .and(header("Authorization", "Bearer abc"))
            .and(body_json(serde_json::to_value(&query).unwrap()))
            .respond_with(ResponseTemplate::new(200).set_body_string("Clicks\n3\n"))
            .expect(2)
            .mount(&mock_server)
            .await;

        let http = HttpClient::with_config(
            HttpClientConfig::builder()
                .base_url(mock_server.uri())
                .max_retries(0)
                .no_rate_limit()
                .build(),
        )
        .unwrap();
        let mut client = CriteoClient::new(
            http,
            format!("{}/oauth2/token", mock_server.uri()),
            ClientCredentials::new("id", "secret"),
        );

        assert_eq!(client.fetch_report(&query).await.unwrap(), "Clicks\n3\n");
        assert_eq!(client.fetch_report(&query).await.unwrap(), "Clicks\n3\n");
        assert!(client.auth().cached_token().is_some());
    }
}
