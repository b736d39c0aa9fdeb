use async_trait::async_trait;
use chrono::Utc;
use reqwest::Url;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::currency::{RateProvider, RateSnapshot};
use crate::error::RateError;

const USER_AGENT: &str = concat!("fxconv/", env!("CARGO_PKG_VERSION"));

// OpenErApiProvider implementation for RateProvider
pub struct OpenErApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl OpenErApiProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RateError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(OpenErApiProvider {
            base_url: base_url.to_string(),
            client,
        })
    }

    fn latest_url(&self, base: &str) -> Result<Url, RateError> {
        let invalid = |reason: String| RateError::InvalidUrl {
            url: self.base_url.clone(),
            reason,
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(["v6", "latest", base]);
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: String,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    base_code: Option<String>,
    rates: Option<BTreeMap<String, f64>>,
    time_last_update_utc: Option<String>,
    time_next_update_utc: Option<String>,
}

#[async_trait]
impl RateProvider for OpenErApiProvider {
    #[instrument(name = "OpenErApiFetch", skip(self), fields(base = %base))]
    async fn fetch_rates(&self, base: &str) -> Result<RateSnapshot, RateError> {
        let url = self.latest_url(base)?;
        debug!("Requesting exchange rates from {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(RateError::Status {
                status: response.status(),
                base: base.to_string(),
            });
        }

        let text = response.text().await?;
        let parse_error = |reason: String| RateError::Parse {
            base: base.to_string(),
            reason,
        };

        let data: LatestRatesResponse =
            serde_json::from_str(&text).map_err(|e| parse_error(e.to_string()))?;

        if data.result != "success" {
            return Err(RateError::Provider(
                data.error_type
                    .unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        let rates = data
            .rates
            .ok_or_else(|| parse_error("missing field `rates`".to_string()))?;
        debug!(count = rates.len(), "Received exchange rates");

        let mut snapshot = RateSnapshot::new(
            data.base_code.as_deref().unwrap_or(base),
            rates,
            Utc::now(),
        );
        snapshot.time_last_update_utc = data.time_last_update_utc;
        snapshot.time_next_update_utc = data.time_next_update_utc;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(base: &str, response: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/v6/latest/{base}")))
            .respond_with(response)
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn provider(mock_server: &MockServer) -> OpenErApiProvider {
        OpenErApiProvider::new(&mock_server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_successful_rates_fetch() {
        let mock_response = r#"{
            "result": "success",
            "provider": "https://www.exchangerate-api.com",
            "time_last_update_utc": "Fri, 16 Oct 2026 00:02:31 +0000",
            "time_next_update_utc": "Sat, 17 Oct 2026 00:13:21 +0000",
            "base_code": "USD",
            "rates": {"USD": 1, "EUR": 0.9187, "GBP": 0.7861, "JPY": 151.2}
        }"#;
        let mock_server = create_mock_server(
            "USD",
            ResponseTemplate::new(200).set_body_string(mock_response),
        )
        .await;

        let snapshot = provider(&mock_server).fetch_rates("USD").await.unwrap();
        assert_eq!(snapshot.base_code, "USD");
        assert_eq!(snapshot.rate("EUR"), Some(0.9187));
        assert_eq!(snapshot.rates.len(), 4);
        assert_eq!(
            snapshot.time_last_update_utc.as_deref(),
            Some("Fri, 16 Oct 2026 00:02:31 +0000")
        );
    }

    #[tokio::test]
    async fn test_provider_error_payload() {
        let mock_response = r#"{"result": "error", "error-type": "unsupported-code"}"#;
        let mock_server = create_mock_server(
            "XYZ",
            ResponseTemplate::new(200).set_body_string(mock_response),
        )
        .await;

        let result = provider(&mock_server).fetch_rates("XYZ").await;
        assert_eq!(result.unwrap_err().to_string(), "API Error: unsupported-code");
    }

    #[tokio::test]
    async fn test_provider_error_without_type() {
        let mock_server = create_mock_server(
            "USD",
            ResponseTemplate::new(200).set_body_string(r#"{"result": "error"}"#),
        )
        .await;

        let result = provider(&mock_server).fetch_rates("USD").await;
        assert_eq!(result.unwrap_err().to_string(), "API Error: Unknown error");
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let mock_server = create_mock_server("USD", ResponseTemplate::new(500)).await;

        let result = provider(&mock_server).fetch_rates("USD").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 500 Internal Server Error for base currency: USD"
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server = create_mock_server(
            "USD",
            ResponseTemplate::new(200).set_body_string("<html>not json</html>"),
        )
        .await;

        let result = provider(&mock_server).fetch_rates("USD").await;
        assert!(matches!(result, Err(RateError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_success_without_rates() {
        let mock_server = create_mock_server(
            "USD",
            ResponseTemplate::new(200).set_body_string(r#"{"result": "success"}"#),
        )
        .await;

        let result = provider(&mock_server).fetch_rates("USD").await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse JSON response for USD")
        );
    }

    #[tokio::test]
    async fn test_timeout_is_network_error() {
        let mock_server = create_mock_server(
            "USD",
            ResponseTemplate::new(200)
                .set_body_string(r#"{"result": "success", "rates": {}}"#)
                .set_delay(Duration::from_millis(500)),
        )
        .await;

        let provider =
            OpenErApiProvider::new(&mock_server.uri(), Duration::from_millis(50)).unwrap();
        let result = provider.fetch_rates("USD").await;
        assert!(matches!(result, Err(RateError::Network(_))));
    }

    #[test]
    fn test_latest_url_handles_trailing_slash() {
        let provider =
            OpenErApiProvider::new("http://localhost:1234/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            provider.latest_url("EUR").unwrap().as_str(),
            "http://localhost:1234/v6/latest/EUR"
        );
    }

    #[test]
    fn test_latest_url_escapes_base() {
        let provider =
            OpenErApiProvider::new("http://localhost:1234", Duration::from_secs(1)).unwrap();
        assert_eq!(
            provider.latest_url("a/b?c").unwrap().as_str(),
            "http://localhost:1234/v6/latest/a%2Fb%3Fc"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let provider = OpenErApiProvider::new("not a url", Duration::from_secs(1)).unwrap();
        assert!(matches!(
            provider.latest_url("USD"),
            Err(RateError::InvalidUrl { .. })
        ));
    }
}
