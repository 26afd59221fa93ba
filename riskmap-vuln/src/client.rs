use std::time::Duration;

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use riskmap_types::VulnRecord;

use crate::throttle::RateGate;

/// Opaque CPE 2.3 product identity returned by the product-search endpoint.
pub type CpeMatch = String;

/// NVD 2.0 API endpoints.
const NVD_CPE_URL: &str = "https://services.nvd.nist.gov/rest/json/cpes/2.0";
const NVD_CVE_URL: &str = "https://services.nvd.nist.gov/rest/json/cves/2.0";

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Minimum spacing between any two NVD queries.
const MIN_QUERY_INTERVAL: Duration = Duration::from_millis(700);

/// How many CPE candidates to request per product search.
const CPE_RESULT_LIMIT: usize = 3;

/// Default number of CVEs to request per vulnerability search.
pub const CVE_RESULT_LIMIT: usize = 5;

/// Read-only lookup capability the enrichment pipeline consumes.
///
/// All three operations are total: failure of any kind (missing credential,
/// transport error, timeout, malformed payload) resolves to an empty result,
/// never an error. Failures surface only in the log.
#[allow(async_fn_in_trait)]
pub trait VulnSource {
    /// Free-text product search; at most a handful of CPE candidates.
    async fn find_product_matches(&self, keyword: &str) -> Vec<CpeMatch>;

    /// Vulnerabilities for an exact product identity.
    async fn find_vulns_by_cpe(&self, cpe: &str) -> Vec<VulnRecord>;

    /// Fallback free-text vulnerability search.
    async fn find_vulns_by_keyword(&self, keyword: &str, limit: usize) -> Vec<VulnRecord>;
}

/// Throttled client for the NVD CPE and CVE search endpoints.
///
/// Holds the API credential injected at construction; without one the
/// client is disabled and every lookup short-circuits to an empty result
/// with a logged warning. Every query waits out the shared [`RateGate`]
/// before touching the network.
pub struct NvdClient {
    http: reqwest::Client,
    api_key: Option<String>,
    cpe_url: String,
    cve_url: String,
    gate: Mutex<RateGate>,
}

impl NvdClient {
    pub fn new(api_key: Option<String>) -> Result<Self, reqwest::Error> {
        Self::with_endpoints(api_key, NVD_CPE_URL, NVD_CVE_URL)
    }

    /// Endpoint-injecting constructor, used by tests.
    pub fn with_endpoints(
        api_key: Option<String>,
        cpe_url: &str,
        cve_url: &str,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("riskmap/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_key,
            cpe_url: cpe_url.to_string(),
            cve_url: cve_url.to_string(),
            gate: Mutex::new(RateGate::new(MIN_QUERY_INTERVAL)),
        })
    }

    /// One throttled, authenticated GET; `None` on any failure.
    async fn query<T>(&self, url: &str, params: &[(&str, String)], what: &str, subject: &str) -> Option<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!(subject, "{what} skipped: no NVD API key configured");
            return None;
        };

        self.gate.lock().await.wait().await;
        debug!(subject, url, "{what} query");

        let response = match self
            .http
            .get(url)
            .header("apiKey", api_key)
            .query(params)
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) => {
                warn!(subject, error = %error, "{what} request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(subject, status = %response.status(), "{what} returned an error status");
            return None;
        }

        match response.json::<T>().await {
            Ok(decoded) => Some(decoded),
            Err(error) => {
                warn!(subject, error = %error, "{what} payload could not be decoded");
                None
            }
        }
    }
}

impl VulnSource for NvdClient {
    async fn find_product_matches(&self, keyword: &str) -> Vec<CpeMatch> {
        let params = [
            ("keywordSearch", keyword.to_string()),
            ("resultsPerPage", CPE_RESULT_LIMIT.to_string()),
        ];
        let Some(response) = self
            .query::<CpeResponse>(&self.cpe_url, &params, "CPE lookup", keyword)
            .await
        else {
            return Vec::new();
        };

        response
            .products
            .into_iter()
            .filter_map(|product| product.cpe.and_then(|cpe| cpe.cpe_name))
            .collect()
    }

    async fn find_vulns_by_cpe(&self, cpe: &str) -> Vec<VulnRecord> {
        let params = [
            ("cpeName", cpe.to_string()),
            ("resultsPerPage", CVE_RESULT_LIMIT.to_string()),
        ];
        let Some(response) = self
            .query::<CveResponse>(&self.cve_url, &params, "CVE lookup", cpe)
            .await
        else {
            return Vec::new();
        };

        response.vulnerabilities.into_iter().map(normalize).collect()
    }

    async fn find_vulns_by_keyword(&self, keyword: &str, limit: usize) -> Vec<VulnRecord> {
        let params = [
            ("keywordSearch", keyword.to_string()),
            ("resultsPerPage", limit.to_string()),
        ];
        let Some(response) = self
            .query::<CveResponse>(&self.cve_url, &params, "CVE keyword lookup", keyword)
            .await
        else {
            return Vec::new();
        };

        response.vulnerabilities.into_iter().map(normalize).collect()
    }
}

/// Flatten one wire entry into a [`VulnRecord`].
///
/// Deliberately takes the first description and the first CVSS v3.1 metric;
/// upstream entries with several metrics are not aggregated.
fn normalize(item: CveItem) -> VulnRecord {
    let CveDetail {
        id,
        descriptions,
        metrics,
    } = item.cve;

    let summary = descriptions
        .into_iter()
        .next()
        .and_then(|description| description.value)
        .unwrap_or_else(|| "No description".to_string());

    let score = metrics
        .cvss_metric_v31
        .into_iter()
        .next()
        .and_then(|metric| metric.cvss_data.base_score);

    VulnRecord { id, score, summary }
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------
//
// Strongly-typed mirrors of the two NVD payloads. Every field is optional or
// defaulted so that a partially-populated entry degrades instead of failing
// the whole decode.

#[derive(Debug, Default, Deserialize)]
struct CpeResponse {
    #[serde(default)]
    products: Vec<CpeProduct>,
}

#[derive(Debug, Deserialize)]
struct CpeProduct {
    #[serde(default)]
    cpe: Option<CpeDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CpeDetail {
    #[serde(default)]
    cpe_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CveResponse {
    #[serde(default)]
    vulnerabilities: Vec<CveItem>,
}

#[derive(Debug, Default, Deserialize)]
struct CveItem {
    #[serde(default)]
    cve: CveDetail,
}

#[derive(Debug, Default, Deserialize)]
struct CveDetail {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    descriptions: Vec<CveDescription>,
    #[serde(default)]
    metrics: CveMetrics,
}

#[derive(Debug, Deserialize)]
struct CveDescription {
    #[serde(default)]
    value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CveMetrics {
    #[serde(default)]
    cvss_metric_v31: Vec<CvssMetric>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CvssMetric {
    #[serde(default)]
    cvss_data: CvssData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CvssData {
    #[serde(default)]
    base_score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpe_response_skips_entries_without_name() {
        let json = r#"{
            "products": [
                {"cpe": {"cpeName": "cpe:2.3:a:openbsd:openssh:9.6:*:*:*:*:*:*:*"}},
                {"cpe": {}},
                {}
            ]
        }"#;
        let response: CpeResponse = serde_json::from_str(json).unwrap();
        let matches: Vec<CpeMatch> = response
            .products
            .into_iter()
            .filter_map(|product| product.cpe.and_then(|cpe| cpe.cpe_name))
            .collect();
        assert_eq!(matches, vec!["cpe:2.3:a:openbsd:openssh:9.6:*:*:*:*:*:*:*"]);
    }

    #[test]
    fn cve_entry_normalizes_fully_populated() {
        let json = r#"{
            "vulnerabilities": [{
                "cve": {
                    "id": "CVE-2024-6387",
                    "descriptions": [
                        {"lang": "en", "value": "A signal handler race condition in sshd."},
                        {"lang": "es", "value": "Una condición de carrera."}
                    ],
                    "metrics": {
                        "cvssMetricV31": [
                            {"cvssData": {"baseScore": 8.1}},
                            {"cvssData": {"baseScore": 9.9}}
                        ]
                    }
                }
            }]
        }"#;
        let response: CveResponse = serde_json::from_str(json).unwrap();
        let records: Vec<VulnRecord> = response.vulnerabilities.into_iter().map(normalize).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_deref(), Some("CVE-2024-6387"));
        assert_eq!(records[0].summary, "A signal handler race condition in sshd.");
        // First metric wins, even when a later one is more severe.
        assert_eq!(records[0].score, Some(8.1));
    }

    #[test]
    fn cve_entry_normalizes_sparse() {
        let json = r#"{"vulnerabilities": [{"cve": {}}]}"#;
        let response: CveResponse = serde_json::from_str(json).unwrap();
        let records: Vec<VulnRecord> = response.vulnerabilities.into_iter().map(normalize).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, None);
        assert_eq!(records[0].score, None);
        assert_eq!(records[0].summary, "No description");
        assert_eq!(records[0].display_score(), "N/A");
        assert_eq!(crate::classify::safe_score(records[0].score), 0.0);
    }

    #[test]
    fn cve_entry_without_v31_metrics_has_no_score() {
        let json = r#"{
            "vulnerabilities": [{
                "cve": {
                    "id": "CVE-2016-0001",
                    "descriptions": [{"lang": "en", "value": "Old vuln, v2 metrics only."}],
                    "metrics": {"cvssMetricV2": [{"cvssData": {"baseScore": 7.5}}]}
                }
            }]
        }"#;
        let response: CveResponse = serde_json::from_str(json).unwrap();
        let records: Vec<VulnRecord> = response.vulnerabilities.into_iter().map(normalize).collect();
        assert_eq!(records[0].score, None);
        assert_eq!(records[0].summary, "Old vuln, v2 metrics only.");
    }

    #[test]
    fn description_without_value_falls_back() {
        let json = r#"{
            "vulnerabilities": [{
                "cve": {"id": "CVE-2024-1111", "descriptions": [{"lang": "en"}]}
            }]
        }"#;
        let response: CveResponse = serde_json::from_str(json).unwrap();
        let records: Vec<VulnRecord> = response.vulnerabilities.into_iter().map(normalize).collect();
        assert_eq!(records[0].summary, "No description");
    }

    #[tokio::test]
    async fn disabled_client_returns_empty_without_network() {
        let client = NvdClient::new(None).unwrap();
        assert!(client.find_product_matches("openssh").await.is_empty());
        assert!(client.find_vulns_by_cpe("cpe:2.3:a:x:y:1.0").await.is_empty());
        assert!(client.find_vulns_by_keyword("openssh", 5).await.is_empty());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_absorbed() {
        // Nothing listens on the discard port; the lookup must still be total.
        let client = NvdClient::with_endpoints(
            Some("test-key".into()),
            "http://127.0.0.1:9/cpes",
            "http://127.0.0.1:9/cves",
        )
        .unwrap();
        assert!(client.find_product_matches("openssh").await.is_empty());
    }
}
