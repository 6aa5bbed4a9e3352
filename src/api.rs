/// REST client for the report backend
///
/// Every report kind lives under its own resource below the base URL:
///
/// - `POST {base}/{resource}/search?{page,size,sortBy,query}` one server page
/// - `GET  {base}/{resource}/all` the full list
/// - `GET  {base}/{resource}/{id}` one report
/// - `POST {base}/{resource}/add` create
/// - `POST {base}/{resource}/update` replace
use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::ApiConfig;
use crate::table::ListQuery;
use crate::types::{AnyReport, PageEnvelope, ReportKind};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {source}")]
    Client {
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid API base URL: {url}")]
    InvalidUrl { url: String },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },

    #[error("unexpected {kind} payload: {source}")]
    Decode {
        kind: ReportKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("{kind} report {id} not found")]
    NotFound { kind: ReportKind, id: i64 },

    #[error("report has no id; add it before updating")]
    MissingId,
}

/// HTTP implementation of the report backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if reqwest::Url::parse(&base_url).is_err() {
            return Err(ApiError::InvalidUrl { url: base_url });
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|source| ApiError::Client { source })?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of `path` below the resource of `kind`
    pub fn endpoint(&self, kind: ReportKind, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, kind.resource(), path)
    }

    async fn send(&self, method: Method, url: String, body: Option<&AnyReport>) -> Result<Value, ApiError> {
        debug!("API: {} {}", method, url);
        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(|source| ApiError::Request {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        trace!("API: {} -> {}", url, status);
        if !status.is_success() {
            return Err(ApiError::Status { url, status });
        }
        response
            .json::<Value>()
            .await
            .map_err(|source| ApiError::Request { url, source })
    }

    pub async fn search(
        &self,
        kind: ReportKind,
        query: &ListQuery,
    ) -> Result<PageEnvelope<AnyReport>, ApiError> {
        let url = format!("{}?{}", self.endpoint(kind, "search"), query.to_query_string());
        let value = self.send(Method::POST, url, None).await?;
        let page: PageEnvelope<Value> =
            serde_json::from_value(value).map_err(|source| ApiError::Decode { kind, source })?;
        page.try_map(|v| AnyReport::from_json(kind, v))
            .map_err(|source| ApiError::Decode { kind, source })
    }

    pub async fn list_all(&self, kind: ReportKind) -> Result<Vec<AnyReport>, ApiError> {
        let value = self.send(Method::GET, self.endpoint(kind, "all"), None).await?;
        let items: Vec<Value> =
            serde_json::from_value(value).map_err(|source| ApiError::Decode { kind, source })?;
        items
            .into_iter()
            .map(|v| AnyReport::from_json(kind, v))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| ApiError::Decode { kind, source })
    }

    pub async fn get(&self, kind: ReportKind, id: i64) -> Result<AnyReport, ApiError> {
        let url = self.endpoint(kind, &id.to_string());
        let value = match self.send(Method::GET, url, None).await {
            Err(ApiError::Status { status, .. }) if status == StatusCode::NOT_FOUND => {
                return Err(ApiError::NotFound { kind, id })
            }
            other => other?,
        };
        AnyReport::from_json(kind, value).map_err(|source| ApiError::Decode { kind, source })
    }

    pub async fn add(&self, report: &AnyReport) -> Result<AnyReport, ApiError> {
        let kind = report.kind();
        let value = self
            .send(Method::POST, self.endpoint(kind, "add"), Some(report))
            .await?;
        decode_echo(kind, value, report)
    }

    pub async fn update(&self, report: &AnyReport) -> Result<AnyReport, ApiError> {
        if report.id().is_none() {
            return Err(ApiError::MissingId);
        }
        let kind = report.kind();
        let value = self
            .send(Method::POST, self.endpoint(kind, "update"), Some(report))
            .await?;
        decode_echo(kind, value, report)
    }
}

/// The backend echoes the stored record; an empty body means it stored ours
fn decode_echo(kind: ReportKind, value: Value, sent: &AnyReport) -> Result<AnyReport, ApiError> {
    if value.is_null() || value.as_object().is_some_and(|o| o.is_empty()) {
        return Ok(sent.clone());
    }
    AnyReport::from_json(kind, value).map_err(|source| ApiError::Decode { kind, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn client() -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: "http://localhost:8080/api/".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_paths() {
        let api = client();
        assert_eq!(api.base_url(), "http://localhost:8080/api");
        assert_eq!(
            api.endpoint(ReportKind::EarthTest, "search"),
            "http://localhost:8080/api/earth-test-report/search"
        );
        assert_eq!(
            api.endpoint(ReportKind::Acb, "42"),
            "http://localhost:8080/api/acb-report/42"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = ApiClient::new(&ApiConfig {
            base_url: "not a url".to_string(),
            timeout_secs: 5,
        });
        assert!(matches!(result, Err(ApiError::InvalidUrl { .. })));
    }

    #[test]
    fn test_decode_echo_falls_back_to_sent_record() {
        let sent = AnyReport::Acb(fixtures::acb_report(1));
        let echoed = decode_echo(ReportKind::Acb, Value::Null, &sent).unwrap();
        assert_eq!(echoed, sent);

        let stored = serde_json::to_value(&sent).unwrap();
        assert_eq!(decode_echo(ReportKind::Acb, stored, &sent).unwrap(), sent);
    }

    #[tokio::test]
    async fn test_update_without_id_is_rejected() {
        let mut report = AnyReport::Acb(fixtures::acb_report(1));
        report.header_mut().id = None;
        assert!(matches!(client().update(&report).await, Err(ApiError::MissingId)));
    }
}
