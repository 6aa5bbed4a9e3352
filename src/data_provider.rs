/// Trait for providing report data, abstracting over the REST client and mock implementations
use async_trait::async_trait;

use crate::api::{ApiClient, ApiError};
use crate::table::ListQuery;
use crate::types::{AnyReport, PageEnvelope, ReportKind};

/// Trait for report data providers, implemented by both ApiClient and MockClient
#[async_trait]
pub trait ReportProvider: Send + Sync {
    /// One server-side page of a report list
    async fn search(
        &self,
        kind: ReportKind,
        query: &ListQuery,
    ) -> Result<PageEnvelope<AnyReport>, ApiError>;

    /// Every report of a kind, for client-side tables
    async fn list_all(&self, kind: ReportKind) -> Result<Vec<AnyReport>, ApiError>;

    /// A single report
    async fn get(&self, kind: ReportKind, id: i64) -> Result<AnyReport, ApiError>;

    /// Store a new report; returns the stored record
    async fn add(&self, report: &AnyReport) -> Result<AnyReport, ApiError>;

    /// Replace an existing report; returns the stored record
    async fn update(&self, report: &AnyReport) -> Result<AnyReport, ApiError>;
}

#[async_trait]
impl ReportProvider for ApiClient {
    async fn search(
        &self,
        kind: ReportKind,
        query: &ListQuery,
    ) -> Result<PageEnvelope<AnyReport>, ApiError> {
        ApiClient::search(self, kind, query).await
    }

    async fn list_all(&self, kind: ReportKind) -> Result<Vec<AnyReport>, ApiError> {
        ApiClient::list_all(self, kind).await
    }

    async fn get(&self, kind: ReportKind, id: i64) -> Result<AnyReport, ApiError> {
        ApiClient::get(self, kind, id).await
    }

    async fn add(&self, report: &AnyReport) -> Result<AnyReport, ApiError> {
        ApiClient::add(self, report).await
    }

    async fn update(&self, report: &AnyReport) -> Result<AnyReport, ApiError> {
        ApiClient::update(self, report).await
    }
}
