use cached::proc_macro::cached;
use tracing::debug;

use crate::api::ApiError;
use crate::data_provider::ReportProvider;
use crate::types::{AnyReport, ReportKind};

pub use cached::Cached;

#[cfg(test)]
pub async fn clear_all_caches() {
    REPORT_CACHE.lock().await.cache_clear();
}

#[cfg(test)]
pub async fn report_cache_size() -> usize {
    REPORT_CACHE.lock().await.cache_size()
}

/// Single reports, keyed by kind and id
///
/// Lists are never cached: every navigation refetches so the table reflects
/// the backend.
#[cached(
    name = "REPORT_CACHE",
    type = "cached::TimedSizedCache<(ReportKind, i64), AnyReport>",
    create = "{ cached::TimedSizedCache::with_size_and_lifespan(64, 300) }",
    convert = r#"{ (kind, id) }"#,
    result = true
)]
pub async fn fetch_report_cached(
    client: &dyn ReportProvider,
    kind: ReportKind,
    id: i64,
) -> Result<AnyReport, ApiError> {
    client.get(kind, id).await
}

/// Drop one report so the next fetch goes to the backend
pub async fn invalidate_report(kind: ReportKind, id: i64) {
    REPORT_CACHE.lock().await.cache_remove(&(kind, id));
}

/// Bypass the cached copy and store the fresh one
pub async fn refresh_report(
    client: &dyn ReportProvider,
    kind: ReportKind,
    id: i64,
) -> Result<AnyReport, ApiError> {
    invalidate_report(kind, id).await;
    fetch_report_cached(client, kind, id).await
}

/// Update through the provider and replace the cached copy with the stored record
pub async fn update_report(
    client: &dyn ReportProvider,
    report: &AnyReport,
) -> Result<AnyReport, ApiError> {
    let kind = report.kind();
    if let Some(id) = report.id() {
        invalidate_report(kind, id).await;
    }
    let stored = client.update(report).await?;
    if let Some(id) = stored.id() {
        debug!("CACHE: storing updated {} report {}", kind, id);
        REPORT_CACHE.lock().await.cache_set((kind, id), stored.clone());
    }
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dev::mock_client::MockClient;

    // Each test uses its own ids; the cache is process-wide.

    #[tokio::test]
    async fn test_second_fetch_is_served_from_cache() {
        let client = MockClient::new();
        let first = fetch_report_cached(&client, ReportKind::Acb, 2).await.unwrap();
        let second = fetch_report_cached(&client, ReportKind::Acb, 2).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(client.get_calls(), 1);
    }

    #[tokio::test]
    async fn test_refresh_goes_to_provider() {
        let client = MockClient::new();
        fetch_report_cached(&client, ReportKind::HtBreaker, 3).await.unwrap();
        refresh_report(&client, ReportKind::HtBreaker, 3).await.unwrap();
        assert_eq!(client.get_calls(), 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let client = MockClient::new();
        assert!(fetch_report_cached(&client, ReportKind::Acb, 9999).await.is_err());
        assert!(fetch_report_cached(&client, ReportKind::Acb, 9999).await.is_err());
        assert_eq!(client.get_calls(), 2);
    }

    #[tokio::test]
    async fn test_update_replaces_cached_copy() {
        let client = MockClient::new();
        let mut report = fetch_report_cached(&client, ReportKind::EarthTest, 4).await.unwrap();
        report.header_mut().stamp_offset_x = 120.0;
        update_report(&client, &report).await.unwrap();

        let cached = fetch_report_cached(&client, ReportKind::EarthTest, 4).await.unwrap();
        assert_eq!(cached.header().stamp_offset_x, 120.0);
        assert_eq!(client.get_calls(), 1);
    }

    #[tokio::test]
    #[ignore] // Shared cache state - run individually
    async fn test_clear_all_caches() {
        let client = MockClient::new();
        let _ = fetch_report_cached(&client, ReportKind::OilFiltration, 1).await;
        assert!(report_cache_size().await > 0);
        clear_all_caches().await;
        assert_eq!(report_cache_size().await, 0);
    }
}
