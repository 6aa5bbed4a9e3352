/// Mock report backend for development and testing
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::sync::Mutex;
use tracing::info;

use crate::api::ApiError;
use crate::data_provider::ReportProvider;
use crate::fixtures;
use crate::table::{ListQuery, SortDirection};
use crate::types::{AnyReport, PageEnvelope, Pageable, ReportKind};

/// Mock client that serves fixture data from memory instead of making HTTP calls
///
/// Search mimics the backend: free-text match on report number, client and
/// site, optional sort, then a page slice.
pub struct MockClient {
    store: Mutex<BTreeMap<(ReportKind, i64), AnyReport>>,
    fail: bool,
    get_calls: AtomicUsize,
}

impl MockClient {
    /// Create a new mock client seeded with the fixtures
    pub fn new() -> Self {
        info!("Creating MockClient for development mode");
        let store = ReportKind::all()
            .into_iter()
            .flat_map(fixtures::reports)
            .filter_map(|r| r.id().map(|id| ((r.kind(), id), r)))
            .collect();
        Self {
            store: Mutex::new(store),
            fail: false,
            get_calls: AtomicUsize::new(0),
        }
    }

    /// A client whose every call fails with a server error
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Number of `get` calls served so far
    pub fn get_calls(&self) -> usize {
        self.get_calls.load(AtomicOrdering::SeqCst)
    }

    fn check(&self, kind: ReportKind) -> Result<(), ApiError> {
        if self.fail {
            return Err(ApiError::Status {
                url: format!("mock://{}", kind.resource()),
                status: StatusCode::INTERNAL_SERVER_ERROR,
            });
        }
        Ok(())
    }

    async fn all_of(&self, kind: ReportKind) -> Vec<AnyReport> {
        self.store
            .lock()
            .await
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .map(|(_, r)| r.clone())
            .collect()
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_search(report: &AnyReport, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    let header = report.header();
    [&header.report_no, &header.client_name, &header.site_location]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

fn compare_by(column: &str, a: &AnyReport, b: &AnyReport) -> Ordering {
    let (a, b) = (a.header(), b.header());
    match column {
        "reportNo" => a.report_no.cmp(&b.report_no),
        "clientName" => a.client_name.cmp(&b.client_name),
        "siteLocation" => a.site_location.cmp(&b.site_location),
        "reportDate" => a.report_date.cmp(&b.report_date),
        _ => a.id.cmp(&b.id),
    }
}

#[async_trait]
impl ReportProvider for MockClient {
    async fn search(
        &self,
        kind: ReportKind,
        query: &ListQuery,
    ) -> Result<PageEnvelope<AnyReport>, ApiError> {
        info!("MockClient: search {} ?{}", kind, query.to_query_string());
        self.check(kind)?;

        let mut matching: Vec<AnyReport> = self
            .all_of(kind)
            .await
            .into_iter()
            .filter(|r| query.query.as_deref().map_or(true, |q| matches_search(r, q)))
            .collect();
        if let Some(sort) = &query.sort_by {
            matching.sort_by(|a, b| {
                let ordering = compare_by(&sort.column, a, b);
                match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        let size = query.size.max(1);
        let total_elements = matching.len();
        let total_pages = total_elements.div_ceil(size);
        let content: Vec<AnyReport> = matching
            .into_iter()
            .skip(query.page * size)
            .take(size)
            .collect();

        Ok(PageEnvelope {
            number_of_elements: content.len(),
            content,
            pageable: Pageable {
                page_number: query.page,
                page_size: size,
            },
            total_pages,
            total_elements,
            first: query.page == 0,
            last: query.page + 1 >= total_pages,
        })
    }

    async fn list_all(&self, kind: ReportKind) -> Result<Vec<AnyReport>, ApiError> {
        info!("MockClient: list all {}", kind);
        self.check(kind)?;
        Ok(self.all_of(kind).await)
    }

    async fn get(&self, kind: ReportKind, id: i64) -> Result<AnyReport, ApiError> {
        info!("MockClient: get {} {}", kind, id);
        self.get_calls.fetch_add(1, AtomicOrdering::SeqCst);
        self.check(kind)?;
        self.store
            .lock()
            .await
            .get(&(kind, id))
            .cloned()
            .ok_or(ApiError::NotFound { kind, id })
    }

    async fn add(&self, report: &AnyReport) -> Result<AnyReport, ApiError> {
        let kind = report.kind();
        self.check(kind)?;
        let mut store = self.store.lock().await;
        let next_id = store
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, id)| *id)
            .max()
            .unwrap_or(0)
            + 1;
        let mut stored = report.clone();
        stored.header_mut().id = Some(next_id);
        info!("MockClient: add {} {}", kind, next_id);
        store.insert((kind, next_id), stored.clone());
        Ok(stored)
    }

    async fn update(&self, report: &AnyReport) -> Result<AnyReport, ApiError> {
        let kind = report.kind();
        self.check(kind)?;
        let id = report.id().ok_or(ApiError::MissingId)?;
        let mut store = self.store.lock().await;
        if !store.contains_key(&(kind, id)) {
            return Err(ApiError::NotFound { kind, id });
        }
        info!("MockClient: update {} {}", kind, id);
        store.insert((kind, id), report.clone());
        Ok(report.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::SortBy;

    #[tokio::test]
    async fn test_search_pages_and_metadata() {
        let client = MockClient::new();
        let page = client
            .search(ReportKind::Acb, &ListQuery::parse("page=1&size=5"))
            .await
            .unwrap();
        assert_eq!(page.content.len(), 5);
        assert_eq!(page.total_elements, 12);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page(), 1);
        assert!(!page.first && !page.last);
        assert_eq!(page.content[0].id(), Some(6));
    }

    #[tokio::test]
    async fn test_search_filters_and_sorts() {
        let client = MockClient::new();
        let query = ListQuery {
            sort_by: Some(SortBy::desc("reportNo")),
            query: Some("harbor".to_string()),
            ..ListQuery::default()
        };
        let page = client.search(ReportKind::EarthTest, &query).await.unwrap();
        assert!(page.total_elements > 0);
        assert!(page
            .content
            .iter()
            .all(|r| r.header().client_name.contains("Harbor")));
        let numbers: Vec<&str> = page.content.iter().map(|r| r.header().report_no.as_str()).collect();
        let mut sorted = numbers.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(numbers, sorted);
    }

    #[tokio::test]
    async fn test_add_assigns_next_id() {
        let client = MockClient::new();
        let mut report = fixtures::report(ReportKind::OilFiltration, 1);
        report.header_mut().id = None;
        let stored = client.add(&report).await.unwrap();
        assert_eq!(stored.id(), Some(13));
        assert_eq!(client.list_all(ReportKind::OilFiltration).await.unwrap().len(), 13);
    }

    #[tokio::test]
    async fn test_failing_client() {
        let client = MockClient::failing();
        assert!(client.list_all(ReportKind::Acb).await.is_err());
        assert!(matches!(
            client.get(ReportKind::Acb, 1).await,
            Err(ApiError::Status { .. })
        ));
    }
}
