use std::sync::Arc;

use tracing::debug;

use super::action::{Action, ListPayload};
use super::component::Effect;
use crate::cache;
use crate::data_provider::ReportProvider;
use crate::table::ListQuery;
use crate::types::{AnyReport, ReportKind};

/// Effect handler for data fetching operations
///
/// Each method returns an `Effect::Async` that dispatches the matching
/// *Loaded/*Saved action when the provider answers.
pub struct DataEffects {
    client: Arc<dyn ReportProvider>,
}

impl DataEffects {
    pub fn new(client: Arc<dyn ReportProvider>) -> Self {
        Self { client }
    }

    /// One server page for `Some(query)`, every record for `None`
    ///
    /// Lists always go to the backend.
    pub fn fetch_list(&self, kind: ReportKind, query: Option<ListQuery>) -> Effect {
        let client = self.client.clone();
        Effect::Async(Box::pin(async move {
            let result = match &query {
                Some(q) => client.search(kind, q).await.map(ListPayload::Page),
                None => client.list_all(kind).await.map(ListPayload::All),
            };
            Action::ListLoaded {
                kind,
                query,
                result: result.map_err(|e| e.to_string()),
            }
        }))
    }

    /// Fetch a full report (with caching)
    pub fn fetch_report(&self, kind: ReportKind, id: i64) -> Effect {
        let client = self.client.clone();
        Effect::Async(Box::pin(async move {
            let result = cache::fetch_report_cached(client.as_ref(), kind, id).await;
            Action::ReportLoaded {
                kind,
                id,
                result: result.map_err(|e| e.to_string()),
            }
        }))
    }

    /// Store an edited report and refresh its cached copy
    pub fn save_report(&self, report: AnyReport) -> Effect {
        let client = self.client.clone();
        Effect::Async(Box::pin(async move {
            let kind = report.kind();
            let id = report.id().unwrap_or_default();
            debug!("EFFECT: saving {} report {}", kind, id);
            let result = cache::update_report(client.as_ref(), &report).await;
            Action::ReportSaved {
                kind,
                id,
                result: result.map_err(|e| e.to_string()),
            }
        }))
    }
}
