use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::data_provider::ReportProvider;
use crate::types::{AnyReport, ReportKind};
use crate::validation::validate;

/// Read a JSON record of `kind` from disk
pub fn load_report(kind: ReportKind, path: &Path) -> Result<AnyReport> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    AnyReport::from_json(kind, value)
        .with_context(|| format!("{} is not a valid {} report", path.display(), kind))
}

/// Validate and store the record; returns the stored copy
pub async fn submit(client: &dyn ReportProvider, report: &AnyReport, update: bool) -> Result<AnyReport> {
    validate(report)?;

    let stored = if update {
        if report.id().is_none() {
            bail!("--update needs a report with an \"id\"");
        }
        crate::cache::update_report(client, report)
            .await
            .context("Failed to update report")?
    } else {
        client.add(report).await.context("Failed to add report")?
    };
    info!(
        "SUBMIT: stored {} report {:?} ({})",
        stored.kind(),
        stored.id(),
        stored.header().report_no
    );
    Ok(stored)
}

pub async fn run(client: &dyn ReportProvider, kind: ReportKind, file: &Path, update: bool) -> Result<()> {
    let report = load_report(kind, file)?;
    let stored = submit(client, &report, update).await?;
    match stored.id() {
        Some(id) => println!("Stored {} report {} (id {})", kind, stored.header().report_no, id),
        None => println!("Stored {} report {}", kind, stored.header().report_no),
    }
    Ok(())
}
