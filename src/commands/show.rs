use anyhow::{Context, Result};

use crate::cache::refresh_report;
use crate::config::Config;
use crate::data_provider::ReportProvider;
use crate::report::{render_text, ReportDocument};
use crate::types::ReportKind;

/// Print a report as paginated text pages
pub async fn run(client: &dyn ReportProvider, kind: ReportKind, id: i64, config: &Config) -> Result<()> {
    let report = refresh_report(client, kind, id)
        .await
        .with_context(|| format!("Failed to fetch {} report {}", kind, id))?;

    let document = ReportDocument::build(&report, &config.print);
    println!("{}", render_text(&document, &config.display.box_chars));
    Ok(())
}
