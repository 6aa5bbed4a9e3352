use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::config::{Config, DisplayConfig};
use crate::data_provider::ReportProvider;
use crate::formatting::{fit_cell, format_header};
use crate::report::{list_columns, record_key};
use crate::table::{
    column_metas, extract_rows, Alignment, ListQuery, SortDirection, TableModel, TableTiming,
    TableView, EMPTY_MESSAGE,
};
use crate::types::ReportKind;

/// Column gap in CLI tables
const COLUMN_SPACING: usize = 2;

/// How `list` should fetch and shape its rows
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub query: ListQuery,
    /// Fetch everything and filter/sort/paginate locally
    pub all: bool,
}

/// Format a table frame as plain text
pub fn format_table_view(title: &str, view: &TableView, display: &DisplayConfig) -> String {
    let mut output = format_header(title, true, display);

    let header: Vec<String> = view
        .columns
        .iter()
        .map(|c| {
            let mark = match c.sort {
                Some(SortDirection::Asc) => display.box_chars.sort_asc.as_str(),
                Some(SortDirection::Desc) => display.box_chars.sort_desc.as_str(),
                None => "",
            };
            fit_cell(&format!("{}{}", c.header, mark), c.width, c.align)
        })
        .collect();
    let header_line = header.join(&" ".repeat(COLUMN_SPACING));
    output.push_str(header_line.trim_end());
    output.push('\n');

    let total_width: usize = view.columns.iter().map(|c| c.width).sum::<usize>()
        + COLUMN_SPACING * view.columns.len().saturating_sub(1);
    output.push_str(&display.box_chars.horizontal.repeat(total_width));
    output.push('\n');

    if view.empty {
        output.push_str(&fit_cell(EMPTY_MESSAGE, total_width, Alignment::Center));
        output.push('\n');
    }

    for row in &view.rows {
        let cells: Vec<String> = view
            .columns
            .iter()
            .zip(&row.cells)
            .map(|(c, cell)| fit_cell(&cell.display_text(), c.width, c.align))
            .collect();
        let line = cells.join(&" ".repeat(COLUMN_SPACING));
        output.push_str(line.trim_end());
        output.push('\n');
        if let Some(expanded) = &row.expanded {
            output.push_str(&format!("    {}\n", expanded));
        }
    }

    output.push('\n');
    output.push_str(&format!(
        "{}  ({} reports, {} per page)\n",
        view.controls.label(),
        view.controls.total_rows,
        view.page_size
    ));
    output
}

/// Build the table for `kind` the way the TUI would, then print one page
pub async fn run(
    client: &dyn ReportProvider,
    kind: ReportKind,
    options: ListOptions,
    config: &Config,
) -> Result<()> {
    let columns = list_columns(kind);
    let metas = column_metas(&columns);
    let now = Instant::now();

    let model = if options.all {
        let reports = client
            .list_all(kind)
            .await
            .with_context(|| format!("Failed to fetch {} reports", kind))?;
        let mut model = TableModel::client(metas, crate::table::PageSize::at_least(options.query.size))
            .with_timing(TableTiming {
                debounce: Duration::ZERO,
                min_loading: Duration::ZERO,
            });
        model.set_rows(extract_rows(&columns, &reports, record_key));
        if let Some(sort) = &options.query.sort_by {
            model.toggle_sort(&sort.column);
            if sort.direction == SortDirection::Desc {
                model.toggle_sort(&sort.column);
            }
        }
        if let Some(text) = &options.query.query {
            model.input_global(text, now);
        }
        model.tick(now);
        for _ in 0..options.query.page {
            model.next_page();
        }
        model
    } else {
        let page = client
            .search(kind, &options.query)
            .await
            .with_context(|| format!("Failed to search {} reports", kind))?;
        let mut model = TableModel::server(metas, options.query.clone());
        model.set_server_page(
            extract_rows(&columns, &page.content, record_key),
            page.total_pages,
            page.total_elements,
        );
        model
    };

    let view = model.view(now, false, None);
    print!("{}", format_table_view(kind.title(), &view, &config.display));
    Ok(())
}
