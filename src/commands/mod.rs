pub mod list;
pub mod show;
pub mod submit;

use anyhow::{Context, Result};

use crate::table::SortBy;

/// Parse a `--sort-by column,dir` argument
///
/// A bare column name sorts ascending.
pub fn parse_sort_arg(arg: Option<String>) -> Result<Option<SortBy>> {
    match arg {
        None => Ok(None),
        Some(raw) if !raw.contains(',') => Ok(Some(SortBy::asc(raw.trim()))),
        Some(raw) => raw
            .parse::<SortBy>()
            .map(Some)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Invalid sort '{}'. Use column,asc or column,desc", raw)),
    }
}
