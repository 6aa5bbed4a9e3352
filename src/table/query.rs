/// Query-string protocol for server-driven lists
///
/// `page` (zero based), `size`, `sortBy` (`<column>,<asc|desc>`, comma kept
/// literal) and `query` (free text, form encoded). The parsed `ListQuery` is
/// the single source of truth for a server-driven table.
use reqwest::Url;
use tracing::trace;

use super::sort::SortBy;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Throwaway origin used to run query strings through the URL parser
const QUERY_BASE: &str = "http://query.local/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: usize,
    pub size: usize,
    pub sort_by: Option<SortBy>,
    pub query: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort_by: None,
            query: None,
        }
    }
}

impl ListQuery {
    pub fn with_size(size: usize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Parse a query string (with or without the leading `?`)
    ///
    /// Missing or malformed values fall back to their defaults; a blank
    /// `query` is treated as absent.
    pub fn parse(raw: &str) -> Self {
        let mut parsed = Self::default();
        let raw = raw.trim_start_matches('?');
        let url = match Url::parse(&format!("{}?{}", QUERY_BASE, raw)) {
            Ok(url) => url,
            Err(e) => {
                trace!("QUERY: unparseable query string '{}': {}", raw, e);
                return parsed;
            }
        };

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "page" => {
                    if let Ok(page) = value.trim().parse() {
                        parsed.page = page;
                    }
                }
                "size" => {
                    if let Ok(size) = value.trim().parse::<usize>() {
                        if size > 0 {
                            parsed.size = size;
                        }
                    }
                }
                "sortBy" => parsed.sort_by = value.parse().ok(),
                "query" => {
                    parsed.query = Some(value.trim().to_string()).filter(|q| !q.is_empty());
                }
                other => trace!("QUERY: ignoring parameter '{}'", other),
            }
        }
        parsed
    }

    /// Serialize in `page`, `size`, `sortBy`, `query` order
    pub fn to_query_string(&self) -> String {
        let mut out = encode_pairs(&[
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
        ]);
        if let Some(sort) = &self.sort_by {
            out.push_str("&sortBy=");
            out.push_str(&sort.to_string());
        }
        if let Some(query) = &self.query {
            out.push('&');
            out.push_str(&encode_pairs(&[("query", query.clone())]));
        }
        out
    }

    /// Same query with the free-text search replaced and the page reset
    pub fn with_search(&self, text: &str) -> Self {
        Self {
            page: 0,
            query: Some(text.trim().to_string()).filter(|q| !q.is_empty()),
            ..self.clone()
        }
    }

    pub fn with_sort(&self, sort_by: Option<SortBy>) -> Self {
        Self {
            sort_by,
            ..self.clone()
        }
    }

    pub fn with_page(&self, page: usize) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }
}

fn encode_pairs(pairs: &[(&str, String)]) -> String {
    Url::parse_with_params(QUERY_BASE, pairs)
        .ok()
        .and_then(|url| url.query().map(str::to_string))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let query = ListQuery::parse("");
        assert_eq!(query, ListQuery::default());
        assert_eq!(query.size, 10);
    }

    #[test]
    fn test_parse_full_query() {
        let query = ListQuery::parse("?page=2&size=20&sortBy=reportDate,desc&query=dg+room");
        assert_eq!(query.page, 2);
        assert_eq!(query.size, 20);
        assert_eq!(query.sort_by, Some(SortBy::desc("reportDate")));
        assert_eq!(query.query.as_deref(), Some("dg room"));
    }

    #[test]
    fn test_parse_malformed_values_fall_back() {
        let query = ListQuery::parse("page=-1&size=0&sortBy=reportDate&query=%20%20");
        assert_eq!(query.page, 0);
        assert_eq!(query.size, 10);
        assert_eq!(query.sort_by, None);
        assert_eq!(query.query, None);
    }

    #[test]
    fn test_to_query_string_keeps_literal_comma() {
        let query = ListQuery {
            page: 1,
            size: 10,
            sort_by: Some(SortBy::asc("clientName")),
            query: Some("a&b c".to_string()),
        };
        assert_eq!(
            query.to_query_string(),
            "page=1&size=10&sortBy=clientName,asc&query=a%26b+c"
        );
        assert_eq!(ListQuery::parse(&query.to_query_string()), query);
    }

    #[test]
    fn test_with_search_resets_page() {
        let query = ListQuery::parse("page=3&size=20");
        let searched = query.with_search("DG");
        assert_eq!(searched.page, 0);
        assert_eq!(searched.size, 20);
        assert_eq!(searched.query.as_deref(), Some("DG"));
        assert_eq!(searched.with_search("").query, None);
    }
}
