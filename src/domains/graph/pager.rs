//! Cursor-following pagination.
//!
//! Graph listings answer with `{"data": [...], "paging": {"next": "<url>"}}`.
//! The `next` URL is self-contained: its query string already encodes the
//! cursor and the original filters, so it replaces the previous parameters
//! entirely. Pages are requested one after another until a response has no
//! `paging` object or no `next` entry inside it.
//!
//! No upper bound on the page count is enforced. A server that keeps handing
//! out `next` URLs keeps being followed.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::{GraphError, GraphResult, PageSource, QueryParams, Record};

/// One decoded response body.
#[derive(Debug, Default, Deserialize)]
pub struct Page {
    #[serde(default)]
    data: Option<Vec<Record>>,

    #[serde(default)]
    paging: Option<Paging>,
}

/// Pagination descriptor of a page.
#[derive(Debug, Default, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub next: Option<String>,
}

impl Page {
    /// Decode a response body.
    pub fn from_body(body: Value) -> GraphResult<Self> {
        serde_json::from_value(body)
            .map_err(|e| GraphError::transport(format!("invalid page body ({e})")))
    }

    /// The URL of the following page, if any.
    pub fn next_url(&self) -> Option<&str> {
        self.paging.as_ref().and_then(|p| p.next.as_deref())
    }

    /// Consume the page, yielding its rows.
    pub fn into_rows(self) -> Vec<Record> {
        self.data.unwrap_or_default()
    }
}

/// Parse the query string of a `next` URL into fresh request parameters.
///
/// The cursor token is treated as opaque. Repeated keys keep the last value.
pub fn next_page_params(next_url: &str) -> GraphResult<QueryParams> {
    let query = next_url
        .split_once('?')
        .map(|(_, q)| q)
        .unwrap_or_default();
    let query = query.split('#').next().unwrap_or_default();

    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
        .map_err(|e| GraphError::transport(format!("invalid next-page URL ({e})")))?;

    Ok(pairs.into_iter().collect())
}

/// Follows `next` cursors until a listing is exhausted.
pub struct Pager<'a> {
    source: &'a dyn PageSource,
}

impl<'a> Pager<'a> {
    pub fn new(source: &'a dyn PageSource) -> Self {
        Self { source }
    }

    /// Fetch every page of `endpoint`, starting with `params`.
    ///
    /// Rows come back in page order, row order preserved within a page, with
    /// no de-duplication. Any failed page fails the whole call and the rows
    /// gathered so far are dropped.
    #[instrument(skip(self, params), fields(endpoint = %endpoint))]
    pub fn fetch_all(&self, endpoint: &str, params: QueryParams) -> GraphResult<Vec<Record>> {
        let mut rows = Vec::new();
        let mut params = params;
        let mut pages = 0usize;

        loop {
            let page = Page::from_body(self.source.get(endpoint, &params)?)?;
            pages += 1;

            let next = page.next_url().map(next_page_params).transpose()?;
            let page_rows = page.into_rows();
            debug!(page = pages, rows = page_rows.len(), has_next = next.is_some(), "Fetched page");
            rows.extend(page_rows);

            match next {
                Some(next_params) => params = next_params,
                None => break,
            }
        }

        info!(pages, rows = rows.len(), "Fetched all pages");
        Ok(rows)
    }
}
