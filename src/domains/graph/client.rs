//! Graph API client facade used by the tools.

use std::sync::Arc;

use tracing::info;

use super::query::{EntityKind, GraphRequest, InsightsQuery, ListQuery, StatusFilter};
use super::{GraphError, GraphResult, HttpPageSource, Normalizer, PageSource, Pager, Record};
use crate::core::config::{CredentialsConfig, GraphConfig};

/// Client for the Facebook Marketing API.
///
/// Built once at startup. Holds no per-call state: every method issues its
/// own sequential chain of page requests and returns owned rows.
#[derive(Clone)]
pub struct GraphClient {
    source: Arc<dyn PageSource>,
    normalizer: Normalizer,
    page_limit: u32,
}

impl GraphClient {
    /// Build the HTTP-backed client.
    ///
    /// Fails with [`GraphError::MissingAccessToken`] when no non-blank token
    /// is configured.
    pub fn from_config(graph: &GraphConfig, credentials: &CredentialsConfig) -> GraphResult<Self> {
        let token = credentials
            .access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(GraphError::MissingAccessToken)?;

        let source = HttpPageSource::new(graph, token);
        info!(
            base_url = source.base_url(),
            timeout_secs = graph.timeout_secs,
            "Graph API client configured"
        );

        Ok(Self::with_source(Arc::new(source), graph.page_limit))
    }

    /// Build a client over any page source.
    pub fn with_source(source: Arc<dyn PageSource>, page_limit: u32) -> Self {
        Self {
            source,
            normalizer: Normalizer::default(),
            page_limit: page_limit.max(1),
        }
    }

    /// Replace the insights normalizer.
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn page_limit(&self) -> u32 {
        self.page_limit
    }

    /// Fetch every page of a resolved request.
    pub fn fetch_all(&self, request: GraphRequest) -> GraphResult<Vec<Record>> {
        Pager::new(self.source.as_ref()).fetch_all(&request.endpoint, request.params)
    }

    /// All ad accounts accessible with the configured token.
    pub fn ad_accounts(&self) -> GraphResult<Vec<Record>> {
        self.fetch_all(GraphRequest::ad_accounts(self.page_limit))
    }

    pub fn campaigns(
        &self,
        account_id: &str,
        status: Option<StatusFilter>,
    ) -> GraphResult<Vec<Record>> {
        self.entities(account_id, EntityKind::Campaigns, status)
    }

    pub fn ad_sets(
        &self,
        account_id: &str,
        status: Option<StatusFilter>,
    ) -> GraphResult<Vec<Record>> {
        self.entities(account_id, EntityKind::AdSets, status)
    }

    pub fn ads(&self, account_id: &str, status: Option<StatusFilter>) -> GraphResult<Vec<Record>> {
        self.entities(account_id, EntityKind::Ads, status)
    }

    /// List entities of `kind` under an account.
    pub fn entities(
        &self,
        account_id: &str,
        kind: EntityKind,
        status: Option<StatusFilter>,
    ) -> GraphResult<Vec<Record>> {
        let request = ListQuery::new(account_id, kind)
            .with_status(status)
            .build(self.page_limit)?;
        self.fetch_all(request)
    }

    /// Fetch an insights report.
    ///
    /// With `normalize` set the rows are flattened and then numerically
    /// typed; otherwise they are returned exactly as the API sent them.
    pub fn insights(&self, query: &InsightsQuery, normalize: bool) -> GraphResult<Vec<Record>> {
        let rows = self.fetch_all(query.build(self.page_limit)?)?;
        if normalize {
            Ok(self.normalizer.normalize(rows))
        } else {
            Ok(rows)
        }
    }
}

impl std::fmt::Debug for GraphClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphClient")
            .field("normalizer", &self.normalizer)
            .field("page_limit", &self.page_limit)
            .finish_non_exhaustive()
    }
}
