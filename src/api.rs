//! Client for the mail log query endpoint.
//!
//! The endpoint is a single `GET <base>?<filter-terms>&page=<n>&limit=<n>`
//! that answers with `{ "result": [...], "total_pages": n }`. Filtering and
//! pagination happen server side; this module only builds the URL and
//! decodes the page.

use std::time::Duration;

use url::Url;

use crate::email::{FetchResult, PageResponse};
use crate::error::FetchError;

/// Default endpoint of the mail log web service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api/emails";

/// Parameters of one page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    /// Effective filter terms, already projected from the filter state.
    pub filter: Vec<(String, String)>,
    /// 1-based page index.
    pub page: u32,
    /// Records per page.
    pub limit: u32,
}

impl PageQuery {
    /// Query pairs in wire order: filter terms, then `page` and `limit`.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.filter.clone();
        pairs.push(("page".to_string(), self.page.to_string()));
        pairs.push(("limit".to_string(), self.limit.to_string()));
        pairs
    }

    /// Full request URL below `base`. Any query string already on `base`
    /// is replaced.
    pub fn url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.set_query(None);
        url.query_pairs_mut().extend_pairs(self.pairs());
        url
    }
}

/// Handle on the query endpoint. Cheap to clone; clones share the
/// connection pool.
#[derive(Debug, Clone)]
pub struct EmailApi {
    client: reqwest::Client,
    base_url: Url,
}

impl EmailApi {
    /// Builds a client with the given request timeout.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("maillog-browser/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Transport)?;
        Ok(Self { client, base_url })
    }

    /// Wraps an existing reqwest client.
    pub fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetches one page. Transport failures, non-2xx answers and bodies that
    /// do not decode are all errors; nothing is partially returned.
    pub async fn fetch_page(&self, query: &PageQuery) -> Result<FetchResult, FetchError> {
        let url = query.url(&self.base_url);
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(FetchError::Transport)?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                detail: PageResponse::error_detail(&body),
            });
        }
        PageResponse::decode(&body)
    }
}
