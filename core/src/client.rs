//! Stateless request builder and response mapper for the Open Legislation API.
//!
//! # Design
//! `OpenLegClient` holds only its `ClientConfig` and never changes after
//! construction. Queries are built from the config's defaults, turned into
//! `HttpRequest` values by `build_*`, and the caller's `HttpResponse` is
//! turned into an `ApiResponse` by `parse_response`. `fetch` chains the three
//! through a `Transport` for callers that do not want to drive the I/O.
//!
//! Each searchable document type has a named factory (`search_bills`,
//! `search_votes`, ...) over the generic `search()` builder.

use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError};
use crate::http::{HttpRequest, HttpResponse};
use crate::mapper::parse_bills;
use crate::query::{GetQuery, Query, SearchQuery, SearchQueryBuilder};
use crate::transport::Transport;
use crate::types::{Bill, Format, GetType, SearchType};

/// Body of a successful response, shaped by the requested [`Format`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse {
    /// Body exactly as the server sent it (`xml`, `json`, `csv`, `html`).
    RawBody(String),
    /// Bills mapped from an XML body (`object`).
    ParsedBills(Vec<Bill>),
}

impl ApiResponse {
    pub fn into_bills(self) -> Option<Vec<Bill>> {
        match self {
            ApiResponse::ParsedBills(bills) => Some(bills),
            ApiResponse::RawBody(_) => None,
        }
    }

    pub fn into_raw(self) -> Option<String> {
        match self {
            ApiResponse::RawBody(body) => Some(body),
            ApiResponse::ParsedBills(_) => None,
        }
    }
}

/// Synchronous, stateless client for the Open Legislation API.
#[derive(Debug, Clone)]
pub struct OpenLegClient {
    config: ClientConfig,
}

impl OpenLegClient {
    /// Client with default settings against `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self::with_config(ClientConfig::with_base_url(base_url))
    }

    pub fn with_config(mut config: ClientConfig) -> Self {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Get queries
    // -----------------------------------------------------------------------

    pub fn get(&self, doc_type: GetType, id: &str) -> Result<GetQuery, ConfigError> {
        Ok(GetQuery::new(doc_type, id)?
            .with_format(self.config.format)
            .with_version(self.config.version))
    }

    pub fn get_bill(&self, id: &str) -> Result<GetQuery, ConfigError> {
        self.get(GetType::Bill, id)
    }

    pub fn get_meeting(&self, id: &str) -> Result<GetQuery, ConfigError> {
        self.get(GetType::Meeting, id)
    }

    pub fn get_transcript(&self, id: &str) -> Result<GetQuery, ConfigError> {
        self.get(GetType::Transcript, id)
    }

    // -----------------------------------------------------------------------
    // Search queries
    // -----------------------------------------------------------------------

    /// Search builder seeded with this client's page size and format.
    pub fn search(&self) -> SearchQueryBuilder {
        SearchQuery::builder()
            .page_size(self.config.page_size.into())
            .format(self.config.format)
    }

    fn search_type(
        &self,
        search_type: SearchType,
        text: &str,
        page: i64,
    ) -> Result<SearchQuery, ConfigError> {
        self.search()
            .search_type(search_type)
            .text(text)
            .page(page)
            .build()
    }

    pub fn search_bills(&self, text: &str, page: i64) -> Result<SearchQuery, ConfigError> {
        self.search_type(SearchType::Bill, text, page)
    }

    pub fn search_votes(&self, text: &str, page: i64) -> Result<SearchQuery, ConfigError> {
        self.search_type(SearchType::Vote, text, page)
    }

    pub fn search_actions(&self, text: &str, page: i64) -> Result<SearchQuery, ConfigError> {
        self.search_type(SearchType::Action, text, page)
    }

    pub fn search_transcripts(&self, text: &str, page: i64) -> Result<SearchQuery, ConfigError> {
        self.search_type(SearchType::Transcript, text, page)
    }

    pub fn search_meetings(&self, text: &str, page: i64) -> Result<SearchQuery, ConfigError> {
        self.search_type(SearchType::Meeting, text, page)
    }

    pub fn search_calendars(&self, text: &str, page: i64) -> Result<SearchQuery, ConfigError> {
        self.search_type(SearchType::Calendar, text, page)
    }

    /// Bills introduced by `sponsor`.
    pub fn search_by_sponsor(&self, sponsor: &str, page: i64) -> Result<SearchQuery, ConfigError> {
        self.search()
            .search_type(SearchType::Bill)
            .sponsor(sponsor)
            .page(page)
            .build()
    }

    /// Bills referred to `committee`.
    pub fn search_by_committee(
        &self,
        committee: &str,
        page: i64,
    ) -> Result<SearchQuery, ConfigError> {
        self.search()
            .search_type(SearchType::Bill)
            .committee(committee)
            .page(page)
            .build()
    }

    // -----------------------------------------------------------------------
    // Requests and responses
    // -----------------------------------------------------------------------

    pub fn build_get(&self, query: &GetQuery) -> HttpRequest {
        self.request(query.url(&self.config.base_url))
    }

    pub fn build_search(&self, query: &SearchQuery) -> HttpRequest {
        self.request(query.url(&self.config.base_url))
    }

    pub fn build_request(&self, query: &Query) -> HttpRequest {
        self.request(query.url(&self.config.base_url))
    }

    fn request(&self, url: String) -> HttpRequest {
        debug!(%url, "built request");
        HttpRequest {
            url,
            headers: Vec::new(),
        }
    }

    /// Check the status, then map the body according to `format`.
    pub fn parse_response(
        &self,
        format: Format,
        request: &HttpRequest,
        response: HttpResponse,
    ) -> Result<ApiResponse, ApiError> {
        check_status(request, &response)?;
        if format.is_structured() {
            Ok(ApiResponse::ParsedBills(parse_bills(&response.body)?))
        } else {
            Ok(ApiResponse::RawBody(response.body))
        }
    }

    /// Build, execute, and map `query` in one call.
    pub fn fetch<T: Transport + ?Sized>(
        &self,
        transport: &T,
        query: impl Into<Query>,
    ) -> Result<ApiResponse, ApiError> {
        let query = query.into();
        let request = self.build_request(&query);
        let response = transport.execute(&request)?;
        self.parse_response(query.format(), &request, response)
    }
}

/// Anything outside 2xx is a transport failure; nothing is retried.
fn check_status(request: &HttpRequest, response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Transport {
        status: response.status,
        url: request.url.clone(),
        body: response.body.clone(),
    })
}
