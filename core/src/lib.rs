//! Synchronous client core for the Open Legislation API.
//!
//! # Overview
//! Builds request URLs for `get` (one document by id) and `search` (a page of
//! documents matching a boolean term) and maps XML responses into [`Bill`]
//! records. The core never touches the network itself (host-does-IO
//! pattern); the caller executes each `HttpRequest`, or hands a
//! [`Transport`] to [`OpenLegClient::fetch`].
//!
//! # Design
//! - `OpenLegClient` is stateless: it holds only an immutable `ClientConfig`.
//! - Invalid parameters are rejected while a query is built, as
//!   `ConfigError`, before a request exists.
//! - `Format::Object` requests XML and yields `ApiResponse::ParsedBills`;
//!   every other format yields `ApiResponse::RawBody`.
//!
//! ```no_run
//! use openleg_core::{OpenLegClient, UreqTransport};
//!
//! let client = OpenLegClient::new("http://open.nysenate.gov/legislation");
//! let query = client.search_by_sponsor("alesi", 1)?;
//! let bills = client.fetch(&UreqTransport::new(), query)?.into_bills();
//! # Ok::<(), openleg_core::ApiError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod mapper;
pub mod query;
pub mod transport;
pub mod types;

pub use client::{ApiResponse, OpenLegClient};
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError};
pub use http::{HttpRequest, HttpResponse};
pub use mapper::parse_bills;
pub use query::{GetQuery, Query, SearchQuery, SearchQueryBuilder};
pub use transport::Transport;
#[cfg(feature = "blocking")]
pub use transport::UreqTransport;
pub use types::{ApiVersion, Bill, Format, GetType, Page, PageSize, SearchType};
