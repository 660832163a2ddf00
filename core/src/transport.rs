//! Executing requests.
//!
//! The core never opens a connection on its own; `OpenLegClient::fetch`
//! hands each `HttpRequest` to a `Transport`. Any closure
//! `Fn(&HttpRequest) -> Result<HttpResponse, ApiError>` is a transport, which
//! is how tests stub the network. With the `blocking` feature, `UreqTransport`
//! performs real GETs.

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

pub trait Transport {
    /// Perform the round-trip. Non-2xx statuses are returned as data, not
    /// as errors; the client decides what a status means.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, ApiError>,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self(request)
    }
}

#[cfg(feature = "blocking")]
pub use blocking::UreqTransport;

#[cfg(feature = "blocking")]
mod blocking {
    use tracing::debug;

    use super::Transport;
    use crate::error::ApiError;
    use crate::http::{HttpRequest, HttpResponse};

    /// Blocking transport backed by a `ureq::Agent`.
    ///
    /// Timeouts and proxies are the agent's business; build one with
    /// [`UreqTransport::with_agent`] to change them. The agent must not treat
    /// HTTP statuses as errors.
    #[derive(Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl UreqTransport {
        pub fn new() -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self { agent }
        }

        pub fn with_agent(agent: ureq::Agent) -> Self {
            Self { agent }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Transport for UreqTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            let connection_error = |e: ureq::Error| ApiError::Connection {
                url: request.url.clone(),
                message: e.to_string(),
            };

            let mut builder = self.agent.get(&request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            let mut response = builder.call().map_err(connection_error)?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = response
                .body_mut()
                .read_to_string()
                .map_err(connection_error)?;

            debug!(url = %request.url, status, "request completed");
            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}
