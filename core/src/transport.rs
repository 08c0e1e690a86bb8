//! Real-network connections backed by `ureq`.

use tracing::trace;
use ureq::http::Request;
use ureq::Agent;

use crate::connection::{Connection, ConnectionFactory, Endpoint};
use crate::error::ApiError;
use crate::http::{Headers, HttpMethod, HttpResponse, RequestBody};

/// Opens `NetworkConnection`s that share one `ureq::Agent`.
///
/// The agent returns 4xx/5xx responses as data rather than `Err`, so status
/// interpretation stays with the client.
#[derive(Debug, Clone)]
pub struct NetworkConnector {
    agent: Agent,
}

impl NetworkConnector {
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for NetworkConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionFactory for NetworkConnector {
    fn connect(&self, endpoint: &Endpoint) -> Result<Box<dyn Connection>, ApiError> {
        Ok(Box::new(NetworkConnection {
            endpoint: endpoint.clone(),
            agent: self.agent.clone(),
            response: None,
        }))
    }
}

/// A single round-trip over the network.
///
/// `request` performs the whole exchange and buffers the response, which
/// `get_response` then hands out exactly once.
pub struct NetworkConnection {
    endpoint: Endpoint,
    agent: Agent,
    response: Option<HttpResponse>,
}

impl Connection for NetworkConnection {
    fn request(
        &mut self,
        method: HttpMethod,
        url: &str,
        body: Option<&RequestBody>,
        headers: &Headers,
    ) -> Result<(), ApiError> {
        let full_url = self.endpoint.url_for(url);
        trace!(%method, url = %full_url, "sending request");

        let mut builder = Request::builder().method(method.as_str()).uri(full_url.as_str());
        for (name, value) in headers.iter() {
            builder = builder.header(name, value);
        }

        let result = match body {
            Some(body) => builder
                .body(body.as_bytes().to_vec())
                .map_err(ApiError::transport)
                .and_then(|request| self.agent.run(request).map_err(ApiError::transport)),
            None => builder
                .body(())
                .map_err(ApiError::transport)
                .and_then(|request| self.agent.run(request).map_err(ApiError::transport)),
        };
        let mut response = result?;

        let status = response.status().as_u16();
        let mut response_headers = Headers::new();
        for (name, value) in response.headers() {
            response_headers.append(
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            );
        }
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(ApiError::transport)?;

        self.response = Some(HttpResponse {
            status,
            headers: response_headers,
            body,
        });
        Ok(())
    }

    fn get_response(&mut self) -> Result<HttpResponse, ApiError> {
        self.response
            .take()
            .ok_or_else(|| ApiError::transport("get_response called without a preceding request"))
    }

    fn close(&mut self) -> Result<(), ApiError> {
        self.response = None;
        Ok(())
    }
}
