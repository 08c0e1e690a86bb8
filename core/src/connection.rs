//! The connection seam between `UsersClient` and the network.
//!
//! # Design
//! The client never constructs sockets itself. It asks the `Connectors` it
//! was built with for a `Connection` to an `Endpoint`, drives it through
//! `request` → `get_response` → `close`, and drops it. Swapping the
//! `Connectors` at construction is how a test harness substitutes recording
//! or replaying transports; the override lives exactly as long as the client
//! that holds it, so nothing process-wide has to be restored afterwards.

use std::fmt;
use std::rc::Rc;

use crate::error::ApiError;
use crate::http::{Headers, HttpMethod, HttpResponse, RequestBody};
use crate::transport::NetworkConnector;

/// URL scheme of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }

    pub fn parse(scheme: &str) -> Option<Self> {
        match scheme {
            "http" => Some(Protocol::Http),
            "https" => Some(Protocol::Https),
            _ => None,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a connection goes: scheme, host and port.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub protocol: Protocol,
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(protocol: Protocol, host: impl Into<String>, port: u16) -> Self {
        Self {
            protocol,
            host: host.into(),
            port,
        }
    }

    /// Fully qualified URL for a path relative to this endpoint.
    pub fn url_for(&self, path_and_query: &str) -> String {
        format!(
            "{}://{}:{}{}",
            self.protocol, self.host, self.port, path_and_query
        )
    }
}

/// One live connection, used for a single request/response pair.
pub trait Connection {
    /// Send `method url` with the given body and headers.
    fn request(
        &mut self,
        method: HttpMethod,
        url: &str,
        body: Option<&RequestBody>,
        headers: &Headers,
    ) -> Result<(), ApiError>;

    /// Response to the preceding `request`.
    fn get_response(&mut self) -> Result<HttpResponse, ApiError>;

    fn close(&mut self) -> Result<(), ApiError>;
}

/// Builds connections for one protocol.
pub trait ConnectionFactory {
    fn connect(&self, endpoint: &Endpoint) -> Result<Box<dyn Connection>, ApiError>;
}

/// Transport configuration handed to the client at construction: one factory
/// for plain connections and one for secure connections.
#[derive(Clone)]
pub struct Connectors {
    http: Rc<dyn ConnectionFactory>,
    https: Rc<dyn ConnectionFactory>,
}

impl Connectors {
    pub fn new(http: Rc<dyn ConnectionFactory>, https: Rc<dyn ConnectionFactory>) -> Self {
        Self { http, https }
    }

    /// Real network connections for both protocols.
    pub fn network() -> Self {
        let connector: Rc<dyn ConnectionFactory> = Rc::new(NetworkConnector::new());
        Self::new(Rc::clone(&connector), connector)
    }

    pub fn factory(&self, protocol: Protocol) -> &Rc<dyn ConnectionFactory> {
        match protocol {
            Protocol::Http => &self.http,
            Protocol::Https => &self.https,
        }
    }

    pub fn connect(&self, endpoint: &Endpoint) -> Result<Box<dyn Connection>, ApiError> {
        self.factory(endpoint.protocol).connect(endpoint)
    }
}

impl Default for Connectors {
    fn default() -> Self {
        Self::network()
    }
}

impl fmt::Debug for Connectors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connectors").finish_non_exhaustive()
    }
}
