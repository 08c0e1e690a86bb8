//! Route-keyed interception of outgoing requests.
//!
//! An `InterceptLayer` stands where the network would be. Callbacks are
//! registered per (verb, fully qualified URL); dispatching a request runs the
//! matching callback and returns its synthetic response. There is no
//! fallthrough to a real socket: an unregistered route is `NetworkDenied`.

use std::fmt;

use users_client::{Headers, RequestBody};

use crate::error::ReplayError;

/// The call the transport is about to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterceptedRequest {
    pub verb: String,
    /// Fully qualified URL, used for routing.
    pub full_url: String,
    /// Path and query as the client passed them to the connection.
    pub url: String,
    pub body: Option<RequestBody>,
    pub headers: Headers,
}

/// Status, headers and body handed back in place of a network response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: Vec<u8>,
}

pub type InterceptCallback =
    Box<dyn FnMut(&InterceptedRequest) -> Result<SyntheticResponse, ReplayError>>;

struct Route {
    verb: String,
    url: String,
    callback: InterceptCallback,
}

#[derive(Default)]
pub struct InterceptLayer {
    routes: Vec<Route>,
}

impl InterceptLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `verb url`, replacing an earlier registration
    /// of the same route.
    pub fn register(&mut self, verb: &str, url: &str, callback: InterceptCallback) {
        self.routes
            .retain(|route| !(route.verb == verb && route.url == url));
        self.routes.push(Route {
            verb: verb.to_string(),
            url: url.to_string(),
            callback,
        });
    }

    pub fn is_registered(&self, verb: &str, url: &str) -> bool {
        self.routes
            .iter()
            .any(|route| route.verb == verb && route.url == url)
    }

    pub fn dispatch(&mut self, request: &InterceptedRequest) -> Result<SyntheticResponse, ReplayError> {
        let route = self
            .routes
            .iter_mut()
            .find(|route| route.verb == request.verb && route.url == request.full_url)
            .ok_or_else(|| ReplayError::NetworkDenied {
                method: request.verb.clone(),
                url: request.full_url.clone(),
            })?;
        (route.callback)(request)
    }

    pub fn reset(&mut self) {
        self.routes.clear();
    }
}

impl fmt::Debug for InterceptLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let routes: Vec<String> = self
            .routes
            .iter()
            .map(|route| format!("{} {}", route.verb, route.url))
            .collect();
        f.debug_struct("InterceptLayer").field("routes", &routes).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intercepted(verb: &str, full_url: &str) -> InterceptedRequest {
        InterceptedRequest {
            verb: verb.to_string(),
            full_url: full_url.to_string(),
            url: String::new(),
            body: None,
            headers: Headers::new(),
        }
    }

    fn respond_with(status: u16) -> InterceptCallback {
        Box::new(move |_: &InterceptedRequest| {
            Ok(SyntheticResponse {
                status,
                headers: Headers::new(),
                body: Vec::new(),
            })
        })
    }

    #[test]
    fn dispatch_runs_the_registered_callback() {
        let mut layer = InterceptLayer::new();
        layer.register("GET", "https://h:443/a", respond_with(200));
        layer.register("POST", "https://h:443/a", respond_with(201));

        let response = layer.dispatch(&intercepted("POST", "https://h:443/a")).unwrap();
        assert_eq!(response.status, 201);
    }

    #[test]
    fn unregistered_route_is_denied() {
        let mut layer = InterceptLayer::new();
        layer.register("GET", "https://h:443/a", respond_with(200));

        let err = layer.dispatch(&intercepted("GET", "https://h:443/b")).unwrap_err();
        assert!(matches!(err, ReplayError::NetworkDenied { .. }));
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let mut layer = InterceptLayer::new();
        layer.register("GET", "https://h:443/a", respond_with(200));
        layer.register("GET", "https://h:443/a", respond_with(304));

        let response = layer.dispatch(&intercepted("GET", "https://h:443/a")).unwrap();
        assert_eq!(response.status, 304);

        layer.reset();
        assert!(!layer.is_registered("GET", "https://h:443/a"));
    }
}
