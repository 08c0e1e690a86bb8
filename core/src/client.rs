//! HTTP request builder, executor and response parser for the users API.
//!
//! # Design
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! `execute` sits between them and moves the request over a connection taken
//! from the `Connectors` the client was constructed with, so the same client
//! code runs against the live network, a recorder, or a replayed transcript.

use tracing::debug;
use url::Url;

use crate::auth::Auth;
use crate::connection::{Connectors, Endpoint, Protocol};
use crate::error::ApiError;
use crate::http::{Headers, HttpMethod, HttpRequest, HttpResponse, RequestBody};
use crate::types::{Avatar, CreateUser, UpdateUser, User};

const USER_AGENT: &str = "users-client";

/// Synchronous client for the users API.
#[derive(Debug, Clone)]
pub struct UsersClient {
    endpoint: Endpoint,
    base_path: String,
    auth: Auth,
    connectors: Connectors,
}

impl UsersClient {
    pub fn new(base_url: &str, auth: Auth, connectors: Connectors) -> Result<Self, ApiError> {
        let url = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        let protocol = Protocol::parse(url.scheme())
            .ok_or_else(|| ApiError::InvalidUrl(format!("unsupported scheme {}", url.scheme())))?;
        let host = url
            .host_str()
            .ok_or_else(|| ApiError::InvalidUrl(format!("{base_url}: missing host")))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| ApiError::InvalidUrl(format!("{base_url}: missing port")))?;

        Ok(Self {
            endpoint: Endpoint::new(protocol, host, port),
            base_path: url.path().trim_end_matches('/').to_string(),
            auth,
            connectors,
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Send `request` over a fresh connection and return its response.
    ///
    /// The connection is closed even when reading the response fails; the
    /// response error wins over a close error.
    pub fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, url = %request.url, "executing request");
        let mut connection = self.connectors.connect(&self.endpoint)?;
        connection.request(
            request.method,
            &request.url,
            request.body.as_ref(),
            &request.headers,
        )?;
        let response = connection.get_response();
        let closed = connection.close();
        let response = response?;
        closed?;
        Ok(response)
    }

    // -- builders --

    pub fn build_list_users(&self, page: Option<u32>, per_page: Option<u32>) -> HttpRequest {
        let mut query = Vec::new();
        if let Some(page) = page {
            query.push(format!("page={page}"));
        }
        if let Some(per_page) = per_page {
            query.push(format!("per_page={per_page}"));
        }
        let mut url = self.path("/users");
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }
        self.request(HttpMethod::Get, url, None)
    }

    pub fn build_get_user(&self, id: u64) -> HttpRequest {
        self.request(HttpMethod::Get, self.path(&format!("/users/{id}")), None)
    }

    pub fn build_create_user(&self, input: &CreateUser) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(self.json_request(HttpMethod::Post, self.path("/users"), body))
    }

    pub fn build_update_user(&self, id: u64, input: &UpdateUser) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(self.json_request(HttpMethod::Patch, self.path(&format!("/users/{id}")), body))
    }

    pub fn build_delete_user(&self, id: u64) -> HttpRequest {
        self.request(HttpMethod::Delete, self.path(&format!("/users/{id}")), None)
    }

    pub fn build_upload_avatar(&self, id: u64, content_type: &str, bytes: Vec<u8>) -> HttpRequest {
        let mut request = self.request(
            HttpMethod::Post,
            self.path(&format!("/users/{id}/avatar")),
            Some(RequestBody::Binary(bytes)),
        );
        request.headers.insert("Content-Type", content_type);
        request
    }

    // -- parsers --

    pub fn parse_list_users(&self, response: HttpResponse) -> Result<Vec<User>, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_slice(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_get_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_slice(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_create_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        check_status(&response, 201)?;
        serde_json::from_slice(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_update_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_slice(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_delete_user(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)?;
        Ok(())
    }

    pub fn parse_upload_avatar(&self, response: HttpResponse) -> Result<Avatar, ApiError> {
        check_status(&response, 201)?;
        serde_json::from_slice(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    // -- round-trips --

    pub fn list_users(&self, page: Option<u32>, per_page: Option<u32>) -> Result<Vec<User>, ApiError> {
        let response = self.execute(&self.build_list_users(page, per_page))?;
        self.parse_list_users(response)
    }

    pub fn get_user(&self, id: u64) -> Result<User, ApiError> {
        let response = self.execute(&self.build_get_user(id))?;
        self.parse_get_user(response)
    }

    pub fn create_user(&self, input: &CreateUser) -> Result<User, ApiError> {
        let response = self.execute(&self.build_create_user(input)?)?;
        self.parse_create_user(response)
    }

    pub fn update_user(&self, id: u64, input: &UpdateUser) -> Result<User, ApiError> {
        let response = self.execute(&self.build_update_user(id, input)?)?;
        self.parse_update_user(response)
    }

    pub fn delete_user(&self, id: u64) -> Result<(), ApiError> {
        let response = self.execute(&self.build_delete_user(id))?;
        self.parse_delete_user(response)
    }

    pub fn upload_avatar(&self, id: u64, content_type: &str, bytes: Vec<u8>) -> Result<Avatar, ApiError> {
        let response = self.execute(&self.build_upload_avatar(id, content_type, bytes))?;
        self.parse_upload_avatar(response)
    }

    fn path(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.base_path)
    }

    fn request(&self, method: HttpMethod, url: String, body: Option<RequestBody>) -> HttpRequest {
        let mut headers = Headers::new();
        headers.insert("User-Agent", USER_AGENT);
        headers.insert("Accept", "application/json");
        if let Some(value) = self.auth.header_value() {
            headers.insert("Authorization", value);
        }
        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }

    fn json_request(&self, method: HttpMethod, url: String, body: String) -> HttpRequest {
        let mut request = self.request(method, url, Some(RequestBody::Text(body)));
        request.headers.insert("Content-Type", "application/json");
        request
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.text().into_owned(),
    })
}
