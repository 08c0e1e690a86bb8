//! Synchronous client for the users REST API.
//!
//! # Overview
//! `UsersClient` builds `HttpRequest` values, moves them over a `Connection`
//! and parses the `HttpResponse` that comes back.
//!
//! # Design
//! - Each operation is split into `build_*` (produces a request) and
//!   `parse_*` (consumes a response), with `execute` as the only I/O step.
//! - Connections come from the `Connectors` passed in at construction. The
//!   default is the real network (`NetworkConnector`, backed by ureq); test
//!   harnesses pass their own factories to record or replay traffic.
//! - DTOs are defined independently from the mock-server crate; record and
//!   replay tests catch schema drift.

pub mod auth;
pub mod client;
pub mod connection;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use auth::Auth;
pub use client::UsersClient;
pub use connection::{Connection, ConnectionFactory, Connectors, Endpoint, Protocol};
pub use error::ApiError;
pub use http::{Headers, HttpMethod, HttpRequest, HttpResponse, RequestBody};
pub use transport::{NetworkConnection, NetworkConnector};
pub use types::{Avatar, CreateUser, UpdateUser, User};
