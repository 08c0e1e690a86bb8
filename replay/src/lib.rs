//! Deterministic record/replay of HTTP traffic for client tests.
//!
//! # Overview
//! In record mode a test talks to the live service through
//! `RecordingConnection`s, which append every exchange to a per-test
//! transcript with credentials redacted. In replay mode the same test runs
//! against `ReplayingConnection`s, which check each outgoing request against
//! the transcript and answer with the recorded response. Replay never opens a
//! socket.
//!
//! # Design
//! - The client takes its connection factories at construction
//!   (`users_client::Connectors`); `ReplaySession::connectors` supplies the
//!   recording or replaying pair. Nothing global is patched.
//! - Transcripts are line-oriented text with a version line; headers are
//!   strict JSON. See [`transcript`].
//! - Request comparison ignores query parameter order, header order and
//!   header name case, and compares JSON bodies structurally. See
//!   [`normalize`].
//! - Harness failures reach the test through `ApiError::Transport`; use
//!   [`replay_error`] to get the `ReplayError` back.

pub mod assertions;
pub mod config;
pub mod error;
pub mod intercept;
pub mod logging;
pub mod normalize;
pub mod recording;
pub mod replaying;
pub mod session;
pub mod transcript;

pub use assertions::{assert_list_key_begin, assert_list_key_equal};
pub use config::{AuthMode, Credentials, HarnessConfig, Mode};
pub use error::{replay_error, MismatchField, ReplayError};
pub use intercept::{InterceptCallback, InterceptLayer, InterceptedRequest, SyntheticResponse};
pub use logging::{init_test_tracing, init_test_tracing_with_filter};
pub use recording::{RecordingConnection, RecordingConnector};
pub use replaying::{ReplayingConnection, ReplayingConnector};
pub use session::{ReplaySession, TestContext};
pub use transcript::{
    RecordedRequest, RecordedResponse, TranscriptReader, TranscriptWriter, TRANSCRIPT_HEADER,
};
