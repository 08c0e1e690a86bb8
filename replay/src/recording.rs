//! Connections that forward to a real transport and write every exchange to
//! a transcript.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;
use users_client::{
    ApiError, Connection, ConnectionFactory, Endpoint, Headers, HttpMethod, HttpResponse,
    RequestBody,
};

use crate::error::ReplayError;
use crate::normalize::{flatten_body, flatten_line, redact_authorization};
use crate::transcript::{RecordedRequest, RecordedResponse, TranscriptWriter};

/// Wraps the factory that opens real connections; every connection it hands
/// out appends to the shared transcript.
pub struct RecordingConnector {
    inner: Rc<dyn ConnectionFactory>,
    transcript: Rc<RefCell<TranscriptWriter>>,
}

impl RecordingConnector {
    pub fn new(inner: Rc<dyn ConnectionFactory>, transcript: Rc<RefCell<TranscriptWriter>>) -> Self {
        Self { inner, transcript }
    }
}

impl ConnectionFactory for RecordingConnector {
    fn connect(&self, endpoint: &Endpoint) -> Result<Box<dyn Connection>, ApiError> {
        let inner = self.inner.connect(endpoint)?;
        Ok(Box::new(RecordingConnection {
            endpoint: endpoint.clone(),
            inner,
            transcript: Rc::clone(&self.transcript),
            pending: None,
            written: false,
        }))
    }
}

/// Holds the redacted request until the response arrives, so an exchange is
/// written whole or not at all.
pub struct RecordingConnection {
    endpoint: Endpoint,
    inner: Box<dyn Connection>,
    transcript: Rc<RefCell<TranscriptWriter>>,
    pending: Option<RecordedRequest>,
    written: bool,
}

impl Connection for RecordingConnection {
    fn request(
        &mut self,
        method: HttpMethod,
        url: &str,
        body: Option<&RequestBody>,
        headers: &Headers,
    ) -> Result<(), ApiError> {
        self.inner.request(method, url, body, headers)?;

        // The caller's headers are what went over the wire; only the
        // transcript copy is redacted.
        self.pending = Some(RecordedRequest {
            protocol: self.endpoint.protocol.to_string(),
            verb: method.to_string(),
            host: self.endpoint.host.clone(),
            port: self.endpoint.port.to_string(),
            url: url.to_string(),
            headers: redact_authorization(headers),
            body: flatten_body(body),
        });
        Ok(())
    }

    fn get_response(&mut self) -> Result<HttpResponse, ApiError> {
        let response = self.inner.get_response()?;
        let request = self.pending.take().ok_or(ReplayError::ResponseBeforeRequest)?;

        let recorded = RecordedResponse {
            status: response.status,
            headers: response.headers.clone(),
            body: flatten_line(&response.text()),
        };
        debug!(
            verb = %request.verb,
            url = %request.url,
            status = recorded.status,
            "recording exchange"
        );
        let mut transcript = self.transcript.borrow_mut();
        transcript.write_request(&request)?;
        transcript.write_response(&recorded)?;
        self.written = true;

        Ok(response)
    }

    /// Terminates the exchange only if one was written; a call that failed
    /// before its response leaves the transcript untouched.
    fn close(&mut self) -> Result<(), ApiError> {
        self.pending = None;
        if std::mem::take(&mut self.written) {
            self.transcript.borrow_mut().write_terminator()?;
        }
        self.inner.close()
    }
}
