//! Per-test record/replay sessions.
//!
//! A `ReplaySession` owns one transcript, `<data_dir>/<test name>.txt`, and
//! the `Connectors` that write or read it. Every client built from the
//! session shares that transcript, so a test may use several clients and
//! connections and still produce a single ordered transcript.
//!
//! Teardown runs in `finish`: record mode flushes the file, replay mode
//! checks that every recorded exchange was consumed. A session dropped
//! without `finish` runs the same check and panics on failure, unless the
//! thread is already unwinding.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{info, warn};
use users_client::{ApiError, Auth, Connectors, Protocol, UsersClient};

use crate::config::{AuthMode, Credentials, HarnessConfig, Mode};
use crate::error::ReplayError;
use crate::recording::RecordingConnector;
use crate::replaying::ReplayingConnector;
use crate::transcript::{TranscriptReader, TranscriptWriter};

/// Identifies the test a transcript belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestContext {
    name: String,
}

impl TestContext {
    /// `name` becomes the transcript's file stem, so it must be a single
    /// path component: ASCII letters, digits, `.`, `_` and `-`.
    pub fn new(name: impl Into<String>) -> Result<Self, ReplayError> {
        let name = name.into();
        let valid_chars = name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if name.is_empty() || !valid_chars || name.starts_with('.') {
            return Err(ReplayError::InvalidTestName(name));
        }
        Ok(Self { name })
    }

    /// `<group>.<test>`, e.g. `Users.testCreate`.
    pub fn qualified(group: &str, test: &str) -> Result<Self, ReplayError> {
        Self::new(format!("{group}.{test}"))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transcript_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(format!("{}.txt", self.name))
    }
}

enum Transcript {
    Recording(Rc<RefCell<TranscriptWriter>>),
    Replaying(Rc<RefCell<TranscriptReader>>),
}

pub struct ReplaySession {
    context: TestContext,
    mode: Mode,
    path: PathBuf,
    transcript: Transcript,
    connectors: Connectors,
    credentials: Credentials,
    auth_mode: AuthMode,
    finished: bool,
}

impl ReplaySession {
    pub fn start(config: &HarnessConfig, context: TestContext) -> Result<Self, ReplayError> {
        let path = context.transcript_path(&config.data_dir);

        let (transcript, connectors, credentials) = match config.mode {
            Mode::Record => {
                let credentials = config
                    .credentials
                    .clone()
                    .ok_or(ReplayError::MissingCredentials)?;
                let writer = Rc::new(RefCell::new(TranscriptWriter::new(&path)));
                let real = config
                    .record_connectors
                    .clone()
                    .unwrap_or_else(Connectors::network);
                let recording = |protocol| {
                    Rc::new(RecordingConnector::new(
                        Rc::clone(real.factory(protocol)),
                        Rc::clone(&writer),
                    ))
                };
                let connectors = Connectors::new(
                    recording(Protocol::Http),
                    recording(Protocol::Https),
                );
                (Transcript::Recording(writer), connectors, credentials)
            }
            Mode::Replay => {
                let reader = Rc::new(RefCell::new(TranscriptReader::new(&path)));
                let connector = Rc::new(ReplayingConnector::new(Rc::clone(&reader)));
                let connectors = Connectors::new(connector.clone(), connector);
                (
                    Transcript::Replaying(reader),
                    connectors,
                    Credentials::placeholders(),
                )
            }
        };

        info!(
            test = %context.name(),
            mode = ?config.mode,
            transcript = %path.display(),
            "replay session started"
        );
        Ok(Self {
            context,
            mode: config.mode,
            path,
            transcript,
            connectors,
            credentials,
            auth_mode: config.auth_mode,
            finished: false,
        })
    }

    pub fn context(&self) -> &TestContext {
        &self.context
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn transcript_path(&self) -> &Path {
        &self.path
    }

    /// Factories to hand to any client this test builds.
    pub fn connectors(&self) -> Connectors {
        self.connectors.clone()
    }

    /// Real credentials when recording, placeholders when replaying.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn auth(&self) -> Auth {
        self.credentials.auth(self.auth_mode)
    }

    /// A client wired to this session's transport and credentials.
    pub fn client(&self, base_url: &str) -> Result<UsersClient, ApiError> {
        UsersClient::new(base_url, self.auth(), self.connectors())
    }

    pub fn finish(mut self) -> Result<(), ReplayError> {
        self.finished = true;
        self.teardown()
    }

    /// Drop the session without teardown checks, for tests that expect the
    /// replay itself to fail part way through.
    pub fn abandon(mut self) {
        self.finished = true;
        info!(test = %self.context.name(), "replay session abandoned");
    }

    fn teardown(&mut self) -> Result<(), ReplayError> {
        match &self.transcript {
            Transcript::Recording(writer) => writer.borrow_mut().flush()?,
            Transcript::Replaying(reader) => reader.borrow_mut().expect_exhausted()?,
        }
        info!(test = %self.context.name(), "replay session finished");
        Ok(())
    }
}

impl Drop for ReplaySession {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        if let Err(err) = self.teardown() {
            if std::thread::panicking() {
                warn!(test = %self.context.name(), error = %err, "teardown failed while unwinding");
            } else {
                panic!("replay session {} failed at teardown: {err}", self.context.name());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_stay_inside_the_data_dir() {
        assert!(TestContext::new("Users.testCreate").is_ok());
        assert!(TestContext::qualified("Users", "test_list-2").is_ok());
        for bad in ["", "../escape", "a/b", "a\\b", ".hidden", "sp ace"] {
            let err = TestContext::new(bad).unwrap_err();
            assert!(matches!(err, ReplayError::InvalidTestName(_)), "{bad}");
        }
    }

    #[test]
    fn transcript_path_is_name_dot_txt() {
        let context = TestContext::qualified("Users", "testGet").unwrap();
        assert_eq!(
            context.transcript_path(Path::new("/data")),
            PathBuf::from("/data/Users.testGet.txt")
        );
    }

    #[test]
    fn record_mode_requires_credentials() {
        let mut config = HarnessConfig::record("/unused", Credentials::placeholders());
        config.credentials = None;
        let err = ReplaySession::start(&config, TestContext::new("t").unwrap())
            .err()
            .unwrap();
        assert!(matches!(err, ReplayError::MissingCredentials));
    }

    #[test]
    fn replay_uses_placeholder_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let config = HarnessConfig::replay(dir.path()).with_auth_mode(AuthMode::Jwt);
        let session = ReplaySession::start(&config, TestContext::new("t").unwrap()).unwrap();

        assert_eq!(session.mode(), Mode::Replay);
        assert_eq!(session.auth(), Auth::Jwt("jwt".to_string()));
        session.finish().unwrap();
    }

    #[test]
    fn unused_sessions_touch_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let record = HarnessConfig::record(dir.path(), Credentials::placeholders());
        let session = ReplaySession::start(&record, TestContext::new("quiet").unwrap()).unwrap();
        let path = session.transcript_path().to_path_buf();
        session.finish().unwrap();
        assert!(!path.exists());

        let replay = HarnessConfig::replay(dir.path());
        let session = ReplaySession::start(&replay, TestContext::new("quiet").unwrap()).unwrap();
        session.finish().unwrap();
    }
}
