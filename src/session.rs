//! Engine session lifecycle and request dispatch.
//!
//! A session owns exactly one engine handle and walks it through one
//! `Uninitialized → Ready → Released` cycle. The engine is treated as a
//! non-reentrant resource: every operation takes an internal lock, so
//! concurrent callers are serialized and the engine never sees overlapping
//! calls.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::engine::{GenerationEngine, StatusCode, STATUS_OK};
use crate::error::{SessionError, SessionResult};
use crate::report::{Outcome, StatusReporter};
use crate::request::GenerationRequest;

/// Lifecycle state of an engine session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No engine handle has been acquired yet.
    Uninitialized,

    /// The engine is initialized and can generate.
    Ready,

    /// The engine handle has been released. Terminal; the session cannot be
    /// reused.
    Released,
}

#[derive(Debug)]
struct SessionInner<E> {
    state: SessionState,
    engine: E,
    reporter: StatusReporter,
}

/// One initialize → generate* → release cycle against a generation engine.
///
/// The session exclusively owns the engine it is constructed with. All
/// methods take `&self`; serialization happens through an internal mutex, so
/// a session can be shared across worker threads directly or behind an
/// `Arc`. `generate` blocks for the full duration of rule evaluation and
/// encoding, so call it from a worker thread, not an event loop.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use mesh_procgen::{
///     EngineSession, GenerationEngine, GenerationRequest, InitialShape, StatusCode, STATUS_OK,
/// };
///
/// struct NullEngine;
///
/// impl GenerationEngine for NullEngine {
///     fn init(&mut self, _root: &Path, _feature: &str) -> StatusCode {
///         STATUS_OK
///     }
///     fn generate(&mut self, _request: &GenerationRequest) -> StatusCode {
///         STATUS_OK
///     }
///     fn status_message(&self, _status: StatusCode) -> Option<String> {
///         Some("OK".to_string())
///     }
///     fn release(&mut self) {}
/// }
///
/// let session = EngineSession::new(NullEngine);
/// session.initialize(Path::new("/opt/engine"), "CityEngAdvFx").unwrap();
///
/// let quad = InitialShape {
///     rule_file: "bin/candler.01.cgb".to_string(),
///     start_rule: "Default$Lot".to_string(),
///     random_seed: 666,
///     vertices: vec![0.0, 0.0, 0.0, 0.0, 0.0, 50.0, 50.0, 0.0, 50.0, 50.0, 0.0, 0.0],
///     face_indices: vec![0, 1, 2, 3],
///     face_counts: vec![4],
/// };
/// let request = GenerationRequest::builder()
///     .add_shape("theBigShape", quad)
///     .build("file:/rules/candler.01.rpk", "com.esri.prt.codecs.OBJEncoder", "/tmp/out")
///     .unwrap();
///
/// let outcome = session.generate(&request).unwrap();
/// assert!(outcome.is_success());
/// session.release().unwrap();
/// ```
#[derive(Debug)]
pub struct EngineSession<E: GenerationEngine> {
    inner: Mutex<SessionInner<E>>,
}

impl<E: GenerationEngine> EngineSession<E> {
    /// Wrap an engine binding in a fresh, `Uninitialized` session.
    #[must_use]
    pub fn new(engine: E) -> Self {
        Self {
            inner: Mutex::new(SessionInner {
                state: SessionState::Uninitialized,
                engine,
                reporter: StatusReporter::default(),
            }),
        }
    }

    // A poisoned lock means another caller panicked mid-operation; the state
    // machine itself is still coherent, so keep failing fast on it rather
    // than propagating a second panic.
    fn lock(&self) -> MutexGuard<'_, SessionInner<E>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    /// Acquire the engine: load it from `root_path` and take the
    /// `license_feature` license. Transitions `Uninitialized → Ready`.
    ///
    /// A failed initialization leaves the session `Uninitialized`, so the
    /// caller may retry explicitly with a corrected path or feature. A
    /// released session reports `SessionClosed`, not `AlreadyInitialized`:
    /// nothing is initialized anymore, the session is simply gone.
    ///
    /// # Errors
    ///
    /// - [`SessionError::AlreadyInitialized`] when the session is `Ready`.
    /// - [`SessionError::SessionClosed`] when the session was released.
    /// - [`SessionError::EngineUnavailable`] carrying the engine's own
    ///   status code when the root path is unusable or the license cannot be
    ///   acquired.
    pub fn initialize(&self, root_path: &Path, license_feature: &str) -> SessionResult<()> {
        let mut inner = self.lock();
        match inner.state {
            SessionState::Ready => return Err(SessionError::AlreadyInitialized),
            SessionState::Released => return Err(SessionError::SessionClosed),
            SessionState::Uninitialized => {}
        }

        let status = inner.engine.init(root_path, license_feature);
        if status != STATUS_OK {
            warn!(status, "engine initialization failed");
            return Err(SessionError::EngineUnavailable { status });
        }

        inner.state = SessionState::Ready;
        info!(
            root = %root_path.display(),
            feature = license_feature,
            "engine session ready"
        );
        Ok(())
    }

    /// Forward a validated request to the engine and wait for the batch to
    /// be generated and encoded.
    ///
    /// Only legal from `Ready`. The request is forwarded verbatim; the
    /// engine's status code comes back as an [`Outcome`], success or not. A
    /// non-zero outcome leaves the session `Ready` for a corrected retry —
    /// whether to retry is entirely the caller's decision.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotReady`] when the session is not `Ready`. This is a
    /// local precondition failure; the engine is never called.
    pub fn generate(&self, request: &GenerationRequest) -> SessionResult<Outcome> {
        let mut inner = self.lock();
        match inner.state {
            SessionState::Uninitialized | SessionState::Released => {
                return Err(SessionError::NotReady)
            }
            SessionState::Ready => {}
        }

        log_dispatch(request);
        let status = inner.engine.generate(request);
        if status == STATUS_OK {
            debug!("generation finished");
        } else {
            warn!(status, "generation returned non-zero status");
        }
        Ok(Outcome::new(status))
    }

    /// Release the engine handle. Transitions `Ready → Released`; terminal.
    ///
    /// The engine is released exactly once. Calling `release` again reports
    /// [`SessionError::AlreadyReleased`] without touching the engine, so a
    /// double release cannot corrupt engine state.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotReady`] when nothing was ever initialized.
    /// - [`SessionError::AlreadyReleased`] on the second and later calls.
    pub fn release(&self) -> SessionResult<()> {
        let mut inner = self.lock();
        match inner.state {
            SessionState::Uninitialized => return Err(SessionError::NotReady),
            SessionState::Released => return Err(SessionError::AlreadyReleased),
            SessionState::Ready => {}
        }

        inner.engine.release();
        inner.state = SessionState::Released;
        info!("engine session released");
        Ok(())
    }

    /// Human-readable description of a status code. Never fails.
    ///
    /// Looked up lazily in the engine and memoized per code; if the lookup
    /// itself fails, a generic fallback is returned instead of a second
    /// error. Once the session is released, answers come from the memo (or
    /// the fallback) without any engine call.
    #[must_use]
    pub fn describe(&self, status: StatusCode) -> String {
        let mut inner = self.lock();
        if inner.state == SessionState::Released {
            return inner.reporter.describe_cached(status);
        }
        let SessionInner {
            engine, reporter, ..
        } = &mut *inner;
        reporter.describe(engine, status)
    }

    /// Consume the session and hand the engine binding back.
    ///
    /// Intended for tear-down and for tests inspecting a stub engine after
    /// the lifecycle has run. The state machine is discarded with the
    /// session; nothing is released implicitly.
    #[must_use]
    pub fn into_engine(self) -> E {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .engine
    }
}

fn log_dispatch(request: &GenerationRequest) {
    debug!(
        rule_package = request.rule_package_uri(),
        encoder = request.encoder_id(),
        destination = %request.output_destination().display(),
        shape_count = request.shapes().len(),
        "dispatching generation request"
    );
    for named in request.shapes() {
        debug!(
            name = named.name.as_str(),
            rule_file = named.shape.rule_file.as_str(),
            start_rule = named.shape.start_rule.as_str(),
            seed = named.shape.random_seed,
            vertices = named.shape.vertex_count(),
            faces = named.shape.face_counts.len(),
            "initial shape"
        );
    }
}
