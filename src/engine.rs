//! Boundary with the external generation engine.
//!
//! The engine evaluates rule grammars and writes encoded output; everything
//! about how it does so is opaque to this crate. The session drives it
//! through the narrow [`GenerationEngine`] trait, so real bindings (FFI, a
//! child process) and test stubs are interchangeable.

use std::path::Path;

use crate::request::GenerationRequest;

/// Raw engine status code.
///
/// `0` is success; any non-zero value is an engine-defined failure category,
/// passed through this crate unmodified and uninterpreted.
pub type StatusCode = i32;

/// The status code denoting success.
pub const STATUS_OK: StatusCode = 0;

/// The operations the session issues against the generation engine.
///
/// The session guarantees callers are serialized: no two methods run
/// concurrently on one engine, `init` is called at most once before any
/// `generate`, and nothing is called after `release`. Implementations do not
/// need to be re-entrant or thread-safe on their own.
pub trait GenerationEngine {
    /// Load the engine from `root_path` and acquire `license_feature`.
    fn init(&mut self, root_path: &Path, license_feature: &str) -> StatusCode;

    /// Evaluate every shape's rule grammar and write the encoded output for
    /// the whole batch to the request's destination.
    ///
    /// Blocks until the batch is fully generated and encoded, or until a
    /// failure is determined. There is no mid-flight abort.
    fn generate(&mut self, request: &GenerationRequest) -> StatusCode;

    /// Look up the human-readable description of `status`.
    ///
    /// Returns `None` when the lookup itself fails; the reporter substitutes
    /// a fallback message in that case.
    fn status_message(&self, status: StatusCode) -> Option<String>;

    /// Release the engine handle. Called at most once, after which the
    /// engine is never touched again.
    fn release(&mut self);
}
