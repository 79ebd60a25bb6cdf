//! Session and request model for rule-driven procedural geometry generation.
//!
//! This crate is the client-facing core of a procedural-geometry service: it
//! describes initial shapes, assembles them into validated batch requests,
//! and drives an external generation engine through a strict
//! `Uninitialized → Ready → Released` session lifecycle. The engine itself
//! (rule-grammar evaluation, output encoders, licensing) stays behind the
//! narrow [`GenerationEngine`] trait.
//!
//! # Features
//!
//! - **Typed initial shapes**: base polygon plus rule attachment, validated
//!   once at the client boundary with a deterministic check order
//! - **Batch requests**: ordered, named shape batches; all validation
//!   failures reported in one round-trip
//! - **Session state machine**: one engine handle per session, exactly one
//!   initialize → generate* → release cycle, mutual exclusion built in
//! - **Structured outcomes**: raw engine status codes pass through
//!   unmodified; messages are fetched lazily, memoized, and never fail
//!
//! # Concurrency
//!
//! The engine is modeled as a single non-reentrant resource. Session methods
//! serialize through an internal lock, and [`EngineSession::generate`]
//! blocks until the whole batch is generated and encoded, so run it on a
//! worker thread. No cancellation and no automatic retries: engine failures
//! may be stateful, so retry policy belongs to the caller.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use mesh_procgen::{
//!     EngineSession, GenerationEngine, GenerationRequest, InitialShape, StatusCode, STATUS_OK,
//! };
//!
//! struct NullEngine;
//!
//! impl GenerationEngine for NullEngine {
//!     fn init(&mut self, _root: &Path, _feature: &str) -> StatusCode {
//!         STATUS_OK
//!     }
//!     fn generate(&mut self, _request: &GenerationRequest) -> StatusCode {
//!         STATUS_OK
//!     }
//!     fn status_message(&self, _status: StatusCode) -> Option<String> {
//!         Some("OK".to_string())
//!     }
//!     fn release(&mut self) {}
//! }
//!
//! let session = EngineSession::new(NullEngine);
//! session.initialize(Path::new("/opt/engine"), "CityEngAdvFx")?;
//!
//! let lot = InitialShape {
//!     rule_file: "bin/candler.01.cgb".to_string(),
//!     start_rule: "Default$Lot".to_string(),
//!     random_seed: 666,
//!     vertices: vec![0.0, 0.0, 0.0, 0.0, 0.0, 50.0, 50.0, 0.0, 50.0, 50.0, 0.0, 0.0],
//!     face_indices: vec![0, 1, 2, 3],
//!     face_counts: vec![4],
//! };
//! let request = GenerationRequest::builder()
//!     .add_shape("theBigShape", lot)
//!     .build(
//!         "file:/rules/candler.01.rpk",
//!         "com.esri.prt.codecs.OBJEncoder",
//!         "/tmp/prt4py",
//!     )?;
//!
//! let outcome = session.generate(&request)?;
//! assert!(outcome.is_success());
//! println!("{}", session.describe(outcome.status_code()));
//! session.release()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod engine;
mod error;
mod report;
mod request;
mod session;
mod shape;

// Re-export main types and functions
pub use engine::{GenerationEngine, StatusCode, STATUS_OK};
pub use error::{
    BatchError, BatchResult, BatchValidationError, SessionError, SessionResult, ShapeResult,
    ValidationError, ValidationErrorKind,
};
pub use report::Outcome;
pub use request::{GenerationRequest, GenerationRequestBuilder, NamedShape};
pub use session::{EngineSession, SessionState};
pub use shape::InitialShape;
