//! Structured outcomes and status-message reporting.
//!
//! Raw engine status codes are wrapped in [`Outcome`] values the caller can
//! branch on. Message lookup is a separate, lazy step because describing a
//! code may itself be a call into the engine.

use std::fmt;

use hashbrown::HashMap;

use crate::engine::{GenerationEngine, StatusCode, STATUS_OK};

/// Outcome of a generation call.
///
/// Carries the engine's raw status code, unmodified. The human-readable
/// description lives on the session
/// ([`EngineSession::describe`](crate::EngineSession::describe)) since
/// fetching it may require the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    status_code: StatusCode,
}

impl Outcome {
    pub(crate) fn new(status_code: StatusCode) -> Self {
        Self { status_code }
    }

    /// The engine's raw status code.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.status_code
    }

    /// Whether the engine reported success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "engine status {}", self.status_code)
    }
}

/// Memoizing status-message lookup that never fails.
///
/// Owned by the session behind its lock. Each status code is looked up in
/// the engine at most once; a failed lookup yields a generic fallback
/// instead of stacking a second failure on top of the first.
#[derive(Debug, Default)]
pub(crate) struct StatusReporter {
    messages: HashMap<StatusCode, String>,
}

impl StatusReporter {
    /// Describe `status`, consulting `engine` only on a memo miss.
    pub(crate) fn describe<E: GenerationEngine>(
        &mut self,
        engine: &E,
        status: StatusCode,
    ) -> String {
        if let Some(message) = self.messages.get(&status) {
            return message.clone();
        }
        match engine.status_message(status) {
            Some(message) => {
                self.messages.insert(status, message.clone());
                message
            }
            // Not memoized: the lookup failure may be transient.
            None => fallback_message(status),
        }
    }

    /// Answer from the memo alone; used once the engine is released.
    pub(crate) fn describe_cached(&self, status: StatusCode) -> String {
        self.messages
            .get(&status)
            .cloned()
            .unwrap_or_else(|| fallback_message(status))
    }
}

fn fallback_message(status: StatusCode) -> String {
    format!("unknown engine status {status}")
}
