//! Event dispatcher - Central sink for event handler results

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::application::errors::{error_chain, BotError};

/// Handler result
pub type HandlerResult = Result<(), BotError>;

/// Runs every platform event handler and logs failures instead of propagating them,
/// so the framework keeps dispatching events after a handler errors.
#[derive(Debug, Default)]
pub struct EventDispatcher {
    failures: AtomicU64,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Await a handler future. Returns `true` if it succeeded.
    pub async fn dispatch<F>(&self, event: &str, handler: F) -> bool
    where
        F: Future<Output = HandlerResult>,
    {
        match handler.await {
            Ok(()) => true,
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                tracing::error!("An error occurred in {}.\n{}", event, error_chain(&e));
                false
            }
        }
    }

    /// Number of handler failures seen so far
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}
