//! Scripted oracle for tests.

use std::collections::VecDeque;

use super::{Oracle, OracleReply};

/// A mock oracle holding a queue of scripted replies. Each call dequeues
/// the next entry; an exhausted queue fails.
#[derive(Default)]
pub struct MockOracle {
    queue: VecDeque<OracleReply>,
}

impl MockOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful text reply.
    pub fn queue_text(&mut self, text: impl Into<String>) {
        self.queue.push_back(Ok(text.into()));
    }

    /// Queue a failure.
    pub fn queue_error(&mut self, error: impl Into<String>) {
        self.queue.push_back(Err(error.into()));
    }
}

impl Oracle for MockOracle {
    fn call_text(&mut self, _prompt: &str) -> OracleReply {
        self.queue
            .pop_front()
            .unwrap_or_else(|| Err("mock: no queued response".to_string()))
    }
}
