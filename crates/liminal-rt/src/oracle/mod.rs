//! The oracle abstraction: an external text-producing service.
//!
//! An oracle has one operation: given a prompt, produce text or fail with a
//! reason. Three providers compose: a scripted [`mock::MockOracle`], a
//! remote-text [`ollama::OllamaOracle`], and the tape-backed
//! [`record::RecordingOracle`] wrapper for record/replay. Which one a run
//! uses comes from [`config::OracleConfig`].

pub mod config;
pub mod mock;
pub mod ollama;
pub mod record;

/// What one oracle call produced: text on success, a reason on failure.
pub type OracleReply = Result<String, String>;

/// An external text-producing service.
///
/// Calls are synchronous and may mutate provider state (a mock consumes its
/// queue, a recorder appends to its tape).
pub trait Oracle {
    fn call_text(&mut self, prompt: &str) -> OracleReply;
}
