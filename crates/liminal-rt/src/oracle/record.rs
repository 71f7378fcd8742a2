//! Tape-backed record/replay wrapper.
//!
//! Wraps an inner oracle in one of three modes. In `live` it forwards calls
//! unchanged. In `record` it forwards, then appends one JSONL line per call
//! to the tape. In `replay` it reads the tape and answers from the first
//! line whose fingerprint matches the canonicalized prompt; a miss fails.
//!
//! Tape lines are JSON objects:
//! `{"hash":"<64-hex>","prompt":"<canonical>","response":"<text>","ok":true}`
//! written in call order, so a replay run served by a tape observes the
//! same sequence the recording run produced.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::canon::{canonicalize_prompt, fingerprint};

use super::{Oracle, OracleReply};

/// Recording mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordMode {
    Live,
    Record,
    Replay,
}

impl RecordMode {
    /// Parse a mode name, case-insensitively. Unknown names mean live.
    pub fn from_name(name: &str) -> RecordMode {
        if name.eq_ignore_ascii_case("record") {
            RecordMode::Record
        } else if name.eq_ignore_ascii_case("replay") {
            RecordMode::Replay
        } else {
            RecordMode::Live
        }
    }
}

/// One tape line.
#[derive(Debug, Serialize, Deserialize)]
struct TapeEntry {
    hash: String,
    prompt: String,
    response: String,
    ok: bool,
}

/// The record/replay wrapper.
///
/// Replay does not need an inner oracle; passing `None` is allowed and any
/// forwarded call then fails.
pub struct RecordingOracle {
    inner: Option<Box<dyn Oracle>>,
    mode: RecordMode,
    path: PathBuf,
}

impl RecordingOracle {
    pub fn new(inner: Option<Box<dyn Oracle>>, mode: RecordMode, path: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            mode,
            path: path.into(),
        }
    }

    fn forward(&mut self, prompt: &str) -> OracleReply {
        match &mut self.inner {
            Some(oracle) => oracle.call_text(prompt),
            None => Err("oracle not available".to_string()),
        }
    }

    fn replay(&self, hash: &str) -> OracleReply {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(_) => return Err("replay file not found".to_string()),
        };
        for line in BufReader::new(file).lines() {
            let Ok(line) = line else { break };
            let Ok(entry) = serde_json::from_str::<TapeEntry>(&line) else {
                continue;
            };
            if entry.hash == hash {
                return if entry.ok {
                    Ok(entry.response)
                } else {
                    Err(entry.response)
                };
            }
        }
        Err("replay: prompt not found".to_string())
    }

    fn append(&self, entry: &TapeEntry) {
        // A tape that cannot be opened loses the line, not the call.
        let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&self.path) else {
            return;
        };
        if let Ok(line) = serde_json::to_string(entry) {
            let _ = writeln!(file, "{line}");
        }
    }
}

impl Oracle for RecordingOracle {
    fn call_text(&mut self, prompt: &str) -> OracleReply {
        match self.mode {
            RecordMode::Live => self.forward(prompt),
            RecordMode::Replay => {
                let canonical = canonicalize_prompt(prompt);
                self.replay(&fingerprint(&canonical))
            }
            RecordMode::Record => {
                let canonical = canonicalize_prompt(prompt);
                let hash = fingerprint(&canonical);
                let reply = self.forward(prompt);
                let (ok, response) = match &reply {
                    Ok(text) => (true, text.clone()),
                    Err(reason) => (false, reason.clone()),
                };
                self.append(&TapeEntry {
                    hash,
                    prompt: canonical,
                    response,
                    ok,
                });
                reply
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::mock::MockOracle;

    #[test]
    fn mode_names_are_case_insensitive() {
        assert_eq!(RecordMode::from_name("record"), RecordMode::Record);
        assert_eq!(RecordMode::from_name("REPLAY"), RecordMode::Replay);
        assert_eq!(RecordMode::from_name("live"), RecordMode::Live);
        assert_eq!(RecordMode::from_name("banana"), RecordMode::Live);
    }

    #[test]
    fn record_then_replay_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let tape = dir.path().join("tape.jsonl");

        let mut mock = MockOracle::new();
        mock.queue_text("world");
        let mut recorder =
            RecordingOracle::new(Some(Box::new(mock)), RecordMode::Record, &tape);
        assert_eq!(recorder.call_text("Hello\nWorld"), Ok("world".to_string()));

        // A replay with only whitespace differences hits the same line.
        let mut replayer = RecordingOracle::new(None, RecordMode::Replay, &tape);
        assert_eq!(
            replayer.call_text("Hello  World\r\n"),
            Ok("world".to_string())
        );
    }

    #[test]
    fn replay_honors_recorded_failures() {
        let dir = tempfile::tempdir().unwrap();
        let tape = dir.path().join("tape.jsonl");

        let mut mock = MockOracle::new();
        mock.queue_error("boom");
        let mut recorder =
            RecordingOracle::new(Some(Box::new(mock)), RecordMode::Record, &tape);
        assert_eq!(recorder.call_text("p"), Err("boom".to_string()));

        let mut replayer = RecordingOracle::new(None, RecordMode::Replay, &tape);
        assert_eq!(replayer.call_text("p"), Err("boom".to_string()));
    }

    #[test]
    fn replay_miss_and_missing_tape() {
        let dir = tempfile::tempdir().unwrap();
        let tape = dir.path().join("tape.jsonl");

        let mut replayer = RecordingOracle::new(None, RecordMode::Replay, &tape);
        assert_eq!(
            replayer.call_text("p"),
            Err("replay file not found".to_string())
        );

        std::fs::write(&tape, "").unwrap();
        assert_eq!(
            replayer.call_text("p"),
            Err("replay: prompt not found".to_string())
        );
    }

    #[test]
    fn tape_lines_are_json_with_canonical_prompts() {
        let dir = tempfile::tempdir().unwrap();
        let tape = dir.path().join("tape.jsonl");

        let mut mock = MockOracle::new();
        mock.queue_text("a");
        mock.queue_text("b");
        let mut recorder =
            RecordingOracle::new(Some(Box::new(mock)), RecordMode::Record, &tape);
        recorder.call_text("one  two").unwrap();
        recorder.call_text("three").unwrap();

        let contents = std::fs::read_to_string(&tape).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["prompt"], "one two");
        assert_eq!(first["response"], "a");
        assert_eq!(first["ok"], true);
        assert_eq!(first["hash"].as_str().unwrap().len(), 64);
    }

    #[test]
    fn live_mode_does_not_touch_the_tape() {
        let dir = tempfile::tempdir().unwrap();
        let tape = dir.path().join("tape.jsonl");

        let mut mock = MockOracle::new();
        mock.queue_text("x");
        let mut live = RecordingOracle::new(Some(Box::new(mock)), RecordMode::Live, &tape);
        assert_eq!(live.call_text("p"), Ok("x".to_string()));
        assert!(!tape.exists());
    }
}
