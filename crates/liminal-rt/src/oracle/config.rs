//! Oracle selection from the environment and `liminal.ini`.
//!
//! Defaults come first, then `LIMINAL_*` environment variables, then a
//! `liminal.ini` in the working directory (`key=value` lines; `#` and `;`
//! start comments). The resolved configuration names a base provider and an
//! optional record/replay wrapping.

use std::path::Path;

use super::mock::MockOracle;
use super::ollama::OllamaOracle;
use super::record::{RecordMode, RecordingOracle};
use super::Oracle;

const DEFAULT_ENDPOINT: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "gemma3:12b";
const DEFAULT_RECORDING: &str = "oracle_recordings.jsonl";

/// Resolved oracle configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleConfig {
    /// `mock` (default) or `ollama`.
    pub provider: String,
    pub endpoint: String,
    pub model: String,
    /// `live` (default), `record`, or `replay`.
    pub mode: String,
    pub recording: String,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            mode: "live".to_string(),
            recording: DEFAULT_RECORDING.to_string(),
        }
    }
}

impl OracleConfig {
    /// Load from environment variables, then apply `liminal.ini` overrides
    /// if the file exists in the working directory.
    pub fn load() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config.apply_ini(Path::new("liminal.ini"));
        config
    }

    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("LIMINAL_ORACLE_PROVIDER") {
            self.provider = v;
        }
        if let Ok(v) = std::env::var("LIMINAL_OLLAMA_ENDPOINT") {
            self.endpoint = v;
        }
        if let Ok(v) = std::env::var("LIMINAL_OLLAMA_MODEL") {
            self.model = v;
        }
        if let Ok(v) = std::env::var("LIMINAL_ORACLE_MODE") {
            self.mode = v;
        }
        if let Ok(v) = std::env::var("LIMINAL_ORACLE_RECORDING") {
            self.recording = v;
        }
    }

    /// Apply `key=value` overrides from an ini file. Missing files are
    /// silently ignored; unknown keys too.
    pub fn apply_ini(&mut self, path: &Path) {
        let Ok(contents) = std::fs::read_to_string(path) else {
            return;
        };
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            match key {
                "provider" => self.provider = value.to_string(),
                "endpoint" => self.endpoint = value.to_string(),
                "model" => self.model = value.to_string(),
                "mode" => self.mode = value.to_string(),
                "recording" => self.recording = value.to_string(),
                _ => {}
            }
        }
    }

    /// Build the configured oracle: the base provider, wrapped for
    /// record/replay unless the mode is live.
    pub fn build(&self) -> Box<dyn Oracle> {
        let base: Box<dyn Oracle> = if self.provider.eq_ignore_ascii_case("ollama") {
            Box::new(OllamaOracle::new(&self.endpoint, &self.model))
        } else {
            Box::new(MockOracle::new())
        };
        let mode = RecordMode::from_name(&self.mode);
        if mode == RecordMode::Live {
            return base;
        }
        Box::new(RecordingOracle::new(Some(base), mode, &self.recording))
    }
}

/// The oracle for a program run, selected from environment and ini file.
pub fn oracle_from_env() -> Box<dyn Oracle> {
    OracleConfig::load().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = OracleConfig::default();
        assert_eq!(config.provider, "mock");
        assert_eq!(config.endpoint, "http://localhost:11434");
        assert_eq!(config.model, "gemma3:12b");
        assert_eq!(config.mode, "live");
        assert_eq!(config.recording, "oracle_recordings.jsonl");
    }

    #[test]
    fn ini_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let ini = dir.path().join("liminal.ini");
        std::fs::write(
            &ini,
            "# comment\nprovider = ollama\nmodel=llama3\n; another comment\nmode = replay\nunknown = ignored\n",
        )
        .unwrap();

        let mut config = OracleConfig::default();
        config.apply_ini(&ini);
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.model, "llama3");
        assert_eq!(config.mode, "replay");
        // Untouched keys keep their defaults.
        assert_eq!(config.endpoint, "http://localhost:11434");
    }

    #[test]
    fn missing_ini_is_ignored() {
        let mut config = OracleConfig::default();
        config.apply_ini(Path::new("/nonexistent/liminal.ini"));
        assert_eq!(config, OracleConfig::default());
    }
}
