use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MODEL_PATH: &str = "models/vosk-model-small-en-us-0.15";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Inbound frames buffered per connection
    pub frame_queue: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Vosk model directory
    pub path: PathBuf,
}

impl Config {
    /// Load configuration: defaults, then `path` (if given), then the
    /// `BACKEND_HOST`, `BACKEND_PORT` and `VOSK_MODEL_PATH` environment variables.
    pub fn load(path: Option<&str>) -> Result<Self> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    fn load_with_env(path: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("server.frame_queue", crate::http::DEFAULT_FRAME_QUEUE as i64)?
            .set_default("model.path", DEFAULT_MODEL_PATH)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }

        let settings = builder
            .set_override_option("server.host", env("BACKEND_HOST"))?
            .set_override_option("server.port", env("BACKEND_PORT"))?
            .set_override_option("model.path", env("VOSK_MODEL_PATH"))?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::load_with_env(None, no_env).unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.server.frame_queue, 64);
        assert_eq!(cfg.model.path, PathBuf::from(DEFAULT_MODEL_PATH));
        assert_eq!(cfg.bind_address(), "127.0.0.1:8000");
    }

    #[test]
    fn test_environment_overrides() {
        let env: HashMap<&str, &str> = [
            ("BACKEND_HOST", "0.0.0.0"),
            ("BACKEND_PORT", "9100"),
            ("VOSK_MODEL_PATH", "/opt/vosk/model"),
        ]
        .into_iter()
        .collect();

        let cfg =
            Config::load_with_env(None, |key| env.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(cfg.bind_address(), "0.0.0.0:9100");
        assert_eq!(cfg.model.path, PathBuf::from("/opt/vosk/model"));
    }

    #[test]
    fn test_file_then_environment() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            "[server]\nport = 8123\nframe_queue = 8\n\n[model]\npath = \"/srv/model\""
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cfg = Config::load_with_env(Some(&path), no_env).unwrap();
        assert_eq!(cfg.server.port, 8123);
        assert_eq!(cfg.server.frame_queue, 8);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.model.path, PathBuf::from("/srv/model"));

        let cfg = Config::load_with_env(Some(&path), |key| {
            (key == "BACKEND_PORT").then(|| "9000".to_string())
        })
        .unwrap();
        assert_eq!(cfg.server.port, 9000);
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let result = Config::load_with_env(None, |key| {
            (key == "BACKEND_PORT").then(|| "not-a-port".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(Config::load_with_env(Some("/nonexistent/solfege-asr"), no_env).is_err());
    }
}
