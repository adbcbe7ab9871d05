use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::probes::Probe;
use super::status::CheckRecord;

pub const API_KEY_PREFIX: &str = "OPENAI_API_KEY=";

/// Value of the first `OPENAI_API_KEY=` line, empty when the line has no
/// value. Later duplicates are ignored.
pub fn find_api_key(content: &str) -> Option<&str> {
    content
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with(API_KEY_PREFIX))
        .and_then(|line| line.split_once('=').map(|(_, value)| value))
}

/// Checks that the project `.env` file exists and carries an API key.
pub struct SecretsFileProbe {
    path: PathBuf,
}

impl SecretsFileProbe {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Probe for SecretsFileProbe {
    fn name(&self) -> &str {
        "secrets_file"
    }

    async fn check(&self) -> CheckRecord {
        if !self.path.exists() {
            return CheckRecord::warn(
                self.name(),
                "no .env file found, copy .env.example and fill in the keys",
            );
        }

        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) => {
                return CheckRecord::warn(self.name(), format!("failed to read .env file: {}", e));
            }
        };

        match find_api_key(&content) {
            Some(value) if !value.is_empty() => {
                CheckRecord::ok(self.name(), "OPENAI_API_KEY is set")
            }
            _ => CheckRecord::warn(
                self.name(),
                "OPENAI_API_KEY is missing or empty, update .env",
            ),
        }
    }
}
