//! Credential loading for the Perigon API.
//!
//! The key is resolved exactly once at startup and injected into the
//! client; nothing in the request path reads the environment. Resolution
//! order:
//!
//! 1. `--api-key` flag or `PERIGON_API_KEY` environment variable
//!    (clap folds the two together)
//! 2. `secrets.yaml` in the tool's config directory
//!
//! The secrets file is a plain YAML mapping:
//!
//! ```yaml
//! perigon_api_key: "5647315f-9344-4700-8a9a-43cfcf8685db"
//! ```

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::error::QueryError;

/// Name of the secrets fallback file inside [`config_dir`].
const SECRETS_FILE: &str = "secrets.yaml";

/// An opaque bearer credential, immutable for the process lifetime.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    /// Wrap an already-resolved key.
    pub fn from_key(api_key: impl Into<String>) -> Self {
        Credentials {
            api_key: api_key.into(),
        }
    }

    /// Resolve the credential from the CLI/environment value, falling
    /// back to the secrets file.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::MissingCredential`] when no non-empty key is
    /// found anywhere.
    pub fn resolve(cli_key: Option<String>) -> Result<Self, QueryError> {
        if let Some(key) = cli_key.filter(|k| !k.trim().is_empty()) {
            debug!("Using API key from CLI argument or environment");
            return Ok(Credentials::from_key(key));
        }

        if let Some(path) = secrets_path() {
            match std::fs::read_to_string(&path) {
                Ok(text) => {
                    if let Some(key) = parse_secrets(&text) {
                        debug!(path = %path.display(), "Using API key from secrets file");
                        return Ok(Credentials::from_key(key));
                    }
                    warn!(path = %path.display(), "Secrets file has no perigon_api_key entry");
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to read secrets file");
                }
            }
        }

        Err(QueryError::MissingCredential)
    }

    /// The bearer token to send in `Authorization` headers.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Shape of the secrets fallback file.
#[derive(Debug, Deserialize)]
struct SecretsFile {
    perigon_api_key: Option<String>,
}

/// Parse the secrets file text, returning the key when present and
/// non-empty.
fn parse_secrets(text: &str) -> Option<String> {
    let secrets: SecretsFile = serde_yaml::from_str(text).ok()?;
    secrets
        .perigon_api_key
        .filter(|key| !key.trim().is_empty())
}

/// Directory holding this tool's configuration files.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("perigon_search"))
}

fn secrets_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(SECRETS_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_key_wins() {
        let credentials = Credentials::resolve(Some("abc-123".to_string())).unwrap();
        assert_eq!(credentials.api_key(), "abc-123");
    }

    #[test]
    fn test_blank_explicit_key_is_ignored() {
        // A blank flag value must not mask the fallback chain; with no
        // secrets file in the test environment this resolves to the
        // missing-credential error rather than an empty key.
        match Credentials::resolve(Some("   ".to_string())) {
            Ok(c) => assert!(!c.api_key().trim().is_empty()),
            Err(e) => assert!(matches!(e, QueryError::MissingCredential)),
        }
    }

    #[test]
    fn test_parse_secrets_valid() {
        let text = "perigon_api_key: \"abc-123\"\n";
        assert_eq!(parse_secrets(text), Some("abc-123".to_string()));
    }

    #[test]
    fn test_parse_secrets_missing_or_blank_key() {
        assert_eq!(parse_secrets("other_key: value\n"), None);
        assert_eq!(parse_secrets("perigon_api_key: \"\"\n"), None);
        assert_eq!(parse_secrets("not: [valid\n"), None);
    }

    #[test]
    fn test_debug_redacts_key() {
        let credentials = Credentials::from_key("super-secret");
        let rendered = format!("{:?}", credentials);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
