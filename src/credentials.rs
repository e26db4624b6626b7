use std::path::PathBuf;

use thiserror::Error;

use crate::config::config_dir;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("TMDB_API_KEY is not set; add it to ~/.config/moviefinder/.env or your environment")]
    MissingApiKey,
}

/// Secrets read from the environment.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub tmdb_api_key: Option<String>,
    pub appwrite_api_key: Option<String>,
}

impl Credentials {
    pub fn require_tmdb_key(&self) -> Result<&str, CredentialError> {
        self.tmdb_api_key
            .as_deref()
            .ok_or(CredentialError::MissingApiKey)
    }
}

/// Return candidate .env paths in priority order.
fn env_file_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = config_dir() {
        paths.push(dir.join(".env"));
    }
    paths.push(PathBuf::from(".env"));
    paths
}

/// Load .env files without overriding variables already in the environment.
///
/// Earlier files win, since dotenvy never overwrites an existing variable.
pub fn load_env_files() {
    for path in env_file_paths() {
        if path.exists()
            && let Err(e) = dotenvy::from_path(&path)
        {
            tracing::warn!(path = %path.display(), "failed to load .env file: {e}");
        }
    }
}

/// Load credentials from environment variables, trying .env files first.
pub fn load_credentials() -> Credentials {
    load_env_files();
    let get = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
    Credentials {
        tmdb_api_key: get("TMDB_API_KEY"),
        appwrite_api_key: get("APPWRITE_API_KEY"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_an_error() {
        let creds = Credentials::default();
        assert!(matches!(
            creds.require_tmdb_key(),
            Err(CredentialError::MissingApiKey)
        ));
    }

    #[test]
    fn present_key_is_returned() {
        let creds = Credentials {
            tmdb_api_key: Some("abc".into()),
            appwrite_api_key: None,
        };
        assert_eq!(creds.require_tmdb_key().unwrap(), "abc");
    }
}
