//! OAuth access token acquisition.
//!
//! The installed-app consent flow and the on-disk token cache are handled by
//! `yup-oauth2`; this module only resolves paths and maps its failures.

use crate::config::{AuthConfig, AuthFlow};
use crate::error::AuthError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use yup_oauth2::{InstalledFlowAuthenticator, InstalledFlowReturnMethod};

const CREDENTIALS_DIR: &str = ".credentials";
const TOKEN_CACHE_FILE: &str = "gsuite-toolkit.json";

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &Path) -> Result<PathBuf, AuthError> {
    match path.strip_prefix("~") {
        Ok(rest) => {
            let home = dirs::home_dir().ok_or(AuthError::NoHomeDir)?;
            Ok(home.join(rest))
        }
        Err(_) => Ok(path.to_path_buf()),
    }
}

/// Token cache location: the configured path or `~/.credentials/gsuite-toolkit.json`.
pub fn token_cache_path(config: &AuthConfig) -> Result<PathBuf, AuthError> {
    match config.token_cache {
        Some(ref path) => expand_home(path),
        None => {
            let home = dirs::home_dir().ok_or(AuthError::NoHomeDir)?;
            Ok(home.join(CREDENTIALS_DIR).join(TOKEN_CACHE_FILE))
        }
    }
}

/// Create the directory holding the token cache, owner-only on unix.
fn ensure_cache_dir(cache: &Path) -> Result<(), AuthError> {
    let Some(dir) = cache.parent().filter(|d| !d.as_os_str().is_empty()) else {
        return Ok(());
    };
    if dir.exists() {
        return Ok(());
    }

    let to_error = |source| AuthError::CacheDir {
        path: dir.to_path_buf(),
        source,
    };

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        std::fs::DirBuilder::new()
            .recursive(true)
            .mode(0o700)
            .create(dir)
            .map_err(to_error)?;
    }
    #[cfg(not(unix))]
    std::fs::create_dir_all(dir).map_err(to_error)?;

    debug!("Created credential directory {}", dir.display());
    Ok(())
}

/// Obtain a bearer token for `scopes`, prompting for consent on first use.
pub async fn access_token(config: &AuthConfig, scopes: &[String]) -> Result<String, AuthError> {
    let secret_path = expand_home(&config.client_secret)?;
    let secret = yup_oauth2::read_application_secret(&secret_path)
        .await
        .map_err(|source| AuthError::ClientSecret {
            path: secret_path.clone(),
            source,
        })?;

    let cache = token_cache_path(config)?;
    ensure_cache_dir(&cache)?;
    debug!("Using token cache {}", cache.display());

    let method = match config.flow {
        AuthFlow::Redirect => InstalledFlowReturnMethod::HTTPRedirect,
        AuthFlow::Interactive => InstalledFlowReturnMethod::Interactive,
    };

    let auth = InstalledFlowAuthenticator::builder(secret, method)
        .persist_tokens_to_disk(cache)
        .build()
        .await
        .map_err(AuthError::Authenticator)?;

    let token = auth
        .token(scopes)
        .await
        .map_err(|e| AuthError::Token(e.to_string()))?;

    match token.token() {
        Some(value) if !value.is_empty() => {
            info!("Authenticated with {} scopes", scopes.len());
            Ok(value.to_string())
        }
        _ => Err(AuthError::Token("empty access token".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_expand_home() {
        let plain = expand_home(Path::new("client_secret.json")).unwrap();
        assert_eq!(plain, PathBuf::from("client_secret.json"));

        if let Some(home) = dirs::home_dir() {
            let expanded = expand_home(Path::new("~/.credentials/x.json")).unwrap();
            assert_eq!(expanded, home.join(".credentials/x.json"));
        }
    }

    #[test]
    fn test_token_cache_path_prefers_config() {
        let config = AuthConfig {
            token_cache: Some(PathBuf::from("/tmp/cache/token.json")),
            ..AuthConfig::default()
        };
        assert_eq!(
            token_cache_path(&config).unwrap(),
            PathBuf::from("/tmp/cache/token.json")
        );

        if let Some(home) = dirs::home_dir() {
            let default = token_cache_path(&AuthConfig::default()).unwrap();
            assert_eq!(default, home.join(".credentials").join("gsuite-toolkit.json"));
        }
    }

    #[test]
    fn test_ensure_cache_dir_creates_parent() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("nested").join("creds").join("token.json");

        ensure_cache_dir(&cache).unwrap();
        let dir = cache.parent().unwrap();
        assert!(dir.is_dir());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(dir).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o700);
        }

        // existing directory is left alone
        ensure_cache_dir(&cache).unwrap();
    }

    #[tokio::test]
    async fn test_missing_client_secret() {
        let config = AuthConfig {
            client_secret: PathBuf::from("/nonexistent/client_secret.json"),
            ..AuthConfig::default()
        };
        let err = access_token(&config, &[]).await.unwrap_err();
        assert!(matches!(err, AuthError::ClientSecret { .. }));
    }
}
