// Connection settings, resolved once at startup and handed to every client.
//
// Precedence for credentials: command-line flag, then environment variable
// (both handled by clap), then the saved token file in the home directory.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use url::Url;

use crate::error::{CloudLabelError, Result};

const TOKEN_FILE_NAME: &str = ".cloudlabel_token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub project: String,
    pub username: Option<String>,
    pub token: Option<String>,
    /// API root, always ending with `/`.
    pub api_url: Url,
}

impl ConnectionConfig {
    pub fn new(
        project: impl Into<String>,
        username: Option<String>,
        token: Option<String>,
        api_url: Url,
    ) -> Self {
        Self {
            project: project.into(),
            username: username.filter(|u| !u.is_empty()),
            token: token.filter(|t| !t.is_empty()),
            api_url: with_trailing_slash(api_url),
        }
    }

    /// Fill a missing token from the saved token file, if there is one.
    pub fn with_saved_token(mut self, token_file: Option<&Path>) -> Self {
        if self.token.is_none() {
            if let Some(path) = token_file {
                self.token = load_token(path);
            }
        }
        self
    }

    /// Resolve `path` (no leading slash) against the API root.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_url
            .join(path)
            .map_err(|e| CloudLabelError::remote(format!("{}{}", self.api_url, path), e))
    }
}

/// clap value parser for `--api-url`.
pub fn parse_api_url(raw: &str) -> std::result::Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| format!("invalid API URL {:?}: {}", raw, e))?;
    if url.cannot_be_a_base() {
        return Err(format!("invalid API URL {:?}: not a base URL", raw));
    }
    Ok(with_trailing_slash(url))
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Default location of the saved token: `~/.cloudlabel_token`.
pub fn token_file() -> Option<PathBuf> {
    dirs::home_dir().map(|dir| dir.join(TOKEN_FILE_NAME))
}

/// Read a saved token. Missing or empty files yield `None`.
pub fn load_token(path: &Path) -> Option<String> {
    let data = fs::read_to_string(path).ok()?;
    let token = data.trim();
    if token.is_empty() {
        None
    } else {
        debug!("Using token saved in {}", path.display());
        Some(token.to_string())
    }
}

pub fn save_token(path: &Path, token: &str) -> Result<()> {
    fs::write(path, token).map_err(|e| CloudLabelError::io(path, e))
}
