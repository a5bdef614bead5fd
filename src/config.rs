use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "https://api.github.com/";
const DEFAULT_USER_AGENT: &str = "i3-github-bot";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("couldn't open {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("couldn't parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("`{0}` must not be empty")]
    MissingCredential(&'static str),
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriageConfig {
    /// Shared secret configured on the GitHub webhook, used to verify payload signatures
    pub github_secret: String,
    /// Token used to authenticate against the GitHub REST API
    pub github_token: String,
    /// Base URL of the GitHub REST API, overridable for GitHub Enterprise
    #[serde(default = "default_api_url")]
    pub github_api_url: Url,
    /// User agent sent with every API request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_url() -> Url {
    Url::parse(DEFAULT_API_URL).expect("default API URL should always parse")
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_owned()
}

impl TriageConfig {
    /// Reads and validates the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Open {
            path: path.to_owned(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        let config: TriageConfig = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.github_secret.trim().is_empty() {
            return Err(ConfigError::MissingCredential("github_secret"));
        }
        if self.github_token.trim().is_empty() {
            return Err(ConfigError::MissingCredential("github_token"));
        }
        Ok(())
    }
}
