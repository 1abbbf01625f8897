//! Process-wide configuration.
//!
//! Read once at start-up and never mutated afterwards.

use std::env;
use std::path::PathBuf;

use crate::error::QuizError;

const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";
const ENV_GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";
const ENV_CONFLUENCE_BASE_URL: &str = "CONFLUENCE_BASE_URL";
const ENV_CONFLUENCE_EMAIL: &str = "CONFLUENCE_EMAIL";
const ENV_CONFLUENCE_API_TOKEN: &str = "CONFLUENCE_API_TOKEN";
const ENV_EXPORT_DIR: &str = "PAGE_QUIZ_EXPORT_DIR";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-002";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Credentials for the document store, sent as HTTP basic auth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfluenceAuth {
    pub email: String,
    pub api_token: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    /// When unset, the base URL is derived from a page reference that is a full URL.
    pub confluence_base_url: Option<String>,
    pub confluence_auth: Option<ConfluenceAuth>,
    pub export_dir: PathBuf,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Fails when `GEMINI_API_KEY` is missing or blank, so no network call is
    /// attempted without a credential.
    pub fn from_env() -> Result<Self, QuizError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, QuizError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let gemini_api_key = non_blank(ENV_GEMINI_API_KEY)
            .ok_or_else(|| QuizError::Config(format!("{} is not set", ENV_GEMINI_API_KEY)))?;

        let confluence_auth = match (
            non_blank(ENV_CONFLUENCE_EMAIL),
            non_blank(ENV_CONFLUENCE_API_TOKEN),
        ) {
            (Some(email), Some(api_token)) => Some(ConfluenceAuth { email, api_token }),
            (None, None) => None,
            _ => {
                return Err(QuizError::Config(format!(
                    "{} and {} must be set together",
                    ENV_CONFLUENCE_EMAIL, ENV_CONFLUENCE_API_TOKEN
                )));
            }
        };

        let config = Self {
            gemini_api_key,
            gemini_model: non_blank(ENV_GEMINI_MODEL)
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: non_blank(ENV_GEMINI_BASE_URL)
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            confluence_base_url: non_blank(ENV_CONFLUENCE_BASE_URL),
            confluence_auth,
            export_dir: non_blank(ENV_EXPORT_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        };

        tracing::debug!(
            model = %config.gemini_model,
            confluence_base_url = ?config.confluence_base_url,
            authenticated = config.confluence_auth.is_some(),
            "Loaded configuration"
        );

        Ok(config)
    }
}
