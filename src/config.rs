use crate::cli::Args;
use crate::error::ConfigError;
use log::debug;
use std::fmt;
use std::path::Path;

pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// Settings for one run, built once at startup and handed to the parts that need them.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub page_limit: usize,
    pub dry_run: bool,
}

impl Config {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let api_key = load_key(API_KEY_VAR, args.env_file.as_deref())?;

        Ok(Config {
            api_key,
            api_url: args.api_url.clone(),
            model: args.model.clone(),
            max_tokens: args.max_tokens,
            page_limit: args.pages.max(1),
            dry_run: args.dry_run,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("page_limit", &self.page_limit)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

/// Reads `var` from the process environment, falling back to an env file.
fn load_key(var: &str, env_file: Option<&Path>) -> Result<String, ConfigError> {
    if let Some(key) = read_var(var) {
        return Ok(key);
    }

    match env_file {
        Some(path) => {
            dotenvy::from_path(path).map_err(|source| ConfigError::EnvFile {
                path: path.to_path_buf(),
                source,
            })?;
        }
        None => {
            if let Err(e) = dotenvy::dotenv() {
                debug!("No .env file loaded: {}", e);
            }
        }
    }

    read_var(var).ok_or_else(|| ConfigError::MissingApiKey {
        var: var.to_string(),
    })
}

fn read_var(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
