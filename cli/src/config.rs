use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use std::path::PathBuf;

use cookbook_core::session::SESSION_FILE;

pub struct Config {
    pub api_url: String,
    pub data_dir: PathBuf,
    pub session_path: PathBuf,
}

impl Config {
    /// Resolve the data directory (platform default unless overridden) and
    /// check the API base URL.
    pub fn load(api_url: &str, data_dir: Option<PathBuf>) -> Result<Self> {
        let api_url = api_url.trim();
        let parsed = reqwest::Url::parse(api_url)
            .with_context(|| format!("Invalid API URL: '{api_url}'"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("API URL must use http or https: '{api_url}'");
        }

        let data_dir = match data_dir {
            Some(dir) => dir,
            None => ProjectDirs::from("", "", "cookbook")
                .context("Could not determine home directory")?
                .data_dir()
                .to_path_buf(),
        };
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let session_path = data_dir.join(SESSION_FILE);

        Ok(Config {
            api_url: api_url.trim_end_matches('/').to_string(),
            data_dir,
            session_path,
        })
    }
}
