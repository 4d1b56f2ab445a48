//! Configuration file support for arxiv-paper-mcp.
//!
//! TOML files are layered with `ARXIV_PAPER_MCP_*` environment variables,
//! using a double underscore between section and key
//! (e.g. `ARXIV_PAPER_MCP_HTTP__PDF_TIMEOUT_SECS=60`).
//!
//! # Configuration File Format
//!
//! ```toml
//! [arxiv]
//! base_url = "http://arxiv.org"
//! api_url = "http://export.arxiv.org/api/query"
//! recent_category = "cs.AI"
//!
//! [http]
//! user_agent = "Mozilla/5.0 (compatible; ArXiv-Paper-MCP/1.0)"
//! html_timeout_secs = 20
//! pdf_timeout_secs = 30
//!
//! [extraction]
//! html_markers = ["ltx_document", "ltx_page_main", "ltx_abstract"]
//! content_selectors = [".ltx_page_main", ".ltx_document", "body"]
//! min_content_chars = 100
//! temp_dir = "/tmp"
//!
//! [logging]
//! level = "info"
//! format = "text"
//! ```

use std::path::{Path, PathBuf};

use super::Config;

const CONFIG_FILE_NAME: &str = "arxiv-paper-mcp.toml";
const ENV_PREFIX: &str = "ARXIV_PAPER_MCP";

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigFileError> {
    if !path.is_file() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }
    build_layered(Some(path), environment())
}

/// Defaults, then the file if there is one, then `ARXIV_PAPER_MCP_*` variables
pub fn load_layered(path: Option<&Path>) -> Result<Config, ConfigFileError> {
    match path {
        Some(path) => load_config(path),
        None => build_layered(None, environment()),
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn build_layered(
    path: Option<&Path>,
    env: config::Environment,
) -> Result<Config, ConfigFileError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path).required(false));
    }

    let settings = builder
        .add_source(env)
        .build()
        .map_err(|e| ConfigFileError::Parse(e.to_string()))?;

    settings
        .try_deserialize()
        .map_err(|e| ConfigFileError::Parse(e.to_string()))
}

/// Find a config file in the working directory, then the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("arxiv-paper-mcp").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
