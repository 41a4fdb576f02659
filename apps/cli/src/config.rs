use std::path::PathBuf;

use anyhow::Result;

/// Base URL of the hosted resume-tailoring service. Override with
/// `RESUME_API_BASE_URL` when pointing at a staging deployment.
const DEFAULT_API_BASE_URL: &str = "https://vinayrathul-resume-agent-api.hf.space";

/// Application configuration loaded from environment variables.
/// Every variable has a sensible default; a `.env` file is honored if present.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub user_id: String,
    /// Name shown on the welcome screen and used in the download filename.
    pub display_name: String,
    pub tagline: String,
    pub output_dir: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_base_url: env_or("RESUME_API_BASE_URL", DEFAULT_API_BASE_URL),
            user_id: env_or("RESUME_USER_ID", "preeti"),
            display_name: env_or("RESUME_DISPLAY_NAME", "Preeti"),
            tagline: env_or("RESUME_TAGLINE", "Financial Analyst"),
            output_dir: PathBuf::from(env_or("RESUME_OUTPUT_DIR", ".")),
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
