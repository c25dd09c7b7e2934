use anyhow::{Context, Result};
use sheet_layout::SheetOptions;

/// Server configuration loaded from environment variables.
/// Every variable has a sensible default; a `.env` file is honored if present.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Maximum number of files accepted in one upload
    pub max_files: usize,
    /// Maximum size of a single uploaded file in bytes
    pub max_file_bytes: usize,
    /// Layout parameters applied to every request
    pub options: SheetOptions,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = SheetOptions::default();
        let options = SheetOptions {
            dpi: env_or("SHEET_DPI", defaults.dpi)?,
            columns_per_page: env_or("SHEET_COLUMNS", defaults.columns_per_page)?,
            rows_per_page: env_or("SHEET_ROWS", defaults.rows_per_page)?,
            allow_upscale: env_or("SHEET_ALLOW_UPSCALE", defaults.allow_upscale)?,
            ..defaults
        };

        Ok(Config {
            port: env_or("PORT", 3000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_files: env_or("SHEET_MAX_FILES", 200)?,
            max_file_bytes: env_or::<usize>("SHEET_MAX_FILE_MB", 50)? * 1024 * 1024,
            options,
        })
    }

    /// Upper bound for a whole multipart request body
    pub fn max_body_bytes(&self) -> usize {
        self.max_files.saturating_mul(self.max_file_bytes)
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' is not valid")),
        Err(_) => Ok(default),
    }
}
