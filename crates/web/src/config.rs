use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub gateway_url: String,
    pub gateway_service_key: String,
    pub api_keys: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            gateway_url: std::env::var("GATEWAY_URL")
                .context("Cannot load GATEWAY_URL env variable")?,
            gateway_service_key: std::env::var("GATEWAY_SERVICE_KEY")
                .context("Cannot load GATEWAY_SERVICE_KEY env variable")?,
            api_keys: std::env::var("API_KEYS").unwrap_or_default(),
        })
    }
}
