use std::net::SocketAddr;

use tracing::warn;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Settings for the upstream StockVision data service.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, url::ParseError> {
        let base_url = std::env::var("STOCKVISION_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Self::from_parts(&base_url, std::env::var("STOCKVISION_TIMEOUT_SECS").ok().as_deref())
    }

    fn from_parts(base_url: &str, timeout: Option<&str>) -> Result<Self, url::ParseError> {
        let base_url = Url::parse(base_url)?;

        let timeout_secs = match timeout {
            None => DEFAULT_TIMEOUT_SECS,
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    warn!(
                        "Ignoring invalid STOCKVISION_TIMEOUT_SECS={:?}, using {}",
                        raw, DEFAULT_TIMEOUT_SECS
                    );
                    DEFAULT_TIMEOUT_SECS
                }
            },
        };

        Ok(Self { base_url, timeout_secs })
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let raw = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        Self::from_raw(&raw)
    }

    fn from_raw(raw: &str) -> Self {
        let bind_addr = raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid BIND_ADDR={:?}, using {}", raw, DEFAULT_BIND_ADDR);
            SocketAddr::from(([0, 0, 0, 0], 3000))
        });

        Self { bind_addr }
    }
}
