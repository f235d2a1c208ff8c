use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("LOKI_ENABLED is true but LOKI_URL is not set")]
    MissingLokiUrl,
    #[error("invalid LOKI_URL {0:?}: {1}")]
    InvalidLokiUrl(String, url::ParseError),
    #[error("invalid log filter {0:?}: {1}")]
    InvalidFilter(String, tracing_subscriber::filter::ParseError),
    #[cfg(feature = "loki")]
    #[error("failed to build Loki layer: {0}")]
    Loki(#[from] tracing_loki::Error),
    #[error("a global subscriber is already installed: {0}")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}

/// Where log lines go besides stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    Console,
    Loki(Url),
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub loki_enabled: bool,
    pub loki_url: Option<String>,
    pub service_name: String,
    pub environment: String,
    /// `EnvFilter` directives, e.g. `info,stockvision_backend=debug`.
    pub filter: String,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            loki_enabled: env_or("LOKI_ENABLED", "false").parse().unwrap_or(false),
            loki_url: std::env::var("LOKI_URL").ok(),
            service_name: env_or("SERVICE_NAME", "stockvision"),
            environment: env_or("ENVIRONMENT", "development"),
            filter: env_or("RUST_LOG", "info"),
        }
    }

    /// Resolves the configured sink. Loki needs a parseable URL once enabled.
    pub fn sink(&self) -> Result<LogSink, LoggingError> {
        if !self.loki_enabled {
            return Ok(LogSink::Console);
        }
        let raw = self.loki_url.as_deref().ok_or(LoggingError::MissingLokiUrl)?;
        let url = Url::parse(raw).map_err(|e| LoggingError::InvalidLokiUrl(raw.to_string(), e))?;
        Ok(LogSink::Loki(url))
    }

    fn env_filter(&self) -> Result<EnvFilter, LoggingError> {
        EnvFilter::try_new(&self.filter)
            .map_err(|e| LoggingError::InvalidFilter(self.filter.clone(), e))
    }
}

/// Installs the global subscriber: filter + fmt, plus a Loki layer when enabled.
pub fn init_logging(config: LoggingConfig) -> Result<(), LoggingError> {
    let sink = config.sink()?;
    let filter = config.env_filter()?;

    #[cfg(feature = "loki")]
    let loki_layer = match &sink {
        LogSink::Loki(url) => {
            let (layer, task) = tracing_loki::builder()
                .label("service", &config.service_name)?
                .label("environment", &config.environment)?
                .build_url(url.clone())?;
            tokio::spawn(task);
            Some(layer)
        }
        LogSink::Console => None,
    };
    #[cfg(not(feature = "loki"))]
    let loki_layer: Option<tracing_subscriber::layer::Identity> = None;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(loki_layer)
        .try_init()?;

    match sink {
        LogSink::Loki(url) if cfg!(feature = "loki") => tracing::info!(
            "Logging {} ({}) to Loki at {}",
            config.service_name,
            config.environment,
            url
        ),
        LogSink::Loki(url) => {
            tracing::warn!("Built without the loki feature, ignoring LOKI_URL={}", url)
        }
        LogSink::Console => tracing::info!("Console logging initialized ({})", config.environment),
    }
    Ok(())
}
