use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("address {0} is invalid: {1}")]
    InvalidAddress(String, std::net::AddrParseError),
    #[error("log filter {0} is invalid: {1}")]
    InvalidLogFilter(String, tracing_subscriber::filter::ParseError),
    #[error("interval must be at least 1 ms")]
    InvalidInterval,
    #[error("invalid configuration file: {0}")]
    De(#[from] toml::de::Error),
    #[error("unable to read configuration file: {0}")]
    Io(#[from] std::io::Error),
}
