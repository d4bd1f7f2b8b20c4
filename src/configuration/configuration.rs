use crate::configuration::ConfigurationError;
use crate::configuration::InterfaceConfig;
use crate::timestamping::TimestampingMask;

use serde::Deserialize;

use std::convert::TryFrom;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use tracing_subscriber::filter::EnvFilter;

const DEFAULT_BIND: &str = "0.0.0.0:0";
const DEFAULT_INTERVAL_MS: u64 = 1000;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Configuration {
    pub log_filter: Option<String>,
    pub bind: Option<String>,
    pub target: String,
    pub interval_ms: Option<u64>,
    pub mask: Option<Vec<MaskFlag>>,
    #[serde(default)]
    pub interface: Vec<InterfaceConfig>,
}

/// Configuration spelling of the [`TimestampingMask`] bits.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MaskFlag {
    Scheduled,
    SendSoftware,
    SendHardware,
    Any,
}

impl Configuration {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Configuration, ConfigurationError> {
        let source = fs::read_to_string(path)?;

        parse(source)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigurationError> {
        let bind = self.bind.as_deref().unwrap_or(DEFAULT_BIND);

        parse_addr(bind)
    }

    pub fn target_addr(&self) -> Result<SocketAddr, ConfigurationError> {
        parse_addr(&self.target)
    }

    pub fn interval(&self) -> Result<Duration, ConfigurationError> {
        match self.interval_ms.unwrap_or(DEFAULT_INTERVAL_MS) {
            0 => Err(ConfigurationError::InvalidInterval),
            ms => Ok(Duration::from_millis(ms)),
        }
    }

    /// Interfaces to turn hardware timestamping on for
    pub fn hardware_interfaces(&self) -> impl Iterator<Item = &InterfaceConfig> {
        self.interface.iter().filter(|i| i.hardware)
    }
}

fn parse(source: String) -> Result<Configuration, ConfigurationError> {
    match toml::from_str(&source) {
        Err(e) => Err(ConfigurationError::from(e)),
        Ok(c) => Ok(c),
    }
}

fn parse_addr(addr: &str) -> Result<SocketAddr, ConfigurationError> {
    addr.parse()
        .map_err(|e| ConfigurationError::InvalidAddress(addr.to_string(), e))
}

impl From<MaskFlag> for TimestampingMask {
    fn from(flag: MaskFlag) -> TimestampingMask {
        match flag {
            MaskFlag::Scheduled => TimestampingMask::SCHEDULED,
            MaskFlag::SendSoftware => TimestampingMask::SEND_SOFTWARE,
            MaskFlag::SendHardware => TimestampingMask::SEND_HARDWARE,
            MaskFlag::Any => TimestampingMask::ANY,
        }
    }
}

impl From<&Configuration> for TimestampingMask {
    /// Requests every timestamp when no mask is configured.
    fn from(configuration: &Configuration) -> TimestampingMask {
        match &configuration.mask {
            Some(flags) => flags.iter().fold(TimestampingMask::empty(), |mask, f| {
                mask | TimestampingMask::from(*f)
            }),
            None => TimestampingMask::ANY,
        }
    }
}

impl TryFrom<Configuration> for EnvFilter {
    type Error = ConfigurationError;

    fn try_from(configuration: Configuration) -> Result<EnvFilter, ConfigurationError> {
        match configuration.log_filter {
            Some(f) => match EnvFilter::try_new(f.clone()) {
                Ok(f) => Ok(f),
                Err(e) => Err(ConfigurationError::InvalidLogFilter(f, e)),
            },
            None => Ok(EnvFilter::new("info")),
        }
    }
}
