use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct InterfaceConfig {
    pub name: String,
    /// Turn on transmit hardware timestamping in the driver
    #[serde(default)]
    pub hardware: bool,
}
