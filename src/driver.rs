use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Driver {
    Netmiko,
    HyperglassAgent,
    HttpClient,
}

impl FromStr for Driver {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "netmiko" => Ok(Driver::Netmiko),
            "hyperglass_agent" => Ok(Driver::HyperglassAgent),
            "hyperglass_http_client" | "http_client" => Ok(Driver::HttpClient),
            _ => Err(DriverError::Unknown(s.to_string())),
        }
    }
}

impl Display for Driver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Driver::Netmiko => write!(f, "netmiko"),
            Driver::HyperglassAgent => write!(f, "hyperglass_agent"),
            Driver::HttpClient => write!(f, "hyperglass_http_client"),
        }
    }
}

pub trait DriverResolver: Send + Sync {
    fn resolve(&self, platform: &str, requested: Option<&str>) -> Result<Driver, DriverError>;
}

/// Maps platforms to their default driver, falling back to netmiko.
#[derive(Debug, Default)]
pub struct DriverMap;

impl DriverResolver for DriverMap {
    fn resolve(&self, platform: &str, requested: Option<&str>) -> Result<Driver, DriverError> {
        if let Some(requested) = requested {
            return requested.parse();
        }

        Ok(match platform {
            "frr_legacy" | "bird_legacy" => Driver::HyperglassAgent,
            "http" => Driver::HttpClient,
            _ => Driver::Netmiko,
        })
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum DriverError {
    #[error("unknown driver '{0}'")]
    Unknown(String),
}
