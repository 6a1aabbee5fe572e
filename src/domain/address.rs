use std::fmt::{Display, Formatter};
use std::net::IpAddr;

#[derive(Debug, Clone, PartialEq)]
pub enum Address {
    Ip(IpAddr),
    Hostname(String),
}

impl Address {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        match value.parse::<IpAddr>() {
            Ok(ip) => Address::Ip(ip),
            Err(_) => Address::Hostname(value.to_string()),
        }
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Address::Ip(ip) => write!(f, "{}", ip),
            Address::Hostname(hostname) => write!(f, "{}", hostname),
        }
    }
}
