use serde::Deserialize;
use std::fmt::{Debug, Formatter};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Network {
    pub name: String,
    pub display_name: String,
}

#[derive(Clone, Deserialize, PartialEq)]
pub struct Credential {
    pub username: String,
    pub password: Option<String>,
    pub key: Option<PathBuf>,
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("key", &self.key)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Proxy {
    pub name: Option<String>,
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub credential: Option<Credential>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Ssl {
    #[serde(default)]
    pub enable: bool,
    pub cert: Option<PathBuf>,
}

pub(crate) fn default_port() -> u16 {
    22
}
