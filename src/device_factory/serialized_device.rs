use crate::device_factory::attrs_deserializer::deserialize_attrs;
use crate::domain::network::{Credential, Network, Proxy, Ssl, default_port};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Deserialize)]
pub struct SerializedDevice {
    pub(crate) name: Option<String>,
    pub(crate) display_name: Option<String>,
    pub(crate) address: String,
    pub(crate) network: Network,
    pub(crate) credential: Option<Credential>,
    pub(crate) proxy: Option<Proxy>,
    #[serde(default = "default_port")]
    pub(crate) port: u16,
    pub(crate) ssl: Option<Ssl>,
    pub(crate) platform: Option<String>,
    #[serde(default)]
    pub(crate) directives: Vec<DirectiveEntry>,
    pub(crate) structured_output: Option<bool>,
    pub(crate) driver: Option<String>,
    #[serde(default, deserialize_with = "deserialize_attrs")]
    pub(crate) attrs: HashMap<String, String>,
    // Keys not declared above. Never consulted during validation.
    #[serde(flatten)]
    pub(crate) extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DirectiveEntry {
    Id(String),
    Options(DirectiveOptions),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectiveOptions {
    pub builtins: Option<Builtins>,
}

impl DirectiveOptions {
    /// Later options override earlier ones, key by key.
    pub fn merge(self, other: DirectiveOptions) -> DirectiveOptions {
        DirectiveOptions {
            builtins: other.builtins.or(self.builtins),
        }
    }

    pub fn builtins(&self) -> Builtins {
        self.builtins.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Builtins {
    Enabled(bool),
    Only(Vec<String>),
}

impl Default for Builtins {
    fn default() -> Self {
        Builtins::Enabled(true)
    }
}
