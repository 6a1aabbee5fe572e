use crate::domain::address::Address;
use crate::domain::directive::Directive;
use crate::domain::network::{Credential, Network, Proxy, Ssl};
use crate::driver::Driver;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A validated router. Only the device factory constructs these.
#[derive(Debug, Clone)]
pub struct Device {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) address: Address,
    pub(crate) port: u16,
    pub(crate) network: Network,
    pub(crate) credential: Option<Credential>,
    pub(crate) proxy: Option<Proxy>,
    pub(crate) ssl: Option<Ssl>,
    pub(crate) platform: String,
    pub(crate) directives: Vec<Arc<Directive>>,
    pub(crate) structured_output: bool,
    pub(crate) driver: Driver,
    pub(crate) attrs: HashMap<String, String>,
    pub(crate) extra: BTreeMap<String, serde_json::Value>,
}

impl Device {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Value of the reserved `target` placeholder.
    pub fn target(&self) -> String {
        self.address.to_string()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn proxy(&self) -> Option<&Proxy> {
        self.proxy.as_ref()
    }

    pub fn ssl(&self) -> Option<&Ssl> {
        self.ssl.as_ref()
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn directives(&self) -> &[Arc<Directive>] {
        &self.directives
    }

    pub fn structured_output(&self) -> bool {
        self.structured_output
    }

    pub fn driver(&self) -> Driver {
        self.driver
    }

    pub fn attrs(&self) -> &HashMap<String, String> {
        &self.attrs
    }

    pub fn extra(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.extra
    }

    pub fn directive_commands(&self) -> Vec<&str> {
        self.directives.iter().flat_map(|directive| directive.commands()).collect()
    }

    pub fn directive_ids(&self) -> Vec<&str> {
        self.directives.iter().map(|directive| directive.id()).collect()
    }

    /// True if any of the given directives is enabled on this device.
    pub fn has_directives(&self, directive_ids: &[&str]) -> bool {
        directive_ids.iter().any(|id| self.directives.iter().any(|directive| directive.id() == *id))
    }

    pub fn export_api(&self) -> ApiDevice {
        ApiDevice {
            id: self.id.clone(),
            name: self.name.clone(),
            network: self.network.display_name.clone(),
        }
    }
}

impl PartialEq for Device {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Device {}

impl Hash for Device {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ApiDevice {
    pub id: String,
    pub name: String,
    pub network: String,
}
