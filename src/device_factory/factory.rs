use crate::device_factory::attribute_validator::validate_attrs;
use crate::device_factory::directive_resolver::resolve_directives;
use crate::device_factory::identity::normalize_identity;
use crate::device_factory::platform::{resolve_platform, resolve_structured_output};
use crate::device_factory::serialized_device::SerializedDevice;
use crate::device_factory::ssl::default_certificate;
use crate::directive_catalog::DirectiveCatalog;
use crate::domain::address::Address;
use crate::domain::device::Device;
use crate::driver::{DriverError, DriverMap, DriverResolver};
use crate::hostname::{HostnameResolver, SystemResolver};
use crate::platform_table::PlatformTable;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{Span, debug, field, instrument};

/// Turns raw device definitions into validated devices. Every collaborator is injected so a reload can build
/// against a fresh catalog without touching the one in use.
#[derive(Clone)]
pub struct DeviceFactory {
    catalog: Arc<DirectiveCatalog>,
    platforms: Arc<PlatformTable>,
    drivers: Arc<dyn DriverResolver>,
    hostnames: Arc<dyn HostnameResolver>,
    certificates: PathBuf,
}

impl DeviceFactory {
    pub fn new(catalog: Arc<DirectiveCatalog>, platforms: Arc<PlatformTable>) -> Self {
        DeviceFactory {
            catalog,
            platforms,
            drivers: Arc::new(DriverMap),
            hostnames: Arc::new(SystemResolver),
            certificates: PathBuf::from("certs"),
        }
    }

    pub fn with_hostname_resolver(mut self, hostnames: Arc<dyn HostnameResolver>) -> Self {
        self.hostnames = hostnames;
        self
    }

    pub fn with_driver_resolver(mut self, drivers: Arc<dyn DriverResolver>) -> Self {
        self.drivers = drivers;
        self
    }

    pub fn with_certificate_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.certificates = directory.into();
        self
    }

    pub fn from_value(&self, value: serde_json::Value) -> Result<Device, DeviceError> {
        let serialized = serde_json::from_value::<SerializedDevice>(value)?;
        self.build(serialized)
    }

    #[instrument(skip_all, fields(device = field::Empty))]
    fn build(&self, serialized: SerializedDevice) -> Result<Device, DeviceError> {
        let identity = normalize_identity(serialized.name, serialized.display_name)?;
        Span::current().record("device", identity.id.as_str());

        // Everything below depends on the canonical platform
        let platform = resolve_platform(&identity.name, serialized.platform.as_deref(), &self.platforms)?;
        let address = self.resolve_address(&identity.name, &serialized.address)?;
        let structured_output = resolve_structured_output(&identity.name, &platform, serialized.structured_output, &self.platforms)?;
        let driver = self
            .drivers
            .resolve(&platform, serialized.driver.as_deref())
            .map_err(|DriverError::Unknown(driver)| ConfigError::UnsupportedDriver {
                device: identity.name.clone(),
                platform: platform.clone(),
                driver,
            })?;

        let directives = resolve_directives(&identity.name, &serialized.directives, &platform, &self.catalog);
        validate_attrs(&identity.name, &directives, &serialized.attrs)?;

        let ssl = default_certificate(&identity, serialized.ssl, &self.certificates)?;

        debug!(platform = %platform, driver = %driver, "Built device '{}' with {} directive(s)", identity.name, directives.len());
        Ok(Device {
            id: identity.id,
            name: identity.name,
            address,
            port: serialized.port,
            network: serialized.network,
            credential: serialized.credential,
            proxy: serialized.proxy,
            ssl,
            platform,
            directives,
            structured_output,
            driver,
            attrs: serialized.attrs,
            extra: serialized.extra,
        })
    }

    fn resolve_address(&self, device: &str, address: &str) -> Result<Address, ConfigError> {
        match Address::parse(address) {
            Address::Hostname(hostname) if self.hostnames.resolve(&hostname).is_empty() => Err(ConfigError::UnresolvableAddress {
                device: device.to_string(),
                address: hostname,
            }),
            address => Ok(address),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("a device is missing a 'name' property")]
    MissingName,
    #[error("device name '{name}' does not contain any usable characters")]
    EmptyName { name: String },
    #[error("device '{device}' is missing a 'platform' (network operating system) property")]
    MissingPlatform { device: String },
    #[error("device '{device}' has an address of '{address}', which is not resolvable")]
    UnresolvableAddress { device: String, address: String },
    #[error("the 'structured_output' field is set to 'true' on device '{device}' with platform '{platform}', which does not support structured output")]
    UnsupportedStructuredOutput { device: String, platform: String },
    #[error("device '{device}' has a command that references attribute '{attr}', but '{attr}' is missing from device attributes")]
    MissingAttribute { device: String, attr: String },
    #[error("device '{device}' uses driver '{driver}', which is not supported for platform '{platform}'")]
    UnsupportedDriver { device: String, platform: String, driver: String },
    #[error("unable to create certificate '{}' for device '{device}': {source}", path.display())]
    Certificate { device: String, path: PathBuf, source: io::Error },
}

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("invalid device definition: {0}")]
    Deserialization(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("platform '{0}' is not supported")]
    UnsupportedDevice(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::directive::{Directive, Rule};
    use crate::domain::network::Ssl;
    use crate::driver::Driver;
    use crate::hostname::fake::StaticResolver;
    use std::fs;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use std::env::temp_dir;
    use test_log::test;

    fn catalog() -> DirectiveCatalog {
        let directive = |id: &str, commands: &[&str]| {
            Directive::new(
                id.to_string(),
                id.to_string(),
                vec![Rule::new(None, commands.iter().map(ToString::to_string).collect())],
                vec![],
            )
        };

        DirectiveCatalog::new(vec![
            directive("show-bgp", &["show bgp {target}"]),
            directive("ping-vrf", &["ping vrf {vrf} {target} source {source4}"]),
            directive("__bgp_route__", &["show ip bgp {target}"]).builtin_for(&["cisco_ios"]),
            directive("__ping__", &["ping {target}"]).builtin_for(&["cisco_ios", "juniper"]),
        ])
        .unwrap()
    }

    fn factory() -> DeviceFactory {
        DeviceFactory::new(Arc::new(catalog()), Arc::new(PlatformTable::default()))
            .with_hostname_resolver(Arc::new(StaticResolver::default().with("core1.example.net", "192.0.2.10")))
            .with_certificate_directory(temp_dir().join("glasshouse-factory-tests"))
    }

    fn definition(overrides: Value) -> Value {
        let mut definition = json!({
            "name": "Core RTR #1",
            "address": "192.0.2.1",
            "network": { "name": "primary", "display_name": "Primary" },
            "platform": "ios",
            "directives": ["show-bgp"]
        });
        if let (Some(definition), Value::Object(overrides)) = (definition.as_object_mut(), overrides) {
            definition.extend(overrides);
        }
        definition
    }

    #[test]
    fn resolves_a_device_end_to_end() {
        let device = factory().from_value(definition(json!({}))).unwrap();

        assert_eq!(device.id(), "core_rtr_1");
        assert_eq!(device.name(), "Core RTR #1");
        assert_eq!(device.platform(), "cisco_ios");
        assert_eq!(device.directive_ids(), vec!["show-bgp", "__bgp_route__", "__ping__"]);
        assert_eq!(device.driver(), Driver::Netmiko);
        assert!(!device.structured_output());
        assert_eq!(device.port(), 22);
    }

    #[test]
    fn an_alias_and_its_canonical_platform_resolve_identically() {
        let aliased = factory().from_value(definition(json!({ "platform": "ios" }))).unwrap();
        let canonical = factory().from_value(definition(json!({ "platform": "cisco_ios" }))).unwrap();

        assert_eq!(aliased.platform(), canonical.platform());
        assert_eq!(aliased.directive_ids(), canonical.directive_ids());
        assert_eq!(aliased.driver(), canonical.driver());
    }

    #[test]
    fn fails_when_a_command_references_a_missing_attribute() {
        let result = factory().from_value(definition(json!({ "directives": ["ping-vrf"], "attrs": { "source4": "192.0.2.1" } })));
        assert!(matches!(
            result,
            Err(DeviceError::Config(ConfigError::MissingAttribute { device, attr })) if device == "Core RTR #1" && attr == "vrf"
        ));
    }

    #[test]
    fn accepts_attributes_for_every_referenced_key() {
        let device = factory()
            .from_value(definition(json!({ "directives": ["ping-vrf"], "attrs": { "source4": "192.0.2.1", "vrf": "internet" } })))
            .unwrap();
        assert_eq!(device.attrs().get("vrf").map(String::as_str), Some("internet"));
    }

    #[test]
    fn only_resolved_directives_are_checked_for_attributes() {
        // `ping-vrf` needs attributes but is not enabled on this device
        let device = factory().from_value(definition(json!({ "directives": ["show-bgp", { "builtins": false }] }))).unwrap();
        assert_eq!(device.directive_ids(), vec!["show-bgp"]);
    }

    #[test]
    fn fails_without_a_name() {
        let mut value = definition(json!({}));
        value.as_object_mut().unwrap().remove("name");
        assert!(matches!(factory().from_value(value), Err(DeviceError::Config(ConfigError::MissingName))));
    }

    #[test]
    fn uses_the_legacy_display_name() {
        let device = factory().from_value(definition(json!({ "display_name": "Edge Router" }))).unwrap();
        assert_eq!(device.id(), "edge_router");
        assert_eq!(device.name(), "Edge Router");
    }

    #[test]
    fn fails_without_a_platform() {
        let mut value = definition(json!({}));
        value.as_object_mut().unwrap().remove("platform");
        assert!(matches!(
            factory().from_value(value),
            Err(DeviceError::Config(ConfigError::MissingPlatform { device })) if device == "Core RTR #1"
        ));
    }

    #[test]
    fn fails_for_an_unsupported_platform() {
        let result = factory().from_value(definition(json!({ "platform": "amiga_os" })));
        assert!(matches!(result, Err(DeviceError::UnsupportedDevice(platform)) if platform == "amiga_os"));
    }

    #[test]
    fn resolves_a_known_hostname() {
        let device = factory().from_value(definition(json!({ "address": "core1.example.net" }))).unwrap();
        assert_eq!(device.address(), &Address::Hostname("core1.example.net".to_string()));
        assert_eq!(device.target(), "core1.example.net");
    }

    #[test]
    fn fails_for_an_unresolvable_hostname() {
        let result = factory().from_value(definition(json!({ "address": "ghost.example.net" })));
        assert!(matches!(
            result,
            Err(DeviceError::Config(ConfigError::UnresolvableAddress { device, address })) if device == "Core RTR #1" && address == "ghost.example.net"
        ));
    }

    #[test]
    fn structured_output_defaults_to_platform_support() {
        let device = factory().from_value(definition(json!({ "platform": "junos", "directives": [] }))).unwrap();
        assert_eq!(device.platform(), "juniper");
        assert!(device.structured_output());
    }

    #[test]
    fn fails_when_structured_output_is_forced_on_an_unsupported_platform() {
        let result = factory().from_value(definition(json!({ "structured_output": true })));
        assert!(matches!(
            result,
            Err(DeviceError::Config(ConfigError::UnsupportedStructuredOutput { platform, .. })) if platform == "cisco_ios"
        ));
    }

    #[test]
    fn honours_a_driver_override() {
        let device = factory().from_value(definition(json!({ "platform": "frr_legacy", "driver": "netmiko", "directives": [] }))).unwrap();
        assert_eq!(device.driver(), Driver::Netmiko);
    }

    #[test]
    fn fails_for_an_unknown_driver() {
        let result = factory().from_value(definition(json!({ "driver": "telnetlib" })));
        assert!(matches!(
            result,
            Err(DeviceError::Config(ConfigError::UnsupportedDriver { driver, platform, .. })) if driver == "telnetlib" && platform == "cisco_ios"
        ));
    }

    struct AgentOnly;

    impl DriverResolver for AgentOnly {
        fn resolve(&self, _platform: &str, requested: Option<&str>) -> Result<Driver, DriverError> {
            match requested {
                None | Some("hyperglass_agent") => Ok(Driver::HyperglassAgent),
                Some(other) => Err(DriverError::Unknown(other.to_string())),
            }
        }
    }

    #[test]
    fn uses_the_injected_driver_resolver() {
        let factory = factory().with_driver_resolver(Arc::new(AgentOnly));

        let device = factory.from_value(definition(json!({}))).unwrap();
        assert_eq!(device.driver(), Driver::HyperglassAgent);

        let result = factory.from_value(definition(json!({ "driver": "netmiko" })));
        assert!(matches!(
            result,
            Err(DeviceError::Config(ConfigError::UnsupportedDriver { driver, .. })) if driver == "netmiko"
        ));
    }

    #[test]
    fn defaults_the_certificate_of_an_ssl_device() {
        let dir = temp_dir().join("glasshouse-factory-ssl-tests");
        let _ = fs::remove_dir_all(&dir);
        let factory = factory().with_certificate_directory(&dir);

        let device = factory.from_value(definition(json!({ "ssl": { "enable": true } }))).unwrap();

        let expected = dir.join("core_rtr_1.pem");
        assert_eq!(
            device.ssl(),
            Some(&Ssl {
                enable: true,
                cert: Some(expected.clone())
            })
        );
        assert_eq!(fs::metadata(&expected).unwrap().len(), 0);
    }

    #[test]
    fn keeps_credentials_and_proxy() {
        let device = factory()
            .from_value(definition(json!({
                "credential": { "username": "lg", "password": "secret" },
                "proxy": { "address": "192.0.2.100", "credential": { "username": "jump", "key": "/etc/glasshouse/keys/jump" } }
            })))
            .unwrap();

        assert_eq!(device.credential().map(|c| c.username.as_str()), Some("lg"));
        let proxy = device.proxy().unwrap();
        assert_eq!(proxy.address, "192.0.2.100");
        assert_eq!(proxy.port, 22);
        assert_eq!(proxy.credential.as_ref().and_then(|c| c.key.as_deref()), Some(std::path::Path::new("/etc/glasshouse/keys/jump")));
        assert_eq!(device.ssl(), None);
    }

    #[test]
    fn keeps_undeclared_keys_in_extra() {
        let device = factory().from_value(definition(json!({ "location": "AMS1" }))).unwrap();
        assert_eq!(device.extra().get("location"), Some(&json!("AMS1")));
    }

    #[test]
    fn fails_for_a_malformed_definition() {
        let result = factory().from_value(json!({ "name": "rtr1", "platform": "ios" }));
        assert!(matches!(result, Err(DeviceError::Deserialization(_))));
    }
}
