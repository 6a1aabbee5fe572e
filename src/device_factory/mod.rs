mod attribute_validator;
mod attrs_deserializer;
mod directive_entry_deserializer;
mod directive_resolver;
mod factory;
mod identity;
mod platform;
mod serialized_device;
mod ssl;

pub use factory::{ConfigError, DeviceError, DeviceFactory};
pub use identity::generate_id;
