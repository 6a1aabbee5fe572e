pub mod app_config;
pub mod device_directory;
pub mod device_factory;
pub mod directive_catalog;
pub mod directory_listener;
pub mod directory_store;
pub mod domain;
pub mod driver;
pub mod extensions;
pub mod hostname;
pub mod loader;
pub mod platform_table;
