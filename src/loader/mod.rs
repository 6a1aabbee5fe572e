mod loader;

pub use loader::{LoaderError, load_devices_from, load_directives_from, load_directory};
