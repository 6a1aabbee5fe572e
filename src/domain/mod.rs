pub mod address;
pub mod device;
pub mod directive;
pub mod network;
