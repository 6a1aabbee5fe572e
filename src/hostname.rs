use std::net::{IpAddr, ToSocketAddrs};
use tracing::debug;

pub trait HostnameResolver: Send + Sync {
    fn resolve(&self, hostname: &str) -> Vec<IpAddr>;
}

/// Resolves hostnames through the operating system resolver.
#[derive(Debug, Default)]
pub struct SystemResolver;

impl HostnameResolver for SystemResolver {
    fn resolve(&self, hostname: &str) -> Vec<IpAddr> {
        match (hostname, 0).to_socket_addrs() {
            Ok(addrs) => addrs.map(|addr| addr.ip()).collect(),
            Err(err) => {
                debug!(hostname, "🔎 Unable to resolve hostname: {}", err);
                Vec::new()
            }
        }
    }
}
