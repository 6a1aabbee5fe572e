use std::collections::{HashMap, HashSet};

const ALIASES: [(&str, &str); 6] = [
    ("arista", "arista_eos"),
    ("ios", "cisco_ios"),
    ("juniper_junos", "juniper"),
    ("junos", "juniper"),
    ("mikrotik", "mikrotik_routeros"),
    ("tsnr", "tnsr"),
];

const SUPPORTED: [&str; 17] = [
    "arista_eos",
    "bird",
    "bird_legacy",
    "cisco_ios",
    "cisco_nxos",
    "cisco_xr",
    "frr",
    "frr_legacy",
    "http",
    "huawei",
    "juniper",
    "mikrotik_routeros",
    "mikrotik_switchos",
    "nokia_sros",
    "openbgpd",
    "tnsr",
    "vyos",
];

const STRUCTURED_OUTPUT: [&str; 2] = ["juniper", "arista_eos"];

#[derive(Debug, Clone)]
pub struct PlatformTable {
    aliases: HashMap<String, String>,
    supported: HashSet<String>,
    structured_output: HashSet<String>,
}

impl PlatformTable {
    pub fn new(aliases: HashMap<String, String>, supported: HashSet<String>, structured_output: HashSet<String>) -> Self {
        PlatformTable {
            aliases,
            supported,
            structured_output,
        }
    }

    /// Adds aliases, supported platforms and structured output platforms on top of the existing table.
    pub fn extend(mut self, aliases: &HashMap<String, String>, supported: &[String], structured_output: &[String]) -> Self {
        self.aliases.extend(aliases.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.supported.extend(supported.iter().cloned());
        self.structured_output.extend(structured_output.iter().cloned());
        self
    }

    pub fn canonical<'a>(&'a self, platform: &'a str) -> &'a str {
        self.aliases.get(platform).map(String::as_str).unwrap_or(platform)
    }

    pub fn is_supported(&self, platform: &str) -> bool {
        self.supported.contains(platform)
    }

    pub fn supports_structured_output(&self, platform: &str) -> bool {
        self.structured_output.contains(platform)
    }
}

impl Default for PlatformTable {
    fn default() -> Self {
        PlatformTable::new(
            ALIASES.iter().map(|(alias, canonical)| (alias.to_string(), canonical.to_string())).collect(),
            SUPPORTED.iter().map(ToString::to_string).collect(),
            STRUCTURED_OUTPUT.iter().map(ToString::to_string).collect(),
        )
    }
}
