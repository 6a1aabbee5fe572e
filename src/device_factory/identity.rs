use crate::device_factory::factory::ConfigError;
use regex_lite::Regex;
use std::sync::LazyLock;
use tracing::warn;

static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\-\s]").expect("valid id scrub pattern"));

#[derive(Debug, PartialEq)]
pub struct Identity {
    pub id: String,
    pub name: String,
}

/// Picks the display name (preferring the deprecated `display_name` field) and derives the device id from it.
pub fn normalize_identity(name: Option<String>, display_name: Option<String>) -> Result<Identity, ConfigError> {
    let name = match display_name {
        Some(display_name) => {
            warn!("⚠️ The 'display_name' field is deprecated. Use the 'name' field instead.");
            display_name
        }
        None => name.ok_or(ConfigError::MissingName)?,
    };

    let id = generate_id(&name);
    if id.is_empty() {
        return Err(ConfigError::EmptyName { name });
    }

    Ok(Identity { id, name })
}

pub fn generate_id(name: &str) -> String {
    // The scrub pattern only knows ASCII whitespace
    let spaced: String = name.chars().map(|c| if c.is_whitespace() { ' ' } else { c }).collect();
    let scrubbed = DISALLOWED.replace_all(&spaced, "");
    scrubbed.split_whitespace().collect::<Vec<_>>().join("_").to_lowercase()
}
