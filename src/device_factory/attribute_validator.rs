use crate::device_factory::factory::ConfigError;
use crate::domain::directive::Directive;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Supplied from the device address when a command runs, never from `attrs`.
pub const TARGET_KEY: &str = "target";

/// Every non-`target` placeholder used by the directives must have a value in `attrs`.
pub fn validate_attrs(device: &str, directives: &[Arc<Directive>], attrs: &HashMap<String, String>) -> Result<(), ConfigError> {
    let keys: BTreeSet<&str> = directives
        .iter()
        .flat_map(|directive| directive.commands())
        .flat_map(template_keys)
        .filter(|&key| key != TARGET_KEY)
        .collect();

    match keys.into_iter().find(|key| !attrs.contains_key(*key)) {
        Some(missing) => Err(ConfigError::MissingAttribute {
            device: device.to_string(),
            attr: missing.to_string(),
        }),
        None => Ok(()),
    }
}

/// Field names referenced by a format template. `{{` and `}}` are literal braces; `{key!r:>8}`,
/// `{key.attr}` and `{key[0]}` all reference `key`.
pub fn template_keys(template: &str) -> Vec<&str> {
    let mut keys = Vec::new();
    let mut chars = template.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        if c != '{' {
            continue;
        }
        if matches!(chars.peek(), Some((_, '{'))) {
            chars.next();
            continue;
        }

        // Nested braces may appear in the format spec, e.g. `{value:{width}}`
        let mut depth = 1;
        let mut end = None;
        for (inner_index, inner) in chars.by_ref() {
            match inner {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        end = Some(inner_index);
                        break;
                    }
                }
                _ => {}
            }
        }

        let Some(end) = end else {
            break;
        };
        let field = &template[index + 1..end];
        let key = field.split(['!', ':', '.', '[']).next().unwrap_or_default().trim();
        if !key.is_empty() {
            keys.push(key);
        }
    }

    keys
}
