use crate::device_factory::serialized_device::{Builtins, DirectiveEntry, DirectiveOptions};
use crate::directive_catalog::DirectiveCatalog;
use crate::domain::directive::Directive;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

const RESERVED_PREFIX: &str = "__";

/// Explicit directives first, then the platform built-ins the device opted into. Duplicates keep their first position.
#[instrument(skip(entries, catalog))]
pub fn resolve_directives(device: &str, entries: &[DirectiveEntry], platform: &str, catalog: &DirectiveCatalog) -> Vec<Arc<Directive>> {
    let (ids, options) = partition(entries);

    let explicit_ids: Vec<&str> = ids.into_iter().filter(|id| !id.starts_with(RESERVED_PREFIX)).collect();
    for id in explicit_ids.iter().filter(|id| catalog.get(id).is_none()) {
        warn!("⚠️ Device '{}' references unknown directive '{}', ignoring it", device, id);
    }
    let explicit_directives = catalog.filter_by_ids(&explicit_ids);

    let platform_builtins = catalog.device_builtins(platform);
    let builtins: Vec<Arc<Directive>> = match options.builtins() {
        Builtins::Enabled(true) => platform_builtins,
        Builtins::Enabled(false) => Vec::new(),
        Builtins::Only(included) => platform_builtins.into_iter().filter(|directive| included.iter().any(|id| id == directive.id())).collect(),
    };

    let mut seen = HashSet::new();
    let directives: Vec<Arc<Directive>> = explicit_directives
        .into_iter()
        .chain(builtins)
        .filter(|directive| seen.insert(directive.id().to_string()))
        .collect();

    debug!("Resolved {} directive(s)", directives.len());
    directives
}

fn partition(entries: &[DirectiveEntry]) -> (Vec<&str>, DirectiveOptions) {
    let mut ids = Vec::new();
    let mut options = DirectiveOptions::default();
    for entry in entries {
        match entry {
            DirectiveEntry::Id(id) => ids.push(id.as_str()),
            DirectiveEntry::Options(entry_options) => options = options.merge(entry_options.clone()),
        }
    }
    (ids, options)
}
