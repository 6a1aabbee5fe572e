use crate::domain::directive::Directive;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug)]
pub struct DirectiveCatalog {
    directives: Vec<Arc<Directive>>,
    by_id: HashMap<String, usize>,
}

impl DirectiveCatalog {
    pub fn new(directives: Vec<Directive>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(directives.len());
        for (index, directive) in directives.iter().enumerate() {
            if by_id.insert(directive.id().to_string(), index).is_some() {
                return Err(CatalogError::DuplicateId(directive.id().to_string()));
            }
        }
        let directive_arcs = directives.into_iter().map(Arc::new).collect();

        Ok(Self {
            directives: directive_arcs,
            by_id,
        })
    }

    pub fn empty() -> Self {
        Self {
            directives: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    pub fn get(&self, id: &str) -> Option<Arc<Directive>> {
        self.by_id.get(id).map(|&index| &self.directives[index]).cloned()
    }

    /// Directives matching the given ids, in the order the ids are given. Unknown ids are skipped.
    pub fn filter_by_ids(&self, ids: &[&str]) -> Vec<Arc<Directive>> {
        ids.iter().filter_map(|id| self.get(id)).collect()
    }

    pub fn device_builtins(&self, platform: &str) -> Vec<Arc<Directive>> {
        self.directives
            .iter()
            .filter(|directive| directive.is_builtin() && directive.applies_to(platform))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum CatalogError {
    #[error("directive '{0}' is defined more than once")]
    DuplicateId(String),
}
