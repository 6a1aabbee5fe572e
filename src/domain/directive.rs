use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Deserialize)]
pub struct Directive {
    id: String,
    name: String,
    #[serde(default)]
    rules: Vec<Rule>,
    #[serde(default)]
    plugins: Vec<String>,
    #[serde(default)]
    builtin: bool,
    #[serde(default)]
    platforms: Vec<String>,
    #[serde(default)]
    field_type: FieldType,
    #[serde(default)]
    groups: Vec<String>,
    info: Option<String>,
}

impl Directive {
    pub fn new(id: String, name: String, rules: Vec<Rule>, plugins: Vec<String>) -> Self {
        Directive {
            id,
            name,
            rules,
            plugins,
            builtin: false,
            platforms: Vec::new(),
            field_type: FieldType::default(),
            groups: Vec::new(),
            info: None,
        }
    }

    /// Marks the directive as a built-in for the given platforms.
    pub fn builtin_for(mut self, platforms: &[&str]) -> Self {
        self.builtin = true;
        self.platforms = platforms.iter().map(ToString::to_string).collect();
        self
    }

    pub fn with_info(mut self, info: &str) -> Self {
        self.info = Some(info.to_string());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    pub fn is_builtin(&self) -> bool {
        self.builtin
    }

    pub fn applies_to(&self, platform: &str) -> bool {
        self.platforms.iter().any(|p| p == platform)
    }

    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().flat_map(|rule| rule.commands.iter().map(String::as_str))
    }

    pub fn frontend(&self, params: &FrontendParams) -> DirectiveFrontend {
        DirectiveFrontend {
            id: self.id.clone(),
            name: self.name.clone(),
            field_type: self.field_type,
            groups: self.groups.clone(),
            info: if params.include_info { self.info.clone() } else { None },
        }
    }
}

// Directives are identified by id alone
impl PartialEq for Directive {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Directive {}

impl Hash for Directive {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Rule {
    #[serde(default)]
    condition: Option<String>,
    commands: Vec<String>,
}

impl Rule {
    pub fn new(condition: Option<String>, commands: Vec<String>) -> Self {
        Rule { condition, commands }
    }

    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Select,
    None,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FrontendParams {
    #[serde(default)]
    pub include_info: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DirectiveFrontend {
    pub id: String,
    pub name: String,
    pub field_type: FieldType,
    pub groups: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}
