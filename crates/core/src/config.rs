//! JSON rule catalog.
//!
//! A catalog file declares the model types and, per type, the rules on each
//! member:
//!
//! ```json
//! {
//!   "types": [
//!     {"name": "Order", "kind": "object", "properties": [{"name": "Item", "value_type": "LineItem"}]},
//!     {"name": "LineItem", "kind": "object", "properties": [{"name": "Name", "value_type": "string"}]}
//!   ],
//!   "rule_sets": [
//!     {"model_type": "Order", "members": [
//!       {"name": "Item", "display_name": "Order line",
//!        "rules": [{"rule_type": "child", "config": {"model_type": "LineItem"}}]}
//!     ]},
//!     {"model_type": "LineItem", "members": [
//!       {"name": "Name", "rules": [{"rule_type": "required"}]}
//!     ]}
//!   ]
//! }
//! ```
//!
//! A `child` rule becomes a composite descriptor pointing at the named type's
//! rule set. Everything is checked when the catalog is built so that lookups
//! afterwards cannot fail.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{ModelCatalog, ModelType};
use crate::validation::rules::CHILD_RULE_TYPE;
use crate::validation::{ProviderRegistry, Rule, RuleDescriptor, RuleKind, RuleProvider, RuleSet};

// ---------------------------------------------------------------------------
// File format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleCatalogConfig {
    #[serde(default)]
    pub types: Vec<ModelType>,
    #[serde(default)]
    pub rule_sets: Vec<RuleSetConfig>,
}

/// Rules declared for one model type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSetConfig {
    pub model_type: String,
    #[serde(default)]
    pub members: Vec<MemberConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// The runtime halves of a loaded catalog.
#[derive(Debug)]
pub struct LoadedCatalog {
    pub catalog: Arc<ModelCatalog>,
    pub registry: ProviderRegistry,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl RuleCatalogConfig {
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json).map_err(|e| CoreError::Config(format!("invalid catalog JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    /// Build the model catalog and one provider per rule set.
    ///
    /// Fails on duplicate rule sets, child rules without a `model_type` or
    /// pointing at an undeclared rule set, cyclic child rules, and regex
    /// rules whose `pattern` is missing, not a string, or does not compile.
    pub fn build(&self) -> Result<LoadedCatalog, CoreError> {
        let mut by_type: HashMap<&str, &RuleSetConfig> = HashMap::new();
        for set in &self.rule_sets {
            if by_type.insert(set.model_type.as_str(), set).is_some() {
                return Err(CoreError::Validation(format!(
                    "duplicate rule set for '{}'",
                    set.model_type
                )));
            }
        }

        let mut builder = SetBuilder {
            configs: by_type,
            built: HashMap::new(),
            in_progress: HashSet::new(),
        };
        let mut registry = ProviderRegistry::new();
        for set in &self.rule_sets {
            registry = registry.with_provider(builder.build(&set.model_type)?);
        }

        let catalog = self
            .types
            .iter()
            .cloned()
            .fold(ModelCatalog::builder(), |b, t| b.insert(t))
            .build();

        tracing::info!(
            types = catalog.len(),
            rule_sets = registry.len(),
            "Rule catalog loaded"
        );

        Ok(LoadedCatalog {
            catalog: Arc::new(catalog),
            registry,
        })
    }
}

struct SetBuilder<'a> {
    configs: HashMap<&'a str, &'a RuleSetConfig>,
    built: HashMap<String, Arc<dyn RuleProvider>>,
    in_progress: HashSet<String>,
}

impl SetBuilder<'_> {
    fn build(&mut self, model_type: &str) -> Result<Arc<dyn RuleProvider>, CoreError> {
        if let Some(done) = self.built.get(model_type) {
            return Ok(Arc::clone(done));
        }
        let config = *self.configs.get(model_type).ok_or_else(|| CoreError::NotFound {
            entity: "rule set",
            name: model_type.to_string(),
        })?;
        if !self.in_progress.insert(model_type.to_string()) {
            return Err(CoreError::Validation(format!(
                "cyclic child rules through '{model_type}'"
            )));
        }

        let mut set = RuleSet::builder(model_type);
        for member in &config.members {
            if let Some(display_name) = &member.display_name {
                set = set.display_name(&member.name, display_name);
            }
            for rule in &member.rules {
                let descriptor = self.descriptor(model_type, &member.name, rule)?;
                set = set.descriptor(&member.name, descriptor);
            }
        }

        self.in_progress.remove(model_type);
        let provider: Arc<dyn RuleProvider> = Arc::new(set.build());
        self.built.insert(model_type.to_string(), Arc::clone(&provider));
        Ok(provider)
    }

    fn descriptor(
        &mut self,
        model_type: &str,
        member: &str,
        rule: &Rule,
    ) -> Result<RuleDescriptor, CoreError> {
        match rule.kind() {
            RuleKind::Child => {
                let nested_type = rule
                    .config
                    .get("model_type")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| {
                        CoreError::Validation(format!(
                            "{model_type}.{member}: '{CHILD_RULE_TYPE}' rule needs config.model_type"
                        ))
                    })?;
                let nested = self.build(nested_type).map_err(|e| match e {
                    CoreError::NotFound { name, .. } => CoreError::Validation(format!(
                        "{model_type}.{member}: no rule set for child type '{name}'"
                    )),
                    other => other,
                })?;
                Ok(RuleDescriptor::Composite {
                    rule: rule.clone(),
                    nested,
                })
            }
            RuleKind::RegexPattern => {
                let pattern = rule
                    .config
                    .get("pattern")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| {
                        CoreError::Validation(format!(
                            "{model_type}.{member}: 'regex_pattern' rule needs config.pattern"
                        ))
                    })?;
                Regex::new(pattern).map_err(|e| {
                    CoreError::Validation(format!("{model_type}.{member}: invalid pattern: {e}"))
                })?;
                Ok(RuleDescriptor::Leaf(rule.clone()))
            }
            _ => Ok(RuleDescriptor::Leaf(rule.clone())),
        }
    }
}
