//! Root provider lookup.
//!
//! The finder never reaches for a global registry: a [`RuleProviderLookup`]
//! is handed to it at construction.

use std::collections::HashMap;
use std::sync::Arc;

use super::provider::RuleProvider;

/// Resolves the root [`RuleProvider`] for a model type.
///
/// Implementations must tolerate concurrent `get` calls.
pub trait RuleProviderLookup: Send + Sync {
    fn get(&self, model_type: &str) -> Option<Arc<dyn RuleProvider>>;
}

impl<L: RuleProviderLookup + ?Sized> RuleProviderLookup for Arc<L> {
    fn get(&self, model_type: &str) -> Option<Arc<dyn RuleProvider>> {
        (**self).get(model_type)
    }
}

/// Immutable map of model type to root provider.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn RuleProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `provider` under its own model type, replacing any previous
    /// registration.
    pub fn with_provider(mut self, provider: Arc<dyn RuleProvider>) -> Self {
        self.providers
            .insert(provider.model_type().to_string(), provider);
        self
    }

    pub fn contains(&self, model_type: &str) -> bool {
        self.providers.contains_key(model_type)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl RuleProviderLookup for ProviderRegistry {
    fn get(&self, model_type: &str) -> Option<Arc<dyn RuleProvider>> {
        self.providers.get(model_type).cloned()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        types.sort_unstable();
        f.debug_struct("ProviderRegistry")
            .field("model_types", &types)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::provider::RuleSet;
    use crate::validation::rules::Rule;

    #[test]
    fn registered_provider_found_by_model_type() {
        let registry = ProviderRegistry::new().with_provider(Arc::new(
            RuleSet::builder("Order")
                .rule("Reference", Rule::required())
                .build(),
        ));

        let provider = registry.get("Order").unwrap();
        assert_eq!(provider.model_type(), "Order");
        assert!(registry.contains("Order"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unregistered_model_type_is_absent() {
        let registry = ProviderRegistry::new();
        assert!(registry.get("Order").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let registry = ProviderRegistry::new()
            .with_provider(Arc::new(RuleSet::builder("Order").build()))
            .with_provider(Arc::new(
                RuleSet::builder("Order")
                    .rule("Reference", Rule::required())
                    .build(),
            ));

        assert_eq!(registry.len(), 1);
        let provider = registry.get("Order").unwrap();
        assert_eq!(provider.rules_for_member("Reference").len(), 1);
    }

    #[test]
    fn shared_registry_is_a_lookup() {
        let registry = Arc::new(
            ProviderRegistry::new().with_provider(Arc::new(RuleSet::builder("Order").build())),
        );
        fn lookup_of(l: &impl RuleProviderLookup) -> bool {
            l.get("Order").is_some()
        }
        assert!(lookup_of(&registry));
    }
}
