//! Finds the rules that apply to a property path.
//!
//! The walk descends through composite rules one path segment at a time and
//! collects rules only at the terminal segment. Applications surfaced from a
//! deeper level take the label of the level that descended into them, so the
//! final label is always the display name of the path's first segment.

use std::sync::Arc;

use super::lookup::RuleProviderLookup;
use super::provider::RuleProvider;
use super::rules::RuleApplication;
use crate::error::CoreError;
use crate::model::ModelCatalog;
use crate::path::{AccessChain, PropertyPath, PropertyPathResolver};

/// Entry point for markup code: resolves root providers through an injected
/// lookup and walks them against property paths.
#[derive(Debug)]
pub struct ValidatorFinder<L> {
    lookup: L,
    paths: PropertyPathResolver,
}

impl<L: RuleProviderLookup> ValidatorFinder<L> {
    pub fn new(lookup: L, catalog: Arc<ModelCatalog>) -> Self {
        Self {
            lookup,
            paths: PropertyPathResolver::new(catalog),
        }
    }

    /// Finder using a preconfigured path resolver, e.g. one with a cache
    /// limit.
    pub fn with_resolver(lookup: L, paths: PropertyPathResolver) -> Self {
        Self { lookup, paths }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub fn paths(&self) -> &PropertyPathResolver {
        &self.paths
    }

    /// Rules applying to the terminal property of `path` on `model_type`.
    ///
    /// Returns an empty list when the model type is unset, has no registered
    /// provider, or the path is empty.
    pub fn find_validators(
        &self,
        model_type: Option<&str>,
        path: &PropertyPath,
    ) -> Vec<RuleApplication> {
        let Some(provider) = self.root_provider(model_type) else {
            return Vec::new();
        };
        resolve_rule_applications(provider.as_ref(), path)
    }

    /// Flatten `chain` against `model_type` and find its rules.
    ///
    /// Soft misses (unset type, no provider, unknown property) give an empty
    /// list. A chain step without a declaring type is a caller defect and
    /// fails with [`CoreError::InvalidArgument`].
    pub fn find_for_chain(
        &self,
        model_type: Option<&str>,
        chain: &AccessChain,
    ) -> Result<Vec<RuleApplication>, CoreError> {
        let Some(provider) = self.root_provider(model_type) else {
            return Ok(Vec::new());
        };
        let root_type = model_type.unwrap_or(provider.model_type());
        let path = self.paths.resolve(root_type, chain)?;
        Ok(resolve_rule_applications(provider.as_ref(), &path))
    }

    fn root_provider(&self, model_type: Option<&str>) -> Option<Arc<dyn RuleProvider>> {
        let Some(model_type) = model_type else {
            tracing::debug!("No model type; no rules to find");
            return None;
        };
        let provider = self.lookup.get(model_type);
        if provider.is_none() {
            tracing::debug!(model_type, "No rule provider registered");
        }
        provider
    }
}

/// Collect the rule applications for `path`'s terminal property, starting at
/// `provider`.
pub fn resolve_rule_applications(
    provider: &dyn RuleProvider,
    path: &PropertyPath,
) -> Vec<RuleApplication> {
    walk(provider, path, 0)
}

fn walk(provider: &dyn RuleProvider, path: &PropertyPath, index: usize) -> Vec<RuleApplication> {
    let Some(segment) = path.get(index) else {
        return Vec::new();
    };

    let descriptors = provider.rules_for_member(&segment.name);
    let label = provider.display_name(&segment.name);
    let is_terminal = index + 1 == path.len();

    let mut applications = Vec::new();
    for descriptor in descriptors {
        if is_terminal {
            applications.push(RuleApplication::new(descriptor.rule().clone(), label.clone()));
            continue;
        }

        let Some(nested) = descriptor.nested_provider() else {
            continue;
        };
        tracing::trace!(
            member = %segment.name,
            nested = nested.model_type(),
            "Descending into child rules"
        );
        applications.extend(
            walk(nested.as_ref(), path, index + 1)
                .into_iter()
                .map(|deeper| RuleApplication::new(deeper.rule, label.clone())),
        );
    }

    applications
}
