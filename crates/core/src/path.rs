//! Access chains and their flattened property paths.
//!
//! An [`AccessChain`] is what an accessor translator hands us: one
//! [`AccessStep`] per member access, including the element steps that cross
//! into a collection. [`PropertyPathResolver`] turns it into a
//! [`PropertyPath`] of concrete properties, dropping the collection steps.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::ModelCatalog;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One member access in an access chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessStep {
    /// Member name as written in the accessor (`Items` for `Items[0]`).
    pub name: String,
    /// Type declaring the member. `None` only when the translator could not
    /// determine it, which the resolver rejects.
    pub declaring_type: Option<String>,
}

impl AccessStep {
    pub fn new(name: impl Into<String>, declaring_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declaring_type: Some(declaring_type.into()),
        }
    }
}

/// Ordered member accesses from the root model outwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessChain {
    pub steps: Vec<AccessStep>,
}

impl AccessChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a property access declared on `declaring_type`.
    pub fn property(mut self, declaring_type: &str, name: &str) -> Self {
        self.steps.push(AccessStep::new(name, declaring_type));
        self
    }

    /// Append an indexed access such as `Items[0]`. The step is declared on
    /// the collection type itself, so resolution treats it as indirection.
    pub fn element(mut self, name: &str, collection_type: &str) -> Self {
        self.steps.push(AccessStep::new(name, collection_type));
        self
    }

    pub fn push(&mut self, step: AccessStep) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// A concrete property along a resolved path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyPathSegment {
    pub name: String,
    pub declaring_type: String,
    pub value_type: String,
}

/// Concrete properties from root to leaf. Empty when the chain named a
/// property that does not exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyPath {
    segments: Vec<PropertyPathSegment>,
}

impl PropertyPath {
    pub fn new(segments: Vec<PropertyPathSegment>) -> Self {
        Self { segments }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[PropertyPathSegment] {
        &self.segments
    }

    pub fn get(&self, index: usize) -> Option<&PropertyPathSegment> {
        self.segments.get(index)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The terminal property, if any.
    pub fn leaf(&self) -> Option<&PropertyPathSegment> {
        self.segments.last()
    }

    /// Segment names joined with `.`, e.g. `"Item.Name"`.
    pub fn dotted(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

type CacheKey = (String, AccessChain);

/// Flattens access chains against a [`ModelCatalog`], caching each distinct
/// `(root type, chain)` result.
///
/// The cache keeps soft-miss (empty) paths too. It is sized for the finite
/// set of chains a form layer declares statically; resolvers fed chains
/// built from user input should use [`PropertyPathResolver::with_cache_limit`].
#[derive(Debug)]
pub struct PropertyPathResolver {
    catalog: Arc<ModelCatalog>,
    cache: RwLock<HashMap<CacheKey, Arc<PropertyPath>>>,
    cache_limit: Option<usize>,
}

impl PropertyPathResolver {
    pub fn new(catalog: Arc<ModelCatalog>) -> Self {
        Self {
            catalog,
            cache: RwLock::new(HashMap::new()),
            cache_limit: None,
        }
    }

    /// Resolver whose cache stops growing at `limit` entries. Chains beyond
    /// the limit are resolved on every call.
    pub fn with_cache_limit(catalog: Arc<ModelCatalog>, limit: usize) -> Self {
        Self {
            cache_limit: Some(limit),
            ..Self::new(catalog)
        }
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Resolve `chain` starting at `root_type`, reusing a cached path when
    /// the same chain was resolved before.
    ///
    /// Errors are never cached, so a defective chain fails on every call.
    pub fn resolve(
        &self,
        root_type: &str,
        chain: &AccessChain,
    ) -> Result<Arc<PropertyPath>, CoreError> {
        let key = (root_type.to_string(), chain.clone());

        if let Some(hit) = self.read_cache().get(&key) {
            return Ok(Arc::clone(hit));
        }

        let path = Arc::new(resolve_uncached(&self.catalog, root_type, chain)?);
        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        if self.cache_limit.is_some_and(|limit| cache.len() >= limit) {
            return Ok(cache.get(&key).map(Arc::clone).unwrap_or(path));
        }
        Ok(Arc::clone(cache.entry(key).or_insert(path)))
    }

    pub fn cached_len(&self) -> usize {
        self.read_cache().len()
    }

    pub fn clear_cache(&self) {
        self.cache
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    fn read_cache(&self) -> std::sync::RwLockReadGuard<'_, HashMap<CacheKey, Arc<PropertyPath>>> {
        self.cache.read().unwrap_or_else(|e| e.into_inner())
    }
}

/// Flatten `chain` without touching any cache.
///
/// Element steps switch the current type to the collection's element type
/// without emitting a segment. An unknown property aborts with an empty path.
pub fn resolve_uncached(
    catalog: &ModelCatalog,
    root_type: &str,
    chain: &AccessChain,
) -> Result<PropertyPath, CoreError> {
    let mut current = root_type.to_string();
    let mut segments = Vec::with_capacity(chain.len());

    for step in &chain.steps {
        let declaring = step.declaring_type.as_deref();
        if catalog.is_collection(declaring)? {
            // is_collection only returns true for a known collection type
            if let Some(element) = declaring.and_then(|d| catalog.element_type(d)) {
                current = element.to_string();
            }
            continue;
        }

        let Some(prop) = catalog.property(&current, &step.name) else {
            tracing::debug!(
                root_type,
                current_type = %current,
                property = %step.name,
                "Property not found; path resolves to nothing"
            );
            return Ok(PropertyPath::empty());
        };

        segments.push(PropertyPathSegment {
            name: prop.name.clone(),
            declaring_type: current.clone(),
            value_type: prop.value_type.clone(),
        });
        current = prop.value_type.clone();
    }

    Ok(PropertyPath::new(segments))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn catalog() -> Arc<ModelCatalog> {
        Arc::new(
            ModelCatalog::builder()
                .object(
                    "Order",
                    &[
                        ("Item", "LineItem"),
                        ("Items", "List<LineItem>"),
                        ("Reference", "string"),
                    ],
                )
                .object("LineItem", &[("Name", "string"), ("Product", "Product")])
                .object("Product", &[("Sku", "string"), ("Tags", "List<Tag>")])
                .object("Tag", &[("Label", "string")])
                .collection("List<LineItem>", "LineItem")
                .collection("List<Tag>", "Tag")
                .scalar("string")
                .build(),
        )
    }

    fn names(path: &PropertyPath) -> Vec<&str> {
        path.segments().iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn single_step_yields_one_segment() {
        let chain = AccessChain::new().property("Order", "Reference");
        let path = resolve_uncached(&catalog(), "Order", &chain).unwrap();
        assert_eq!(names(&path), ["Reference"]);
        assert_eq!(path.leaf().unwrap().declaring_type, "Order");
        assert_eq!(path.leaf().unwrap().value_type, "string");
    }

    #[test]
    fn nested_properties_follow_value_types() {
        let chain = AccessChain::new()
            .property("Order", "Item")
            .property("LineItem", "Product")
            .property("Product", "Sku");
        let path = resolve_uncached(&catalog(), "Order", &chain).unwrap();
        assert_eq!(names(&path), ["Item", "Product", "Sku"]);
        assert_eq!(path.dotted(), "Item.Product.Sku");
        assert_eq!(path.segments()[1].declaring_type, "LineItem");
    }

    #[test]
    fn indexed_step_switches_to_element_type() {
        let chain = AccessChain::new()
            .element("Items", "List<LineItem>")
            .property("LineItem", "Name");
        let path = resolve_uncached(&catalog(), "Order", &chain).unwrap();
        assert_eq!(names(&path), ["Name"]);
        assert_eq!(path.segments()[0].declaring_type, "LineItem");
    }

    #[test]
    fn indexed_step_mid_chain_emits_no_segment() {
        let chain = AccessChain::new()
            .property("Order", "Item")
            .property("LineItem", "Product")
            .element("Tags", "List<Tag>")
            .property("Tag", "Label");
        let path = resolve_uncached(&catalog(), "Order", &chain).unwrap();
        assert_eq!(names(&path), ["Item", "Product", "Label"]);
        assert_eq!(path.segments()[2].declaring_type, "Tag");
    }

    #[test]
    fn unknown_first_property_gives_empty_path() {
        let chain = AccessChain::new().property("Order", "Customer");
        let path = resolve_uncached(&catalog(), "Order", &chain).unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn unknown_later_property_gives_no_partial_path() {
        let chain = AccessChain::new()
            .property("Order", "Item")
            .property("LineItem", "Colour");
        let path = resolve_uncached(&catalog(), "Order", &chain).unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn missing_declaring_type_is_invalid_argument() {
        let mut chain = AccessChain::new();
        chain.push(AccessStep {
            name: "Reference".to_string(),
            declaring_type: None,
        });
        assert_matches!(
            resolve_uncached(&catalog(), "Order", &chain),
            Err(CoreError::InvalidArgument(_))
        );
    }

    #[test]
    fn empty_chain_gives_empty_path() {
        let path = resolve_uncached(&catalog(), "Order", &AccessChain::new()).unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn resolver_caches_per_chain() {
        let resolver = PropertyPathResolver::new(catalog());
        let chain = AccessChain::new().property("Order", "Item").property("LineItem", "Name");

        let first = resolver.resolve("Order", &chain).unwrap();
        let second = resolver.resolve("Order", &chain).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(resolver.cached_len(), 1);

        resolver
            .resolve("Order", &AccessChain::new().property("Order", "Reference"))
            .unwrap();
        assert_eq!(resolver.cached_len(), 2);

        resolver.clear_cache();
        assert_eq!(resolver.cached_len(), 0);
    }

    #[test]
    fn resolver_caches_empty_paths_but_not_errors() {
        let resolver = PropertyPathResolver::new(catalog());

        let missing = AccessChain::new().property("Order", "Customer");
        assert!(resolver.resolve("Order", &missing).unwrap().is_empty());
        assert_eq!(resolver.cached_len(), 1);

        let mut broken = AccessChain::new();
        broken.push(AccessStep {
            name: "Item".to_string(),
            declaring_type: None,
        });
        assert!(resolver.resolve("Order", &broken).is_err());
        assert!(resolver.resolve("Order", &broken).is_err());
        assert_eq!(resolver.cached_len(), 1);
    }

    #[test]
    fn limited_cache_stops_growing_but_still_resolves() {
        let resolver = PropertyPathResolver::with_cache_limit(catalog(), 1);
        let reference = AccessChain::new().property("Order", "Reference");
        let missing = AccessChain::new().property("Order", "Customer");

        let first = resolver.resolve("Order", &reference).unwrap();
        assert!(resolver.resolve("Order", &missing).unwrap().is_empty());
        assert!(resolver.resolve("Order", &missing).unwrap().is_empty());
        assert_eq!(resolver.cached_len(), 1);

        let again = resolver.resolve("Order", &reference).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
    }

    #[test]
    fn same_chain_different_root_cached_separately() {
        let resolver = PropertyPathResolver::new(catalog());
        let chain = AccessChain::new().property("LineItem", "Name");

        assert!(resolver.resolve("Order", &chain).unwrap().is_empty());
        assert_eq!(resolver.resolve("LineItem", &chain).unwrap().len(), 1);
        assert_eq!(resolver.cached_len(), 2);
    }
}
