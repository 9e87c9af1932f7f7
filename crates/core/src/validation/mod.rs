//! Rule resolution for form fields.
//!
//! Provides rule types, the per-type [`RuleProvider`] abstraction and its
//! in-memory [`RuleSet`] implementation, the injected [`RuleProviderLookup`]
//! and the [`ValidatorFinder`] that walks providers alongside a property
//! path. Nothing here evaluates rules against values.

pub mod finder;
pub mod lookup;
pub mod provider;
pub mod rules;

pub use finder::ValidatorFinder;
pub use lookup::{ProviderRegistry, RuleProviderLookup};
pub use provider::{RuleProvider, RuleSet, RuleSetBuilder};
pub use rules::{Rule, RuleApplication, RuleDescriptor, RuleKind, Severity};
