//! Field rule resolution for form markup.
//!
//! Given a model type and an access chain into it, this crate works out which
//! declared validation rules apply to the chain's terminal property and which
//! label a form should show for it:
//!
//! - [`model::ModelCatalog`] — read-only type metadata (objects, collections,
//!   scalars) that stands in for runtime reflection.
//! - [`path::PropertyPathResolver`] — flattens an [`path::AccessChain`] into a
//!   [`path::PropertyPath`], skipping collection indirection.
//! - [`validation::ValidatorFinder`] — walks a [`validation::RuleProvider`]
//!   tree alongside a path and returns [`validation::RuleApplication`]s.
//! - [`config::RuleCatalogConfig`] — JSON catalog of types and rule sets.

pub mod config;
pub mod error;
pub mod model;
pub mod naming;
pub mod path;
pub mod validation;

pub use error::CoreError;
