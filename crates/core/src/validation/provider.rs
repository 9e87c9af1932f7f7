//! Per-type rule providers.
//!
//! [`RuleProvider`] is the seam between the finder and whatever declares the
//! rules. [`RuleSet`] is the in-memory implementation built by the catalog
//! loader and by tests.

use std::collections::HashMap;
use std::sync::Arc;

use super::rules::{Rule, RuleDescriptor};
use crate::naming::humanize_member_name;

/// Read-only source of rule descriptors and display names for one model
/// type's members.
///
/// Implementations are built once and queried concurrently.
pub trait RuleProvider: Send + Sync {
    /// Name of the model type this provider describes.
    fn model_type(&self) -> &str;

    /// Rules declared on `member`, in declaration order. Empty when none.
    fn rules_for_member(&self, member: &str) -> &[RuleDescriptor];

    /// Label for `member`: its explicit display name, otherwise the
    /// humanized member name.
    fn display_name(&self, member: &str) -> String;
}

#[derive(Debug, Default, Clone)]
struct MemberRules {
    display_name: Option<String>,
    rules: Vec<RuleDescriptor>,
}

/// Rules for one model type, keyed by member name.
#[derive(Debug, Clone)]
pub struct RuleSet {
    model_type: String,
    members: HashMap<String, MemberRules>,
}

impl RuleSet {
    pub fn builder(model_type: &str) -> RuleSetBuilder {
        RuleSetBuilder {
            set: RuleSet {
                model_type: model_type.to_string(),
                members: HashMap::new(),
            },
        }
    }

    /// Names of members that declare rules or a display name.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }
}

impl RuleProvider for RuleSet {
    fn model_type(&self) -> &str {
        &self.model_type
    }

    fn rules_for_member(&self, member: &str) -> &[RuleDescriptor] {
        self.members
            .get(member)
            .map(|m| m.rules.as_slice())
            .unwrap_or_default()
    }

    fn display_name(&self, member: &str) -> String {
        self.members
            .get(member)
            .and_then(|m| m.display_name.clone())
            .unwrap_or_else(|| humanize_member_name(member))
    }
}

/// Builder for [`RuleSet`]. Rules keep the order they are added in.
#[derive(Debug)]
pub struct RuleSetBuilder {
    set: RuleSet,
}

impl RuleSetBuilder {
    /// Add a leaf rule to `member`.
    pub fn rule(mut self, member: &str, rule: Rule) -> Self {
        self.member(member).rules.push(RuleDescriptor::Leaf(rule));
        self
    }

    /// Validate `member` with `nested`'s rule set.
    pub fn child(mut self, member: &str, nested: Arc<dyn RuleProvider>) -> Self {
        let rule = Rule::child(nested.model_type());
        self.member(member)
            .rules
            .push(RuleDescriptor::Composite { rule, nested });
        self
    }

    pub fn descriptor(mut self, member: &str, descriptor: RuleDescriptor) -> Self {
        self.member(member).rules.push(descriptor);
        self
    }

    pub fn display_name(mut self, member: &str, display_name: &str) -> Self {
        self.member(member).display_name = Some(display_name.to_string());
        self
    }

    pub fn build(self) -> RuleSet {
        self.set
    }

    fn member(&mut self, member: &str) -> &mut MemberRules {
        self.set.members.entry(member.to_string()).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_returned_in_declared_order() {
        let set = RuleSet::builder("Customer")
            .rule("Email", Rule::required())
            .rule("Email", Rule::max_length(120))
            .rule("Email", Rule::regex_pattern(".+@.+"))
            .build();

        let types: Vec<&str> = set
            .rules_for_member("Email")
            .iter()
            .map(|d| d.rule().rule_type.as_str())
            .collect();
        assert_eq!(types, ["required", "max_length", "regex_pattern"]);
    }

    #[test]
    fn undeclared_member_has_no_rules() {
        let set = RuleSet::builder("Customer").build();
        assert!(set.rules_for_member("Phone").is_empty());
    }

    #[test]
    fn explicit_display_name_wins() {
        let set = RuleSet::builder("Customer")
            .display_name("Email", "E-mail address")
            .build();
        assert_eq!(set.display_name("Email"), "E-mail address");
    }

    #[test]
    fn display_name_falls_back_to_humanized_member() {
        let set = RuleSet::builder("Customer")
            .rule("FirstName", Rule::required())
            .build();
        assert_eq!(set.display_name("FirstName"), "First Name");
        assert_eq!(set.display_name("LastName"), "Last Name");
    }

    #[test]
    fn child_builds_composite_descriptor() {
        let address: Arc<dyn RuleProvider> = Arc::new(
            RuleSet::builder("Address")
                .rule("Street", Rule::required())
                .build(),
        );
        let set = RuleSet::builder("Customer")
            .child("Address", Arc::clone(&address))
            .build();

        let descs = set.rules_for_member("Address");
        assert_eq!(descs.len(), 1);
        assert_eq!(descs[0].rule().config["model_type"], "Address");
        let nested = descs[0].nested_provider().unwrap();
        assert_eq!(nested.model_type(), "Address");
        assert_eq!(nested.rules_for_member("Street").len(), 1);
    }

    #[test]
    fn members_lists_declared_names() {
        let set = RuleSet::builder("Customer")
            .rule("Email", Rule::required())
            .display_name("Phone", "Telephone")
            .build();
        let mut members: Vec<&str> = set.members().collect();
        members.sort();
        assert_eq!(members, ["Email", "Phone"]);
    }
}
