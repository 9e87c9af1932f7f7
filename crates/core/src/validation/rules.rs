//! Rule, descriptor and application types.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::provider::RuleProvider;

/// Rule type string marking a composite rule.
pub const CHILD_RULE_TYPE: &str = "child";

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// A validation rule declared on a member.
///
/// `rule_type` names the check (`"required"`, `"max_length"` ...) and
/// `config` carries its parameters. The markup layer decides what each rule
/// means for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub rule_type: String,
    #[serde(default = "empty_config")]
    pub config: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default)]
    pub severity: Severity,
}

/// Whether a rule violation blocks submission or is informational.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

fn empty_config() -> Value {
    Value::Object(Default::default())
}

impl Rule {
    pub fn new(rule_type: impl Into<String>, config: Value) -> Self {
        Self {
            rule_type: rule_type.into(),
            config,
            error_message: None,
            severity: Severity::Error,
        }
    }

    pub fn required() -> Self {
        Self::new("required", empty_config())
    }

    pub fn min_length(min: u64) -> Self {
        Self::new("min_length", json!({ "min": min }))
    }

    pub fn max_length(max: u64) -> Self {
        Self::new("max_length", json!({ "max": max }))
    }

    pub fn regex_pattern(pattern: &str) -> Self {
        Self::new("regex_pattern", json!({ "pattern": pattern }))
    }

    /// The rule carried by a composite descriptor delegating to
    /// `model_type`'s own rule set.
    pub fn child(model_type: &str) -> Self {
        Self::new(CHILD_RULE_TYPE, json!({ "model_type": model_type }))
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn kind(&self) -> RuleKind {
        RuleKind::from_rule_type(&self.rule_type)
    }
}

// ---------------------------------------------------------------------------
// RuleKind
// ---------------------------------------------------------------------------

/// Known rule types, for consumers that want to match instead of comparing
/// strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    Required,
    TypeCheck,
    MinLength,
    MaxLength,
    MinValue,
    MaxValue,
    EnumValues,
    RegexPattern,
    Child,
    Other(String),
}

impl RuleKind {
    pub fn from_rule_type(rule_type: &str) -> Self {
        match rule_type {
            "required" => Self::Required,
            "type_check" => Self::TypeCheck,
            "min_length" => Self::MinLength,
            "max_length" => Self::MaxLength,
            "min_value" => Self::MinValue,
            "max_value" => Self::MaxValue,
            "enum_values" => Self::EnumValues,
            "regex_pattern" => Self::RegexPattern,
            CHILD_RULE_TYPE => Self::Child,
            other => Self::Other(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// RuleDescriptor
// ---------------------------------------------------------------------------

/// One rule attached to a member, either applied directly or delegating to a
/// nested object's provider.
#[derive(Clone)]
pub enum RuleDescriptor {
    Leaf(Rule),
    Composite {
        rule: Rule,
        nested: Arc<dyn RuleProvider>,
    },
}

impl RuleDescriptor {
    pub fn rule(&self) -> &Rule {
        match self {
            Self::Leaf(rule) | Self::Composite { rule, .. } => rule,
        }
    }

    /// The provider a composite rule delegates to. `None` for leaf rules.
    pub fn nested_provider(&self) -> Option<&Arc<dyn RuleProvider>> {
        match self {
            Self::Leaf(_) => None,
            Self::Composite { nested, .. } => Some(nested),
        }
    }
}

impl fmt::Debug for RuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(rule) => f.debug_tuple("Leaf").field(rule).finish(),
            Self::Composite { rule, nested } => f
                .debug_struct("Composite")
                .field("rule", rule)
                .field("nested", &nested.model_type())
                .finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// RuleApplication
// ---------------------------------------------------------------------------

/// A rule that applies to a path's terminal property, with the label the
/// form should show for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleApplication {
    pub rule: Rule,
    pub label: String,
}

impl RuleApplication {
    pub fn new(rule: Rule, label: impl Into<String>) -> Self {
        Self {
            rule,
            label: label.into(),
        }
    }
}
