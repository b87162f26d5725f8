use crate::model::Resource;
use crate::policy::RulePolicy;

pub mod catalog;
pub mod linkage;
pub mod predicate;

mod audit;
mod compute;
mod data;
mod kms;
mod s3;


use linkage::LinkSpec;
use predicate::Decision;

/// Decides one resource under a rule's policy.
pub type ResourcePredicate = fn(&Resource, &RulePolicy) -> Decision;

/// Builds the violation message for a failing resource, given its display identity.
pub type MessageFn = fn(&Resource, &str, &RulePolicy) -> String;

#[derive(Clone, Copy, Debug)]
pub enum RuleShape {
    /// At least one resource of the type must exist.
    Existence {
        resource_type: &'static str,
        message: &'static str,
    },
    /// Every resource of the type must satisfy the predicate.
    Attribute {
        resource_type: &'static str,
        identity_key: Option<&'static str>,
        predicate: ResourcePredicate,
        message: MessageFn,
    },
    /// Every primary must satisfy `inline`, or have a linked companion satisfying `companion`.
    Linked {
        link: LinkSpec,
        inline: ResourcePredicate,
        companion: ResourcePredicate,
        message: MessageFn,
    },
}

impl RuleShape {
    pub fn kind(&self) -> &'static str {
        match self {
            RuleShape::Existence { .. } => "existence",
            RuleShape::Attribute { .. } => "attribute",
            RuleShape::Linked { .. } => "linked",
        }
    }

    /// The resource type the rule iterates over (the primary for linked rules).
    pub fn resource_type(&self) -> &'static str {
        match self {
            RuleShape::Existence { resource_type, .. } => resource_type,
            RuleShape::Attribute { resource_type, .. } => resource_type,
            RuleShape::Linked { link, .. } => link.primary_type,
        }
    }

    /// The separate resource type that can satisfy a linked rule.
    pub fn companion_type(&self) -> Option<&'static str> {
        match self {
            RuleShape::Linked { link, .. } => Some(link.companion_type),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Rule {
    pub id: &'static str,
    pub code: &'static str,
    /// e.g. `CIS AWS 2.1.1`
    pub control: Option<&'static str>,
    pub help: Option<&'static str>,
    /// Default for rules that compare against a configurable threshold.
    pub threshold: Option<f64>,
    pub shape: RuleShape,
}

impl Rule {
    pub fn existence(
        id: &'static str,
        code: &'static str,
        resource_type: &'static str,
        message: &'static str,
    ) -> Self {
        Self::with_shape(
            id,
            code,
            RuleShape::Existence {
                resource_type,
                message,
            },
        )
    }

    pub fn attribute(
        id: &'static str,
        code: &'static str,
        resource_type: &'static str,
        identity_key: Option<&'static str>,
        predicate: ResourcePredicate,
        message: MessageFn,
    ) -> Self {
        Self::with_shape(
            id,
            code,
            RuleShape::Attribute {
                resource_type,
                identity_key,
                predicate,
                message,
            },
        )
    }

    pub fn linked(
        id: &'static str,
        code: &'static str,
        link: LinkSpec,
        inline: ResourcePredicate,
        companion: ResourcePredicate,
        message: MessageFn,
    ) -> Self {
        Self::with_shape(
            id,
            code,
            RuleShape::Linked {
                link,
                inline,
                companion,
                message,
            },
        )
    }

    fn with_shape(id: &'static str, code: &'static str, shape: RuleShape) -> Self {
        Self {
            id,
            code,
            control: None,
            help: None,
            threshold: None,
            shape,
        }
    }

    pub fn with_control(mut self, control: &'static str) -> Self {
        self.control = Some(control);
        self
    }

    pub fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }
}

/// A named, ordered rule package.
#[derive(Clone, Debug)]
pub struct RuleSet {
    name: String,
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn builder(name: impl Into<String>) -> RuleSetBuilder {
        RuleSetBuilder {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

pub struct RuleSetBuilder {
    name: String,
    rules: Vec<Rule>,
}

impl RuleSetBuilder {
    /// Registers a rule. A second rule with an already registered ID replaces nothing and is
    /// dropped.
    pub fn rule(mut self, rule: Rule) -> Self {
        if !self.rules.iter().any(|r| r.id == rule.id) {
            self.rules.push(rule);
        }
        self
    }

    pub fn extend(self, rules: impl IntoIterator<Item = Rule>) -> Self {
        rules.into_iter().fold(self, RuleSetBuilder::rule)
    }

    pub fn build(self) -> RuleSet {
        RuleSet {
            name: self.name,
            rules: self.rules,
        }
    }
}
