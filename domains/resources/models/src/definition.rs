use serde_json::Value;

use crate::patterns::Pattern;

/// Value shape a field must have before its rules are checked.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    Number,
    Integer,
    Boolean,
    /// RFC 3339 timestamp or plain `YYYY-MM-DD` date.
    Date,
    /// Identifier of another document.
    Reference,
    Object(Vec<FieldSpec>),
    Array(Box<FieldKind>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Minimum character count of the trimmed string.
    MinLength(usize),
    NotBlank,
    Pattern(Pattern),
    Min(f64),
    Max(f64),
    GreaterThan(f64),
    /// Numeric value may not exceed the current calendar year.
    MaxCurrentYear,
    OneOf(&'static [&'static str]),
}

/// Normalisation applied to a string value before its rules run; the
/// normalised value is the one stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Trim,
    Lowercase,
}

impl Transform {
    pub fn apply(self, value: &str) -> String {
        match self {
            Self::Trim => value.trim().to_string(),
            Self::Lowercase => value.to_lowercase(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Literal(Value),
    Now,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    pub rule: Rule,
    pub message: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub required_message: Option<&'static str>,
    pub transforms: Vec<Transform>,
    pub checks: Vec<Check>,
    pub default: Option<DefaultValue>,
}

impl FieldSpec {
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label: name,
            kind,
            required: false,
            required_message: None,
            transforms: Vec::new(),
            checks: Vec::new(),
            default: None,
        }
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn required_with(mut self, message: &'static str) -> Self {
        self.required = true;
        self.required_message = Some(message);
        self
    }

    pub fn trim(mut self) -> Self {
        self.transforms.push(Transform::Trim);
        self
    }

    pub fn lowercase(mut self) -> Self {
        self.transforms.push(Transform::Lowercase);
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.checks.push(Check {
            rule,
            message: None,
        });
        self
    }

    pub fn rule_with(mut self, rule: Rule, message: &'static str) -> Self {
        self.checks.push(Check {
            rule,
            message: Some(message),
        });
        self
    }

    pub fn default_value(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }
}

/// How `PUT` payloads are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// Only supplied fields are checked.
    Partial,
    /// Every required field must be supplied again.
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateReply {
    Document,
    IdOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteReply {
    Message,
    NoContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn is_write(self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Delete)
    }
}

/// Which operations require a bearer credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardPolicy {
    Open,
    Writes,
    All,
}

impl GuardPolicy {
    pub fn guards(self, operation: Operation) -> bool {
        match self {
            Self::Open => false,
            Self::Writes => operation.is_write(),
            Self::All => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDefinition {
    /// Plural name, also the collection key and URL segment.
    pub name: &'static str,
    /// Capitalized singular used in messages ("Book not found").
    pub singular: &'static str,
    pub fields: Vec<FieldSpec>,
    pub unique: Vec<&'static str>,
    pub timestamps: bool,
    pub update_mode: UpdateMode,
    pub create_reply: CreateReply,
    pub delete_reply: DeleteReply,
    pub guard: GuardPolicy,
}

impl ResourceDefinition {
    pub fn new(name: &'static str, singular: &'static str) -> Self {
        Self {
            name,
            singular,
            fields: Vec::new(),
            unique: Vec::new(),
            timestamps: false,
            update_mode: UpdateMode::Partial,
            create_reply: CreateReply::Document,
            delete_reply: DeleteReply::Message,
            guard: GuardPolicy::Open,
        }
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn unique(mut self, field: &'static str) -> Self {
        self.unique.push(field);
        self
    }

    pub fn with_timestamps(mut self) -> Self {
        self.timestamps = true;
        self
    }

    pub fn update_mode(mut self, mode: UpdateMode) -> Self {
        self.update_mode = mode;
        self
    }

    pub fn create_reply(mut self, reply: CreateReply) -> Self {
        self.create_reply = reply;
        self
    }

    pub fn delete_reply(mut self, reply: DeleteReply) -> Self {
        self.delete_reply = reply;
        self
    }

    pub fn guard(mut self, guard: GuardPolicy) -> Self {
        self.guard = guard;
        self
    }

    pub fn spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    pub fn is_unique(&self, name: &str) -> bool {
        self.unique.iter().any(|field| *field == name)
    }

    /// Name of the storage index enforcing uniqueness of `field`.
    pub fn unique_index_name(&self, field: &str) -> String {
        format!("documents_{}_{}_key", self.name, field.to_lowercase())
    }

    /// Inverse of [`Self::unique_index_name`].
    pub fn field_for_index(&self, index: &str) -> Option<&'static str> {
        self.unique
            .iter()
            .copied()
            .find(|field| self.unique_index_name(field) == index)
    }
}
