use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::{
    DocumentId,
    definition::{
        Check, DefaultValue, FieldKind, FieldSpec, ResourceDefinition, Rule,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Create,
    Replace,
    Partial,
}

impl ValidationMode {
    fn requires_all(self) -> bool { !matches!(self, Self::Partial) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Violation {
    /// Dotted path of the offending field, e.g. `address.zipCode`.
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Checks `payload` against `definition` and returns the accepted fields.
///
/// Every violation is collected; undeclared fields are dropped from the
/// result. Defaults are filled in only for [`ValidationMode::Create`].
pub fn validate(
    definition: &ResourceDefinition, payload: &Value, mode: ValidationMode,
) -> Result<Map<String, Value>, Vec<Violation>> {
    let Some(object) = payload.as_object() else {
        return Err(vec![Violation::new(
            "body",
            "Request body must be a JSON object",
        )]);
    };

    let mut violations = Vec::new();
    let mut accepted = conform_object(
        &definition.fields,
        object,
        None,
        mode.requires_all(),
        &mut violations,
    );

    if !violations.is_empty() {
        return Err(violations);
    }

    if mode == ValidationMode::Create {
        apply_defaults(&definition.fields, &mut accepted);
    }

    Ok(accepted)
}

fn apply_defaults(fields: &[FieldSpec], accepted: &mut Map<String, Value>) {
    for spec in fields {
        let Some(default) = &spec.default else {
            continue;
        };
        if accepted.get(spec.name).is_some_and(|value| !value.is_null()) {
            continue;
        }
        let value = match default {
            DefaultValue::Literal(value) => value.clone(),
            DefaultValue::Now => Value::String(
                Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
        };
        accepted.insert(spec.name.to_string(), value);
    }
}

fn join_path(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}.{name}"),
        None => name.to_string(),
    }
}

fn is_missing(spec: &FieldSpec, value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => spec.required && s.trim().is_empty(),
        _ => false,
    }
}

fn conform_object(
    fields: &[FieldSpec], object: &Map<String, Value>, prefix: Option<&str>,
    require_all: bool, violations: &mut Vec<Violation>,
) -> Map<String, Value> {
    let mut accepted = Map::new();

    for spec in fields {
        let path = join_path(prefix, spec.name);
        match object.get(spec.name) {
            Some(value) if !is_missing(spec, value) => {
                let sanitized = check_value(spec, value, &path, violations);
                accepted.insert(spec.name.to_string(), sanitized);
            }
            Some(Value::Null) if !spec.required => {
                accepted.insert(spec.name.to_string(), Value::Null);
            }
            supplied => {
                // A required field that is supplied empty is rejected even
                // when the payload is partial.
                if spec.required && (require_all || supplied.is_some()) {
                    let message = spec
                        .required_message
                        .map(str::to_string)
                        .unwrap_or_else(|| {
                            format!("{} is required", spec.label)
                        });
                    violations.push(Violation::new(path, message));
                }
            }
        }
    }

    accepted
}

fn check_value(
    spec: &FieldSpec, value: &Value, path: &str,
    violations: &mut Vec<Violation>,
) -> Value {
    match conform(&spec.kind, spec.label, value, path, violations) {
        Some(sanitized) => {
            let sanitized = normalise(spec, sanitized);
            for check in &spec.checks {
                if let Some(message) = violated(check, spec.label, &sanitized)
                {
                    violations.push(Violation::new(path, message));
                }
            }
            sanitized
        }
        None => value.clone(),
    }
}

fn normalise(spec: &FieldSpec, value: Value) -> Value {
    match value {
        Value::String(text) => Value::String(
            spec.transforms
                .iter()
                .fold(text, |text, transform| transform.apply(&text)),
        ),
        other => other,
    }
}

fn conform(
    kind: &FieldKind, label: &str, value: &Value, path: &str,
    violations: &mut Vec<Violation>,
) -> Option<Value> {
    let conforms = match kind {
        FieldKind::String => value.is_string(),
        FieldKind::Number => value.is_number(),
        FieldKind::Integer => is_integer(value),
        FieldKind::Boolean => value.is_boolean(),
        FieldKind::Date => value.as_str().is_some_and(is_date),
        FieldKind::Reference => {
            value
                .as_str()
                .is_some_and(|raw| DocumentId::parse(raw).is_ok())
        }
        FieldKind::Object(fields) => {
            if let Some(object) = value.as_object() {
                let nested =
                    conform_object(fields, object, Some(path), true, violations);
                return Some(Value::Object(nested));
            }
            false
        }
        FieldKind::Array(element) => {
            if let Some(items) = value.as_array() {
                let sanitized = items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        let item_path = format!("{path}[{index}]");
                        conform(element, label, item, &item_path, violations)
                            .unwrap_or_else(|| item.clone())
                    })
                    .collect();
                return Some(Value::Array(sanitized));
            }
            false
        }
    };

    if conforms {
        Some(value.clone())
    }
    else {
        violations.push(Violation::new(
            path,
            format!("{label} {}", expectation(kind)),
        ));
        None
    }
}

fn expectation(kind: &FieldKind) -> &'static str {
    match kind {
        FieldKind::String => "must be a string",
        FieldKind::Number => "must be a number",
        FieldKind::Integer => "must be an integer",
        FieldKind::Boolean => "must be true or false",
        FieldKind::Date => "must be a valid date",
        FieldKind::Reference => "must be a valid identifier",
        FieldKind::Object(_) => "must be an object",
        FieldKind::Array(_) => "must be an array",
    }
}

fn is_integer(value: &Value) -> bool {
    value.is_i64()
        || value.is_u64()
        || value
            .as_f64()
            .is_some_and(|f| f.is_finite() && f.fract() == 0.0)
}

fn is_date(raw: &str) -> bool {
    DateTime::parse_from_rfc3339(raw).is_ok()
        || NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok()
}

fn violated(check: &Check, label: &str, value: &Value) -> Option<String> {
    let text = value.as_str();
    let number = value.as_f64();

    let failed = match &check.rule {
        Rule::MinLength(min) => {
            text.is_some_and(|s| s.trim().chars().count() < *min)
        }
        Rule::NotBlank => text.is_some_and(|s| s.trim().is_empty()),
        Rule::Pattern(pattern) => {
            text.is_some_and(|s| !pattern.matches(s.trim()))
        }
        Rule::Min(min) => number.is_some_and(|n| n < *min),
        Rule::Max(max) => number.is_some_and(|n| n > *max),
        Rule::GreaterThan(bound) => number.is_some_and(|n| n <= *bound),
        Rule::MaxCurrentYear => {
            number.is_some_and(|n| n > f64::from(Utc::now().year()))
        }
        Rule::OneOf(options) => text.is_some_and(|s| !options.contains(&s)),
    };

    if !failed {
        return None;
    }

    Some(match check.message {
        Some(message) => message.to_string(),
        None => default_message(&check.rule, label),
    })
}

fn default_message(rule: &Rule, label: &str) -> String {
    match rule {
        Rule::MinLength(min) => {
            format!("{label} must be at least {min} characters long")
        }
        Rule::NotBlank => format!("{label} must not be blank"),
        Rule::Pattern(pattern) => {
            format!("Please enter a valid {}", pattern.describe())
        }
        Rule::Min(min) => format!("{label} must be at least {min}"),
        Rule::Max(max) => format!("{label} must be at most {max}"),
        Rule::GreaterThan(bound) => {
            format!("{label} must be greater than {bound}")
        }
        Rule::MaxCurrentYear => format!("{label} cannot be in the future"),
        Rule::OneOf(options) => {
            format!("{label} must be one of: {}", options.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::Pattern;

    fn address() -> FieldKind {
        FieldKind::Object(vec![
            FieldSpec::new("street", FieldKind::String).required(),
            FieldSpec::new("zipCode", FieldKind::String)
                .label("ZIP code")
                .required()
                .trim()
                .rule(Rule::Pattern(Pattern::ZipCode)),
        ])
    }

    fn definition() -> ResourceDefinition {
        ResourceDefinition::new("people", "Person")
            .field(
                FieldSpec::new("name", FieldKind::String)
                    .label("Name")
                    .required_with("Name is required")
                    .rule(Rule::MinLength(2)),
            )
            .field(
                FieldSpec::new("email", FieldKind::String)
                    .label("Email")
                    .required()
                    .trim()
                    .lowercase()
                    .rule(Rule::Pattern(Pattern::Email)),
            )
            .field(
                FieldSpec::new("age", FieldKind::Integer)
                    .label("Age")
                    .rule_with(Rule::Min(18.0), "Too young"),
            )
            .field(
                FieldSpec::new("role", FieldKind::String)
                    .label("Role")
                    .rule(Rule::OneOf(&["admin", "user"]))
                    .default_value(DefaultValue::Literal(json!("user"))),
            )
            .field(FieldSpec::new("address", address()).label("Address"))
            .field(FieldSpec::new(
                "tags",
                FieldKind::Array(Box::new(FieldKind::String)),
            ))
    }

    fn fields_of(violations: &[Violation]) -> Vec<&str> {
        violations.iter().map(|v| v.field.as_str()).collect()
    }

    #[test]
    fn test_valid_payload_is_accepted_with_defaults() {
        let payload = json!({"name": "Ann", "email": "ann@example.com"});

        let accepted =
            validate(&definition(), &payload, ValidationMode::Create)
                .unwrap();

        assert_eq!(accepted["name"], "Ann");
        assert_eq!(accepted["role"], "user");
    }

    #[test]
    fn test_all_violations_are_collected() {
        let payload = json!({"name": "A", "age": 12, "role": "root"});

        let violations =
            validate(&definition(), &payload, ValidationMode::Create)
                .unwrap_err();

        assert_eq!(fields_of(&violations), vec!["name", "email", "age", "role"]);
        assert_eq!(violations[0].message, "Name must be at least 2 characters long");
        assert_eq!(violations[1].message, "Email is required");
        assert_eq!(violations[2].message, "Too young");
        assert_eq!(violations[3].message, "Role must be one of: admin, user");
    }

    #[test]
    fn test_blank_required_string_counts_as_missing() {
        let payload = json!({"name": "   ", "email": "ann@example.com"});

        let violations =
            validate(&definition(), &payload, ValidationMode::Create)
                .unwrap_err();

        assert_eq!(violations, vec![Violation::new("name", "Name is required")]);
    }

    #[test]
    fn test_strings_are_stored_normalised() {
        let payload = json!({
            "name": "  Ann  ",
            "email": "  Ann@Example.COM ",
            "address": {"street": "1 Rd", "zipCode": " 12345 "}
        });

        let accepted =
            validate(&definition(), &payload, ValidationMode::Create)
                .unwrap();

        assert_eq!(accepted["email"], "ann@example.com");
        assert_eq!(accepted["address"]["zipCode"], "12345");
        assert_eq!(accepted["name"], "  Ann  ");
    }

    #[test]
    fn test_rules_see_the_normalised_value() {
        let payload = json!({"name": "Ann", "email": "ANN@EXAMPLE.COM"});

        let accepted = validate(&definition(), &payload, ValidationMode::Partial)
            .unwrap();

        assert_eq!(accepted["email"], "ann@example.com");
    }

    #[test]
    fn test_partial_mode_checks_only_supplied_fields() {
        let accepted = validate(
            &definition(),
            &json!({"age": 30}),
            ValidationMode::Partial,
        )
        .unwrap();

        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted["age"], 30);
    }

    #[test]
    fn test_partial_mode_rejects_clearing_required_field() {
        let violations = validate(
            &definition(),
            &json!({"email": null}),
            ValidationMode::Partial,
        )
        .unwrap_err();

        assert_eq!(fields_of(&violations), vec!["email"]);
    }

    #[test]
    fn test_replace_mode_requires_every_required_field() {
        let violations = validate(
            &definition(),
            &json!({"name": "Ann"}),
            ValidationMode::Replace,
        )
        .unwrap_err();

        assert_eq!(fields_of(&violations), vec!["email"]);
    }

    #[test]
    fn test_partial_mode_does_not_apply_defaults() {
        let accepted = validate(
            &definition(),
            &json!({"name": "Bea"}),
            ValidationMode::Partial,
        )
        .unwrap();

        assert!(!accepted.contains_key("role"));
    }

    #[test]
    fn test_nested_object_is_validated_whole() {
        let payload = json!({
            "name": "Ann",
            "email": "ann@example.com",
            "address": {"zipCode": "12"}
        });

        let violations =
            validate(&definition(), &payload, ValidationMode::Create)
                .unwrap_err();

        assert_eq!(
            fields_of(&violations),
            vec!["address.street", "address.zipCode"]
        );
        assert_eq!(violations[1].message, "Please enter a valid ZIP code");
    }

    #[test]
    fn test_array_elements_are_type_checked() {
        let payload = json!({
            "name": "Ann",
            "email": "ann@example.com",
            "tags": ["ok", 7]
        });

        let violations =
            validate(&definition(), &payload, ValidationMode::Create)
                .unwrap_err();

        assert_eq!(fields_of(&violations), vec!["tags[1]"]);
    }

    #[test]
    fn test_undeclared_fields_are_dropped() {
        let payload = json!({
            "name": "Ann",
            "email": "ann@example.com",
            "isAdmin": true,
            "address": {"street": "1 Rd", "zipCode": "12345", "extra": 1}
        });

        let accepted =
            validate(&definition(), &payload, ValidationMode::Create)
                .unwrap();

        assert!(!accepted.contains_key("isAdmin"));
        assert!(!accepted["address"].as_object().unwrap().contains_key("extra"));
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        let violations =
            validate(&definition(), &json!([1, 2]), ValidationMode::Create)
                .unwrap_err();

        assert_eq!(fields_of(&violations), vec!["body"]);
    }

    #[test]
    fn test_type_mismatch_skips_rules() {
        let payload = json!({"name": 42, "email": "ann@example.com"});

        let violations =
            validate(&definition(), &payload, ValidationMode::Create)
                .unwrap_err();

        assert_eq!(violations, vec![Violation::new("name", "Name must be a string")]);
    }

    #[test]
    fn test_dates_accept_plain_and_rfc3339_forms() {
        assert!(is_date("2000-01-01"));
        assert!(is_date("2000-01-01T10:00:00Z"));
        assert!(!is_date("01/01/2000"));
        assert!(!is_date("2000-13-01"));
    }

    #[test]
    fn test_integer_accepts_whole_floats_only() {
        assert!(is_integer(&json!(1999)));
        assert!(is_integer(&json!(1999.0)));
        assert!(!is_integer(&json!(19.5)));
        assert!(!is_integer(&json!("1999")));
    }
}
