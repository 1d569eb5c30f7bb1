use resource_models::{
    DefaultValue, FieldKind, FieldSpec, GuardPolicy, Pattern,
    ResourceDefinition, Rule,
};
use serde_json::json;

pub const ROLES: &[&str] = &["admin", "user"];

pub fn definition() -> ResourceDefinition {
    ResourceDefinition::new("users", "User")
        .field(
            FieldSpec::new("email", FieldKind::String)
                .label("Email")
                .required()
                .rule(Rule::Pattern(Pattern::Email)),
        )
        .field(FieldSpec::new("name", FieldKind::String).label("Name").required())
        .field(
            FieldSpec::new("age", FieldKind::Integer)
                .label("Age")
                .rule(Rule::Min(18.0)),
        )
        .field(
            FieldSpec::new("role", FieldKind::String)
                .label("Role")
                .rule(Rule::OneOf(ROLES))
                .default_value(DefaultValue::Literal(json!("user"))),
        )
        .unique("email")
        .guard(GuardPolicy::All)
}
