use resource_models::{
    DefaultValue, FieldKind, FieldSpec, ResourceDefinition, Rule, UpdateMode,
};
use serde_json::json;

pub fn definition() -> ResourceDefinition {
    ResourceDefinition::new("items", "Item")
        .field(FieldSpec::new("name", FieldKind::String).label("Name").required())
        .field(
            FieldSpec::new("description", FieldKind::String)
                .label("Description")
                .required(),
        )
        .field(
            FieldSpec::new("price", FieldKind::Number)
                .label("Price")
                .required()
                .rule_with(Rule::GreaterThan(0.0), "Price must be positive"),
        )
        .field(
            FieldSpec::new("stock", FieldKind::Integer)
                .label("Stock")
                .required()
                .rule_with(Rule::Min(0.0), "Stock must be non-negative"),
        )
        .field(
            FieldSpec::new("category", FieldKind::String)
                .label("Category")
                .required(),
        )
        .field(
            FieldSpec::new("available", FieldKind::Boolean)
                .label("Available")
                .default_value(DefaultValue::Literal(json!(true))),
        )
        .field(
            FieldSpec::new("createdAt", FieldKind::Date)
                .label("Created at")
                .default_value(DefaultValue::Now),
        )
        .update_mode(UpdateMode::Replace)
}
