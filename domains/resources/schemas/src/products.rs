use resource_models::{
    DefaultValue, FieldKind, FieldSpec, ResourceDefinition, Rule,
};
use serde_json::json;

pub const CATEGORIES: &[&str] = &["Electronics", "Clothing", "Food"];

pub fn definition() -> ResourceDefinition {
    ResourceDefinition::new("products", "Product")
        .field(FieldSpec::new("name", FieldKind::String).label("Name").required())
        .field(
            FieldSpec::new("price", FieldKind::Number)
                .label("Price")
                .required()
                .rule(Rule::Min(0.0)),
        )
        .field(
            FieldSpec::new("category", FieldKind::String)
                .label("Category")
                .required()
                .rule(Rule::OneOf(CATEGORIES)),
        )
        .field(
            FieldSpec::new("stock", FieldKind::Integer)
                .label("Stock")
                .rule_with(Rule::Min(0.0), "Stock cannot be negative")
                .default_value(DefaultValue::Literal(json!(0))),
        )
        .field(
            FieldSpec::new("isActive", FieldKind::Boolean)
                .label("Active flag")
                .default_value(DefaultValue::Literal(json!(true))),
        )
        .field(
            FieldSpec::new("createdAt", FieldKind::Date)
                .label("Created at")
                .default_value(DefaultValue::Now),
        )
        .field(
            FieldSpec::new(
                "features",
                FieldKind::Array(Box::new(FieldKind::String)),
            )
            .label("Features")
            .default_value(DefaultValue::Literal(json!([]))),
        )
}
