use resource_models::{
    FieldKind, FieldSpec, ResourceDefinition, Rule, UpdateMode,
};

pub fn definition() -> ResourceDefinition {
    ResourceDefinition::new("categories", "Category")
        .field(
            FieldSpec::new("name", FieldKind::String)
                .label("Name")
                .required()
                .rule(Rule::MinLength(3)),
        )
        .field(
            FieldSpec::new("description", FieldKind::String)
                .label("Description")
                .required()
                .rule(Rule::MinLength(10)),
        )
        .update_mode(UpdateMode::Replace)
}
