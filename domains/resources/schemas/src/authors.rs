use resource_models::{FieldKind, FieldSpec, Pattern, ResourceDefinition, Rule};

fn award() -> FieldKind {
    FieldKind::Object(vec![
        FieldSpec::new("name", FieldKind::String).label("Award name"),
        FieldSpec::new("year", FieldKind::Integer).label("Award year"),
    ])
}

pub fn definition() -> ResourceDefinition {
    ResourceDefinition::new("authors", "Author")
        .field(
            FieldSpec::new("firstName", FieldKind::String)
                .label("First name")
                .trim()
                .required()
                .rule(Rule::MinLength(2)),
        )
        .field(
            FieldSpec::new("lastName", FieldKind::String)
                .label("Last name")
                .trim()
                .required()
                .rule(Rule::MinLength(2)),
        )
        .field(
            FieldSpec::new("birthDate", FieldKind::Date)
                .label("Birth date")
                .required(),
        )
        .field(
            FieldSpec::new("nationality", FieldKind::String)
                .label("Nationality")
                .trim()
                .required()
                .rule(Rule::NotBlank),
        )
        .field(
            FieldSpec::new("biography", FieldKind::String)
                .label("Biography")
                .trim()
                .required()
                .rule(Rule::MinLength(20)),
        )
        .field(
            FieldSpec::new("awards", FieldKind::Array(Box::new(award())))
                .label("Awards"),
        )
        .field(
            FieldSpec::new("website", FieldKind::String)
                .label("Website")
                .trim()
                .rule(Rule::Pattern(Pattern::Url)),
        )
        .with_timestamps()
}
