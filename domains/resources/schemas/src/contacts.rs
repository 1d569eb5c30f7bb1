use resource_models::{
    CreateReply, DeleteReply, FieldKind, FieldSpec, Pattern,
    ResourceDefinition, Rule,
};

fn address() -> FieldKind {
    FieldKind::Object(vec![
        FieldSpec::new("street", FieldKind::String)
            .label("Street address")
            .trim()
            .required(),
        FieldSpec::new("city", FieldKind::String)
            .label("City")
            .required()
            .trim(),
        FieldSpec::new("state", FieldKind::String)
            .label("State")
            .required()
            .trim(),
        FieldSpec::new("zipCode", FieldKind::String)
            .label("ZIP code")
            .trim()
            .required()
            .rule(Rule::Pattern(Pattern::ZipCode)),
    ])
}

pub fn definition() -> ResourceDefinition {
    ResourceDefinition::new("contacts", "Contact")
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
            FieldSpec::new("email", FieldKind::String)
                .label("Email")
                .trim()
                .lowercase()
                .required()
                .rule(Rule::Pattern(Pattern::Email)),
        )
        .field(
            FieldSpec::new("favoriteColor", FieldKind::String)
                .label("Favorite color")
                .trim()
                .required(),
        )
        .field(
            FieldSpec::new("birthday", FieldKind::Date)
                .label("Birthday")
                .required(),
        )
        .field(
            FieldSpec::new("phoneNumber", FieldKind::String)
                .label("Phone number")
                .trim()
                .required()
                .rule(Rule::Pattern(Pattern::Phone)),
        )
        .field(
            FieldSpec::new("address", address())
                .label("Address")
                .required(),
        )
        .with_timestamps()
        .create_reply(CreateReply::IdOnly)
        .delete_reply(DeleteReply::NoContent)
}
