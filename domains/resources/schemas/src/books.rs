use resource_models::{
    FieldKind, FieldSpec, GuardPolicy, ResourceDefinition, Rule,
};

pub const GENRES: &[&str] = &[
    "Fiction",
    "Non-Fiction",
    "Science Fiction",
    "Mystery",
    "Romance",
    "Biography",
    "History",
    "Other",
];

pub fn definition() -> ResourceDefinition {
    ResourceDefinition::new("books", "Book")
        .field(
            FieldSpec::new("title", FieldKind::String)
                .label("Title")
                .trim()
                .required()
                .rule(Rule::MinLength(2)),
        )
        .field(
            FieldSpec::new("author", FieldKind::Reference)
                .label("Author")
                .required(),
        )
        .field(
            FieldSpec::new("isbn", FieldKind::String)
                .label("ISBN")
                .trim()
                .required()
                .rule(Rule::NotBlank),
        )
        .field(
            FieldSpec::new("publicationYear", FieldKind::Integer)
                .label("Publication year")
                .required()
                .rule_with(Rule::Min(1000.0), "Publication year must be valid")
                .rule(Rule::MaxCurrentYear),
        )
        .field(
            FieldSpec::new("genre", FieldKind::String)
                .label("Genre")
                .required()
                .rule(Rule::OneOf(GENRES)),
        )
        .field(
            FieldSpec::new("price", FieldKind::Number)
                .label("Price")
                .required()
                .rule_with(Rule::Min(0.0), "Price cannot be negative"),
        )
        .field(
            FieldSpec::new("description", FieldKind::String)
                .label("Description")
                .trim()
                .required()
                .rule(Rule::MinLength(10)),
        )
        .unique("isbn")
        .with_timestamps()
        .guard(GuardPolicy::Writes)
}
