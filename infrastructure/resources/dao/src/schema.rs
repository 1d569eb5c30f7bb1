use resource_models::ResourceDefinition;

const DOCUMENTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS documents (
    seq BIGSERIAL NOT NULL,
    id UUID PRIMARY KEY,
    resource TEXT NOT NULL,
    body JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);
CREATE INDEX IF NOT EXISTS documents_resource_seq_idx
    ON documents (resource, seq);";

/// Idempotent DDL for the documents table plus one partial unique index per
/// unique field in `catalog`.
pub fn schema_sql(catalog: &[ResourceDefinition]) -> String {
    let mut sql = DOCUMENTS_TABLE.to_string();

    for definition in catalog {
        for field in &definition.unique {
            sql.push_str(&format!(
                "\nCREATE UNIQUE INDEX IF NOT EXISTS {index}
    ON documents ((body ->> '{field}')) WHERE resource = '{resource}';",
                index = definition.unique_index_name(field),
                resource = definition.name,
            ));
        }
    }

    sql
}
