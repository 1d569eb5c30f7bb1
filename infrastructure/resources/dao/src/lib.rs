mod memory;
mod postgres;
mod schema;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;
pub use schema::schema_sql;
