mod memory;
mod postgres;

pub use memory::MemoryAccountStore;
pub use postgres::{ACCOUNTS_SCHEMA, PgAccountStore};
