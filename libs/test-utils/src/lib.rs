pub mod fixtures;
pub mod postgres;
pub mod tokens;

pub use postgres::TestPostgresContainer;
