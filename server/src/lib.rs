pub mod app;
pub mod config;
pub mod storage;

pub use app::{ApiDoc, build_router};
pub use config::{ArchivistConfig, ConfigError};
pub use storage::Storage;
