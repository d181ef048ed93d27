pub mod repositories;
pub mod schema;
pub mod schema_manager;
pub mod sqlite_connection;
pub mod storage_resolver;
