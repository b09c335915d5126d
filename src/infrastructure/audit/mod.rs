mod in_memory;
mod postgres;

pub use in_memory::InMemoryAuditSink;
pub use postgres::PostgresAuditSink;
