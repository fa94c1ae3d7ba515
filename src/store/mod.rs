mod schema;
mod users;

pub use schema::ensure_schema;
pub use users::ScyllaUserDirectory;
