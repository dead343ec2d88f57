mod migrate;
mod results;
mod runs;
mod store;

pub use migrate::run_migrations;
pub use store::PostgresStore;
