mod memory;
mod postgres;
mod store;

pub use memory::MemStore;
pub use postgres::{create_pool, PgStore};
pub use store::{NewRating, Store};
