mod producer;
mod product;
mod rating;

pub use producer::{NearbyProducer, Producer, RankedProducer};
pub use product::{InventoryEntry, Product, Season};
pub use rating::{Rating, User, MAX_SCORE, MIN_SCORE};
