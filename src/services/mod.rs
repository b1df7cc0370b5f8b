pub mod geo;
pub mod matrix;
pub mod neighbors;
pub mod preference;
pub mod recommend;
pub mod seasonality;

pub use matrix::RatingMatrix;
pub use neighbors::{Neighbor, NeighborModel};
pub use recommend::{recommend, ModelSnapshot, RecommendParams};
