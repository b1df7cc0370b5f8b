use serde::{Deserialize, Serialize};

/// A rural seller with an optional location and an inventory of products
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Producer {
    pub id: i64,
    pub name: String,
    /// Short display code (e.g., a market-stall abbreviation)
    pub code: String,
    pub address: Option<String>,
    /// Missing coordinates exclude the producer from geographic
    /// filtering but nothing else
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Producer {
    /// Returns `(lat, lon)` when both coordinates are present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// A producer annotated with its computed distance from the query origin
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NearbyProducer {
    #[serde(flatten)]
    pub producer: Producer,
    pub distance_km: f64,
}

/// A producer annotated with its aggregate rating, as ranked by the
/// recommendation engine
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedProducer {
    #[serde(flatten)]
    pub producer: Producer,
    pub mean_rating: f64,
}
