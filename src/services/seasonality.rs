use std::collections::HashSet;

use crate::models::{InventoryEntry, Producer, Product, Season};

/// Selects producers carrying at least one product available in
/// `season`; "year-round" products qualify for every season.
///
/// Unlike the preference filter, one qualifying product suffices.
/// `None` falls back to the season of the current calendar month.
pub fn filter_by_season(
    season: Option<Season>,
    products: &[Product],
    inventory: &[InventoryEntry],
    producers: &[Producer],
) -> Vec<Producer> {
    let season = season.unwrap_or_else(Season::current);

    let in_season: HashSet<i64> = products
        .iter()
        .filter(|p| p.seasonality.available_in(season))
        .map(|p| p.id)
        .collect();

    if in_season.is_empty() {
        return Vec::new();
    }

    let qualifying: HashSet<i64> = inventory
        .iter()
        .filter(|e| in_season.contains(&e.product_id))
        .map(|e| e.producer_id)
        .collect();

    producers
        .iter()
        .filter(|p| qualifying.contains(&p.id))
        .cloned()
        .collect()
}
