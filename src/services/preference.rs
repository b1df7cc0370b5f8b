use std::collections::{HashMap, HashSet};

use crate::error::{AppError, AppResult};
use crate::models::{InventoryEntry, Producer, Product};

/// Selects producers stocking every requested product.
///
/// Requested names are matched case-insensitively against the catalog;
/// names that resolve to no product are dropped silently. Matching is
/// conjunctive: a producer qualifies only when its inventory covers the
/// whole resolved set. An empty request is a caller error.
pub fn filter_by_products(
    requested: &[String],
    products: &[Product],
    inventory: &[InventoryEntry],
    producers: &[Producer],
) -> AppResult<Vec<Producer>> {
    if requested.is_empty() {
        return Err(AppError::InvalidInput(
            "at least one product must be requested".to_string(),
        ));
    }

    let catalog: HashMap<String, i64> = products
        .iter()
        .map(|p| (p.name.trim().to_uppercase(), p.id))
        .collect();

    let wanted: HashSet<i64> = requested
        .iter()
        .filter_map(|name| catalog.get(&name.trim().to_uppercase()).copied())
        .collect();

    // None of the requested names exist in the catalog
    if wanted.is_empty() {
        return Ok(Vec::new());
    }

    let mut stocked: HashMap<i64, HashSet<i64>> = HashMap::new();
    for entry in inventory {
        stocked
            .entry(entry.producer_id)
            .or_default()
            .insert(entry.product_id);
    }

    Ok(producers
        .iter()
        .filter(|p| stocked.get(&p.id).is_some_and(|s| wanted.is_subset(s)))
        .cloned()
        .collect())
}
