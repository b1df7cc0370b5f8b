use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::error::{AppError, AppResult};
use crate::services::{ModelSnapshot, NeighborModel, RatingMatrix};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<Config>,
    /// Last fitted model (or cold-start matrix), reused between
    /// recommendation calls and cleared whenever a rating is appended
    model_cache: Arc<RwLock<Option<ModelSnapshot>>>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
            model_cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the cached matrix+model pair, fitting on demand from a
    /// fresh rating snapshot when the cache is empty. An unfittable
    /// matrix is a normal branch here (`ColdStart`), not a failure.
    pub async fn model_snapshot(&self) -> AppResult<ModelSnapshot> {
        if let Some(snapshot) = self.model_cache.read().await.clone() {
            return Ok(snapshot);
        }

        let ratings = self.store.list_ratings().await?;
        let matrix = RatingMatrix::build(&ratings);
        let snapshot = match NeighborModel::fit(matrix.clone()) {
            Ok(model) => ModelSnapshot::Fitted(model),
            Err(AppError::ModelUnavailable(reason)) => {
                tracing::info!(%reason, "no neighbor model for this rating set");
                ModelSnapshot::ColdStart(matrix)
            }
            Err(e) => return Err(e),
        };

        *self.model_cache.write().await = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// Drops the cached model; the next recommendation call refits
    pub async fn invalidate_model(&self) {
        *self.model_cache.write().await = None;
    }
}
