use std::sync::Arc;

use crate::recommend::Recommender;

/// Shared, read-only state handed to every handler.
#[derive(Debug, Clone)]
pub struct HandlerState {
    pub recommender: Arc<Recommender>,
}

impl HandlerState {
    pub fn new(recommender: Arc<Recommender>) -> Self {
        Self { recommender }
    }
}
