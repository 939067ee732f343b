use std::sync::Arc;
use tatra_core::{BookingRepository, PayloadValidator};
use tatra_store::app_config::Config;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BookingRepository>,
    pub validator: Arc<PayloadValidator>,
    /// Path the routes are nested under; empty or `/` mounts them at the root
    pub api_prefix: String,
}

impl AppState {
    pub fn new(store: Arc<dyn BookingRepository>, config: &Config) -> Self {
        Self {
            store,
            validator: Arc::new(PayloadValidator::new(
                config.booking.min_lead_days,
                config.booking.max_participants,
            )),
            api_prefix: config.server.api_prefix.clone(),
        }
    }
}
