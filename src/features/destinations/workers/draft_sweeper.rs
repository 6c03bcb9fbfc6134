use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

use crate::features::destinations::services::DraftService;

/// Background worker that closes abandoned add-destination forms
pub struct DraftSweeper {
    drafts: Arc<DraftService>,
    every: Duration,
}

impl DraftSweeper {
    pub fn new(drafts: Arc<DraftService>, every: Duration) -> Self {
        Self { drafts, every }
    }

    /// Run the sweeper in a background loop
    pub async fn run(&self) {
        tracing::info!("Starting draft sweeper (every {:?})", self.every);

        let mut interval = interval(self.every);

        loop {
            interval.tick().await;
            self.drafts.sweep_expired().await;
        }
    }
}
