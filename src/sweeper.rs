use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::engine::Engine;
use crate::observability;

/// Background task that periodically flips confirmed reservations to
/// completed once their window has passed.
pub async fn run_sweeper(engine: Arc<Engine>, every: Duration) {
    let mut interval = tokio::time::interval(every);
    loop {
        interval.tick().await;
        let now = chrono::Local::now().naive_local();
        let flipped = engine.sweep_completed(now).await;
        if flipped > 0 {
            metrics::counter!(observability::RESERVATIONS_COMPLETED_TOTAL)
                .increment(flipped as u64);
            info!("marked {flipped} reservations completed");
        }
    }
}
