use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderStatus, OrderSummary};
use crate::domain::ports::{LogForwarder, OrderRepository};

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(60);

/// Periodic batch step that promotes `unprocessed` orders to `processed`
/// and forwards a summary per order to the log sink.
///
/// One instance drives one store and one forwarder. Ticks never overlap: a
/// tick that fires while the previous one is still running is skipped.
pub struct StatusPipeline<R, F> {
    repo: Arc<R>,
    forwarder: Arc<F>,
    tick_guard: tokio::sync::Mutex<()>,
}

impl<R: OrderRepository, F: LogForwarder> StatusPipeline<R, F> {
    pub fn new(repo: Arc<R>, forwarder: Arc<F>) -> Self {
        Self {
            repo,
            forwarder,
            tick_guard: tokio::sync::Mutex::new(()),
        }
    }

    /// Run the pipeline on a fixed period until the task is dropped.
    /// The first tick fires immediately.
    pub fn spawn(self: Arc<Self>, period: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                self.run_tick().await;
            }
        })
    }

    /// One pass over the unprocessed orders. A fetch failure aborts the
    /// whole tick; per-order failures are contained to that order.
    pub async fn run_tick(&self) {
        let Ok(_guard) = self.tick_guard.try_lock() else {
            log::warn!("Previous order processing tick still running, skipping this one");
            return;
        };

        log::info!("Starting scheduled order processing task");

        let unprocessed = match self.fetch_unprocessed().await {
            Ok(orders) => orders,
            Err(e) => {
                log::error!("Error during scheduled order processing: {e}");
                return;
            }
        };

        if unprocessed.is_empty() {
            log::info!("No unprocessed orders found");
            return;
        }

        log::info!("Found {} unprocessed orders", unprocessed.len());

        for mut order in unprocessed {
            order.status = OrderStatus::Processed;
            if let Err(e) = self.persist(order.clone()).await {
                log::error!("Failed to persist order {}: {e}", order.id);
                continue;
            }
            log::info!("Updated order {} to processed status", order.id);

            let summary = OrderSummary::from_order(&order);
            if let Err(e) = self.forwarder.forward(&summary).await {
                log::error!("Failed to log order {} to log service: {e}", order.id);
            }
        }

        log::info!("Completed scheduled order processing task");
    }

    async fn fetch_unprocessed(&self) -> Result<Vec<Order>, DomainError> {
        let repo = Arc::clone(&self.repo);
        tokio::task::spawn_blocking(move || repo.find_by_status(OrderStatus::Unprocessed))
            .await
            .map_err(|e| DomainError::Persistence(e.to_string()))?
    }

    async fn persist(&self, order: Order) -> Result<Order, DomainError> {
        let repo = Arc::clone(&self.repo);
        tokio::task::spawn_blocking(move || repo.update(&order))
            .await
            .map_err(|e| DomainError::Persistence(e.to_string()))?
    }
}
