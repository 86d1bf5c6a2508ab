use crate::catalog::PricingCatalog;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Handle to a running background refresh task.
///
/// The task stops when `shutdown` is called or the handle is dropped; the
/// catalog itself stays usable either way.
pub struct RefreshHandle {
    task: JoinHandle<()>,
}

impl RefreshHandle {
    pub fn shutdown(self) {
        self.task.abort();
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl PricingCatalog {
    /// Spawns a task that polls the pricing source every `interval` and
    /// reloads when its modification time advances.
    ///
    /// Refresh failures are logged and retried on the next tick; the prior
    /// rule set stays active throughout. Stale-but-valid beats no data.
    pub fn spawn_refresh(catalog: Arc<Self>, interval: Duration) -> RefreshHandle {
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick of a tokio interval fires immediately.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if !catalog.source_changed() {
                    continue;
                }
                tracing::info!(
                    source = %catalog.source().display(),
                    "pricing source changed, reloading"
                );
                if let Err(err) = catalog.reload().await {
                    tracing::warn!(error = %err, "pricing reload failed, keeping prior rules");
                }
            }
        });

        RefreshHandle { task }
    }
}
