//! Periodic re-check task

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::debug;

/// Run `tick` every `period`, starting one period from now.
///
/// Each tick is awaited before the next one is scheduled, so ticks never overlap.
/// Ticks missed while one is running are skipped rather than bunched up.
/// The task runs until its handle is aborted.
pub fn spawn_periodic<F, Fut>(period: Duration, mut tick: F) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            debug!("Periodic check tick");
            tick().await;
        }
    })
}
