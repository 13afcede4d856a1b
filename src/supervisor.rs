// supervisor.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use tokio::sync::Notify;
use tokio::time::sleep;

use crate::interface::StatSource;

/// Configuration for the supervisor's polling loop
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Wall-clock pause between statistics polls
    pub poll_interval: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// Owns two interfaces and polls their queue depths on a fixed interval.
///
/// The poll is observability only; the supervisor never acts on the values
/// and never reaches into interface internals. `run` executes on the calling
/// task and blocks it until `stop` is called from elsewhere.
pub struct Supervisor {
    a: Arc<dyn StatSource>,
    b: Arc<dyn StatSource>,
    running: AtomicBool,
    stop: Notify,
    config: SupervisorConfig,
}

impl Supervisor {
    /// Take the two interfaces to watch. Both are expected to be initialized
    /// already.
    pub fn new(a: Arc<dyn StatSource>, b: Arc<dyn StatSource>, config: SupervisorConfig) -> Self {
        Self {
            a,
            b,
            running: AtomicBool::new(false),
            stop: Notify::new(),
            config,
        }
    }

    /// Poll both interfaces until `stop` is called. Returns immediately if
    /// the loop is already running on another task.
    pub async fn run(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }
        info!(
            "supervisor started, poll interval {:?}",
            self.config.poll_interval
        );

        while self.running.load(Ordering::Relaxed) {
            let a_rx = self.a.rx_depth().await;
            let a_tx = self.a.tx_depth().await;
            let b_rx = self.b.rx_depth().await;
            let b_tx = self.b.tx_depth().await;
            debug!(
                "stats: a.rx={} a.tx={} b.rx={} b.tx={}",
                a_rx, a_tx, b_rx, b_tx
            );

            tokio::select! {
                _ = sleep(self.config.poll_interval) => {}
                _ = self.stop.notified() => {}
            }
        }

        info!("supervisor stopped");
    }

    /// Request `run` to return. Non-blocking; the loop observes the signal
    /// at its next suspension point, which the notify wakes immediately.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.stop.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::Interface;
    use crate::lane::{Lane, LaneConfig};
    use crate::transform::PassThrough;
    use tokio::time::timeout;

    fn plain_interface() -> Arc<Interface<i32, PassThrough, PassThrough>> {
        Arc::new(Interface::new(
            Lane::new(PassThrough::new(), LaneConfig::default()),
            Lane::new(PassThrough::new(), LaneConfig::default()),
        ))
    }

    #[tokio::test]
    async fn test_run_returns_after_stop() {
        let supervisor = Arc::new(Supervisor::new(
            plain_interface(),
            plain_interface(),
            SupervisorConfig {
                poll_interval: Duration::from_millis(50),
            },
        ));

        let runner = {
            let supervisor = supervisor.clone();
            tokio::spawn(async move { supervisor.run().await })
        };

        // Let it complete a few polls, then cancel
        sleep(Duration::from_millis(120)).await;
        supervisor.stop();

        timeout(Duration::from_millis(200), runner)
            .await
            .expect("supervisor did not stop in time")
            .unwrap();
    }

    #[tokio::test]
    async fn test_second_run_call_returns_immediately() {
        let supervisor = Arc::new(Supervisor::new(
            plain_interface(),
            plain_interface(),
            SupervisorConfig {
                poll_interval: Duration::from_millis(50),
            },
        ));

        let runner = {
            let supervisor = supervisor.clone();
            tokio::spawn(async move { supervisor.run().await })
        };
        sleep(Duration::from_millis(30)).await;

        // Already running on the spawned task, so this must not block
        timeout(Duration::from_millis(100), supervisor.run())
            .await
            .expect("second run() call blocked");

        supervisor.stop();
        let _ = runner.await;
    }

    #[tokio::test]
    async fn test_polling_leaves_depths_untouched() {
        let a = plain_interface();
        let b = plain_interface();
        a.add_to_tx(1).await;
        a.add_to_rx(2).await;
        b.add_to_rx(3).await;

        let supervisor = Arc::new(Supervisor::new(
            a.clone(),
            b.clone(),
            SupervisorConfig {
                poll_interval: Duration::from_millis(20),
            },
        ));
        let runner = {
            let supervisor = supervisor.clone();
            tokio::spawn(async move { supervisor.run().await })
        };

        sleep(Duration::from_millis(100)).await;
        supervisor.stop();
        let _ = runner.await;

        // Lanes were never initialized, so the supervisor's polling is the
        // only thing that touched them
        assert_eq!(a.tx_depth().await, 1);
        assert_eq!(a.rx_depth().await, 1);
        assert_eq!(b.rx_depth().await, 1);
        assert_eq!(b.tx_depth().await, 0);
    }
}
