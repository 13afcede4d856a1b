// interface.rs

use async_trait::async_trait;

use crate::lane::{Lane, LaneError};
use crate::transform::EnqueueTransform;

/// Depth statistics of one paired interface, erased over the item type so a
/// supervisor can poll interfaces carrying different payloads.
#[async_trait]
pub trait StatSource: Send + Sync {
    async fn tx_depth(&self) -> usize;
    async fn rx_depth(&self) -> usize;
}

/// One logical interface: a transmit lane paired with a receive lane.
///
/// The facade owns both lanes and forwards every call to the matching one;
/// the lanes share no state. Its lifecycle is the union of the lanes' — both
/// start on `init`, both are signaled on `close`. Deliberately not `Clone`:
/// an interface copy that shared or forked buffer state would be ambiguous,
/// so shared access goes through `Arc` instead.
pub struct Interface<T, TX, RX>
where
    TX: EnqueueTransform<T>,
    RX: EnqueueTransform<T>,
{
    tx: Lane<T, TX>,
    rx: Lane<T, RX>,
}

impl<T, TX, RX> Interface<T, TX, RX>
where
    T: Send + 'static,
    TX: EnqueueTransform<T>,
    RX: EnqueueTransform<T>,
{
    /// Take ownership of an already-constructed transmit lane and receive
    /// lane. Neither is started until `init`.
    pub fn new(tx: Lane<T, TX>, rx: Lane<T, RX>) -> Self {
        Self { tx, rx }
    }

    /// Start both lanes.
    pub async fn init(&self) {
        self.tx.init().await;
        self.rx.init().await;
    }

    /// Signal both lanes to stop. Best-effort, non-blocking.
    pub fn close(&self) {
        self.tx.close();
        self.rx.close();
    }

    /// Stop both lanes and wait for their workers to terminate.
    pub async fn shutdown(&self) -> Result<(), LaneError> {
        // Signal both before joining either so the lanes wind down together.
        self.close();
        self.tx.shutdown().await?;
        self.rx.shutdown().await?;
        Ok(())
    }

    pub async fn add_to_tx(&self, item: T) {
        self.tx.enqueue(item).await;
    }

    pub async fn add_to_rx(&self, item: T) {
        self.rx.enqueue(item).await;
    }

    pub async fn tx_depth(&self) -> usize {
        self.tx.len().await
    }

    pub async fn rx_depth(&self) -> usize {
        self.rx.len().await
    }
}

#[async_trait]
impl<T, TX, RX> StatSource for Interface<T, TX, RX>
where
    T: Send + 'static,
    TX: EnqueueTransform<T>,
    RX: EnqueueTransform<T>,
{
    async fn tx_depth(&self) -> usize {
        self.tx.len().await
    }

    async fn rx_depth(&self) -> usize {
        self.rx.len().await
    }
}
