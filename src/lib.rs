//! Bidirectional queue-and-worker data interface layer
//!
//! Each logical interface pairs one transmit lane and one receive lane. A
//! lane is an unbounded FIFO buffer drained by a background worker on a
//! fixed interval; a supervisor owns two interfaces and polls their queue
//! depths on its own interval.

pub mod interface;
pub mod lane;
pub mod supervisor;
pub mod transform;

// Re-export main types for convenience
pub use interface::{Interface, StatSource};
pub use lane::{Lane, LaneConfig, LaneError};
pub use supervisor::{Supervisor, SupervisorConfig};
pub use transform::{EnqueueTransform, ParityAdjust, PassThrough, Sample, SignAdjust};
