//! # Workers
//! src/workers/mod.rs
//!
//! Cola acotada de conexiones y pool fijo de threads que la consume.
//!
//! ```text
//! Acceptor ──push──▶ [BoundedQueue] ──pop──▶ worker-0 .. worker-N
//! ```

pub mod pool;
pub mod queue;

pub use pool::WorkerPool;
pub use queue::BoundedQueue;
