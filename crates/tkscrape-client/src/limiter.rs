//! Counting gate bounding the number of in-flight profile requests.
//!
//! Backed by a tokio [`Semaphore`], which admits waiters in FIFO order. A
//! permit is released when it is dropped, so a holder that errors or panics
//! still frees its slot.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

/// Shared limiter admitting at most `capacity` concurrent holders.
///
/// Cloning is cheap; clones share the same gate.
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl ConcurrencyLimiter {
    /// Creates a limiter. A `capacity` of zero is treated as one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots free right now.
    #[must_use]
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Waits for a slot. The slot is held until the permit is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError`] only if the semaphore was closed, which this
    /// type never does.
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit, AcquireError> {
        Arc::clone(&self.semaphore).acquire_owned().await
    }

    /// Runs `fut` while holding a slot.
    ///
    /// # Errors
    ///
    /// See [`ConcurrencyLimiter::acquire`].
    pub async fn run<F, T>(&self, fut: F) -> Result<T, AcquireError>
    where
        F: Future<Output = T>,
    {
        let _permit = self.acquire().await?;
        Ok(fut.await)
    }
}
