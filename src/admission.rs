// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Admission Controller
 * Counting semaphore bounding attempts in flight
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Bounds the number of attempts in flight
///
/// This is the engine's sole throughput-limiting mechanism: the candidate
/// source is never rate-limited directly, admission is what provides the
/// backpressure. Reacquiring every permit (`drain`) doubles as the
/// shutdown proof that no attempt is still in flight - it can only
/// complete once every outstanding permit has been released.
pub struct AdmissionController {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl AdmissionController {
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Acquire one permit, suspending cooperatively until one is free
    ///
    /// The permit is released by dropping it, typically at the end of the
    /// detached attempt task that carried it.
    pub async fn admit(&self) -> OwnedSemaphorePermit {
        // The semaphore is never closed, so acquire cannot fail
        self.semaphore
            .clone()
            .acquire_owned()
            .await
            .unwrap_or_else(|_| unreachable!("admission semaphore is never closed"))
    }

    /// Reacquire the full capacity, completing only once every in-flight
    /// attempt has released its permit
    pub async fn drain(&self) {
        let _all = self
            .semaphore
            .acquire_many(self.capacity as u32)
            .await
            .unwrap_or_else(|_| unreachable!("admission semaphore is never closed"));
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits not currently held by in-flight attempts
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}
