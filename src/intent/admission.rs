use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::intent::{
    error::{IntentError, internal_error, overloaded},
    types::AdmissionPolicy,
};

#[derive(Clone)]
pub struct Admission {
    permits: Option<Arc<Semaphore>>,
    max_waiting: Option<usize>,
    waiting: Arc<AtomicUsize>,
}

#[derive(Debug)]
pub struct AdmissionPermit {
    _permit: Option<OwnedSemaphorePermit>,
}

struct WaitingSlot<'a>(&'a AtomicUsize);

impl Drop for WaitingSlot<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Admission {
    pub fn new(policy: &AdmissionPolicy) -> Self {
        Self {
            permits: policy
                .max_in_flight
                .map(|limit| Arc::new(Semaphore::new(limit.max(1)))),
            max_waiting: policy.max_waiting,
            waiting: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(&AdmissionPolicy::unlimited())
    }

    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }

    pub fn available(&self) -> Option<usize> {
        self.permits
            .as_ref()
            .map(|semaphore| semaphore.available_permits())
    }

    pub async fn acquire(&self) -> Result<AdmissionPermit, IntentError> {
        let Some(semaphore) = &self.permits else {
            return Ok(AdmissionPermit { _permit: None });
        };

        if let Ok(permit) = Arc::clone(semaphore).try_acquire_owned() {
            return Ok(AdmissionPermit {
                _permit: Some(permit),
            });
        }

        let queued = self.waiting.fetch_add(1, Ordering::SeqCst);
        let _slot = WaitingSlot(&self.waiting);
        if let Some(max_waiting) = self.max_waiting {
            if queued >= max_waiting {
                tracing::warn!(
                    target: "intent",
                    waiting = queued,
                    max_waiting,
                    "admission_queue_full"
                );
                return Err(overloaded("service is at capacity, retry later"));
            }
        }

        let permit = Arc::clone(semaphore)
            .acquire_owned()
            .await
            .map_err(|_| internal_error("admission gate closed"))?;
        Ok(AdmissionPermit {
            _permit: Some(permit),
        })
    }
}
