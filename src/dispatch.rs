use std::future::Future;
use std::sync::Arc;
use tokio::sync::{oneshot, Semaphore};
use tracing::debug;

/// Returned by [`WorkHandle::wait`] when the worker went away before
/// producing a result (runtime shutdown mid-flight).
#[derive(Debug, thiserror::Error)]
#[error("worker abandoned the unit of work before producing a result")]
pub struct WorkLost;

/// Handle for one submitted unit of work. Awaiting it blocks the caller
/// until the result is available; dropping it abandons the wait but lets
/// the work run to completion.
pub struct WorkHandle<T> {
    rx: oneshot::Receiver<T>,
}

impl<T> WorkHandle<T> {
    pub async fn wait(self) -> Result<T, WorkLost> {
        self.rx.await.map_err(|_| WorkLost)
    }
}

/// Bounded in-process worker queue.
///
/// Each submitted unit of work runs on its own tokio task; a semaphore
/// caps how many run at once, and work submitted past the cap queues on
/// permit acquisition in submission order. Units of work are independent:
/// the queue imposes no ordering between their results.
pub struct WorkQueue {
    permits: Arc<Semaphore>,
}

impl WorkQueue {
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_in_flight)),
        }
    }

    /// Submit a unit of work and get a handle for its result.
    pub fn submit<Fut, T>(&self, work: Fut) -> WorkHandle<T>
    where
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let permits = self.permits.clone();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            // acquire fails only if the semaphore is closed, which never
            // happens here; dropping tx surfaces WorkLost to the caller
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };

            let result = work.await;
            if tx.send(result).is_err() {
                debug!("Caller abandoned a completed unit of work");
            }
        });

        WorkHandle { rx }
    }
}
