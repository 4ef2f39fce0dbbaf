use std::{future::Future, time::Duration};

use tokio::{runtime::Handle, task::JoinHandle};
use tracing::trace;

/// Runs only the last of a burst of calls, once `delay` has passed without a
/// newer one. A newer call aborts the pending task even if it already started
/// its request.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    runtime: Handle,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration, runtime: Handle) -> Self {
        Self {
            delay,
            runtime,
            pending: None,
        }
    }

    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            if !pending.is_finished() {
                trace!("superseding pending debounced call");
            }
            pending.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
