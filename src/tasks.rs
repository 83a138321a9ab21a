use std::future::Future;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{error, trace};

use crate::journal::JournalError;

/// One background request whose result the frame loop picks up later.
///
/// The future runs on the tokio runtime; its output comes back through a
/// channel that `poll` checks without blocking, once per frame.
pub struct Pending<T> {
    receiver: Option<mpsc::Receiver<T>>,
}

impl<T> Default for Pending<T> {
    fn default() -> Self {
        Self { receiver: None }
    }
}

impl<T: Send + 'static> Pending<T> {
    pub fn is_running(&self) -> bool {
        self.receiver.is_some()
    }

    /// Spawn `future` on `runtime`. Replaces any previous receiver.
    pub fn start<F>(&mut self, runtime: &Handle, future: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel(1);
        self.receiver = Some(receiver);

        runtime.spawn(async move {
            let result = future.await;
            if sender.send(result).await.is_err() {
                error!("Result receiver dropped before the request finished");
            }
        });
    }

    /// Take the result if it has arrived.
    ///
    /// `Some(Err(TaskLost))` when the task ended without sending, so callers
    /// always get to settle whatever they started.
    pub fn poll(&mut self) -> Option<Result<T, JournalError>> {
        let receiver = self.receiver.as_mut()?;

        match receiver.try_recv() {
            Ok(result) => {
                trace!("Received result from background task");
                self.receiver = None;
                Some(Ok(result))
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                trace!("Channel disconnected, settling as lost");
                self.receiver = None;
                Some(Err(JournalError::TaskLost))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn poll_until_done<T: Send + 'static>(pending: &mut Pending<T>) -> Result<T, JournalError> {
        for _ in 0..200 {
            if let Some(result) = pending.poll() {
                return result;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("background task never finished");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn delivers_result_once() {
        let mut pending = Pending::default();
        assert!(pending.poll().is_none());

        pending.start(&Handle::current(), async { 42 });
        assert!(pending.is_running());

        assert_eq!(poll_until_done(&mut pending).await.unwrap(), 42);
        assert!(!pending.is_running());
        assert!(pending.poll().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn panicking_task_settles_as_lost() {
        let mut pending: Pending<u32> = Pending::default();
        pending.start(&Handle::current(), async {
            let missing: Option<u32> = None;
            missing.expect("boom")
        });

        let result = poll_until_done(&mut pending).await;
        assert!(matches!(result, Err(JournalError::TaskLost)));
    }
}
