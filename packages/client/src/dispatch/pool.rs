//! Worker runtime selection

use std::future::Future;

use tokio::runtime::{Builder, Handle, Runtime};

use crate::error::{self, Error};

/// Where batch coordinators and request tasks run.
///
/// A client built inside a Tokio runtime shares it. Otherwise it owns a
/// multi-threaded runtime that lives as long as the client and is shut down
/// without waiting when the client is dropped.
#[derive(Debug)]
pub(crate) enum WorkerPool {
    Ambient(Handle),
    Owned(OwnedRuntime),
}

#[derive(Debug)]
pub(crate) struct OwnedRuntime(Option<Runtime>);

impl Drop for OwnedRuntime {
    fn drop(&mut self) {
        if let Some(runtime) = self.0.take() {
            runtime.shutdown_background();
        }
    }
}

impl WorkerPool {
    /// Use the current runtime if there is one, otherwise start one with
    /// `worker_threads` threads.
    pub(crate) fn ambient_or_owned(worker_threads: usize) -> Result<Self, Error> {
        if let Ok(handle) = Handle::try_current() {
            tracing::debug!("Dispatching on the ambient Tokio runtime");
            return Ok(WorkerPool::Ambient(handle));
        }

        let runtime = Builder::new_multi_thread()
            .worker_threads(worker_threads)
            .thread_name("httpsink-worker")
            .enable_all()
            .build()
            .map_err(error::runtime)?;
        tracing::debug!("Started dispatch runtime with {} worker thread(s)", worker_threads);
        Ok(WorkerPool::Owned(OwnedRuntime(Some(runtime))))
    }

    pub(crate) fn is_owned(&self) -> bool {
        matches!(self, WorkerPool::Owned(_))
    }

    pub(crate) fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match self {
            WorkerPool::Ambient(handle) => {
                handle.spawn(future);
            }
            WorkerPool::Owned(OwnedRuntime(Some(runtime))) => {
                runtime.spawn(future);
            }
            // The runtime is only taken in Drop.
            WorkerPool::Owned(OwnedRuntime(None)) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owns_a_runtime_outside_tokio() {
        let pool = WorkerPool::ambient_or_owned(2).expect("pool");
        assert!(pool.is_owned());

        let (tx, rx) = std::sync::mpsc::channel();
        pool.spawn(async move {
            tx.send(42).expect("send");
        });
        assert_eq!(rx.recv().expect("recv"), 42);
    }

    #[tokio::test]
    async fn shares_the_ambient_runtime() {
        let pool = WorkerPool::ambient_or_owned(2).expect("pool");
        assert!(!pool.is_owned());
    }
}
