use crate::config::TasksConfig;
use crate::error::{LapseError, LapseResult};
use std::future::Future;
use tokio::runtime::{Builder, Runtime};
use tokio::task::LocalSet;

/// A task runner using [tokio] as runtime.
#[derive(Debug)]
pub struct TokioRunner {
    rt: Runtime,
}

impl TokioRunner {
    /// Initializes the tokio task runner with the given config.
    pub(crate) fn new(config: TasksConfig) -> LapseResult<Self> {
        let mut builder = if config.workers.get() == 1 {
            Builder::new_current_thread()
        } else {
            let mut builder = Builder::new_multi_thread();
            builder.worker_threads(config.workers.get());
            builder
        };

        let rt = builder
            .enable_all()
            .thread_stack_size(config.stack_size)
            .build()
            .map_err(|source| LapseError::RuntimeBuild { source })?;

        log::debug!("Started tokio task runner with {} worker(s)", config.workers);
        Ok(Self { rt })
    }

    /// Blocks on the given future inside a fresh [LocalSet].
    pub(crate) fn block_on<F>(&self, fut: F) -> F::Output
    where
        F: Future,
    {
        let local = LocalSet::new();
        self.rt.block_on(local.run_until(fut))
    }

    /// Stops the runtime in the background.
    pub(crate) fn shutdown(self) {
        self.rt.shutdown_background();
    }
}
