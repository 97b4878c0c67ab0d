//! An executor for running the UI thread's async work, tick sources included.
use crate::config::TasksConfig;
use crate::error::LapseResult;
use arc_swap::ArcSwap;
use runner::TaskRunner;
use std::future::Future;
use std::sync::{Arc, LazyLock};

/// An abstraction over a task runner.
pub mod runner;

static RUNNER: LazyLock<ArcSwap<TaskRunner>> =
    LazyLock::new(|| ArcSwap::new(Arc::new(TaskRunner::None)));

/// Initializes the task runner.
pub fn init(config: TasksConfig) -> LapseResult<()> {
    #[cfg(feature = "tokio-runner")]
    let runner = TaskRunner::Tokio(runner::tokio_runner::TokioRunner::new(config)?);
    #[cfg(not(feature = "tokio-runner"))]
    let runner = {
        log::warn!("Task runner requested with {:?}, but no runtime feature is enabled", config);
        TaskRunner::None
    };
    RUNNER.store(Arc::new(runner));
    Ok(())
}

/// Returns `true` if a runtime backed task runner is installed.
pub fn is_initialized() -> bool {
    !matches!(**RUNNER.load(), TaskRunner::None)
}

/// Blocks on the given future.
///
/// With the tokio runner, the future runs inside a [LocalSet](tokio::task::LocalSet) on the
/// calling thread, so it may create tick sources and other thread-local tasks.
pub fn block_on<F>(fut: F) -> F::Output
where
    F: Future,
{
    RUNNER.load().block_on(fut)
}

/// Spawns a future on the current thread's local task set.
///
/// # Panics
///
/// Panics if called outside of [block_on] (or another [LocalSet](tokio::task::LocalSet)).
#[cfg(feature = "tokio-runner")]
pub fn spawn_local<F>(fut: F) -> tokio::task::JoinHandle<F::Output>
where
    F: Future + 'static,
    F::Output: 'static,
{
    tokio::task::spawn_local(fut)
}

/// Shuts down the task runner gracefully.
/// This should be called during application shutdown to prevent hanging.
pub fn shutdown() {
    log::debug!("Shutting down task runner...");

    // Take the current runner and replace with None
    let current_runner = RUNNER.swap(Arc::new(TaskRunner::None));

    match Arc::try_unwrap(current_runner) {
        Ok(runner) => runner.shutdown(),
        Err(_) => {
            log::warn!("Could not shutdown task runner - still has active references");
        },
    }
}
