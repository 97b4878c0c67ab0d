//! Repeating tick sources.
//!
//! A [Scheduler] arms a [TickSource]: a repeating callback that keeps firing until the source is
//! cancelled, dropped, or the callback breaks out. Sources run on the thread that armed them,
//! so their callbacks never race with the code that owns the source.
#[cfg(feature = "tokio-runner")]
use crate::error::LapseError;
use crate::error::LapseResult;
use std::fmt;
use std::ops::ControlFlow;
use std::time::Duration;

/// When the first tick of a new source fires.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FirstTick {
    /// Fire once right away, then every period.
    Immediate,
    /// Wait one full period before the first tick.
    AfterPeriod,
}

/// Creates tick sources.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Scheduler {
    /// Spawn a [tokio] interval task on the current [LocalSet](tokio::task::LocalSet).
    #[cfg(feature = "tokio-runner")]
    Tokio,
    /// Arm nothing. The owner of the source drives ticks by hand.
    Manual,
}

#[cfg(feature = "tokio-runner")]
impl Default for Scheduler {
    fn default() -> Self {
        Scheduler::Tokio
    }
}

#[cfg(not(feature = "tokio-runner"))]
impl Default for Scheduler {
    fn default() -> Self {
        Scheduler::Manual
    }
}

impl Scheduler {
    /// Arm a repeating tick source calling `on_tick` once per `period`.
    ///
    /// The source stops when the returned handle is cancelled or dropped, or when `on_tick`
    /// returns [ControlFlow::Break].
    ///
    /// With [Scheduler::Tokio] this fails with [NoRuntime](crate::error::LapseError::NoRuntime)
    /// when no runtime is running on the current thread.
    ///
    /// # Panics
    ///
    /// With [Scheduler::Tokio], panics if `period` is zero or if called inside a runtime but
    /// outside a [LocalSet](tokio::task::LocalSet) (see [tasks::block_on](crate::tasks::block_on)).
    pub fn schedule<F>(&self, period: Duration, first: FirstTick, on_tick: F) -> LapseResult<TickSource>
    where
        F: FnMut() -> ControlFlow<()> + 'static,
    {
        match self {
            #[cfg(feature = "tokio-runner")]
            Scheduler::Tokio => {
                if tokio::runtime::Handle::try_current().is_err() {
                    return Err(LapseError::NoRuntime);
                }
                Ok(TickSource::spawn(period, first, on_tick))
            },
            Scheduler::Manual => {
                drop(on_tick);
                log::trace!("Armed manual tick source ({:?} period)", period);
                Ok(TickSource { task: None })
            },
        }
    }
}

/// An armed tick source. Cancelling is idempotent, and dropping the handle cancels it.
pub struct TickSource {
    #[cfg(feature = "tokio-runner")]
    task: Option<tokio::task::JoinHandle<()>>,
    #[cfg(not(feature = "tokio-runner"))]
    task: Option<std::convert::Infallible>,
}

impl TickSource {
    #[cfg(feature = "tokio-runner")]
    fn spawn<F>(period: Duration, first: FirstTick, mut on_tick: F) -> Self
    where
        F: FnMut() -> ControlFlow<()> + 'static,
    {
        use tokio::time::{interval_at, Instant, MissedTickBehavior};

        let start = match first {
            FirstTick::Immediate => Instant::now(),
            FirstTick::AfterPeriod => Instant::now() + period,
        };
        let mut interval = interval_at(start, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let task = crate::tasks::spawn_local(async move {
            loop {
                interval.tick().await;
                if on_tick().is_break() {
                    log::trace!("Tick source finished");
                    break;
                }
            }
        });

        Self { task: Some(task) }
    }

    /// Returns `true` if this source runs its own timer task that hasn't finished yet.
    ///
    /// Manual sources never do.
    #[cfg(feature = "tokio-runner")]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Returns `true` if this source runs its own timer task that hasn't finished yet.
    ///
    /// Manual sources never do.
    #[cfg(not(feature = "tokio-runner"))]
    pub fn is_running(&self) -> bool {
        false
    }

    /// Stop the source. Calling it again does nothing.
    #[cfg(feature = "tokio-runner")]
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Stop the source. Calling it again does nothing.
    #[cfg(not(feature = "tokio-runner"))]
    pub fn cancel(&mut self) {
        self.task = None;
    }
}

impl Drop for TickSource {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for TickSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickSource")
            .field("running", &self.is_running())
            .finish()
    }
}
