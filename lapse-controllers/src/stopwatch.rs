use crate::format::format_elapsed;
use crate::state::{Controls, RunState};
use lapse_core::config::{StopwatchConfig, DEFAULT_TICK_PERIOD};
use lapse_core::error::LapseResult;
use lapse_core::signal::map::MapSignal;
use lapse_core::signal::read::ReadSignal;
use lapse_core::signal::state::StateSignal;
use lapse_core::signal::Signal;
use lapse_core::timer::{FirstTick, Scheduler, TickSource};
use std::cell::{Cell, RefCell};
use std::ops::ControlFlow;
use std::rc::{Rc, Weak};
use std::time::Duration;

/// A stopwatch counting whole seconds, driven by a repeating tick source.
///
/// | state   | start                  | pause_or_resume            | reset   |
/// |---------|------------------------|----------------------------|---------|
/// | Stopped | Running, ticks at once | -                          | Stopped |
/// | Running | -                      | Paused                     | Stopped |
/// | Paused  | -                      | Running, ticks in 1 period | Stopped |
///
/// Intents marked `-` are ignored. Elapsed time only ever moves while running, and at most one
/// tick source is armed at any time. Dropping the controller cancels it.
///
/// The controller is bound to the thread it was created on. With [Scheduler::Tokio] it has to
/// live inside a [LocalSet](tokio::task::LocalSet), e.g. within
/// [tasks::block_on](lapse_core::tasks::block_on).
pub struct StopwatchController {
    inner: Rc<Inner>,
}

struct Inner {
    elapsed: StateSignal<u64>,
    run_state: StateSignal<RunState>,
    tick_source: RefCell<Option<TickSource>>,
    // Bumped whenever a source is armed or disarmed, so ticks from a replaced source are dropped.
    generation: Cell<u64>,
    scheduler: Scheduler,
    period: Duration,
}

impl StopwatchController {
    /// Creates a stopped stopwatch.
    ///
    /// A zero tick period is replaced by the default one.
    pub fn new(scheduler: Scheduler, config: &StopwatchConfig) -> Self {
        let period = match config.validate() {
            Ok(()) => config.tick_period,
            Err(err) => {
                log::warn!("{err}, using {:?}", DEFAULT_TICK_PERIOD);
                DEFAULT_TICK_PERIOD
            },
        };

        Self {
            inner: Rc::new(Inner {
                elapsed: StateSignal::new(0),
                run_state: StateSignal::new(RunState::Stopped),
                tick_source: RefCell::new(None),
                generation: Cell::new(0),
                scheduler,
                period,
            }),
        }
    }

    /// Start counting from a stopped state. The first tick fires right away.
    ///
    /// If no tick source can be armed the error is logged and the stopwatch stays stopped.
    pub fn start(&self) {
        let state = *self.inner.run_state.get();
        if !state.is_stopped() {
            log::trace!("Ignoring start while {:?}", state);
            return;
        }

        if let Err(err) = self.arm(FirstTick::Immediate) {
            log::error!("Failed to start stopwatch: {}", err);
            return;
        }
        self.inner.run_state.set(RunState::Running);
        log::debug!("Stopwatch started");
    }

    /// Pause while running, resume while paused.
    ///
    /// Resuming doesn't tick immediately; the next tick comes one period later. If no tick
    /// source can be armed the stopwatch stays paused.
    pub fn pause_or_resume(&self) {
        let state = *self.inner.run_state.get();
        match state {
            RunState::Running => {
                self.inner.disarm();
                self.inner.run_state.set(RunState::Paused);
                log::debug!("Stopwatch paused at {}", format_elapsed(*self.inner.elapsed.get()));
            },
            RunState::Paused => {
                if let Err(err) = self.arm(FirstTick::AfterPeriod) {
                    log::error!("Failed to resume stopwatch: {}", err);
                    return;
                }
                self.inner.run_state.set(RunState::Running);
                log::debug!("Stopwatch resumed");
            },
            RunState::Stopped => log::trace!("Ignoring pause/resume while stopped"),
        }
    }

    /// Stop, cancel the tick source and go back to zero. Works in any state.
    pub fn reset(&self) {
        self.inner.disarm();
        self.inner.elapsed.set_if_changed(0);
        self.inner.run_state.set_if_changed(RunState::Stopped);
        log::debug!("Stopwatch reset");
    }

    /// Advance by one tick. Ignored unless running.
    ///
    /// The tick source calls this on its own. With [Scheduler::Manual] it is the only way time
    /// moves.
    pub fn tick(&self) {
        self.inner.tick();
    }

    /// Elapsed whole seconds.
    pub fn elapsed(&self) -> ReadSignal<u64> {
        self.inner.elapsed.read_only()
    }

    /// The current [RunState].
    pub fn run_state(&self) -> ReadSignal<RunState> {
        self.inner.run_state.read_only()
    }

    /// Elapsed time as `HH:MM:SS`.
    pub fn formatted_time(&self) -> MapSignal<u64, String> {
        self.inner.elapsed.map(|seconds| format_elapsed(*seconds))
    }

    /// Which controls to show for the current state.
    pub fn controls(&self) -> MapSignal<RunState, Controls> {
        self.inner.run_state.map(|state| state.controls())
    }

    /// Returns `true` while a tick source is armed.
    pub fn is_ticking(&self) -> bool {
        self.inner.tick_source.borrow().is_some()
    }

    /// The configured tick period.
    pub fn period(&self) -> Duration {
        self.inner.period
    }

    fn arm(&self, first: FirstTick) -> LapseResult<()> {
        let generation = self.inner.next_generation();
        let weak: Weak<Inner> = Rc::downgrade(&self.inner);

        let source = self.inner.scheduler.schedule(self.inner.period, first, move || {
            let Some(inner) = weak.upgrade() else {
                return ControlFlow::Break(());
            };
            if inner.generation.get() != generation {
                return ControlFlow::Break(());
            }
            inner.tick();
            ControlFlow::Continue(())
        })?;

        // Replacing drops, and so cancels, any previous source.
        let previous = self.inner.tick_source.borrow_mut().replace(source);
        drop(previous);
        Ok(())
    }
}

impl Inner {
    fn next_generation(&self) -> u64 {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);
        generation
    }

    fn disarm(&self) {
        self.next_generation();
        let previous = self.tick_source.borrow_mut().take();
        drop(previous);
    }

    fn tick(&self) {
        if !self.run_state.get().is_running() {
            log::trace!("Ignoring tick while {:?}", *self.run_state.get());
            return;
        }
        self.elapsed.mutate(|seconds| *seconds = seconds.saturating_add(1));
    }
}

impl Default for StopwatchController {
    fn default() -> Self {
        Self::new(Scheduler::default(), &StopwatchConfig::default())
    }
}

impl Drop for StopwatchController {
    fn drop(&mut self) {
        self.inner.disarm();
        log::debug!("Stopwatch torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manual() -> StopwatchController {
        StopwatchController::new(Scheduler::Manual, &StopwatchConfig::default())
    }

    fn record<T: Clone + 'static>(
        signal: &impl Signal<T>,
    ) -> (Rc<RefCell<Vec<T>>>, lapse_core::signal::subscription::Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let sub = signal.subscribe(move |value: &T| sink.borrow_mut().push(value.clone()));
        (seen, sub)
    }

    #[test]
    fn test_initial_state() {
        let stopwatch = manual();
        assert_eq!(*stopwatch.elapsed().get(), 0);
        assert_eq!(*stopwatch.run_state().get(), RunState::Stopped);
        assert_eq!(*stopwatch.formatted_time().get(), "00:00:00");
        assert!(!stopwatch.is_ticking());
    }

    #[test]
    fn test_start_then_n_ticks() {
        let stopwatch = manual();
        stopwatch.start();
        assert!(stopwatch.is_ticking());

        for _ in 0..61 {
            stopwatch.tick();
        }

        assert_eq!(*stopwatch.elapsed().get(), 61);
        assert_eq!(*stopwatch.formatted_time().get(), "00:01:01");
    }

    #[test]
    fn test_ticks_ignored_unless_running() {
        let stopwatch = manual();
        stopwatch.tick();
        assert_eq!(*stopwatch.elapsed().get(), 0);

        stopwatch.start();
        stopwatch.tick();
        stopwatch.tick();
        stopwatch.pause_or_resume();
        stopwatch.tick();
        stopwatch.tick();
        assert_eq!(*stopwatch.elapsed().get(), 2);
        assert!(!stopwatch.is_ticking());

        stopwatch.pause_or_resume();
        stopwatch.tick();
        assert_eq!(*stopwatch.elapsed().get(), 3);
    }

    #[test]
    fn test_pause_or_resume_toggles() {
        let stopwatch = manual();
        let (states, _sub) = record(&stopwatch.run_state());

        stopwatch.start();
        stopwatch.pause_or_resume();
        stopwatch.pause_or_resume();

        assert_eq!(
            *states.borrow(),
            vec![RunState::Stopped, RunState::Running, RunState::Paused, RunState::Running]
        );
    }

    #[test]
    fn test_reset_from_every_state() {
        let stopwatch = manual();
        stopwatch.reset();
        assert_eq!(*stopwatch.run_state().get(), RunState::Stopped);

        stopwatch.start();
        stopwatch.tick();
        stopwatch.reset();
        assert_eq!(*stopwatch.elapsed().get(), 0);
        assert_eq!(*stopwatch.run_state().get(), RunState::Stopped);
        assert!(!stopwatch.is_ticking());

        stopwatch.start();
        stopwatch.tick();
        stopwatch.pause_or_resume();
        stopwatch.reset();
        assert_eq!(*stopwatch.elapsed().get(), 0);
        assert_eq!(*stopwatch.run_state().get(), RunState::Stopped);

        stopwatch.tick();
        assert_eq!(*stopwatch.elapsed().get(), 0);
    }

    #[test]
    fn test_invalid_intents_are_noops() {
        let stopwatch = manual();
        let (states, _sub) = record(&stopwatch.run_state());

        stopwatch.pause_or_resume();
        stopwatch.start();
        stopwatch.tick();
        stopwatch.start();
        stopwatch.pause_or_resume();
        stopwatch.start();

        assert_eq!(*stopwatch.run_state().get(), RunState::Paused);
        assert_eq!(*stopwatch.elapsed().get(), 1);
        assert_eq!(
            *states.borrow(),
            vec![RunState::Stopped, RunState::Running, RunState::Paused]
        );
    }

    #[test]
    fn test_controls_follow_state() {
        let stopwatch = manual();
        let controls = stopwatch.controls();
        assert!(controls.get().start_visible);

        stopwatch.start();
        assert_eq!(controls.get().pause_resume_label, Some("Pause"));

        stopwatch.pause_or_resume();
        assert_eq!(controls.get().pause_resume_label, Some("Resume"));
        assert!(controls.get().reset_visible);

        stopwatch.reset();
        assert!(controls.get().start_visible);
        assert!(!controls.get().pause_resume_visible);
    }

    #[test]
    fn test_formatted_time_published_per_tick() {
        let stopwatch = manual();
        let (seen, _sub) = record(&stopwatch.formatted_time());

        stopwatch.start();
        stopwatch.tick();
        stopwatch.tick();
        stopwatch.reset();

        assert_eq!(*seen.borrow(), vec!["00:00:00", "00:00:01", "00:00:02", "00:00:00"]);
    }

    #[test]
    fn test_reset_from_listener_is_safe() {
        let stopwatch = Rc::new(manual());
        let _sub = {
            let weak = Rc::downgrade(&stopwatch);
            stopwatch.elapsed().subscribe(move |seconds| {
                if *seconds == 3 {
                    if let Some(stopwatch) = weak.upgrade() {
                        stopwatch.reset();
                    }
                }
            })
        };

        stopwatch.start();
        for _ in 0..5 {
            stopwatch.tick();
        }

        assert_eq!(*stopwatch.elapsed().get(), 0);
        assert_eq!(*stopwatch.run_state().get(), RunState::Stopped);
        assert!(!stopwatch.is_ticking());
    }

    #[cfg(feature = "tokio-runner")]
    #[test]
    fn test_start_without_runtime_stays_stopped() {
        let stopwatch = StopwatchController::default();
        let (states, _sub) = record(&stopwatch.run_state());

        stopwatch.start();
        stopwatch.pause_or_resume();
        stopwatch.tick();

        assert_eq!(*stopwatch.run_state().get(), RunState::Stopped);
        assert_eq!(*stopwatch.elapsed().get(), 0);
        assert!(!stopwatch.is_ticking());
        assert_eq!(*states.borrow(), vec![RunState::Stopped]);

        stopwatch.reset();
        assert_eq!(*stopwatch.run_state().get(), RunState::Stopped);
    }

    #[test]
    fn test_zero_period_falls_back_to_default() {
        let stopwatch = StopwatchController::new(
            Scheduler::Manual,
            &StopwatchConfig {
                tick_period: Duration::ZERO,
            },
        );
        assert_eq!(stopwatch.period(), DEFAULT_TICK_PERIOD);
    }
}
