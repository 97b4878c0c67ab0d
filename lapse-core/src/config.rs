use crate::error::{LapseError, LapseResult};
use std::num::NonZeroUsize;
use std::time::Duration;

/// The tick period used when none is configured.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// lapse Application Configuration Structure.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LapseConfig {
    /// Task Runner Configuration. If [None] (default), the task runner won't be enabled.
    pub tasks: Option<TasksConfig>,
    /// Stopwatch Configuration.
    pub stopwatch: StopwatchConfig,
    /// Counter Configuration.
    pub counter: CounterConfig,
}

impl LapseConfig {
    /// Check the configuration for values that can't be used.
    pub fn validate(&self) -> LapseResult<()> {
        self.stopwatch.validate()
    }
}

/// Stopwatch configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StopwatchConfig {
    /// Time between two ticks. Each tick adds one second of elapsed time. Defaults to 1 second.
    pub tick_period: Duration,
}

impl StopwatchConfig {
    /// Check that the tick period is usable.
    pub fn validate(&self) -> LapseResult<()> {
        if self.tick_period.is_zero() {
            return Err(LapseError::ZeroTickPeriod);
        }
        Ok(())
    }
}

impl Default for StopwatchConfig {
    fn default() -> Self {
        Self {
            tick_period: DEFAULT_TICK_PERIOD,
        }
    }
}

/// Counter configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CounterConfig {
    /// The value the counter starts at.
    pub initial: i64,
}

/// Configuration structure for the integrated [TaskRunner](crate::tasks::runner::TaskRunner).
///
/// A single worker builds a current-thread runtime, which is all the tick sources need.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TasksConfig {
    /// The stack size of each thread of the task runner thread pool. Defaults to 1 MB.
    pub stack_size: usize,
    /// The amount of worker threads of the task runner thread pool. Defaults to half of the available threads.
    pub workers: NonZeroUsize,
}

impl Default for TasksConfig {
    fn default() -> Self {
        let half = std::thread::available_parallelism()
            .map(|threads| threads.get() / 2)
            .unwrap_or(1);

        Self {
            stack_size: 1024 * 1024, // 1 MB
            workers: NonZeroUsize::new(half).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = LapseConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.stopwatch.tick_period, Duration::from_secs(1));
        assert_eq!(config.counter.initial, 0);
        assert!(config.tasks.is_none());
    }

    #[test]
    fn test_zero_tick_period_rejected() {
        let config = LapseConfig {
            stopwatch: StopwatchConfig {
                tick_period: Duration::ZERO,
            },
            ..Default::default()
        };

        assert!(matches!(config.validate(), Err(LapseError::ZeroTickPeriod)));
    }

    #[test]
    fn test_tasks_default_has_workers() {
        let tasks = TasksConfig::default();
        assert!(tasks.workers.get() >= 1);
        assert_eq!(tasks.stack_size, 1024 * 1024);
    }
}
