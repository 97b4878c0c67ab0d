use lapse_core::config::CounterConfig;
use lapse_core::signal::map::MapSignal;
use lapse_core::signal::read::ReadSignal;
use lapse_core::signal::state::StateSignal;
use lapse_core::signal::Signal;

/// Holds one integer and publishes it on every change.
///
/// There are no bounds; the value saturates at the limits of [i64] instead of overflowing.
pub struct CounterController {
    value: StateSignal<i64>,
}

impl CounterController {
    /// Creates a counter starting at zero.
    pub fn new() -> Self {
        Self::with_config(&CounterConfig::default())
    }

    /// Creates a counter starting at the configured value.
    pub fn with_config(config: &CounterConfig) -> Self {
        Self {
            value: StateSignal::new(config.initial),
        }
    }

    pub fn increment(&self) {
        self.value.mutate(|value| *value = value.saturating_add(1));
        log::trace!("Counter incremented to {}", *self.value.get());
    }

    pub fn decrement(&self) {
        self.value.mutate(|value| *value = value.saturating_sub(1));
        log::trace!("Counter decremented to {}", *self.value.get());
    }

    /// The current value.
    pub fn value(&self) -> ReadSignal<i64> {
        self.value.read_only()
    }

    /// The current value as a decimal string, ready for display.
    pub fn label(&self) -> MapSignal<i64, String> {
        self.value.map(|value| value.to_string())
    }
}

impl Default for CounterController {
    fn default() -> Self {
        Self::new()
    }
}
