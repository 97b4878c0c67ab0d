//! Controllers behind the lapse screens.
//!
//! Each controller owns its state as [signals](lapse_core::signal), takes user intents as plain
//! method calls and exposes read-only signals for a view layer to bind to.

/// Contains the [CounterController](counter::CounterController).
pub mod counter;

/// Contains the [format_elapsed](format::format_elapsed) time formatter.
pub mod format;

/// Contains [RunState](state::RunState) and the derived [Controls](state::Controls).
pub mod state;

/// Contains the [StopwatchController](stopwatch::StopwatchController).
pub mod stopwatch;

pub use counter::CounterController;
pub use format::{format_elapsed, Hms};
pub use state::{Controls, RunState};
pub use stopwatch::StopwatchController;
