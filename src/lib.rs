#![warn(missing_docs)]

//! Reactive stopwatch and counter controllers.
//!
//! Controllers own their state as signals, take intents as method calls and publish everything a
//! view needs to draw itself: the formatted elapsed time, which controls to show, the counter label.

pub use lapse_controllers as controllers;
pub use lapse_core as core;
pub use lapse_services as services;

/// A "prelude" for users of lapse.
///
/// Importing this module brings into scope the most common types
/// needed to drive the controllers.
///
/// ```rust
/// use lapse::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::config::{CounterConfig, LapseConfig, StopwatchConfig, TasksConfig};
    pub use crate::core::reference::Ref;
    pub use crate::core::signal::subscription::{Subscription, SubscriptionBag};
    pub use crate::core::signal::{
        map::MapSignal, read::ReadSignal, state::StateSignal, BoxedSignal, Signal,
    };
    pub use crate::core::timer::Scheduler;

    pub use crate::controllers::{
        format_elapsed, Controls, CounterController, RunState, StopwatchController,
    };

    pub use crate::services::SettingsRegistry;
}
