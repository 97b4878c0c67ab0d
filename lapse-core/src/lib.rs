#![warn(missing_docs)]

//! Core library for lapse => See `lapse` crate.
//!
//! Contains the signal system, the task runner and the tick scheduler that
//! the controllers are built on.

/// Contains the [LapseConfig](config::LapseConfig) struct.
pub mod config;

/// Contains the [LapseError](error::LapseError) type.
pub mod error;

/// Contains the signal system for reactive programming
pub mod signal;

/// Contains the task runner and utilities for running async
pub mod tasks;

/// Contains the repeating tick scheduler and its cancellable handle.
pub mod timer;

/// Contains the [reference::Ref] for representing a reference to a value.
pub mod reference;
