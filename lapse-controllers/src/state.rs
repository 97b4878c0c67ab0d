/// The run state of a stopwatch.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum RunState {
    /// Not started, or reset. Elapsed time is zero.
    #[default]
    Stopped,
    /// Counting.
    Running,
    /// Started, but not counting.
    Paused,
}

impl RunState {
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused)
    }

    /// Which stopwatch controls should be shown in this state.
    pub fn controls(self) -> Controls {
        Controls::from(self)
    }
}

/// Visibility and labels of the stopwatch controls for one [RunState].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Controls {
    /// The Start button is only offered while stopped.
    pub start_visible: bool,
    /// The Reset button is offered whenever the stopwatch has been started.
    pub reset_visible: bool,
    /// The Pause/Resume button is offered whenever the stopwatch has been started.
    pub pause_resume_visible: bool,
    /// `"Pause"` while running, `"Resume"` while paused, [None] while hidden.
    pub pause_resume_label: Option<&'static str>,
}

impl From<RunState> for Controls {
    fn from(state: RunState) -> Self {
        let started = !state.is_stopped();
        Self {
            start_visible: !started,
            reset_visible: started,
            pause_resume_visible: started,
            pause_resume_label: match state {
                RunState::Stopped => None,
                RunState::Running => Some("Pause"),
                RunState::Paused => Some("Resume"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controls_per_state() {
        let stopped = RunState::Stopped.controls();
        assert!(stopped.start_visible);
        assert!(!stopped.reset_visible);
        assert!(!stopped.pause_resume_visible);
        assert_eq!(stopped.pause_resume_label, None);

        let running = RunState::Running.controls();
        assert!(!running.start_visible);
        assert!(running.reset_visible);
        assert!(running.pause_resume_visible);
        assert_eq!(running.pause_resume_label, Some("Pause"));

        let paused = RunState::Paused.controls();
        assert!(!paused.start_visible);
        assert!(paused.reset_visible);
        assert_eq!(paused.pause_resume_label, Some("Resume"));
    }
}
