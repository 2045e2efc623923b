use std::fmt;

use crate::{timing, DirectorError, MediaEvent, Result};

/// Boxed zero-argument callback owned by a [`ScheduledAction`].
pub type Callback<T> = Box<dyn FnMut() -> T>;

/// What causes an action to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// A named lifecycle event.
    Event(MediaEvent),
    /// Elapsed playback time in whole seconds.
    At(u64),
}

/// A callback bound to either a lifecycle event or a playback offset.
///
/// The label, trigger and callback never change after construction.
pub struct ScheduledAction<T = ()> {
    label: String,
    trigger: Trigger,
    callback: Callback<T>,
    executions: u64,
}

impl<T> ScheduledAction<T> {
    /// Classifies `label` and wraps `callback`.
    ///
    /// Fails with [`DirectorError::InvalidAction`] when the label is neither a
    /// lifecycle event name nor a parseable time expression.
    pub fn new<F>(label: impl Into<String>, callback: F) -> Result<Self>
    where
        F: FnMut() -> T + 'static,
    {
        let label = label.into();
        let trigger = match MediaEvent::from_name(&label) {
            Some(event) => Trigger::Event(event),
            None => match timing::parse_seconds(&label) {
                Some(seconds) => Trigger::At(seconds),
                None => return Err(DirectorError::InvalidAction(label)),
            },
        };

        Ok(Self {
            label,
            trigger,
            callback: Box::new(callback),
            executions: 0,
        })
    }

    /// The label exactly as registered.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    /// True when the action is keyed by elapsed time.
    pub fn is_timed(&self) -> bool {
        matches!(self.trigger, Trigger::At(_))
    }

    /// Canonical offset for timed actions.
    pub fn seconds(&self) -> Option<u64> {
        match self.trigger {
            Trigger::At(seconds) => Some(seconds),
            Trigger::Event(_) => None,
        }
    }

    /// How many times the callback has run. Diagnostic only.
    pub fn execution_count(&self) -> u64 {
        self.executions
    }

    /// Runs the callback and hands back its result unchanged.
    pub fn execute(&mut self) -> T {
        self.executions += 1;
        tracing::trace!(label = %self.label, executions = self.executions, "executing action");
        (self.callback)()
    }
}

impl<T> fmt::Debug for ScheduledAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledAction")
            .field("label", &self.label)
            .field("trigger", &self.trigger)
            .field("executions", &self.executions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn executes_callback_and_returns_its_value() {
        let mut action = ScheduledAction::new("play", || "hello world").unwrap();

        assert_eq!(action.label(), "play");
        assert_eq!(action.execute(), "hello world");
        assert_eq!(action.execution_count(), 1);
    }

    #[test]
    fn event_labels_are_untimed() {
        let action = ScheduledAction::new("volumechange", || ()).unwrap();
        assert!(!action.is_timed());
        assert_eq!(action.seconds(), None);
        assert_eq!(action.trigger(), Trigger::Event(MediaEvent::VolumeChange));
    }

    #[test]
    fn time_labels_are_timed() {
        let action = ScheduledAction::new("1m30s", || ()).unwrap();
        assert!(action.is_timed());
        assert_eq!(action.seconds(), Some(90));
        assert_eq!(action.label(), "1m30s");
    }

    #[test]
    fn rejects_invalid_labels() {
        let err = ScheduledAction::new("invalid action", || ()).unwrap_err();
        assert!(matches!(err, DirectorError::InvalidAction(ref label) if label == "invalid action"));
    }

    #[test]
    fn callback_may_run_repeatedly() {
        let mut count = 0;
        let mut action = ScheduledAction::new("10s", move || {
            count += 1;
            count
        })
        .unwrap();

        assert_eq!(action.execute(), 1);
        assert_eq!(action.execute(), 2);
        assert_eq!(action.execution_count(), 2);
    }
}
