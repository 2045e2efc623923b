use crate::{Result, ScheduledAction, Trigger};

/// Stores registered actions split by how they are triggered.
///
/// Both lists keep registration order and retain duplicates, so the same
/// label registered twice fires twice.
#[derive(Debug)]
pub struct ActionRegistry<T = ()> {
    event_actions: Vec<ScheduledAction<T>>,
    timed_actions: Vec<ScheduledAction<T>>,
}

impl<T> Default for ActionRegistry<T> {
    fn default() -> Self {
        Self {
            event_actions: Vec::new(),
            timed_actions: Vec::new(),
        }
    }
}

impl<T> ActionRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a [`ScheduledAction`] for `label` and stores it.
    pub fn register<F>(&mut self, label: impl Into<String>, callback: F) -> Result<()>
    where
        F: FnMut() -> T + 'static,
    {
        let action = ScheduledAction::new(label, callback)?;
        tracing::debug!(label = action.label(), trigger = ?action.trigger(), "registered action");
        if action.is_timed() {
            self.timed_actions.push(action);
        } else {
            self.event_actions.push(action);
        }
        Ok(())
    }

    /// Event-triggered actions whose label equals `label`.
    pub fn actions_of(&self, label: &str) -> Vec<&ScheduledAction<T>> {
        self.event_actions
            .iter()
            .filter(|action| action.label() == label)
            .collect()
    }

    /// Timed actions scheduled at exactly `seconds`.
    pub fn timed_actions_at(&self, seconds: u64) -> Vec<&ScheduledAction<T>> {
        self.timed_actions
            .iter()
            .filter(|action| action.seconds() == Some(seconds))
            .collect()
    }

    /// All event-triggered actions in registration order.
    pub fn actions(&self) -> &[ScheduledAction<T>] {
        &self.event_actions
    }

    /// All timed actions in registration order.
    pub fn timed_actions(&self) -> &[ScheduledAction<T>] {
        &self.timed_actions
    }

    pub fn len(&self) -> usize {
        self.event_actions.len() + self.timed_actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mutable view over the actions that `trigger` should fire.
    pub(crate) fn matching_mut(&mut self, trigger: Trigger) -> Vec<&mut ScheduledAction<T>> {
        let pool = match trigger {
            Trigger::Event(_) => &mut self.event_actions,
            Trigger::At(_) => &mut self.timed_actions,
        };
        pool.iter_mut()
            .filter(|action| action.trigger() == trigger)
            .collect()
    }
}
