//! Routes media signals to registered actions.

use crate::{
    ActionRegistry, DirectorError, Element, MediaEvent, MediaHost, MediaSource, Result,
    ScheduledAction, Signal, Trigger,
};

/// Binding state of a [`PlaybackDispatcher`].
#[derive(Debug)]
pub enum DispatcherState<S> {
    Uninitialized,
    Bound(S),
}

/// Fires registered actions in response to lifecycle events and position
/// updates from a bound [`MediaSource`].
///
/// Position updates are truncated to whole seconds. An update that lands on
/// the same second as the immediately preceding one is ignored; there is no
/// longer history, so seeking back to an earlier second fires its actions
/// again. The recorded second starts at 0, so actions at `0s` only fire once
/// playback comes back to the first second from a later one.
#[derive(Debug)]
pub struct PlaybackDispatcher<S, T = ()> {
    state: DispatcherState<S>,
    registry: ActionRegistry<T>,
    previous_second: u64,
}

impl<S: MediaSource, T> Default for PlaybackDispatcher<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: MediaSource, T> PlaybackDispatcher<S, T> {
    /// Creates an unbound dispatcher. Actions may be registered right away.
    pub fn new() -> Self {
        Self {
            state: DispatcherState::Uninitialized,
            registry: ActionRegistry::new(),
            previous_second: 0,
        }
    }

    /// Resolves `id` through `host` and binds to the resulting media element.
    pub fn attach<H>(host: &H, id: &str) -> Result<Self>
    where
        H: MediaHost<Source = S>,
    {
        let mut dispatcher = Self::new();
        dispatcher.bind(host, id)?;
        Ok(dispatcher)
    }

    /// Binds to the element `id` and subscribes to all of its signals.
    ///
    /// Binding again replaces the previous source and resets the recorded
    /// second to 0.
    pub fn bind<H>(&mut self, host: &H, id: &str) -> Result<()>
    where
        H: MediaHost<Source = S>,
    {
        let source = match host.lookup(id) {
            None => return Err(DirectorError::SourceNotFound(id.to_string())),
            Some(Element::Other { tag }) => {
                return Err(DirectorError::SourceTypeMismatch {
                    id: id.to_string(),
                    tag,
                })
            }
            Some(Element::Media(source)) => source,
        };

        tracing::debug!(id, "bound media source");
        self.state = DispatcherState::Bound(source);
        self.previous_second = 0;
        self.subscribe()
    }

    /// Subscribes to every lifecycle event and to position updates.
    pub fn subscribe(&mut self) -> Result<()> {
        let source = self.source_mut()?;
        for signal in Signal::ALL {
            source.subscribe(signal);
        }
        Ok(())
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.state, DispatcherState::Bound(_))
    }

    pub fn state(&self) -> &DispatcherState<S> {
        &self.state
    }

    pub fn source(&self) -> Result<&S> {
        match &self.state {
            DispatcherState::Bound(source) => Ok(source),
            DispatcherState::Uninitialized => Err(DirectorError::NotInitialized),
        }
    }

    pub fn source_mut(&mut self) -> Result<&mut S> {
        match &mut self.state {
            DispatcherState::Bound(source) => Ok(source),
            DispatcherState::Uninitialized => Err(DirectorError::NotInitialized),
        }
    }

    /// Registers `callback` against a lifecycle event name or a time
    /// expression such as `10s`, `1m30s` or `0:10:00`.
    pub fn at<F>(&mut self, label: impl Into<String>, callback: F) -> Result<()>
    where
        F: FnMut() -> T + 'static,
    {
        self.registry.register(label, callback)
    }

    pub fn registry(&self) -> &ActionRegistry<T> {
        &self.registry
    }

    /// Last whole second seen on a position update, or 0 before any.
    pub fn current_time(&self) -> u64 {
        self.previous_second
    }

    /// Asks the bound source to start playing.
    pub fn play(&mut self) -> Result<()> {
        self.source_mut()?.play();
        Ok(())
    }

    /// Asks the bound source to pause.
    pub fn pause(&mut self) -> Result<()> {
        self.source_mut()?.pause();
        Ok(())
    }

    /// Flips the mute state of the bound source, returning the new state.
    pub fn toggle_mute(&mut self) -> Result<bool> {
        let source = self.source_mut()?;
        let muted = !source.is_muted();
        source.set_muted(muted);
        Ok(muted)
    }

    /// Handles one signal and returns the results of every callback it fired,
    /// in registration order.
    pub fn handle_signal(&mut self, signal: Signal) -> Result<Vec<T>> {
        let Some(trigger) = self.resolve(signal)? else {
            return Ok(Vec::new());
        };
        Ok(self
            .registry
            .matching_mut(trigger)
            .into_iter()
            .map(ScheduledAction::execute)
            .collect())
    }

    pub fn handle_event(&mut self, event: MediaEvent) -> Result<Vec<T>> {
        self.handle_signal(Signal::Lifecycle(event))
    }

    pub fn handle_position_update(&mut self) -> Result<Vec<T>> {
        self.handle_signal(Signal::PositionUpdate)
    }

    fn resolve(&mut self, signal: Signal) -> Result<Option<Trigger>> {
        let position = self.source()?.current_position();
        match signal {
            Signal::Lifecycle(event) => {
                tracing::trace!(%event, "dispatching lifecycle event");
                Ok(Some(Trigger::Event(event)))
            }
            Signal::PositionUpdate => {
                let second = whole_second(position);
                if self.previous_second == second {
                    tracing::trace!(second, "position already handled");
                    return Ok(None);
                }
                self.previous_second = second;
                tracing::trace!(second, "dispatching position update");
                Ok(Some(Trigger::At(second)))
            }
        }
    }
}

impl<S: MediaSource, U, E> PlaybackDispatcher<S, std::result::Result<U, E>>
where
    E: From<DirectorError>,
{
    /// Like [`handle_signal`](Self::handle_signal) for fallible callbacks:
    /// stops at the first callback that fails and returns its error.
    pub fn try_handle_signal(&mut self, signal: Signal) -> std::result::Result<Vec<U>, E> {
        let Some(trigger) = self.resolve(signal)? else {
            return Ok(Vec::new());
        };
        let mut outputs = Vec::new();
        for action in self.registry.matching_mut(trigger) {
            outputs.push(action.execute()?);
        }
        Ok(outputs)
    }

    pub fn try_handle_event(&mut self, event: MediaEvent) -> std::result::Result<Vec<U>, E> {
        self.try_handle_signal(Signal::Lifecycle(event))
    }

    pub fn try_handle_position_update(&mut self) -> std::result::Result<Vec<U>, E> {
        self.try_handle_signal(Signal::PositionUpdate)
    }
}

// Positions are non-negative in practice; anything else clamps to zero.
fn whole_second(position: f64) -> u64 {
    if position.is_finite() && position > 0.0 {
        position.trunc() as u64
    } else {
        0
    }
}
