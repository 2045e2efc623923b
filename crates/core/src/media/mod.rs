//! Capability interfaces for the media element the dispatcher listens to.
//!
//! The core never talks to a concrete player. A host resolves identifiers to
//! [`Element`]s, and playable elements implement [`MediaSource`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The closed set of lifecycle events a media source emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaEvent {
    /// Playback has been requested.
    Play,
    /// Playback started, or resumed after buffering.
    Playing,
    Pause,
    Ended,
    /// Enough data is available to start playing.
    CanPlay,
    /// Volume or mute state changed.
    VolumeChange,
}

impl MediaEvent {
    pub const ALL: [MediaEvent; 6] = [
        MediaEvent::Play,
        MediaEvent::Playing,
        MediaEvent::Pause,
        MediaEvent::Ended,
        MediaEvent::CanPlay,
        MediaEvent::VolumeChange,
    ];

    /// Name used when registering actions against this event.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaEvent::Play => "play",
            MediaEvent::Playing => "playing",
            MediaEvent::Pause => "pause",
            MediaEvent::Ended => "ended",
            MediaEvent::CanPlay => "canplay",
            MediaEvent::VolumeChange => "volumechange",
        }
    }

    /// Looks up an event by its exact, case-sensitive name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|event| event.as_str() == name)
    }
}

impl fmt::Display for MediaEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaEvent {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownEvent(s.to_string()))
    }
}

/// Returned when a string is not one of the lifecycle event names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a media lifecycle event")]
pub struct UnknownEvent(pub String);

/// Notification delivered by a media source to whoever subscribed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    Lifecycle(MediaEvent),
    /// The playback position moved; read it with
    /// [`MediaSource::current_position`].
    PositionUpdate,
}

impl Signal {
    /// Every signal a dispatcher subscribes to.
    pub const ALL: [Signal; 7] = [
        Signal::Lifecycle(MediaEvent::Play),
        Signal::Lifecycle(MediaEvent::Playing),
        Signal::Lifecycle(MediaEvent::Pause),
        Signal::Lifecycle(MediaEvent::Ended),
        Signal::Lifecycle(MediaEvent::CanPlay),
        Signal::Lifecycle(MediaEvent::VolumeChange),
        Signal::PositionUpdate,
    ];
}

/// A playable media element.
///
/// Implementations decide how subscribed signals reach the dispatcher; the
/// host is expected to forward each one to
/// [`PlaybackDispatcher::handle_signal`](crate::PlaybackDispatcher::handle_signal).
pub trait MediaSource {
    /// Registers interest in `signal`. Subscribing twice is harmless.
    fn subscribe(&mut self, signal: Signal);

    /// Current playback position in fractional seconds.
    fn current_position(&self) -> f64;

    fn play(&mut self);

    fn pause(&mut self);

    fn is_muted(&self) -> bool;

    fn set_muted(&mut self, muted: bool);
}

/// What an identifier resolved to.
#[derive(Debug, Clone)]
pub enum Element<S> {
    /// A playable media element.
    Media(S),
    /// Anything else, described by its tag name.
    Other { tag: String },
}

/// Resolves identifiers to elements, e.g. a document or a scene graph.
pub trait MediaHost {
    type Source: MediaSource;

    fn lookup(&self, id: &str) -> Option<Element<Self::Source>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names_round_trip_through_from_str() {
        for event in MediaEvent::ALL {
            assert_eq!(event.as_str().parse::<MediaEvent>(), Ok(event));
        }
    }

    #[test]
    fn event_names_are_case_sensitive() {
        assert!(MediaEvent::from_name("Play").is_none());
        assert!(MediaEvent::from_name("timeupdate").is_none());
        let err = "PAUSE".parse::<MediaEvent>().unwrap_err();
        assert!(err.to_string().contains("PAUSE"));
    }

    #[test]
    fn signal_set_covers_every_event_and_position() {
        assert_eq!(Signal::ALL.len(), MediaEvent::ALL.len() + 1);
        assert!(Signal::ALL.contains(&Signal::PositionUpdate));
    }
}
