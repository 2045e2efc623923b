//! Core library for Video Director.
//!
//! Callers register callbacks against a media element, keyed either by a
//! lifecycle event name (`play`, `pause`, `ended`, ...) or by an elapsed
//! playback time written as `10s`, `5m`, `1m30s` or `0:10:00`. A
//! [`PlaybackDispatcher`] bound to a [`MediaSource`] fires the matching
//! callbacks as events and position updates arrive.
//!
//! The media element itself is abstracted behind [`MediaSource`] and
//! [`MediaHost`]; the [`timeline`] module ships a simulated implementation.

pub mod action;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod media;
pub mod registry;
pub mod timeline;
pub mod timing;

pub use action::{Callback, ScheduledAction, Trigger};
pub use config::{CueConfig, DirectorConfig, SeekConfig, SimulationConfig};
pub use dispatch::{DispatcherState, PlaybackDispatcher};
pub use error::{DirectorError, Result};
pub use media::{Element, MediaEvent, MediaHost, MediaSource, Signal, UnknownEvent};
pub use registry::ActionRegistry;
pub use timeline::{run_simulation, Cue, FiredCue, PlaybackClock, SimulatedVideo, Stage};
pub use timing::{format_clock, parse_detailed, parse_seconds, ParsedTime, TimeFormat};
