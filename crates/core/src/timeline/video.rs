use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
    rc::Rc,
};

use crate::{Element, MediaEvent, MediaHost, MediaSource, Signal};

use super::PlaybackClock;

/// Cheaply cloneable handle to a simulated video element.
///
/// Clones share state, the way several references to one DOM node do. Only
/// signals that were subscribed to are queued.
#[derive(Debug, Clone)]
pub struct SimulatedVideo {
    inner: Rc<RefCell<VideoState>>,
}

#[derive(Debug)]
struct VideoState {
    clock: PlaybackClock,
    duration: f64,
    paused: bool,
    ended: bool,
    muted: bool,
    subscriptions: Vec<Signal>,
    pending: VecDeque<Signal>,
}

impl VideoState {
    fn emit(&mut self, signal: Signal) {
        if self.subscriptions.contains(&signal) {
            self.pending.push_back(signal);
        }
    }

    fn emit_event(&mut self, event: MediaEvent) {
        self.emit(Signal::Lifecycle(event));
    }

    fn finish_if_done(&mut self) {
        if !self.ended && self.clock.time_seconds >= self.duration {
            self.ended = true;
            if !self.paused {
                self.paused = true;
                self.emit_event(MediaEvent::Pause);
            }
            self.emit_event(MediaEvent::Ended);
        }
    }
}

impl SimulatedVideo {
    /// Creates a paused video of the given length in seconds.
    pub fn new(duration: f64) -> Self {
        Self {
            inner: Rc::new(RefCell::new(VideoState {
                clock: PlaybackClock::default(),
                duration: duration.max(0.0),
                paused: true,
                ended: false,
                muted: false,
                subscriptions: Vec::new(),
                pending: VecDeque::new(),
            })),
        }
    }

    /// Announces that enough data is buffered to start playing.
    pub fn load(&self) {
        self.inner.borrow_mut().emit_event(MediaEvent::CanPlay);
    }

    pub fn duration(&self) -> f64 {
        self.inner.borrow().duration
    }

    pub fn position(&self) -> f64 {
        self.inner.borrow().clock.time_seconds
    }

    pub fn is_paused(&self) -> bool {
        self.inner.borrow().paused
    }

    pub fn has_ended(&self) -> bool {
        self.inner.borrow().ended
    }

    /// Moves playback forward by `delta` seconds when playing.
    pub fn advance(&self, delta: f64) {
        let mut state = self.inner.borrow_mut();
        if state.paused {
            return;
        }
        state.clock.advance(delta);
        let duration = state.duration;
        if state.clock.time_seconds > duration {
            state.clock.seek(duration);
        }
        state.emit(Signal::PositionUpdate);
        state.finish_if_done();
    }

    /// Jumps to `position`, clamped to the video's length.
    pub fn seek(&self, position: f64) {
        let mut state = self.inner.borrow_mut();
        let target = position.clamp(0.0, state.duration);
        state.clock.seek(target);
        if target < state.duration {
            state.ended = false;
        }
        state.emit(Signal::PositionUpdate);
        state.finish_if_done();
    }

    /// Drains the queued signals in emission order.
    pub fn take_signals(&self) -> Vec<Signal> {
        self.inner.borrow_mut().pending.drain(..).collect()
    }

    pub fn subscriptions(&self) -> Vec<Signal> {
        self.inner.borrow().subscriptions.clone()
    }
}

impl MediaSource for SimulatedVideo {
    fn subscribe(&mut self, signal: Signal) {
        let mut state = self.inner.borrow_mut();
        if !state.subscriptions.contains(&signal) {
            state.subscriptions.push(signal);
        }
    }

    fn current_position(&self) -> f64 {
        self.position()
    }

    fn play(&mut self) {
        let mut state = self.inner.borrow_mut();
        if state.ended {
            state.clock.reset();
            state.ended = false;
        }
        if state.paused {
            state.paused = false;
            state.emit_event(MediaEvent::Play);
            state.emit_event(MediaEvent::Playing);
        }
    }

    fn pause(&mut self) {
        let mut state = self.inner.borrow_mut();
        if !state.paused {
            state.paused = true;
            state.emit_event(MediaEvent::Pause);
        }
    }

    fn is_muted(&self) -> bool {
        self.inner.borrow().muted
    }

    fn set_muted(&mut self, muted: bool) {
        let mut state = self.inner.borrow_mut();
        if state.muted != muted {
            state.muted = muted;
            state.emit_event(MediaEvent::VolumeChange);
        }
    }
}

/// In-memory document mapping identifiers to elements.
#[derive(Debug, Default, Clone)]
pub struct Stage {
    elements: HashMap<String, Element<SimulatedVideo>>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_video(&mut self, id: impl Into<String>, video: SimulatedVideo) {
        self.elements.insert(id.into(), Element::Media(video));
    }

    /// Adds a non-media element such as a `DIV`.
    pub fn insert_element(&mut self, id: impl Into<String>, tag: impl Into<String>) {
        self.elements
            .insert(id.into(), Element::Other { tag: tag.into() });
    }
}

impl MediaHost for Stage {
    type Source = SimulatedVideo;

    fn lookup(&self, id: &str) -> Option<Element<SimulatedVideo>> {
        self.elements.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscribed(duration: f64) -> SimulatedVideo {
        let mut video = SimulatedVideo::new(duration);
        for signal in Signal::ALL {
            video.subscribe(signal);
        }
        video
    }

    #[test]
    fn queues_only_subscribed_signals() {
        let mut video = SimulatedVideo::new(10.0);
        video.subscribe(Signal::Lifecycle(MediaEvent::Playing));
        video.load();
        video.play();

        assert_eq!(
            video.take_signals(),
            vec![Signal::Lifecycle(MediaEvent::Playing)]
        );
        assert!(video.take_signals().is_empty());
    }

    #[test]
    fn does_not_advance_while_paused() {
        let video = subscribed(10.0);
        video.advance(1.0);
        assert_eq!(video.position(), 0.0);
        assert!(video.take_signals().is_empty());
    }

    #[test]
    fn reaching_the_end_pauses_and_ends() {
        let mut video = subscribed(1.0);
        video.play();
        video.take_signals();

        video.advance(0.75);
        video.advance(0.75);

        assert_eq!(video.position(), 1.0);
        assert!(video.has_ended());
        assert!(video.is_paused());
        assert_eq!(
            video.take_signals(),
            vec![
                Signal::PositionUpdate,
                Signal::PositionUpdate,
                Signal::Lifecycle(MediaEvent::Pause),
                Signal::Lifecycle(MediaEvent::Ended),
            ]
        );
    }

    #[test]
    fn clones_share_state() {
        let mut video = subscribed(5.0);
        let handle = video.clone();
        video.play();
        handle.advance(2.0);

        assert_eq!(video.position(), 2.0);
        video.set_muted(true);
        assert!(handle.is_muted());
    }

    #[test]
    fn seeks_clamp_to_duration() {
        let mut video = subscribed(5.0);
        video.play();
        video.seek(-3.0);
        assert_eq!(video.position(), 0.0);
        video.seek(9.0);
        assert_eq!(video.position(), 5.0);
        assert!(video.has_ended());
    }

    #[test]
    fn stage_resolves_media_and_other_elements() {
        let mut stage = Stage::new();
        stage.insert_video("video-player", SimulatedVideo::new(3.0));
        stage.insert_element("banner", "DIV");

        assert!(matches!(stage.lookup("video-player"), Some(Element::Media(_))));
        assert!(matches!(stage.lookup("banner"), Some(Element::Other { ref tag }) if tag == "DIV"));
        assert!(stage.lookup("missing").is_none());
    }
}
