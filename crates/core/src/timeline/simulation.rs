use serde::{Deserialize, Serialize};

use crate::{DirectorConfig, PlaybackDispatcher, Result};

use super::{SimulatedVideo, Stage};

/// Identifier under which the simulated video is placed on the stage.
pub const VIDEO_ID: &str = "video-player";
/// Identifier of a non-media element on the stage.
pub const OVERLAY_ID: &str = "overlay";

/// Payload produced by a cue's callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cue {
    pub label: String,
    pub message: String,
}

/// A cue together with the playback position it fired at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiredCue {
    pub position: f64,
    #[serde(flatten)]
    pub cue: Cue,
}

struct PendingSeek {
    at: u64,
    to: u64,
    done: bool,
}

/// Plays the configured cue sheet against a simulated video and returns every
/// cue that fired, in order.
pub fn run_simulation(config: &DirectorConfig) -> Result<Vec<FiredCue>> {
    let simulation = &config.simulation;
    simulation.validate()?;
    let duration = simulation.duration_seconds()?;
    let mute_at = simulation.mute_at_seconds()?;
    let mut seeks = simulation
        .seeks
        .iter()
        .map(|seek| {
            seek.resolve()
                .map(|(at, to)| PendingSeek { at, to, done: false })
        })
        .collect::<Result<Vec<_>>>()?;

    let video = SimulatedVideo::new(duration as f64);
    let mut stage = Stage::new();
    stage.insert_video(VIDEO_ID, video.clone());
    stage.insert_element(OVERLAY_ID, "DIV");

    let mut dispatcher: PlaybackDispatcher<SimulatedVideo, Cue> = PlaybackDispatcher::new();
    for cue in &config.cues {
        let payload = Cue {
            label: cue.at.clone(),
            message: cue.message.clone(),
        };
        dispatcher.at(cue.at.as_str(), move || payload.clone())?;
    }
    dispatcher.bind(&stage, &config.element)?;

    tracing::info!(
        element = %config.element,
        cues = dispatcher.registry().len(),
        duration,
        "starting simulation"
    );

    let mut fired = Vec::new();
    video.load();
    dispatcher.play()?;
    pump(&mut dispatcher, &video, &mut fired)?;

    let mut mute_toggled = false;
    while !video.is_paused() {
        video.advance(simulation.tick_interval);
        pump(&mut dispatcher, &video, &mut fired)?;

        let second = video.position().trunc() as u64;
        if !mute_toggled && mute_at == Some(second) {
            mute_toggled = true;
            dispatcher.toggle_mute()?;
            pump(&mut dispatcher, &video, &mut fired)?;
        }

        if let Some(seek) = seeks.iter_mut().find(|seek| !seek.done && second >= seek.at) {
            seek.done = true;
            tracing::debug!(from = second, to = seek.to, "seeking");
            video.seek(seek.to as f64);
            pump(&mut dispatcher, &video, &mut fired)?;
        }
    }

    tracing::info!(fired = fired.len(), "simulation finished");
    Ok(fired)
}

fn pump(
    dispatcher: &mut PlaybackDispatcher<SimulatedVideo, Cue>,
    video: &SimulatedVideo,
    fired: &mut Vec<FiredCue>,
) -> Result<()> {
    for signal in video.take_signals() {
        let position = video.position();
        for cue in dispatcher.handle_signal(signal)? {
            tracing::debug!(position, label = %cue.label, "cue fired");
            fired.push(FiredCue { position, cue });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CueConfig, DirectorError, SeekConfig, SimulationConfig};

    fn messages(fired: &[FiredCue]) -> Vec<&str> {
        fired.iter().map(|f| f.cue.message.as_str()).collect()
    }

    #[test]
    fn demo_fires_cues_in_playback_order() {
        let fired = run_simulation(&DirectorConfig::demo()).unwrap();

        assert_eq!(
            messages(&fired),
            [
                "video is ready",
                "playback requested",
                "rolling",
                "show the title card",
                "fade in the lower third",
                "volume changed",
                "first chapter",
                "first chapter",
                "show replay button",
            ]
        );
        assert_eq!(fired[3].position, 5.0);
        assert_eq!(fired.last().unwrap().position, 45.0);
    }

    #[test]
    fn zero_second_cue_fires_only_after_seeking_back() {
        let mut config = DirectorConfig {
            cues: vec![CueConfig::new("0s", "start")],
            simulation: SimulationConfig {
                duration: "3s".to_string(),
                tick_interval: 0.5,
                ..SimulationConfig::default()
            },
            ..DirectorConfig::default()
        };
        assert!(run_simulation(&config).unwrap().is_empty());

        config.simulation.seeks = vec![SeekConfig {
            at: "2s".to_string(),
            to: "0s".to_string(),
        }];
        let fired = run_simulation(&config).unwrap();
        assert_eq!(messages(&fired), ["start"]);
        assert_eq!(fired[0].position, 0.0);
    }

    #[test]
    fn reports_missing_and_non_media_elements() {
        let mut config = DirectorConfig::demo();
        config.element = "nowhere".to_string();
        assert!(matches!(
            run_simulation(&config),
            Err(DirectorError::SourceNotFound(_))
        ));

        config.element = OVERLAY_ID.to_string();
        assert!(matches!(
            run_simulation(&config),
            Err(DirectorError::SourceTypeMismatch { .. })
        ));
    }

    #[test]
    fn rejects_invalid_cue_labels() {
        let config = DirectorConfig {
            cues: vec![CueConfig::new("whenever", "never")],
            ..DirectorConfig::default()
        };
        assert!(matches!(
            run_simulation(&config),
            Err(DirectorError::InvalidAction(ref label)) if label == "whenever"
        ));
    }

    #[test]
    fn serialises_fired_cues_flat() {
        let fired = FiredCue {
            position: 5.0,
            cue: Cue {
                label: "5s".to_string(),
                message: "hello".to_string(),
            },
        };
        let json = serde_json::to_value(&fired).unwrap();
        assert_eq!(json["label"], "5s");
        assert_eq!(json["position"], 5.0);
    }
}
