use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{timing, DirectorError, Result};

/// Smallest accepted step between simulated position updates, in seconds.
pub const MIN_TICK_INTERVAL: f64 = 0.001;

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorConfig {
    /// Identifier of the element the dispatcher binds to.
    pub element: String,
    pub cues: Vec<CueConfig>,
    pub simulation: SimulationConfig,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            element: "video-player".to_string(),
            cues: Vec::new(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl DirectorConfig {
    /// Built-in cue sheet used when no configuration file is given.
    pub fn demo() -> Self {
        Self {
            cues: vec![
                CueConfig::new("canplay", "video is ready"),
                CueConfig::new("play", "playback requested"),
                CueConfig::new("playing", "rolling"),
                CueConfig::new("5s", "show the title card"),
                CueConfig::new("0:0:20", "fade in the lower third"),
                CueConfig::new("30s", "first chapter"),
                CueConfig::new("volumechange", "volume changed"),
                CueConfig::new("ended", "show replay button"),
            ],
            simulation: SimulationConfig {
                duration: "45s".to_string(),
                mute_at: Some("25s".to_string()),
                seeks: vec![SeekConfig {
                    at: "35s".to_string(),
                    to: "28s".to_string(),
                }],
                ..SimulationConfig::default()
            },
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

/// A message to emit when `at` triggers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CueConfig {
    /// Lifecycle event name or time expression.
    pub at: String,
    pub message: String,
}

impl CueConfig {
    pub fn new(at: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            at: at.into(),
            message: message.into(),
        }
    }
}

/// Settings for the simulated video element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Length of the simulated video as a time expression.
    pub duration: String,
    /// Wall-clock step between position updates, in seconds.
    pub tick_interval: f64,
    /// Time expression at which mute is toggled.
    pub mute_at: Option<String>,
    pub seeks: Vec<SeekConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            duration: "1m".to_string(),
            tick_interval: 0.25,
            mute_at: None,
            seeks: Vec::new(),
        }
    }
}

impl SimulationConfig {
    pub fn duration_seconds(&self) -> Result<u64> {
        parse_field("duration", &self.duration)
    }

    pub fn mute_at_seconds(&self) -> Result<Option<u64>> {
        self.mute_at
            .as_deref()
            .map(|expr| parse_field("mute_at", expr))
            .transpose()
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.tick_interval.is_finite() && self.tick_interval >= MIN_TICK_INTERVAL) {
            return Err(DirectorError::msg(format!(
                "tick_interval must be at least {MIN_TICK_INTERVAL} seconds, got {}",
                self.tick_interval
            )));
        }
        self.duration_seconds()?;
        self.mute_at_seconds()?;
        for seek in &self.seeks {
            seek.resolve()?;
        }
        Ok(())
    }
}

/// Jump to `to` once playback first reaches `at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeekConfig {
    pub at: String,
    pub to: String,
}

impl SeekConfig {
    /// Both offsets in seconds.
    pub fn resolve(&self) -> Result<(u64, u64)> {
        Ok((parse_field("seek.at", &self.at)?, parse_field("seek.to", &self.to)?))
    }
}

fn parse_field(field: &str, expression: &str) -> Result<u64> {
    timing::parse_seconds(expression).ok_or_else(|| {
        DirectorError::msg(format!("`{field}` is not a valid time expression: `{expression}`"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = DirectorConfig::from_json_str("{}").unwrap();
        assert_eq!(config.element, "video-player");
        assert!(config.cues.is_empty());
        assert_eq!(config.simulation.duration_seconds().unwrap(), 60);
        assert_eq!(config.simulation.tick_interval, 0.25);
    }

    #[test]
    fn parses_cue_sheets() {
        let config = DirectorConfig::from_json_str(
            r#"{
                "element": "trailer",
                "cues": [{ "at": "1m30s", "message": "credits" }],
                "simulation": {
                    "duration": "0:2:00",
                    "mute_at": "10s",
                    "seeks": [{ "at": "1m", "to": "5s" }]
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.element, "trailer");
        assert_eq!(config.cues, vec![CueConfig::new("1m30s", "credits")]);
        assert_eq!(config.simulation.duration_seconds().unwrap(), 120);
        assert_eq!(config.simulation.mute_at_seconds().unwrap(), Some(10));
        assert_eq!(config.simulation.seeks[0].resolve().unwrap(), (60, 5));
        assert!(config.simulation.validate().is_ok());
    }

    #[test]
    fn reports_malformed_json() {
        let err = DirectorConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, DirectorError::Json(_)));
    }

    #[test]
    fn rejects_bad_simulation_fields() {
        let mut simulation = SimulationConfig {
            duration: "forever".to_string(),
            ..SimulationConfig::default()
        };
        let err = simulation.validate().unwrap_err();
        assert!(err.to_string().contains("duration"));

        simulation.duration = "10s".to_string();
        simulation.tick_interval = 0.0;
        assert!(simulation.validate().is_err());
    }

    #[test]
    fn rejects_tick_intervals_below_the_floor() {
        let mut simulation = SimulationConfig {
            tick_interval: 1e-18,
            ..SimulationConfig::default()
        };
        let err = simulation.validate().unwrap_err();
        assert!(err.to_string().contains("tick_interval"));

        simulation.tick_interval = f64::NAN;
        assert!(simulation.validate().is_err());

        simulation.tick_interval = MIN_TICK_INTERVAL;
        assert!(simulation.validate().is_ok());
    }

    #[test]
    fn shipped_cue_sheet_loads_and_validates() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/cues.json");
        let config = DirectorConfig::from_path(path).unwrap();

        assert_eq!(config.element, "video-player");
        assert_eq!(config.cues.len(), 9);
        assert!(config.simulation.validate().is_ok());
        assert_eq!(config.simulation.duration_seconds().unwrap(), 150);
        assert_eq!(config.simulation.seeks[0].resolve().unwrap(), (100, 85));
        for cue in &config.cues {
            let is_event = crate::MediaEvent::from_name(&cue.at).is_some();
            assert!(is_event || timing::parse_seconds(&cue.at).is_some(), "{}", cue.at);
        }
    }

    #[test]
    fn demo_config_is_valid() {
        let config = DirectorConfig::demo();
        assert!(config.simulation.validate().is_ok());
        assert!(!config.cues.is_empty());
    }
}
