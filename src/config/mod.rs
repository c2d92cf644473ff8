// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for Scalescope.
//!
//! This module provides data structures for loading the MIDI input
//! selection and display settings from a YAML file.

pub mod watcher;

pub use watcher::{validate_config, ConfigEvent, ConfigWatcher};

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Settings {
    /// MIDI input selection
    #[serde(default)]
    pub midi: MidiSettings,
    /// Display behavior
    #[serde(default)]
    pub display: DisplaySettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_yaml(&contents)
    }

    /// Parse settings from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Save settings to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))
    }

    /// Check value ranges that the type system cannot express
    pub fn validate(&self) -> Result<()> {
        if self.display.frame_rate == 0 || self.display.frame_rate > 240 {
            return Err(anyhow!(
                "frame_rate must be between 1 and 240, got {}",
                self.display.frame_rate
            ));
        }
        if let Some(channel) = self.midi.channel {
            if channel > 15 {
                return Err(anyhow!(
                    "midi channel must be between 0 and 15, got {}",
                    channel
                ));
            }
        }
        Ok(())
    }
}

/// MIDI input configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MidiSettings {
    /// Source name to connect to (substring match)
    #[serde(default)]
    pub device: Option<String>,
    /// Source index to connect to
    #[serde(default)]
    pub source: Option<usize>,
    /// Input channel filter, 0-15 (all channels if unset)
    #[serde(default)]
    pub channel: Option<u8>,
}

impl MidiSettings {
    /// Resolve the source index against the available sources.
    ///
    /// An explicit index wins over a device name match.
    pub fn resolve_source(&self, sources: &[(usize, String)]) -> Option<usize> {
        if let Some(index) = self.source {
            return Some(index);
        }
        if let Some(device) = &self.device {
            return sources
                .iter()
                .find(|(_, name)| name.contains(device.as_str()))
                .map(|(index, _)| *index);
        }
        None
    }
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplaySettings {
    /// Refresh rate in frames per second
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    /// Show the measured frame rate in the header
    #[serde(default)]
    pub show_fps: bool,
    /// Draw edges in the graph view
    #[serde(default = "default_show_edges")]
    pub show_edges: bool,
    /// List families that currently have no matches
    #[serde(default = "default_show_empty_families")]
    pub show_empty_families: bool,
}

fn default_frame_rate() -> u32 {
    60
}
fn default_show_edges() -> bool {
    true
}
fn default_show_empty_families() -> bool {
    true
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            show_fps: false,
            show_edges: default_show_edges(),
            show_empty_families: default_show_empty_families(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_settings() {
        let yaml = r#"
midi:
  device: "Minilab3"
  channel: 0

display:
  frame_rate: 30
  show_fps: true
"#;

        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.midi.device, Some("Minilab3".to_string()));
        assert_eq!(settings.midi.source, None);
        assert_eq!(settings.midi.channel, Some(0));
        assert_eq!(settings.display.frame_rate, 30);
        assert!(settings.display.show_fps);
        assert!(settings.display.show_edges);
    }

    #[test]
    fn test_default_values() {
        let yaml = r#"
midi:
  source: 1
"#;

        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.midi.source, Some(1));
        assert_eq!(settings.midi.channel, None);
        assert_eq!(settings.display.frame_rate, 60);
        assert!(!settings.display.show_fps);
        assert!(settings.display.show_edges);
        assert!(settings.display.show_empty_families);
    }

    #[test]
    fn test_resolve_source() {
        let sources = vec![
            (0, "Midi Through Port-0".to_string()),
            (1, "Minilab3 MIDI".to_string()),
        ];

        let by_name = MidiSettings {
            device: Some("Minilab3".to_string()),
            source: None,
            channel: None,
        };
        assert_eq!(by_name.resolve_source(&sources), Some(1));

        // Explicit index wins over the name
        let by_index = MidiSettings {
            device: Some("Minilab3".to_string()),
            source: Some(0),
            channel: None,
        };
        assert_eq!(by_index.resolve_source(&sources), Some(0));

        let unset = MidiSettings::default();
        assert_eq!(unset.resolve_source(&sources), None);

        let missing = MidiSettings {
            device: Some("Launchpad".to_string()),
            source: None,
            channel: None,
        };
        assert_eq!(missing.resolve_source(&sources), None);
    }

    #[test]
    fn test_validate() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_ok());

        settings.display.frame_rate = 0;
        assert!(settings.validate().is_err());

        settings.display.frame_rate = 60;
        settings.midi.channel = Some(16);
        assert!(settings.validate().is_err());

        settings.midi.channel = Some(15);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_round_trip() {
        let original = Settings {
            midi: MidiSettings {
                device: None,
                source: Some(2),
                channel: Some(9),
            },
            display: DisplaySettings {
                frame_rate: 30,
                show_fps: true,
                show_edges: false,
                show_empty_families: false,
            },
        };

        let yaml = original.to_yaml().unwrap();
        let parsed = Settings::from_yaml(&yaml).unwrap();
        assert_eq!(original, parsed);
    }
}
