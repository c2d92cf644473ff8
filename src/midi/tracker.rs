// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Held-note tracking with sustain pedal support.
//!
//! The tracker keeps two sets of absolute MIDI notes: the keys physically
//! down and the notes actually sounding. Without the pedal the two stay
//! equal. While the pedal is down, released keys keep sounding; lifting
//! the pedal silences everything that is no longer held.

use std::collections::HashSet;

use crate::music::{MidiNote, PitchClassSet};

use super::input::MidiMessage;
use super::messages;

/// Tracks which notes are sounding from a stream of MIDI messages
#[derive(Debug, Clone, Default)]
pub struct NoteTracker {
    down: HashSet<MidiNote>,
    sounding: HashSet<MidiNote>,
    pedal: u8,
}

impl NoteTracker {
    /// Create a tracker with nothing held
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one message. Returns true if the sounding set changed.
    pub fn apply(&mut self, message: &MidiMessage) -> bool {
        match message {
            MidiMessage::NoteOn { note, .. } => {
                self.down.insert(*note);
                self.sounding.insert(*note)
            }
            MidiMessage::NoteOff { note, .. } => {
                self.down.remove(note);
                if self.pedal == 0 {
                    self.sounding.remove(note)
                } else {
                    // Pedal holds the note past the key release
                    false
                }
            }
            MidiMessage::ControlChange {
                controller, value, ..
            } if *controller == messages::CC_SUSTAIN => {
                self.pedal = *value;
                if *value == 0 {
                    let before = self.sounding.len();
                    self.sounding.retain(|note| self.down.contains(note));
                    self.sounding.len() != before
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    /// Drop all held and sounding notes and release the pedal
    pub fn clear(&mut self) {
        self.down.clear();
        self.sounding.clear();
        self.pedal = 0;
    }

    /// Whether the sustain pedal is currently down
    pub fn pedal_down(&self) -> bool {
        self.pedal > 0
    }

    /// Number of keys physically held
    pub fn keys_down(&self) -> usize {
        self.down.len()
    }

    /// The sounding notes in ascending order
    pub fn sounding_notes(&self) -> Vec<MidiNote> {
        let mut notes: Vec<MidiNote> = self.sounding.iter().copied().collect();
        notes.sort_unstable();
        notes
    }

    /// The sounding notes reduced to pitch classes
    pub fn sounding_pitch_classes(&self) -> PitchClassSet {
        PitchClassSet::from_notes(self.sounding.iter().copied())
    }
}
