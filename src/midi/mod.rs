// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! MIDI input layer.
//!
//! This module receives messages from a hardware or virtual source,
//! parses the channel voice messages the matcher cares about, and tracks
//! which notes are sounding once the sustain pedal is taken into account.

pub mod input;
pub mod tracker;

pub use input::{list_sources, print_sources, source_count, MidiInput, MidiMessage};
pub use tracker::NoteTracker;

/// MIDI message constants
pub mod messages {
    // Channel Voice Messages (upper nibble, lower nibble is channel 0-15)
    pub const NOTE_OFF: u8 = 0x80;
    pub const NOTE_ON: u8 = 0x90;
    pub const CONTROL_CHANGE: u8 = 0xB0;

    // Controller numbers
    pub const CC_SUSTAIN: u8 = 64;
}
