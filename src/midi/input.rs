// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! MIDI input handling for receiving messages from controllers.
//!
//! The connection callback runs on the OS MIDI thread, so parsed
//! messages cross into the main loop over an mpsc channel and are
//! drained once per frame.

use std::sync::mpsc::{self, Receiver, Sender};

use anyhow::{anyhow, Result};
use midir::{Ignore, MidiInputConnection};
use tracing::debug;

use super::messages;

/// Parsed MIDI message types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MidiMessage {
    /// Note On: channel (0-15), note (0-127), velocity (1-127)
    NoteOn { channel: u8, note: u8, velocity: u8 },
    /// Note Off: channel (0-15), note (0-127), velocity (0-127)
    NoteOff { channel: u8, note: u8, velocity: u8 },
    /// Control Change: channel (0-15), controller (0-127), value (0-127)
    ControlChange { channel: u8, controller: u8, value: u8 },
    /// Unknown/unparsed message
    Unknown(Vec<u8>),
}

impl MidiMessage {
    /// Parse raw MIDI bytes into a MidiMessage
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.is_empty() {
            return None;
        }

        let status = data[0];
        let msg_type = status & 0xF0;
        let channel = status & 0x0F;

        match msg_type {
            messages::NOTE_OFF if data.len() >= 3 => Some(MidiMessage::NoteOff {
                channel,
                note: data[1] & 0x7F,
                velocity: data[2] & 0x7F,
            }),
            messages::NOTE_ON if data.len() >= 3 => {
                let velocity = data[2] & 0x7F;
                // Note On with velocity 0 is equivalent to Note Off
                if velocity == 0 {
                    Some(MidiMessage::NoteOff {
                        channel,
                        note: data[1] & 0x7F,
                        velocity: 0,
                    })
                } else {
                    Some(MidiMessage::NoteOn {
                        channel,
                        note: data[1] & 0x7F,
                        velocity,
                    })
                }
            }
            messages::CONTROL_CHANGE if data.len() >= 3 => Some(MidiMessage::ControlChange {
                channel,
                controller: data[1] & 0x7F,
                value: data[2] & 0x7F,
            }),
            _ => Some(MidiMessage::Unknown(data.to_vec())),
        }
    }

    /// The channel this message arrived on, if it is a channel message
    pub fn channel(&self) -> Option<u8> {
        match self {
            MidiMessage::NoteOn { channel, .. }
            | MidiMessage::NoteOff { channel, .. }
            | MidiMessage::ControlChange { channel, .. } => Some(*channel),
            MidiMessage::Unknown(_) => None,
        }
    }
}

/// MIDI input handler
pub struct MidiInput {
    _connection: MidiInputConnection<()>,
    receiver: Receiver<MidiMessage>,
    source_name: String,
}

impl MidiInput {
    /// Create a new MIDI input connected to the specified source
    pub fn new(source_index: usize) -> Result<Self> {
        let mut input = midir::MidiInput::new("Scalescope Input")
            .map_err(|e| anyhow!("Failed to create MIDI client: {:?}", e))?;
        input.ignore(Ignore::None);

        let ports = input.ports();
        let port = ports
            .get(source_index)
            .ok_or_else(|| anyhow!("MIDI source {} not found", source_index))?;
        let source_name = input
            .port_name(port)
            .unwrap_or_else(|_| format!("Unknown {}", source_index));

        let (tx, rx): (Sender<MidiMessage>, Receiver<MidiMessage>) = mpsc::channel();

        let connection = input
            .connect(
                port,
                "scalescope-input",
                move |_timestamp, data, _| {
                    if let Some(msg) = MidiMessage::parse(data) {
                        let _ = tx.send(msg);
                    }
                },
                (),
            )
            .map_err(|e| anyhow!("Failed to connect to source: {:?}", e))?;

        debug!("Connected to MIDI source {}: {}", source_index, source_name);

        Ok(Self {
            _connection: connection,
            receiver: rx,
            source_name,
        })
    }

    /// The name of the connected source
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Try to receive the next MIDI message (non-blocking)
    pub fn try_recv(&self) -> Option<MidiMessage> {
        self.receiver.try_recv().ok()
    }

    /// Receive all pending MIDI messages
    pub fn recv_all(&self) -> Vec<MidiMessage> {
        let mut messages = Vec::new();
        while let Some(msg) = self.try_recv() {
            messages.push(msg);
        }
        messages
    }
}

/// List all available MIDI sources
pub fn list_sources() -> Vec<(usize, String)> {
    let mut result = Vec::new();

    if let Ok(input) = midir::MidiInput::new("Scalescope Probe") {
        for (i, port) in input.ports().iter().enumerate() {
            let name = input
                .port_name(port)
                .unwrap_or_else(|_| format!("Unknown {}", i));
            result.push((i, name));
        }
    }

    result
}

/// Get the number of available MIDI sources
pub fn source_count() -> usize {
    midir::MidiInput::new("Scalescope Probe")
        .map(|input| input.ports().len())
        .unwrap_or(0)
}

/// Print all available MIDI sources to stdout
pub fn print_sources() {
    let sources = list_sources();
    if sources.is_empty() {
        println!("No MIDI sources found.");
    } else {
        println!("Available MIDI sources (inputs):");
        for (i, name) in sources {
            println!("  {}: {}", i, name);
        }
    }
}
