// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scalescope: real-time scale finding for live MIDI input.
//!
//! Listens to a MIDI source, tracks which pitch classes are sounding
//! (sustain pedal included), and locates every transposition of every
//! scale family that contains them. Matches drive a terminal UI with a
//! harmonic graph view and a per-family match list.

pub mod config;
pub mod midi;
pub mod music;
pub mod ui;
