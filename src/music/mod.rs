// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory core for Scalescope.
//!
//! This module provides pitch-class sets, the scale family catalog,
//! the chord locator, and the harmonic adjacency graph.

pub mod catalog;
pub mod graph;
pub mod locator;
pub mod pitch;

pub use catalog::{CatalogError, FamilyId, ScaleCatalog, ScaleFamily, Transposition};
pub use graph::{Connection, ConnectionTable, GraphError, HarmonicEdge, HarmonicGraph, NodeId};
pub use locator::{ChordLocator, MatchResult};
pub use pitch::{MidiNote, Note, PitchClassSet, Semitones};
