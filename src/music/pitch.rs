// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch classes and pitch-class sets.
//!
//! A pitch class is a note identity modulo 12 (octave-independent).
//! `PitchClassSet` packs the twelve classes into a bitmask so that the
//! matcher can treat "which notes are sounding" as a single small value.

use std::fmt;

/// MIDI note number type (0-127)
pub type MidiNote = u8;

/// Semitone offset type
pub type Semitones = i8;

/// Note names (pitch classes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Note {
    C,
    Cs, // C# / Db
    D,
    Ds, // D# / Eb
    E,
    F,
    Fs, // F# / Gb
    G,
    Gs, // G# / Ab
    A,
    As, // A# / Bb
    B,
}

impl Note {
    /// All notes in chromatic order
    pub const ALL: [Note; 12] = [
        Note::C,
        Note::Cs,
        Note::D,
        Note::Ds,
        Note::E,
        Note::F,
        Note::Fs,
        Note::G,
        Note::Gs,
        Note::A,
        Note::As,
        Note::B,
    ];

    /// Get the pitch class (0-11) for this note
    pub fn pitch_class(self) -> u8 {
        match self {
            Note::C => 0,
            Note::Cs => 1,
            Note::D => 2,
            Note::Ds => 3,
            Note::E => 4,
            Note::F => 5,
            Note::Fs => 6,
            Note::G => 7,
            Note::Gs => 8,
            Note::A => 9,
            Note::As => 10,
            Note::B => 11,
        }
    }

    /// Get note from pitch class
    pub fn from_pitch_class(pc: u8) -> Self {
        Note::ALL[(pc % 12) as usize]
    }

    /// Transpose by semitones
    pub fn transpose(self, semitones: Semitones) -> Self {
        let new_pc = (self.pitch_class() as i8 + semitones).rem_euclid(12) as u8;
        Note::from_pitch_class(new_pc)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Note::C => write!(f, "C"),
            Note::Cs => write!(f, "C#"),
            Note::D => write!(f, "D"),
            Note::Ds => write!(f, "D#"),
            Note::E => write!(f, "E"),
            Note::F => write!(f, "F"),
            Note::Fs => write!(f, "F#"),
            Note::G => write!(f, "G"),
            Note::Gs => write!(f, "G#"),
            Note::A => write!(f, "A"),
            Note::As => write!(f, "A#"),
            Note::B => write!(f, "B"),
        }
    }
}

/// A set of pitch classes packed into the low 12 bits of a `u16`.
///
/// Bit `n` corresponds to pitch class `n` (0 = C, 11 = B). The empty set
/// is valid and means "nothing held". Absolute MIDI notes collapse into
/// pitch classes on entry, so octave duplicates cannot accumulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PitchClassSet(u16);

/// Mask covering the twelve valid bits
const PITCH_CLASS_MASK: u16 = 0x0FFF;

impl PitchClassSet {
    /// The empty set (nothing held)
    pub const EMPTY: PitchClassSet = PitchClassSet(0);

    /// Create an empty set
    pub fn new() -> Self {
        Self::EMPTY
    }

    /// Build a set from absolute MIDI notes, reducing each modulo 12
    pub fn from_notes<I: IntoIterator<Item = MidiNote>>(notes: I) -> Self {
        let mut set = Self::EMPTY;
        for note in notes {
            set.insert(note % 12);
        }
        set
    }

    /// Build a set from pitch classes (each must be in 0..12)
    pub fn from_pitch_classes(classes: &[u8]) -> Self {
        let mut set = Self::EMPTY;
        for &pc in classes {
            set.insert(pc);
        }
        set
    }

    /// Add a pitch class. Precondition: `pc < 12`.
    pub fn insert(&mut self, pc: u8) {
        debug_assert!(pc < 12, "pitch class out of range: {}", pc);
        self.0 |= 1 << pc;
        self.0 &= PITCH_CLASS_MASK;
    }

    /// Remove a pitch class. Precondition: `pc < 12`.
    pub fn remove(&mut self, pc: u8) {
        debug_assert!(pc < 12, "pitch class out of range: {}", pc);
        self.0 &= !(1 << pc);
    }

    /// Check whether a pitch class is present
    pub fn contains(self, pc: u8) -> bool {
        pc < 12 && self.0 & (1 << pc) != 0
    }

    /// Number of pitch classes in the set
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Check whether the set is empty
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate the pitch classes in ascending order
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0u8..12).filter(move |&pc| self.contains(pc))
    }

    /// The notes in this set, in chromatic order
    pub fn notes(self) -> Vec<Note> {
        self.iter().map(Note::from_pitch_class).collect()
    }

    /// Pitch classes present in both sets
    pub fn intersection(self, other: PitchClassSet) -> PitchClassSet {
        PitchClassSet(self.0 & other.0)
    }

    /// Pitch classes present in either set
    pub fn union(self, other: PitchClassSet) -> PitchClassSet {
        PitchClassSet(self.0 | other.0)
    }

    /// Check whether every pitch class here is also in `other`
    pub fn is_subset(self, other: PitchClassSet) -> bool {
        self.0 & other.0 == self.0
    }

    /// The raw 12-bit mask
    pub fn as_mask(self) -> u16 {
        self.0
    }
}

impl fmt::Display for PitchClassSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for pc in self.iter() {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}", Note::from_pitch_class(pc))?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_pitch_class() {
        assert_eq!(Note::C.pitch_class(), 0);
        assert_eq!(Note::A.pitch_class(), 9);
        assert_eq!(Note::B.pitch_class(), 11);
    }

    #[test]
    fn test_note_transpose() {
        assert_eq!(Note::C.transpose(2), Note::D);
        assert_eq!(Note::C.transpose(12), Note::C);
        assert_eq!(Note::C.transpose(-1), Note::B);
        assert_eq!(Note::G.transpose(5), Note::C);
    }

    #[test]
    fn test_from_notes_collapses_octaves() {
        // Middle C, C an octave up, E, G
        let set = PitchClassSet::from_notes([60, 72, 64, 67]);
        assert_eq!(set.len(), 3);
        assert!(set.contains(0));
        assert!(set.contains(4));
        assert!(set.contains(7));
        assert!(!set.contains(1));
    }

    #[test]
    fn test_insert_remove() {
        let mut set = PitchClassSet::new();
        assert!(set.is_empty());

        set.insert(5);
        set.insert(11);
        assert_eq!(set.len(), 2);
        assert!(set.contains(5));

        set.remove(5);
        assert!(!set.contains(5));
        assert!(set.contains(11));

        // Removing an absent class is harmless
        set.remove(5);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_iter_ascending() {
        let set = PitchClassSet::from_pitch_classes(&[7, 0, 4]);
        let classes: Vec<u8> = set.iter().collect();
        assert_eq!(classes, vec![0, 4, 7]);
    }

    #[test]
    fn test_set_operations() {
        let triad = PitchClassSet::from_pitch_classes(&[0, 4, 7]);
        let scale = PitchClassSet::from_pitch_classes(&[0, 2, 4, 5, 7, 9, 11]);

        assert!(triad.is_subset(scale));
        assert!(!scale.is_subset(triad));
        assert_eq!(triad.intersection(scale), triad);
        assert_eq!(triad.union(scale), scale);

        let empty = PitchClassSet::EMPTY;
        assert!(empty.is_subset(triad));
        assert_eq!(empty.union(triad), triad);
    }

    #[test]
    fn test_display() {
        let triad = PitchClassSet::from_pitch_classes(&[0, 4, 7]);
        assert_eq!(triad.to_string(), "C E G");
        assert_eq!(PitchClassSet::EMPTY.to_string(), "");
    }
}
