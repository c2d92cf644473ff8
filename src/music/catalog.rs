// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scale family catalog.
//!
//! A scale family is a cyclic binary pattern of scale steps. Families whose
//! pattern is shorter than 12 repeat to fill the octave (whole tone,
//! octatonic, augmented), which is why they have fewer distinct
//! transpositions than the 12-step families.

use std::fmt;

use thiserror::Error;

use super::pitch::PitchClassSet;

/// Index of a family within its catalog
pub type FamilyId = usize;

/// A transposition of a family, in 0..n_steps
pub type Transposition = u8;

/// Errors raised while building a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("scale family '{0}' has an empty pattern")]
    EmptyPattern(String),

    #[error("scale family '{0}' has no scale degrees")]
    NoScaleDegrees(String),

    #[error("scale family '{name}' pattern length {len} does not divide the octave")]
    BadPeriod { name: String, len: usize },
}

/// A scale family: a named cyclic step pattern
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleFamily {
    name: String,
    label: String,
    pattern: Vec<bool>,
    radius: f64,
}

impl ScaleFamily {
    /// Create a family from a 0/1 step pattern (nonzero = scale degree).
    ///
    /// The pattern length must divide 12 so the pattern tiles the octave.
    pub fn new(name: &str, label: &str, pattern: &[u8], radius: f64) -> Result<Self, CatalogError> {
        if pattern.is_empty() {
            return Err(CatalogError::EmptyPattern(name.to_string()));
        }
        if pattern.iter().all(|&step| step == 0) {
            return Err(CatalogError::NoScaleDegrees(name.to_string()));
        }
        if 12 % pattern.len() != 0 {
            return Err(CatalogError::BadPeriod {
                name: name.to_string(),
                len: pattern.len(),
            });
        }
        Ok(ScaleFamily {
            name: name.to_string(),
            label: label.to_string(),
            pattern: pattern.iter().map(|&step| step != 0).collect(),
            radius,
        })
    }

    /// Short key used in config files and connection tables
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable label for display
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of distinct transpositions (the pattern period)
    pub fn n_steps(&self) -> usize {
        self.pattern.len()
    }

    /// Layout radius for the graph view
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Whether step `index` of the untransposed pattern is a scale degree
    pub fn step(&self, index: usize) -> bool {
        self.pattern[index % self.pattern.len()]
    }

    /// Whether this family at transposition `t` contains pitch class `pc`
    pub fn contains(&self, pc: u8, t: Transposition) -> bool {
        let n = self.pattern.len();
        self.pattern[(pc as usize + n - t as usize) % n]
    }

    /// All pitch classes of this family at transposition `t`
    pub fn pitch_classes(&self, t: Transposition) -> PitchClassSet {
        let mut set = PitchClassSet::new();
        for pc in 0..12 {
            if self.contains(pc, t) {
                set.insert(pc);
            }
        }
        set
    }

    /// All transpositions of this family, ascending
    pub fn transpositions(&self) -> impl Iterator<Item = Transposition> {
        0..self.pattern.len() as Transposition
    }
}

impl fmt::Display for ScaleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// An ordered collection of scale families
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleCatalog {
    families: Vec<ScaleFamily>,
}

impl ScaleCatalog {
    /// Create a catalog from a family list
    pub fn new(families: Vec<ScaleFamily>) -> Self {
        ScaleCatalog { families }
    }

    /// The standard seven-family catalog.
    ///
    /// Radii order the graph view from outer ring (major) to center
    /// (whole tone), largest families outermost.
    pub fn standard() -> Self {
        let families = vec![
            standard_family("major", "Major", &[1, 0, 1, 0, 1, 1, 0, 1, 0, 1, 0, 1], 1.0),
            standard_family(
                "melodic_minor",
                "Melodic Minor",
                &[1, 0, 1, 1, 0, 1, 0, 1, 0, 1, 0, 1],
                0.85,
            ),
            standard_family(
                "harmonic_major",
                "Harmonic Major",
                &[1, 0, 1, 0, 1, 1, 0, 1, 1, 0, 0, 1],
                0.70,
            ),
            standard_family(
                "harmonic_minor",
                "Harmonic Minor",
                &[1, 0, 1, 1, 0, 1, 0, 1, 1, 0, 0, 1],
                0.55,
            ),
            standard_family("wholetone", "Whole Tone", &[1, 0], 0.16),
            standard_family("octatonic", "Octatonic", &[1, 0, 1], 0.28),
            standard_family("augmented", "Augmented", &[1, 0, 0, 1], 0.40),
        ];
        ScaleCatalog { families }
    }

    /// Number of families
    pub fn len(&self) -> usize {
        self.families.len()
    }

    /// Check whether the catalog has no families
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Iterate families in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &ScaleFamily> {
        self.families.iter()
    }

    /// Get a family by index
    pub fn family(&self, id: FamilyId) -> Option<&ScaleFamily> {
        self.families.get(id)
    }

    /// Find a family by its short name
    pub fn find(&self, name: &str) -> Option<FamilyId> {
        self.families.iter().position(|f| f.name == name)
    }

    /// Total node count across all families (sum of n_steps)
    pub fn total_transpositions(&self) -> usize {
        self.families.iter().map(|f| f.n_steps()).sum()
    }
}

/// Build one entry of the standard catalog. The table above is known
/// good, so validation failures cannot occur here.
fn standard_family(name: &str, label: &str, pattern: &[u8], radius: f64) -> ScaleFamily {
    ScaleFamily {
        name: name.to_string(),
        label: label.to_string(),
        pattern: pattern.iter().map(|&step| step != 0).collect(),
        radius,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_shape() {
        let catalog = ScaleCatalog::standard();
        assert_eq!(catalog.len(), 7);

        let steps: Vec<usize> = catalog.iter().map(|f| f.n_steps()).collect();
        assert_eq!(steps, vec![12, 12, 12, 12, 2, 3, 4]);
        assert_eq!(catalog.total_transpositions(), 57);
    }

    #[test]
    fn test_find_by_name() {
        let catalog = ScaleCatalog::standard();
        assert_eq!(catalog.find("major"), Some(0));
        assert_eq!(catalog.find("wholetone"), Some(4));
        assert_eq!(catalog.find("dorian"), None);
    }

    #[test]
    fn test_major_membership() {
        let catalog = ScaleCatalog::standard();
        let major = catalog.family(0).unwrap();

        // C major at t=0: C D E F G A B
        let c_major = major.pitch_classes(0);
        assert_eq!(c_major.to_string(), "C D E F G A B");

        // G major at t=7 has F# and no F
        assert!(major.contains(6, 7));
        assert!(!major.contains(5, 7));
    }

    #[test]
    fn test_short_pattern_membership() {
        let catalog = ScaleCatalog::standard();
        let wholetone = catalog.family(catalog.find("wholetone").unwrap()).unwrap();

        // t=0 holds the even classes, t=1 the odd ones
        for pc in 0..12u8 {
            assert_eq!(wholetone.contains(pc, 0), pc % 2 == 0);
            assert_eq!(wholetone.contains(pc, 1), pc % 2 == 1);
        }
        assert_eq!(wholetone.pitch_classes(0).len(), 6);
    }

    #[test]
    fn test_augmented_membership() {
        let catalog = ScaleCatalog::standard();
        let augmented = catalog.family(catalog.find("augmented").unwrap()).unwrap();

        // Pattern [1,0,0,1] at t=0: 0, 3, 4, 7, 8, 11
        let pcs: Vec<u8> = augmented.pitch_classes(0).iter().collect();
        assert_eq!(pcs, vec![0, 3, 4, 7, 8, 11]);
    }

    #[test]
    fn test_family_validation() {
        assert!(ScaleFamily::new("ok", "Ok", &[1, 0, 1], 0.5).is_ok());

        assert!(matches!(
            ScaleFamily::new("bad", "Bad", &[], 0.5),
            Err(CatalogError::EmptyPattern(_))
        ));
        assert!(matches!(
            ScaleFamily::new("bad", "Bad", &[0, 0], 0.5),
            Err(CatalogError::NoScaleDegrees(_))
        ));
        assert!(matches!(
            ScaleFamily::new("bad", "Bad", &[1, 0, 1, 0, 1], 0.5),
            Err(CatalogError::BadPeriod { len: 5, .. })
        ));
    }

    #[test]
    fn test_transpositions_iterator() {
        let family = ScaleFamily::new("oct", "Octatonic", &[1, 0, 1], 0.3).unwrap();
        let ts: Vec<Transposition> = family.transpositions().collect();
        assert_eq!(ts, vec![0, 1, 2]);
    }
}
