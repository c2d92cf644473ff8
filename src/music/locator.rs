// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord location by cyclic pattern matching.
//!
//! For each family the locator tries every rotation of the step pattern
//! against the held pitch classes. Rotating the pattern left by `k` and
//! finding all held classes on scale degrees means the family transposed
//! up by `(n - k) % n` contains the chord. Matching rotations and
//! transpositions are in bijection, so the per-family result lists are
//! duplicate-free by construction.

use super::catalog::{FamilyId, ScaleCatalog, Transposition};
use super::pitch::PitchClassSet;

/// Matching transpositions per family, parallel to the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    locations: Vec<Vec<Transposition>>,
}

impl MatchResult {
    /// The no-information result: every transposition of every family.
    ///
    /// This is what an empty held set produces, so silence lights up the
    /// whole graph instead of nothing.
    pub fn full_range(catalog: &ScaleCatalog) -> Self {
        MatchResult {
            locations: catalog
                .iter()
                .map(|family| family.transpositions().collect())
                .collect(),
        }
    }

    /// Matching transpositions for one family, ascending
    pub fn for_family(&self, id: FamilyId) -> &[Transposition] {
        self.locations.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate (family, transpositions) pairs in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (FamilyId, &[Transposition])> {
        self.locations
            .iter()
            .enumerate()
            .map(|(id, ts)| (id, ts.as_slice()))
    }

    /// Total number of matching (family, transposition) pairs
    pub fn total_matches(&self) -> usize {
        self.locations.iter().map(Vec::len).sum()
    }

    /// Check whether any family matched at all
    pub fn has_matches(&self) -> bool {
        self.locations.iter().any(|ts| !ts.is_empty())
    }
}

/// Locates the held pitch classes within every scale family
#[derive(Debug, Clone)]
pub struct ChordLocator {
    catalog: ScaleCatalog,
}

impl ChordLocator {
    /// Create a locator over a catalog
    pub fn new(catalog: ScaleCatalog) -> Self {
        ChordLocator { catalog }
    }

    /// The catalog this locator matches against
    pub fn catalog(&self) -> &ScaleCatalog {
        &self.catalog
    }

    /// Find every (family, transposition) whose scale contains `held`.
    ///
    /// An empty held set returns the full range.
    pub fn locate(&self, held: PitchClassSet) -> MatchResult {
        if held.is_empty() {
            return MatchResult::full_range(&self.catalog);
        }

        let mut locations = Vec::with_capacity(self.catalog.len());
        for family in self.catalog.iter() {
            let n = family.n_steps();
            let mut found: Vec<Transposition> = Vec::new();
            for k in 0..n {
                if held.iter().all(|pc| family.step(k + pc as usize)) {
                    found.push(((n - k) % n) as Transposition);
                }
            }
            found.sort_unstable();
            locations.push(found);
        }
        MatchResult { locations }
    }
}
