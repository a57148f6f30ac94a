//! Lane masks.
//!
//! A [`Mask`] selects which lanes of a W-wide register an instruction touches.
//! The operations here are pure and unlogged; the engine wraps the ones that
//! the simulated unit counts as instructions (`mask_not`, `mask_and`,
//! `mask_or`, `cntbits`).

use std::fmt;
use std::ops::{BitAnd, BitOr, Index, Not};

/// A fixed-width boolean vector; lane `i` is active when bit `i` is set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Mask<const W: usize> {
    lanes: [bool; W],
}

impl<const W: usize> Mask<W> {
    /// Every lane active.
    #[inline(always)]
    pub fn all_ones() -> Self {
        Self { lanes: [true; W] }
    }

    /// No lane active.
    #[inline(always)]
    pub fn zeros() -> Self {
        Self { lanes: [false; W] }
    }

    /// The first `first` lanes active, the rest inactive.
    ///
    /// This is the mask of a partial tail chunk. `first >= W` yields
    /// [`Mask::all_ones`].
    #[inline(always)]
    pub fn ones(first: usize) -> Self {
        let mut lanes = [false; W];
        for (i, lane) in lanes.iter_mut().enumerate() {
            *lane = i < first;
        }
        Self { lanes }
    }

    /// Builds a mask from explicit lane bits.
    #[inline(always)]
    pub fn from_lanes(lanes: [bool; W]) -> Self {
        Self { lanes }
    }

    #[inline(always)]
    pub fn is_active(&self, lane: usize) -> bool {
        self.lanes[lane]
    }

    /// Number of active lanes.
    #[inline(always)]
    pub fn count_ones(&self) -> usize {
        self.lanes.iter().filter(|&&active| active).count()
    }

    #[inline(always)]
    pub fn all(&self) -> bool {
        self.lanes.iter().all(|&active| active)
    }

    #[inline(always)]
    pub fn none(&self) -> bool {
        !self.lanes.iter().any(|&active| active)
    }

    #[inline(always)]
    pub fn lanes(&self) -> &[bool; W] {
        &self.lanes
    }

    /// Iterates over the indices of the active lanes.
    pub fn active_lanes(&self) -> impl Iterator<Item = usize> + '_ {
        self.lanes
            .iter()
            .enumerate()
            .filter_map(|(i, &active)| active.then_some(i))
    }

    pub(crate) fn set(&mut self, lane: usize, active: bool) {
        self.lanes[lane] = active;
    }
}

impl<const W: usize> Default for Mask<W> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<const W: usize> Not for Mask<W> {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self::Output {
        Self {
            lanes: self.lanes.map(|active| !active),
        }
    }
}

impl<const W: usize> BitAnd for Mask<W> {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self::Output {
        let mut lanes = self.lanes;
        for (lane, other) in lanes.iter_mut().zip(rhs.lanes) {
            *lane &= other;
        }
        Self { lanes }
    }
}

impl<const W: usize> BitOr for Mask<W> {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self::Output {
        let mut lanes = self.lanes;
        for (lane, other) in lanes.iter_mut().zip(rhs.lanes) {
            *lane |= other;
        }
        Self { lanes }
    }
}

impl<const W: usize> Index<usize> for Mask<W> {
    type Output = bool;

    fn index(&self, lane: usize) -> &bool {
        &self.lanes[lane]
    }
}

/// Lane occupancy: `*` for an active lane, `_` for an inactive one.
impl<const W: usize> fmt::Display for Mask<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &active in &self.lanes {
            f.write_str(if active { "*" } else { "_" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ones_activates_prefix() {
        let mask = Mask::<8>::ones(3);
        assert_eq!(mask.count_ones(), 3);
        assert!(mask.is_active(0) && mask.is_active(2));
        assert!(!mask.is_active(3) && !mask.is_active(7));
        assert_eq!(Mask::<8>::ones(0), Mask::zeros());
        assert_eq!(Mask::<8>::ones(8), Mask::all_ones());
        assert_eq!(Mask::<8>::ones(42), Mask::all_ones());
    }

    #[test]
    fn complement_is_total() {
        let mask = Mask::<4>::from_lanes([true, false, false, true]);
        assert_eq!(!mask, Mask::from_lanes([false, true, true, false]));
        assert_eq!(!!mask, mask);
        assert_eq!((mask | !mask), Mask::all_ones());
        assert_eq!((mask & !mask), Mask::zeros());
    }

    #[test]
    fn display_shows_occupancy() {
        let mask = Mask::<4>::ones(3);
        assert_eq!(mask.to_string(), "***_");
        assert_eq!(mask.active_lanes().collect::<Vec<_>>(), vec![0, 1, 2]);
    }
}
