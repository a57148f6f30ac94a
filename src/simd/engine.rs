//! The simulated vector execution unit.
//!
//! # Predication
//!
//! Every arithmetic and memory instruction takes an explicit [`Mask`]. Lanes
//! active under the mask receive the instruction's effect; inactive lanes of
//! the destination are left exactly as they were (merge semantics). An
//! if/else therefore becomes two instructions, one under a mask and one under
//! its complement, which never touch the same lane.
//!
//! Comparisons are the exception: they overwrite the whole result mask, and a
//! lane inactive under the predicate always yields `false`.
//!
//! # Memory
//!
//! `vload` and `vstore` address lane `i` at `memory[i]`, and only for active
//! lanes. A tail mask such as `Mask::ones(n % W)` therefore lets a kernel work
//! on a slice shorter than W without touching anything past its end. An active
//! lane that falls outside the slice panics like any out-of-bounds index.
//!
//! # Accounting
//!
//! Each call is reported to the engine's [`Logger`] with the mask it ran under;
//! unconditional instructions (`hadd`, `interleave`, the mask instructions) are
//! reported with every lane active.
//!
//! # Example
//!
//! ```rust
//! use lanesim::simd::{Engine, Mask, VecFloat};
//!
//! let mut engine = Engine::<4>::new();
//! let mut x = VecFloat::<4>::new();
//! engine.vload(&mut x, &[1.0, -2.0, 3.0], Mask::ones(3));
//! let zero = engine.vsplat(0.0);
//!
//! let negative = engine.vlt(&x, &zero, Mask::ones(3));
//! let mut result = x;
//! engine.vsub(&mut result, &zero, &x, negative);
//! assert_eq!(result.lanes(), &[1.0, 2.0, 3.0, 0.0]);
//! assert_eq!(engine.logger().stats().total_instructions, 4);
//! ```

use crate::simd::{
    logger::{Instruction, Logger},
    mask::Mask,
    register::VecReg,
    traits::Lane,
};

/// A W-lane vector unit with its execution log.
#[derive(Clone, Debug)]
pub struct Engine<const W: usize> {
    logger: Logger<W>,
}

impl<const W: usize> Default for Engine<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize> Engine<W> {
    const VALID_WIDTH: () = assert!(
        W > 0 && W.is_power_of_two(),
        "lane width must be a non-zero power of two"
    );

    /// An engine that records the full instruction trace.
    pub fn new() -> Self {
        Self::with_logger(Logger::new())
    }

    /// An engine reporting to `logger`.
    #[allow(clippy::let_unit_value)]
    pub fn with_logger(logger: Logger<W>) -> Self {
        let () = Self::VALID_WIDTH;
        Self { logger }
    }

    /// The configured lane width W.
    #[inline(always)]
    pub const fn lane_width(&self) -> usize {
        W
    }

    pub fn logger(&self) -> &Logger<W> {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut Logger<W> {
        &mut self.logger
    }

    pub fn into_logger(self) -> Logger<W> {
        self.logger
    }

    // ============================================================================================
    // MEMORY
    // ============================================================================================

    /// Broadcasts `value` into the active lanes of `dst`.
    pub fn vset<T: Lane>(&mut self, dst: &mut VecReg<T, W>, value: T, mask: Mask<W>) {
        predicated(dst, mask, |_| value);
        self.logger.record(Instruction::Set, mask);
    }

    /// A fresh register with `value` in every lane (a full-mask `vset`).
    pub fn vsplat<T: Lane>(&mut self, value: T) -> VecReg<T, W> {
        let mut reg = VecReg::new();
        self.vset(&mut reg, value, Mask::all_ones());
        reg
    }

    /// Copies `memory[i]` into lane `i` for every active lane.
    pub fn vload<T: Lane>(&mut self, dst: &mut VecReg<T, W>, memory: &[T], mask: Mask<W>) {
        predicated(dst, mask, |lane| memory[lane]);
        self.logger.record(Instruction::Load, mask);
    }

    /// Copies lane `i` into `memory[i]` for every active lane.
    pub fn vstore<T: Lane>(&mut self, memory: &mut [T], src: &VecReg<T, W>, mask: Mask<W>) {
        for lane in mask.active_lanes() {
            memory[lane] = src[lane];
        }
        self.logger.record(Instruction::Store, mask);
    }

    /// Copies the active lanes of `src` into `dst`.
    pub fn vmove<T: Lane>(&mut self, dst: &mut VecReg<T, W>, src: &VecReg<T, W>, mask: Mask<W>) {
        predicated(dst, mask, |lane| src[lane]);
        self.logger.record(Instruction::Move, mask);
    }

    // ============================================================================================
    // ARITHMETIC
    // ============================================================================================

    pub fn vadd<T: Lane>(
        &mut self,
        dst: &mut VecReg<T, W>,
        a: &VecReg<T, W>,
        b: &VecReg<T, W>,
        mask: Mask<W>,
    ) {
        predicated(dst, mask, |lane| a[lane] + b[lane]);
        self.logger.record(Instruction::Add, mask);
    }

    pub fn vsub<T: Lane>(
        &mut self,
        dst: &mut VecReg<T, W>,
        a: &VecReg<T, W>,
        b: &VecReg<T, W>,
        mask: Mask<W>,
    ) {
        predicated(dst, mask, |lane| a[lane] - b[lane]);
        self.logger.record(Instruction::Sub, mask);
    }

    pub fn vmult<T: Lane>(
        &mut self,
        dst: &mut VecReg<T, W>,
        a: &VecReg<T, W>,
        b: &VecReg<T, W>,
        mask: Mask<W>,
    ) {
        predicated(dst, mask, |lane| a[lane] * b[lane]);
        self.logger.record(Instruction::Mult, mask);
    }

    /// Lane-wise `a / b`.
    ///
    /// # Panics
    ///
    /// Integer lanes panic on an active lane whose divisor is zero. Float
    /// lanes follow IEEE 754.
    pub fn vdiv<T: Lane>(
        &mut self,
        dst: &mut VecReg<T, W>,
        a: &VecReg<T, W>,
        b: &VecReg<T, W>,
        mask: Mask<W>,
    ) {
        predicated(dst, mask, |lane| a[lane] / b[lane]);
        self.logger.record(Instruction::Div, mask);
    }

    pub fn vabs<T: Lane + num::Signed>(
        &mut self,
        dst: &mut VecReg<T, W>,
        a: &VecReg<T, W>,
        mask: Mask<W>,
    ) {
        predicated(dst, mask, |lane| a[lane].abs());
        self.logger.record(Instruction::Abs, mask);
    }

    // ============================================================================================
    // COMPARISON
    // ============================================================================================

    /// Lane-wise `a > b`, restricted to the lanes active under `predicate`.
    pub fn vgt<T: Lane>(&mut self, a: &VecReg<T, W>, b: &VecReg<T, W>, predicate: Mask<W>) -> Mask<W> {
        let result = compare(a, b, predicate, |x, y| x > y);
        self.logger.record(Instruction::Gt, predicate);
        result
    }

    /// Lane-wise `a < b`, restricted to the lanes active under `predicate`.
    pub fn vlt<T: Lane>(&mut self, a: &VecReg<T, W>, b: &VecReg<T, W>, predicate: Mask<W>) -> Mask<W> {
        let result = compare(a, b, predicate, |x, y| x < y);
        self.logger.record(Instruction::Lt, predicate);
        result
    }

    /// Lane-wise `a == b`, restricted to the lanes active under `predicate`.
    pub fn veq<T: Lane>(&mut self, a: &VecReg<T, W>, b: &VecReg<T, W>, predicate: Mask<W>) -> Mask<W> {
        let result = compare(a, b, predicate, |x, y| x == y);
        self.logger.record(Instruction::Eq, predicate);
        result
    }

    // ============================================================================================
    // MASK INSTRUCTIONS
    // ============================================================================================

    pub fn mask_not(&mut self, mask: Mask<W>) -> Mask<W> {
        self.logger.record(Instruction::MaskNot, Mask::all_ones());
        !mask
    }

    pub fn mask_and(&mut self, a: Mask<W>, b: Mask<W>) -> Mask<W> {
        self.logger.record(Instruction::MaskAnd, Mask::all_ones());
        a & b
    }

    pub fn mask_or(&mut self, a: Mask<W>, b: Mask<W>) -> Mask<W> {
        self.logger.record(Instruction::MaskOr, Mask::all_ones());
        a | b
    }

    /// Population count of `mask`.
    pub fn cntbits(&mut self, mask: Mask<W>) -> usize {
        self.logger.record(Instruction::CntBits, Mask::all_ones());
        mask.count_ones()
    }

    // ============================================================================================
    // HORIZONTAL
    // ============================================================================================

    /// Pairwise horizontal add: lanes `2i` and `2i + 1` of `dst` both receive
    /// `src[2i] + src[2i + 1]`. Ignores masking; overwrites all of `dst`.
    pub fn hadd<T: Lane>(&mut self, dst: &mut VecReg<T, W>, src: &VecReg<T, W>) {
        let lanes = dst.lanes_mut();
        for pair in 0..W / 2 {
            let sum = src[2 * pair] + src[2 * pair + 1];
            lanes[2 * pair] = sum;
            lanes[2 * pair + 1] = sum;
        }
        if W == 1 {
            lanes[0] = src[0];
        }
        self.logger.record(Instruction::Hadd, Mask::all_ones());
    }

    /// Even/odd interleave: even-indexed lanes of `src` fill the front half of
    /// `dst` in order, odd-indexed lanes the back half.
    ///
    /// `[0 1 2 3 4 5 6 7]` becomes `[0 2 4 6 1 3 5 7]`, so after a `hadd` the
    /// distinct partial sums sit next to each other for the next round.
    pub fn interleave<T: Lane>(&mut self, dst: &mut VecReg<T, W>, src: &VecReg<T, W>) {
        let half = W / 2;
        let lanes = dst.lanes_mut();
        for i in 0..half {
            lanes[i] = src[2 * i];
            lanes[half + i] = src[2 * i + 1];
        }
        if W == 1 {
            lanes[0] = src[0];
        }
        self.logger.record(Instruction::Interleave, Mask::all_ones());
    }
}

/// Writes `value(lane)` into every lane of `dst` active under `mask`.
#[inline(always)]
fn predicated<T: Lane, const W: usize>(
    dst: &mut VecReg<T, W>,
    mask: Mask<W>,
    mut value: impl FnMut(usize) -> T,
) {
    let lanes = dst.lanes_mut();
    for lane in mask.active_lanes() {
        lanes[lane] = value(lane);
    }
}

#[inline(always)]
fn compare<T: Lane, const W: usize>(
    a: &VecReg<T, W>,
    b: &VecReg<T, W>,
    predicate: Mask<W>,
    op: impl Fn(T, T) -> bool,
) -> Mask<W> {
    let mut result = Mask::zeros();
    for lane in 0..W {
        let hit = op(a[lane], b[lane]);
        result.set(lane, predicate[lane] && hit);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::register::{VecFloat, VecInt};

    #[test]
    fn lane_width_matches_parameter() {
        assert_eq!(Engine::<1>::new().lane_width(), 1);
        assert_eq!(Engine::<8>::new().lane_width(), 8);
    }

    #[test]
    fn hadd_duplicates_pair_sums() {
        let mut engine = Engine::<4>::new();
        let src = VecFloat::from([1.0, 2.0, 3.0, 4.0]);
        let mut dst = VecFloat::new();
        engine.hadd(&mut dst, &src);
        assert_eq!(dst.lanes(), &[3.0, 3.0, 7.0, 7.0]);
    }

    #[test]
    fn interleave_splits_even_and_odd() {
        let mut engine = Engine::<8>::new();
        let src = VecInt::from([0, 1, 2, 3, 4, 5, 6, 7]);
        let mut dst = VecInt::new();
        engine.interleave(&mut dst, &src);
        assert_eq!(dst.lanes(), &[0, 2, 4, 6, 1, 3, 5, 7]);
    }

    #[test]
    fn compare_drops_inactive_lanes() {
        let mut engine = Engine::<4>::new();
        let a = VecInt::from([5, 5, 5, 5]);
        let b = VecInt::from([1, 9, 1, 1]);
        let gt = engine.vgt(&a, &b, Mask::ones(3));
        assert_eq!(gt, Mask::from_lanes([true, false, true, false]));
    }

    #[test]
    fn mask_instructions_are_logged_full_width() {
        let mut engine = Engine::<4>::new();
        let mask = Mask::ones(1);
        let not = engine.mask_not(mask);
        assert_eq!(engine.cntbits(not), 3);

        let stats = engine.logger().stats();
        assert_eq!(stats.total_instructions, 2);
        assert_eq!(stats.utilized_lanes, 8);
    }
}
