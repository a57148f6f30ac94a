//! Vector registers.
//!
//! Registers are plain values: they have no address and no identity beyond
//! their lanes. Loading copies memory into lanes, storing copies lanes out;
//! both go through the [`Engine`](crate::simd::engine::Engine) so that the
//! access is masked and logged.

use std::ops::Index;

use crate::simd::traits::Lane;

/// A W-lane register holding one element type.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VecReg<T: Lane, const W: usize> {
    lanes: [T; W],
}

/// Single-precision register, the float variant of the unit.
pub type VecFloat<const W: usize> = VecReg<f32, W>;

/// 32-bit integer register, the integer variant of the unit.
pub type VecInt<const W: usize> = VecReg<i32, W>;

impl<T: Lane, const W: usize> VecReg<T, W> {
    /// A register with every lane set to `T::default()` (zero).
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            lanes: [T::default(); W],
        }
    }

    #[inline(always)]
    pub fn from_lanes(lanes: [T; W]) -> Self {
        Self { lanes }
    }

    #[inline(always)]
    pub fn lanes(&self) -> &[T; W] {
        &self.lanes
    }

    #[inline(always)]
    pub fn lane(&self, lane: usize) -> T {
        self.lanes[lane]
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.lanes.to_vec()
    }

    #[inline(always)]
    pub(crate) fn lanes_mut(&mut self) -> &mut [T; W] {
        &mut self.lanes
    }
}

impl<T: Lane, const W: usize> Default for VecReg<T, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Lane, const W: usize> From<[T; W]> for VecReg<T, W> {
    fn from(lanes: [T; W]) -> Self {
        Self::from_lanes(lanes)
    }
}

impl<T: Lane, const W: usize> Index<usize> for VecReg<T, W> {
    type Output = T;

    fn index(&self, lane: usize) -> &T {
        &self.lanes[lane]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_register_is_zeroed() {
        let float = VecFloat::<4>::new();
        let int = VecInt::<8>::default();
        assert_eq!(float.lanes(), &[0.0; 4]);
        assert_eq!(int.lanes(), &[0; 8]);
    }

    #[test]
    fn registers_are_values() {
        let a = VecFloat::from([1.0, 2.0, 3.0, 4.0]);
        let mut b = a;
        b.lanes_mut()[0] = 9.0;
        assert_eq!(a[0], 1.0);
        assert_eq!(b.lane(0), 9.0);
        assert_eq!(b.to_vec(), vec![9.0, 2.0, 3.0, 4.0]);
    }
}
