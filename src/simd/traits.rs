use std::fmt::Debug;

/// Element type of a register lane.
///
/// Any primitive number with a zero default qualifies; the unit ships float
/// (`f32`) and integer (`i32`) registers.
pub trait Lane: num::Num + Copy + PartialOrd + Default + Debug + Send + Sync {}

impl<T> Lane for T where T: num::Num + Copy + PartialOrd + Default + Debug + Send + Sync {}

/// Clamped exponentiation over slices: `values[i]` raised to `exponents[i]`,
/// capped at [`CLAMP_CEILING`](crate::CLAMP_CEILING).
pub trait ClampedExp<Rhs = Self> {
    type Output;

    fn simd_clamped_exp(self, rhs: Rhs) -> Self::Output;
    fn par_simd_clamped_exp(self, rhs: Rhs) -> Self::Output;
    fn scalar_clamped_exp(self, rhs: Rhs) -> Self::Output;
}

/// Sum of all elements of a slice.
pub trait ArraySum {
    type Output;

    fn simd_sum(self) -> Self::Output;
    fn par_simd_sum(self) -> Self::Output;
    fn scalar_sum(self) -> Self::Output;
}

/// Element-wise absolute value.
pub trait SimdAbs {
    type Output;

    fn simd_abs(self) -> Self::Output;
    fn par_simd_abs(self) -> Self::Output;
    fn scalar_abs(self) -> Self::Output;
}
