//! Buffer helpers for driving the kernels.

use crate::simd::traits::Lane;

/// Allocates a zeroed buffer for `len` logical elements plus one register
/// (`width` lanes) of padding.
///
/// The kernels never touch the padding, which is what makes it useful: a
/// caller can place sentinels there, or compare it against a reference
/// buffer to catch out-of-bounds writes.
///
/// # Example
///
/// ```rust
/// use lanesim::utils::padded_vec;
///
/// let buffer: Vec<f32> = padded_vec(6, 4);
/// assert_eq!(buffer.len(), 10);
/// assert!(buffer.iter().all(|&x| x == 0.0));
/// ```
#[inline(always)]
pub fn padded_vec<T: Lane>(len: usize, width: usize) -> Vec<T> {
    vec![T::default(); len + width]
}

/// Index of the first element where `output` and `reference` differ by more
/// than `epsilon`, over their common length.
///
/// NaN compares as a mismatch.
#[allow(clippy::neg_cmp_op_on_partial_ord)]
pub fn first_mismatch(output: &[f32], reference: &[f32], epsilon: f32) -> Option<usize> {
    output
        .iter()
        .zip(reference)
        .position(|(&a, &b)| !((a - b).abs() <= epsilon))
}
