//! Slice-level entry points at the crate's default lane width.
//!
//! Each trait comes in three flavours:
//!
//! - `scalar_*`: the scalar reference.
//! - `simd_*`: the kernel on a single simulated [`Engine`].
//! - `par_simd_*`: the kernel split across the rayon pool, one engine per
//!   block.
//!
//! The tallies are discarded here; use the kernels in
//! [`clamped_exp`](crate::simd::clamped_exp), [`array_sum`](crate::simd::array_sum)
//! and [`abs`](crate::simd::abs) directly to inspect them.
//!
//! ```rust
//! use lanesim::{ArraySum, ClampedExp};
//!
//! let values = [2.0f32, 3.0, -1.0, 4.0, 5.0, 2.0];
//! let exponents = [3, 0, 2, 1, 10, 0];
//! let powers = values.as_slice().simd_clamped_exp(exponents.as_slice()).unwrap();
//! assert_eq!(powers, vec![8.0, 1.0, 1.0, 4.0, 9.999999, 1.0]);
//!
//! let total = values.as_slice().simd_sum().unwrap();
//! assert_eq!(total, 15.0);
//! ```

use crate::{
    error::{validation_error, Result},
    simd::{
        abs::{abs_serial, abs_vector, par_abs_vector},
        array_sum::{array_sum_serial, array_sum_vector, par_array_sum_vector},
        clamped_exp::{clamped_exp_serial, clamped_exp_vector, par_clamped_exp_vector},
        engine::Engine,
        logger::Logger,
        traits::{ArraySum, ClampedExp, SimdAbs},
    },
    VECTOR_WIDTH,
};

#[inline(always)]
fn untraced_engine() -> Engine<VECTOR_WIDTH> {
    Engine::with_logger(Logger::with_trace(false))
}

fn ensure_same_len(values: &[f32], exponents: &[i32]) -> Result<()> {
    if values.len() != exponents.len() {
        return Err(validation_error(format!(
            "values and exponents must have the same length (got {} and {})",
            values.len(),
            exponents.len()
        )));
    }
    Ok(())
}

/// Splits `n` into the largest multiple of the default width and the tail.
#[inline(always)]
fn split_whole_chunks(n: usize) -> usize {
    n - n % VECTOR_WIDTH
}

impl<'b> ClampedExp<&'b [i32]> for &[f32] {
    type Output = Result<Vec<f32>>;

    fn simd_clamped_exp(self, exponents: &'b [i32]) -> Self::Output {
        ensure_same_len(self, exponents)?;

        let mut output = vec![0.0; self.len()];
        clamped_exp_vector(&mut untraced_engine(), self, exponents, &mut output, self.len())?;
        Ok(output)
    }

    fn par_simd_clamped_exp(self, exponents: &'b [i32]) -> Self::Output {
        ensure_same_len(self, exponents)?;

        let mut output = vec![0.0; self.len()];
        par_clamped_exp_vector::<VECTOR_WIDTH>(self, exponents, &mut output, self.len(), false)?;
        Ok(output)
    }

    fn scalar_clamped_exp(self, exponents: &'b [i32]) -> Self::Output {
        ensure_same_len(self, exponents)?;

        let mut output = vec![0.0; self.len()];
        clamped_exp_serial(self, exponents, &mut output, self.len())?;
        Ok(output)
    }
}

/// The tree only handles whole chunks; a ragged tail is added with the
/// scalar reference.
impl ArraySum for &[f32] {
    type Output = Result<f32>;

    fn simd_sum(self) -> Self::Output {
        let whole = split_whole_chunks(self.len());

        let head = array_sum_vector(&mut untraced_engine(), self, whole)?;
        let tail = array_sum_serial(&self[whole..], self.len() - whole)?;
        Ok(head + tail)
    }

    fn par_simd_sum(self) -> Self::Output {
        let whole = split_whole_chunks(self.len());

        let (head, _) = par_array_sum_vector::<VECTOR_WIDTH>(self, whole, false)?;
        let tail = array_sum_serial(&self[whole..], self.len() - whole)?;
        Ok(head + tail)
    }

    fn scalar_sum(self) -> Self::Output {
        array_sum_serial(self, self.len())
    }
}

impl SimdAbs for &[f32] {
    type Output = Result<Vec<f32>>;

    fn simd_abs(self) -> Self::Output {
        let mut output = vec![0.0; self.len()];
        abs_vector(&mut untraced_engine(), self, &mut output, self.len())?;
        Ok(output)
    }

    fn par_simd_abs(self) -> Self::Output {
        let mut output = vec![0.0; self.len()];
        par_abs_vector::<VECTOR_WIDTH>(self, &mut output, self.len(), false)?;
        Ok(output)
    }

    fn scalar_abs(self) -> Self::Output {
        let mut output = vec![0.0; self.len()];
        abs_serial(self, &mut output, self.len())?;
        Ok(output)
    }
}
