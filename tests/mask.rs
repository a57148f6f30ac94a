//! Mask algebra: totality of the complement, popcounts, and the predicate
//! contract of the comparison instructions.

use lanesim::simd::{Engine, Mask, VecFloat, VecInt};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_mask<const W: usize>(rng: &mut StdRng) -> Mask<W> {
    let mut lanes = [false; W];
    for lane in lanes.iter_mut() {
        *lane = rng.random_bool(0.5);
    }
    Mask::from_lanes(lanes)
}

fn check_totality<const W: usize>(rng: &mut StdRng) {
    assert_eq!(Mask::<W>::all_ones().count_ones(), W);
    assert_eq!(Mask::<W>::zeros().count_ones(), 0);

    for k in 0..=W {
        let mask = Mask::<W>::ones(k);
        assert_eq!(mask.count_ones(), k, "ones({k}) at width {W}");
        assert_eq!((!mask).count_ones(), W - k);
    }

    for _ in 0..64 {
        let mask = random_mask::<W>(rng);
        assert_eq!(!!mask, mask);
        assert_eq!(mask.count_ones() + (!mask).count_ones(), W);
        assert_eq!(mask | !mask, Mask::all_ones());
        assert_eq!(mask & !mask, Mask::zeros());
    }
}

#[test]
fn test_mask_totality_across_widths() {
    let mut rng = StdRng::seed_from_u64(12345);
    check_totality::<1>(&mut rng);
    check_totality::<2>(&mut rng);
    check_totality::<4>(&mut rng);
    check_totality::<8>(&mut rng);
    check_totality::<16>(&mut rng);
    check_totality::<32>(&mut rng);
}

#[test]
fn test_engine_mask_instructions_match_pure_algebra() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut engine = Engine::<8>::new();

    for _ in 0..32 {
        let a = random_mask::<8>(&mut rng);
        let b = random_mask::<8>(&mut rng);

        assert_eq!(engine.mask_not(a), !a);
        assert_eq!(engine.mask_and(a, b), a & b);
        assert_eq!(engine.mask_or(a, b), a | b);
        assert_eq!(engine.cntbits(a), a.count_ones());
    }
}

#[test]
fn test_comparisons_respect_predicate() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut engine = Engine::<16>::new();

    for _ in 0..32 {
        let mut a = [0.0f32; 16];
        let mut b = [0.0f32; 16];
        for i in 0..16 {
            a[i] = rng.random_range(-2.0..2.0);
            // force some equal lanes
            b[i] = if rng.random_bool(0.25) { a[i] } else { rng.random_range(-2.0..2.0) };
        }
        let (va, vb) = (VecFloat::from(a), VecFloat::from(b));
        let predicate = random_mask::<16>(&mut rng);

        let gt = engine.vgt(&va, &vb, predicate);
        let lt = engine.vlt(&va, &vb, predicate);
        let eq = engine.veq(&va, &vb, predicate);

        for lane in 0..16 {
            let active = predicate.is_active(lane);
            assert_eq!(gt[lane], active && a[lane] > b[lane], "vgt lane {lane}");
            assert_eq!(lt[lane], active && a[lane] < b[lane], "vlt lane {lane}");
            assert_eq!(eq[lane], active && a[lane] == b[lane], "veq lane {lane}");
        }

        // exactly one relation holds on each active lane
        let ordered = engine.mask_or(gt, lt);
        assert_eq!(engine.mask_or(ordered, eq), predicate);
    }
}

#[test]
fn test_integer_equality_with_empty_predicate_is_empty() {
    let mut engine = Engine::<4>::new();
    let a = VecInt::from([0, 0, 0, 0]);
    let result = engine.veq(&a, &a, Mask::zeros());
    assert!(result.none());

    let stats = engine.logger().stats();
    assert_eq!(stats.total_instructions, 1);
    assert_eq!(stats.utilized_lanes, 0);
}
