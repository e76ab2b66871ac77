use stableswap_engine::helpers::errors::StableSwapError;
use stableswap_engine::helpers::math_procs::numerical_ops::*;

const ONE: u128 = 1_000_000_000_000_000_000;

// CONSTANT SUM TESTS
#[test]
fn test_constant_sum_basic() {
    let reserves = vec![100u128, 200u128, 300u128];
    assert_eq!(constant_sum(&reserves).unwrap(), 600);
}

#[test]
fn test_constant_sum_empty() {
    let reserves: Vec<u128> = vec![];
    assert_eq!(constant_sum(&reserves).unwrap(), 0);
}

#[test]
fn test_constant_sum_overflow() {
    let reserves = vec![u128::MAX, 1u128];
    assert_eq!(constant_sum(&reserves), Err(StableSwapError::MathOverflow));
}

// PRECISION TESTS
#[test]
fn test_precision_multiplier() {
    assert_eq!(precision_multiplier(18).unwrap(), 1);
    assert_eq!(precision_multiplier(6).unwrap(), 1_000_000_000_000);
    assert_eq!(precision_multiplier(0).unwrap(), ONE);
    assert_eq!(precision_multiplier(19), Err(StableSwapError::InvalidDecimals));
}

#[test]
fn test_denormalize_rounding() {
    let m = precision_multiplier(6).unwrap();
    assert_eq!(denormalize(1_999_999_999_999, m).unwrap(), 1);
    assert_eq!(denormalize_up(1_000_000_000_001, m).unwrap(), 2);
    assert_eq!(denormalize_up(2_000_000_000_000, m).unwrap(), 2);
    assert_eq!(normalize(u128::MAX, m), Err(StableSwapError::MathOverflow));
}

#[test]
fn test_normalize_all() {
    let raw = [5 * ONE, 5_000_000, 7];
    let multipliers = [1, 1_000_000_000_000, 1_000_000_000_000];
    assert_eq!(
        normalize_all(&raw, &multipliers).unwrap(),
        [5 * ONE, 5 * ONE, 7_000_000_000_000]
    );
}

#[test]
fn test_mul_div_directions() {
    assert_eq!(mul_div(10, 10, 3).unwrap(), 33);
    assert_eq!(mul_div_up(10, 10, 3).unwrap(), 34);
    assert_eq!(mul_div_up(10, 9, 3).unwrap(), 30);
    // The product does not fit in 128 bits, the quotient does.
    assert_eq!(mul_div(u128::MAX, 4, 8).unwrap(), u128::MAX / 2);
    assert_eq!(mul_div(u128::MAX, 4, 2), Err(StableSwapError::MathOverflow));
    assert_eq!(mul_div(1, 1, 0), Err(StableSwapError::MathOverflow));
}

// INVARIANT TESTS
#[test]
fn test_d_of_balanced_pool_is_the_sum() {
    let xp = [100 * ONE, 100 * ONE, 100 * ONE];
    for amp in [A_PRECISION, 100 * A_PRECISION, 5_000 * A_PRECISION] {
        assert_eq!(compute_d(&xp, amp).unwrap(), 300 * ONE);
    }
}

#[test]
fn test_d_of_empty_pool_is_zero() {
    assert_eq!(compute_d(&[0, 0], 100 * A_PRECISION).unwrap(), 0);
}

#[test]
fn test_d_lies_between_product_and_sum() {
    let xp = [50 * ONE, 150 * ONE];
    let d = compute_d(&xp, 100 * A_PRECISION).unwrap();
    // 2 * sqrt(50 * 150) ~= 173.2
    assert!(d < 200 * ONE);
    assert!(d > 173 * ONE);

    // Higher A moves D toward the sum.
    let d_high = compute_d(&xp, 10_000 * A_PRECISION).unwrap();
    assert!(d_high > d);
}

#[test]
fn test_d_rejects_sub_unit_amplification() {
    assert_eq!(
        compute_d(&[ONE, ONE], A_PRECISION - 1),
        Err(StableSwapError::InvalidAmplification)
    );
}

#[test]
fn test_y_recovers_balance_on_the_curve() {
    let amp = 100 * A_PRECISION;
    let xp = [100 * ONE, 80 * ONE, 120 * ONE];
    let d = compute_d(&xp, amp).unwrap();
    for index in 0..3 {
        let y = compute_y_given_d(amp, index, &xp, d).unwrap();
        let diff = if y > xp[index] { y - xp[index] } else { xp[index] - y };
        assert!(diff <= 2, "index {} diff {}", index, diff);
    }
}

#[test]
fn test_y_rejects_bad_index() {
    let xp = [ONE, ONE];
    assert_eq!(
        compute_y_given_d(100 * A_PRECISION, 2, &xp, 2 * ONE),
        Err(StableSwapError::InvalidIndex)
    );
}
