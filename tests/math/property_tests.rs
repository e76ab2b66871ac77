use ethnum::U256;
use proptest::prelude::*;
use stableswap_engine::helpers::math_procs::amp_ops::AmplificationRamp;
use stableswap_engine::helpers::math_procs::curve_ops::StableSwapCurve;
use stableswap_engine::helpers::math_procs::numerical_ops::A_PRECISION;

const ONE: u128 = 1_000_000_000_000_000_000;
const USD6: u128 = 1_000_000;
const MULTIPLIERS: [u128; 3] = [1, 1_000_000_000_000, 1_000_000_000_000];
const DAY: i64 = 24 * 60 * 60;
const NOW: i64 = 1_700_000_000;

fn curve(balances: &[u128; 3], a: u128, swap_fee: u128, admin_fee: u128) -> StableSwapCurve<'_, 3> {
    StableSwapCurve { balances, multipliers: &MULTIPLIERS, amp: a * A_PRECISION, swap_fee, admin_fee }
}

// DAI/USDC/USDT balances anywhere from 10 to a million whole tokens.
fn wide_balances() -> impl Strategy<Value = [u128; 3]> {
    (10u128..1_000_000, 10u128..1_000_000, 10u128..1_000_000)
        .prop_map(|(a, b, c)| [a * ONE, b * USD6, c * USD6])
}

// Balances within half to double of a common base.
fn close_balances() -> impl Strategy<Value = [u128; 3]> {
    (100u128..1_000_000, 50u128..=200, 50u128..=200, 50u128..=200)
        .prop_map(|(base, p0, p1, p2)| [base * ONE * p0 / 100, base * USD6 * p1 / 100, base * USD6 * p2 / 100])
}

fn pair() -> impl Strategy<Value = (usize, usize)> {
    (0usize..3, 1usize..3).prop_map(|(i, step)| (i, (i + step) % 3))
}

proptest! {
    #[test]
    fn prop_swaps_never_decrease_d(
        balances in wide_balances(),
        a in 1u128..5_000,
        swap_fee in 0u128..=100_000_000,
        admin_fee in 0u128..=10_000_000_000,
        (i, j) in pair(),
        percent in 1u128..=50,
    ) {
        let before = curve(&balances, a, swap_fee, admin_fee);
        let dx = balances[i] * percent / 100;
        let quote = before.swap_given_input(i, j, dx).unwrap();
        let after = curve(&quote.balances_after, a, swap_fee, admin_fee);
        prop_assert!(after.compute_d().unwrap() >= before.compute_d().unwrap());
    }

    #[test]
    fn prop_exact_out_pays_at_least_target(
        balances in wide_balances(),
        a in 1u128..5_000,
        swap_fee in 0u128..=100_000_000,
        (i, j) in pair(),
        percent in 1u128..=50,
    ) {
        let c = curve(&balances, a, swap_fee, 1_000_000_000);
        let dy = balances[j] * percent / 100;
        let quote = c.swap_given_output(i, j, dy).unwrap();
        prop_assert_eq!(quote.amount_out, dy);
        prop_assert!(c.swap_given_input(i, j, quote.amount_in).unwrap().amount_out >= dy);
    }

    #[test]
    fn prop_round_trip_between_same_decimals(
        balances in close_balances(),
        a in 1u128..5_000,
        swap_fee in 0u128..=100_000_000,
        per_mille in 1u128..=100,
    ) {
        let c = curve(&balances, a, swap_fee, 1_000_000_000);
        let dx = (balances[1] * per_mille / 1_000).max(1);
        let out = c.swap_given_input(1, 2, dx).unwrap().amount_out;
        prop_assume!(out > 0);
        let back = c.swap_given_output(1, 2, out).unwrap().amount_in;
        prop_assert!(back + 1 >= dx, "dx {} back {}", dx, back);
    }

    #[test]
    fn prop_round_trip_across_decimals(
        balances in close_balances(),
        a in 1u128..5_000,
        swap_fee in 0u128..=100_000_000,
        per_mille in 1u128..=100,
    ) {
        let c = curve(&balances, a, swap_fee, 1_000_000_000);
        let dx = (balances[0] * per_mille / 1_000).max(ONE);
        let out = c.swap_given_input(0, 1, dx).unwrap().amount_out;
        prop_assume!(out > 0);
        let back = c.swap_given_output(0, 1, out).unwrap().amount_in;
        // Six-decimal output hides up to one micro-unit of the input.
        prop_assert!(back + dx / 100_000 >= dx, "dx {} back {}", dx, back);
    }

    #[test]
    fn prop_balanced_withdrawal_never_exceeds_share(
        balances in wide_balances(),
        supply_units in 1u128..1_000_000,
        share in 1u128..=1_000,
    ) {
        let c = curve(&balances, 100, 50_000_000, 1_000_000_000);
        let supply = supply_units * ONE;
        let lp = supply * share / 1_000;
        let quote = c.withdraw_balanced(lp, supply).unwrap();
        for k in 0..3 {
            prop_assert!(U256::from(quote.amounts[k]) * U256::from(supply) <= U256::from(balances[k]) * U256::from(lp));
            prop_assert_eq!(quote.balances_after[k], balances[k] - quote.amounts[k]);
        }
    }

    #[test]
    fn prop_ramp_is_monotonic_and_exact_at_ends(
        initial in 1u64..10_000,
        factor in 50u64..=200,
        days in 14i64..=365,
        steps in proptest::collection::vec(0i64..=365 * DAY, 1..8),
    ) {
        let future = (initial * factor / 100).max(1);
        let mut ramp = AmplificationRamp::new(initial).unwrap();
        let end = NOW + days * DAY;
        prop_assume!(ramp.ramp_to(future, end, NOW).is_ok());

        prop_assert_eq!(ramp.current_a_precise(NOW), initial as u128 * A_PRECISION);
        prop_assert_eq!(ramp.current_a_precise(end), future as u128 * A_PRECISION);

        let mut times: Vec<i64> = steps.iter().map(|s| NOW + s % (days * DAY + 1)).collect();
        times.sort_unstable();
        let values: Vec<u128> = times.iter().map(|&t| ramp.current_a_precise(t)).collect();
        for pair in values.windows(2) {
            if future >= initial {
                prop_assert!(pair[0] <= pair[1]);
            } else {
                prop_assert!(pair[0] >= pair[1]);
            }
        }
    }
}
