//! Testing withdrawals from the pool.
use stableswap_engine::instructions::InstructionOutcome;

use crate::common::context::{PoolTestContext, BOB, DAI, LP_MINT, USDC, USDT};
use crate::common::deposit_tests::DepositTestState;
use crate::common::setup::{remove_liquidity_data, FAR_DEADLINE};

/// Bob burns everything he minted and takes his proportional share.
pub fn withdraw_liquidity(ctx: &mut PoolTestContext, deposit: &DepositTestState) {
    let supply_before = ctx.pool.lp_supply();
    let held_before = [
        ctx.ledger.balance(DAI, BOB),
        ctx.ledger.balance(USDC, BOB),
        ctx.ledger.balance(USDT, BOB),
    ];
    let expected = ctx.pool.calculate_remove_liquidity(deposit.minted).unwrap();

    let outcome = ctx
        .invoke(BOB, &remove_liquidity_data(deposit.minted, expected, FAR_DEADLINE))
        .expect("withdraw");
    let InstructionOutcome::LiquidityRemoved(quote) = outcome else {
        panic!("unexpected outcome {:?}", outcome);
    };

    assert_eq!(quote.amounts, expected);
    assert_eq!(quote.fees, [0; 3]);
    assert_eq!(ctx.pool.lp_supply(), supply_before - deposit.minted);
    assert_eq!(ctx.ledger.balance(LP_MINT, BOB), 0);
    assert_eq!(ctx.ledger.balance(DAI, BOB), held_before[0] + expected[0]);
    assert_eq!(ctx.ledger.balance(USDC, BOB), held_before[1] + expected[1]);
    assert_eq!(ctx.ledger.balance(USDT, BOB), held_before[2] + expected[2]);
}
