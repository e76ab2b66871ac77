//! Testing deposits into the pool.
use stableswap_engine::instructions::InstructionOutcome;

use crate::common::context::{PoolTestContext, BOB, DAI, LP_MINT, USDC, USDT, VAULT};
use crate::common::setup::{add_liquidity_data, FAR_DEADLINE, ONE, USD6};

pub struct DepositTestState {
    pub minted: u128,
}

/// Bob adds 50 of each token to the balanced genesis pool.
pub fn deposit_liquidity(ctx: &mut PoolTestContext) -> DepositTestState {
    let supply_before = ctx.pool.lp_supply();
    let vault_dai_before = ctx.ledger.balance(DAI, VAULT);
    let amounts = [50 * ONE, 50 * USD6, 50 * USD6];

    let expected = ctx.pool.calculate_add_liquidity(&amounts, ctx.now).unwrap();
    let outcome = ctx
        .invoke(BOB, &add_liquidity_data(amounts, expected, FAR_DEADLINE))
        .expect("deposit");
    let InstructionOutcome::LiquidityAdded(quote) = outcome else {
        panic!("unexpected outcome {:?}", outcome);
    };

    // A proportional deposit into a balanced pool is fee free.
    assert_eq!(quote.lp_amount, expected);
    assert_eq!(quote.lp_amount, 150 * ONE);
    assert_eq!(quote.fees, [0; 3]);
    assert_eq!(ctx.pool.lp_supply(), supply_before + quote.lp_amount);
    assert_eq!(ctx.ledger.balance(LP_MINT, BOB), quote.lp_amount);
    assert_eq!(ctx.ledger.supply(LP_MINT), ctx.pool.lp_supply());
    assert_eq!(ctx.ledger.balance(DAI, VAULT), vault_dai_before + 50 * ONE);
    assert_eq!(ctx.ledger.balance(USDC, BOB), 950 * USD6);
    assert_eq!(ctx.ledger.balance(USDT, BOB), 950 * USD6);

    DepositTestState { minted: quote.lp_amount }
}
