//! Testing swapping of tokens.
use stableswap_engine::helpers::math_procs::curve_ops::SwapQuote;
use stableswap_engine::instructions::InstructionOutcome;

use crate::common::context::{PoolTestContext, BOB, DAI, USDC, USDT, VAULT};
use crate::common::setup::{swap_data, FAR_DEADLINE, ONE, USD6};

/// Bob sells 5 DAI for USDC.
pub fn swap_tokens(ctx: &mut PoolTestContext) -> SwapQuote<3> {
    let dai_before = ctx.ledger.balance(DAI, BOB);
    let usdc_before = ctx.ledger.balance(USDC, BOB);
    let admin_before = ctx.pool.get_admin_balance(1).unwrap();
    let quoted = ctx.pool.calculate_swap(0, 1, 5 * ONE, ctx.now).unwrap();

    let outcome = ctx
        .invoke(BOB, &swap_data(0, 1, 5 * ONE, 4_900_000, FAR_DEADLINE))
        .expect("swap");
    let InstructionOutcome::Swapped(quote) = outcome else {
        panic!("unexpected outcome {:?}", outcome);
    };

    assert_eq!(quote.amount_out, quoted);
    assert!(quote.amount_out < 5 * USD6);
    assert_eq!(ctx.ledger.balance(DAI, BOB), dai_before - 5 * ONE);
    assert_eq!(ctx.ledger.balance(USDC, BOB), usdc_before + quote.amount_out);
    assert_eq!(ctx.pool.get_admin_balance(1).unwrap(), admin_before + quote.admin_fee);
    assert!(quote.admin_fee > 0);
    quote
}

/// The vault holds exactly the pooled balances plus the admin's share.
pub fn assert_vault_matches_pool(ctx: &PoolTestContext) {
    for (index, token) in ctx.pool.tokens().iter().enumerate() {
        let mint = [DAI, USDC, USDT][index];
        assert_eq!(
            ctx.ledger.balance(mint, VAULT),
            token.balance() + token.admin_fees(),
            "token {}",
            index
        );
    }
}
