//! FX Curve Property Tests
//!
//! Laws that must hold for any balances and trade sizes, not only the pinned
//! regression scenarios.

use amm::fx::{
    CurveMathError, CurveParameters, CurveState, PairSnapshot, PriceMath, SwapMath, TokenState,
    TradeSolver,
};
use amm::fx::params::{CURVEMATH_MAX_DIFF, MAX_SOLVER_ROUNDS};
use amm::{Address, FixedPoint18, U256};
use proptest::prelude::*;

fn fp(s: &str) -> FixedPoint18 {
    FixedPoint18::from_decimal_str(s).unwrap()
}

fn curve() -> CurveParameters {
    CurveParameters::new(fp("0.8"), fp("0.48"), fp("0.273"), fp("0.0005"), fp("0.3"))
}

fn pair(quote_raw: u64, base_raw: u64, quote_in: bool) -> PairSnapshot {
    let quote =
        TokenState::new(Address::repeat_byte(0x01), U256::from(quote_raw), 6, FixedPoint18::ONE);
    let base =
        TokenState::new(Address::repeat_byte(0x02), U256::from(base_raw), 6, FixedPoint18::ONE);
    let (token_in, token_out) = if quote_in { (quote, base) } else { (base, quote) };
    PairSnapshot::new("prop", token_in, token_out, quote.address, curve()).unwrap()
}

prop_compose! {
    fn valid_balance()
        (whole in 2_000_000u64..8_000_000u64) -> u64 {
        whole * 1_000_000
    }
}

prop_compose! {
    fn valid_amount()
        (raw in prop_oneof![1u64..1_000_000u64, 1u64..1_000_000_000_000u64]) -> u64 {
        raw
    }
}

proptest! {
    /// Property: identical snapshot and amount always give identical results
    #[test]
    fn quotes_are_deterministic(
        quote in valid_balance(),
        base in valid_balance(),
        amount in valid_amount(),
        quote_in in any::<bool>(),
    ) {
        let first = pair(quote, base, quote_in);
        let second = pair(quote, base, quote_in);
        let amount = U256::from(amount);

        prop_assert_eq!(
            SwapMath::try_exact_in(&first, amount),
            SwapMath::try_exact_in(&second, amount)
        );
        prop_assert_eq!(SwapMath::exact_out(&first, amount), SwapMath::exact_out(&second, amount));
        prop_assert_eq!(
            PriceMath::spot_price_after_exact_in(&first, amount),
            PriceMath::spot_price_after_exact_in(&second, amount)
        );
    }

    /// Property: exact out of an exact-in quote recovers the input within the fee budget
    #[test]
    fn exact_out_inverts_exact_in(
        quote in valid_balance(),
        base in valid_balance(),
        amount in valid_amount(),
        quote_in in any::<bool>(),
    ) {
        let pair = pair(quote, base, quote_in);
        let received = SwapMath::try_exact_in(&pair, U256::from(amount));
        prop_assume!(received.is_ok());

        let paid = SwapMath::try_exact_out(&pair, received.unwrap()).unwrap();
        let paid: u64 = paid.to();
        let tolerance = amount * 5 / 10_000 + 2;
        prop_assert!(paid.abs_diff(amount) <= tolerance,
            "paid {} for an exact-in of {}", paid, amount);
    }

    /// Property: a converged trade never loses more utility than the allowed slack
    #[test]
    fn converged_trades_respect_invariant(
        quote in valid_balance(),
        base in valid_balance(),
        amount in 1u64..6_000_000u64,
        output_index in 0usize..2,
    ) {
        let before = CurveState::new(
            FixedPoint18::from_int((quote / 1_000_000) as i64),
            FixedPoint18::from_int((base / 1_000_000) as i64),
        ).unwrap();
        let input = FixedPoint18::from_int(amount as i64);

        match TradeSolver::calculate_trade(&before, input, output_index, &curve()) {
            Ok(outcome) => {
                prop_assert!(outcome.rounds <= MAX_SOLVER_ROUNDS);
                prop_assert!(outcome.utility_diff(&before).unwrap() >= CURVEMATH_MAX_DIFF);
                prop_assert!(outcome.output.is_negative());
            }
            Err(err) => prop_assert!(
                matches!(
                    err,
                    CurveMathError::LowerHalt
                        | CurveMathError::UpperHalt
                        | CurveMathError::SwapConvergenceFailed
                ),
                "unexpected failure {:?}",
                err
            ),
        }
    }

    /// Property: the remaining room never exceeds the halt-boundary share of liquidity
    #[test]
    fn limit_amount_bounded(
        quote in valid_balance(),
        base in valid_balance(),
        quote_in in any::<bool>(),
    ) {
        let pair = pair(quote, base, quote_in);
        let limit: u64 = SwapMath::try_limit_amount(&pair, amm::SwapType::ExactIn).unwrap().to();
        let total = quote + base;
        prop_assert!(limit <= total * 9 / 10);
    }
}

#[test]
fn test_fee_free_trade_round_trip_is_exact_up_to_epsilon() {
    let pair = pair(4_026_113_600_000, 6_101_054_600_000, false);
    let received = SwapMath::try_exact_in(&pair, U256::from(100_000_000_000u64)).unwrap();
    let paid = SwapMath::try_exact_out(&pair, received).unwrap();

    // 100000 * 0.9995 * 1.0005
    assert_eq!(paid, U256::from(99_999_975_000u64));
}
