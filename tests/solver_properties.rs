//! Property-based invariant tests for the equilibrium solver.
//!
//! Verifies:
//! 1. Determinism: solving the same inputs twice gives bit-identical tables
//! 2. Ownership closure: fractions sum to 1 within the report tolerance
//! 3. Table shape: one row per note and investor plus two computed rows
//! 4. Convergence: realistic rounds settle well inside the pass budget
//! 5. Cap monotonicity: a higher cap never yields more shares for a note

use proptest::prelude::*;
use safe_dilution::captable::{OWNERSHIP_TOLERANCE, ResultSummary};
use safe_dilution::solver::{ConversionBasis, ConversionQuote};
use safe_dilution::{CapTable, Investor, NewRound, SafeNote, Solver, ValuationType};

// ── Strategy helpers ──────────────────────────────────────────────────

fn arb_valuation_type() -> impl Strategy<Value = ValuationType> {
    prop_oneof![Just(ValuationType::PreMoney), Just(ValuationType::PostMoney)]
}

fn arb_cap_table() -> impl Strategy<Value = CapTable> {
    (5_000_000u64..20_000_000, 0u64..1_000_000, 0.0f64..20.0)
        .prop_map(|(fd, options, pool)| CapTable::new(fd, options, pool))
}

fn arb_note(index: usize) -> impl Strategy<Value = SafeNote> {
    (
        50_000.0f64..500_000.0,
        10_000_000.0f64..50_000_000.0,
        arb_valuation_type(),
        50.0f64..=100.0,
    )
        .prop_map(move |(principal, cap, valuation_type, discount)| {
            let id = format!("safe{}", index);
            SafeNote::new(id.clone(), id, principal, cap)
                .with_valuation_type(valuation_type)
                .with_discount(discount)
        })
}

fn arb_notes() -> impl Strategy<Value = Vec<SafeNote>> {
    prop_oneof![
        Just(Vec::new()),
        arb_note(0).prop_map(|n| vec![n]),
        (arb_note(0), arb_note(1), arb_note(2)).prop_map(|(a, b, c)| vec![a, b, c]),
    ]
}

fn arb_round() -> impl Strategy<Value = NewRound> {
    (
        5_000_000.0f64..50_000_000.0,
        prop::collection::vec(100_000.0f64..3_000_000.0, 0..4),
    )
        .prop_map(|(pre_money, principals)| {
            principals
                .into_iter()
                .enumerate()
                .fold(NewRound::new(pre_money, ValuationType::PreMoney), |round, (i, p)| {
                    let id = format!("inv{}", i);
                    round.with_investor(Investor::new(id.clone(), id, p))
                })
        })
}

// ── Properties ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn solve_is_deterministic(cap in arb_cap_table(), notes in arb_notes(), round in arb_round()) {
        let solver = Solver::new();
        let first = solver.solve(&cap, &notes, &round);
        let second = solver.solve(&cap, &notes, &round);

        prop_assert_eq!(first.iterations, second.iterations);
        prop_assert_eq!(first.share_price.to_bits(), second.share_price.to_bits());
        for (a, b) in first.results.iter().zip(&second.results) {
            prop_assert_eq!(&a.id, &b.id);
            prop_assert_eq!(a.shares.to_bits(), b.shares.to_bits());
            prop_assert_eq!(a.ownership.to_bits(), b.ownership.to_bits());
        }
    }

    #[test]
    fn ownership_closes(cap in arb_cap_table(), notes in arb_notes(), round in arb_round()) {
        let solution = Solver::new().solve(&cap, &notes, &round);
        let summary = ResultSummary::from_entries(&solution.results);

        prop_assert!(
            (summary.total_ownership - 1.0).abs() <= OWNERSHIP_TOLERANCE,
            "total ownership {}",
            summary.total_ownership
        );
        prop_assert!(summary.is_valid());
    }

    #[test]
    fn table_has_one_row_per_holder(cap in arb_cap_table(), notes in arb_notes(), round in arb_round()) {
        let solution = Solver::new().solve(&cap, &notes, &round);
        prop_assert_eq!(
            solution.results.len(),
            notes.len() + round.investors.len() + 2
        );
    }

    #[test]
    fn realistic_rounds_converge(cap in arb_cap_table(), notes in arb_notes(), round in arb_round()) {
        let solution = Solver::new().solve(&cap, &notes, &round);
        prop_assert!(solution.share_price > 0.0);
        prop_assert!(solution.iterations < 50, "ran {} passes", solution.iterations);
    }

    #[test]
    fn higher_cap_never_yields_more_shares(
        principal in 10_000.0f64..2_000_000.0,
        cap_lo in 1_000_000.0f64..20_000_000.0,
        cap_step in 0.0f64..20_000_000.0,
        valuation_type in arb_valuation_type(),
        share_price in 0.5f64..10.0,
    ) {
        let basis = ConversionBasis {
            fully_diluted_shares: 10_000_000.0,
            esop_expansion: 500_000.0,
            shares_after_safe_conversion: 10_800_000.0,
            share_price,
        };
        let low = SafeNote::new("s", "s", principal, cap_lo).with_valuation_type(valuation_type);
        let high = SafeNote::new("s", "s", principal, cap_lo + cap_step).with_valuation_type(valuation_type);

        let low_quote = ConversionQuote::for_note(&low, &basis);
        let high_quote = ConversionQuote::for_note(&high, &basis);

        prop_assert!(high_quote.at_cap_price <= low_quote.at_cap_price);
        prop_assert!(high_quote.shares() <= low_quote.shares());
    }
}
