//! Property-based tests for round generation and reconciliation.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use engine::partition::partition;
use engine::solver::{RoundConfig, generate_round};
use engine::{Card, CardKind, Category, CheckStatus, Ledger, Millions, Placement, Scenario, check};

fn scenario_from_seed(seed: u64) -> Scenario {
    let mut rng = SmallRng::seed_from_u64(seed);
    generate_round(&mut rng, &RoundConfig::default()).unwrap()
}

fn place_all_correct(scenario: &Scenario) -> Placement {
    let mut placement = Placement::default();
    for card in scenario.iter() {
        placement.place(card.ledger, card.id, card.correct_bin);
    }
    placement
}

/// The categories a card of `ledger` can be dropped on.
fn bins_of(ledger: Ledger) -> &'static [Category] {
    match ledger {
        Ledger::Production => &[
            Category::Output,
            Category::IntermediateInput,
            Category::NotProduction,
        ],
        Ledger::Expenditure => &[
            Category::Consumption,
            Category::Investment,
            Category::Government,
            Category::Exports,
            Category::Imports,
            Category::NotExpenditure,
        ],
        Ledger::Income => &[Category::Wages, Category::Profits, Category::NotIncome],
    }
}

/// A scrambled placement: every card placed, bins drawn from the card's
/// ledger, some right and some wrong.
fn place_scrambled(scenario: &Scenario, seed: u64) -> Placement {
    use rand::Rng;
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut placement = Placement::default();
    for card in scenario.iter() {
        let bins = bins_of(card.ledger);
        let bin = bins[rng.random_range(0..bins.len())];
        placement.place(card.ledger, card.id, bin);
    }
    placement
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    // 1. A fully correct placement reconciles exactly, for any seed.
    #[test]
    fn correct_placement_closes_the_gap(seed in any::<u64>()) {
        let scenario = scenario_from_seed(seed);
        let report = check(&scenario, &place_all_correct(&scenario));
        prop_assert_eq!(report.gap, Millions::ZERO);
        prop_assert_eq!(report.status, CheckStatus::Reconciled);
        prop_assert_eq!(report.gdp_production, scenario.target());
        prop_assert_eq!(report.gdp_expenditure, scenario.target());
        prop_assert_eq!(report.gdp_income, scenario.target());
        prop_assert!(report.inventory_placed);
    }

    // 2. Fragments always sum back to the source aggregate, minimums
    //    included, negative totals included.
    #[test]
    fn partition_is_sum_exact(
        seed in any::<u64>(),
        total in -5000i64..=5000,
        parts in 1usize..=8,
        min_part in 0i64..=60,
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let split = partition(&mut rng, total, parts, min_part);
        prop_assert_eq!(split.len(), parts);
        prop_assert_eq!(split.iter().sum::<i64>(), total);
        if min_part * parts as i64 <= total.abs() {
            for &piece in &split {
                prop_assert!(piece.abs() >= min_part, "{:?}", split);
            }
        }
    }

    // 3. The degraded path still sums exactly: all but one part sit at the
    //    minimum.
    #[test]
    fn partition_degrades_without_failing(
        seed in any::<u64>(),
        total in 0i64..=40,
        parts in 2usize..=6,
    ) {
        let min_part = total + 1; // parts * min_part > total, always infeasible
        let mut rng = SmallRng::seed_from_u64(seed);
        let split = partition(&mut rng, total, parts, min_part);
        prop_assert_eq!(split.len(), parts);
        prop_assert_eq!(split.iter().sum::<i64>(), total);
        let at_minimum = split.iter().filter(|&&piece| piece == min_part).count();
        prop_assert!(at_minimum >= parts - 1);
    }

    // 4. check is idempotent: same inputs, same report, even for scrambled
    //    placements.
    #[test]
    fn check_is_idempotent(seed in any::<u64>(), scramble in any::<u64>()) {
        let scenario = scenario_from_seed(seed);
        let placement = place_scrambled(&scenario, scramble);
        let first = check(&scenario, &placement);
        let second = check(&scenario, &placement);
        prop_assert_eq!(first, second);
    }

    // 5. Moving one real card from bin A to bin B moves exactly A and B,
    //    by exactly the card's amount.
    #[test]
    fn single_move_shifts_two_bins(seed in any::<u64>(), pick in any::<u64>()) {
        use rand::Rng;
        let scenario = scenario_from_seed(seed);
        let mut rng = SmallRng::seed_from_u64(pick);
        let real_cards: Vec<&Card> =
            scenario.iter().filter(|card| !card.is_distractor()).collect();
        let card = real_cards[rng.random_range(0..real_cards.len())];
        let bins: Vec<Category> = bins_of(card.ledger)
            .iter()
            .copied()
            .filter(|bin| bin.counts() && *bin != card.correct_bin)
            .collect();
        let target = bins[rng.random_range(0..bins.len())];

        let mut placement = place_all_correct(&scenario);
        let before = check(&scenario, &placement);
        placement.place(card.ledger, card.id, target);
        let after = check(&scenario, &placement);

        for ledger in Ledger::ALL {
            for &bin in bins_of(ledger) {
                let was = before.bin_totals.get(&bin).copied().unwrap_or_default();
                let now = after.bin_totals.get(&bin).copied().unwrap_or_default();
                if bin == card.correct_bin {
                    prop_assert_eq!(now - was, -card.amount);
                } else if bin == target {
                    prop_assert_eq!(now - was, card.amount);
                } else {
                    prop_assert_eq!(now, was, "{:?} moved", bin);
                }
            }
        }
    }

    // 6. Distractors never change any of the three totals, wherever they
    //    are placed.
    #[test]
    fn distractors_are_total_neutral(seed in any::<u64>(), scramble in any::<u64>()) {
        use rand::Rng;
        let scenario = scenario_from_seed(seed);
        let mut rng = SmallRng::seed_from_u64(scramble);
        let mut placement = place_all_correct(&scenario);
        let baseline = check(&scenario, &placement);

        for card in scenario.iter().filter(|card| card.is_distractor()) {
            let bins = bins_of(card.ledger);
            let bin = bins[rng.random_range(0..bins.len())];
            placement.place(card.ledger, card.id, bin);
        }
        let report = check(&scenario, &placement);
        prop_assert_eq!(report.gdp_production, baseline.gdp_production);
        prop_assert_eq!(report.gdp_expenditure, baseline.gdp_expenditure);
        prop_assert_eq!(report.gdp_income, baseline.gdp_income);
        prop_assert_eq!(report.gap, baseline.gap);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10_000))]

    // 7. The canonical partition call: 3 parts, each at least 5, summing to
    //    100, across ten thousand seeds.
    #[test]
    fn partition_100_3_5(seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let split = partition(&mut rng, 100, 3, 5);
        prop_assert_eq!(split.len(), 3);
        prop_assert_eq!(split.iter().sum::<i64>(), 100);
        for &piece in &split {
            prop_assert!(piece >= 5, "{:?}", split);
        }
    }
}

// 8. The solver's numbers satisfy the identity: the inventory residual read
//    off the cards equals production GDP minus all other expenditure, for
//    whatever values the solver actually produced (no assumed constants).
#[test]
fn inventory_is_the_exact_residual() {
    for seed in 0..300u64 {
        let scenario = scenario_from_seed(seed);
        let by_bin = |bin: Category| -> i64 {
            scenario
                .iter()
                .filter(|card| card.correct_bin == bin)
                .map(|card| card.amount.value())
                .sum()
        };
        let inventory: i64 = scenario
            .iter()
            .filter(|card| card.kind == Some(CardKind::InventoryChange))
            .map(|card| card.amount.value())
            .sum();
        let fixed: i64 = scenario
            .iter()
            .filter(|card| card.kind == Some(CardKind::FixedInvestment))
            .map(|card| card.amount.value())
            .sum();

        let production = by_bin(Category::Output) - by_bin(Category::IntermediateInput);
        let other_expenditure = by_bin(Category::Consumption)
            + fixed
            + by_bin(Category::Government)
            + by_bin(Category::Exports)
            - by_bin(Category::Imports);
        assert_eq!(inventory, production - other_expenditure, "seed {seed}");
        assert_eq!(by_bin(Category::Investment), fixed + inventory, "seed {seed}");
    }
}

// 9. Edge scales: the identity holds at the extremes of the scale range.
#[test]
fn edge_scales_still_reconcile() {
    for scale in [180, 480] {
        let config = RoundConfig {
            scale_range: scale..=scale,
            ..RoundConfig::default()
        };
        for seed in 0..100u64 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let scenario = generate_round(&mut rng, &config).unwrap();
            let report = check(&scenario, &place_all_correct(&scenario));
            assert_eq!(report.gap, Millions::ZERO, "scale {scale} seed {seed}");
        }
    }
}

// 10. Negative inventory (stock decumulation) occurs and still reconciles,
//     with every fragment of the residual staying negative.
#[test]
fn negative_inventory_rounds_reconcile() {
    let mut found = false;
    for seed in 0..3000u64 {
        let scenario = scenario_from_seed(seed);
        let inventory: i64 = scenario
            .iter()
            .filter(|card| card.kind == Some(CardKind::InventoryChange))
            .map(|card| card.amount.value())
            .sum();
        if inventory >= 0 {
            continue;
        }
        found = true;
        for card in scenario.iter() {
            if card.kind == Some(CardKind::InventoryChange) {
                assert!(card.amount.is_negative(), "seed {seed}");
            }
        }
        let report = check(&scenario, &place_all_correct(&scenario));
        assert_eq!(report.gap, Millions::ZERO, "seed {seed}");
        assert!(report.inventory_placed);
    }
    assert!(found, "no decumulation round in 3000 seeds");
}
