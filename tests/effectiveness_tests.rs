use pokemon_battle_advisor::effectiveness::{classify, describe, Effectiveness};
use pokemon_battle_advisor::types::{EffectivenessClass, Multiplier, PokemonType, TypeChart};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn any_type() -> impl Strategy<Value = PokemonType> {
    (0..PokemonType::ALL.len()).prop_map(|idx| PokemonType::ALL[idx])
}

fn expected_class(
    chart: &TypeChart,
    attacking: PokemonType,
    defender: &[PokemonType],
) -> EffectivenessClass {
    defender
        .iter()
        .map(|&d| chart.multiplier(attacking, d))
        .fold(Multiplier::NEUTRAL, |acc, m| acc * m)
        .class()
}

fn buckets(result: &Effectiveness) -> [&BTreeSet<PokemonType>; 5] {
    [
        &result.extremely_effective,
        &result.super_effective,
        &result.resistant,
        &result.highly_resistant,
        &result.immune,
    ]
}

/// Chart in the battle client's layout with only the listed cells changed from 1x.
fn chart_json(overrides: &[(PokemonType, PokemonType, f64)]) -> String {
    let mut layout = serde_json::Map::new();
    for defending in PokemonType::ALL {
        let mut row = serde_json::Map::new();
        for attacking in PokemonType::ALL {
            let value = overrides
                .iter()
                .find(|(a, d, _)| *a == attacking && *d == defending)
                .map_or(1.0, |(_, _, v)| *v);
            row.insert(attacking.name().to_string(), serde_json::json!(value));
        }
        layout.insert(defending.name().to_string(), serde_json::Value::Object(row));
    }
    serde_json::Value::Object(layout).to_string()
}

#[test]
fn water_defender_resists_fire() {
    let chart = TypeChart::from_json_str(&chart_json(&[(
        PokemonType::Fire,
        PokemonType::Water,
        0.5,
    )]))
    .unwrap();
    let result = classify(PokemonType::Water, None, &chart, None);
    assert_eq!(result.resistant, BTreeSet::from([PokemonType::Fire]));
    assert!(result.immune.is_empty());
}

#[test]
fn two_and_half_net_to_neutral() {
    let chart = TypeChart::from_json_str(&chart_json(&[
        (PokemonType::Ice, PokemonType::Water, 2.0),
        (PokemonType::Ice, PokemonType::Ground, 0.5),
    ]))
    .unwrap();
    let result = classify(PokemonType::Water, Some(PokemonType::Ground), &chart, None);
    assert!(result.is_empty());
    assert_eq!(result.class_of(PokemonType::Ice), EffectivenessClass::Neutral);
}

#[test]
fn ghost_poison_is_immune_to_normal() {
    let chart = TypeChart::standard();
    let result = classify(PokemonType::Ghost, Some(PokemonType::Poison), &chart, None);
    assert!(result.immune.contains(&PokemonType::Normal));
}

#[test]
fn malformed_products_are_neutral() {
    // 4x * 4x = 16x is off the canonical scale and must not be reported
    let chart = TypeChart::from_json_str(&chart_json(&[
        (PokemonType::Rock, PokemonType::Fire, 4.0),
        (PokemonType::Rock, PokemonType::Flying, 4.0),
    ]))
    .unwrap();
    let result = classify(PokemonType::Fire, Some(PokemonType::Flying), &chart, None);
    assert_eq!(result.class_of(PokemonType::Rock), EffectivenessClass::Neutral);
    assert!(result.is_empty());
}

#[test]
fn empty_description_has_no_stray_text() {
    let chart = TypeChart::standard();
    let result = classify(PokemonType::Normal, None, &chart, Some(&[PokemonType::Water]));
    assert!(result.is_empty());
    assert_eq!(describe("Snorlax", &result), "");
}

#[test]
fn standard_chart_survives_json_round_trip() {
    let standard = TypeChart::standard();
    let mut layout = serde_json::Map::new();
    for defending in PokemonType::ALL {
        let row: serde_json::Map<String, serde_json::Value> = PokemonType::ALL
            .iter()
            .map(|&a| {
                (
                    a.name().to_string(),
                    serde_json::json!(standard.multiplier(a, defending).as_f64()),
                )
            })
            .collect();
        layout.insert(defending.name().to_string(), serde_json::Value::Object(row));
    }
    let loaded =
        TypeChart::from_json_str(&serde_json::Value::Object(layout).to_string()).unwrap();
    assert_eq!(loaded, standard);
}

proptest! {
    #[test]
    fn single_type_matches_chart(defender in any_type()) {
        let chart = TypeChart::standard();
        let result = classify(defender, None, &chart, None);
        for attacking in PokemonType::ALL {
            prop_assert_eq!(
                result.class_of(attacking),
                chart.multiplier(attacking, defender).class()
            );
        }
    }

    #[test]
    fn dual_type_matches_product(first in any_type(), second in any_type()) {
        prop_assume!(first != second);
        let chart = TypeChart::standard();
        let result = classify(first, Some(second), &chart, None);
        for attacking in PokemonType::ALL {
            prop_assert_eq!(
                result.class_of(attacking),
                expected_class(&chart, attacking, &[first, second])
            );
        }
    }

    #[test]
    fn buckets_are_disjoint(
        first in any_type(),
        second in proptest::option::of(any_type()),
    ) {
        let result = classify(first, second, &TypeChart::standard(), None);
        let all = buckets(&result);
        let total: usize = all.iter().map(|b| b.len()).sum();
        let union: BTreeSet<PokemonType> = all.iter().flat_map(|b| b.iter().copied()).collect();
        prop_assert_eq!(total, union.len());
    }

    #[test]
    fn restriction_is_an_intersection(
        first in any_type(),
        second in proptest::option::of(any_type()),
        candidates in proptest::collection::vec(any_type(), 0..6),
    ) {
        let chart = TypeChart::standard();
        let full = classify(first, second, &chart, None);
        let restricted = classify(first, second, &chart, Some(candidates.as_slice()));
        let allowed: BTreeSet<PokemonType> = candidates.iter().copied().collect();
        for (whole, part) in buckets(&full).iter().zip(buckets(&restricted)) {
            let expected: BTreeSet<PokemonType> = whole.intersection(&allowed).copied().collect();
            prop_assert_eq!(part, &expected);
        }
    }

    #[test]
    fn full_restriction_equals_none(
        first in any_type(),
        second in proptest::option::of(any_type()),
    ) {
        let chart = TypeChart::standard();
        prop_assert_eq!(
            classify(first, second, &chart, Some(&PokemonType::ALL[..])),
            classify(first, second, &chart, None)
        );
        prop_assert!(classify(first, second, &chart, Some(&[])).is_empty());
    }

    #[test]
    fn classify_is_deterministic(
        first in any_type(),
        second in proptest::option::of(any_type()),
    ) {
        let chart = TypeChart::standard();
        prop_assert_eq!(
            classify(first, second, &chart, None),
            classify(first, second, &chart, None)
        );
    }
}
