//! Combat resolution integration tests

use gauge_battle::battle::resolution::{
    critical_chance, defense_value, target_mobility, AttackProfile,
};
use gauge_battle::battle::*;
use gauge_battle::core::{BalanceConfig, TeamId, UnitId};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn target_unit() -> Unit {
    Unit::new(UnitId(2), "Target", TeamId::Team2, Medal::default()).with_parts([
        Part::vulcan_head(),
        Part::rifle(PartSlot::RightArm),
        Part::sword(PartSlot::LeftArm),
        Part::biped_legs(),
    ])
}

#[test]
fn test_hit_chance_examples() {
    let config = BalanceConfig::default();

    let chance = hit_chance(20, 10, &config);
    assert_eq!(chance, 85);
    assert_eq!(critical_chance(chance), 0);

    let chance = hit_chance(40, 0, &config);
    assert_eq!(chance, 115);
    assert_eq!(critical_chance(chance), 15);
}

#[test]
fn test_damage_example() {
    let config = BalanceConfig::default();
    let base_power = 30 + 10 * config.damage.medal_skill_factor;

    assert_eq!(base_power, 50);
    assert_eq!(calculate_damage(base_power, 15, false, &config), 35);
    assert_eq!(calculate_damage(base_power, 15, true, &config), 52);
}

#[test]
fn test_roll_frequencies_follow_chances() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let trials = 20_000;

    let hits = (0..trials)
        .filter(|_| roll_hit(85, &mut rng).is_hit)
        .count();
    let rate = hits as f64 / trials as f64;
    assert!((rate - 0.85).abs() < 0.02, "hit rate {}", rate);

    let crits = (0..trials)
        .filter(|_| {
            let roll = roll_hit(115, &mut rng);
            assert!(roll.is_hit);
            roll.is_critical
        })
        .count();
    let rate = crits as f64 / trials as f64;
    assert!((rate - 0.15).abs() < 0.02, "critical rate {}", rate);
}

#[test]
fn test_aim_trait_disables_own_evasion() {
    let mut sniper = Unit::new(UnitId(1), "Sniper", TeamId::Team1, Medal::default())
        .with_parts([
            Part::vulcan_head(),
            Part::laser(PartSlot::RightArm),
            Part::biped_legs(),
        ]);
    assert_eq!(target_mobility(&sniper), 15);

    begin_charging(&mut sniper, PartSlot::RightArm, Some(UnitId(2)));
    assert!(sniper.evasion_disabled);
    assert_eq!(target_mobility(&sniper), 0);
}

#[test]
fn test_strike_trait_disables_own_defense() {
    let mut bruiser = Unit::new(UnitId(1), "Bruiser", TeamId::Team1, Medal::default())
        .with_parts([
            Part::vulcan_head(),
            Part::hammer(PartSlot::RightArm),
            Part::tank_legs(),
        ]);
    let head = Part::vulcan_head();
    assert_eq!(defense_value(&bruiser, &head), 5 + 12);

    begin_charging(&mut bruiser, PartSlot::RightArm, None);
    assert!(bruiser.defense_disabled);
    assert_eq!(defense_value(&bruiser, &head), 0);
}

#[test]
fn test_skill_matches_part_category() {
    let config = BalanceConfig::default();
    let unit = Unit::new(UnitId(1), "Medal", TeamId::Team1, Medal::new(10, 3)).with_parts([
        Part::vulcan_head(),
        Part::rifle(PartSlot::RightArm),
        Part::sword(PartSlot::LeftArm),
    ]);

    let rifle = unit.parts.get(PartSlot::RightArm).unwrap();
    let shot = AttackProfile::new(&unit, rifle, &config);
    assert_eq!(shot.base_power, 22 + 10 * 2);

    let sword = unit.parts.get(PartSlot::LeftArm).unwrap();
    let slash = AttackProfile::new(&unit, sword, &config);
    assert_eq!(slash.base_power, 26 + 3 * 2);
}

#[test]
fn test_hits_only_damage_intact_parts() {
    let config = BalanceConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let gun = Part::rifle(PartSlot::RightArm).with_power(1, 500);

    for _ in 0..50 {
        let mut attacker = Unit::new(UnitId(1), "A", TeamId::Team1, Medal::default())
            .with_parts([Part::vulcan_head(), gun.clone()]);
        begin_charging(&mut attacker, PartSlot::RightArm, Some(UnitId(2)));
        let mut target = target_unit();
        target
            .parts
            .insert(Part::sword(PartSlot::LeftArm).with_armor(0));
        let mut units = vec![attacker, target];

        let resolution = resolve_action(&mut units, UnitId(1), &config, &mut rng).unwrap();
        match resolution.outcome {
            ResolutionOutcome::Hit { report, .. } => {
                assert_ne!(report.slot, PartSlot::LeftArm);
                assert_eq!(report.damage, 1);
            }
            other => panic!("expected a hit, got {:?}", other),
        }
    }
}

#[test]
fn test_melee_draws_from_live_opponents() {
    let config = BalanceConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(6);

    let mut attacker = Unit::new(UnitId(1), "A", TeamId::Team1, Medal::default())
        .with_parts([Part::vulcan_head(), Part::sword(PartSlot::LeftArm)]);
    // The tentative target is ignored
    begin_charging(&mut attacker, PartSlot::LeftArm, Some(UnitId(2)));
    let mut dead = target_unit();
    dead.mark_broken();
    let mut alive = target_unit();
    alive.id = UnitId(3);

    let mut units = vec![attacker, dead, alive];
    for _ in 0..20 {
        match resolve_target(&units, &units[0], PartCategory::Fight, &mut rng) {
            TargetResolution::Target(id) => assert_eq!(id, UnitId(3)),
            other => panic!("expected a target, got {:?}", other),
        }
    }

    let resolution = resolve_action(&mut units, UnitId(1), &config, &mut rng).unwrap();
    match resolution.outcome {
        ResolutionOutcome::Hit { target, .. } | ResolutionOutcome::Miss { target, .. } => {
            assert_eq!(target, UnitId(3))
        }
        other => panic!("expected an attack, got {:?}", other),
    }
}
