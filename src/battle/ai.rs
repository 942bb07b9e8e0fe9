//! AI action selection: first usable part in a shuffled slot order, uniform
//! random live opponent

use rand::seq::SliceRandom;
use rand::Rng;

use crate::battle::parts::PartSlot;
use crate::battle::targeting::random_live_opponent;
use crate::battle::units::Unit;
use crate::core::types::UnitId;

/// What the AI wants a unit to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiChoice {
    pub slot: PartSlot,
    pub target: Option<UnitId>,
}

/// Pick an action for `unit`, or None if it has nothing it can do
///
/// If the first usable part is an attack and no opponent is alive, the unit
/// does not act.
pub fn choose_action<R: Rng>(units: &[Unit], unit: &Unit, rng: &mut R) -> Option<AiChoice> {
    let mut slots = PartSlot::action_slots();
    slots.shuffle(rng);

    let slot = slots
        .into_iter()
        .find(|slot| unit.parts.get(*slot).is_some_and(|p| p.is_usable()))?;
    let category = unit.parts.get(slot)?.category;

    let target = if category.is_attack() {
        Some(random_live_opponent(units, unit.team, rng)?)
    } else {
        None
    };

    Some(AiChoice { slot, target })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::parts::{Medal, Part};
    use crate::core::types::TeamId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fighter(id: u32, team: TeamId) -> Unit {
        Unit::new(UnitId(id), format!("F{}", id), team, Medal::default()).with_parts([
            Part::vulcan_head(),
            Part::rifle(PartSlot::RightArm),
            Part::sword(PartSlot::LeftArm),
            Part::biped_legs(),
        ])
    }

    #[test]
    fn test_choice_is_usable_and_targets_opponent() {
        let units = vec![fighter(1, TeamId::Team1), fighter(2, TeamId::Team2)];
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for _ in 0..50 {
            let choice = choose_action(&units, &units[0], &mut rng).unwrap();
            assert!(units[0].parts.get(choice.slot).unwrap().is_usable());
            assert_eq!(choice.target, Some(UnitId(2)));
        }
    }

    #[test]
    fn test_skips_broken_parts() {
        let mut attacker = fighter(1, TeamId::Team1);
        attacker.parts.insert(Part::vulcan_head().with_timing(0, 0));
        attacker.parts.insert(Part::rifle(PartSlot::RightArm).with_armor(0));
        let units = vec![attacker, fighter(2, TeamId::Team2)];
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        for _ in 0..20 {
            let choice = choose_action(&units, &units[0], &mut rng).unwrap();
            assert_eq!(choice.slot, PartSlot::LeftArm);
        }
    }

    #[test]
    fn test_no_choice_without_usable_parts() {
        let mut attacker = fighter(1, TeamId::Team1);
        attacker.parts.insert(Part::vulcan_head().with_timing(0, 0));
        attacker.parts.insert(Part::rifle(PartSlot::RightArm).with_armor(0));
        attacker.parts.insert(Part::sword(PartSlot::LeftArm).with_armor(0));
        let units = vec![attacker, fighter(2, TeamId::Team2)];
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        assert!(choose_action(&units, &units[0], &mut rng).is_none());
    }

    #[test]
    fn test_no_attack_without_opponents() {
        let mut enemy = fighter(2, TeamId::Team2);
        enemy.mark_broken();
        let units = vec![fighter(1, TeamId::Team1), enemy];
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        assert!(choose_action(&units, &units[0], &mut rng).is_none());
    }

    #[test]
    fn test_attack_drawn_first_without_opponents_means_no_action() {
        let mut unit = fighter(1, TeamId::Team1);
        unit.parts.insert(Part::sensor_head());
        unit.parts.insert(Part::sword(PartSlot::LeftArm).with_armor(0));
        let mut enemy = fighter(2, TeamId::Team2);
        enemy.mark_broken();
        let units = vec![unit, enemy];

        let choices: Vec<Option<AiChoice>> = (0..50)
            .map(|seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                choose_action(&units, &units[0], &mut rng)
            })
            .collect();

        let support = Some(AiChoice {
            slot: PartSlot::Head,
            target: None,
        });
        assert!(choices.iter().all(|c| c.is_none() || *c == support));
        assert!(choices.contains(&None));
        assert!(choices.contains(&support));
    }

    #[test]
    fn test_support_part_needs_no_target() {
        let mut unit = fighter(1, TeamId::Team1);
        unit.parts.insert(Part::sensor_head());
        unit.parts.insert(Part::rifle(PartSlot::RightArm).with_armor(0));
        unit.parts.insert(Part::sword(PartSlot::LeftArm).with_armor(0));
        let mut enemy = fighter(2, TeamId::Team2);
        enemy.mark_broken();
        let units = vec![unit, enemy];
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        assert_eq!(
            choose_action(&units, &units[0], &mut rng),
            Some(AiChoice {
                slot: PartSlot::Head,
                target: None
            })
        );
    }
}
