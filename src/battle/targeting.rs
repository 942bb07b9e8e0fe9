//! Target resolution at execution time
//!
//! Shoot actions keep the target locked at selection and fail if it is gone.
//! Fight actions ignore any tentative target and draw uniformly from the
//! opponents alive right now.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::battle::parts::PartCategory;
use crate::battle::units::Unit;
use crate::core::types::{TeamId, UnitId};

/// Result of resolving the unit an action affects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetResolution {
    /// Attack lands on this unit
    Target(UnitId),
    /// Non-attack action, no target involved
    NotNeeded,
    /// Locked ranged target missing or broken (None = nothing was locked)
    TargetLost(Option<UnitId>),
    /// No live opponent to draw a melee target from
    NoCandidates,
}

/// Look up a unit by id
pub fn find_unit(units: &[Unit], id: UnitId) -> Option<&Unit> {
    units.iter().find(|u| u.id == id)
}

/// Ids of non-broken units on the opposing team, in roster order
pub fn live_opponents(units: &[Unit], team: TeamId) -> Vec<UnitId> {
    let opponent = team.opponent();
    units
        .iter()
        .filter(|u| u.team == opponent && u.is_alive())
        .map(|u| u.id)
        .collect()
}

/// Is this unit a legal target for `attacker` right now?
pub fn is_valid_target(units: &[Unit], attacker_team: TeamId, target: UnitId) -> bool {
    find_unit(units, target).is_some_and(|u| u.team != attacker_team && u.is_alive())
}

/// Uniform draw over the current live opponents
pub fn random_live_opponent<R: Rng>(units: &[Unit], team: TeamId, rng: &mut R) -> Option<UnitId> {
    live_opponents(units, team).choose(rng).copied()
}

/// Decide the target of `attacker`'s selected action
pub fn resolve_target<R: Rng>(
    units: &[Unit],
    attacker: &Unit,
    category: PartCategory,
    rng: &mut R,
) -> TargetResolution {
    match category {
        PartCategory::Shoot => match attacker.pending_target {
            Some(target) if find_unit(units, target).is_some_and(|u| u.is_alive()) => {
                TargetResolution::Target(target)
            }
            locked => TargetResolution::TargetLost(locked),
        },
        PartCategory::Fight => match random_live_opponent(units, attacker.team, rng) {
            Some(target) => TargetResolution::Target(target),
            None => TargetResolution::NoCandidates,
        },
        PartCategory::None => TargetResolution::NotNeeded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::parts::{Medal, Part};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn unit(id: u32, team: TeamId) -> Unit {
        Unit::new(UnitId(id), format!("U{}", id), team, Medal::default())
            .with_parts([Part::vulcan_head(), Part::biped_legs()])
    }

    fn roster() -> Vec<Unit> {
        vec![
            unit(1, TeamId::Team1),
            unit(2, TeamId::Team1),
            unit(3, TeamId::Team2),
            unit(4, TeamId::Team2),
            unit(5, TeamId::Team2),
        ]
    }

    #[test]
    fn test_live_opponents_excludes_broken_and_allies() {
        let mut units = roster();
        units[3].mark_broken();

        assert_eq!(
            live_opponents(&units, TeamId::Team1),
            vec![UnitId(3), UnitId(5)]
        );
        assert_eq!(
            live_opponents(&units, TeamId::Team2),
            vec![UnitId(1), UnitId(2)]
        );
    }

    #[test]
    fn test_shoot_keeps_live_locked_target() {
        let units = roster();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut attacker = units[0].clone();
        attacker.pending_target = Some(UnitId(4));

        assert_eq!(
            resolve_target(&units, &attacker, PartCategory::Shoot, &mut rng),
            TargetResolution::Target(UnitId(4))
        );
    }

    #[test]
    fn test_shoot_fails_when_locked_target_broken() {
        let mut units = roster();
        units[3].mark_broken();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut attacker = units[0].clone();
        attacker.pending_target = Some(UnitId(4));

        // No fallback even though other opponents are alive
        assert_eq!(
            resolve_target(&units, &attacker, PartCategory::Shoot, &mut rng),
            TargetResolution::TargetLost(Some(UnitId(4)))
        );
    }

    #[test]
    fn test_shoot_fails_for_unknown_target() {
        let units = roster();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut attacker = units[0].clone();
        attacker.pending_target = Some(UnitId(99));

        assert_eq!(
            resolve_target(&units, &attacker, PartCategory::Shoot, &mut rng),
            TargetResolution::TargetLost(Some(UnitId(99)))
        );
    }

    #[test]
    fn test_fight_ignores_tentative_target() {
        let mut units = roster();
        units[2].mark_broken();
        units[3].mark_broken();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut attacker = units[0].clone();
        attacker.pending_target = Some(UnitId(3));

        for _ in 0..20 {
            assert_eq!(
                resolve_target(&units, &attacker, PartCategory::Fight, &mut rng),
                TargetResolution::Target(UnitId(5))
            );
        }
    }

    #[test]
    fn test_fight_without_opponents_has_no_candidates() {
        let mut units = roster();
        for u in units.iter_mut().filter(|u| u.team == TeamId::Team2) {
            u.mark_broken();
        }
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        assert_eq!(
            resolve_target(&units, &units[0], PartCategory::Fight, &mut rng),
            TargetResolution::NoCandidates
        );
    }

    #[test]
    fn test_fight_draws_cover_every_live_opponent() {
        let units = roster();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut seen = std::collections::HashSet::new();

        for _ in 0..200 {
            if let TargetResolution::Target(id) =
                resolve_target(&units, &units[0], PartCategory::Fight, &mut rng)
            {
                assert_eq!(find_unit(&units, id).map(|u| u.team), Some(TeamId::Team2));
                seen.insert(id);
            }
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_support_needs_no_target() {
        let units = roster();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            resolve_target(&units, &units[0], PartCategory::None, &mut rng),
            TargetResolution::NotNeeded
        );
    }

    #[test]
    fn test_is_valid_target() {
        let mut units = roster();
        units[4].mark_broken();
        assert!(is_valid_target(&units, TeamId::Team1, UnitId(3)));
        assert!(!is_valid_target(&units, TeamId::Team1, UnitId(2)));
        assert!(!is_valid_target(&units, TeamId::Team1, UnitId(5)));
        assert!(!is_valid_target(&units, TeamId::Team1, UnitId(42)));
    }
}
