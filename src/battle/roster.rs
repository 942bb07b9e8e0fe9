//! Sample rosters built from the part presets

use crate::battle::parts::{Medal, Part, PartSlot};
use crate::battle::units::{Controller, Unit};
use crate::core::types::{TeamId, UnitId};

/// Three against three, one leader per team, all AI
pub fn demo_roster() -> Vec<Unit> {
    vec![
        Unit::new(UnitId(1), "Metabee", TeamId::Team1, Medal::new(12, 6))
            .as_leader()
            .with_parts([
                Part::vulcan_head(),
                Part::rifle(PartSlot::RightArm),
                Part::sword(PartSlot::LeftArm),
                Part::biped_legs(),
            ]),
        Unit::new(UnitId(2), "Rokusho", TeamId::Team1, Medal::new(4, 14)).with_parts([
            Part::sensor_head(),
            Part::hammer(PartSlot::RightArm),
            Part::claw(PartSlot::LeftArm),
            Part::biped_legs(),
        ]),
        Unit::new(UnitId(3), "Brass", TeamId::Team1, Medal::new(10, 8)).with_parts([
            Part::vulcan_head(),
            Part::laser(PartSlot::RightArm),
            Part::rifle(PartSlot::LeftArm),
            Part::tank_legs(),
        ]),
        Unit::new(UnitId(4), "Arcbeetle", TeamId::Team2, Medal::new(8, 10))
            .as_leader()
            .with_parts([
                Part::vulcan_head(),
                Part::hammer(PartSlot::RightArm),
                Part::rifle(PartSlot::LeftArm),
                Part::tank_legs(),
            ]),
        Unit::new(UnitId(5), "Sumilidon", TeamId::Team2, Medal::new(6, 12)).with_parts([
            Part::sensor_head(),
            Part::claw(PartSlot::RightArm),
            Part::sword(PartSlot::LeftArm),
            Part::biped_legs(),
        ]),
        Unit::new(UnitId(6), "Peppercat", TeamId::Team2, Medal::new(12, 4)).with_parts([
            Part::vulcan_head(),
            Part::laser(PartSlot::RightArm),
            Part::laser(PartSlot::LeftArm),
            Part::biped_legs(),
        ]),
    ]
}

/// `per_team` identical units on each side; the first of each team leads
pub fn mirror_roster(per_team: u32) -> Vec<Unit> {
    let mut units = Vec::new();
    let mut next_id = 1;
    for team in TeamId::all() {
        for i in 0..per_team {
            let unit = Unit::new(
                UnitId(next_id),
                format!("{}-{}", team, i + 1),
                team,
                Medal::new(8, 8),
            )
            .with_parts([
                Part::vulcan_head(),
                Part::rifle(PartSlot::RightArm),
                Part::sword(PartSlot::LeftArm),
                Part::biped_legs(),
            ]);
            units.push(if i == 0 { unit.as_leader() } else { unit });
            next_id += 1;
        }
    }
    units
}

/// Hand `team` over to the player
pub fn with_player_team(units: Vec<Unit>, team: TeamId) -> Vec<Unit> {
    units
        .into_iter()
        .map(|u| {
            if u.team == team {
                u.with_controller(Controller::Player)
            } else {
                u
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_demo_roster_shape() {
        let units = demo_roster();
        assert_eq!(units.len(), 6);

        for team in TeamId::all() {
            let members: Vec<_> = units.iter().filter(|u| u.team == team).collect();
            assert_eq!(members.len(), 3);
            assert_eq!(members.iter().filter(|u| u.is_leader).count(), 1);
        }

        let ids: HashSet<_> = units.iter().map(|u| u.id).collect();
        assert_eq!(ids.len(), units.len());
        assert!(units.iter().all(|u| u.parts.get(PartSlot::Head).is_some()));
    }

    #[test]
    fn test_mirror_roster_leaders() {
        let units = mirror_roster(4);
        assert_eq!(units.len(), 8);
        assert_eq!(units.iter().filter(|u| u.is_leader).count(), 2);
        assert_eq!(units[0].id, UnitId(1));
        assert_eq!(units[7].id, UnitId(8));
    }

    #[test]
    fn test_with_player_team() {
        let units = with_player_team(demo_roster(), TeamId::Team1);
        for unit in units {
            let expected = if unit.team == TeamId::Team1 {
                Controller::Player
            } else {
                Controller::Ai
            };
            assert_eq!(unit.controller, expected);
        }
    }
}
