//! Parts: the four equipment slots of a unit and their combat stats
//!
//! A part is broken exactly when its armor is zero. Losing the head breaks
//! the whole unit; losing legs removes propulsion, mobility and leg defense.

use serde::{Deserialize, Serialize};

/// Equipment slot of a part
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PartSlot {
    Head,
    RightArm,
    LeftArm,
    Legs,
}

impl PartSlot {
    /// All slots in canonical order
    pub fn all() -> [PartSlot; 4] {
        [
            PartSlot::Head,
            PartSlot::RightArm,
            PartSlot::LeftArm,
            PartSlot::Legs,
        ]
    }

    /// Slots that can carry an action
    pub fn action_slots() -> [PartSlot; 3] {
        [PartSlot::Head, PartSlot::RightArm, PartSlot::LeftArm]
    }

    fn index(&self) -> usize {
        match self {
            PartSlot::Head => 0,
            PartSlot::RightArm => 1,
            PartSlot::LeftArm => 2,
            PartSlot::Legs => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PartSlot::Head => "head",
            PartSlot::RightArm => "right arm",
            PartSlot::LeftArm => "left arm",
            PartSlot::Legs => "legs",
        }
    }
}

/// Action category of a part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PartCategory {
    /// Ranged: target locked at selection, re-validated at execution
    Shoot,
    /// Melee: target picked among live opponents at execution
    Fight,
    /// No attack (support, legs)
    #[default]
    None,
}

impl PartCategory {
    pub fn is_attack(&self) -> bool {
        matches!(self, PartCategory::Shoot | PartCategory::Fight)
    }
}

/// Action trait: accuracy/damage bonus paid for with a self-inflicted penalty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PartTrait {
    #[default]
    Normal,
    /// Accuracy bonus, own evasion disabled
    Aim,
    /// Accuracy bonus, own defense disabled
    Strike,
    /// Accuracy debuff, propulsion added to power, evasion and defense disabled
    Berserk,
}

impl PartTrait {
    /// Does selecting this trait disable the user's evasion?
    pub fn disables_evasion(&self) -> bool {
        matches!(self, PartTrait::Aim | PartTrait::Berserk)
    }

    /// Does selecting this trait disable the user's defense?
    pub fn disables_defense(&self) -> bool {
        matches!(self, PartTrait::Strike | PartTrait::Berserk)
    }
}

/// Medal modifier carried by a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Medal {
    pub skill_shoot: i32,
    pub skill_fight: i32,
}

impl Medal {
    pub fn new(skill_shoot: i32, skill_fight: i32) -> Self {
        Self {
            skill_shoot,
            skill_fight,
        }
    }

    /// Skill matching an action category (0 for non-attacks)
    pub fn skill_for(&self, category: PartCategory) -> i32 {
        match category {
            PartCategory::Shoot => self.skill_shoot,
            PartCategory::Fight => self.skill_fight,
            PartCategory::None => 0,
        }
    }
}

/// An equipped part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub name: String,
    pub slot: PartSlot,
    pub category: PartCategory,
    pub part_trait: PartTrait,
    pub power: i32,
    pub accuracy: i32,
    pub mobility: i32,
    pub propulsion: i32,
    pub defense: i32,
    pub armor: i32,
    pub max_armor: i32,
    pub charge: i32,
    pub cooldown: i32,
    pub is_broken: bool,
}

impl Part {
    /// A blank, intact part with the given armor
    pub fn new(name: impl Into<String>, slot: PartSlot, max_armor: i32) -> Self {
        let max_armor = max_armor.max(1);
        Self {
            name: name.into(),
            slot,
            category: PartCategory::None,
            part_trait: PartTrait::Normal,
            power: 0,
            accuracy: 0,
            mobility: 0,
            propulsion: 0,
            defense: 0,
            armor: max_armor,
            max_armor,
            charge: 0,
            cooldown: 0,
            is_broken: false,
        }
    }

    pub fn with_action(mut self, category: PartCategory, part_trait: PartTrait) -> Self {
        self.category = category;
        self.part_trait = part_trait;
        self
    }

    pub fn with_power(mut self, power: i32, accuracy: i32) -> Self {
        self.power = power;
        self.accuracy = accuracy;
        self
    }

    pub fn with_timing(mut self, charge: i32, cooldown: i32) -> Self {
        self.charge = charge;
        self.cooldown = cooldown;
        self
    }

    pub fn with_defense(mut self, defense: i32) -> Self {
        self.defense = defense;
        self
    }

    pub fn with_mobility(mut self, mobility: i32, propulsion: i32) -> Self {
        self.mobility = mobility;
        self.propulsion = propulsion;
        self
    }

    /// Set current armor, keeping the broken flag in sync
    pub fn with_armor(mut self, armor: i32) -> Self {
        self.armor = armor.clamp(0, self.max_armor);
        self.is_broken = self.armor == 0;
        self
    }

    /// Can this part start an action?
    pub fn is_usable(&self) -> bool {
        !self.is_broken && self.charge > 0
    }

    /// Subtract damage from armor. Returns true if this hit broke the part.
    pub fn take_damage(&mut self, damage: i32) -> bool {
        self.armor = (self.armor - damage.max(0)).max(0);
        if self.armor == 0 && !self.is_broken {
            self.is_broken = true;
            return true;
        }
        false
    }

    // === PRESETS ===

    /// Rifle arm: plain ranged weapon
    pub fn rifle(slot: PartSlot) -> Self {
        Self::new("Rifle", slot, 40)
            .with_action(PartCategory::Shoot, PartTrait::Normal)
            .with_power(22, 20)
            .with_timing(30, 25)
            .with_defense(6)
    }

    /// Laser arm: aimed shot, accurate but leaves the user unable to evade
    pub fn laser(slot: PartSlot) -> Self {
        Self::new("Laser", slot, 35)
            .with_action(PartCategory::Shoot, PartTrait::Aim)
            .with_power(28, 10)
            .with_timing(20, 35)
            .with_defense(4)
    }

    /// Sword arm: plain melee weapon
    pub fn sword(slot: PartSlot) -> Self {
        Self::new("Sword", slot, 45)
            .with_action(PartCategory::Fight, PartTrait::Normal)
            .with_power(26, 15)
            .with_timing(35, 20)
            .with_defense(8)
    }

    /// Hammer arm: strike, hits hard but drops the user's guard
    pub fn hammer(slot: PartSlot) -> Self {
        Self::new("Hammer", slot, 50)
            .with_action(PartCategory::Fight, PartTrait::Strike)
            .with_power(32, 5)
            .with_timing(25, 30)
            .with_defense(8)
    }

    /// Claw arm: berserk melee fueled by leg propulsion
    pub fn claw(slot: PartSlot) -> Self {
        Self::new("Claw", slot, 40)
            .with_action(PartCategory::Fight, PartTrait::Berserk)
            .with_power(24, 10)
            .with_timing(40, 15)
            .with_defense(5)
    }

    /// Sensor head: support action, no attack
    pub fn sensor_head() -> Self {
        Self::new("Sensor", PartSlot::Head, 30)
            .with_timing(25, 25)
            .with_defense(5)
    }

    /// Vulcan head: weak ranged attack
    pub fn vulcan_head() -> Self {
        Self::new("Vulcan", PartSlot::Head, 30)
            .with_action(PartCategory::Shoot, PartTrait::Normal)
            .with_power(12, 25)
            .with_timing(35, 35)
            .with_defense(5)
    }

    /// Bipedal legs
    pub fn biped_legs() -> Self {
        Self::new("Biped", PartSlot::Legs, 50)
            .with_mobility(15, 20)
            .with_defense(5)
    }

    /// Tank legs: slow, heavily armored
    pub fn tank_legs() -> Self {
        Self::new("Tank", PartSlot::Legs, 70)
            .with_mobility(5, 10)
            .with_defense(12)
    }
}

/// The four part slots of a unit. A slot may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartSet {
    slots: [Option<Part>; 4],
}

impl PartSet {
    /// Build a set, placing each part into its own slot
    pub fn new(parts: impl IntoIterator<Item = Part>) -> Self {
        let mut set = Self::default();
        for part in parts {
            set.insert(part);
        }
        set
    }

    /// Place a part into its slot, returning whatever was there
    pub fn insert(&mut self, part: Part) -> Option<Part> {
        let idx = part.slot.index();
        self.slots[idx].replace(part)
    }

    pub fn get(&self, slot: PartSlot) -> Option<&Part> {
        self.slots[slot.index()].as_ref()
    }

    pub fn get_mut(&mut self, slot: PartSlot) -> Option<&mut Part> {
        self.slots[slot.index()].as_mut()
    }

    /// Part in this slot if present and not broken
    pub fn intact(&self, slot: PartSlot) -> Option<&Part> {
        self.get(slot).filter(|p| !p.is_broken)
    }

    /// Present parts in canonical slot order
    pub fn iter(&self) -> impl Iterator<Item = &Part> {
        self.slots.iter().flatten()
    }

    /// Slots holding a non-broken part, in canonical order
    pub fn intact_slots(&self) -> Vec<PartSlot> {
        self.iter()
            .filter(|p| !p.is_broken)
            .map(|p| p.slot)
            .collect()
    }

    /// Propulsion of intact legs, else 0
    pub fn leg_propulsion(&self) -> i32 {
        self.intact(PartSlot::Legs).map_or(0, |l| l.propulsion)
    }

    /// Mobility of intact legs, else 0
    pub fn leg_mobility(&self) -> i32 {
        self.intact(PartSlot::Legs).map_or(0, |l| l.mobility)
    }

    /// Defense of intact legs, else 0
    pub fn leg_defense(&self) -> i32 {
        self.intact(PartSlot::Legs).map_or(0, |l| l.defense)
    }

    pub fn is_head_broken(&self) -> bool {
        self.get(PartSlot::Head).is_some_and(|h| h.is_broken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_count() {
        assert_eq!(PartSlot::all().len(), 4);
        assert!(!PartSlot::action_slots().contains(&PartSlot::Legs));
    }

    #[test]
    fn test_trait_self_effects() {
        assert!(PartTrait::Aim.disables_evasion());
        assert!(!PartTrait::Aim.disables_defense());
        assert!(PartTrait::Strike.disables_defense());
        assert!(!PartTrait::Strike.disables_evasion());
        assert!(PartTrait::Berserk.disables_evasion());
        assert!(PartTrait::Berserk.disables_defense());
        assert!(!PartTrait::Normal.disables_evasion());
        assert!(!PartTrait::Normal.disables_defense());
    }

    #[test]
    fn test_medal_skill_by_category() {
        let medal = Medal::new(7, 11);
        assert_eq!(medal.skill_for(PartCategory::Shoot), 7);
        assert_eq!(medal.skill_for(PartCategory::Fight), 11);
        assert_eq!(medal.skill_for(PartCategory::None), 0);
    }

    #[test]
    fn test_take_damage_clamps_and_breaks_once() {
        let mut part = Part::rifle(PartSlot::RightArm).with_armor(10);

        assert!(!part.take_damage(4));
        assert_eq!(part.armor, 6);
        assert!(!part.is_broken);

        assert!(part.take_damage(50));
        assert_eq!(part.armor, 0);
        assert!(part.is_broken);

        // Already broken: no second break
        assert!(!part.take_damage(5));
        assert_eq!(part.armor, 0);
    }

    #[test]
    fn test_with_armor_syncs_broken_flag() {
        let part = Part::sword(PartSlot::LeftArm).with_armor(0);
        assert!(part.is_broken);
        let part = Part::sword(PartSlot::LeftArm).with_armor(1000);
        assert_eq!(part.armor, part.max_armor);
        assert!(!part.is_broken);
    }

    #[test]
    fn test_part_set_slots() {
        let set = PartSet::new([
            Part::vulcan_head(),
            Part::rifle(PartSlot::RightArm),
            Part::biped_legs(),
        ]);

        assert!(set.get(PartSlot::Head).is_some());
        assert!(set.get(PartSlot::LeftArm).is_none());
        assert_eq!(set.iter().count(), 3);
        assert_eq!(set.leg_propulsion(), 20);
        assert_eq!(set.leg_mobility(), 15);
    }

    #[test]
    fn test_broken_legs_contribute_nothing() {
        let set = PartSet::new([Part::vulcan_head(), Part::biped_legs().with_armor(0)]);
        assert_eq!(set.leg_propulsion(), 0);
        assert_eq!(set.leg_mobility(), 0);
        assert_eq!(set.leg_defense(), 0);
        assert_eq!(set.intact_slots(), vec![PartSlot::Head]);
    }
}
