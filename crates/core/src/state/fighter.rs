use super::ResourceMeter;
use crate::config::ClampPolicy;

/// Combat capability attached to an entity.
///
/// Pure data: the fighter signals destruction but never touches the grid.
/// Removing the dead entity, logging the event and dropping its items is the
/// caller's job, which keeps damage application safe to run while iterating
/// over a cell's occupants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fighter {
    pub hp: ResourceMeter,
    pub ammo: ResourceMeter,
    pub damage: u32,
    pub defense: u32,
}

/// Result of a single damage application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target survived the hit.
    Survived,
    /// This hit dropped hp to zero. Reported exactly once per life.
    Destroyed,
    /// Target was already at zero hp before the hit.
    AlreadyDestroyed,
}

impl Fighter {
    pub fn new(max_hp: u32, damage: u32) -> Self {
        Self {
            hp: ResourceMeter::full(max_hp),
            ammo: ResourceMeter::new(0, 0),
            damage,
            defense: 0,
        }
    }

    pub fn with_ammo(mut self, ammo: u32, max_ammo: u32) -> Self {
        self.ammo = ResourceMeter::new(ammo, max_ammo);
        self
    }

    pub fn with_defense(mut self, defense: u32) -> Self {
        self.defense = defense;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.hp.current > 0
    }

    /// Applies damage after defense reduction.
    ///
    /// `Destroyed` is only reported on the transition to zero hp, so a second
    /// hit in the same resolution pass comes back as `AlreadyDestroyed` and
    /// the caller removes the entity exactly once.
    pub fn apply_damage(&mut self, amount: u32) -> DamageOutcome {
        if self.hp.current == 0 {
            return DamageOutcome::AlreadyDestroyed;
        }
        let effective = amount.saturating_sub(self.defense);
        self.hp.current = self.hp.current.saturating_sub(effective);
        if self.hp.current == 0 {
            DamageOutcome::Destroyed
        } else {
            DamageOutcome::Survived
        }
    }

    /// Additive heal. Clamping at max_hp is a configurable policy.
    pub fn heal(&mut self, amount: u32, policy: ClampPolicy) {
        self.hp.current = policy.apply(self.hp.current.saturating_add(amount), self.hp.maximum);
    }

    /// Additive ammo restore. Clamping at max_ammo is a configurable policy.
    pub fn restore_ammo(&mut self, amount: u32, policy: ClampPolicy) {
        self.ammo.current =
            policy.apply(self.ammo.current.saturating_add(amount), self.ammo.maximum);
    }

    /// Spends one round of ammo. Returns false when the meter is empty.
    pub fn spend_ammo(&mut self) -> bool {
        if self.ammo.current == 0 {
            return false;
        }
        self.ammo.current -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_is_reduced_by_defense() {
        let mut fighter = Fighter::new(10, 3).with_defense(2);
        assert_eq!(fighter.apply_damage(5), DamageOutcome::Survived);
        assert_eq!(fighter.hp.current, 7);
    }

    #[test]
    fn destruction_is_reported_exactly_once() {
        let mut fighter = Fighter::new(3, 1);
        assert_eq!(fighter.apply_damage(5), DamageOutcome::Destroyed);
        assert_eq!(fighter.apply_damage(5), DamageOutcome::AlreadyDestroyed);
    }

    #[test]
    fn lethal_damage_to_exactly_zero_destroys() {
        let mut fighter = Fighter::new(4, 1);
        assert_eq!(fighter.apply_damage(4), DamageOutcome::Destroyed);
        assert_eq!(fighter.hp.current, 0);
    }

    #[test]
    fn heal_is_unclamped_by_default_policy() {
        let mut fighter = Fighter::new(10, 1);
        fighter.apply_damage(2);
        fighter.heal(5, ClampPolicy::Unclamped);
        assert_eq!(fighter.hp.current, 13);
    }

    #[test]
    fn heal_clamps_under_clamping_policy() {
        let mut fighter = Fighter::new(10, 1);
        fighter.heal(5, ClampPolicy::ClampToMax);
        assert_eq!(fighter.hp.current, 10);
    }

    #[test]
    fn spend_ammo_fails_on_empty_meter() {
        let mut fighter = Fighter::new(5, 1).with_ammo(1, 3);
        assert!(fighter.spend_ammo());
        assert!(!fighter.spend_ammo());
        assert_eq!(fighter.ammo.current, 0);
    }
}
