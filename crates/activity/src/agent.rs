use crate::coords::Tripoint;
use crate::world::{CreatureId, Energy, Weapon};

/// The entity performing activities. The world owns everything else; the
/// agent carries only what the activity callbacks read or adjust directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub id: CreatureId,
    pub position: Tripoint,
    pub view_offset: Tripoint,
    pub wielded: Option<Weapon>,
    pub bionic_power: Energy,
    pub spare_ammo: u32,
    messages: Vec<String>,
}

impl Agent {
    pub fn new(id: CreatureId, position: Tripoint) -> Self {
        Self {
            id,
            position,
            view_offset: Tripoint::ZERO,
            wielded: None,
            bionic_power: Energy::ZERO,
            spare_ammo: 0,
            messages: Vec::new(),
        }
    }

    pub fn with_wielded(mut self, weapon: Weapon) -> Self {
        self.wielded = Some(weapon);
        self
    }

    pub fn with_bionic_power(mut self, power: Energy) -> Self {
        self.bionic_power = power;
        self
    }

    pub fn with_spare_ammo(mut self, spare_ammo: u32) -> Self {
        self.spare_ammo = spare_ammo;
        self
    }

    pub fn add_msg(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }

    pub fn drain_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    pub fn try_spend_bionic_power(&mut self, cost: Energy) -> bool {
        if self.bionic_power < cost {
            return false;
        }
        self.bionic_power = self.bionic_power.saturating_sub(cost);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bionic_power_is_not_spent_when_insufficient() {
        let mut agent = Agent::new(CreatureId(1), Tripoint::ZERO)
            .with_bionic_power(Energy::from_joules(500));
        assert!(!agent.try_spend_bionic_power(Energy::from_joules(501)));
        assert_eq!(agent.bionic_power, Energy::from_joules(500));
        assert!(agent.try_spend_bionic_power(Energy::from_joules(200)));
        assert_eq!(agent.bionic_power, Energy::from_joules(300));
    }

    #[test]
    fn messages_drain_in_order() {
        let mut agent = Agent::new(CreatureId(1), Tripoint::ZERO);
        agent.add_msg("first");
        agent.add_msg("second");
        assert_eq!(agent.last_message(), Some("second"));
        assert_eq!(agent.drain_messages(), vec!["first", "second"]);
        assert!(agent.messages().is_empty());
    }
}
