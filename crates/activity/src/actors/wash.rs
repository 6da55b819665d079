use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::actor::{ActivityActor, ActivityContext, RegisteredActor, TerminalEffect, Transition};
use crate::descriptor::{ActivityId, ACT_WASH};
use crate::world::ItemLocation;

use super::handling::ActItem;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WashActor {
    targets: Vec<ActItem>,
    moves_total: i32,
}

impl WashActor {
    pub fn new(targets: impl IntoIterator<Item = (ItemLocation, i32)>, moves_total: i32) -> Self {
        Self {
            targets: targets
                .into_iter()
                .map(|(item, count)| ActItem::new(item, count))
                .collect(),
            moves_total,
        }
    }
}

impl ActivityActor for WashActor {
    fn activity_id(&self) -> ActivityId {
        Self::ID
    }

    fn start(&mut self, _ctx: &mut ActivityContext<'_>) -> Transition {
        Transition::Wait {
            moves: self.moves_total,
        }
    }

    fn terminal(&mut self) -> Option<&mut dyn TerminalEffect> {
        Some(self)
    }
}

impl TerminalEffect for WashActor {
    fn finish(&mut self, ctx: &mut ActivityContext<'_>) {
        let present: Vec<&ActItem> = self
            .targets
            .iter()
            .filter(|target| ctx.world.item_exists(target.item))
            .collect();
        if present.is_empty() {
            debug!("wash_targets_vanished");
            return;
        }

        let units: i32 = present.iter().map(|target| target.count).sum();
        if !ctx.world.consume_washing_supplies(ctx.agent, units) {
            ctx.agent.add_msg("You don't have enough cleansing agent.");
            return;
        }
        for target in present {
            ctx.world.wash_item(target.item, target.count);
        }
        ctx.agent.add_msg("You washed your items.");
    }
}

impl RegisteredActor for WashActor {
    const ID: ActivityId = ACT_WASH;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{ActivitySlot, TickOutcome};
    use crate::test_support::{test_agent, MockWorld, WorldEvent};

    #[test]
    fn washes_present_items_after_the_full_duration() {
        let mut world = MockWorld::default()
            .with_item(ItemLocation(1), 10)
            .with_item(ItemLocation(2), 10)
            .with_washing_supplies(10);
        let mut agent = test_agent();
        let mut slot = ActivitySlot::default();

        slot.assign(
            Box::new(WashActor::new(
                [(ItemLocation(1), 2), (ItemLocation(2), 1), (ItemLocation(5), 4)],
                300,
            )),
            &mut agent,
            &mut world,
        );
        for _ in 0..3 {
            assert_eq!(slot.tick(&mut agent, &mut world), TickOutcome::Running(ACT_WASH));
        }
        assert!(world.events.is_empty());
        assert_eq!(slot.tick(&mut agent, &mut world), TickOutcome::Finished(ACT_WASH));

        assert_eq!(
            world.events,
            vec![
                WorldEvent::SuppliesConsumed(3),
                WorldEvent::Washed { item: ItemLocation(1), count: 2 },
                WorldEvent::Washed { item: ItemLocation(2), count: 1 },
            ]
        );
        assert_eq!(world.washing_supplies, 7);
    }

    #[test]
    fn missing_supplies_leave_items_dirty() {
        let mut world = MockWorld::default()
            .with_item(ItemLocation(1), 10)
            .with_washing_supplies(1);
        let mut agent = test_agent();
        let mut slot = ActivitySlot::default();

        slot.assign(
            Box::new(WashActor::new([(ItemLocation(1), 5)], 100)),
            &mut agent,
            &mut world,
        );
        slot.run_to_completion(&mut agent, &mut world, 5);

        assert!(world.events.is_empty());
        assert_eq!(agent.last_message(), Some("You don't have enough cleansing agent."));
    }
}
