use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::actor::{ActivityActor, ActivityContext, PerTurnWork, RegisteredActor, Transition};
use crate::coords::Tripoint;
use crate::descriptor::{ActivityId, ACT_DROP};
use crate::world::ItemLocation;

use super::handling::{drain_within_budget, queue_from, ActItem};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropActor {
    items: VecDeque<ActItem>,
    /// Destination relative to wherever the agent stands when each item goes.
    placement: Tripoint,
    force_ground: bool,
}

impl DropActor {
    pub fn new(
        items: impl IntoIterator<Item = (ItemLocation, i32)>,
        placement: Tripoint,
        force_ground: bool,
    ) -> Self {
        Self {
            items: queue_from(items),
            placement,
            force_ground,
        }
    }
}

impl ActivityActor for DropActor {
    fn activity_id(&self) -> ActivityId {
        Self::ID
    }

    fn start(&mut self, _ctx: &mut ActivityContext<'_>) -> Transition {
        Transition::Continue
    }

    fn per_turn(&mut self) -> Option<&mut dyn PerTurnWork> {
        Some(self)
    }
}

impl PerTurnWork for DropActor {
    fn do_turn(&mut self, ctx: &mut ActivityContext<'_>) -> Transition {
        let destination = ctx.agent.position + self.placement;
        let force_ground = self.force_ground;
        drain_within_budget(&mut self.items, ctx, |ctx, entry| {
            ctx.world
                .drop_item(ctx.agent, entry.item, entry.count, destination, force_ground);
            true
        })
    }
}

impl RegisteredActor for DropActor {
    const ID: ActivityId = ACT_DROP;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{ActivitySlot, TickOutcome};
    use crate::test_support::{test_agent, MockWorld, WorldEvent};

    #[test]
    fn drops_as_many_items_as_the_budget_allows_each_tick() {
        let mut world = MockWorld::default()
            .with_item(ItemLocation(1), 40)
            .with_item(ItemLocation(2), 40)
            .with_item(ItemLocation(3), 40);
        let mut agent = test_agent();
        let mut slot = ActivitySlot::default();
        let drop = DropActor::new(
            [(ItemLocation(1), 1), (ItemLocation(2), 1), (ItemLocation(3), 1)],
            Tripoint::new(1, 0, 0),
            false,
        );

        slot.assign(Box::new(drop), &mut agent, &mut world);
        assert_eq!(slot.tick(&mut agent, &mut world), TickOutcome::Running(ACT_DROP));
        assert_eq!(world.events.len(), 2);
        slot.tick(&mut agent, &mut world);
        assert_eq!(world.events.len(), 3);
        assert_eq!(slot.tick(&mut agent, &mut world), TickOutcome::Finished(ACT_DROP));
        assert_eq!(
            world.events[0],
            WorldEvent::Dropped {
                item: ItemLocation(1),
                count: 1,
                destination: Tripoint::new(1, 0, 0),
                force_ground: false,
            }
        );
    }

    #[test]
    fn heavy_item_carries_partial_progress_across_ticks() {
        let mut world = MockWorld::default().with_item(ItemLocation(9), 250);
        let mut agent = test_agent();
        let mut slot = ActivitySlot::default();

        slot.assign(
            Box::new(DropActor::new([(ItemLocation(9), 1)], Tripoint::ZERO, true)),
            &mut agent,
            &mut world,
        );
        slot.tick(&mut agent, &mut world);
        slot.tick(&mut agent, &mut world);
        assert!(world.events.is_empty());
        slot.tick(&mut agent, &mut world);
        assert_eq!(world.events.len(), 1);
        assert_eq!(slot.tick(&mut agent, &mut world), TickOutcome::Finished(ACT_DROP));
    }

    #[test]
    fn vanished_items_are_skipped() {
        let mut world = MockWorld::default().with_item(ItemLocation(2), 10);
        let mut agent = test_agent();
        let mut slot = ActivitySlot::default();

        slot.assign(
            Box::new(DropActor::new(
                [(ItemLocation(1), 1), (ItemLocation(2), 3)],
                Tripoint::ZERO,
                false,
            )),
            &mut agent,
            &mut world,
        );
        let outcome = slot.run_to_completion(&mut agent, &mut world, 5);

        assert_eq!(outcome, TickOutcome::Finished(ACT_DROP));
        assert_eq!(world.events.len(), 1);
    }
}
