use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::actor::{ActivityActor, ActivityContext, PerTurnWork, RegisteredActor, Transition};
use crate::coords::Tripoint;
use crate::descriptor::{ActivityId, ACT_MOVE_ITEMS};
use crate::world::ItemLocation;

use super::handling::{drain_within_budget, queue_from, ActItem};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveItemsActor {
    target_items: VecDeque<ActItem>,
    to_vehicle: bool,
    relative_destination: Tripoint,
}

impl MoveItemsActor {
    pub fn new(
        target_items: impl IntoIterator<Item = (ItemLocation, i32)>,
        to_vehicle: bool,
        relative_destination: Tripoint,
    ) -> Self {
        Self {
            target_items: queue_from(target_items),
            to_vehicle,
            relative_destination,
        }
    }
}

impl ActivityActor for MoveItemsActor {
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

impl PerTurnWork for MoveItemsActor {
    fn do_turn(&mut self, ctx: &mut ActivityContext<'_>) -> Transition {
        let destination = ctx.agent.position + self.relative_destination;
        let to_vehicle = self.to_vehicle;
        drain_within_budget(&mut self.target_items, ctx, |ctx, entry| {
            ctx.world
                .move_item(entry.item, entry.count, destination, to_vehicle);
            true
        })
    }
}

impl RegisteredActor for MoveItemsActor {
    const ID: ActivityId = ACT_MOVE_ITEMS;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{ActivitySlot, TickOutcome};
    use crate::test_support::{test_agent, MockWorld, WorldEvent};

    #[test]
    fn moves_every_item_to_the_vehicle_destination() {
        let mut world = MockWorld::default()
            .with_item(ItemLocation(7), 5)
            .with_item(ItemLocation(8), 5);
        let mut agent = test_agent();
        let mut slot = ActivitySlot::default();

        slot.assign(
            Box::new(MoveItemsActor::new(
                [(ItemLocation(7), 2), (ItemLocation(8), 1)],
                true,
                Tripoint::new(-1, 0, 0),
            )),
            &mut agent,
            &mut world,
        );
        let outcome = slot.run_to_completion(&mut agent, &mut world, 5);

        assert_eq!(outcome, TickOutcome::Finished(ACT_MOVE_ITEMS));
        assert_eq!(
            world.events,
            vec![
                WorldEvent::Moved {
                    item: ItemLocation(7),
                    count: 2,
                    destination: Tripoint::new(-1, 0, 0),
                    to_vehicle: true,
                },
                WorldEvent::Moved {
                    item: ItemLocation(8),
                    count: 1,
                    destination: Tripoint::new(-1, 0, 0),
                    to_vehicle: true,
                },
            ]
        );
    }
}
