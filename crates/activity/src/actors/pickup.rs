use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::actor::{ActivityActor, ActivityContext, PerTurnWork, RegisteredActor, Transition};
use crate::coords::Tripoint;
use crate::descriptor::{ActivityId, ACT_PICKUP};
use crate::world::ItemLocation;

use super::handling::{drain_within_budget, queue_from, ActItem};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupActor {
    targets: VecDeque<ActItem>,
    /// Set only when picking up from the ground. Items on a vehicle that has
    /// since moved are no longer where the agent expects them.
    starting_pos: Option<Tripoint>,
}

impl PickupActor {
    pub fn new(
        targets: impl IntoIterator<Item = (ItemLocation, i32)>,
        starting_pos: Option<Tripoint>,
    ) -> Self {
        Self {
            targets: queue_from(targets),
            starting_pos,
        }
    }
}

impl ActivityActor for PickupActor {
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

impl PerTurnWork for PickupActor {
    fn do_turn(&mut self, ctx: &mut ActivityContext<'_>) -> Transition {
        if let Some(starting_pos) = self.starting_pos {
            if ctx.agent.position != starting_pos {
                debug!(
                    expected = %starting_pos,
                    actual = %ctx.agent.position,
                    "pickup_position_changed"
                );
                ctx.agent.add_msg("Moving canceled auto-pickup.");
                return Transition::Cancel;
            }
        }

        drain_within_budget(&mut self.targets, ctx, |ctx, entry| {
            if ctx.world.pickup_item(ctx.agent, entry.item, entry.count) {
                return true;
            }
            ctx.agent.add_msg("You can't carry any more.");
            false
        })
    }
}

impl RegisteredActor for PickupActor {
    const ID: ActivityId = ACT_PICKUP;
}
