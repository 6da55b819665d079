use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::actor::{ActivityActor, ActivityContext, PerTurnWork, RegisteredActor, Transition};
use crate::coords::Tripoint;
use crate::descriptor::{ActivityId, ACT_STASH};
use crate::world::ItemLocation;

use super::handling::{drain_within_budget, queue_from, ActItem};

/// Hands items over to whatever carrier stands at `placement` relative to
/// the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StashActor {
    items: VecDeque<ActItem>,
    placement: Tripoint,
}

impl StashActor {
    pub fn new(items: impl IntoIterator<Item = (ItemLocation, i32)>, placement: Tripoint) -> Self {
        Self {
            items: queue_from(items),
            placement,
        }
    }
}

impl ActivityActor for StashActor {
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

impl PerTurnWork for StashActor {
    fn do_turn(&mut self, ctx: &mut ActivityContext<'_>) -> Transition {
        let destination = ctx.agent.position + self.placement;
        drain_within_budget(&mut self.items, ctx, |ctx, entry| {
            ctx.world
                .stash_item(ctx.agent, entry.item, entry.count, destination);
            true
        })
    }
}

impl RegisteredActor for StashActor {
    const ID: ActivityId = ACT_STASH;
}
