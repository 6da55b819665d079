use serde::{Deserialize, Serialize};

use crate::actor::{ActivityActor, ActivityContext, PerTurnWork, RegisteredActor, Transition};
use crate::coords::Tripoint;
use crate::descriptor::{ActivityId, ACT_THROW};
use crate::world::ItemLocation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrowActor {
    target: ItemLocation,
    /// Where the agent pretends to stand when throwing at an unseen tile.
    blind_throw_from_pos: Option<Tripoint>,
}

impl ThrowActor {
    pub fn new(target: ItemLocation, blind_throw_from_pos: Option<Tripoint>) -> Self {
        Self {
            target,
            blind_throw_from_pos,
        }
    }
}

impl ActivityActor for ThrowActor {
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

impl PerTurnWork for ThrowActor {
    fn do_turn(&mut self, ctx: &mut ActivityContext<'_>) -> Transition {
        if !ctx.world.item_exists(self.target) {
            ctx.agent.add_msg("The item you meant to throw is gone.");
            return Transition::Cancel;
        }
        let Some(destination) =
            ctx.world
                .choose_throw_target(ctx.agent, self.target, self.blind_throw_from_pos)
        else {
            return Transition::Cancel;
        };
        ctx.world
            .throw_item(ctx.agent, self.target, destination, self.blind_throw_from_pos);
        Transition::Complete
    }
}

impl RegisteredActor for ThrowActor {
    const ID: ActivityId = ACT_THROW;
}
