use serde::{Deserialize, Serialize};

use crate::actor::{
    downcast_actor, ActivityActor, ActivityContext, RegisteredActor, TerminalEffect, Transition,
};
use crate::agent::Agent;
use crate::coords::Tripoint;
use crate::descriptor::{ActivityId, ACT_TOGGLE_GATE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleGateActor {
    moves_total: i32,
    placement: Tripoint,
}

impl ToggleGateActor {
    pub fn new(gate_moves: i32, placement: Tripoint) -> Self {
        Self {
            moves_total: gate_moves,
            placement,
        }
    }
}

impl ActivityActor for ToggleGateActor {
    fn activity_id(&self) -> ActivityId {
        Self::ID
    }

    fn start(&mut self, ctx: &mut ActivityContext<'_>) -> Transition {
        if !ctx.world.is_gate(self.placement) {
            ctx.agent.add_msg("There is no gate there.");
            return Transition::Cancel;
        }
        Transition::Wait {
            moves: self.moves_total,
        }
    }

    fn terminal(&mut self) -> Option<&mut dyn TerminalEffect> {
        Some(self)
    }

    fn can_resume_with(&self, other: &dyn ActivityActor, _agent: &Agent) -> bool {
        downcast_actor::<ToggleGateActor>(other).is_some_and(|other| other.placement == self.placement)
    }
}

impl TerminalEffect for ToggleGateActor {
    fn finish(&mut self, ctx: &mut ActivityContext<'_>) {
        if ctx.world.is_gate(self.placement) {
            ctx.world.toggle_gate(self.placement);
        }
    }
}

impl RegisteredActor for ToggleGateActor {
    const ID: ActivityId = ACT_TOGGLE_GATE;
}
