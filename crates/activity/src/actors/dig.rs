use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::actor::{
    downcast_actor, ActivityActor, ActivityContext, PerTurnWork, RegisteredActor,
    TerminalEffect, Transition,
};
use crate::agent::Agent;
use crate::coords::Tripoint;
use crate::descriptor::{ActivityId, ACT_DIG, ACT_DIG_CHANNEL};

const DIG_NOISE_VOLUME: i32 = 10;
const DIG_NOISE_EVERY_TURNS: u32 = 6;

/// Everything that defines a dig request. Two requests with the same site
/// are the same job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct DigSite {
    location: Tripoint,
    result_terrain: String,
    byproducts_location: Tripoint,
    byproducts_count: u32,
    byproducts_item_group: String,
}

impl DigSite {
    fn start(&self, moves_total: i32, ctx: &mut ActivityContext<'_>) -> Transition {
        if ctx.world.terrain_at(self.location).is_none() {
            ctx.agent.add_msg("There is nothing to dig there.");
            return Transition::Cancel;
        }
        Transition::Wait { moves: moves_total }
    }

    fn turn(&self, ctx: &mut ActivityContext<'_>) -> Transition {
        if ctx.world.terrain_at(self.location).is_none() {
            debug!(location = %self.location, "dig_site_vanished");
            return Transition::Cancel;
        }
        if ctx.progress.turns % DIG_NOISE_EVERY_TURNS == 1 {
            ctx.world.emit_noise(self.location, DIG_NOISE_VOLUME, "hsh!");
        }
        Transition::Continue
    }

    fn finish(&self, ctx: &mut ActivityContext<'_>, message: &str) {
        ctx.world.set_terrain(self.location, &self.result_terrain);
        if self.byproducts_count > 0 {
            ctx.world.spawn_item_group(
                self.byproducts_location,
                &self.byproducts_item_group,
                self.byproducts_count,
            );
        }
        ctx.agent.add_msg(message);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigActor {
    moves_total: i32,
    #[serde(flatten)]
    site: DigSite,
}

impl DigActor {
    pub fn new(
        dig_moves: i32,
        location: Tripoint,
        result_terrain: impl Into<String>,
        byproducts_location: Tripoint,
        byproducts_count: u32,
        byproducts_item_group: impl Into<String>,
    ) -> Self {
        Self {
            moves_total: dig_moves,
            site: DigSite {
                location,
                result_terrain: result_terrain.into(),
                byproducts_location,
                byproducts_count,
                byproducts_item_group: byproducts_item_group.into(),
            },
        }
    }
}

impl ActivityActor for DigActor {
    fn activity_id(&self) -> ActivityId {
        Self::ID
    }

    fn start(&mut self, ctx: &mut ActivityContext<'_>) -> Transition {
        self.site.start(self.moves_total, ctx)
    }

    fn per_turn(&mut self) -> Option<&mut dyn PerTurnWork> {
        Some(self)
    }

    fn terminal(&mut self) -> Option<&mut dyn TerminalEffect> {
        Some(self)
    }

    fn can_resume_with(&self, other: &dyn ActivityActor, _agent: &Agent) -> bool {
        downcast_actor::<DigActor>(other).is_some_and(|other| other.site == self.site)
    }
}

impl PerTurnWork for DigActor {
    fn do_turn(&mut self, ctx: &mut ActivityContext<'_>) -> Transition {
        self.site.turn(ctx)
    }
}

impl TerminalEffect for DigActor {
    fn finish(&mut self, ctx: &mut ActivityContext<'_>) {
        self.site.finish(ctx, "You finish digging.");
    }
}

impl RegisteredActor for DigActor {
    const ID: ActivityId = ACT_DIG;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigChannelActor {
    moves_total: i32,
    #[serde(flatten)]
    site: DigSite,
}

impl DigChannelActor {
    pub fn new(
        dig_moves: i32,
        location: Tripoint,
        result_terrain: impl Into<String>,
        byproducts_location: Tripoint,
        byproducts_count: u32,
        byproducts_item_group: impl Into<String>,
    ) -> Self {
        Self {
            moves_total: dig_moves,
            site: DigSite {
                location,
                result_terrain: result_terrain.into(),
                byproducts_location,
                byproducts_count,
                byproducts_item_group: byproducts_item_group.into(),
            },
        }
    }
}

impl ActivityActor for DigChannelActor {
    fn activity_id(&self) -> ActivityId {
        Self::ID
    }

    fn start(&mut self, ctx: &mut ActivityContext<'_>) -> Transition {
        self.site.start(self.moves_total, ctx)
    }

    fn per_turn(&mut self) -> Option<&mut dyn PerTurnWork> {
        Some(self)
    }

    fn terminal(&mut self) -> Option<&mut dyn TerminalEffect> {
        Some(self)
    }

    fn can_resume_with(&self, other: &dyn ActivityActor, _agent: &Agent) -> bool {
        downcast_actor::<DigChannelActor>(other).is_some_and(|other| other.site == self.site)
    }
}

impl PerTurnWork for DigChannelActor {
    fn do_turn(&mut self, ctx: &mut ActivityContext<'_>) -> Transition {
        self.site.turn(ctx)
    }
}

impl TerminalEffect for DigChannelActor {
    fn finish(&mut self, ctx: &mut ActivityContext<'_>) {
        self.site.finish(ctx, "You finish digging the channel.");
    }
}

impl RegisteredActor for DigChannelActor {
    const ID: ActivityId = ACT_DIG_CHANNEL;
}
