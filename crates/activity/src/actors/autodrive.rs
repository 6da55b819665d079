use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::actor::{
    ActivityActor, ActivityContext, PerTurnWork, RegisteredActor, ReleaseOnCancel, TerminalEffect,
    Transition,
};
use crate::descriptor::{ActivityId, ACT_AUTODRIVE};
use crate::world::{AutodriveStatus, VehicleId, VehicleRef};

/// Drives the vehicle the agent is sitting in along its programmed route.
///
/// The vehicle is never persisted; after a load it is found again from the
/// agent's position on the next turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutodriveActor {
    #[serde(skip)]
    vehicle: Option<VehicleRef>,
}

impl AutodriveActor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vehicle(&self) -> Option<VehicleRef> {
        self.vehicle
    }

    fn acquire_vehicle(&mut self, ctx: &ActivityContext<'_>) -> Option<VehicleId> {
        if let Some(id) = self.vehicle.and_then(|vehicle| vehicle.resolve(&*ctx.world)) {
            return Some(id);
        }
        let found = ctx.world.vehicle_at(ctx.agent.position);
        self.vehicle = found.map(VehicleRef::new);
        found
    }

    fn stop_driving(&mut self, ctx: &mut ActivityContext<'_>) {
        if let Some(id) = self.vehicle.and_then(|vehicle| vehicle.resolve(&*ctx.world)) {
            ctx.world.set_autodriving(id, false);
        }
    }
}

impl ActivityActor for AutodriveActor {
    fn activity_id(&self) -> ActivityId {
        Self::ID
    }

    fn start(&mut self, ctx: &mut ActivityContext<'_>) -> Transition {
        let Some(id) = self.acquire_vehicle(ctx) else {
            ctx.agent.add_msg("You are not in a vehicle.");
            return Transition::Cancel;
        };
        ctx.world.set_autodriving(id, true);
        Transition::Continue
    }

    fn per_turn(&mut self) -> Option<&mut dyn PerTurnWork> {
        Some(self)
    }

    fn terminal(&mut self) -> Option<&mut dyn TerminalEffect> {
        Some(self)
    }

    fn release(&mut self) -> Option<&mut dyn ReleaseOnCancel> {
        Some(self)
    }
}

impl PerTurnWork for AutodriveActor {
    fn do_turn(&mut self, ctx: &mut ActivityContext<'_>) -> Transition {
        let Some(id) = self.acquire_vehicle(ctx) else {
            debug!("autodrive_vehicle_lost");
            ctx.agent.add_msg("You are no longer in control of a vehicle.");
            return Transition::Cancel;
        };
        match ctx.world.autodrive_step(ctx.agent, id) {
            AutodriveStatus::Moving => Transition::Continue,
            AutodriveStatus::Arrived => {
                ctx.agent.add_msg("You have reached your destination.");
                Transition::Complete
            }
            AutodriveStatus::Obstructed => {
                ctx.agent.add_msg("Something blocks the way; autodrive stops.");
                Transition::Cancel
            }
        }
    }
}

impl TerminalEffect for AutodriveActor {
    fn finish(&mut self, ctx: &mut ActivityContext<'_>) {
        self.stop_driving(ctx);
    }
}

impl ReleaseOnCancel for AutodriveActor {
    fn canceled(&mut self, ctx: &mut ActivityContext<'_>) {
        self.stop_driving(ctx);
    }
}

impl RegisteredActor for AutodriveActor {
    const ID: ActivityId = ACT_AUTODRIVE;
}
