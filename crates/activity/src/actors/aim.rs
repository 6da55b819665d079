//! Aiming a ranged weapon, real or granted by a bionic or mutation.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::actor::{
    ActivityActor, ActivityContext, PerTurnWork, RegisteredActor, ReleaseOnCancel,
    TerminalEffect, Transition,
};
use crate::agent::Agent;
use crate::coords::Tripoint;
use crate::descriptor::{ActivityId, ACT_AIM};
use crate::world::{AimRequest, AimResponse, CreatureRef, Energy, Weapon};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AimActor {
    /// Phantom weapon supplied by a bionic or mutation. `None` aims whatever
    /// the agent is wielding.
    fake_weapon: Option<Weapon>,
    bp_cost_per_shot: Energy,
    fin_trajectory: Vec<Tripoint>,
    first_turn: bool,
    action: String,
    aif_duration: u32,
    aiming_at_critter: bool,
    snap_to_target: bool,
    shifting_view: bool,
    initial_view_offset: Tripoint,
    aborted: bool,
    loaded_ras_weapon: bool,
    reload_requested: bool,
    /// Friendlies the agent already agreed to shoot past this activity.
    acceptable_losses: Vec<CreatureRef>,
}

impl AimActor {
    fn with_weapon(fake_weapon: Option<Weapon>, bp_cost_per_shot: Energy) -> Self {
        Self {
            fake_weapon,
            bp_cost_per_shot,
            fin_trajectory: Vec::new(),
            first_turn: true,
            action: String::new(),
            aif_duration: 0,
            aiming_at_critter: false,
            snap_to_target: false,
            shifting_view: false,
            initial_view_offset: Tripoint::ZERO,
            aborted: false,
            loaded_ras_weapon: false,
            reload_requested: false,
            acceptable_losses: Vec::new(),
        }
    }

    pub fn use_wielded() -> Self {
        Self::with_weapon(None, Energy::ZERO)
    }

    pub fn use_bionic(fake_gun: Weapon, cost_per_shot: Energy) -> Self {
        Self::with_weapon(Some(fake_gun), cost_per_shot)
    }

    pub fn use_mutation(fake_gun: Weapon) -> Self {
        Self::with_weapon(Some(fake_gun), Energy::ZERO)
    }

    pub fn fake_weapon(&self) -> Option<&Weapon> {
        self.fake_weapon.as_ref()
    }

    pub fn bp_cost_per_shot(&self) -> Energy {
        self.bp_cost_per_shot
    }

    pub fn aborted(&self) -> bool {
        self.aborted
    }

    pub fn aif_duration(&self) -> u32 {
        self.aif_duration
    }

    pub fn acceptable_losses(&self) -> &[CreatureRef] {
        &self.acceptable_losses
    }

    pub fn weapon<'a>(&'a self, agent: &'a Agent) -> Option<&'a Weapon> {
        self.fake_weapon.as_ref().or(agent.wielded.as_ref())
    }

    fn weapon_mut<'a>(&'a mut self, agent: &'a mut Agent) -> Option<&'a mut Weapon> {
        match self.fake_weapon.as_mut() {
            Some(weapon) => Some(weapon),
            None => agent.wielded.as_mut(),
        }
    }

    fn restore_view(&self, agent: &mut Agent) {
        if !self.first_turn {
            agent.view_offset = self.initial_view_offset;
        }
    }

    /// Loads a reload-and-shoot weapon for the duration of the activity.
    /// Returns false when it needed loading and could not be loaded.
    fn load_ras_weapon(&mut self, agent: &mut Agent) -> bool {
        let needs_loading = self
            .weapon(agent)
            .is_some_and(|weapon| weapon.reload_and_shoot && !weapon.loaded);
        if !needs_loading {
            return true;
        }
        if agent.spare_ammo == 0 {
            agent.add_msg("You need ammunition to load your weapon.");
            return false;
        }
        agent.spare_ammo -= 1;
        if let Some(weapon) = self.weapon_mut(agent) {
            weapon.loaded = true;
        }
        self.loaded_ras_weapon = true;
        true
    }

    fn unload_ras_weapon(&mut self, agent: &mut Agent) {
        if !self.loaded_ras_weapon {
            return;
        }
        self.loaded_ras_weapon = false;
        let refunded = match self.weapon_mut(agent) {
            Some(weapon) if weapon.loaded => {
                weapon.loaded = false;
                true
            }
            _ => false,
        };
        if refunded {
            agent.spare_ammo += 1;
        }
    }

    /// Asks about every friendly in the way that has not been waved through
    /// already. Declining any of them aborts the shot.
    fn confirm_line_of_fire(&mut self, ctx: &mut ActivityContext<'_>, trajectory: &[Tripoint]) -> bool {
        self.acceptable_losses
            .retain(|creature| creature.resolve(&*ctx.world).is_some());

        for creature in ctx.world.friendlies_in_line_of_fire(ctx.agent, trajectory) {
            if self.acceptable_losses.iter().any(|known| known.id() == creature) {
                continue;
            }
            if !ctx.world.confirm_fire_through(ctx.agent, creature) {
                return false;
            }
            self.acceptable_losses.push(CreatureRef::new(creature));
        }
        true
    }
}

impl ActivityActor for AimActor {
    fn activity_id(&self) -> ActivityId {
        Self::ID
    }

    fn start(&mut self, ctx: &mut ActivityContext<'_>) -> Transition {
        if self.weapon(ctx.agent).is_none() {
            ctx.agent.add_msg("You have nothing to aim.");
            return Transition::Cancel;
        }
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

impl PerTurnWork for AimActor {
    fn do_turn(&mut self, ctx: &mut ActivityContext<'_>) -> Transition {
        if self.first_turn {
            self.initial_view_offset = ctx.agent.view_offset;
            self.first_turn = false;
            if !self.load_ras_weapon(ctx.agent) {
                self.aborted = true;
                return Transition::Complete;
            }
        }

        let Some(weapon) = self.weapon(ctx.agent).cloned() else {
            debug!("aim_weapon_lost");
            self.aborted = true;
            return Transition::Complete;
        };
        let request = AimRequest {
            weapon,
            first_turn: self.aif_duration == 0,
            aiming_at_critter: self.aiming_at_critter,
            snap_to_target: self.snap_to_target,
            shifting_view: self.shifting_view,
            action: self.action.clone(),
        };
        self.aif_duration += 1;

        match ctx.world.aim_prompt(ctx.agent, &request) {
            AimResponse::Aiming {
                view_offset,
                shifting_view,
                snap_to_target,
                action,
            } => {
                if let Some(offset) = view_offset {
                    ctx.agent.view_offset = offset;
                }
                self.shifting_view = shifting_view;
                self.snap_to_target = snap_to_target;
                self.action = action;
                Transition::Continue
            }
            AimResponse::Fire {
                trajectory,
                at_critter,
            } => {
                self.aiming_at_critter = at_critter;
                if self.confirm_line_of_fire(ctx, &trajectory) {
                    self.fin_trajectory = trajectory;
                } else {
                    debug!("aim_shot_declined");
                    self.aborted = true;
                }
                Transition::Complete
            }
            AimResponse::Abort { reload } => {
                self.aborted = true;
                self.reload_requested = reload;
                Transition::Complete
            }
        }
    }
}

impl TerminalEffect for AimActor {
    fn finish(&mut self, ctx: &mut ActivityContext<'_>) {
        self.restore_view(ctx.agent);

        if self.aborted {
            self.unload_ras_weapon(ctx.agent);
            if self.reload_requested {
                if let Some(weapon) = self.weapon(ctx.agent).cloned() {
                    ctx.world.request_reload(ctx.agent, &weapon);
                }
            }
            return;
        }

        if !self.bp_cost_per_shot.is_zero()
            && !ctx.agent.try_spend_bionic_power(self.bp_cost_per_shot)
        {
            ctx.agent.add_msg("Your bionics lack the power to fire.");
            self.unload_ras_weapon(ctx.agent);
            return;
        }

        let Some(weapon) = self.weapon(ctx.agent).cloned() else {
            return;
        };
        info!(
            weapon = %weapon.id,
            turns_aimed = self.aif_duration,
            tiles = self.fin_trajectory.len(),
            "aim_fired"
        );
        ctx.world.fire_weapon(ctx.agent, &weapon, &self.fin_trajectory);
        if self.loaded_ras_weapon {
            self.loaded_ras_weapon = false;
            if let Some(weapon) = self.weapon_mut(ctx.agent) {
                weapon.loaded = false;
            }
        }
    }
}

impl ReleaseOnCancel for AimActor {
    fn canceled(&mut self, ctx: &mut ActivityContext<'_>) {
        self.restore_view(ctx.agent);
        self.unload_ras_weapon(ctx.agent);
    }
}

impl RegisteredActor for AimActor {
    const ID: ActivityId = ACT_AIM;
}
