//! Boundary to the simulation the activities act upon.
//!
//! Terrain, items, creatures, vehicles, terminals and the targeting UI are
//! owned elsewhere. Actors only ever see them through these traits, and any
//! side effects beyond the call itself (cave-ins, alarms spreading, vehicles
//! shoving creatures) are the implementor's business.

use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::coords::Tripoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemLocation(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreatureId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(pub u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Energy(pub i64);

impl Energy {
    pub const ZERO: Energy = Energy(0);

    pub const fn from_joules(joules: i64) -> Self {
        Self(joules)
    }

    pub const fn from_kilojoules(kilojoules: i64) -> Self {
        Self(kilojoules * 1_000)
    }

    pub fn joules(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn saturating_sub(self, other: Energy) -> Energy {
        Energy(self.0.saturating_sub(other.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub id: String,
    #[serde(default)]
    pub reload_and_shoot: bool,
    #[serde(default)]
    pub loaded: bool,
}

impl Weapon {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reload_and_shoot: false,
            loaded: false,
        }
    }

    pub fn reload_and_shoot(mut self) -> Self {
        self.reload_and_shoot = true;
        self
    }
}

/// Non-owning reference to a creature. Holding one never keeps the creature
/// alive; callers must resolve it every tick before acting on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreatureRef(CreatureId);

impl CreatureRef {
    pub fn new(id: CreatureId) -> Self {
        Self(id)
    }

    pub fn id(self) -> CreatureId {
        self.0
    }

    pub fn resolve<W: Creatures + ?Sized>(self, world: &W) -> Option<CreatureId> {
        world.creature_exists(self.0).then_some(self.0)
    }
}

/// Non-owning reference to a vehicle, same contract as [`CreatureRef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleRef(VehicleId);

impl VehicleRef {
    pub fn new(id: VehicleId) -> Self {
        Self(id)
    }

    pub fn id(self) -> VehicleId {
        self.0
    }

    pub fn resolve<W: Vehicles + ?Sized>(self, world: &W) -> Option<VehicleId> {
        world.vehicle_exists(self.0).then_some(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutodriveStatus {
    Moving,
    Arrived,
    Obstructed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HackResult {
    Fail,
    Nothing,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AimRequest {
    pub weapon: Weapon,
    pub first_turn: bool,
    pub aiming_at_critter: bool,
    pub snap_to_target: bool,
    pub shifting_view: bool,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AimResponse {
    /// Still aiming; ask again next turn.
    Aiming {
        /// New view offset when the player panned the view this turn.
        view_offset: Option<Tripoint>,
        shifting_view: bool,
        snap_to_target: bool,
        action: String,
    },
    Fire {
        trajectory: Vec<Tripoint>,
        at_critter: bool,
    },
    Abort {
        reload: bool,
    },
}

pub trait Terrain {
    fn terrain_at(&self, at: Tripoint) -> Option<&str>;
    fn set_terrain(&mut self, at: Tripoint, terrain: &str);
    fn emit_noise(&mut self, at: Tripoint, volume: i32, description: &str);
    fn is_gate(&self, at: Tripoint) -> bool;
    fn toggle_gate(&mut self, at: Tripoint);
}

pub trait Items {
    fn item_exists(&self, item: ItemLocation) -> bool;
    /// Moves needed to handle `count` units of `item`.
    fn handling_cost(&self, item: ItemLocation, count: i32) -> i32;
    fn spawn_item_group(&mut self, at: Tripoint, group: &str, count: u32);
    fn drop_item(
        &mut self,
        agent: &Agent,
        item: ItemLocation,
        count: i32,
        destination: Tripoint,
        force_ground: bool,
    );
    fn stash_item(&mut self, agent: &Agent, item: ItemLocation, count: i32, destination: Tripoint);
    fn pickup_item(&mut self, agent: &Agent, item: ItemLocation, count: i32) -> bool;
    fn move_item(
        &mut self,
        item: ItemLocation,
        count: i32,
        destination: Tripoint,
        to_vehicle: bool,
    );
    fn disassembly_moves(&self, item: ItemLocation) -> Option<i32>;
    /// Returns the components the item broke down into.
    fn disassemble_item(
        &mut self,
        agent: &Agent,
        item: ItemLocation,
        at: Tripoint,
    ) -> Vec<ItemLocation>;
    fn consume_washing_supplies(&mut self, agent: &Agent, units: i32) -> bool;
    fn wash_item(&mut self, item: ItemLocation, count: i32);
    fn throw_item(
        &mut self,
        agent: &Agent,
        item: ItemLocation,
        target: Tripoint,
        blind_throw_from: Option<Tripoint>,
    );
}

pub trait Creatures {
    fn creature_exists(&self, id: CreatureId) -> bool;
    fn friendlies_in_line_of_fire(&self, agent: &Agent, trajectory: &[Tripoint]) -> Vec<CreatureId>;
}

pub trait Vehicles {
    fn vehicle_at(&self, at: Tripoint) -> Option<VehicleId>;
    fn vehicle_exists(&self, id: VehicleId) -> bool;
    fn set_autodriving(&mut self, id: VehicleId, enabled: bool);
    /// Advances the vehicle one step along its route, carrying the agent.
    fn autodrive_step(&mut self, agent: &mut Agent, id: VehicleId) -> AutodriveStatus;
}

pub trait Terminals {
    fn attempt_hack(&mut self, agent: &Agent, target: Tripoint, using_bionic: bool) -> HackResult;
    fn unlock(&mut self, target: Tripoint);
    fn trigger_alarm(&mut self, target: Tripoint);
}

pub trait Targeting {
    fn aim_prompt(&mut self, agent: &Agent, request: &AimRequest) -> AimResponse;
    fn confirm_fire_through(&mut self, agent: &Agent, creature: CreatureId) -> bool;
    fn fire_weapon(&mut self, agent: &Agent, weapon: &Weapon, trajectory: &[Tripoint]);
    fn request_reload(&mut self, agent: &Agent, weapon: &Weapon);
    fn choose_throw_target(
        &mut self,
        agent: &Agent,
        item: ItemLocation,
        blind_throw_from: Option<Tripoint>,
    ) -> Option<Tripoint>;
}

pub trait World: Terrain + Items + Creatures + Vehicles + Terminals + Targeting {}

impl<T> World for T where T: Terrain + Items + Creatures + Vehicles + Terminals + Targeting {}
