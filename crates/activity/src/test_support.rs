//! Recording world double shared by the unit tests.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::agent::Agent;
use crate::coords::Tripoint;
use crate::world::{
    AimRequest, AimResponse, AutodriveStatus, CreatureId, Creatures, HackResult, ItemLocation,
    Items, Targeting, Terminals, Terrain, VehicleId, Vehicles, Weapon,
};

pub(crate) fn test_agent() -> Agent {
    Agent::new(CreatureId(1), Tripoint::ZERO)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WorldEvent {
    TerrainSet { at: Tripoint, terrain: String },
    Noise { at: Tripoint, volume: i32 },
    GateToggled(Tripoint),
    Spawned { at: Tripoint, group: String, count: u32 },
    Dropped { item: ItemLocation, count: i32, destination: Tripoint, force_ground: bool },
    Stashed { item: ItemLocation, count: i32, destination: Tripoint },
    PickedUp { item: ItemLocation, count: i32 },
    Moved { item: ItemLocation, count: i32, destination: Tripoint, to_vehicle: bool },
    Disassembled { item: ItemLocation, at: Tripoint },
    SuppliesConsumed(i32),
    Washed { item: ItemLocation, count: i32 },
    Thrown { item: ItemLocation, target: Tripoint, blind_from: Option<Tripoint> },
    Autodriving { vehicle: VehicleId, enabled: bool },
    HackAttempted { using_bionic: bool },
    Unlocked(Tripoint),
    Alarm(Tripoint),
    Fired { weapon: String, trajectory: Vec<Tripoint> },
    ReloadRequested(String),
    ConfirmAsked(CreatureId),
}

#[derive(Debug, Clone)]
pub(crate) struct MockItem {
    pub handling_cost: i32,
    pub disassembly_moves: Option<i32>,
    pub components: Vec<ItemLocation>,
}

impl Default for MockItem {
    fn default() -> Self {
        Self {
            handling_cost: 25,
            disassembly_moves: None,
            components: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct MockVehicle {
    pub position: Tripoint,
    pub route: VecDeque<AutodriveStatus>,
    pub autodriving: bool,
}

#[derive(Debug, Default)]
pub(crate) struct MockWorld {
    pub terrain: HashMap<Tripoint, String>,
    pub gates: HashSet<Tripoint>,
    pub items: HashMap<ItemLocation, MockItem>,
    pub creatures: HashSet<CreatureId>,
    pub friendlies_in_fire: Vec<CreatureId>,
    pub vehicles: HashMap<VehicleId, MockVehicle>,
    pub aim_script: VecDeque<AimResponse>,
    pub aim_requests: Vec<AimRequest>,
    pub confirm_fire: bool,
    pub throw_target: Option<Tripoint>,
    pub hack_result: Option<HackResult>,
    pub refuse_pickup: bool,
    pub washing_supplies: i32,
    pub events: Vec<WorldEvent>,
}

impl MockWorld {
    pub fn with_terrain(mut self, at: Tripoint, terrain: &str) -> Self {
        self.terrain.insert(at, terrain.to_string());
        self
    }

    pub fn with_gate(mut self, at: Tripoint) -> Self {
        self.gates.insert(at);
        self
    }

    pub fn with_item(mut self, item: ItemLocation, handling_cost: i32) -> Self {
        self.items.insert(
            item,
            MockItem {
                handling_cost,
                ..MockItem::default()
            },
        );
        self
    }

    pub fn with_disassemblable(
        mut self,
        item: ItemLocation,
        moves: i32,
        components: &[ItemLocation],
    ) -> Self {
        let entry = self.items.entry(item).or_default();
        entry.disassembly_moves = Some(moves);
        entry.components = components.to_vec();
        self
    }

    pub fn with_creature(mut self, id: CreatureId) -> Self {
        self.creatures.insert(id);
        self
    }

    pub fn with_vehicle(
        mut self,
        id: VehicleId,
        position: Tripoint,
        route: &[AutodriveStatus],
    ) -> Self {
        self.vehicles.insert(
            id,
            MockVehicle {
                position,
                route: route.iter().copied().collect(),
                autodriving: false,
            },
        );
        self
    }

    pub fn with_aim_script(mut self, responses: Vec<AimResponse>) -> Self {
        self.aim_script = responses.into();
        self
    }

    pub fn with_washing_supplies(mut self, units: i32) -> Self {
        self.washing_supplies = units;
        self
    }
}

impl Terrain for MockWorld {
    fn terrain_at(&self, at: Tripoint) -> Option<&str> {
        self.terrain.get(&at).map(String::as_str)
    }

    fn set_terrain(&mut self, at: Tripoint, terrain: &str) {
        self.terrain.insert(at, terrain.to_string());
        self.events.push(WorldEvent::TerrainSet {
            at,
            terrain: terrain.to_string(),
        });
    }

    fn emit_noise(&mut self, at: Tripoint, volume: i32, _description: &str) {
        self.events.push(WorldEvent::Noise { at, volume });
    }

    fn is_gate(&self, at: Tripoint) -> bool {
        self.gates.contains(&at)
    }

    fn toggle_gate(&mut self, at: Tripoint) {
        self.events.push(WorldEvent::GateToggled(at));
    }
}

impl Items for MockWorld {
    fn item_exists(&self, item: ItemLocation) -> bool {
        self.items.contains_key(&item)
    }

    fn handling_cost(&self, item: ItemLocation, count: i32) -> i32 {
        self.items
            .get(&item)
            .map_or(0, |entry| entry.handling_cost * count.max(1))
    }

    fn spawn_item_group(&mut self, at: Tripoint, group: &str, count: u32) {
        self.events.push(WorldEvent::Spawned {
            at,
            group: group.to_string(),
            count,
        });
    }

    fn drop_item(
        &mut self,
        _agent: &Agent,
        item: ItemLocation,
        count: i32,
        destination: Tripoint,
        force_ground: bool,
    ) {
        self.items.remove(&item);
        self.events.push(WorldEvent::Dropped {
            item,
            count,
            destination,
            force_ground,
        });
    }

    fn stash_item(&mut self, _agent: &Agent, item: ItemLocation, count: i32, destination: Tripoint) {
        self.items.remove(&item);
        self.events.push(WorldEvent::Stashed {
            item,
            count,
            destination,
        });
    }

    fn pickup_item(&mut self, _agent: &Agent, item: ItemLocation, count: i32) -> bool {
        if self.refuse_pickup {
            return false;
        }
        self.items.remove(&item);
        self.events.push(WorldEvent::PickedUp { item, count });
        true
    }

    fn move_item(&mut self, item: ItemLocation, count: i32, destination: Tripoint, to_vehicle: bool) {
        self.items.remove(&item);
        self.events.push(WorldEvent::Moved {
            item,
            count,
            destination,
            to_vehicle,
        });
    }

    fn disassembly_moves(&self, item: ItemLocation) -> Option<i32> {
        self.items.get(&item).and_then(|entry| entry.disassembly_moves)
    }

    fn disassemble_item(
        &mut self,
        _agent: &Agent,
        item: ItemLocation,
        at: Tripoint,
    ) -> Vec<ItemLocation> {
        let Some(entry) = self.items.remove(&item) else {
            return Vec::new();
        };
        for component in &entry.components {
            self.items.entry(*component).or_default();
        }
        self.events.push(WorldEvent::Disassembled { item, at });
        entry.components
    }

    fn consume_washing_supplies(&mut self, _agent: &Agent, units: i32) -> bool {
        if self.washing_supplies < units {
            return false;
        }
        self.washing_supplies -= units;
        self.events.push(WorldEvent::SuppliesConsumed(units));
        true
    }

    fn wash_item(&mut self, item: ItemLocation, count: i32) {
        self.events.push(WorldEvent::Washed { item, count });
    }

    fn throw_item(
        &mut self,
        _agent: &Agent,
        item: ItemLocation,
        target: Tripoint,
        blind_throw_from: Option<Tripoint>,
    ) {
        self.items.remove(&item);
        self.events.push(WorldEvent::Thrown {
            item,
            target,
            blind_from: blind_throw_from,
        });
    }
}

impl Creatures for MockWorld {
    fn creature_exists(&self, id: CreatureId) -> bool {
        self.creatures.contains(&id)
    }

    fn friendlies_in_line_of_fire(&self, _agent: &Agent, _trajectory: &[Tripoint]) -> Vec<CreatureId> {
        self.friendlies_in_fire
            .iter()
            .copied()
            .filter(|id| self.creatures.contains(id))
            .collect()
    }
}

impl Vehicles for MockWorld {
    fn vehicle_at(&self, at: Tripoint) -> Option<VehicleId> {
        self.vehicles
            .iter()
            .find(|(_, vehicle)| vehicle.position == at)
            .map(|(id, _)| *id)
    }

    fn vehicle_exists(&self, id: VehicleId) -> bool {
        self.vehicles.contains_key(&id)
    }

    fn set_autodriving(&mut self, id: VehicleId, enabled: bool) {
        if let Some(vehicle) = self.vehicles.get_mut(&id) {
            vehicle.autodriving = enabled;
        }
        self.events.push(WorldEvent::Autodriving {
            vehicle: id,
            enabled,
        });
    }

    fn autodrive_step(&mut self, agent: &mut Agent, id: VehicleId) -> AutodriveStatus {
        let Some(vehicle) = self.vehicles.get_mut(&id) else {
            return AutodriveStatus::Obstructed;
        };
        let status = vehicle.route.pop_front().unwrap_or(AutodriveStatus::Arrived);
        if status == AutodriveStatus::Moving {
            vehicle.position = vehicle.position + Tripoint::new(1, 0, 0);
            agent.position = vehicle.position;
        }
        status
    }
}

impl Terminals for MockWorld {
    fn attempt_hack(&mut self, _agent: &Agent, _target: Tripoint, using_bionic: bool) -> HackResult {
        self.events.push(WorldEvent::HackAttempted { using_bionic });
        self.hack_result.unwrap_or(HackResult::Success)
    }

    fn unlock(&mut self, target: Tripoint) {
        self.events.push(WorldEvent::Unlocked(target));
    }

    fn trigger_alarm(&mut self, target: Tripoint) {
        self.events.push(WorldEvent::Alarm(target));
    }
}

impl Targeting for MockWorld {
    fn aim_prompt(&mut self, _agent: &Agent, request: &AimRequest) -> AimResponse {
        self.aim_requests.push(request.clone());
        self.aim_script
            .pop_front()
            .unwrap_or(AimResponse::Abort { reload: false })
    }

    fn confirm_fire_through(&mut self, _agent: &Agent, creature: CreatureId) -> bool {
        self.events.push(WorldEvent::ConfirmAsked(creature));
        self.confirm_fire
    }

    fn fire_weapon(&mut self, _agent: &Agent, weapon: &Weapon, trajectory: &[Tripoint]) {
        self.events.push(WorldEvent::Fired {
            weapon: weapon.id.clone(),
            trajectory: trajectory.to_vec(),
        });
    }

    fn request_reload(&mut self, _agent: &Agent, weapon: &Weapon) {
        self.events.push(WorldEvent::ReloadRequested(weapon.id.clone()));
    }

    fn choose_throw_target(
        &mut self,
        _agent: &Agent,
        _item: ItemLocation,
        _blind_throw_from: Option<Tripoint>,
    ) -> Option<Tripoint> {
        self.throw_target
    }
}
