#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ItemPlace {
    Ground(Tripoint),
    Carried(CreatureId),
    Vehicle(Tripoint),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SimItem {
    pub name: String,
    pub place: ItemPlace,
    pub count: i32,
    pub moves_per_unit: i32,
    pub disassembly: Option<Disassembly>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Disassembly {
    pub moves: i32,
    pub components: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SimCreature {
    pub name: String,
    pub position: Tripoint,
    pub friendly: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SimVehicle {
    pub position: Tripoint,
    pub route: VecDeque<Tripoint>,
    pub autodriving: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SimTerminal {
    pub security: u8,
    pub locked: bool,
    pub alarm: bool,
}

/// Small deterministic world for exercising activities outside the real game.
#[derive(Debug, Default)]
pub(crate) struct SimWorld {
    pub terrain: HashMap<Tripoint, String>,
    pub gates: HashMap<Tripoint, bool>,
    pub items: BTreeMap<ItemLocation, SimItem>,
    next_item: u64,
    pub creatures: HashMap<CreatureId, SimCreature>,
    pub vehicles: HashMap<VehicleId, SimVehicle>,
    pub terminals: HashMap<Tripoint, SimTerminal>,
    pub washing_supplies: i32,
    pub aim_plan: VecDeque<AimResponse>,
    pub throw_target: Option<Tripoint>,
    pub friendly_fire_allowed: bool,
    pub shots: Vec<(String, Vec<Tripoint>)>,
    pub noise: Vec<(Tripoint, i32, String)>,
}

impl SimWorld {
    pub fn add_item(&mut self, name: &str, place: ItemPlace, count: i32, moves_per_unit: i32) -> ItemLocation {
        self.next_item += 1;
        let id = ItemLocation(self.next_item);
        self.items.insert(
            id,
            SimItem {
                name: name.to_string(),
                place,
                count,
                moves_per_unit,
                disassembly: None,
                dirty: false,
            },
        );
        id
    }

    pub fn item(&self, id: ItemLocation) -> Option<&SimItem> {
        self.items.get(&id)
    }

    pub fn items_named(&self, name: &str) -> Vec<&SimItem> {
        self.items.values().filter(|item| item.name == name).collect()
    }

    fn move_to(&mut self, id: ItemLocation, place: ItemPlace) {
        if let Some(item) = self.items.get_mut(&id) {
            debug!(item = %item.name, from = ?item.place, to = ?place, "sim_item_moved");
            item.place = place;
        }
    }
}

impl Terrain for SimWorld {
    fn terrain_at(&self, at: Tripoint) -> Option<&str> {
        self.terrain.get(&at).map(String::as_str)
    }

    fn set_terrain(&mut self, at: Tripoint, terrain: &str) {
        debug!(at = %at, terrain, "sim_terrain_set");
        self.terrain.insert(at, terrain.to_string());
    }

    fn emit_noise(&mut self, at: Tripoint, volume: i32, description: &str) {
        self.noise.push((at, volume, description.to_string()));
    }

    fn is_gate(&self, at: Tripoint) -> bool {
        self.gates.contains_key(&at)
    }

    fn toggle_gate(&mut self, at: Tripoint) {
        if let Some(open) = self.gates.get_mut(&at) {
            *open = !*open;
            debug!(at = %at, open = *open, "sim_gate_toggled");
        }
    }
}

impl Items for SimWorld {
    fn item_exists(&self, item: ItemLocation) -> bool {
        self.items.contains_key(&item)
    }

    fn handling_cost(&self, item: ItemLocation, count: i32) -> i32 {
        self.items
            .get(&item)
            .map_or(0, |entry| entry.moves_per_unit * count.clamp(1, entry.count.max(1)))
    }

    fn spawn_item_group(&mut self, at: Tripoint, group: &str, count: u32) {
        for _ in 0..count {
            self.add_item(group, ItemPlace::Ground(at), 1, 10);
        }
    }

    fn drop_item(
        &mut self,
        _agent: &Agent,
        item: ItemLocation,
        _count: i32,
        destination: Tripoint,
        force_ground: bool,
    ) {
        let on_vehicle = !force_ground && self.vehicle_at(destination).is_some();
        let place = if on_vehicle {
            ItemPlace::Vehicle(destination)
        } else {
            ItemPlace::Ground(destination)
        };
        self.move_to(item, place);
    }

    fn stash_item(&mut self, _agent: &Agent, item: ItemLocation, _count: i32, destination: Tripoint) {
        let carrier = self
            .creatures
            .iter()
            .find(|(_, creature)| creature.friendly && creature.position == destination)
            .map(|(id, creature)| (*id, creature.name.clone()));
        match carrier {
            Some((carrier, name)) => {
                debug!(carrier = %name, "sim_item_stashed");
                self.move_to(item, ItemPlace::Carried(carrier));
            }
            None => self.move_to(item, ItemPlace::Ground(destination)),
        }
    }

    fn pickup_item(&mut self, agent: &Agent, item: ItemLocation, _count: i32) -> bool {
        let carried = self
            .items
            .values()
            .filter(|entry| entry.place == ItemPlace::Carried(agent.id))
            .count();
        if carried >= SIM_INVENTORY_SLOTS {
            return false;
        }
        self.move_to(item, ItemPlace::Carried(agent.id));
        true
    }

    fn move_item(&mut self, item: ItemLocation, _count: i32, destination: Tripoint, to_vehicle: bool) {
        let place = if to_vehicle {
            ItemPlace::Vehicle(destination)
        } else {
            ItemPlace::Ground(destination)
        };
        self.move_to(item, place);
    }

    fn disassembly_moves(&self, item: ItemLocation) -> Option<i32> {
        self.items
            .get(&item)
            .and_then(|entry| entry.disassembly.as_ref())
            .map(|disassembly| disassembly.moves)
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
        let components = entry
            .disassembly
            .map(|disassembly| disassembly.components)
            .unwrap_or_default();
        components
            .iter()
            .map(|name| self.add_item(name, ItemPlace::Ground(at), 1, 10))
            .collect()
    }

    fn consume_washing_supplies(&mut self, _agent: &Agent, units: i32) -> bool {
        if self.washing_supplies < units {
            return false;
        }
        self.washing_supplies -= units;
        true
    }

    fn wash_item(&mut self, item: ItemLocation, _count: i32) {
        if let Some(entry) = self.items.get_mut(&item) {
            entry.dirty = false;
        }
    }

    fn throw_item(
        &mut self,
        _agent: &Agent,
        item: ItemLocation,
        target: Tripoint,
        _blind_throw_from: Option<Tripoint>,
    ) {
        self.move_to(item, ItemPlace::Ground(target));
    }
}

impl Creatures for SimWorld {
    fn creature_exists(&self, id: CreatureId) -> bool {
        self.creatures.contains_key(&id)
    }

    fn friendlies_in_line_of_fire(&self, _agent: &Agent, trajectory: &[Tripoint]) -> Vec<CreatureId> {
        let mut found: Vec<CreatureId> = self
            .creatures
            .iter()
            .filter(|(_, creature)| creature.friendly && trajectory.contains(&creature.position))
            .map(|(id, _)| *id)
            .collect();
        found.sort_by_key(|id| id.0);
        found
    }
}

impl Vehicles for SimWorld {
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
    }

    fn autodrive_step(&mut self, agent: &mut Agent, id: VehicleId) -> AutodriveStatus {
        let Some(next) = self
            .vehicles
            .get(&id)
            .and_then(|vehicle| vehicle.route.front().copied())
        else {
            return AutodriveStatus::Arrived;
        };
        if self.terrain.get(&next).is_some_and(|terrain| terrain == SIM_WALL) {
            return AutodriveStatus::Obstructed;
        }
        let Some(vehicle) = self.vehicles.get_mut(&id) else {
            return AutodriveStatus::Obstructed;
        };
        vehicle.route.pop_front();
        vehicle.position = next;
        agent.position = next;
        AutodriveStatus::Moving
    }
}

impl Terminals for SimWorld {
    fn attempt_hack(&mut self, _agent: &Agent, target: Tripoint, using_bionic: bool) -> HackResult {
        let Some(terminal) = self.terminals.get(&target) else {
            return HackResult::Nothing;
        };
        let skill: u8 = if using_bionic { 3 } else { 1 };
        match skill.cmp(&terminal.security) {
            std::cmp::Ordering::Less if terminal.security - skill > 1 => HackResult::Fail,
            std::cmp::Ordering::Less => HackResult::Nothing,
            _ => HackResult::Success,
        }
    }

    fn unlock(&mut self, target: Tripoint) {
        if let Some(terminal) = self.terminals.get_mut(&target) {
            terminal.locked = false;
        }
    }

    fn trigger_alarm(&mut self, target: Tripoint) {
        if let Some(terminal) = self.terminals.get_mut(&target) {
            terminal.alarm = true;
        }
    }
}

impl Targeting for SimWorld {
    fn aim_prompt(&mut self, _agent: &Agent, request: &AimRequest) -> AimResponse {
        debug!(weapon = %request.weapon.id, first_turn = request.first_turn, "sim_aim_prompt");
        self.aim_plan
            .pop_front()
            .unwrap_or(AimResponse::Abort { reload: false })
    }

    fn confirm_fire_through(&mut self, _agent: &Agent, creature: CreatureId) -> bool {
        debug!(creature = creature.0, allowed = self.friendly_fire_allowed, "sim_fire_confirm");
        self.friendly_fire_allowed
    }

    fn fire_weapon(&mut self, _agent: &Agent, weapon: &Weapon, trajectory: &[Tripoint]) {
        self.shots.push((weapon.id.clone(), trajectory.to_vec()));
    }

    fn request_reload(&mut self, _agent: &Agent, weapon: &Weapon) {
        debug!(weapon = %weapon.id, "sim_reload_requested");
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
