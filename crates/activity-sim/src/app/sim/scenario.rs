#[derive(Debug, Error)]
pub(crate) enum SimError {
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("scenario {scenario}: {activity} still running after {ticks} ticks")]
    Stalled {
        scenario: &'static str,
        activity: String,
        ticks: u32,
    },
    #[error("scenario {scenario}: expected {expected}, got {actual}")]
    Unexpected {
        scenario: &'static str,
        expected: &'static str,
        actual: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScenarioReport {
    pub name: &'static str,
    pub ticks: u32,
    pub outcomes: Vec<TickOutcome>,
    pub messages: Vec<String>,
}

type ScenarioFn = fn(&SimConfig) -> Result<ScenarioReport, SimError>;

pub(crate) const SCENARIOS: &[(&str, ScenarioFn)] = &[
    ("dig_save_resume", dig_save_resume),
    ("channel_and_gate", channel_and_gate),
    ("hauling", hauling),
    ("workshop", workshop),
    ("terminal", terminal),
    ("marksman", marksman),
    ("interrupted_aim", interrupted_aim),
    ("road_trip", road_trip),
    ("obsolete_save", obsolete_save),
];

pub(crate) fn run_all(config: &SimConfig) -> Result<Vec<ScenarioReport>, SimError> {
    SCENARIOS
        .iter()
        .map(|(name, scenario)| {
            debug!(scenario = name, "scenario_starting");
            scenario(config)
        })
        .collect()
}

/// One agent, one world, one activity slot, driven tick by tick.
struct Harness<'a> {
    name: &'static str,
    config: &'a SimConfig,
    slot: ActivitySlot,
    agent: Agent,
    world: SimWorld,
    ticks: u32,
    outcomes: Vec<TickOutcome>,
}

impl<'a> Harness<'a> {
    fn new(name: &'static str, config: &'a SimConfig, agent: Agent, world: SimWorld) -> Self {
        Self {
            name,
            config,
            slot: ActivitySlot::new(config.scheduler()),
            agent,
            world,
            ticks: 0,
            outcomes: Vec::new(),
        }
    }

    fn request(&mut self, actor: impl ActivityActor + 'static) -> AssignOutcome {
        let outcome = self
            .slot
            .assign(Box::new(actor), &mut self.agent, &mut self.world);
        info!(scenario = self.name, outcome = ?outcome, "sim_activity_requested");
        outcome
    }

    fn tick_n(&mut self, count: u32) {
        for _ in 0..count {
            let outcome = self.slot.tick(&mut self.agent, &mut self.world);
            self.ticks += 1;
            if !matches!(outcome, TickOutcome::Running(_) | TickOutcome::Idle) {
                self.outcomes.push(outcome);
            }
        }
    }

    /// Ticks until the slot goes idle. Running out of ticks is an error.
    fn run(&mut self) -> Result<TickOutcome, SimError> {
        for _ in 0..self.config.max_ticks {
            let outcome = self.slot.tick(&mut self.agent, &mut self.world);
            self.ticks += 1;
            if !matches!(outcome, TickOutcome::Running(_)) {
                self.outcomes.push(outcome);
                return Ok(outcome);
            }
        }
        Err(SimError::Stalled {
            scenario: self.name,
            activity: self
                .slot
                .current()
                .map(|envelope| envelope.activity_id().to_string())
                .unwrap_or_default(),
            ticks: self.config.max_ticks,
        })
    }

    fn save_path(&self, file_name: &str) -> std::path::PathBuf {
        self.config.save_dir.join(file_name)
    }

    /// Saves the slot, drops it and loads it back as if the game restarted.
    fn save_and_reload(&mut self, file_name: &str) -> Result<(), SimError> {
        let path = self.save_path(file_name);
        write_save_file(&path, &self.slot)?;
        let file = read_save_file(&path)?;
        self.slot = ActivitySlot::new(self.config.scheduler());
        self.slot.restore(
            file.activity.as_ref(),
            ActivityRegistry::builtin(),
            &mut self.agent,
            &mut self.world,
        );
        info!(scenario = self.name, path = %path.display(), "sim_slot_reloaded");
        Ok(())
    }

    fn expect(&self, holds: bool, expected: &'static str, actual: impl Debug) -> Result<(), SimError> {
        if holds {
            return Ok(());
        }
        Err(SimError::Unexpected {
            scenario: self.name,
            expected,
            actual: format!("{actual:?}"),
        })
    }

    fn report(mut self) -> ScenarioReport {
        ScenarioReport {
            name: self.name,
            ticks: self.ticks,
            outcomes: self.outcomes,
            messages: self.agent.drain_messages(),
        }
    }
}

fn player_at(position: Tripoint) -> Agent {
    Agent::new(PLAYER_ID, position)
}

fn dig_save_resume(config: &SimConfig) -> Result<ScenarioReport, SimError> {
    let site = Tripoint::new(5, 5, 0);
    let spoils = Tripoint::new(5, 6, 0);
    let mut world = SimWorld::default();
    world.terrain.insert(site, "t_dirt".to_string());
    let mut h = Harness::new("dig_save_resume", config, player_at(Tripoint::new(5, 4, 0)), world);
    let dig = || DigActor::new(500, site, "t_pit", spoils, 3, "dig_spoils");

    h.request(dig());
    h.tick_n(2);
    h.save_and_reload("dig_in_progress.json")?;

    let resumed = h.request(dig());
    h.expect(matches!(resumed, AssignOutcome::Resumed(_)), "dig to resume", resumed)?;
    let moves_left = h.slot.current().map(|envelope| envelope.moves_left());
    let expected = 500 - 2 * config.moves_per_turn;
    h.expect(moves_left == Some(expected), "two turns of digging kept", moves_left)?;

    let outcome = h.run()?;
    h.expect(matches!(outcome, TickOutcome::Finished(_)), "dig to finish", outcome)?;
    let terrain = h.world.terrain_at(site).map(str::to_string);
    h.expect(terrain.as_deref() == Some("t_pit"), "pit at dig site", terrain)?;
    let heard = h.world.noise.len();
    h.expect(heard > 0, "digging to be heard", heard)?;
    let spawned = h.world.items_named("dig_spoils").len();
    h.expect(spawned == 3, "three piles of spoils", spawned)?;
    Ok(h.report())
}

fn channel_and_gate(config: &SimConfig) -> Result<ScenarioReport, SimError> {
    let ditch = Tripoint::new(2, 0, 0);
    let gate = Tripoint::new(0, 2, 0);
    let mut world = SimWorld::default();
    world.terrain.insert(ditch, "t_grass".to_string());
    world.gates.insert(gate, false);
    let mut h = Harness::new("channel_and_gate", config, player_at(Tripoint::ZERO), world);

    h.request(DigChannelActor::new(300, ditch, "t_water_moving_sh", ditch, 1, "digging_soil"));
    h.run()?;
    let terrain = h.world.terrain_at(ditch).map(str::to_string);
    h.expect(
        terrain.as_deref() == Some("t_water_moving_sh"),
        "channel dug",
        terrain,
    )?;

    h.request(ToggleGateActor::new(200, gate));
    h.tick_n(1);
    // Asking again for the same gate must not restart the timer.
    let again = h.request(ToggleGateActor::new(200, gate));
    h.expect(matches!(again, AssignOutcome::Resumed(_)), "gate request to merge", again)?;
    h.run()?;
    let open = h.world.gates.get(&gate).copied();
    h.expect(open == Some(true), "gate open", open)?;
    Ok(h.report())
}

fn hauling(config: &SimConfig) -> Result<ScenarioReport, SimError> {
    let here = Tripoint::new(3, 3, 0);
    let mut world = SimWorld::default();
    let planks = world.add_item("2x4", ItemPlace::Ground(here), 4, 20);
    let nails = world.add_item("nail", ItemPlace::Ground(here), 50, 1);
    let cart_spot = here + Tripoint::new(1, 0, 0);
    world.vehicles.insert(
        VehicleId(1),
        SimVehicle {
            position: cart_spot,
            route: VecDeque::new(),
            autodriving: false,
        },
    );
    world.creatures.insert(
        DOG_ID,
        SimCreature {
            name: "dog".to_string(),
            position: here + Tripoint::new(0, 1, 0),
            friendly: true,
        },
    );
    let mut h = Harness::new("hauling", config, player_at(here), world);

    h.request(PickupActor::new([(planks, 4), (nails, 50)], Some(here)));
    h.run()?;
    let carried = |world: &SimWorld, id| world.item(id).map(|item| item.place);
    let place = carried(&h.world, planks);
    h.expect(place == Some(ItemPlace::Carried(PLAYER_ID)), "planks in inventory", place)?;

    h.request(MoveItemsActor::new([(planks, 4)], true, Tripoint::new(1, 0, 0)));
    h.run()?;
    let place = carried(&h.world, planks);
    h.expect(place == Some(ItemPlace::Vehicle(cart_spot)), "planks on the cart", place)?;

    h.request(StashActor::new([(nails, 50)], Tripoint::new(0, 1, 0)));
    h.run()?;
    let place = carried(&h.world, nails);
    h.expect(place == Some(ItemPlace::Carried(DOG_ID)), "nails in the dog's pack", place)?;

    let rock = h.world.add_item("rock", ItemPlace::Carried(PLAYER_ID), 1, 10);
    h.request(DropActor::new([(rock, 1)], Tripoint::new(-1, 0, 0), true));
    h.run()?;
    let place = carried(&h.world, rock);
    h.expect(
        place == Some(ItemPlace::Ground(Tripoint::new(2, 3, 0))),
        "rock dropped west",
        place,
    )?;
    Ok(h.report())
}

fn workshop(config: &SimConfig) -> Result<ScenarioReport, SimError> {
    let bench = Tripoint::new(0, 1, 0);
    let mut world = SimWorld::default();
    let radio = world.add_item("radio", ItemPlace::Carried(PLAYER_ID), 1, 10);
    if let Some(item) = world.items.get_mut(&radio) {
        item.disassembly = Some(Disassembly {
            moves: 250,
            components: vec!["circuit".to_string(), "plastic_chunk".to_string()],
        });
    }
    let shirt = world.add_item("tshirt", ItemPlace::Carried(PLAYER_ID), 2, 5);
    if let Some(item) = world.items.get_mut(&shirt) {
        item.dirty = true;
    }
    world.washing_supplies = 5;
    let mut h = Harness::new("workshop", config, player_at(Tripoint::ZERO), world);

    h.request(DisassembleActor::new(vec![radio], bench, true));
    h.tick_n(1);
    let status = h.slot.progress_message(&h.agent);
    let percent = config.moves_per_turn.min(250) * 100 / 250;
    h.expect(
        status == Some(format!("disassembling: 1 of 1 items, {percent}%")),
        "disassembly progress",
        status,
    )?;
    h.run()?;
    let circuits = h.world.items_named("circuit").len();
    h.expect(circuits == 1, "radio taken apart", circuits)?;

    h.request(WashActor::new([(shirt, 2)], 600));
    h.run()?;
    let dirty = h.world.item(shirt).map(|item| item.dirty);
    h.expect(dirty == Some(false), "clean shirt", dirty)?;
    h.expect(h.world.washing_supplies == 3, "two units of soap used", h.world.washing_supplies)?;
    Ok(h.report())
}

fn terminal(config: &SimConfig) -> Result<ScenarioReport, SimError> {
    let panel = Tripoint::new(4, 0, 0);
    let mut world = SimWorld::default();
    world.terminals.insert(
        panel,
        SimTerminal {
            security: 3,
            locked: true,
            alarm: false,
        },
    );
    let agent = player_at(Tripoint::new(3, 0, 0)).with_bionic_power(Energy::from_kilojoules(10));
    let mut h = Harness::new("terminal", config, agent, world);

    h.request(HackingActor::with_bionic(panel));
    h.run()?;
    let state = h.world.terminals.get(&panel).cloned();
    h.expect(
        state.as_ref().is_some_and(|terminal| !terminal.locked && !terminal.alarm),
        "terminal unlocked quietly",
        state,
    )?;
    Ok(h.report())
}

fn marksman(config: &SimConfig) -> Result<ScenarioReport, SimError> {
    let line = vec![Tripoint::new(1, 0, 0), Tripoint::new(2, 0, 0), Tripoint::new(3, 0, 0)];
    let mut world = SimWorld::default();
    world.creatures.insert(
        DOG_ID,
        SimCreature {
            name: "dog".to_string(),
            position: Tripoint::new(2, 0, 0),
            friendly: true,
        },
    );
    world.friendly_fire_allowed = true;
    world.aim_plan = VecDeque::from([
        AimResponse::Aiming {
            view_offset: Some(Tripoint::new(3, 0, 0)),
            shifting_view: true,
            snap_to_target: false,
            action: "AIM".to_string(),
        },
        AimResponse::Fire {
            trajectory: line.clone(),
            at_critter: true,
        },
    ]);
    let stone = world.add_item("rock", ItemPlace::Carried(PLAYER_ID), 1, 10);
    world.throw_target = Some(Tripoint::new(6, 0, 0));
    let agent = player_at(Tripoint::ZERO)
        .with_wielded(Weapon::new("crossbow").reload_and_shoot())
        .with_spare_ammo(4);
    let mut h = Harness::new("marksman", config, agent, world);

    h.request(AimActor::use_wielded());
    h.run()?;
    let shots = h.world.shots.clone();
    h.expect(
        shots == vec![("crossbow".to_string(), line)],
        "one bolt down the line",
        shots,
    )?;
    h.expect(h.agent.view_offset == Tripoint::ZERO, "view restored", h.agent.view_offset)?;
    h.expect(h.agent.spare_ammo == 3, "one bolt spent", h.agent.spare_ammo)?;

    h.request(ThrowActor::new(stone, None));
    h.run()?;
    let place = h.world.item(stone).map(|item| item.place);
    h.expect(
        place == Some(ItemPlace::Ground(Tripoint::new(6, 0, 0))),
        "rock landed",
        place,
    )?;
    Ok(h.report())
}

fn interrupted_aim(config: &SimConfig) -> Result<ScenarioReport, SimError> {
    let mut world = SimWorld::default();
    world.aim_plan = VecDeque::from([AimResponse::Aiming {
        view_offset: Some(Tripoint::new(0, 5, 0)),
        shifting_view: true,
        snap_to_target: false,
        action: "AIM".to_string(),
    }]);
    let agent = player_at(Tripoint::ZERO).with_spare_ammo(1);
    let mut h = Harness::new("interrupted_aim", config, agent, world);

    h.request(AimActor::use_bionic(
        Weapon::new("bio_lightning").reload_and_shoot(),
        Energy::from_joules(5_000),
    ));
    h.tick_n(1);
    h.expect(h.agent.spare_ammo == 0, "bionic loaded", h.agent.spare_ammo)?;
    let stopped = h.slot.interrupt(&mut h.agent, &mut h.world);
    h.expect(stopped.is_some(), "aim interrupted", stopped)?;
    h.expect(h.agent.view_offset == Tripoint::ZERO, "view restored", h.agent.view_offset)?;
    h.expect(h.agent.spare_ammo == 1, "charge returned", h.agent.spare_ammo)?;
    Ok(h.report())
}

fn road_trip(config: &SimConfig) -> Result<ScenarioReport, SimError> {
    let mut world = SimWorld::default();
    world.vehicles.insert(
        VehicleId(7),
        SimVehicle {
            position: Tripoint::ZERO,
            route: VecDeque::from([
                Tripoint::new(1, 0, 0),
                Tripoint::new(2, 0, 0),
                Tripoint::new(3, 0, 0),
            ]),
            autodriving: false,
        },
    );
    world.terrain.insert(Tripoint::new(3, 0, 0), SIM_WALL.to_string());
    let mut h = Harness::new("road_trip", config, player_at(Tripoint::ZERO), world);

    h.request(AutodriveActor::new());
    h.save_and_reload("road_trip.json")?;
    let outcome = h.run()?;
    h.expect(
        outcome == TickOutcome::Canceled(ACT_AUTODRIVE),
        "wall to stop the car",
        outcome,
    )?;
    h.expect(h.agent.position == Tripoint::new(2, 0, 0), "car stopped short", h.agent.position)?;
    let driving = h.world.vehicles.get(&VehicleId(7)).map(|vehicle| vehicle.autodriving);
    h.expect(driving == Some(false), "autodrive released", driving)?;
    Ok(h.report())
}

fn obsolete_save(config: &SimConfig) -> Result<ScenarioReport, SimError> {
    let mut h = Harness::new("obsolete_save", config, player_at(Tripoint::ZERO), SimWorld::default());
    let stale = SavedActivity {
        activity: "ACT_CRAFT_OLD".to_string(),
        actor: json!({ "recipe": "makeshift_knife", "batch": 1 }),
        moves_total: 6_000,
        moves_left: 2_500,
        moves_spent: 3_500,
        turns: 35,
        interrupted: false,
        pending: None,
    };
    let file = ActivitySaveFile::new(Some(stale))?;
    let restored = parse_save_file(
        &h.save_path("obsolete.json"),
        &serde_json::to_vec(&file).map_err(|source| PersistenceError::Encode {
            activity: "ACT_CRAFT_OLD".to_string(),
            source,
        })?,
    )?;
    h.slot.restore(
        restored.activity.as_ref(),
        ActivityRegistry::builtin(),
        &mut h.agent,
        &mut h.world,
    );

    let outcome = h.run()?;
    h.expect(
        outcome == TickOutcome::Finished(ACT_MIGRATION_CANCEL),
        "stale activity dropped",
        outcome,
    )?;
    Ok(h.report())
}
