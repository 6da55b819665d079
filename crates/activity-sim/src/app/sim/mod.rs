use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt::Debug;

use activity::actors::{
    AimActor, AutodriveActor, DigActor, DigChannelActor, DisassembleActor, DropActor,
    HackingActor, MoveItemsActor, PickupActor, StashActor, ThrowActor, ToggleGateActor, WashActor,
};
use activity::descriptor::{ACT_AUTODRIVE, ACT_MIGRATION_CANCEL};
use activity::{
    parse_save_file, read_save_file, write_save_file, ActivityActor, ActivityRegistry,
    ActivitySaveFile, ActivitySlot, Agent, AimRequest, AimResponse, AssignOutcome,
    AutodriveStatus, CreatureId, Creatures, Energy, HackResult, ItemLocation, Items,
    PersistenceError, SavedActivity, Targeting, Terminals, Terrain, TickOutcome, Tripoint,
    VehicleId, Vehicles, Weapon,
};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};

use super::bootstrap::SimConfig;

const SIM_INVENTORY_SLOTS: usize = 8;
const SIM_WALL: &str = "t_wall";
const PLAYER_ID: CreatureId = CreatureId(1);
const DOG_ID: CreatureId = CreatureId(2);

include!("world.rs");
include!("scenario.rs");
