//! Interruptible, resumable long-running activities for a turn-based
//! simulation.
//!
//! An [`ActivitySlot`] owns at most one running [`ActivityActor`] per agent
//! and drives it one tick at a time. Actors reach the surrounding simulation
//! only through the [`World`] traits, and persist through the
//! [`ActivityRegistry`].

pub mod actor;
pub mod actors;
pub mod agent;
mod atomic_io;
pub mod coords;
pub mod descriptor;
pub mod envelope;
pub mod persistence;
pub mod registry;
pub mod scheduler;
pub mod world;

#[cfg(test)]
mod test_support;

pub use actor::{
    downcast_actor, ActivityActor, ActivityContext, PerTurnWork, Progress, RegisteredActor,
    ReleaseOnCancel, TerminalEffect, Transition,
};
pub use agent::Agent;
pub use coords::Tripoint;
pub use descriptor::ActivityId;
pub use envelope::{ActivityEnvelope, Terminal};
pub use persistence::{
    parse_save_file, read_save_file, write_save_file, ActivitySaveFile, PersistenceError,
    SavedActivity, SAVE_VERSION,
};
pub use registry::{ActivityRegistry, RegistryError};
pub use scheduler::{
    ActivitySlot, AssignOutcome, SchedulerConfig, TickOutcome, DEFAULT_MOVES_PER_TURN,
};
pub use world::{
    AimRequest, AimResponse, AutodriveStatus, CreatureId, CreatureRef, Creatures, Energy,
    HackResult, ItemLocation, Items, Targeting, Terminals, Terrain, VehicleId, VehicleRef,
    Vehicles, Weapon, World,
};
