mod aim;
mod autodrive;
mod dig;
mod disassemble;
mod drop;
mod hacking;
mod handling;
mod migration_cancel;
mod move_items;
mod pickup;
mod stash;
mod throw;
mod toggle_gate;
mod wash;

pub use aim::AimActor;
pub use autodrive::AutodriveActor;
pub use dig::{DigActor, DigChannelActor};
pub use disassemble::DisassembleActor;
pub use drop::DropActor;
pub use hacking::{HackingActor, BIONIC_HACK_COST, HACK_MOVES};
pub use handling::ActItem;
pub use migration_cancel::MigrationCancelActor;
pub use move_items::MoveItemsActor;
pub use pickup::PickupActor;
pub use stash::StashActor;
pub use throw::ThrowActor;
pub use toggle_gate::ToggleGateActor;
pub use wash::WashActor;

use crate::registry::{ActivityRegistry, RegistryError};

pub(crate) fn register_builtin(registry: &mut ActivityRegistry) -> Result<(), RegistryError> {
    registry.register::<AimActor>()?;
    registry.register::<AutodriveActor>()?;
    registry.register::<DigActor>()?;
    registry.register::<DigChannelActor>()?;
    registry.register::<DisassembleActor>()?;
    registry.register::<DropActor>()?;
    registry.register::<HackingActor>()?;
    registry.register::<MigrationCancelActor>()?;
    registry.register::<MoveItemsActor>()?;
    registry.register::<PickupActor>()?;
    registry.register::<StashActor>()?;
    registry.register::<ThrowActor>()?;
    registry.register::<ToggleGateActor>()?;
    registry.register::<WashActor>()?;
    Ok(())
}
