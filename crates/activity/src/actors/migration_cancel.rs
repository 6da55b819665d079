use serde::{Deserialize, Serialize};

use crate::actor::{ActivityActor, ActivityContext, PerTurnWork, RegisteredActor, Transition};
use crate::descriptor::{ActivityId, ACT_MIGRATION_CANCEL};

/// Stand-in for a saved activity whose kind no longer exists. It does
/// nothing except stop on its first turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationCancelActor;

impl MigrationCancelActor {
    pub fn new() -> Self {
        Self
    }
}

impl ActivityActor for MigrationCancelActor {
    fn activity_id(&self) -> ActivityId {
        Self::ID
    }

    fn start(&mut self, _ctx: &mut ActivityContext<'_>) -> Transition {
        Transition::Continue
    }

    fn per_turn(&mut self) -> Option<&mut dyn PerTurnWork> {
        Some(self)
    }
}

impl PerTurnWork for MigrationCancelActor {
    fn do_turn(&mut self, _ctx: &mut ActivityContext<'_>) -> Transition {
        Transition::Complete
    }
}

impl RegisteredActor for MigrationCancelActor {
    const ID: ActivityId = ACT_MIGRATION_CANCEL;
}
