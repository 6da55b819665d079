use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

/// Stable name of an activity kind plus the verb shown while it runs.
///
/// Identity is the name alone; the verb is presentation.
#[derive(Debug, Clone, Copy)]
pub struct ActivityId {
    name: &'static str,
    verb: &'static str,
}

impl ActivityId {
    pub const fn new(name: &'static str, verb: &'static str) -> Self {
        Self { name, verb }
    }

    pub fn as_str(&self) -> &'static str {
        self.name
    }

    pub fn verb(&self) -> &'static str {
        self.verb
    }
}

impl PartialEq for ActivityId {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ActivityId {}

impl Hash for ActivityId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Serialize for ActivityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

pub const ACT_AIM: ActivityId = ActivityId::new("ACT_AIM", "aiming");
pub const ACT_AUTODRIVE: ActivityId = ActivityId::new("ACT_AUTODRIVE", "driving");
pub const ACT_DIG: ActivityId = ActivityId::new("ACT_DIG", "digging");
pub const ACT_DIG_CHANNEL: ActivityId = ActivityId::new("ACT_DIG_CHANNEL", "digging a channel");
pub const ACT_DISASSEMBLE: ActivityId = ActivityId::new("ACT_DISASSEMBLE", "disassembling");
pub const ACT_DROP: ActivityId = ActivityId::new("ACT_DROP", "dropping");
pub const ACT_HACKING: ActivityId = ActivityId::new("ACT_HACKING", "hacking");
pub const ACT_MIGRATION_CANCEL: ActivityId =
    ActivityId::new("ACT_MIGRATION_CANCEL", "stopping an obsolete activity");
pub const ACT_MOVE_ITEMS: ActivityId = ActivityId::new("ACT_MOVE_ITEMS", "moving items");
pub const ACT_PICKUP: ActivityId = ActivityId::new("ACT_PICKUP", "picking up");
pub const ACT_STASH: ActivityId = ActivityId::new("ACT_STASH", "stashing");
pub const ACT_THROW: ActivityId = ActivityId::new("ACT_THROW", "throwing");
pub const ACT_TOGGLE_GATE: ActivityId = ActivityId::new("ACT_TOGGLE_GATE", "operating the gate");
pub const ACT_WASH: ActivityId = ActivityId::new("ACT_WASH", "washing");
