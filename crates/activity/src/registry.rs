//! Descriptor → decoder table used to rebuild actors from save data.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::OnceLock;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::actor::{ActivityActor, RegisteredActor};
use crate::actors::{register_builtin, MigrationCancelActor};
use crate::descriptor::ActivityId;

type DecodeFn =
    fn(&Value) -> Result<Box<dyn ActivityActor>, serde_path_to_error::Error<serde_json::Error>>;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("activity {name} is already registered")]
    DuplicateName { name: &'static str },
    #[error("actor type for {name} is already registered as {existing}")]
    DuplicateType {
        name: &'static str,
        existing: &'static str,
    },
    #[error("failed to decode {activity} payload at {path}: {source}")]
    Payload {
        activity: String,
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Copy)]
struct RegisteredKind {
    id: ActivityId,
    decode: DecodeFn,
}

impl fmt::Debug for RegisteredKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredKind").field("id", &self.id).finish()
    }
}

/// Bidirectional map between activity descriptors and concrete actor types.
#[derive(Debug, Default)]
pub struct ActivityRegistry {
    by_name: HashMap<&'static str, RegisteredKind>,
    by_type: HashMap<TypeId, ActivityId>,
    obsolete: HashSet<String>,
}

impl ActivityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin_actors() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        register_builtin(&mut registry)?;
        Ok(registry)
    }

    /// Process-wide registry holding every built-in activity kind.
    pub fn builtin() -> &'static ActivityRegistry {
        static BUILTIN: OnceLock<ActivityRegistry> = OnceLock::new();
        BUILTIN.get_or_init(|| match Self::with_builtin_actors() {
            Ok(registry) => registry,
            Err(source) => {
                error!(error = %source, "builtin_activity_registry_failed");
                Self::new()
            }
        })
    }

    pub fn register<T: RegisteredActor>(&mut self) -> Result<(), RegistryError> {
        let name = T::ID.as_str();
        if self.by_name.contains_key(name) {
            return Err(RegistryError::DuplicateName { name });
        }
        if let Some(existing) = self.by_type.get(&TypeId::of::<T>()) {
            return Err(RegistryError::DuplicateType {
                name,
                existing: existing.as_str(),
            });
        }
        self.by_name.insert(
            name,
            RegisteredKind {
                id: T::ID,
                decode: decode_as::<T>,
            },
        );
        self.by_type.insert(TypeId::of::<T>(), T::ID);
        Ok(())
    }

    /// Saved activities under `name` load as a migration cancel from now on.
    pub fn mark_obsolete(&mut self, name: impl Into<String>) {
        self.obsolete.insert(name.into());
    }

    pub fn is_obsolete(&self, name: &str) -> bool {
        self.obsolete.contains(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn lookup(&self, name: &str) -> Option<ActivityId> {
        self.by_name.get(name).map(|kind| kind.id)
    }

    pub fn id_of(&self, actor: &dyn ActivityActor) -> Option<ActivityId> {
        self.by_type.get(&actor.as_any().type_id()).copied()
    }

    /// Rebuilds the actor saved under `activity`.
    ///
    /// Unknown and obsolete descriptors never fail: they come back as a
    /// [`MigrationCancelActor`]. A known descriptor with a payload that does
    /// not fit its type is an error.
    pub fn decode(
        &self,
        activity: &str,
        payload: &Value,
    ) -> Result<Box<dyn ActivityActor>, RegistryError> {
        if self.obsolete.contains(activity) {
            debug!(activity, "obsolete_activity_replaced");
            return Ok(Box::new(MigrationCancelActor::new()));
        }
        let Some(kind) = self.by_name.get(activity) else {
            warn!(activity, "unknown_activity_replaced");
            return Ok(Box::new(MigrationCancelActor::new()));
        };
        (kind.decode)(payload).map_err(|error| RegistryError::Payload {
            activity: activity.to_string(),
            path: error.path().to_string(),
            source: error.into_inner(),
        })
    }

    /// Like [`decode`](Self::decode) but degrades a malformed payload to a
    /// migration cancel as well.
    pub fn decode_or_cancel(&self, activity: &str, payload: &Value) -> Box<dyn ActivityActor> {
        match self.decode(activity, payload) {
            Ok(actor) => actor,
            Err(error) => {
                warn!(activity, error = %error, "activity_payload_rejected");
                Box::new(MigrationCancelActor::new())
            }
        }
    }
}

fn decode_as<T: RegisteredActor>(
    payload: &Value,
) -> Result<Box<dyn ActivityActor>, serde_path_to_error::Error<serde_json::Error>> {
    let actor: T = serde_path_to_error::deserialize(payload)?;
    Ok(Box::new(actor))
}
